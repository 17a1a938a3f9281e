use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, List, ListItem, Paragraph},
    Frame,
};

use crate::app::{App, InputMode};
use crate::transcript::Role;

const SIDEBAR_WIDTH: u16 = 24;

pub fn render(f: &mut Frame, app: &mut App) {
    f.render_widget(
        Block::bordered()
            .title("Groq Chat")
            .title_alignment(Alignment::Center)
            .border_type(BorderType::Rounded),
        f.area(),
    );

    let horizontal = Layout::horizontal([Constraint::Min(1), Constraint::Length(SIDEBAR_WIDTH)])
        .margin(1);
    let [main_area, sidebar_area] = horizontal.areas(f.area());

    let vertical = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Min(1),
    ]);
    let [help_area, input_area, chat_area] = vertical.areas(main_area);

    render_help(f, app, help_area);
    f.render_widget(&app.input_textarea, input_area);
    render_chat(f, app, chat_area);
    render_models(f, app, sidebar_area);
}

fn render_help(f: &mut Frame, app: &App, area: Rect) {
    let (msg, style) = match app.input_mode {
        InputMode::Normal => (
            vec![
                "Press ".into(),
                "q".bold(),
                " to exit, ".into(),
                "i".bold(),
                " to start editing, ".into(),
                "Tab".bold(),
                " to switch model.".into(),
            ],
            Style::default().add_modifier(Modifier::RAPID_BLINK),
        ),
        InputMode::Editing => (
            vec![
                "Press ".into(),
                "Esc".bold(),
                " to stop editing, ".into(),
                "Enter".bold(),
                " to send the message.".into(),
            ],
            Style::default(),
        ),
    };
    let text = Text::from(Line::from(msg)).patch_style(style);
    f.render_widget(Paragraph::new(text), area);
}

/// Rendered history plus the reply streamed so far. Each fragment arriving
/// over the channel lands in `app.streaming` before the next draw, so the
/// assistant text visibly grows while the model is still responding.
fn render_chat(f: &mut Frame, app: &App, area: Rect) {
    let width = area.width.saturating_sub(2).max(1) as usize;
    let mut lines: Vec<Line> = Vec::new();

    for turn in app.transcript.history() {
        let label = match turn.role {
            Role::User => Span::raw("USER:").yellow().bold(),
            _ => Span::raw("ASSISTANT:").green().bold(),
        };
        lines.push(Line::from(label));
        push_wrapped(&mut lines, &turn.content, width);
        lines.push(Line::raw(""));
    }

    if let Some(partial) = &app.streaming {
        lines.push(Line::from(Span::raw("ASSISTANT:").green().bold()));
        push_wrapped(&mut lines, partial, width);
    } else if app.awaiting_reply {
        lines.push(Line::from(Span::raw("ASSISTANT:").green().bold()));
        lines.push(Line::from(Span::raw("...").dim()));
    }

    if let Some(error) = &app.error {
        lines.push(Line::from(Span::raw(format!("Error: {error}")).red().bold()));
    }

    let chat = Paragraph::new(Text::from(lines))
        .block(Block::bordered().title("Chat"))
        .scroll((app.vertical_scroll as u16, 0));
    f.render_widget(chat, area);
}

fn push_wrapped(lines: &mut Vec<Line>, content: &str, width: usize) {
    for wrapped in textwrap::wrap(content, width) {
        lines.push(Line::raw(wrapped.into_owned()));
    }
}

fn render_models(f: &mut Frame, app: &mut App, area: Rect) {
    let items: Vec<ListItem> = app.models.items.iter().map(ListItem::from).collect();
    let list = List::new(items)
        .block(Block::bordered().title("Models"))
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    f.render_stateful_widget(list, area, &mut app.models.state);
}
