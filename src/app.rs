use arboard::Clipboard;
use ratatui::{
    style::{Color, Style},
    widgets::Block,
};
use tui_textarea::TextArea;

use crate::ai::{StreamEvent, MODELS};
use crate::models::ModelList;
use crate::transcript::{Role, Transcript, SYSTEM_PROMPT};

/// Application result type.
pub type AppResult<T> = anyhow::Result<T>;

#[derive(Clone, Copy)]
pub enum InputMode {
    Normal,
    Editing,
}

/// App holds the state of the application.
pub struct App<'a> {
    /// Input text area
    pub input_textarea: TextArea<'a>,
    /// Current input mode
    pub input_mode: InputMode,
    /// Conversation history for this session
    pub transcript: Transcript,
    /// Selectable backend models
    pub models: ModelList,
    /// User turn submitted but not yet dispatched to the completion client
    pub has_unsent_turn: bool,
    /// A completion is in flight; blocks new submissions
    pub awaiting_reply: bool,
    /// Text of the reply streamed so far, shown live while it grows
    pub streaming: Option<String>,
    /// Last completion failure, shown until the next submission
    pub error: Option<String>,
    /// Vertical scroll of the chat log
    pub vertical_scroll: usize,
    /// Is the application running?
    pub running: bool,
    /// Clipboard handle, absent on headless terminals
    pub clipboard: Option<Clipboard>,
}

fn styled_input_textarea() -> TextArea<'static> {
    let mut input_textarea = TextArea::default();
    input_textarea.set_block(Block::bordered().title("Input"));
    input_textarea.set_style(Style::default().fg(Color::Yellow));
    input_textarea
}

impl App<'_> {
    pub fn new() -> AppResult<Self> {
        Ok(Self {
            input_textarea: styled_input_textarea(),
            input_mode: InputMode::Normal,
            transcript: Transcript::new(SYSTEM_PROMPT),
            models: ModelList::new(MODELS)?,
            has_unsent_turn: false,
            awaiting_reply: false,
            streaming: None,
            error: None,
            vertical_scroll: 0,
            running: true,
            clipboard: Clipboard::new().ok(),
        })
    }

    /// Handles the tick event of the terminal.
    pub fn tick(&self) {}

    pub fn set_input_mode(&mut self, new_input_mode: InputMode) {
        self.input_mode = new_input_mode;
    }

    /// Lines the chat log occupies before wrapping, used to bound scrolling.
    pub fn chat_line_count(&self) -> usize {
        let history: usize = self
            .transcript
            .history()
            .map(|turn| turn.content.lines().count() + 2)
            .sum();
        let streaming = self
            .streaming
            .as_ref()
            .map_or(0, |text| text.lines().count() + 2);
        history + streaming
    }

    pub fn increment_vertical_scroll(&mut self) {
        let max_scroll = self.chat_line_count().saturating_sub(1);
        if self.vertical_scroll < max_scroll {
            self.vertical_scroll += 1;
        }
    }

    pub fn decrement_vertical_scroll(&mut self) {
        self.vertical_scroll = self.vertical_scroll.saturating_sub(1);
    }

    /// Records the input as a user turn and flags it for dispatch. Blank
    /// input is dropped, and nothing is accepted while a reply is still
    /// streaming, one turn at a time.
    pub fn submit_message(&mut self) {
        if self.awaiting_reply {
            return;
        }
        let text = self.input_textarea.lines().join("\n");
        if text.trim().is_empty() {
            return;
        }
        self.transcript.append(Role::User, text);
        self.has_unsent_turn = true;
        self.awaiting_reply = true;
        self.error = None;
        self.input_textarea = styled_input_textarea();
        self.set_input_mode(InputMode::Normal);
    }

    /// Folds one completion event into the session. Fragments grow the live
    /// buffer so every redraw shows a prefix of the final reply; `Done`
    /// turns the buffer into the assistant turn; `Failed` drops the buffer
    /// and leaves the user turn unanswered so it can simply be re-sent.
    pub fn handle_stream_event(&mut self, event: StreamEvent) {
        match event {
            StreamEvent::Fragment(fragment) => {
                self.streaming
                    .get_or_insert_with(String::new)
                    .push_str(&fragment);
            }
            StreamEvent::Done => {
                let reply = self.streaming.take().unwrap_or_default();
                self.transcript.append(Role::Assistant, reply);
                self.awaiting_reply = false;
            }
            StreamEvent::Failed(reason) => {
                self.streaming = None;
                self.error = Some(reason);
                self.awaiting_reply = false;
            }
        }
    }

    pub fn paste_to_input_textarea(&mut self) {
        if let Some(clipboard) = self.clipboard.as_mut() {
            if let Ok(clipboard_content) = clipboard.get_text() {
                self.input_textarea.insert_str(clipboard_content);
            }
        }
    }

    pub fn yank_latest_assistant_message(&mut self) {
        let Some(message) = self.transcript.last_assistant_message() else {
            return;
        };
        let message = message.to_string();
        if let Some(clipboard) = self.clipboard.as_mut() {
            let _ = clipboard.set_text(message);
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app_with_input(text: &str) -> App<'static> {
        let mut app = App::new().expect("app construction");
        app.input_textarea.insert_str(text);
        app
    }

    #[test]
    fn submit_appends_a_user_turn_and_clears_the_input() {
        let mut app = app_with_input("hello");
        app.submit_message();
        assert_eq!(app.transcript.len(), 2);
        assert_eq!(app.transcript.last_role(), Some(Role::User));
        assert!(app.has_unsent_turn);
        assert!(app.awaiting_reply);
        assert_eq!(app.input_textarea.lines(), [""]);
    }

    #[test]
    fn blank_input_is_not_submitted() {
        let mut app = app_with_input("   \n  ");
        app.submit_message();
        assert_eq!(app.transcript.len(), 1);
        assert!(!app.has_unsent_turn);
    }

    #[test]
    fn submissions_are_blocked_while_a_reply_is_streaming() {
        let mut app = app_with_input("first");
        app.submit_message();
        app.input_textarea.insert_str("second");
        app.submit_message();
        assert_eq!(app.transcript.len(), 2);
    }

    #[test]
    fn fragments_grow_the_live_buffer_monotonically() {
        let mut app = app_with_input("hi");
        app.submit_message();
        let mut seen = String::new();
        for fragment in ["Hel", "lo", " world"] {
            app.handle_stream_event(StreamEvent::Fragment(fragment.to_string()));
            let buffer = app.streaming.as_deref().expect("live buffer");
            assert!(buffer.starts_with(&seen));
            seen = buffer.to_string();
        }
        app.handle_stream_event(StreamEvent::Done);
        assert_eq!(app.transcript.last_assistant_message(), Some("Hello world"));
        assert_eq!(app.streaming, None);
        assert!(!app.awaiting_reply);
    }

    #[test]
    fn answered_turns_keep_the_expected_transcript_shape() {
        let mut app = App::new().expect("app construction");
        let n = 3;
        for i in 0..n {
            app.input_textarea.insert_str(format!("question {i}"));
            app.submit_message();
            app.has_unsent_turn = false;
            app.handle_stream_event(StreamEvent::Fragment(format!("answer {i}")));
            app.handle_stream_event(StreamEvent::Done);
        }
        assert_eq!(app.transcript.len(), 1 + 2 * n);
    }

    #[test]
    fn failure_leaves_the_user_turn_unanswered() {
        let mut app = app_with_input("hi");
        app.submit_message();
        app.handle_stream_event(StreamEvent::Fragment("par".to_string()));
        app.handle_stream_event(StreamEvent::Failed("connection reset".to_string()));
        assert_eq!(app.transcript.len(), 2);
        assert_eq!(app.transcript.last_role(), Some(Role::User));
        assert_eq!(app.streaming, None);
        assert!(app.error.is_some());
        assert!(!app.awaiting_reply);
    }

    #[test]
    fn resubmitting_after_a_failure_does_not_duplicate_the_turn_silently() {
        let mut app = app_with_input("hi");
        app.submit_message();
        app.has_unsent_turn = false;
        app.handle_stream_event(StreamEvent::Failed("timeout".to_string()));
        // Nothing re-enters the transcript until the user acts again.
        assert_eq!(app.transcript.len(), 2);
        app.input_textarea.insert_str("hi");
        app.submit_message();
        assert_eq!(app.transcript.len(), 3);
        assert!(app.error.is_none());
    }
}
