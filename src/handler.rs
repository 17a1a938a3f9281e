use crate::app::{App, AppResult, InputMode};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handles the key events and updates the state of [`App`].
pub fn handle_key_events(key_event: KeyEvent, app: &mut App) -> AppResult<()> {
    match app.input_mode {
        InputMode::Normal => match key_event.code {
            // Exit application on `ESC` or `q`
            KeyCode::Esc | KeyCode::Char('q') => app.quit(),
            KeyCode::Char('i') => app.set_input_mode(InputMode::Editing),
            KeyCode::Char('y') => app.yank_latest_assistant_message(),
            KeyCode::Tab => app.models.select_next(),
            KeyCode::BackTab => app.models.select_previous(),
            KeyCode::Up | KeyCode::Char('k') => {
                app.decrement_vertical_scroll();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.increment_vertical_scroll();
            }
            _ => {}
        },
        InputMode::Editing => match key_event.code {
            // Exit editing mode on `ESC`
            KeyCode::Esc => app.set_input_mode(InputMode::Normal),
            KeyCode::Char('V') | KeyCode::Char('v') => {
                if key_event.modifiers == KeyModifiers::CONTROL {
                    app.paste_to_input_textarea();
                } else {
                    app.input_textarea.input(key_event);
                }
            }
            KeyCode::Enter => {
                if key_event.modifiers == KeyModifiers::NONE {
                    app.submit_message();
                } else {
                    // Modified Enter inserts a newline for multi-line input.
                    app.input_textarea.insert_newline();
                }
            }
            _ => {
                app.input_textarea.input(key_event);
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::Role;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn q_quits_in_normal_mode() {
        let mut app = App::new().expect("app construction");
        handle_key_events(key(KeyCode::Char('q')), &mut app).expect("key handling");
        assert!(!app.running);
    }

    #[test]
    fn tab_cycles_the_model_selection() {
        let mut app = App::new().expect("app construction");
        let first = app.models.selected().to_string();
        handle_key_events(key(KeyCode::Tab), &mut app).expect("key handling");
        assert_ne!(app.models.selected(), first);
        handle_key_events(key(KeyCode::BackTab), &mut app).expect("key handling");
        assert_eq!(app.models.selected(), first);
    }

    #[test]
    fn typing_and_enter_submit_a_user_turn() {
        let mut app = App::new().expect("app construction");
        handle_key_events(key(KeyCode::Char('i')), &mut app).expect("key handling");
        for c in "hello".chars() {
            handle_key_events(key(KeyCode::Char(c)), &mut app).expect("key handling");
        }
        handle_key_events(key(KeyCode::Enter), &mut app).expect("key handling");
        assert_eq!(app.transcript.last_role(), Some(Role::User));
        let user_turn = app.transcript.history().next().expect("user turn");
        assert_eq!(user_turn.content, "hello");
    }
}
