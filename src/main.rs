use anyhow::Context;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use tokio::sync::mpsc;
use tokio::task;

use groq_chat::ai::{check_credentials, run_completion};
use groq_chat::app::{App, AppResult};
use groq_chat::event::{Event, EventHandler};
use groq_chat::handler::handle_key_events;
use groq_chat::tui::Tui;

#[tokio::main]
async fn main() -> AppResult<()> {
    // A local .env file is the other supported home for the API key.
    let _ = dotenvy::dotenv();
    check_credentials()?;

    // Create an application.
    let mut app = App::new().context("Failed to create application")?;

    // Initialize the terminal user interface.
    let backend = CrosstermBackend::new(io::stderr());
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;
    let events = EventHandler::new(250);
    let mut tui = Tui::new(terminal, events);
    tui.init().context("Failed to initialize terminal")?;

    // Create a channel to receive the streamed assistant reply
    let (stream_tx, mut stream_rx) = mpsc::channel(32);

    // Start the main loop.
    while app.running {
        // Render the user interface.
        tui.draw(&mut app)
            .context("Failed to render user interface")?;
        // Handle events.
        match tui
            .events
            .next()
            .await
            .context("Unable to get next event")?
        {
            Event::Tick => app.tick(),
            Event::Key(key_event) => {
                handle_key_events(key_event, &mut app).context("Error handling key events")?
            }
            Event::Mouse(_) | Event::Resize(_, _) => {}
        }

        // Dispatch a freshly submitted turn as one completion task
        if app.has_unsent_turn {
            app.has_unsent_turn = false;
            let stream_tx = stream_tx.clone();
            let transcript = app.transcript.clone(); // This clone is necessary for the async task
            let model = app.models.selected().to_string(); // This clone is necessary for the async task
            task::spawn(run_completion(transcript, model, stream_tx));
        }

        // Fold any fragments that arrived since the last event into the app
        while let Ok(stream_event) = stream_rx.try_recv() {
            app.handle_stream_event(stream_event);
        }
    }

    // Exit the user interface.
    tui.exit().context("Failed during application shutdown")?;
    Ok(())
}
