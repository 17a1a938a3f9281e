/// Application.
pub mod app;

/// Terminal events handler.
pub mod event;

/// Widget renderer.
pub mod ui;

/// Terminal user interface.
pub mod tui;

/// Event handler.
pub mod handler;

/// GenAI chat client.
pub mod ai;

/// Model selector.
pub mod models;

/// Conversation transcript.
pub mod transcript;
