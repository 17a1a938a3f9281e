use anyhow::{bail, Context, Result};
use futures::{Stream, StreamExt};
use genai::chat::{ChatMessage, ChatOptions, ChatRequest, ChatStreamEvent};
use genai::Client;
use tokio::sync::mpsc::Sender;

use crate::transcript::{Role, Transcript};

/// Selectable Groq-hosted models. The `genai` client routes these names to
/// the Groq adapter.
pub const MODELS: [&str; 2] = ["llama3-8b-8192", "llama3-70b-8192"];

const API_KEY_VAR: &str = "GROQ_API_KEY";
const MAX_TOKENS: u32 = 4096;
const TEMPERATURE: f64 = 0.0;

/// Incremental result of one completion request, delivered to the event
/// loop over a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// One non-empty text fragment, in arrival order.
    Fragment(String),
    /// The provider signalled end-of-stream.
    Done,
    /// The request or the stream failed. No retry, no partial salvage.
    Failed(String),
}

/// Fails when the Groq API key is absent so the problem surfaces before the
/// terminal UI takes over the screen. The key itself is consumed by the
/// `genai` client on each request.
pub fn check_credentials() -> Result<()> {
    match std::env::var(API_KEY_VAR) {
        Ok(key) if !key.trim().is_empty() => Ok(()),
        _ => bail!("{API_KEY_VAR} is not set; export it or add it to a .env file"),
    }
}

fn chat_request(transcript: &Transcript) -> ChatRequest {
    let mut chat_req = ChatRequest::default();
    for turn in transcript.turns() {
        let message = match turn.role {
            Role::System => ChatMessage::system(&turn.content),
            Role::User => ChatMessage::user(&turn.content),
            Role::Assistant => ChatMessage::assistant(&turn.content),
        };
        chat_req = chat_req.append_message(message);
    }
    chat_req
}

/// Extracts the displayable text from one stream event. Control frames
/// (start, end, reasoning and tool-call chunks) and empty deltas carry no
/// transcript text and are dropped.
fn fragment_from(event: ChatStreamEvent) -> Option<String> {
    match event {
        ChatStreamEvent::Chunk(chunk) if !chunk.content.is_empty() => Some(chunk.content),
        _ => None,
    }
}

/// Opens one streaming completion request for the full transcript and
/// returns the reply as a forward-only sequence of non-empty text
/// fragments. The sequence is finite and not restartable; generation
/// parameters are fixed (greedy decoding, capped output, no stop
/// sequences).
pub async fn stream_completion(
    transcript: &Transcript,
    model: &str,
) -> Result<impl Stream<Item = Result<String>> + Send> {
    let options = ChatOptions::default()
        .with_temperature(TEMPERATURE)
        .with_max_tokens(MAX_TOKENS);
    let client = Client::default();
    let response = client
        .exec_chat_stream(model, chat_request(transcript), Some(&options))
        .await
        .context("Completion request failed")?;
    Ok(response.stream.filter_map(|event| async move {
        match event {
            Ok(event) => fragment_from(event).map(Ok),
            Err(e) => Some(Err(e.into())),
        }
    }))
}

/// Drives one completion to the end, forwarding every fragment as it
/// arrives. Errors end the turn immediately; the caller's transcript keeps
/// the user turn with no assistant turn, so resubmitting simply re-sends
/// the same transcript.
pub async fn run_completion(transcript: Transcript, model: String, events: Sender<StreamEvent>) {
    let stream = match stream_completion(&transcript, &model).await {
        Ok(stream) => stream,
        Err(e) => {
            let _ = events.send(StreamEvent::Failed(format!("{e:#}"))).await;
            return;
        }
    };
    futures::pin_mut!(stream);
    while let Some(fragment) = stream.next().await {
        match fragment {
            Ok(text) => {
                if events.send(StreamEvent::Fragment(text)).await.is_err() {
                    // UI is gone, stop consuming.
                    return;
                }
            }
            Err(e) => {
                let _ = events.send(StreamEvent::Failed(format!("{e:#}"))).await;
                return;
            }
        }
    }
    let _ = events.send(StreamEvent::Done).await;
}
