//! crates/coursehub_core/src/session.rs
//!
//! A single chat session: the transcript shown to the student and the turn logic
//! that feeds it.

use tracing::warn;

use crate::domain::ChatMessage;
use crate::keywords::{fallback_response, suggestions_for};
use crate::ports::ChatTransport;

const WELCOME_MESSAGE: &str = "Hi! I'm your AI learning assistant. Ask me about your courses, \
programming concepts or how to prepare for a quiz.";

/// Owns the transcript of one session. `submit` needs `&mut self`, so a session can
/// never have more than one request outstanding.
pub struct ChatSession<T> {
    transport: T,
    transcript: Vec<ChatMessage>,
}

impl<T: ChatTransport> ChatSession<T> {
    /// Starts a session with the assistant's greeting.
    pub fn new(transport: T) -> Self {
        let mut welcome = ChatMessage::bot(WELCOME_MESSAGE);
        welcome.suggestions = suggestions_for("");
        Self {
            transport,
            transcript: vec![welcome],
        }
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Runs one turn: appends the user message, waits for the reply and appends exactly
    /// one bot message. Blank input is ignored and returns `None`.
    pub async fn submit(&mut self, input: &str) -> Option<&ChatMessage> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        self.transcript.push(ChatMessage::user(input));

        let mut reply = match self.transport.send(input).await {
            Ok(reply) => {
                let mut message = ChatMessage::bot(reply.text);
                message.is_partial = reply.partial;
                message
            }
            Err(e) => {
                warn!("Chat request failed, answering locally: {}", e);
                let mut message = ChatMessage::bot(fallback_response(input));
                message.is_error = true;
                message
            }
        };
        reply.suggestions = suggestions_for(input);

        self.transcript.push(reply);
        self.transcript.last()
    }
}
