//! crates/coursehub_core/src/assistant.rs
//!
//! The AI learning assistant: sends one prompt to the generative model, applies the
//! acceptance policy (with its single bounded retry) and degrades to canned answers
//! whenever the model cannot produce a usable reply.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::domain::ChatReply;
use crate::generation::{evaluate, Decision, GenerationRequest, GenerationResult};
use crate::keywords::fallback_response;
use crate::ports::{ChatTransport, GenerationError, GenerativeModelService, PortResult};

const PROMPT_PREAMBLE: &str = "You are an AI learning assistant for an online learning platform. \
Help students understand programming and web development concepts, course material and study \
strategies. Answer clearly and encouragingly, use short examples where they help and keep the \
answer concise.";

#[derive(Clone)]
pub struct ChatAssistant {
    model: Arc<dyn GenerativeModelService>,
    max_output_tokens: u32,
}

impl ChatAssistant {
    pub fn new(model: Arc<dyn GenerativeModelService>, max_output_tokens: u32) -> Self {
        Self {
            model,
            max_output_tokens,
        }
    }

    /// Runs `prompt` through the model. Makes at most two calls: the first with the
    /// configured budget and, after a token-limit cutoff, one retry with a reduced budget.
    pub async fn generate(&self, prompt: &str) -> Result<GenerationResult, GenerationError> {
        let mut budget = self.max_output_tokens;
        let mut retry_count = 0u8;

        loop {
            let request = GenerationRequest::new(prompt, budget);
            let raw = self.model.generate_content(&request).await?;

            match evaluate(&raw, budget, retry_count) {
                Decision::Retry { budget: reduced } => {
                    warn!(
                        previous_budget = budget,
                        retry_budget = reduced,
                        "Model hit its token limit, retrying with a smaller budget"
                    );
                    budget = reduced;
                    retry_count += 1;
                }
                Decision::Done(result) => return Ok(result),
            }
        }
    }

    /// Answers a student's message. Always produces a reply: rejected responses and
    /// model errors turn into a fallback answer.
    pub async fn respond(&self, message: &str) -> ChatReply {
        let prompt = format!("{}\n\nStudent question: {}", PROMPT_PREAMBLE, message);

        match self.generate(&prompt).await {
            Ok(GenerationResult::Accepted { text }) => ChatReply::answer(text),
            Ok(GenerationResult::AcceptedPartial { text }) => {
                info!("Returning partial model response");
                ChatReply::partial(text)
            }
            Ok(GenerationResult::Rejected { reason }) => {
                warn!(%reason, "Model response rejected, using fallback answer");
                ChatReply::fallback(fallback_response(message))
            }
            Err(e) => {
                error!("Model call failed, using fallback answer: {}", e);
                ChatReply::fallback(fallback_response(message))
            }
        }
    }
}

/// Talking to the assistant in-process is the "direct to vendor" flavour of a chat session.
#[async_trait]
impl ChatTransport for ChatAssistant {
    async fn send(&self, message: &str) -> PortResult<ChatReply> {
        Ok(self.respond(message).await)
    }
}
