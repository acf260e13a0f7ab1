//! crates/coursehub_core/src/generation.rs
//!
//! Vendor-neutral request/response types for text generation and the policy that
//! decides whether a model response is accepted, salvaged, retried or rejected.

use std::collections::BTreeMap;
use std::fmt;

/// Token budget used for the single retry after a token-limit cutoff. A first
/// attempt is only retried when its budget was above this value.
pub const RETRY_TOKEN_BUDGET: u32 = 300;

/// Appended to text salvaged from a response that hit the token limit.
pub const PARTIAL_MARKER: &str = "...";

const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_TOP_P: f32 = 0.95;
const DEFAULT_TOP_K: u32 = 40;
const DEFAULT_SAFETY_THRESHOLD: &str = "BLOCK_MEDIUM_AND_ABOVE";
const HARM_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

//=========================================================================================
// Request
//=========================================================================================

/// Everything needed for one generation call. Built fresh per call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub max_output_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub candidate_count: u32,
    /// Harm category → blocking threshold.
    pub safety_thresholds: BTreeMap<String, String>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, max_output_tokens: u32) -> Self {
        let safety_thresholds = HARM_CATEGORIES
            .iter()
            .map(|category| (category.to_string(), DEFAULT_SAFETY_THRESHOLD.to_string()))
            .collect();

        Self {
            prompt: prompt.into(),
            max_output_tokens,
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            top_k: DEFAULT_TOP_K,
            candidate_count: 1,
            safety_thresholds,
        }
    }
}

//=========================================================================================
// Raw Response
//=========================================================================================

/// Why the model stopped producing tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinishReason {
    /// Normal completion.
    Stop,
    MaxTokens,
    Safety,
    Recitation,
    Other(String),
}

impl FinishReason {
    pub fn parse(value: &str) -> Self {
        match value {
            "STOP" => Self::Stop,
            "MAX_TOKENS" => Self::MaxTokens,
            "SAFETY" => Self::Safety,
            "RECITATION" => Self::Recitation,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for FinishReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stop => f.write_str("STOP"),
            Self::MaxTokens => f.write_str("MAX_TOKENS"),
            Self::Safety => f.write_str("SAFETY"),
            Self::Recitation => f.write_str("RECITATION"),
            Self::Other(reason) => f.write_str(reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// `None` when the vendor omitted the field, which happens on normal completions.
    pub finish_reason: Option<FinishReason>,
    pub text: Option<String>,
}

impl Candidate {
    fn usable_text(&self) -> Option<&str> {
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

/// A decoded model response, stripped of everything the acceptance policy ignores.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawGeneration {
    pub candidates: Vec<Candidate>,
}

//=========================================================================================
// Acceptance Policy
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationResult {
    Accepted { text: String },
    AcceptedPartial { text: String },
    Rejected { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Call the model again with a smaller budget.
    Retry { budget: u32 },
    Done(GenerationResult),
}

/// Inspects one model response. `retry_count` is 0 for the first attempt and 1
/// for the retry; only a first attempt can produce `Decision::Retry`.
pub fn evaluate(raw: &RawGeneration, budget: u32, retry_count: u8) -> Decision {
    let Some(candidate) = raw.candidates.first() else {
        return rejected("no-candidates");
    };

    match &candidate.finish_reason {
        None | Some(FinishReason::Stop) => {}
        Some(FinishReason::MaxTokens) => {
            if retry_count == 0 && budget > RETRY_TOKEN_BUDGET {
                return Decision::Retry {
                    budget: RETRY_TOKEN_BUDGET,
                };
            }
            return match candidate.usable_text() {
                Some(text) => Decision::Done(GenerationResult::AcceptedPartial {
                    text: format!("{}{}", text, PARTIAL_MARKER),
                }),
                None => rejected(&FinishReason::MaxTokens.to_string()),
            };
        }
        Some(reason) => return rejected(&reason.to_string()),
    }

    match candidate.usable_text() {
        Some(text) => Decision::Done(GenerationResult::Accepted {
            text: text.to_string(),
        }),
        None => rejected("empty-text"),
    }
}

fn rejected(reason: &str) -> Decision {
    Decision::Done(GenerationResult::Rejected {
        reason: reason.to_string(),
    })
}
