use async_trait::async_trait;

pub use crate::provider::gemini::{GeminiResponder, ResponderError};

pub const NO_ANSWER_MESSAGE: &str = "I'm sorry, I couldn't find an answer to that question. Please try asking in a different way or be more specific about Cornell University.";
pub const REQUEST_FAILURE_MESSAGE: &str = "An error occurred while fetching the response. Please check your API key and network connection.";
pub const PARSE_FAILURE_MESSAGE: &str = "An error occurred while processing the response.";
pub const UNEXPECTED_FAILURE_MESSAGE: &str = "An unexpected error occurred. Please try again later.";

/// A web page the model cited while grounding its answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub title: String,
    pub uri: String,
}

/// Result of a single question. Failures are folded into `text` with no
/// sources, so every call yields exactly one `Answer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub text: String,
    pub sources: Vec<Source>,
}

impl Answer {
    pub fn from_message(message: &str) -> Self {
        Self {
            text: message.to_string(),
            sources: Vec::new(),
        }
    }
}

/// Answers a single prompt.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Never fails; errors are logged and turned into a user-facing message.
    async fn respond(&self, prompt: &str) -> Answer;
}
