use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::error::Category;
use thiserror::Error;
use tracing::{debug, error, instrument};
use url::Url;

use super::gemini_types::{GenerateContentRequest, GenerateContentResponse};
use crate::config::{Config, resolve_api_key};
use crate::responder::{
    Answer, PARSE_FAILURE_MESSAGE, REQUEST_FAILURE_MESSAGE, Responder,
    UNEXPECTED_FAILURE_MESSAGE,
};

/// Ways a single `generateContent` call can fail.
#[derive(Error, Debug)]
pub enum ResponderError {
    #[error("request failed: {0}")]
    Request(reqwest::Error),
    #[error("request failed with status {status}")]
    Status { status: StatusCode, body: String },
    #[error("failed to parse JSON response: {source}")]
    Parse {
        source: serde_json::Error,
        body: String,
    },
    #[error("unexpected response: {0}")]
    Unexpected(String),
}

impl ResponderError {
    /// The message shown to the user in place of an answer.
    pub fn user_message(&self) -> &'static str {
        match self {
            ResponderError::Request(_) | ResponderError::Status { .. } => REQUEST_FAILURE_MESSAGE,
            ResponderError::Parse { .. } => PARSE_FAILURE_MESSAGE,
            ResponderError::Unexpected(_) => UNEXPECTED_FAILURE_MESSAGE,
        }
    }

    fn log(&self) {
        match self {
            ResponderError::Request(_) => {
                error!(error = %self, "An error occurred during the API request");
            }
            ResponderError::Status { body, .. } => {
                error!(error = %self, body = %body, "An error occurred during the API request");
            }
            ResponderError::Parse { body, .. } => {
                error!(error = %self, body = %body, "Failed to parse JSON response");
            }
            ResponderError::Unexpected(_) => {
                error!(error = %self, "An unexpected error occurred");
            }
        }
    }
}

impl From<reqwest::Error> for ResponderError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL carries the API key.
        ResponderError::Request(err.without_url())
    }
}

/// Answers prompts with a Gemini `generateContent` call grounded by Google
/// Search.
pub struct GeminiResponder {
    client: Client,
    endpoint: Url,
    api_key: String,
    system_instruction: String,
}

impl std::fmt::Debug for GeminiResponder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiResponder")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl GeminiResponder {
    pub fn new(config: &Config) -> Result<Self> {
        let api_key = resolve_api_key(&config.api_key).context("Failed to resolve api_key")?;

        Ok(Self {
            client: Client::new(),
            endpoint: config.endpoint.clone(),
            api_key,
            system_instruction: config.system_instruction.clone(),
        })
    }

    fn request_url(&self) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("key", &self.api_key);
        url
    }

    /// Performs one request. Unlike [`Responder::respond`], failures are
    /// returned to the caller.
    pub async fn generate(&self, prompt: &str) -> Result<Answer, ResponderError> {
        let request = GenerateContentRequest::new(prompt, &self.system_instruction);

        let response = self
            .client
            .post(self.request_url())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(%status, bytes = body.len(), "received response");

        if !status.is_success() {
            return Err(ResponderError::Status { status, body });
        }

        let parsed: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|source| match source.classify() {
                Category::Syntax | Category::Eof => ResponderError::Parse {
                    source,
                    body: body.clone(),
                },
                Category::Data | Category::Io => ResponderError::Unexpected(source.to_string()),
            })?;

        Ok(parsed.into_answer())
    }
}

#[async_trait]
impl Responder for GeminiResponder {
    #[instrument(skip_all)]
    async fn respond(&self, prompt: &str) -> Answer {
        match self.generate(prompt).await {
            Ok(answer) => answer,
            Err(err) => {
                err.log();
                Answer::from_message(err.user_message())
            }
        }
    }
}
