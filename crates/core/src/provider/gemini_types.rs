use serde::{Deserialize, Deserializer, Serialize};

use crate::responder::{Answer, NO_ANSWER_MESSAGE, Source};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GenerateContentRequest<'a> {
    pub(super) contents: Vec<Content<'a>>,
    pub(super) tools: Vec<Tool>,
    pub(super) system_instruction: Content<'a>,
}

impl<'a> GenerateContentRequest<'a> {
    pub(super) fn new(prompt: &'a str, system_instruction: &'a str) -> Self {
        Self {
            contents: vec![Content::text(prompt)],
            tools: vec![Tool::google_search()],
            system_instruction: Content::text(system_instruction),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct Content<'a> {
    pub(super) parts: Vec<TextPart<'a>>,
}

impl<'a> Content<'a> {
    fn text(text: &'a str) -> Self {
        Self {
            parts: vec![TextPart { text }],
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct TextPart<'a> {
    pub(super) text: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct Tool {
    pub(super) google_search: GoogleSearch,
}

impl Tool {
    fn google_search() -> Self {
        Self {
            google_search: GoogleSearch {},
        }
    }
}

/// Serializes as `{}`; its presence alone enables search grounding.
#[derive(Debug, Serialize)]
pub(super) struct GoogleSearch {}

/// Lists the API leaves out may also arrive as explicit `null`.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Deserialize)]
pub(super) struct GenerateContentResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub(super) candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct Candidate {
    pub(super) content: Option<CandidateContent>,
    pub(super) grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CandidateContent {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub(super) parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Part {
    pub(super) text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GroundingMetadata {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub(super) grounding_attributions: Vec<GroundingEntry>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub(super) grounding_chunks: Vec<GroundingEntry>,
}

/// Shared shape of `groundingAttributions` and `groundingChunks` items.
#[derive(Debug, Deserialize)]
pub(super) struct GroundingEntry {
    pub(super) web: Option<WebSource>,
}

#[derive(Debug, Deserialize)]
pub(super) struct WebSource {
    pub(super) uri: String,
    pub(super) title: String,
}

impl GenerateContentResponse {
    /// Reduces the response to what the user sees: the first candidate's
    /// first text part and, when that text exists, its web citations.
    pub(super) fn into_answer(self) -> Answer {
        let Some(candidate) = self.candidates.into_iter().next() else {
            return Answer::from_message(NO_ANSWER_MESSAGE);
        };
        let Some(text) = candidate.answer_text() else {
            return Answer::from_message(NO_ANSWER_MESSAGE);
        };

        let sources = candidate
            .grounding_metadata
            .map(GroundingMetadata::into_sources)
            .unwrap_or_default();

        Answer { text, sources }
    }
}

impl Candidate {
    fn answer_text(&self) -> Option<String> {
        let Some(content) = &self.content else {
            return None;
        };
        let Some(part) = content.parts.first() else {
            return None;
        };
        match &part.text {
            Some(text) if !text.is_empty() => Some(text.clone()),
            _ => None,
        }
    }
}

impl GroundingMetadata {
    fn into_sources(self) -> Vec<Source> {
        // Newer models only report chunks.
        let entries = if self.grounding_attributions.is_empty() {
            self.grounding_chunks
        } else {
            self.grounding_attributions
        };

        entries
            .into_iter()
            .filter_map(|entry| entry.web)
            .map(|web| Source {
                title: web.title,
                uri: web.uri,
            })
            .collect()
    }
}
