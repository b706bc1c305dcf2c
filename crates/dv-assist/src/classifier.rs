//! Text-generation client that suggests field values for a pasted command or URL.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use dv_core::{Category, Classification, CommandCategory, ContentKind, Platform, WebsiteCategory};
use dv_utils::{extract_json_object, redact};

use crate::error::{AssistError, AssistResult};

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-goog-api-key";

/// Content to classify.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassificationRequest {
    pub kind: ContentKind,
    /// Trimmed command text or URL.
    pub input: String,
}

impl ClassificationRequest {
    pub fn new(kind: ContentKind, input: impl Into<String>) -> Self {
        Self {
            kind,
            input: input.into().trim().to_string(),
        }
    }

    /// Prompt text sent to the model.
    pub fn prompt(&self) -> String {
        match self.kind {
            ContentKind::Command => {
                let categories = labels(CommandCategory::ALL);
                let platforms: Vec<String> = Platform::ALL
                    .iter()
                    .map(|platform| format!("{platform:?}").to_lowercase())
                    .collect();
                format!(
                    "You fill in a form for saving developer shell commands.\n\
                     Command: {input}\n\
                     Reply with only a JSON object shaped like \
                     {{\"title\": string, \"description\": string, \"category\": string, \
                     \"tags\": [string], \"platform\": string}}.\n\
                     The title is a short imperative phrase. The description is one sentence.\n\
                     category must be one of: {categories}.\n\
                     platform must be one of: {platforms}.",
                    input = self.input,
                    platforms = platforms.join(", "),
                )
            }
            ContentKind::Website => {
                let categories = labels(WebsiteCategory::ALL);
                format!(
                    "You fill in a form for bookmarking developer websites.\n\
                     URL: {input}\n\
                     Reply with only a JSON object shaped like \
                     {{\"name\": string, \"description\": string, \"category\": string, \
                     \"tags\": [string]}}.\n\
                     The name is the site's common name. The description is one sentence.\n\
                     category must be one of: {categories}.",
                    input = self.input,
                )
            }
        }
    }
}

fn labels<C: Category>(all: &[C]) -> String {
    all.iter()
        .map(|category| category.label())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A service that turns a pasted command or URL into field suggestions.
pub trait Classifier: Send + Sync + 'static {
    fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> impl Future<Output = AssistResult<Classification>> + Send;
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [GenerateContent<'a>; 1],
}

#[derive(Serialize)]
struct GenerateContent<'a> {
    parts: [GeneratePart<'a>; 1],
}

#[derive(Serialize)]
struct GeneratePart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Extract `candidates[0].content.parts[0].text` from a response body.
pub fn parse_envelope(body: &str) -> AssistResult<String> {
    let envelope: Envelope =
        serde_json::from_str(body).map_err(|err| AssistError::Envelope(err.to_string()))?;
    envelope
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().next())
        .and_then(|part| part.text)
        .ok_or_else(|| AssistError::Envelope("no candidate text".into()))
}

/// Parse the first JSON object embedded in model output.
pub fn parse_classification(text: &str) -> AssistResult<Classification> {
    let object = extract_json_object(text)
        .ok_or_else(|| AssistError::Parse("no JSON object in response".into()))?;
    serde_json::from_str(object).map_err(|err| AssistError::Parse(err.to_string()))
}

/// Classifier backed by a Gemini-style `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiClassifier {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl fmt::Debug for GeminiClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClassifier")
            .field("endpoint", &self.endpoint)
            .field("api_key", &redact(&self.api_key))
            .finish_non_exhaustive()
    }
}

impl GeminiClassifier {
    /// Build a client with a per-request timeout.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> AssistResult<Self> {
        let endpoint = endpoint.into();
        let api_key = api_key.into();
        if endpoint.trim().is_empty() {
            return Err(AssistError::Disabled("no endpoint configured".into()));
        }
        if api_key.trim().is_empty() {
            return Err(AssistError::Disabled("no API key available".into()));
        }
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    /// Endpoint requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Classifier for GeminiClassifier {
    async fn classify(&self, request: &ClassificationRequest) -> AssistResult<Classification> {
        let prompt = request.prompt();
        let body = GenerateRequest {
            contents: [GenerateContent {
                parts: [GeneratePart { text: &prompt }],
            }],
        };
        tracing::debug!(endpoint = %self.endpoint, kind = ?request.kind, "requesting suggestions");

        let response = self
            .client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AssistError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        parse_classification(&parse_envelope(&text)?)
    }
}
