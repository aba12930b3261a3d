//! Concrete Gemini `generateContent` client behind the `ModelEndpoint`
//! capability. Everything upstream-specific (wire body, candidate/grounding
//! extraction, error classification) lives here; the rest of the crate only
//! sees the request/response contract.

use std::env;
use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::{json, Value};

use crate::capabilities::{ModelEndpoint, ModelRequest, ModelResponse, RequestPart};
use crate::error::AppError;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const API_KEY_ENV: &str = "GEMINI_API_KEY";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

pub struct GeminiEndpoint {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiEndpoint {
    pub fn new(api_key: impl Into<String>) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| AppError::Transport(err.to_string()))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    pub fn from_env() -> Result<Self, AppError> {
        let api_key = env::var(API_KEY_ENV)
            .map_err(|_| AppError::Validation(format!("{API_KEY_ENV} is not set")))?;
        Self::new(api_key)
    }

    /// Override the endpoint base, for local stubs.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn request_body(request: &ModelRequest) -> Value {
        let parts: Vec<Value> = request
            .parts
            .iter()
            .map(|part| match part {
                RequestPart::Text(text) => json!({ "text": text }),
                RequestPart::InlineData { data, mime_type } => json!({
                    "inlineData": { "data": data, "mimeType": mime_type }
                }),
            })
            .collect();

        let mut body = json!({ "contents": [{ "parts": parts }] });
        if let Some(instruction) = &request.system_instruction {
            body["systemInstruction"] = json!({ "parts": [{ "text": instruction }] });
        }
        if let Some(schema) = &request.response_schema {
            body["generationConfig"] = json!({
                "responseMimeType": "application/json",
                "responseSchema": schema,
            });
        }
        if request.maps_grounding {
            body["tools"] = json!([{ "googleMaps": {} }]);
        }
        if let Some((latitude, longitude)) = request.location {
            body["toolConfig"] = json!({
                "retrievalConfig": {
                    "latLng": { "latitude": latitude, "longitude": longitude }
                }
            });
        }
        body
    }
}

impl ModelEndpoint for GeminiEndpoint {
    fn generate(&self, request: &ModelRequest) -> Result<ModelResponse, AppError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, request.model, self.api_key
        );
        let response = self
            .client
            .post(&url)
            .json(&Self::request_body(request))
            .send()
            .map_err(|err| AppError::Transport(err.to_string()))?;

        let status = response.status();
        let payload: Value = response
            .json()
            .map_err(|err| AppError::Transport(err.to_string()))?;

        if !status.is_success() {
            let message = payload
                .pointer("/error/message")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string();
            return Err(AppError::classify_upstream(message));
        }

        Ok(parse_candidate(&payload))
    }
}

/// Pull the primary text and grounding chunks out of the first candidate.
fn parse_candidate(payload: &Value) -> ModelResponse {
    let candidate = payload.pointer("/candidates/0");
    let text = candidate
        .and_then(|c| c.pointer("/content/parts"))
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part.get("text").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();
    let grounding_chunks = candidate
        .and_then(|c| c.pointer("/groundingMetadata/groundingChunks"))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    ModelResponse {
        text,
        grounding_chunks,
    }
}
