//! Gemini outline provider
//!
//! Calls the `generateContent` REST method with a JSON response schema and
//! returns the text of the first candidate.

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::SynthConfig;
use crate::error::ProviderError;
use crate::provider::{OutlineProvider, SynthesisRequest};

/// Provider backed by the Gemini REST API
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    endpoint: String,
    model: String,
    api_key: String,
    client: Client,
}

impl GeminiProvider {
    /// Create a provider from settings
    ///
    /// Fails when no API key is configured or the HTTP client cannot be
    /// built.
    pub fn from_config(config: &SynthConfig) -> Result<Self, ProviderError> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ProviderError::MissingApiKey {
                provider: "gemini".to_string(),
            })?
            .to_string();

        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            client,
        })
    }

    /// Model name
    pub fn model(&self) -> &str {
        &self.model
    }

    /// URL of the `generateContent` method for the configured model
    pub fn request_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

/// Request body for one structured-output call
pub fn request_body(request: &SynthesisRequest) -> Value {
    json!({
        "contents": [{ "parts": [{ "text": request.brief }] }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": request.schema,
        }
    })
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Concatenated text parts of the first candidate
fn first_candidate_text(response: GenerateContentResponse) -> String {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .unwrap_or_default()
}

impl OutlineProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn generate(&self, request: &SynthesisRequest) -> Result<String, ProviderError> {
        debug!(model = %self.model, output_type = %request.output_type, "Calling Gemini");

        let response = self
            .client
            .post(self.request_url())
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body(request))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ProviderError::ServerError {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateContentResponse = response
            .json()
            .map_err(|e| ProviderError::UnexpectedResponse(e.to_string()))?;
        Ok(first_candidate_text(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docugen_ast::{GenerationParams, Language, OutputType, Tone};

    fn config_with_key(key: Option<&str>) -> SynthConfig {
        SynthConfig {
            endpoint: "http://localhost:9/v1beta/".to_string(),
            api_key: key.map(str::to_string),
            ..SynthConfig::default()
        }
    }

    #[test]
    fn test_missing_key_rejected() {
        let err = GeminiProvider::from_config(&config_with_key(None)).unwrap_err();
        assert!(matches!(err, ProviderError::MissingApiKey { .. }));

        let err = GeminiProvider::from_config(&config_with_key(Some("  "))).unwrap_err();
        assert!(matches!(err, ProviderError::MissingApiKey { .. }));
    }

    #[test]
    fn test_request_url() {
        let provider = GeminiProvider::from_config(&config_with_key(Some("k"))).unwrap();
        assert_eq!(
            provider.request_url(),
            "http://localhost:9/v1beta/models/gemini-3-flash-preview:generateContent"
        );
        assert_eq!(provider.name(), "gemini");
    }

    #[test]
    fn test_request_body() {
        let params =
            GenerationParams::new("Topic", OutputType::Slides, Tone::Simple, 3, Language::English)
                .unwrap();
        let request = SynthesisRequest::for_params(&params);

        let body = request_body(&request);
        assert_eq!(body["contents"][0]["parts"][0]["text"], json!(request.brief));
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            json!("application/json")
        );
        assert_eq!(body["generationConfig"]["responseSchema"], request.schema);
    }

    #[test]
    fn test_first_candidate_text() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                { "content": { "parts": [{ "text": "{\"title\":" }, { "text": "\"T\"}" }] } },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ]
        }))
        .unwrap();
        assert_eq!(first_candidate_text(response), "{\"title\":\"T\"}");

        let empty: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(first_candidate_text(empty), "");
    }
}
