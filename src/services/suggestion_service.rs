use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::SuggestionConfig;

/// Served whenever the external provider cannot produce a suggestion.
pub const FALLBACK_SUGGESTION: &str = "Wear a funny hat for the next meeting.";

/// Prompt sent to the text generation endpoint.
const SUGGESTION_PROMPT: &str = "Suggest one short, fun, office-safe dare a coworker could \
     perform at work. Reply with the dare text only, no quotes or preamble.";

/// Dare idea generator backed by a Gemini-style generate-content endpoint.
///
/// Failures never surface to callers; any problem along the way degrades
/// to [`FALLBACK_SUGGESTION`].
pub struct SuggestionProvider {
    config: SuggestionConfig,
    client: reqwest::Client,
}

impl SuggestionProvider {
    /// Build a provider over the configured endpoint.
    pub fn new(config: SuggestionConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Produce one dare idea, falling back to the stock suggestion.
    pub async fn suggest(&self) -> String {
        let Some(api_key) = self.config.api_key.as_deref() else {
            debug!("no suggestion API key configured; serving fallback");
            return FALLBACK_SUGGESTION.to_string();
        };

        match self.fetch(api_key).await {
            Ok(Some(text)) => text,
            Ok(None) => {
                warn!("suggestion provider returned no text; serving fallback");
                FALLBACK_SUGGESTION.to_string()
            }
            Err(err) => {
                warn!(error = %err, "suggestion request failed; serving fallback");
                FALLBACK_SUGGESTION.to_string()
            }
        }
    }

    async fn fetch(&self, api_key: &str) -> Result<Option<String>, reqwest::Error> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: SUGGESTION_PROMPT.to_string(),
                }],
            }],
        };

        let response: GenerateContentResponse = self
            .client
            .post(&self.config.api_url)
            .query(&[("key", api_key)])
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response.first_text())
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
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

impl GenerateContentResponse {
    /// First non-blank text part across candidates.
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .filter_map(|candidate| candidate.content)
            .flat_map(|content| content.parts)
            .map(|part| part.text.trim().to_string())
            .find(|text| !text.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_api_key_serves_fallback() {
        let provider = SuggestionProvider::new(SuggestionConfig {
            api_url: "http://localhost:9/unused".into(),
            api_key: None,
        });
        assert_eq!(provider.suggest().await, FALLBACK_SUGGESTION);
    }

    #[tokio::test]
    async fn unreachable_endpoint_serves_fallback() {
        let provider = SuggestionProvider::new(SuggestionConfig {
            // Port 9 (discard) is never serving HTTP.
            api_url: "http://127.0.0.1:9/generate".into(),
            api_key: Some("test-key".into()),
        });
        assert_eq!(provider.suggest().await, FALLBACK_SUGGESTION);
    }

    #[test]
    fn first_text_skips_blank_candidates() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [
                {"content": {"parts": [{"text": "   "}]}},
                {"content": {"parts": [{"text": "Sing a jingle."}]}}
            ]}"#,
        )
        .expect("valid response");
        assert_eq!(response.first_text().as_deref(), Some("Sing a jingle."));
    }
}
