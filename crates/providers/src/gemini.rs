use crate::error::{decode_json, ProviderError};
use crate::router::{temperature_for, Generation};
use crate::sources::RawSource;
use crate::transport::{HttpRequest, HttpTransport};
use serde::Deserialize;
use serde_json::json;
use shared::settings::ApiProvider;
use std::sync::Arc;

pub const GEMINI_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

// ── Response types ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Option<Vec<GeminiCandidate>>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiCandidateContent>,
    #[serde(default, rename = "groundingMetadata")]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Option<Vec<GeminiCandidatePart>>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GroundingMetadata {
    #[serde(default, rename = "groundingChunks")]
    grounding_chunks: Option<Vec<GroundingChunk>>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    #[serde(default)]
    web: Option<WebChunk>,
}

#[derive(Debug, Deserialize)]
struct WebChunk {
    #[serde(default)]
    uri: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

impl GeminiResponse {
    fn first_candidate(&self) -> Option<&GeminiCandidate> {
        self.candidates.as_ref().and_then(|c| c.first())
    }

    /// All text parts of the first candidate, concatenated.
    fn text(&self) -> String {
        self.first_candidate()
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.as_ref())
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }

    fn web_sources(self) -> Vec<RawSource> {
        self.candidates
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.grounding_metadata)
            .and_then(|m| m.grounding_chunks)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|chunk| chunk.web)
            .map(|web| RawSource {
                uri: web.uri,
                title: web.title,
            })
            .collect()
    }
}

// ── Client ───────────────────────────────────────────────────────────

/// Google Gemini client. Search-enabled calls can attach Google Search
/// grounding, whose metadata becomes the structured source list.
pub struct GeminiClient {
    transport: Arc<dyn HttpTransport>,
    api_key: String,
    model: String,
    base_url: String,
    grounding: bool,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            api_key: api_key.into(),
            model: GEMINI_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            grounding: true,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_grounding(mut self, grounding: bool) -> Self {
        self.grounding = grounding;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, prompt: &str, use_search: bool) -> HttpRequest {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let mut body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }],
            "generationConfig": {
                "temperature": temperature_for(use_search)
            }
        });
        if use_search && self.grounding {
            body["tools"] = json!([{ "googleSearch": {} }]);
        }
        HttpRequest {
            url,
            headers: vec![
                ("x-goog-api-key", self.api_key.clone()),
                ("Content-Type", "application/json".to_string()),
            ],
            body,
        }
    }

    pub async fn generate(
        &self,
        prompt: &str,
        use_search: bool,
    ) -> Result<Generation, ProviderError> {
        let provider = ApiProvider::Gemini;
        if self.api_key.trim().is_empty() {
            return Err(ProviderError::Configuration { provider });
        }

        let req = self.build_request(prompt, use_search);
        tracing::debug!(
            "gemini request: model={} search={} grounding={}",
            self.model,
            use_search,
            req.body.get("tools").is_some()
        );

        let resp = self
            .transport
            .post_json(req)
            .await
            .map_err(|e| ProviderError::Transport {
                provider,
                message: e.to_string(),
            })?;
        if !resp.is_success() {
            return Err(ProviderError::status(provider, resp.status, &resp.body));
        }

        let body: GeminiResponse = decode_json(provider, &resp.body)?;
        let text = body.text();
        let sources = if use_search {
            body.web_sources()
        } else {
            Vec::new()
        };
        tracing::debug!(
            "gemini response: {} chars, {} grounding chunks",
            text.len(),
            sources.len()
        );
        Ok(Generation { text, sources })
    }
}
