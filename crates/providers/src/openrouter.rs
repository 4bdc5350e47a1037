use crate::error::{decode_json, ProviderError};
use crate::router::{temperature_for, Generation};
use crate::transport::{HttpRequest, HttpTransport};
use serde::Deserialize;
use serde_json::json;
use shared::settings::{ApiProvider, OpenRouterModel};
use std::sync::Arc;

const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api";
const REFERER: &str = "https://example.com";
const APP_TITLE: &str = "AI Multi-Modal Researcher";

/// OpenRouter has no search tool, so search-enabled prompts ask for one.
pub const SEARCH_PREFIX: &str = "Using a web search, ";

// ── Response types ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Option<Vec<ChatChoice>>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// OpenRouter chat-completions client. Citations, if any, come back inline
/// in the text, so the source list is always empty.
pub struct OpenRouterClient {
    transport: Arc<dyn HttpTransport>,
    api_key: String,
    model: OpenRouterModel,
    base_url: String,
}

impl OpenRouterClient {
    pub fn new(
        api_key: impl Into<String>,
        model: OpenRouterModel,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            transport,
            api_key: api_key.into(),
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> OpenRouterModel {
        self.model
    }

    fn build_request(&self, prompt: &str, use_search: bool) -> HttpRequest {
        let content = if use_search {
            format!("{}{}", SEARCH_PREFIX, prompt)
        } else {
            prompt.to_string()
        };
        HttpRequest {
            url: format!("{}/v1/chat/completions", self.base_url),
            headers: vec![
                ("Authorization", format!("Bearer {}", self.api_key)),
                ("Content-Type", "application/json".to_string()),
                ("HTTP-Referer", REFERER.to_string()),
                ("X-Title", APP_TITLE.to_string()),
            ],
            body: json!({
                "model": self.model.as_str(),
                "messages": [{ "role": "user", "content": content }],
                "temperature": temperature_for(use_search),
            }),
        }
    }

    pub async fn generate(
        &self,
        prompt: &str,
        use_search: bool,
    ) -> Result<Generation, ProviderError> {
        let provider = ApiProvider::OpenRouter;
        if self.api_key.trim().is_empty() {
            return Err(ProviderError::Configuration { provider });
        }

        let req = self.build_request(prompt, use_search);
        tracing::debug!(
            "openrouter request: model={} search={}",
            self.model,
            use_search
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

        let body: ChatResponse = decode_json(provider, &resp.body)?;
        let text = body
            .choices
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .unwrap_or_default();
        if text.is_empty() {
            tracing::warn!("openrouter returned no completion content");
        }
        Ok(Generation {
            text,
            sources: Vec::new(),
        })
    }
}
