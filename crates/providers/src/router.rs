use crate::error::ProviderError;
use crate::gemini::GeminiClient;
use crate::openrouter::OpenRouterClient;
use crate::sources::RawSource;
use crate::transport::{HttpTransport, ReqwestTransport};
use shared::settings::{ApiProvider, ProviderConfig};
use std::sync::Arc;

/// Raw provider output: completion text plus unvalidated citation candidates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Generation {
    pub text: String,
    pub sources: Vec<RawSource>,
}

/// Search-enabled calls run a little warmer.
pub(crate) fn temperature_for(use_search: bool) -> f64 {
    if use_search {
        0.5
    } else {
        0.2
    }
}

/// The selected provider. Callers only see `generate`.
pub enum ProviderClient {
    Gemini(GeminiClient),
    OpenRouter(OpenRouterClient),
}

impl ProviderClient {
    /// Build a client for `config` over the shared reqwest transport.
    pub fn from_config(config: &ProviderConfig) -> Self {
        Self::with_transport(config, Arc::new(ReqwestTransport::new()))
    }

    pub fn with_transport(config: &ProviderConfig, transport: Arc<dyn HttpTransport>) -> Self {
        match config {
            ProviderConfig::Gemini { api_key, grounding } => ProviderClient::Gemini(
                GeminiClient::new(api_key.clone(), transport).with_grounding(*grounding),
            ),
            ProviderConfig::OpenRouter { api_key, model } => ProviderClient::OpenRouter(
                OpenRouterClient::new(api_key.clone(), *model, transport),
            ),
        }
    }

    pub fn provider(&self) -> ApiProvider {
        match self {
            ProviderClient::Gemini(_) => ApiProvider::Gemini,
            ProviderClient::OpenRouter(_) => ApiProvider::OpenRouter,
        }
    }

    /// Model id requests are sent to.
    pub fn model(&self) -> &str {
        match self {
            ProviderClient::Gemini(client) => client.model(),
            ProviderClient::OpenRouter(client) => client.model().as_str(),
        }
    }

    pub async fn generate(
        &self,
        prompt: &str,
        use_search: bool,
    ) -> Result<Generation, ProviderError> {
        match self {
            ProviderClient::Gemini(client) => client.generate(prompt, use_search).await,
            ProviderClient::OpenRouter(client) => client.generate(prompt, use_search).await,
        }
    }
}
