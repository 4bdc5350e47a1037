pub mod research;

pub mod settings {
    use serde::{Deserialize, Serialize};
    use std::fmt;
    use std::str::FromStr;

    fn default_true() -> bool {
        true
    }

    /// Which LLM service handles a research run.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
    #[serde(rename_all = "lowercase")]
    pub enum ApiProvider {
        #[default]
        Gemini,
        OpenRouter,
    }

    impl ApiProvider {
        pub fn as_str(&self) -> &'static str {
            match self {
                ApiProvider::Gemini => "gemini",
                ApiProvider::OpenRouter => "openrouter",
            }
        }

        pub fn display_name(&self) -> &'static str {
            match self {
                ApiProvider::Gemini => "Gemini",
                ApiProvider::OpenRouter => "OpenRouter",
            }
        }
    }

    impl fmt::Display for ApiProvider {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.display_name())
        }
    }

    impl FromStr for ApiProvider {
        type Err = SettingsError;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s.trim().to_lowercase().as_str() {
                "gemini" => Ok(ApiProvider::Gemini),
                "openrouter" => Ok(ApiProvider::OpenRouter),
                other => Err(SettingsError::UnknownProvider(other.to_string())),
            }
        }
    }

    /// Models offered for OpenRouter. Anything outside this list is rejected.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
    pub enum OpenRouterModel {
        #[default]
        #[serde(rename = "google/gemma-7b-it")]
        Gemma7bIt,
        #[serde(rename = "mistralai/mistral-7b-instruct-v0.2")]
        Mistral7bInstruct,
        #[serde(rename = "nousresearch/nous-hermes-2-mistral-7b-dpo")]
        NousHermes2Mistral7bDpo,
        #[serde(rename = "openchat/openchat-7b")]
        OpenChat7b,
        #[serde(rename = "huggingfaceh4/zephyr-7b-beta")]
        Zephyr7bBeta,
    }

    impl OpenRouterModel {
        pub fn all() -> &'static [OpenRouterModel] {
            &[
                OpenRouterModel::Gemma7bIt,
                OpenRouterModel::Mistral7bInstruct,
                OpenRouterModel::NousHermes2Mistral7bDpo,
                OpenRouterModel::OpenChat7b,
                OpenRouterModel::Zephyr7bBeta,
            ]
        }

        /// Model identifier as OpenRouter expects it in the request body.
        pub fn as_str(&self) -> &'static str {
            match self {
                OpenRouterModel::Gemma7bIt => "google/gemma-7b-it",
                OpenRouterModel::Mistral7bInstruct => "mistralai/mistral-7b-instruct-v0.2",
                OpenRouterModel::NousHermes2Mistral7bDpo => {
                    "nousresearch/nous-hermes-2-mistral-7b-dpo"
                }
                OpenRouterModel::OpenChat7b => "openchat/openchat-7b",
                OpenRouterModel::Zephyr7bBeta => "huggingfaceh4/zephyr-7b-beta",
            }
        }
    }

    impl fmt::Display for OpenRouterModel {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.as_str())
        }
    }

    impl FromStr for OpenRouterModel {
        type Err = SettingsError;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            let wanted = s.trim();
            OpenRouterModel::all()
                .iter()
                .copied()
                .find(|m| m.as_str() == wanted)
                .ok_or_else(|| SettingsError::UnknownModel(wanted.to_string()))
        }
    }

    /// Configuration for a single research run. Only the credential of the
    /// selected provider is carried.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(tag = "provider", rename_all = "lowercase")]
    pub enum ProviderConfig {
        Gemini {
            api_key: String,
            /// Attach Google Search grounding to search-enabled requests.
            #[serde(default = "default_true")]
            grounding: bool,
        },
        OpenRouter {
            api_key: String,
            #[serde(default)]
            model: OpenRouterModel,
        },
    }

    impl ProviderConfig {
        pub fn provider(&self) -> ApiProvider {
            match self {
                ProviderConfig::Gemini { .. } => ApiProvider::Gemini,
                ProviderConfig::OpenRouter { .. } => ApiProvider::OpenRouter,
            }
        }
    }

    /// Persisted front-end settings. Both keys are kept so switching provider
    /// does not lose the other one.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ResearchSettings {
        #[serde(default)]
        pub provider: ApiProvider,
        #[serde(default)]
        pub gemini_key: String,
        #[serde(default)]
        pub openrouter_key: String,
        #[serde(default)]
        pub openrouter_model: OpenRouterModel,
        #[serde(default = "default_true")]
        pub gemini_grounding: bool,
    }

    impl Default for ResearchSettings {
        fn default() -> Self {
            Self {
                provider: ApiProvider::Gemini,
                gemini_key: String::new(),
                openrouter_key: String::new(),
                openrouter_model: OpenRouterModel::default(),
                gemini_grounding: true,
            }
        }
    }

    impl ResearchSettings {
        /// Project onto the config of the selected provider.
        pub fn provider_config(&self) -> ProviderConfig {
            match self.provider {
                ApiProvider::Gemini => ProviderConfig::Gemini {
                    api_key: self.gemini_key.clone(),
                    grounding: self.gemini_grounding,
                },
                ApiProvider::OpenRouter => ProviderConfig::OpenRouter {
                    api_key: self.openrouter_key.clone(),
                    model: self.openrouter_model,
                },
            }
        }

        /// The selected provider must have a non-blank key before settings are saved.
        pub fn validate(&self) -> Result<(), SettingsError> {
            let key = match self.provider {
                ApiProvider::Gemini => &self.gemini_key,
                ApiProvider::OpenRouter => &self.openrouter_key,
            };
            if key.trim().is_empty() {
                return Err(SettingsError::MissingKey {
                    provider: self.provider,
                });
            }
            Ok(())
        }

        pub fn is_configured(&self) -> bool {
            self.validate().is_ok()
        }
    }

    #[derive(Debug, thiserror::Error, PartialEq, Eq)]
    pub enum SettingsError {
        #[error("{provider} API Key is required.")]
        MissingKey { provider: ApiProvider },

        #[error("Unknown provider: {0}")]
        UnknownProvider(String),

        #[error("Unsupported OpenRouter model: {0}")]
        UnknownModel(String),
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_default_settings_use_gemini_and_first_model() {
            let settings = ResearchSettings::default();
            assert_eq!(settings.provider, ApiProvider::Gemini);
            assert_eq!(settings.openrouter_model.as_str(), "google/gemma-7b-it");
            assert!(settings.gemini_grounding);
            assert!(!settings.is_configured());
        }

        #[test]
        fn test_validate_reports_selected_provider() {
            let mut settings = ResearchSettings {
                gemini_key: "g-key".into(),
                ..Default::default()
            };
            assert!(settings.validate().is_ok());

            settings.provider = ApiProvider::OpenRouter;
            settings.openrouter_key = "   ".into();
            let err = settings.validate().unwrap_err();
            assert_eq!(err.to_string(), "OpenRouter API Key is required.");
        }

        #[test]
        fn test_provider_config_carries_only_selected_key() {
            let settings = ResearchSettings {
                provider: ApiProvider::OpenRouter,
                gemini_key: "g-key".into(),
                openrouter_key: "or-key".into(),
                openrouter_model: OpenRouterModel::Zephyr7bBeta,
                gemini_grounding: true,
            };
            let config = settings.provider_config();
            assert_eq!(
                config,
                ProviderConfig::OpenRouter {
                    api_key: "or-key".into(),
                    model: OpenRouterModel::Zephyr7bBeta,
                }
            );
            assert_eq!(config.provider(), ApiProvider::OpenRouter);
        }

        #[test]
        fn test_model_parse_rejects_unknown_ids() {
            assert_eq!(
                "openchat/openchat-7b".parse::<OpenRouterModel>(),
                Ok(OpenRouterModel::OpenChat7b)
            );
            assert!("openai/gpt-4o".parse::<OpenRouterModel>().is_err());
        }

        #[test]
        fn test_settings_json_shape() {
            let json = serde_json::json!({
                "provider": "openrouter",
                "openrouter_key": "k",
                "openrouter_model": "mistralai/mistral-7b-instruct-v0.2"
            });
            let settings: ResearchSettings = serde_json::from_value(json).unwrap();
            assert_eq!(settings.provider, ApiProvider::OpenRouter);
            assert_eq!(settings.openrouter_model, OpenRouterModel::Mistral7bInstruct);
            assert!(settings.gemini_key.is_empty());
            assert!(settings.gemini_grounding);
        }

        #[test]
        fn test_provider_config_is_tagged() {
            let config = ProviderConfig::Gemini {
                api_key: "k".into(),
                grounding: false,
            };
            let value = serde_json::to_value(&config).unwrap();
            assert_eq!(value["provider"], "gemini");
            assert_eq!(value["grounding"], false);
        }
    }
}
