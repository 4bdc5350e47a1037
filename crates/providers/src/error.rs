use serde::de::DeserializeOwned;
use shared::settings::ApiProvider;

/// Longest response body quoted back in an error message.
const MAX_ERROR_BODY_CHARS: usize = 800;
const TRUNCATION_MARKER: &str = "...(truncated)";

#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    /// Credential missing; raised before any request is made.
    #[error("{provider} API Key is not configured.")]
    Configuration { provider: ApiProvider },

    #[error("{provider} API error: {status} - {body}")]
    Status {
        provider: ApiProvider,
        status: u16,
        body: String,
    },

    #[error("{provider} request failed: {message}")]
    Transport {
        provider: ApiProvider,
        message: String,
    },

    #[error("{provider} returned an unexpected response: {detail}")]
    UnexpectedResponseShape {
        provider: ApiProvider,
        detail: String,
    },
}

impl ProviderError {
    pub(crate) fn status(provider: ApiProvider, status: u16, body: &str) -> Self {
        let body = body.trim();
        let body = if body.chars().count() > MAX_ERROR_BODY_CHARS {
            let kept: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
            format!("{}{}", kept, TRUNCATION_MARKER)
        } else {
            body.to_string()
        };
        ProviderError::Status {
            provider,
            status,
            body,
        }
    }
}

/// Decode a provider response body. The body must be a JSON object; fields
/// missing inside it fall back to the schema's defaults.
pub(crate) fn decode_json<T: DeserializeOwned>(
    provider: ApiProvider,
    body: &str,
) -> Result<T, ProviderError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| ProviderError::UnexpectedResponseShape {
            provider,
            detail: format!("body is not JSON ({})", e),
        })?;
    if !value.is_object() {
        return Err(ProviderError::UnexpectedResponseShape {
            provider,
            detail: "body is not a JSON object".to_string(),
        });
    }
    serde_json::from_value(value).map_err(|e| ProviderError::UnexpectedResponseShape {
        provider,
        detail: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_message() {
        let err = ProviderError::Configuration {
            provider: ApiProvider::OpenRouter,
        };
        assert_eq!(err.to_string(), "OpenRouter API Key is not configured.");
    }

    #[test]
    fn test_status_body_is_truncated() {
        let long = "x".repeat(2000);
        let err = ProviderError::status(ApiProvider::Gemini, 500, &long);
        match &err {
            ProviderError::Status { body, .. } => {
                assert_eq!(body.len(), 800 + TRUNCATION_MARKER.len());
                assert!(body.ends_with("x...(truncated)"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().starts_with("Gemini API error: 500 - "));
    }

    #[test]
    fn test_short_status_body_is_kept_whole() {
        let body = "y".repeat(800);
        let err = ProviderError::status(ApiProvider::OpenRouter, 400, &format!("  {body}\n"));
        assert_eq!(err.to_string(), format!("OpenRouter API error: 400 - {body}"));
    }

    #[derive(Debug, serde::Deserialize)]
    struct Shape {
        #[serde(default)]
        items: Vec<String>,
    }

    #[test]
    fn test_decode_defaults_missing_fields() {
        let shape: Shape = decode_json(ApiProvider::Gemini, "{}").unwrap();
        assert!(shape.items.is_empty());
    }

    #[test]
    fn test_decode_rejects_non_objects() {
        for body in ["not json", "[1, 2]", "null", r#"{"items": 7}"#] {
            let err = decode_json::<Shape>(ApiProvider::OpenRouter, body).unwrap_err();
            assert!(
                matches!(err, ProviderError::UnexpectedResponseShape { .. }),
                "body {body:?} gave {err:?}"
            );
        }
    }
}
