//! Terminal output for research runs. Text is printed as the model wrote it.

use shared::research::{ResearchResult, Source};

pub fn plan_section(plan: &str) -> String {
    format!("== Research Plan ==\n\n{}\n", plan.trim_end())
}

pub fn report_section(result: &ResearchResult) -> String {
    let mut out = format!("== Synthesized Report ==\n\n{}\n", result.report_text.trim_end());
    if !result.sources.is_empty() {
        out.push_str("\n== Sources ==\n\n");
        out.push_str(&sources_list(&result.sources));
    }
    out
}

fn sources_list(sources: &[Source]) -> String {
    sources
        .iter()
        .enumerate()
        .map(|(i, s)| {
            if s.title == s.uri {
                format!("{}. {}\n", i + 1, s.uri)
            } else {
                format!("{}. {} <{}>\n", i + 1, s.title, s.uri)
            }
        })
        .collect()
}

/// Add a troubleshooting hint to a run error when the cause is recognizable.
pub fn format_error_message(error: &str) -> String {
    let error_lower = error.to_lowercase();

    if error_lower.contains("api key is not configured")
        || error_lower.contains("401")
        || error_lower.contains("unauthorized")
        || error_lower.contains("invalid api key")
    {
        return format!(
            "{}\n\nCheck your API key with `researcher config show` and update it with \
            `researcher config set`.",
            error
        );
    }

    if error_lower.contains("429")
        || error_lower.contains("rate limit")
        || error_lower.contains("too many requests")
    {
        return format!(
            "{}\n\nThe provider is rate limiting requests. Wait a moment and try again.",
            error
        );
    }

    if error_lower.contains("request failed")
        || error_lower.contains("connection")
        || error_lower.contains("timed out")
        || error_lower.contains("dns")
    {
        return format!("{}\n\nCheck your network connection.", error);
    }

    error.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_lists_sources_in_order() {
        let result = ResearchResult {
            report_text: "Body [1] [2]\n".into(),
            sources: vec![
                Source {
                    uri: "https://a".into(),
                    title: "Alpha".into(),
                },
                Source {
                    uri: "https://b".into(),
                    title: "https://b".into(),
                },
            ],
        };
        let text = report_section(&result);
        assert!(text.contains("Body [1] [2]\n"));
        assert!(text.contains("1. Alpha <https://a>\n2. https://b\n"));
    }

    #[test]
    fn test_report_without_sources_has_no_sources_heading() {
        let result = ResearchResult {
            report_text: "Inline citations only".into(),
            sources: Vec::new(),
        };
        assert!(!report_section(&result).contains("== Sources =="));
    }

    #[test]
    fn test_error_hints() {
        let missing = format_error_message(
            "Failed during research: Failed to generate a plan. Gemini API Key is not configured.",
        );
        assert!(missing.contains("researcher config set"));

        let limited = format_error_message("OpenRouter API error: 429 - slow down");
        assert!(limited.contains("rate limiting"));

        let other = format_error_message("something odd");
        assert_eq!(other, "something odd");
    }
}
