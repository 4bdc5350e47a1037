//! Citation cleanup for provider responses.

use shared::research::Source;
use std::collections::HashSet;

/// A citation candidate as it came off the wire; either field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSource {
    pub uri: Option<String>,
    pub title: Option<String>,
}

impl RawSource {
    pub fn new(uri: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            uri: Some(uri.into()),
            title: Some(title.into()),
        }
    }
}

/// Drop candidates without a uri, default blank titles to the uri and keep
/// the first occurrence of each uri in input order.
pub fn normalize_sources<I>(raw: I) -> Vec<Source>
where
    I: IntoIterator<Item = RawSource>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    let mut dropped = 0usize;

    for candidate in raw {
        let uri = match candidate.uri {
            Some(uri) if !uri.trim().is_empty() => uri,
            _ => {
                dropped += 1;
                continue;
            }
        };
        if !seen.insert(uri.clone()) {
            continue;
        }
        let title = candidate
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| uri.clone());
        out.push(Source { uri, title });
    }

    if dropped > 0 {
        tracing::debug!("dropped {} source candidates without a uri", dropped);
    }
    out
}
