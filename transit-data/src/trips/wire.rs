//! Wire types for the lookup-list endpoints.
//!
//! The list endpoints have served both bare strings and `{ "label": ... }`
//! objects. Both shapes are accepted and normalised to strings.

use log::debug;
use serde::Deserialize;

/// One entry of a lookup list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum LookupItem {
    /// A bare identifier.
    Text(String),
    /// A numeric identifier.
    Number(serde_json::Number),
    /// An object carrying the identifier in `label`.
    Labelled { label: Option<String> },
    /// Anything else; skipped.
    Other(serde_json::Value),
}

impl LookupItem {
    fn into_label(self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text),
            Self::Number(number) => Some(number.to_string()),
            Self::Labelled { label } => label,
            Self::Other(value) => {
                debug!("skipping unrecognised lookup entry {value}");
                None
            }
        }
    }
}

/// Normalise a decoded lookup list, dropping blank and unusable entries.
pub(crate) fn labels(items: Vec<LookupItem>) -> Vec<String> {
    items
        .into_iter()
        .filter_map(LookupItem::into_label)
        .filter(|label| !label.trim().is_empty())
        .collect()
}
