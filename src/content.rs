//! Static key-value text lookup with caller-supplied fallbacks.
//!
//! Content originates from static configuration shipped with the app; it is
//! read-only at runtime.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentStore {
    entries: HashMap<String, String>,
}

impl ContentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Parses a flat `{"key": "value"}` JSON document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let entries: HashMap<String, String> = serde_json::from_str(json)?;
        Ok(Self { entries })
    }

    /// Returns the stored value for `key` if present and non-empty,
    /// else the caller's default.
    #[must_use]
    pub fn get<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        match self.entries.get(key) {
            Some(value) if !value.is_empty() => value,
            _ => default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_stored_value() {
        let store = ContentStore::from_pairs([("greeting", "Selamat datang")]);
        assert_eq!(store.get("greeting", "Welcome"), "Selamat datang");
    }

    #[test]
    fn falls_back_on_missing_key() {
        let store = ContentStore::new();
        assert_eq!(store.get("greeting", "Welcome"), "Welcome");
    }

    #[test]
    fn falls_back_on_empty_value() {
        let store = ContentStore::from_pairs([("greeting", "")]);
        assert_eq!(store.get("greeting", "Welcome"), "Welcome");
    }

    #[test]
    fn parses_json_config() {
        let store = ContentStore::from_json(r#"{"cta": "Pesan sekarang"}"#).unwrap();
        assert_eq!(store.get("cta", "Order now"), "Pesan sekarang");
    }
}
