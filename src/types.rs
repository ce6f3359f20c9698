//! Common types used throughout the Helix client
//!
//! Shared type aliases and small utility types used across modules.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

// ============================================================================
// Backoff Type
// ============================================================================

/// Type of backoff for retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    Constant,
    /// Linear increase in delay
    Linear,
    /// Exponential increase in delay
    #[default]
    Exponential,
}

// ============================================================================
// Utilities
// ============================================================================

/// Extension trait for Option<String> to handle empty strings
pub trait OptionStringExt {
    /// Returns None if the string is empty
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.is_empty())
    }
}

impl OptionStringExt for String {
    fn none_if_empty(self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Request parameters: query key to one or more values.
///
/// Values are stored and sent exactly as given. A key with several values
/// (`id=1&id=2`) keeps them as a list in insertion order; keys iterate in
/// sorted order so requests are reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: BTreeMap<String, Vec<String>>,
}

impl QueryParams {
    /// Create an empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to a single value, replacing any previous values
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), vec![value.into()]);
    }

    /// Add one more value for `key`
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.entry(key.into()).or_default().push(value.into());
    }

    /// Add every value in `values` for `key`; no values leaves the key unset
    pub fn extend_key<I, V>(&mut self, key: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let key = key.into();
        for value in values {
            self.append(key.clone(), value);
        }
    }

    /// Remove `key` and all its values
    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.entries.remove(key)
    }

    /// First value for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key)?.first().map(String::as_str)
    }

    /// Every value for `key`
    pub fn get_all(&self, key: &str) -> &[String] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Wire pairs, one per value
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .flat_map(|(key, values)| values.iter().map(move |v| (key.as_str(), v.as_str())))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    /// Repeated keys accumulate into a list
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.append(key, value);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_type_serde() {
        let backoff: BackoffType = serde_json::from_str("\"linear\"").unwrap();
        assert_eq!(backoff, BackoffType::Linear);

        let json = serde_json::to_string(&BackoffType::Exponential).unwrap();
        assert_eq!(json, "\"exponential\"");
        assert_eq!(BackoffType::default(), BackoffType::Exponential);
    }

    #[test]
    fn test_option_string_none_if_empty() {
        assert_eq!(
            Some("test".to_string()).none_if_empty(),
            Some("test".to_string())
        );
        assert_eq!(Some(String::new()).none_if_empty(), None);
        assert_eq!(None::<String>.none_if_empty(), None);
        assert_eq!("test".to_string().none_if_empty(), Some("test".to_string()));
        assert_eq!(String::new().none_if_empty(), None);
    }

    #[test]
    fn test_query_params_keep_values_verbatim() {
        let mut params = QueryParams::new();
        params.set("query", "hello, world");
        params.set("after", "tok,en=");

        let pairs: Vec<_> = params.pairs().collect();
        assert_eq!(pairs, vec![("after", "tok,en="), ("query", "hello, world")]);
    }

    #[test]
    fn test_query_params_repeated_keys() {
        let params: QueryParams = [("id", "2"), ("first", "20"), ("id", "1")]
            .into_iter()
            .collect();

        assert_eq!(params.get("id"), Some("2"));
        assert_eq!(params.get_all("id"), ["2".to_string(), "1".to_string()]);
        let pairs: Vec<_> = params.pairs().collect();
        assert_eq!(pairs, vec![("first", "20"), ("id", "2"), ("id", "1")]);
    }

    #[test]
    fn test_query_params_set_replaces_list() {
        let mut params = QueryParams::new();
        params.extend_key("id", ["1", "2"]);
        params.set("id", "3");
        assert_eq!(params.get_all("id"), ["3".to_string()]);

        assert!(params.remove("id").is_some());
        assert!(params.is_empty());
        assert!(params.get_all("id").is_empty());

        params.extend_key("id", Vec::<String>::new());
        assert!(!params.contains_key("id"));
    }

    #[test]
    fn test_query_params_keep_empty_values() {
        let mut params = QueryParams::new();
        params.set("language", "");
        let pairs: Vec<_> = params.pairs().collect();
        assert_eq!(pairs, vec![("language", "")]);
    }
}
