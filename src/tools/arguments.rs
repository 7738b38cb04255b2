//! Typed access to tool call arguments.

use serde_json::Value;

use crate::api::Page;
use crate::error::HubError;

/// Wrapper around tool call arguments providing typed extraction.
///
/// Agents are loose with types: integers arrive as `"10"`, lists as
/// `"a,b"`. The getters accept both forms.
#[derive(Debug, Clone)]
pub struct ToolArguments {
    value: Value,
}

impl ToolArguments {
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    /// Get the raw JSON value.
    pub fn raw(&self) -> &Value {
        &self.value
    }

    fn get(&self, key: &str) -> Option<&Value> {
        self.value.get(key).filter(|v| !v.is_null())
    }

    /// Get a non-blank string argument.
    pub fn get_str(&self, key: &str) -> Result<&str, HubError> {
        self.get_str_opt(key)
            .ok_or_else(|| HubError::InvalidArgument(format!("Missing string argument: {key}")))
    }

    /// Get an optional string argument; blank strings count as absent.
    pub fn get_str_opt(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    pub fn get_str_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get_str_opt(key).unwrap_or(default)
    }

    /// The caller's access token, required by most tools.
    pub fn token(&self) -> Result<&str, HubError> {
        self.get_str_opt("token").ok_or(HubError::MissingToken)
    }

    /// Get a non-negative integer argument.
    pub fn get_u64(&self, key: &str) -> Result<u64, HubError> {
        self.get_u64_opt(key)?
            .ok_or_else(|| HubError::InvalidArgument(format!("Missing integer argument: {key}")))
    }

    pub fn get_u64_opt(&self, key: &str) -> Result<Option<u64>, HubError> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        let parsed = match value {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        parsed
            .map(Some)
            .ok_or_else(|| HubError::InvalidArgument(format!("Invalid integer argument: {key}")))
    }

    pub fn get_u64_or(&self, key: &str, default: u64) -> Result<u64, HubError> {
        Ok(self.get_u64_opt(key)?.unwrap_or(default))
    }

    pub fn get_f64_or(&self, key: &str, default: f64) -> Result<f64, HubError> {
        let Some(value) = self.get(key) else {
            return Ok(default);
        };
        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        parsed.ok_or_else(|| HubError::InvalidArgument(format!("Invalid float argument: {key}")))
    }

    pub fn get_bool_or(&self, key: &str, default: bool) -> Result<bool, HubError> {
        let Some(value) = self.get(key) else {
            return Ok(default);
        };
        let parsed = match value {
            Value::Bool(b) => Some(*b),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        parsed.ok_or_else(|| HubError::InvalidArgument(format!("Invalid boolean argument: {key}")))
    }

    /// Get a list of strings from an array or a comma-separated string.
    pub fn get_string_list(&self, key: &str) -> Result<Vec<String>, HubError> {
        let list: Vec<String> = match self.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            Some(Value::String(s)) => s
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            _ => Vec::new(),
        };
        if list.is_empty() {
            return Err(HubError::InvalidArgument(format!(
                "Missing array argument: {key}"
            )));
        }
        Ok(list)
    }

    /// `(per, page)` cursor with the usual defaults.
    pub fn page(&self, size_key: &str, default_size: u64) -> Result<Page, HubError> {
        Ok(Page::new(
            self.get_u64_or(size_key, default_size)?,
            self.get_u64_or("page", 1)?,
        ))
    }

    /// Deserialize the entire arguments into a typed struct.
    pub fn deserialize<T: serde::de::DeserializeOwned>(&self) -> Result<T, HubError> {
        serde_json::from_value(self.value.clone()).map_err(|e| {
            HubError::InvalidArgument(format!("Failed to deserialize arguments: {e}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn token_is_required_and_non_blank() {
        let args = ToolArguments::new(json!({"token": "  "}));
        assert!(matches!(args.token(), Err(HubError::MissingToken)));
        let args = ToolArguments::new(json!({}));
        assert!(matches!(args.token(), Err(HubError::MissingToken)));
        let args = ToolArguments::new(json!({"token": "t"}));
        assert_eq!(args.token().unwrap(), "t");
    }

    #[test]
    fn integers_accept_numeric_strings() {
        let args = ToolArguments::new(json!({"per": "20", "page": 2, "bad": "x"}));
        assert_eq!(args.get_u64("per").unwrap(), 20);
        assert_eq!(args.page("per", 10).unwrap(), Page::new(20, 2));
        assert!(args.get_u64("bad").is_err());
        assert_eq!(args.get_u64_or("missing", 5).unwrap(), 5);
    }

    #[test]
    fn page_defaults_apply() {
        let args = ToolArguments::new(json!({"page_size": null}));
        assert_eq!(args.page("page_size", 20).unwrap(), Page::new(20, 1));
    }

    #[test]
    fn string_lists_accept_arrays_and_commas() {
        let args = ToolArguments::new(json!({"a": ["x", " y "], "b": "x, y,", "c": []}));
        assert_eq!(args.get_string_list("a").unwrap(), vec!["x", "y"]);
        assert_eq!(args.get_string_list("b").unwrap(), vec!["x", "y"]);
        assert!(args.get_string_list("c").is_err());
    }

    #[test]
    fn floats_and_bools_fall_back_to_defaults() {
        let args = ToolArguments::new(json!({"lr": 0.5, "flag": "true"}));
        assert_eq!(args.get_f64_or("lr", 0.1).unwrap(), 0.5);
        assert_eq!(args.get_f64_or("missing", 0.1).unwrap(), 0.1);
        assert!(args.get_bool_or("flag", false).unwrap());
        assert!(!args.get_bool_or("missing", false).unwrap());
    }
}
