//! Request DTOs for the cache HTTP API
//!
//! Defines the structure of incoming query strings and request bodies.

use serde::Deserialize;

/// Query string carrying a single key (`GET`/`DELETE /api/cache?key=...`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeyQuery {
    #[serde(default)]
    pub key: Option<String>,
}

impl KeyQuery {
    /// Returns the key, or an error message if it is missing or blank.
    pub fn require_key(&self) -> Result<&str, String> {
        match self.key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(key),
            _ => Err("Key is required".to_string()),
        }
    }
}

/// Request body for `POST /api/cache` and `PUT /api/cache`
///
/// # Fields
/// - `key`: The cache key to store the value under
/// - `value`: The value to store
/// - `lifeTimeInSeconds`: Optional lifetime; zero or negative never expires
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddRequest {
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub life_time_in_seconds: Option<i64>,
}

impl AddRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.trim().is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        None
    }

    /// Lifetime as a TTL; only positive values expire.
    pub fn ttl_seconds(&self) -> Option<u64> {
        self.life_time_in_seconds
            .filter(|secs| *secs > 0)
            .map(|secs| secs as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_request_deserialize() {
        let json = r#"{"key": "test", "value": "hello"}"#;
        let req: AddRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.key, "test");
        assert_eq!(req.value, "hello");
        assert!(req.ttl_seconds().is_none());
    }

    #[test]
    fn test_add_request_with_lifetime() {
        let json = r#"{"key": "test", "value": "hello", "lifeTimeInSeconds": 60}"#;
        let req: AddRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.ttl_seconds(), Some(60));
    }

    #[test]
    fn test_negative_lifetime_never_expires() {
        let json = r#"{"key": "test", "value": "hello", "lifeTimeInSeconds": -5}"#;
        let req: AddRequest = serde_json::from_str(json).unwrap();
        assert!(req.ttl_seconds().is_none());
    }

    #[test]
    fn test_validate_blank_key() {
        let req = AddRequest {
            key: "   ".to_string(),
            value: "test".to_string(),
            life_time_in_seconds: None,
        };
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_key_query_requires_key() {
        assert!(KeyQuery::default().require_key().is_err());
        let query = KeyQuery {
            key: Some(" k ".to_string()),
        };
        assert_eq!(query.require_key().unwrap(), " k ");
    }
}
