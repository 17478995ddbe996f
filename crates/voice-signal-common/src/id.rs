use serde::{Deserialize, Serialize};
use std::fmt;

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Opaque identifier of one live client connection.
///
/// The transport assigns it when the connection opens; the relay never
/// interprets its contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new() -> Self {
        Self(new_id())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A blank id cannot identify a connection.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_id_is_valid_uuid() {
        let id = new_id();
        let parsed = uuid::Uuid::parse_str(&id);
        assert!(parsed.is_ok());
        assert_eq!(parsed.unwrap().get_version_num(), 4);
    }

    #[test]
    fn session_id_is_unique() {
        assert_ne!(SessionId::new(), SessionId::new());
    }

    #[test]
    fn session_id_from_transport_string() {
        let sid = SessionId::from("abc123");
        assert_eq!(sid.as_str(), "abc123");
        assert_eq!(sid.to_string(), "abc123");
        assert!(!sid.is_blank());
    }

    #[test]
    fn blank_session_id() {
        assert!(SessionId::from("").is_blank());
        assert!(SessionId::from("   ").is_blank());
    }

    #[test]
    fn session_id_serializes_as_plain_string() {
        let sid = SessionId::from("abc123");
        let json = serde_json::to_string(&sid).unwrap();
        assert_eq!(json, "\"abc123\"");
        let back: SessionId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sid);
    }

    #[test]
    fn session_id_hash() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        let s1 = SessionId::new();
        set.insert(s1.clone());
        set.insert(s1);
        assert_eq!(set.len(), 1);
    }
}
