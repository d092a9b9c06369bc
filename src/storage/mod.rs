//! Snapshot cache persistence.
//!
//! The cache is a single JSON object keyed by display name, plus one
//! reserved key holding the id of the last posted leaderboard message:
//!
//! ```text
//! {
//!   ":webhook_msg_id": "1234567890",
//!   "alice": { "id_auteur": 42, "nom": "alice", "score": 100, ... },
//!   "bob":   { ... }
//! }
//! ```

pub mod local;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::Profile;

// Re-export for convenience
pub use local::LocalStorage;

/// Last known profile per user, plus the leaderboard message id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cache {
    /// Stored under the reserved `:webhook_msg_id` key
    #[serde(
        rename = ":webhook_msg_id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    message_id: Option<String>,

    #[serde(flatten)]
    profiles: BTreeMap<String, Profile>,
}

impl Cache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last snapshot stored under `name`.
    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }

    /// Replace the snapshot stored under `name`.
    pub fn insert(&mut self, name: impl Into<String>, profile: Profile) {
        self.profiles.insert(name.into(), profile);
    }

    pub fn leaderboard_message_id(&self) -> Option<&str> {
        self.message_id.as_deref()
    }

    pub fn set_leaderboard_message_id(&mut self, id: impl Into<String>) {
        self.message_id = Some(id.into());
    }

    /// Cached snapshots in name order.
    pub fn profiles(&self) -> impl Iterator<Item = (&str, &Profile)> {
        self.profiles.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

/// Trait for cache storage backends.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Load the cache, returning an empty one when nothing is stored yet.
    async fn load(&self) -> Result<Cache>;

    /// Overwrite the stored cache.
    async fn save(&self, cache: &Cache) -> Result<()>;

    /// Human-readable location for logs.
    fn location(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str, score: i64) -> Profile {
        Profile {
            id: 1,
            name: name.into(),
            score,
            position: None,
            logo_url: None,
            url_slug: name.into(),
            validations: vec![],
        }
    }

    #[test]
    fn test_reserved_key_is_not_a_profile() {
        let json = r#"{
            ":webhook_msg_id": "555",
            "alice": {"id_auteur": 42, "nom": "alice", "score": 100, "url_name": "alice", "validations": []}
        }"#;

        let cache: Cache = serde_json::from_str(json).unwrap();
        assert_eq!(cache.leaderboard_message_id(), Some("555"));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("alice").unwrap().score, 100);
    }

    #[test]
    fn test_serialize_layout() {
        const MESSAGE_ID_KEY: &str = ":webhook_msg_id";

        let mut cache = Cache::new();
        cache.insert("bob", profile("bob", 7));
        let json = serde_json::to_value(&cache).unwrap();
        assert!(json.get(MESSAGE_ID_KEY).is_none());
        assert_eq!(json["bob"]["score"], 7);

        cache.set_leaderboard_message_id("99");
        let json = serde_json::to_value(&cache).unwrap();
        assert_eq!(json[MESSAGE_ID_KEY], "99");
    }

    #[test]
    fn test_empty_object_is_empty_cache() {
        let cache: Cache = serde_json::from_str("{}").unwrap();
        assert!(cache.is_empty());
        assert_eq!(cache.leaderboard_message_id(), None);
    }
}
