// src/domain/repositories/key_value_store.rs
use std::fmt::Debug;

use crate::domain::error::DomainResult;

/// Committed tag snapshot
pub const TAGS_KEY: &str = "greek_football_tags";
/// Curated collections
pub const COLLECTIONS_KEY: &str = "logo_collections";
/// Admin session flag
pub const ADMIN_KEY: &str = "greek_football_admin";
/// Quiz statistics
pub const QUIZ_STATS_KEY: &str = "quiz-stats";

/// String key to string value store, the local durable sink
pub trait KeyValueStore: Send + Sync + Debug {
    fn get(&self, key: &str) -> DomainResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> DomainResult<()>;

    /// Removing an absent key is not an error
    fn remove(&self, key: &str) -> DomainResult<()>;
}
