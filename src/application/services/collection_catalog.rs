// src/application/services/collection_catalog.rs
use std::fs;
use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use tracing::{debug, instrument, warn};

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::logo_catalog::LogoCatalog;
use crate::application::services::validation::{validate_new_collection, validate_update};
use crate::domain::collection::{
    default_collections, generate_collection_id, Collection, CollectionUpdate, CollectionsFile,
    NewCollection,
};
use crate::domain::logo::TeamLogo;
use crate::domain::repositories::key_value_store::{KeyValueStore, COLLECTIONS_KEY};

/// A collection together with the catalog logos it references
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionWithLogos {
    pub collection: Collection,
    pub logos: Vec<TeamLogo>,
}

/// Curated collections, persisted as one JSON array in the key-value store
#[derive(Debug)]
pub struct CollectionCatalog {
    store: Arc<dyn KeyValueStore>,
    collections: RwLock<Vec<Collection>>,
}

impl CollectionCatalog {
    /// Loads stored collections, seeding the defaults when none are stored or
    /// the stored value is unreadable
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let catalog = Self {
            store,
            collections: RwLock::new(Vec::new()),
        };
        catalog.load();
        catalog
    }

    fn load(&self) {
        let stored = match self.store.get(COLLECTIONS_KEY) {
            Ok(stored) => stored,
            Err(e) => {
                warn!("Could not read collections: {}", e);
                None
            }
        };

        let parsed = stored.and_then(|json| match serde_json::from_str::<Vec<Collection>>(&json) {
            Ok(collections) => Some(collections),
            Err(e) => {
                warn!("Stored collections malformed, restoring defaults: {}", e);
                None
            }
        });

        match parsed {
            Some(collections) => *self.collections.write() = collections,
            None => {
                let defaults = default_collections();
                if let Err(e) = self.persist(&defaults) {
                    warn!("Could not store default collections: {}", e);
                }
                *self.collections.write() = defaults;
            }
        }
    }

    fn persist(&self, collections: &[Collection]) -> ApplicationResult<()> {
        let json = serde_json::to_string(collections)?;
        self.store.set(COLLECTIONS_KEY, &json)?;
        Ok(())
    }

    /// Applies `change` to a copy, persists it, then swaps it in
    fn mutate<T, F>(&self, change: F) -> ApplicationResult<T>
    where
        F: FnOnce(&mut Vec<Collection>) -> ApplicationResult<(T, bool)>,
    {
        let mut guard = self.collections.write();
        let mut next = guard.clone();
        let (value, changed) = change(&mut next)?;
        if changed {
            self.persist(&next)?;
            *guard = next;
        }
        Ok(value)
    }

    pub fn collections(&self) -> Vec<Collection> {
        self.collections.read().clone()
    }

    pub fn public_collections(&self) -> Vec<Collection> {
        self.filtered(|c| c.is_public)
    }

    /// Featured and public
    pub fn featured_collections(&self) -> Vec<Collection> {
        self.filtered(|c| c.is_featured() && c.is_public)
    }

    pub fn collection(&self, id: &str) -> Option<Collection> {
        self.collections.read().iter().find(|c| c.id == id).cloned()
    }

    pub fn collection_with_logos(
        &self,
        id: &str,
        catalog: &LogoCatalog,
    ) -> Option<CollectionWithLogos> {
        self.collection(id).map(|collection| CollectionWithLogos {
            logos: catalog.by_ids(&collection.logo_ids),
            collection,
        })
    }

    /// Case-insensitive match on name, description or any tag
    pub fn search(&self, term: &str) -> Vec<Collection> {
        self.filtered(|c| c.matches(term))
    }

    pub fn by_tag(&self, tag: &str) -> Vec<Collection> {
        self.filtered(|c| c.has_tag(tag))
    }

    fn filtered<P: Fn(&Collection) -> bool>(&self, predicate: P) -> Vec<Collection> {
        self.collections
            .read()
            .iter()
            .filter(|c| predicate(c))
            .cloned()
            .collect()
    }

    #[instrument(skip(self), level = "debug", fields(name = %new.name))]
    pub fn create(&self, new: NewCollection) -> ApplicationResult<Collection> {
        validate_new_collection(&new).into_result()?;
        let now = Utc::now();
        let id = generate_collection_id(now, &mut rand::thread_rng());
        let collection = new.into_collection(id, now)?;

        self.mutate(|all| {
            all.push(collection.clone());
            Ok((collection, true))
        })
    }

    #[instrument(skip(self, changes), level = "debug")]
    pub fn update(&self, id: &str, changes: CollectionUpdate) -> ApplicationResult<Collection> {
        validate_update(&changes).into_result()?;
        self.mutate(|all| {
            let collection = all
                .iter_mut()
                .find(|c| c.id == id)
                .ok_or_else(|| ApplicationError::CollectionNotFound(id.to_string()))?;
            collection.apply(changes, Utc::now());
            Ok((collection.clone(), true))
        })
    }

    /// False when no collection has this id
    #[instrument(skip(self), level = "debug")]
    pub fn delete(&self, id: &str) -> ApplicationResult<bool> {
        self.mutate(|all| {
            let before = all.len();
            all.retain(|c| c.id != id);
            let removed = all.len() != before;
            Ok((removed, removed))
        })
    }

    /// False when the collection is missing or already holds the logo
    #[instrument(skip(self), level = "debug")]
    pub fn add_logo(&self, collection_id: &str, logo_id: &str) -> ApplicationResult<bool> {
        self.mutate(|all| {
            let Some(collection) = all.iter_mut().find(|c| c.id == collection_id) else {
                return Ok((false, false));
            };
            if collection.contains_logo(logo_id) {
                return Ok((false, false));
            }
            collection.logo_ids.push(logo_id.to_string());
            collection.updated_at = Utc::now();
            Ok((true, true))
        })
    }

    /// False when the collection is missing or does not hold the logo
    #[instrument(skip(self), level = "debug")]
    pub fn remove_logo(&self, collection_id: &str, logo_id: &str) -> ApplicationResult<bool> {
        self.mutate(|all| {
            let Some(collection) = all.iter_mut().find(|c| c.id == collection_id) else {
                return Ok((false, false));
            };
            if !collection.contains_logo(logo_id) {
                return Ok((false, false));
            }
            collection.logo_ids.retain(|id| id != logo_id);
            collection.updated_at = Utc::now();
            Ok((true, true))
        })
    }

    /// `{"collections": [...]}` as pretty JSON
    pub fn export_file(&self) -> ApplicationResult<String> {
        let file = CollectionsFile {
            collections: self.collections(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// Replaces every collection with those of an exported file
    #[instrument(skip(self), level = "debug")]
    pub fn load_file(&self, path: &Path) -> ApplicationResult<usize> {
        let json = fs::read_to_string(path)
            .map_err(|e| ApplicationError::from(e).context(format!("reading {}", path.display())))?;
        let file: CollectionsFile = serde_json::from_str(&json)
            .map_err(|e| ApplicationError::Validation(format!("Invalid collections file: {}", e)))?;
        let count = file.collections.len();
        self.mutate(|all| {
            *all = file.collections;
            Ok(((), true))
        })?;
        debug!("Loaded {} collections from {}", count, path.display());
        Ok(count)
    }
}
