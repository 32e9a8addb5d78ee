// src/domain/collection.rs
use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use derive_builder::Builder;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// A named, curated grouping of logo ids
#[derive(Builder, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[builder(setter(into))]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: String,
    pub name: String,
    #[builder(default)]
    pub description: String,
    #[builder(default)]
    pub logo_ids: Vec<String>,
    #[builder(default)]
    pub tags: Vec<String>,
    #[builder(default = "true")]
    pub is_public: bool,
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Collection {
    pub fn is_featured(&self) -> bool {
        self.featured.unwrap_or(false)
    }

    pub fn contains_logo(&self, logo_id: &str) -> bool {
        self.logo_ids.iter().any(|id| id == logo_id)
    }

    /// Case-insensitive match against name, description or any tag
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term)
            || self.description.to_lowercase().contains(&term)
            || self.tags.iter().any(|t| t.to_lowercase().contains(&term))
    }

    /// Exact tag membership
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Applies a partial update; `updated_at` is always refreshed
    pub fn apply(&mut self, changes: CollectionUpdate, now: DateTime<Utc>) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(logo_ids) = changes.logo_ids {
            self.logo_ids = logo_ids;
        }
        if let Some(tags) = changes.tags {
            self.tags = tags;
        }
        if let Some(is_public) = changes.is_public {
            self.is_public = is_public;
        }
        if let Some(featured) = changes.featured {
            self.featured = Some(featured);
        }
        if let Some(cover_image) = changes.cover_image {
            self.cover_image = Some(cover_image);
        }
        self.updated_at = now;
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {} logos{}{}",
            self.name,
            self.id,
            self.logo_ids.len(),
            if self.is_public { "" } else { " (private)" },
            if self.is_featured() { " *" } else { "" }
        )
    }
}

/// Fields supplied when creating a collection; id and timestamps are assigned
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCollection {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub logo_ids: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub featured: Option<bool>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
}

impl NewCollection {
    pub fn into_collection(self, id: String, now: DateTime<Utc>) -> DomainResult<Collection> {
        CollectionBuilder::default()
            .id(id)
            .name(self.name)
            .description(self.description)
            .logo_ids(self.logo_ids)
            .tags(self.tags)
            .is_public(self.is_public)
            .featured(self.featured)
            .cover_image(self.cover_image)
            .created_by(self.created_by)
            .created_at(now)
            .updated_at(now)
            .build()
            .map_err(|e| DomainError::Other(format!("Failed to build collection: {}", e)))
    }
}

/// Partial update; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub logo_ids: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub is_public: Option<bool>,
    pub featured: Option<bool>,
    pub cover_image: Option<String>,
}

/// File shape of an exported collection set: `{"collections": [...]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionsFile {
    pub collections: Vec<Collection>,
}

/// Random lowercase base36 string of the given length
pub(crate) fn random_base36<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

/// `collection_<millis>_<9 base36 chars>`
pub fn generate_collection_id<R: Rng + ?Sized>(now: DateTime<Utc>, rng: &mut R) -> String {
    format!(
        "collection_{}_{}",
        now.timestamp_millis(),
        random_base36(rng, 9)
    )
}

/// Curated collections shipped with the catalog
pub fn default_collections() -> Vec<Collection> {
    let seeded = Utc
        .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_else(Utc::now);

    let entry = |id: &str,
                 name: &str,
                 description: &str,
                 logo_ids: &[&str],
                 tags: &[&str],
                 featured: bool,
                 cover_image: Option<&str>| Collection {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        logo_ids: logo_ids.iter().map(|s| s.to_string()).collect(),
        tags: tags.iter().map(|s| s.to_string()).collect(),
        is_public: true,
        featured: Some(featured),
        cover_image: cover_image.map(str::to_string),
        created_by: None,
        created_at: seeded,
        updated_at: seeded,
    };

    vec![
        entry(
            "big-4-teams",
            "Big 4 Teams",
            "The four most successful teams in Greek football history: Panathinaikos, AEK Athens, PAOK and Olympiacos. \
             They have dominated Greek football for decades and have the largest fan bases in the country.",
            &["panathinaikos", "aek", "paok", "olympiakos"],
            &["big-4", "superleague", "classic", "major-teams"],
            true,
            Some("/assets/logos/panathinaikos.png"),
        ),
        entry(
            "athens-teams",
            "Athens Teams",
            "Football clubs based in Athens and the surrounding area, home to many historic clubs \
             including Panathinaikos and AEK Athens.",
            &["panathinaikos", "aek", "atromitos", "kallithea", "panionios"],
            &["athens", "capital", "central-greece", "attica"],
            false,
            None,
        ),
        entry(
            "thessaloniki-teams",
            "Thessaloniki Teams",
            "Football clubs from Thessaloniki and northern Greece, with teams like PAOK and Aris Thessaloniki.",
            &["paok", "aris", "panserraikos"],
            &["thessaloniki", "northern-greece", "macedonia"],
            false,
            None,
        ),
        entry(
            "superleague-classic",
            "Super League Classic",
            "Traditional teams that have been part of the Greek Super League for many years.",
            &["olympiakos", "panathinaikos", "aek", "paok", "aris", "ofi"],
            &["superleague", "classic", "traditional", "historic"],
            true,
            None,
        ),
        entry(
            "cup-winners",
            "Greek Cup Winners",
            "Teams that have won the Greek Cup multiple times throughout their history.",
            &["olympiakos", "panathinaikos", "aek", "paok", "aris"],
            &["cup-winners", "trophies", "success", "prestigious"],
            false,
            None,
        ),
    ]
}
