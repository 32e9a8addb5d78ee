// src/domain/tag_data.rs
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::tag::Tag;

/// Team id to assigned tags, in file order
pub type TeamTags = IndexMap<String, Vec<Tag>>;

/// Committed tag state: the tag vocabulary plus every team's assigned tags.
///
/// Serialized as `{"availableTags": [...], "teamTags": {"<team id>": [...]}}`.
/// Team tags are not required to appear in `available_tags`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagData {
    pub available_tags: Vec<Tag>,
    pub team_tags: TeamTags,
}

impl TagData {
    pub fn new(available_tags: Vec<Tag>, team_tags: TeamTags) -> Self {
        Self {
            available_tags,
            team_tags,
        }
    }

    /// Tags assigned to a team, empty when the team has no entry
    pub fn tags_for_team(&self, team_id: &str) -> &[Tag] {
        self.team_tags
            .get(team_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn from_json(json: &str) -> DomainResult<Self> {
        serde_json::from_str(json).map_err(|e| DomainError::InvalidTagData(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> DomainResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Built-in fixture used when neither the remote files nor local storage
    /// provide any data.
    pub fn defaults() -> Self {
        let available: [&str; 27] = [
            "Animals", "Birds", "Lions", "Eagles", "Horses",
            "Colors", "Red", "Blue", "Green", "Yellow", "Black", "White",
            "Symbols", "Stars", "Shields", "Crowns", "Crosses",
            "Geometric", "Circles", "Triangles", "Squares",
            "Text", "Greek Letters", "Modern", "Classic", "Minimalist", "Complex",
        ];
        let teams: [(&str, &[&str]); 14] = [
            ("panathinaikos", &["Green", "Shamrock", "Classic"]),
            ("aek", &["Eagles", "Black", "Yellow", "Shields"]),
            ("paok", &["Black", "White", "Double-headed Eagle", "Classic"]),
            ("olympiakos", &["Red", "White", "Laurel Wreath", "Classic"]),
            ("aris", &["Yellow", "Black", "Lions", "Shields"]),
            ("lamia", &["Blue", "White", "Modern"]),
            ("ofi", &["Green", "White", "Classic"]),
            ("volos", &["Blue", "White", "Ships", "Modern"]),
            ("asteras-tripolis", &["Yellow", "Black", "Stars", "Modern"]),
            ("panetolikos", &["Green", "White", "Shields", "Modern"]),
            ("atromitos", &["Blue", "White", "Shields", "Classic"]),
            ("panserraikos", &["Blue", "White", "Shields", "Classic"]),
            ("kallithea", &["Blue", "White", "Shields", "Classic"]),
            ("levadiakos", &["Blue", "White", "Shields", "Classic"]),
        ];

        Self {
            available_tags: available.iter().copied().map(Tag::from_literal).collect(),
            team_tags: teams
                .iter()
                .map(|(id, tags)| {
                    (
                        id.to_string(),
                        tags.iter().copied().map(Tag::from_literal).collect(),
                    )
                })
                .collect(),
        }
    }
}
