// src/application/services/tag_query.rs
use std::sync::Arc;

use tracing::instrument;

use crate::application::services::tag_store::TagStore;
use crate::domain::logo::TeamLogo;
use crate::domain::tag::Tag;
use crate::domain::tag_data::TeamTags;

/// Read side of the tag state, always answered from the visible view
#[derive(Debug, Clone)]
pub struct TagQuery {
    store: Arc<TagStore>,
}

impl TagQuery {
    pub fn new(store: Arc<TagStore>) -> Self {
        Self { store }
    }

    /// Empty when the team has no entry
    pub fn tags_for_team(&self, team_id: &str) -> Vec<Tag> {
        self.store.view().tags_for_team(team_id).to_vec()
    }

    /// Logos whose team carries at least one of `tags`; all of them when
    /// `tags` is empty
    #[instrument(skip(self, candidates), level = "trace", fields(n = candidates.len()))]
    pub fn teams_with_any_tag(&self, tags: &[Tag], candidates: &[TeamLogo]) -> Vec<TeamLogo> {
        if tags.is_empty() {
            return candidates.to_vec();
        }
        let view = self.store.view();
        candidates
            .iter()
            .filter(|logo| Tag::contains_any(view.tags_for_team(&logo.id), tags))
            .cloned()
            .collect()
    }

    pub fn teams_with_tag(&self, tag: &Tag, candidates: &[TeamLogo]) -> Vec<TeamLogo> {
        let view = self.store.view();
        candidates
            .iter()
            .filter(|logo| view.tags_for_team(&logo.id).contains(tag))
            .cloned()
            .collect()
    }

    pub fn all_available_tags(&self) -> Vec<Tag> {
        self.store.view().available_tags
    }

    pub fn all_team_tags(&self) -> TeamTags {
        self.store.view().team_tags
    }
}
