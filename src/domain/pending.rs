// src/domain/pending.rs
use std::collections::BTreeSet;

use crate::domain::tag::Tag;
use crate::domain::tag_data::{TagData, TeamTags};

/// Uncommitted edits layered over a committed [`TagData`].
///
/// Team edits are full replacement lists, as is the vocabulary edit. The
/// overlay is only ever cleared as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingChanges {
    team_edits: TeamTags,
    available_tags_edit: Option<Vec<Tag>>,
}

impl PendingChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dirty(&self) -> bool {
        !self.team_edits.is_empty() || self.available_tags_edit.is_some()
    }

    pub fn has_team_edits(&self) -> bool {
        !self.team_edits.is_empty()
    }

    pub fn has_available_tags_edit(&self) -> bool {
        self.available_tags_edit.is_some()
    }

    /// Distinct teams with pending edits, plus one for a pending vocabulary
    pub fn change_count(&self) -> usize {
        self.team_edits.len() + usize::from(self.available_tags_edit.is_some())
    }

    pub fn team_edits(&self) -> &TeamTags {
        &self.team_edits
    }

    pub fn available_tags_edit(&self) -> Option<&[Tag]> {
        self.available_tags_edit.as_deref()
    }

    /// Team tags as seen through the overlay
    pub fn effective_team_tags(&self, committed: &TagData, team_id: &str) -> Vec<Tag> {
        match self.team_edits.get(team_id) {
            Some(tags) => tags.clone(),
            None => committed.tags_for_team(team_id).to_vec(),
        }
    }

    /// Vocabulary as seen through the overlay
    pub fn effective_available_tags(&self, committed: &TagData) -> Vec<Tag> {
        match &self.available_tags_edit {
            Some(tags) => tags.clone(),
            None => committed.available_tags.clone(),
        }
    }

    /// Every team id present either in the committed snapshot or the overlay
    pub fn known_teams(&self, committed: &TagData) -> BTreeSet<String> {
        committed
            .team_tags
            .keys()
            .chain(self.team_edits.keys())
            .cloned()
            .collect()
    }

    pub fn set_team_tags(&mut self, team_id: &str, tags: Vec<Tag>) {
        self.team_edits.insert(team_id.to_string(), tags);
    }

    pub fn set_available_tags(&mut self, tags: Vec<Tag>) {
        self.available_tags_edit = Some(tags);
    }

    /// Committed snapshot with every pending edit applied
    pub fn apply_to(&self, committed: &TagData) -> TagData {
        let mut merged = committed.clone();
        if let Some(tags) = &self.available_tags_edit {
            merged.available_tags = tags.clone();
        }
        for (team_id, tags) in &self.team_edits {
            merged.team_tags.insert(team_id.clone(), tags.clone());
        }
        merged
    }

    pub fn clear(&mut self) {
        self.team_edits.clear();
        self.available_tags_edit = None;
    }
}
