// src/application/services/tag_editor.rs
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, instrument, warn};

use crate::application::error::ApplicationResult;
use crate::application::services::tag_store::{PublishReport, TagStore};
use crate::application::services::tag_transfer::parse_import;
use crate::domain::pending::PendingChanges;
use crate::domain::tag::Tag;
use crate::domain::tag_data::{TagData, TeamTags};

/// Buffers tag edits until they are committed or discarded.
///
/// Every effective edit re-broadcasts the merged view through the
/// [`TagStore`], so observers see uncommitted work immediately.
#[derive(Debug)]
pub struct TagEditor {
    store: Arc<TagStore>,
    pending: Mutex<PendingChanges>,
}

impl TagEditor {
    pub fn new(store: Arc<TagStore>) -> Self {
        Self {
            store,
            pending: Mutex::new(PendingChanges::new()),
        }
    }

    /// Returns false when the team already carries the tag
    #[instrument(skip(self), level = "debug", fields(tag = %tag))]
    pub fn add_tag(&self, team_id: &str, tag: &Tag) -> bool {
        self.edit_team(team_id, |tags| {
            if tags.contains(tag) {
                false
            } else {
                tags.push(tag.clone());
                true
            }
        })
    }

    /// Returns false when the team does not carry the tag
    #[instrument(skip(self), level = "debug", fields(tag = %tag))]
    pub fn remove_tag(&self, team_id: &str, tag: &Tag) -> bool {
        self.edit_team(team_id, |tags| remove_from(tags, tag))
    }

    /// Returns false when the vocabulary already holds the tag
    #[instrument(skip(self), level = "debug", fields(tag = %tag))]
    pub fn add_available_tag(&self, tag: &Tag) -> bool {
        let committed = self.store.current();
        let mut pending = self.pending.lock();

        let mut available = pending.effective_available_tags(&committed);
        if available.contains(tag) {
            return false;
        }
        available.push(tag.clone());
        pending.set_available_tags(available);
        self.store.broadcast(pending.apply_to(&committed));
        true
    }

    /// Drops the tag from the vocabulary and from every team carrying it.
    ///
    /// Returns false when neither the vocabulary nor any team held the tag.
    #[instrument(skip(self), level = "debug", fields(tag = %tag))]
    pub fn remove_available_tag(&self, tag: &Tag) -> bool {
        let committed = self.store.current();
        let mut pending = self.pending.lock();
        let mut changed = false;

        let mut available = pending.effective_available_tags(&committed);
        if remove_from(&mut available, tag) {
            pending.set_available_tags(available);
            changed = true;
        }

        for team_id in pending.known_teams(&committed) {
            let mut tags = pending.effective_team_tags(&committed, &team_id);
            if remove_from(&mut tags, tag) {
                pending.set_team_tags(&team_id, tags);
                changed = true;
            }
        }

        if changed {
            self.store.broadcast(pending.apply_to(&committed));
        }
        changed
    }

    /// Gives every known team an empty pending tag list
    #[instrument(skip(self), level = "debug")]
    pub fn clear_all_team_tags(&self) -> bool {
        let committed = self.store.current();
        let mut pending = self.pending.lock();
        let mut changed = false;

        for team_id in pending.known_teams(&committed) {
            if !pending.effective_team_tags(&committed, &team_id).is_empty() {
                pending.set_team_tags(&team_id, Vec::new());
                changed = true;
            }
        }

        if changed {
            self.store.broadcast(pending.apply_to(&committed));
        }
        changed
    }

    pub fn has_pending_changes(&self) -> bool {
        self.pending.lock().is_dirty()
    }

    /// Teams with pending edits, plus one for a pending vocabulary
    pub fn pending_change_count(&self) -> usize {
        self.pending.lock().change_count()
    }

    /// Pending per-team replacement lists, by team id
    pub fn pending_team_edits(&self) -> TeamTags {
        self.pending.lock().team_edits().clone()
    }

    pub fn pending_available_tags(&self) -> Option<Vec<Tag>> {
        self.pending.lock().available_tags_edit().map(<[Tag]>::to_vec)
    }

    /// Committed snapshot with the pending edits applied
    pub fn merged_view(&self) -> TagData {
        self.pending.lock().apply_to(&self.store.current())
    }

    /// Publishes the merged view and clears the buffer.
    ///
    /// Returns `None` when there was nothing to commit. A local write failure
    /// leaves both the buffer and the committed snapshot untouched.
    #[instrument(skip(self), level = "debug")]
    pub fn commit(&self) -> ApplicationResult<Option<PublishReport>> {
        let mut pending = self.pending.lock();
        if !pending.is_dirty() {
            debug!("Nothing to commit");
            return Ok(None);
        }

        let merged = pending.apply_to(&self.store.current());
        let report = self.store.publish(merged)?;
        pending.clear();
        Ok(Some(report))
    }

    /// Drops every pending edit; observers see the committed view again
    #[instrument(skip(self), level = "debug")]
    pub fn discard(&self) {
        let mut pending = self.pending.lock();
        pending.clear();
        self.store.broadcast(self.store.current());
    }

    /// Replaces the committed snapshot with an exported document.
    ///
    /// Pending edits are discarded first. Malformed input or a failed local
    /// write returns false and leaves the committed snapshot as it was.
    #[instrument(skip_all, level = "debug")]
    pub fn import_data(&self, json: &str) -> bool {
        let Some(data) = parse_import(json) else {
            warn!("Rejected malformed tag import");
            return false;
        };

        let mut pending = self.pending.lock();
        match self.store.publish(data) {
            Ok(report) => {
                pending.clear();
                debug!(?report, "Imported tag data");
                true
            }
            Err(e) => {
                warn!("Import could not be stored: {}", e);
                false
            }
        }
    }

    fn edit_team<F>(&self, team_id: &str, apply: F) -> bool
    where
        F: FnOnce(&mut Vec<Tag>) -> bool,
    {
        let committed = self.store.current();
        let mut pending = self.pending.lock();

        let mut tags = pending.effective_team_tags(&committed, team_id);
        if !apply(&mut tags) {
            return false;
        }
        pending.set_team_tags(team_id, tags);
        self.store.broadcast(pending.apply_to(&committed));
        true
    }
}

fn remove_from(tags: &mut Vec<Tag>, tag: &Tag) -> bool {
    let before = tags.len();
    tags.retain(|t| t != tag);
    tags.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::key_value_store::KeyValueStore;
    use crate::infrastructure::storage::InMemoryKeyValueStore;
    use crate::util::testing::{tag, FlakyStore, MemoryDownloads};

    fn editor() -> (TagEditor, Arc<TagStore>) {
        let store = Arc::new(TagStore::new(
            Arc::new(InMemoryKeyValueStore::new()),
            None,
            Arc::new(MemoryDownloads::default()),
            None,
        ));
        store.load();
        (TagEditor::new(store.clone()), store)
    }

    #[test]
    fn given_defaults_when_add_then_discard_then_back_to_committed() {
        let (editor, store) = editor();

        assert!(editor.add_tag("paok", &tag("Derby")));
        assert_eq!(editor.pending_change_count(), 1);
        assert!(store.view().tags_for_team("paok").contains(&tag("Derby")));
        assert!(!store.current().tags_for_team("paok").contains(&tag("Derby")));

        editor.discard();
        assert!(!store.view().tags_for_team("paok").contains(&tag("Derby")));
        assert_eq!(editor.pending_change_count(), 0);
        assert!(!editor.has_pending_changes());
    }

    #[test]
    fn given_existing_tag_when_add_then_no_op() {
        let (editor, _) = editor();
        assert!(!editor.add_tag("paok", &tag("Classic")));
        assert!(!editor.remove_tag("paok", &tag("Derby")));
        assert!(!editor.add_available_tag(&tag("Red")));
        assert!(!editor.has_pending_changes());
    }

    #[test]
    fn given_unknown_team_when_add_tag_then_creates_pending_entry() {
        let (editor, store) = editor();
        assert!(editor.add_tag("panionios", &tag("Blue")));
        assert_eq!(store.view().tags_for_team("panionios"), &[tag("Blue")]);
        assert!(editor.pending_team_edits().contains_key("panionios"));
    }

    #[test]
    fn given_edit_sequence_when_discard_then_view_equals_committed() {
        let (editor, store) = editor();
        let committed = store.current();

        editor.add_tag("aek", &tag("Derby"));
        editor.remove_tag("aek", &tag("Eagles"));
        editor.add_available_tag(&tag("Retro"));
        editor.remove_available_tag(&tag("White"));
        editor.clear_all_team_tags();
        editor.discard();

        assert_eq!(store.view(), committed);
        assert_eq!(store.current(), committed);
    }

    #[test]
    fn given_pending_edits_when_commit_then_committed_equals_merged() {
        let (editor, store) = editor();
        editor.add_tag("ofi", &tag("Derby"));
        editor.add_available_tag(&tag("Derby"));
        let merged = editor.merged_view();

        let report = editor.commit().unwrap();
        assert!(report.is_some());
        assert_eq!(store.current(), merged);
        assert!(!editor.has_pending_changes());
        assert!(editor.commit().unwrap().is_none());
    }

    #[test]
    fn given_tag_on_several_teams_when_remove_available_then_stripped_everywhere() {
        let (editor, store) = editor();
        editor.add_tag("lamia", &tag("Retro"));

        assert!(editor.remove_available_tag(&tag("White")));
        let view = store.view();
        assert!(!view.available_tags.contains(&tag("White")));
        assert!(view.team_tags.values().all(|tags| !tags.contains(&tag("White"))));
        // untouched teams carry no pending edit
        assert!(!editor.pending_team_edits().contains_key("aek"));
        assert_eq!(view.tags_for_team("lamia"), &[tag("Blue"), tag("Modern"), tag("Retro")]);
    }

    #[test]
    fn given_retro_added_then_removed_when_commit_then_vocabulary_unchanged() {
        let (editor, store) = editor();
        let before = store.current().available_tags;

        editor.add_available_tag(&tag("Retro"));
        editor.remove_available_tag(&tag("Retro"));
        editor.commit().unwrap();

        assert_eq!(store.current().available_tags, before);
    }

    #[test]
    fn given_pending_only_team_when_clear_all_then_every_team_empty() {
        let (editor, store) = editor();
        editor.add_tag("panionios", &tag("Blue"));

        assert!(editor.clear_all_team_tags());
        let view = store.view();
        assert!(view.team_tags.values().all(Vec::is_empty));
        assert_eq!(editor.pending_change_count(), 15);
        assert!(!editor.clear_all_team_tags());
    }

    #[test]
    fn given_local_write_failure_when_commit_then_buffer_kept() {
        let local = Arc::new(FlakyStore::default());
        let store = Arc::new(TagStore::new(
            local.clone(),
            None,
            Arc::new(MemoryDownloads::default()),
            None,
        ));
        store.load();
        let editor = TagEditor::new(store.clone());
        let committed = store.current();

        editor.add_tag("paok", &tag("Derby"));
        local.fail_writes(true);
        assert!(editor.commit().is_err());
        assert!(editor.has_pending_changes());
        assert_eq!(store.current(), committed);

        local.fail_writes(false);
        assert!(editor.commit().unwrap().is_some());
        assert!(local.get("greek_football_tags").unwrap().unwrap().contains("Derby"));
    }

    #[test]
    fn given_pending_edits_when_import_then_edits_discarded() {
        let (editor, store) = editor();
        editor.add_tag("paok", &tag("Derby"));

        assert!(editor.import_data(r#"{"availableTags":["Red"],"teamTags":{"olympiakos":["Red"]}}"#));
        assert!(!editor.has_pending_changes());
        assert_eq!(store.current().available_tags, vec![tag("Red")]);
        assert_eq!(store.view(), store.current());
    }

    #[test]
    fn given_malformed_import_when_import_then_false_and_untouched() {
        let (editor, store) = editor();
        editor.add_tag("paok", &tag("Derby"));
        let before = store.current();

        assert!(!editor.import_data("{\"availableTags\": 5}"));
        assert!(editor.has_pending_changes());
        assert_eq!(store.current(), before);
    }
}
