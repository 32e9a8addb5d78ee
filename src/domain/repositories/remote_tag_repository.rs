// src/domain/repositories/remote_tag_repository.rs
use std::fmt::Debug;

use crate::domain::error::DomainResult;
use crate::domain::tag::Tag;
use crate::domain::tag_data::TeamTags;

/// The file-save endpoint holding the canonical tag files
pub trait RemoteTagRepository: Send + Sync + Debug {
    fn fetch_team_tags(&self) -> DomainResult<TeamTags>;

    fn fetch_available_tags(&self) -> DomainResult<Vec<Tag>>;

    fn save_team_tags(&self, team_tags: &TeamTags) -> DomainResult<()>;

    fn save_available_tags(&self, available_tags: &[Tag]) -> DomainResult<()>;

    /// Liveness probe; never an error
    fn is_online(&self) -> bool;
}
