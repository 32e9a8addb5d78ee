// src/application/services/validation.rs
use std::fmt;

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::collection::{CollectionUpdate, NewCollection};

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 1000;
pub const MAX_TAGS: usize = 20;

/// One rejected field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Outcome of checking a collection form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: Vec<FieldError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    fn check(&mut self, ok: bool, field: &'static str, message: impl Into<String>) {
        if !ok {
            self.errors.push(FieldError {
                field,
                message: message.into(),
            });
        }
    }

    /// `Err(Validation)` listing every problem, if any
    pub fn into_result(self) -> ApplicationResult<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(ApplicationError::Validation(self.to_string()))
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", messages.join("; "))
    }
}

fn name_ok(name: &str) -> bool {
    !name.trim().is_empty() && name.chars().count() <= MAX_NAME_LEN
}

fn description_ok(description: &str) -> bool {
    description.chars().count() <= MAX_DESCRIPTION_LEN
}

fn tags_ok(tags: &[String]) -> bool {
    tags.len() <= MAX_TAGS && tags.iter().all(|t| !t.trim().is_empty())
}

fn logo_ids_ok(ids: &[String]) -> bool {
    ids.iter().all(|id| !id.trim().is_empty())
}

pub fn validate_new_collection(new: &NewCollection) -> ValidationReport {
    let mut report = ValidationReport::default();
    report.check(
        name_ok(&new.name),
        "name",
        format!("required, at most {} characters", MAX_NAME_LEN),
    );
    report.check(
        description_ok(&new.description),
        "description",
        format!("at most {} characters", MAX_DESCRIPTION_LEN),
    );
    report.check(
        tags_ok(&new.tags),
        "tags",
        format!("at most {} non-empty tags", MAX_TAGS),
    );
    report.check(logo_ids_ok(&new.logo_ids), "logoIds", "logo ids must not be empty");
    report
}

pub fn validate_update(update: &CollectionUpdate) -> ValidationReport {
    let mut report = ValidationReport::default();
    if let Some(name) = &update.name {
        report.check(
            name_ok(name),
            "name",
            format!("required, at most {} characters", MAX_NAME_LEN),
        );
    }
    if let Some(description) = &update.description {
        report.check(
            description_ok(description),
            "description",
            format!("at most {} characters", MAX_DESCRIPTION_LEN),
        );
    }
    if let Some(tags) = &update.tags {
        report.check(tags_ok(tags), "tags", format!("at most {} non-empty tags", MAX_TAGS));
    }
    if let Some(ids) = &update.logo_ids {
        report.check(logo_ids_ok(ids), "logoIds", "logo ids must not be empty");
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_valid_form_when_validate_then_no_errors() {
        let new = NewCollection {
            name: "Islands".to_string(),
            tags: vec!["crete".to_string()],
            ..Default::default()
        };
        let report = validate_new_collection(&new);
        assert!(report.is_valid());
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn given_blank_name_and_empty_tag_when_validate_then_reports_both() {
        let new = NewCollection {
            name: "   ".to_string(),
            tags: vec!["".to_string()],
            ..Default::default()
        };
        let report = validate_new_collection(&new);
        assert!(report.has_error("name"));
        assert!(report.has_error("tags"));
        assert!(!report.has_error("description"));
        assert_eq!(report.errors().len(), 2);
        assert!(matches!(report.into_result(), Err(ApplicationError::Validation(_))));
    }

    #[test]
    fn given_update_without_fields_when_validate_then_valid() {
        assert!(validate_update(&CollectionUpdate::default()).is_valid());
        let update = CollectionUpdate {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(validate_update(&update).has_error("name"));
    }
}
