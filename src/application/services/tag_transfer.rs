// src/application/services/tag_transfer.rs
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::error::ApplicationResult;
use crate::domain::tag_data::TagData;

const ENVELOPE_VERSION: &str = "1.0";
const BACKUP_VERSION: &str = "v1.0";

/// Layout of an exported tag file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    /// Bare `TagData`
    Plain,
    /// `{"metadata": {...}, "data": TagData}`
    #[default]
    Envelope,
    /// Envelope marked as a backup
    Backup,
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" => Ok(ExportFormat::Plain),
            "envelope" => Ok(ExportFormat::Envelope),
            "backup" => Ok(ExportFormat::Backup),
            _ => Err(format!("unknown export format '{}' (plain, envelope, backup)", s)),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::Plain => "plain",
            ExportFormat::Envelope => "envelope",
            ExportFormat::Backup => "backup",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub instructions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportEnvelope {
    pub metadata: ExportMetadata,
    pub data: TagData,
}

/// A generated export: suggested file name plus its JSON content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub content: String,
}

/// Pretty JSON of a snapshot in its plain shape
pub fn export_data(data: &TagData) -> ApplicationResult<String> {
    Ok(data.to_json_pretty()?)
}

/// `YYYY-MM-DDTHH-MM-SS`, safe for file names
pub fn file_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H-%M-%S").to_string()
}

pub fn export_file(
    data: &TagData,
    format: ExportFormat,
    now: DateTime<Utc>,
) -> ApplicationResult<ExportFile> {
    let ts = file_timestamp(now);
    let iso = now.to_rfc3339_opts(SecondsFormat::Millis, true);

    let file = match format {
        ExportFormat::Plain => ExportFile {
            file_name: format!("tags-{}.json", ts),
            content: export_data(data)?,
        },
        ExportFormat::Envelope => ExportFile {
            file_name: format!("greek-football-tags-{}.json", ts),
            content: serde_json::to_string_pretty(&ExportEnvelope {
                metadata: ExportMetadata {
                    kind: None,
                    version: ENVELOPE_VERSION.to_string(),
                    generated_at: Some(iso),
                    created_at: None,
                    description: "Greek Football Teams Tag Data".to_string(),
                    instructions: vec![
                        "This file contains tag data for Greek football teams".to_string(),
                        "Import it with `gflogos import <file>`".to_string(),
                    ],
                },
                data: data.clone(),
            })?,
        },
        ExportFormat::Backup => ExportFile {
            file_name: format!("backup-greek-football-tags-{}-{}.json", BACKUP_VERSION, ts),
            content: serde_json::to_string_pretty(&ExportEnvelope {
                metadata: ExportMetadata {
                    kind: Some("backup".to_string()),
                    version: BACKUP_VERSION.to_string(),
                    generated_at: None,
                    created_at: Some(iso),
                    description: "Greek Football Teams Tag Data Backup".to_string(),
                    instructions: vec![
                        "This is a backup file of tag data".to_string(),
                        "Use this file to restore tag data if needed".to_string(),
                    ],
                },
                data: data.clone(),
            })?,
        },
    };
    Ok(file)
}

/// Accepts either the plain shape or an envelope; `None` when malformed
pub fn parse_import(json: &str) -> Option<TagData> {
    let value: serde_json::Value = match serde_json::from_str(json) {
        Ok(value) => value,
        Err(e) => {
            debug!("Import is not JSON: {}", e);
            return None;
        }
    };

    let is_envelope = value.get("metadata").is_some() && value.get("data").is_some();
    let parsed = if is_envelope {
        serde_json::from_value::<ExportEnvelope>(value).map(|envelope| envelope.data)
    } else {
        serde_json::from_value::<TagData>(value)
    };

    match parsed {
        Ok(data) => Some(data),
        Err(e) => {
            debug!("Import does not describe tag data: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 9, 14, 5, 7).unwrap()
    }

    #[test]
    fn given_time_when_file_timestamp_then_colons_replaced() {
        assert_eq!(file_timestamp(fixed_now()), "2025-03-09T14-05-07");
    }

    #[test]
    fn given_formats_when_export_file_then_names_follow_convention() {
        let data = TagData::defaults();
        let plain = export_file(&data, ExportFormat::Plain, fixed_now()).unwrap();
        let envelope = export_file(&data, ExportFormat::Envelope, fixed_now()).unwrap();
        let backup = export_file(&data, ExportFormat::Backup, fixed_now()).unwrap();

        assert_eq!(plain.file_name, "tags-2025-03-09T14-05-07.json");
        assert_eq!(envelope.file_name, "greek-football-tags-2025-03-09T14-05-07.json");
        assert_eq!(
            backup.file_name,
            "backup-greek-football-tags-v1.0-2025-03-09T14-05-07.json"
        );
        assert!(backup.content.contains("\"type\": \"backup\""));
    }

    #[test]
    fn given_each_export_format_when_parse_import_then_recovers_data() {
        let data = TagData::defaults();
        for format in [ExportFormat::Plain, ExportFormat::Envelope, ExportFormat::Backup] {
            let file = export_file(&data, format, fixed_now()).unwrap();
            assert_eq!(parse_import(&file.content), Some(data.clone()), "{}", format);
        }
    }

    #[test]
    fn given_malformed_input_when_parse_import_then_none() {
        assert!(parse_import("").is_none());
        assert!(parse_import("{\"metadata\": {}, \"data\": []}").is_none());
        assert!(parse_import("{\"teamTags\": {}}").is_none());
        assert!(parse_import("{\"availableTags\": [\"\"], \"teamTags\": {}}").is_none());
    }
}
