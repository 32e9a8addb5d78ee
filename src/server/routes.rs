// src/server/routes.rs
use std::path::Path;
use std::sync::Arc;

use axum::{body::Bytes, extract::State, Json};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{error, info, instrument};

use crate::server::error::{ServerError, ServerResult};
use crate::server::state::ServerState;

/// Team tag file as sent by the client: labels are stored verbatim, keys in order
pub type TeamTagsFile = IndexMap<String, Vec<String>>;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct SaveResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

fn parse_body<T: DeserializeOwned>(body: &Bytes) -> ServerResult<T> {
    serde_json::from_slice(body).map_err(|e| ServerError::MalformedPayload(e.to_string()))
}

async fn write_pretty<T: Serialize>(
    state: &ServerState,
    path: &Path,
    value: &T,
) -> ServerResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| ServerError::WriteFailed(e.to_string()))?;

    let _guard = state.write_lock.lock().await;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| ServerError::WriteFailed(e.to_string()))?;
    }
    tokio::fs::write(path, json).await.map_err(|e| {
        error!("Error saving {}: {}", path.display(), e);
        ServerError::WriteFailed(e.to_string())
    })
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> ServerResult<T> {
    let text = tokio::fs::read_to_string(path).await.map_err(|e| {
        error!("Error reading {}: {}", path.display(), e);
        ServerError::ReadFailed(e.to_string())
    })?;
    serde_json::from_str(&text).map_err(|e| ServerError::ReadFailed(e.to_string()))
}

#[instrument(skip_all)]
pub async fn save_team_tags(
    State(state): State<Arc<ServerState>>,
    body: Bytes,
) -> ServerResult<Json<SaveResponse>> {
    let team_tags: TeamTagsFile = parse_body(&body)?;
    write_pretty(&state, &state.team_tags_file, &team_tags).await?;
    info!("Team tags saved to {}", state.team_tags_file.display());
    Ok(Json(SaveResponse {
        success: true,
        message: "Team tags saved successfully".to_string(),
    }))
}

#[instrument(skip_all)]
pub async fn get_team_tags(
    State(state): State<Arc<ServerState>>,
) -> ServerResult<Json<TeamTagsFile>> {
    read_json(&state.team_tags_file).await.map(Json)
}

#[instrument(skip_all)]
pub async fn save_available_tags(
    State(state): State<Arc<ServerState>>,
    body: Bytes,
) -> ServerResult<Json<SaveResponse>> {
    let available_tags: Vec<String> = parse_body(&body)?;
    write_pretty(&state, &state.available_tags_file, &available_tags).await?;
    info!("Available tags saved to {}", state.available_tags_file.display());
    Ok(Json(SaveResponse {
        success: true,
        message: "Available tags saved successfully".to_string(),
    }))
}

#[instrument(skip_all)]
pub async fn get_available_tags(
    State(state): State<Arc<ServerState>>,
) -> ServerResult<Json<Vec<String>>> {
    read_json(&state.available_tags_file).await.map(Json)
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        message: "Team tags server is running".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn state_in(dir: &Path) -> Arc<ServerState> {
        Arc::new(ServerState::new(
            dir.join("data/team-tags.json"),
            dir.join("data/available-tags.json"),
        ))
    }

    #[tokio::test]
    async fn given_team_map_when_saved_then_file_pretty_and_readable() {
        let temp = tempdir().unwrap();
        let state = state_in(temp.path());

        let body = Bytes::from_static(r#"{"paok":["Black","White"]}"#.as_bytes());
        let Json(response) = save_team_tags(State(state.clone()), body).await.unwrap();
        assert!(response.success);

        let on_disk = std::fs::read_to_string(&state.team_tags_file).unwrap();
        assert!(on_disk.contains("\n  \"paok\": [\n"));

        let Json(value) = get_team_tags(State(state)).await.unwrap();
        assert_eq!(value["paok"], vec!["Black".to_string(), "White".to_string()]);
    }

    #[tokio::test]
    async fn given_malformed_body_when_saved_then_rejected_and_no_file() {
        let temp = tempdir().unwrap();
        let state = state_in(temp.path());

        let err = save_available_tags(State(state.clone()), Bytes::from_static(b"{\"not\": \"a list\""))
            .await
            .unwrap_err();
        assert!(matches!(err, ServerError::MalformedPayload(_)));

        let err = save_team_tags(State(state.clone()), Bytes::from_static(b"{\"paok\": [1]}"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServerError::MalformedPayload(_)));
        assert!(!state.available_tags_file.exists());
        assert!(!state.team_tags_file.exists());
    }

    #[tokio::test]
    async fn given_comma_labels_and_unsorted_keys_when_saved_then_written_as_sent() {
        let temp = tempdir().unwrap();
        let state = state_in(temp.path());

        let body = Bytes::from_static(r#"{"paok":["Red, White"],"aek":[" Black "]}"#.as_bytes());
        save_team_tags(State(state.clone()), body).await.unwrap();
        let body = Bytes::from_static(r#"["Red, White"," Black "]"#.as_bytes());
        save_available_tags(State(state.clone()), body).await.unwrap();

        let Json(team_tags) = get_team_tags(State(state.clone())).await.unwrap();
        let keys: Vec<&str> = team_tags.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["paok", "aek"]);
        assert_eq!(team_tags["paok"], vec!["Red, White".to_string()]);
        assert_eq!(team_tags["aek"], vec![" Black ".to_string()]);

        let Json(available) = get_available_tags(State(state)).await.unwrap();
        assert_eq!(available, vec!["Red, White".to_string(), " Black ".to_string()]);
    }

    #[tokio::test]
    async fn given_no_file_when_get_then_read_failed() {
        let temp = tempdir().unwrap();
        let err = get_available_tags(State(state_in(temp.path())))
            .await
            .unwrap_err();
        assert!(matches!(err, ServerError::ReadFailed(_)));
    }

    #[tokio::test]
    async fn given_health_when_called_then_ok() {
        let Json(response) = health().await;
        assert_eq!(response.status, "OK");
    }
}
