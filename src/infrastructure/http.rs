// src/infrastructure/http.rs
use std::time::Duration;

use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument};
use url::Url;

use crate::domain::error::DomainResult;
use crate::domain::repositories::remote_tag_repository::RemoteTagRepository;
use crate::domain::tag::Tag;
use crate::domain::tag_data::TeamTags;
use crate::infrastructure::error::InfrastructureError;

pub const TEAM_TAGS_PATH: &str = "api/team-tags";
pub const AVAILABLE_TAGS_PATH: &str = "api/available-tags";
pub const HEALTH_PATH: &str = "api/health";

/// Client of the file-save server
#[derive(Debug, Clone)]
pub struct HttpTagRepository {
    base_url: Url,
    client: Client,
}

impl HttpTagRepository {
    pub fn new(server_url: &str, timeout_milliseconds: u64) -> DomainResult<Self> {
        // a trailing slash makes `join` append instead of replacing the last segment
        let normalized = format!("{}/", server_url.trim().trim_end_matches('/'));
        let base_url = Url::parse(&normalized).map_err(|e| {
            InfrastructureError::Network(format!("Invalid server URL {}: {}", server_url, e))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_milliseconds))
            .build()
            .unwrap_or_else(|_| Client::new()); // Fallback to default client in case of builder failure

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> DomainResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| InfrastructureError::Network(format!("Invalid endpoint {}: {}", path, e)).into())
    }

    fn check_status(response: Response) -> Result<Response, InfrastructureError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().unwrap_or_default();
            Err(InfrastructureError::Network(format!(
                "Server answered {}: {}",
                status,
                body.trim()
            )))
        }
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> DomainResult<T> {
        let url = self.endpoint(path)?;
        debug!("GET {}", url);
        let response = Self::check_status(self.client.get(url).send().map_err(InfrastructureError::from)?)?;
        let value = response
            .json::<T>()
            .map_err(|e| InfrastructureError::Serialization(e.to_string()))?;
        Ok(value)
    }

    fn post_json<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> DomainResult<()> {
        let url = self.endpoint(path)?;
        debug!("POST {}", url);
        Self::check_status(
            self.client
                .post(url)
                .json(body)
                .send()
                .map_err(InfrastructureError::from)?,
        )?;
        Ok(())
    }
}

impl RemoteTagRepository for HttpTagRepository {
    #[instrument(skip(self), level = "debug")]
    fn fetch_team_tags(&self) -> DomainResult<TeamTags> {
        self.get_json(TEAM_TAGS_PATH)
    }

    #[instrument(skip(self), level = "debug")]
    fn fetch_available_tags(&self) -> DomainResult<Vec<Tag>> {
        self.get_json(AVAILABLE_TAGS_PATH)
    }

    #[instrument(skip_all, level = "debug")]
    fn save_team_tags(&self, team_tags: &TeamTags) -> DomainResult<()> {
        self.post_json(TEAM_TAGS_PATH, team_tags)
    }

    #[instrument(skip_all, level = "debug")]
    fn save_available_tags(&self, available_tags: &[Tag]) -> DomainResult<()> {
        self.post_json(AVAILABLE_TAGS_PATH, available_tags)
    }

    #[instrument(skip(self), level = "trace")]
    fn is_online(&self) -> bool {
        let Ok(url) = self.endpoint(HEALTH_PATH) else {
            return false;
        };
        match self.client.get(url).send() {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                debug!("Health check failed: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_base_with_path_when_endpoint_then_appended() {
        let repo = HttpTagRepository::new("http://localhost:3000/tags-server", 100).unwrap();
        assert_eq!(
            repo.endpoint(TEAM_TAGS_PATH).unwrap().as_str(),
            "http://localhost:3000/tags-server/api/team-tags"
        );

        let repo = HttpTagRepository::new("http://localhost:3000/", 100).unwrap();
        assert_eq!(
            repo.endpoint(HEALTH_PATH).unwrap().as_str(),
            "http://localhost:3000/api/health"
        );
    }

    #[test]
    fn given_garbage_url_when_new_then_error() {
        assert!(HttpTagRepository::new("not a url", 100).is_err());
    }

    #[test]
    fn given_nothing_listening_when_probe_then_offline_and_save_fails() {
        // port 9 (discard) is closed on test machines
        let repo = HttpTagRepository::new("http://127.0.0.1:9", 300).unwrap();
        assert!(!repo.is_online());
        assert!(repo.save_available_tags(&[]).is_err());
        assert!(repo.fetch_team_tags().is_err());
    }
}
