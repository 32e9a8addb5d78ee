// src/application/services/admin_gate.rs
use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::repositories::key_value_store::{KeyValueStore, ADMIN_KEY};

/// Shared-secret gate in front of every write path.
///
/// Not a security boundary: the secret is compared as plain text and the
/// session flag lives in the local store.
#[derive(Debug)]
pub struct AdminGate {
    store: Arc<dyn KeyValueStore>,
    password: String,
}

impl AdminGate {
    pub fn new(store: Arc<dyn KeyValueStore>, password: impl Into<String>) -> Self {
        Self {
            store,
            password: password.into(),
        }
    }

    /// True and persists the session flag when the password matches
    #[instrument(skip_all, level = "debug")]
    pub fn login(&self, password: &str) -> bool {
        if password != self.password {
            info!("Admin login rejected");
            return false;
        }
        if let Err(e) = self.store.set(ADMIN_KEY, "true") {
            warn!("Could not persist admin session: {}", e);
        }
        true
    }

    pub fn logout(&self) {
        if let Err(e) = self.store.remove(ADMIN_KEY) {
            warn!("Could not clear admin session: {}", e);
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.store.get(ADMIN_KEY), Ok(Some(flag)) if flag == "true")
    }

    /// `Err(Unauthorized)` unless logged in
    pub fn require_admin(&self) -> ApplicationResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ApplicationError::Unauthorized)
        }
    }
}
