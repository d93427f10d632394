//! External secrets module
//!
//! Enterprise module, gated by the `feat:externalSecrets` license flag. Keeps
//! the set of connected secrets providers while active.

use async_trait::async_trait;
use serde_json::json;
use std::sync::{Mutex, PoisonError};
use tracing::debug;

use crate::module::registry::metadata::{ModuleClass, ModuleDeclaration};
use crate::module::traits::{LicenseFlag, Module, ModuleError, ModuleName, ModuleSettings};

pub const EXTERNAL_SECRETS_LICENSE: LicenseFlag = LicenseFlag::from_static("feat:externalSecrets");

const PROVIDERS: [&str; 5] = [
    "aws-secrets-manager",
    "azure-key-vault",
    "gcp-secrets-manager",
    "infisical",
    "vault",
];

/// Seconds between provider refreshes
const UPDATE_INTERVAL_SECS: u64 = 300;

#[derive(Debug, Default)]
pub struct ExternalSecretsModule {
    connected: Mutex<Vec<&'static str>>,
}

impl ExternalSecretsModule {
    pub fn declaration() -> ModuleDeclaration {
        ModuleDeclaration::new(ModuleName::EXTERNAL_SECRETS, ModuleClass::of::<Self>())
            .licensed(EXTERNAL_SECRETS_LICENSE)
    }

    pub fn connected_providers(&self) -> Vec<&'static str> {
        self.connected
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Module for ExternalSecretsModule {
    async fn init(&self) -> Result<(), ModuleError> {
        let mut connected = self.connected.lock().unwrap_or_else(PoisonError::into_inner);
        connected.clear();
        connected.extend(PROVIDERS);
        debug!(providers = connected.len(), "External secrets providers connected");
        Ok(())
    }

    async fn settings(&self) -> Result<Option<ModuleSettings>, ModuleError> {
        Ok(Some(json!({
            "providers": self.connected_providers(),
            "updateIntervalSeconds": UPDATE_INTERVAL_SECS,
        })))
    }

    async fn shutdown(&self) -> Result<(), ModuleError> {
        self.connected
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        debug!("External secrets providers disconnected");
        Ok(())
    }
}
