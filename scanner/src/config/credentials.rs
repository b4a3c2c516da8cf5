// Secret lookup for the notifier
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::settings::{CredentialBackend, EmailSettings};
use crate::error::ScanError;

/// Looks up a secret by name.
pub trait CredentialProvider: Send + Sync {
    fn secret(&self, name: &str) -> Result<String, ScanError>;
}

/// Secrets from process environment variables.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvCredentials;

impl CredentialProvider for EnvCredentials {
    fn secret(&self, name: &str) -> Result<String, ScanError> {
        match std::env::var(name) {
            Ok(value) if !value.is_empty() => Ok(value),
            _ => Err(ScanError::MissingCredential(name.to_string())),
        }
    }
}

/// Secrets from a JSON vault file: a flat object mapping names to values.
#[derive(Debug, Clone)]
pub struct VaultFileCredentials {
    path: PathBuf,
}

impl VaultFileCredentials {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn read_vault(&self) -> Result<HashMap<String, String>, ScanError> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            ScanError::CredentialError(format!("cannot read vault '{}': {}", self.path.display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            ScanError::CredentialError(format!("malformed vault '{}': {}", self.path.display(), e))
        })
    }
}

impl CredentialProvider for VaultFileCredentials {
    fn secret(&self, name: &str) -> Result<String, ScanError> {
        self.read_vault()?
            .remove(name)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ScanError::MissingCredential(name.to_string()))
    }
}

impl CredentialProvider for HashMap<String, String> {
    fn secret(&self, name: &str) -> Result<String, ScanError> {
        self.get(name)
            .filter(|value| !value.is_empty())
            .cloned()
            .ok_or_else(|| ScanError::MissingCredential(name.to_string()))
    }
}

/// Provider selected by the email settings.
pub fn credential_provider(email: &EmailSettings) -> Box<dyn CredentialProvider> {
    match email.credential_backend {
        CredentialBackend::Env => Box::new(EnvCredentials),
        CredentialBackend::Vault => Box::new(VaultFileCredentials::new(&email.vault_file)),
    }
}
