use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config;

/// Default credential file name inside the steamdash config directory.
pub const CREDENTIAL_FILE: &str = "credential.json";

/// Bearer credential issued by a successful login.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Token sent as `Authorization: Bearer <token>`.
    pub access_token: String,
    /// Display name greeted in the dashboard.
    #[serde(default)]
    pub nickname: String,
    /// When the credential was stored.
    pub issued_at: DateTime<Utc>,
}

impl Credential {
    /// Build a credential stamped with the current time.
    pub fn new(access_token: impl Into<String>, nickname: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            nickname: nickname.into(),
            issued_at: Utc::now(),
        }
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"<redacted>")
            .field("nickname", &self.nickname)
            .field("issued_at", &self.issued_at)
            .finish()
    }
}

/// Reads and writes the credential file. It survives restarts until logout.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Store backed by the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location under the user's config directory.
    pub fn default_path() -> PathBuf {
        config::app_dir().join(CREDENTIAL_FILE)
    }

    /// File backing this store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored credential, `None` when absent.
    ///
    /// A corrupt file is reported and treated as logged out.
    pub fn load(&self) -> Result<Option<Credential>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        match serde_json::from_str::<Credential>(&content) {
            Ok(credential) if !credential.access_token.is_empty() => Ok(Some(credential)),
            Ok(_) => Ok(None),
            Err(err) => {
                warn!(path = %self.path.display(), "Ignoring unreadable credential: {err}");
                Ok(None)
            }
        }
    }

    /// Persist `credential`, creating parent directories if needed.
    pub fn save(&self, credential: &Credential) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let serialised =
            serde_json::to_vec_pretty(credential).context("failed to serialize credential")?;
        fs::write(&self.path, serialised)
            .with_context(|| format!("failed to write {}", self.path.display()))
    }

    /// Remove the stored credential. Missing files are not an error.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => {
                Err(err).with_context(|| format!("failed to remove {}", self.path.display()))
            }
        }
    }
}
