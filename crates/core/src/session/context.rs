use std::sync::Arc;

use anyhow::Result;
use parking_lot::RwLock;
use tracing::{info, warn};

use super::store::{Credential, CredentialStore};

/// Thread-safe login session shared by the API client and the views.
///
/// Cloning is cheap; all clones observe the same credential.
#[derive(Debug, Clone)]
pub struct Session {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Debug)]
struct Inner {
    store: Option<CredentialStore>,
    credential: Option<Credential>,
}

impl Session {
    /// Restore the persisted credential from `store`, if any.
    pub fn restore(store: CredentialStore) -> Result<Self> {
        let credential = store.load()?;
        if let Some(credential) = &credential {
            info!(nickname = %credential.nickname, "Restored stored credential");
        }
        Ok(Self {
            inner: Arc::new(RwLock::new(Inner {
                store: Some(store),
                credential,
            })),
        })
    }

    /// Session that never touches the disk.
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                store: None,
                credential: None,
            })),
        }
    }

    /// Begin a session: hold and persist `credential`.
    ///
    /// The credential is held for this run even when persisting it fails.
    pub fn establish(&self, credential: Credential) -> Result<()> {
        let mut inner = self.inner.write();
        info!(nickname = %credential.nickname, "Session established");
        let persisted = match &inner.store {
            Some(store) => store.save(&credential),
            None => Ok(()),
        };
        inner.credential = Some(credential);
        persisted
    }

    /// End the session, dropping the in-memory and persisted credential.
    ///
    /// The in-memory credential is dropped even when the file cannot be removed.
    pub fn clear(&self) -> Result<()> {
        let mut inner = self.inner.write();
        inner.credential = None;
        info!("Session cleared");
        match &inner.store {
            Some(store) => store.clear().map_err(|err| {
                warn!("Failed to remove stored credential: {err}");
                err
            }),
            None => Ok(()),
        }
    }

    /// Token to attach to outbound requests.
    pub fn bearer_token(&self) -> Option<String> {
        self.inner
            .read()
            .credential
            .as_ref()
            .map(|credential| credential.access_token.clone())
    }

    /// Nickname of the signed-in account.
    pub fn nickname(&self) -> Option<String> {
        self.inner
            .read()
            .credential
            .as_ref()
            .map(|credential| credential.nickname.clone())
    }

    /// Replace the greeted nickname, e.g. after refreshing account info.
    pub fn update_nickname(&self, nickname: &str) -> Result<()> {
        let mut inner = self.inner.write();
        let Inner { store, credential } = &mut *inner;
        let Some(credential) = credential.as_mut() else {
            return Ok(());
        };
        if credential.nickname == nickname {
            return Ok(());
        }
        credential.nickname = nickname.to_string();
        if let Some(store) = store {
            store.save(credential)?;
        }
        Ok(())
    }

    /// Whether a credential is present.
    pub fn is_authenticated(&self) -> bool {
        self.inner.read().credential.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn login_logout_lifecycle_persists() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("credential.json");

        let session = Session::restore(CredentialStore::new(&path))?;
        assert!(!session.is_authenticated());
        assert!(session.bearer_token().is_none());

        session.establish(Credential::new("abc", "gamer"))?;
        assert!(session.is_authenticated());
        assert_eq!(session.bearer_token().as_deref(), Some("abc"));

        let restored = Session::restore(CredentialStore::new(&path))?;
        assert_eq!(restored.nickname().as_deref(), Some("gamer"));

        restored.clear()?;
        assert!(!restored.is_authenticated());
        let after_logout = Session::restore(CredentialStore::new(&path))?;
        assert!(!after_logout.is_authenticated());
        Ok(())
    }

    #[test]
    fn clones_share_state() -> Result<()> {
        let session = Session::in_memory();
        let view_handle = session.clone();
        session.establish(Credential::new("abc", "gamer"))?;
        assert!(view_handle.is_authenticated());
        view_handle.update_nickname("renamed")?;
        assert_eq!(session.nickname().as_deref(), Some("renamed"));
        view_handle.clear()?;
        assert!(!session.is_authenticated());
        Ok(())
    }
}
