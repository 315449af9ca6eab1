use anyhow::{Context, Result, anyhow};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use keyring::Entry;
use std::sync::{Arc, RwLock};

const KEYRING_SERVICE: &str = "betomeshi";

/// Somewhere a bearer token can live between requests.
///
/// `get` never fails: a store that can't be read simply has no token, and the
/// request goes out unauthenticated.
pub trait TokenStore: Send + Sync {
    fn get(&self) -> Option<String>;
    fn set(&self, token: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Process-local store. Forgets everything on exit.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.token.read().ok().and_then(|t| t.clone())
    }

    fn set(&self, token: &str) -> Result<()> {
        let mut slot = self
            .token
            .write()
            .map_err(|_| anyhow!("token store lock poisoned"))?;
        *slot = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut slot = self
            .token
            .write()
            .map_err(|_| anyhow!("token store lock poisoned"))?;
        *slot = None;
        Ok(())
    }
}

/// Token kept in the OS keyring under the logged-in username.
#[derive(Debug, Clone)]
pub struct KeyringTokenStore {
    account: String,
}

impl KeyringTokenStore {
    pub fn new(account: impl Into<String>) -> Self {
        Self {
            account: account.into().trim().to_string(),
        }
    }

    fn entry(&self) -> keyring::Result<Entry> {
        // new_with_target so Windows picks the same credential store every time
        Entry::new_with_target(KEYRING_SERVICE, KEYRING_SERVICE, &self.account)
    }
}

impl TokenStore for KeyringTokenStore {
    fn get(&self) -> Option<String> {
        self.entry().ok()?.get_password().ok()
    }

    fn set(&self, token: &str) -> Result<()> {
        self.entry()
            .and_then(|entry| entry.set_password(token))
            .with_context(|| format!("Could not save token to keyring for {}", self.account))
    }

    fn clear(&self) -> Result<()> {
        match self.entry().and_then(|entry| entry.delete_credential()) {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).context("Could not remove token from keyring"),
        }
    }
}

/// The session context handed to the API client.
///
/// Cheap to clone; every clone sees the same token.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn TokenStore>,
}

impl Session {
    pub fn new(store: impl TokenStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// A session with nothing persisted behind it.
    pub fn in_memory() -> Self {
        Self::new(MemoryTokenStore::default())
    }

    pub fn token(&self) -> Option<String> {
        self.store.get()
    }

    pub fn set_token(&self, token: &str) -> Result<()> {
        self.store.set(token)
    }

    pub fn clear(&self) -> Result<()> {
        self.store.clear()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

/// Pulls a display name out of a JWT without verifying it.
///
/// Reads `sub`, falling back to `username`, and drops any email domain:
/// `haru@example.com` becomes `haru`.
pub fn username_from_token(token: &str) -> Option<String> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;

    let name = claims
        .get("sub")
        .and_then(|v| v.as_str())
        .or_else(|| claims.get("username").and_then(|v| v.as_str()))?;

    name.split('@')
        .next()
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}
