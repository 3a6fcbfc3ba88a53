//! Explicit session state. The bearer token lives in an injected
//! [`AuthSession`] backed by a [`TokenStore`], and callers gate on
//! [`AuthSession::is_authenticated`] instead of reading ambient storage.

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::sync::RwLock;
use tracing::info;

/// Durable home of the bearer token. The only client-side persisted state.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> io::Result<Option<String>>;
    fn save(&self, token: &str) -> io::Result<()>;
    fn clear(&self) -> io::Result<()>;
}

/// Single-line token file under the user's profile directory.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> io::Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(token.to_string()))
                }
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn save(&self, token: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token)
    }

    fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err),
        }
    }
}

/// In-memory store for tests and throwaway sessions.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: std::sync::Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.token
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> io::Result<Option<String>> {
        Ok(self.slot().clone())
    }

    fn save(&self, token: &str) -> io::Result<()> {
        *self.slot() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        *self.slot() = None;
        Ok(())
    }
}

/// Shared session handle: the current token plus its durable store.
pub struct AuthSession {
    token: RwLock<Option<String>>,
    store: Arc<dyn TokenStore>,
}

impl AuthSession {
    /// Restores any persisted token. A missing token is a valid
    /// (unauthenticated) session, not an error.
    pub fn load(store: Arc<dyn TokenStore>) -> io::Result<Arc<Self>> {
        let token = store.load()?;
        Ok(Arc::new(Self {
            token: RwLock::new(token),
            store,
        }))
    }

    pub async fn is_authenticated(&self) -> bool {
        self.token.read().await.is_some()
    }

    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    /// Persists the token before exposing it; a failed save leaves the
    /// session unauthenticated.
    pub async fn store_token(&self, token: &str) -> io::Result<()> {
        self.store.save(token)?;
        *self.token.write().await = Some(token.to_string());
        info!("session: token stored");
        Ok(())
    }

    pub async fn logout(&self) -> io::Result<()> {
        self.store.clear()?;
        *self.token.write().await = None;
        info!("session: token cleared");
        Ok(())
    }
}

/// Default token location: `$HOME/.bakery-admin/token`, falling back to a
/// relative path when HOME is unset.
pub fn default_token_path() -> PathBuf {
    match std::env::var("HOME") {
        Ok(home) if !home.trim().is_empty() => {
            PathBuf::from(home).join(".bakery-admin").join("token")
        }
        _ => PathBuf::from(".bakery-admin").join("token"),
    }
}
