//src/token.rs
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::Mutex;

const TOKEN_FILE_NAME: &str = "session.token";
const APP_DATA_DIR: &str = "fitness-tracker";
const DATA_ENV_VAR: &str = "FITNESS_DATA_DIR";

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Failed to get application data directory")]
    DataDir,
    #[error("I/O error accessing token file: {0}")]
    Io(#[from] std::io::Error),
}

/// Single-slot persisted auth token.
///
/// The slot survives process restarts (file-backed impl); `get` on an
/// empty slot is `None`, not an error.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn get(&self) -> Result<Option<String>, TokenError>;
    async fn set(&self, token: &str) -> Result<(), TokenError>;
    async fn remove(&self) -> Result<(), TokenError>;
}

/// Gets the path to the token file within the app's data directory.
/// Exposed at crate root as `get_token_path_util`
pub fn get_token_path() -> Result<PathBuf, TokenError> {
    let data_dir = if let Ok(dir) = std::env::var(DATA_ENV_VAR) {
        PathBuf::from(dir)
    } else {
        dirs::data_dir().ok_or(TokenError::DataDir)?.join(APP_DATA_DIR)
    };
    if !data_dir.exists() {
        std::fs::create_dir_all(&data_dir)?;
    }
    Ok(data_dir.join(TOKEN_FILE_NAME))
}

/// Token slot persisted as a single file on disk.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Opens the store at the default per-user data location.
    ///
    /// # Errors
    /// Returns `TokenError::DataDir` if no data directory can be resolved.
    pub fn at_default_location() -> Result<Self, TokenError> {
        Ok(Self::new(get_token_path()?))
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn get(&self) -> Result<Option<String>, TokenError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => {
                let token = raw.trim().to_string();
                Ok(if token.is_empty() { None } else { Some(token) })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(TokenError::Io(e)),
        }
    }

    async fn set(&self, token: &str) -> Result<(), TokenError> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(&self.path, token).await?;
        Ok(())
    }

    async fn remove(&self) -> Result<(), TokenError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(TokenError::Io(e)),
        }
    }
}

/// In-process token slot, for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryTokenStore {
    slot: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeds the slot, mimicking a token left behind by a prior run.
    pub fn with_token(token: &str) -> Self {
        Self {
            slot: Mutex::new(Some(token.to_string())),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get(&self) -> Result<Option<String>, TokenError> {
        Ok(self.slot.lock().await.clone())
    }

    async fn set(&self, token: &str) -> Result<(), TokenError> {
        *self.slot.lock().await = Some(token.to_string());
        Ok(())
    }

    async fn remove(&self) -> Result<(), TokenError> {
        *self.slot.lock().await = None;
        Ok(())
    }
}
