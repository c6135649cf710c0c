//! Credential store: the single persisted bearer token.
//!
//! `set` persists, `get` returns the current token, `clear` removes it. Nothing here
//! expires a token on a timer; expiry is noticed when the API answers 401.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::{Map, Value};
use thiserror::Error;

/// Fixed key the token is stored under.
pub const TOKEN_KEY: &str = "token";

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("credential file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("credential file {path:?} is not a JSON object")]
    Format { path: PathBuf },

    #[error("credential store lock poisoned")]
    Poisoned,
}

/// Holder of at most one bearer token.
pub trait CredentialStore: Send + Sync {
    fn get(&self) -> Option<String>;

    fn set(&self, token: &str) -> Result<(), CredentialError>;

    fn clear(&self) -> Result<(), CredentialError>;

    fn is_present(&self) -> bool {
        self.get().is_some()
    }
}

/// Process-local store (tests, embedding).
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    token: Mutex<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Option<String> {
        self.token.lock().ok().and_then(|token| token.clone())
    }

    fn set(&self, token: &str) -> Result<(), CredentialError> {
        let mut slot = self.token.lock().map_err(|_| CredentialError::Poisoned)?;
        *slot = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialError> {
        let mut slot = self.token.lock().map_err(|_| CredentialError::Poisoned)?;
        *slot = None;
        Ok(())
    }
}

/// JSON key-value file holding the token under [`TOKEN_KEY`].
///
/// Other keys in the document are preserved. A missing file reads as "no token"; an
/// unreadable one is logged and also reads as "no token".
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> CredentialError {
        CredentialError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn load(&self) -> Result<Map<String, Value>, CredentialError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(err) => return Err(self.io_error(err)),
        };

        if raw.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => Ok(map),
            _ => Err(CredentialError::Format {
                path: self.path.clone(),
            }),
        }
    }

    fn save(&self, document: &Map<String, Value>) -> Result<(), CredentialError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let body = serde_json::to_string_pretty(document).map_err(|_| CredentialError::Format {
            path: self.path.clone(),
        })?;

        // Stage next to the target, then rename over it.
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, body).map_err(|e| self.io_error(e))?;
        restrict_permissions(&staging);
        fs::rename(&staging, &self.path).map_err(|e| self.io_error(e))
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Option<String> {
        match self.load() {
            Ok(document) => document
                .get(TOKEN_KEY)
                .and_then(Value::as_str)
                .filter(|token| !token.is_empty())
                .map(str::to_owned),
            Err(err) => {
                tracing::warn!(error = %err, "credential file unreadable; treating as logged out");
                None
            }
        }
    }

    fn set(&self, token: &str) -> Result<(), CredentialError> {
        // A corrupt document is replaced rather than blocking login.
        let mut document = self.load().unwrap_or_default();
        document.insert(TOKEN_KEY.to_string(), Value::String(token.to_string()));
        self.save(&document)
    }

    fn clear(&self) -> Result<(), CredentialError> {
        if !self.path.exists() {
            return Ok(());
        }

        let mut document = match self.load() {
            Ok(document) => document,
            Err(CredentialError::Format { .. }) => Map::new(),
            Err(err) => return Err(err),
        };
        document.remove(TOKEN_KEY);
        self.save(&document)
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    if let Err(err) = fs::set_permissions(path, fs::Permissions::from_mode(0o600)) {
        tracing::debug!(error = %err, "could not restrict credential file permissions");
    }
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) {}
