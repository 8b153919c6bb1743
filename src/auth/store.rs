//! Token persistence
//!
//! The short-lived access token and the longer-lived refresh token live
//! behind a pluggable [`TokenBackend`] under fixed keys, so the session
//! logic is identical across the CLI (file-backed) and tests (in-memory).

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::Utc;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use crate::error::{AppError, AppResult};

pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Key/value storage for tokens. Implementations must tolerate concurrent
/// readers; writes are rare (login, refresh, logout).
pub trait TokenBackend: Send + Sync {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&self, key: &str, value: &str) -> AppResult<()>;
    /// Best-effort removal; absence of the key is not an error.
    fn remove(&self, key: &str);
}

/// In-memory backend for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, String>>,
}

impl TokenBackend for MemoryBackend {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) -> AppResult<()> {
        self.entries
            .write()
            .map_err(|_| AppError::Storage("token store poisoned".to_string()))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(key);
        }
    }
}

/// File-backed backend: a single JSON object persisted across runs.
pub struct FileBackend {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl FileBackend {
    pub fn new(path: PathBuf) -> Self {
        let entries = fs::read_to_string(&path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        Self {
            path,
            entries: RwLock::new(entries),
        }
    }

    fn persist(&self, entries: &HashMap<String, String>) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| AppError::Storage(e.to_string()))?;
        }
        let raw = serde_json::to_string_pretty(entries)
            .map_err(|e| AppError::Storage(e.to_string()))?;
        fs::write(&self.path, raw).map_err(|e| AppError::Storage(e.to_string()))
    }
}

impl TokenBackend for FileBackend {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) -> AppResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| AppError::Storage("token store poisoned".to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(key);
            // Removal is best-effort: a failed write leaves stale tokens on
            // disk but never blocks the in-memory clear.
            let _ = self.persist(&entries);
        }
    }
}

/// Claims we care about when probing a token locally.
#[derive(Debug, Deserialize)]
struct ExpiryClaims {
    exp: i64,
}

/// Process-wide token store: short-lived access token plus longer-lived
/// refresh token.
pub struct TokenStore {
    backend: Box<dyn TokenBackend>,
    expiry_leeway_secs: i64,
}

impl TokenStore {
    pub fn new(backend: Box<dyn TokenBackend>, expiry_leeway_secs: i64) -> Self {
        Self {
            backend,
            expiry_leeway_secs,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::<MemoryBackend>::default(), 30)
    }

    pub fn set_access(&self, token: &str) -> AppResult<()> {
        self.backend.write(ACCESS_TOKEN_KEY, token)
    }

    pub fn access(&self) -> Option<String> {
        self.backend.read(ACCESS_TOKEN_KEY)
    }

    pub fn set_refresh(&self, token: &str) -> AppResult<()> {
        self.backend.write(REFRESH_TOKEN_KEY, token)
    }

    pub fn refresh(&self) -> Option<String> {
        self.backend.read(REFRESH_TOKEN_KEY)
    }

    /// Remove both tokens. Best-effort on each slot; never leaves one behind
    /// because the other failed.
    pub fn clear_all(&self) {
        self.backend.remove(ACCESS_TOKEN_KEY);
        self.backend.remove(REFRESH_TOKEN_KEY);
    }

    /// An access token is usable when present and not past its `exp` claim
    /// (minus leeway). The signature is NOT verified, since the console has no
    /// secret; expiry is only probed to avoid a request that is certain to
    /// bounce. Tokens that do not parse as JWTs are passed through and left
    /// for the server to judge.
    pub fn access_usable(&self) -> bool {
        let Some(token) = self.access() else {
            return false;
        };
        match decode_expiry(&token) {
            Some(exp) => exp - self.expiry_leeway_secs > Utc::now().timestamp(),
            None => true,
        }
    }
}

fn decode_expiry(token: &str) -> Option<i64> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();
    decode::<ExpiryClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .ok()
        .map(|data| data.claims.exp)
}
