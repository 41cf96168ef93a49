use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::warn;

/// File name (and conceptual slot name) the access token lives under.
pub const TOKEN_SLOT: &str = "access_token";

/// Where the bearer token lives between requests. Reads and writes are
/// infallible by contract: a store that cannot produce a token reports
/// `None` and the client sends the request unauthenticated.
pub trait TokenStore: Send + Sync {
    fn get(&self) -> Option<String>;
    fn set(&self, token: &str);
    fn clear(&self);
}

/// In-process store, the default for tests and embedded use.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.slot
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn set(&self, token: &str) {
        *self.slot.write().unwrap_or_else(|e| e.into_inner()) = Some(token.to_string());
    }

    fn clear(&self) {
        *self.slot.write().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

/// Store backed by a file named `access_token` inside the given directory,
/// so the credential survives across CLI invocations.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(TOKEN_SLOT),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<String> {
        fs::read_to_string(&self.path)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn set(&self, token: &str) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                warn!("failed to create token directory {}: {}", parent.display(), e);
                return;
            }
        }
        if let Err(e) = fs::write(&self.path, token) {
            warn!("failed to persist token to {}: {}", self.path.display(), e);
        }
    }

    fn clear(&self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("failed to remove token file {}: {}", self.path.display(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.get(), None);

        store.set("tok-123");
        assert_eq!(store.get(), Some("tok-123".to_string()));

        store.clear();
        assert_eq!(store.get(), None);
    }

    #[test]
    fn test_file_store_missing_file_reads_none() {
        let store = FileTokenStore::new(std::env::temp_dir().join("todo-client-nonexistent"));
        assert_eq!(store.get(), None);
        // Clearing an empty slot is a no-op, not an error.
        store.clear();
    }
}
