//! User document store.
//!
//! Concurrent map of user documents keyed by identifier, persisted to a JSON
//! file on disk when `data_dir` is configured. The store exposes plain
//! repository operations (find, insert, replace, delete) that take and
//! return owned documents; relationship rules live in the service layer.
//!
//! There is no uniqueness constraint on `username` here. Username filters
//! scan the map, and the registration-time existence check in the service is
//! the only guard against duplicates.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use dashmap::DashMap;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use super::config::DirectoryConfig;
use super::types::User;

/// On-disk persistence format.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedData {
    users: HashMap<String, User>,
}

/// Store for user documents.
#[derive(Clone)]
pub struct UserStore {
    /// Identifier → user document.
    users: Arc<DashMap<String, User>>,

    /// Directory for persistence. None = in-memory only.
    data_dir: Option<PathBuf>,
}

impl UserStore {
    /// Create a new user store.
    pub fn new(config: &DirectoryConfig) -> Self {
        Self {
            users: Arc::new(DashMap::new()),
            data_dir: config.data_dir.as_ref().map(PathBuf::from),
        }
    }

    // ── Persistence ───────────────────────────────────────────────────────────

    /// Path to the user data file.
    fn data_file_path(&self) -> Option<PathBuf> {
        self.data_dir.as_ref().map(|dir| dir.join("users.json"))
    }

    /// Load user documents from disk.
    ///
    /// Called once at startup. If the file doesn't exist or is corrupt,
    /// logs a warning and starts with an empty store.
    pub fn load_from_disk(&self) -> usize {
        let path = match self.data_file_path() {
            Some(p) => p,
            None => {
                tracing::info!("No data_dir configured, running in-memory only");
                return 0;
            }
        };

        if !path.exists() {
            tracing::info!(path = %path.display(), "No existing user data file, starting fresh");
            return 0;
        }

        match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<PersistedData>(&contents) {
                Ok(data) => {
                    let count = data.users.len();
                    for (id, user) in data.users {
                        self.users.insert(id, user);
                    }
                    tracing::info!(
                        users = count,
                        path = %path.display(),
                        "User data loaded from disk"
                    );
                    count
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        path = %path.display(),
                        "Failed to parse user data file, starting fresh"
                    );
                    0
                }
            },
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    path = %path.display(),
                    "Failed to read user data file, starting fresh"
                );
                0
            }
        }
    }

    /// Persist current state to disk.
    ///
    /// Uses atomic write (write to temp file, then rename) to prevent
    /// corruption.
    fn persist_to_disk(&self) {
        let path = match self.data_file_path() {
            Some(p) => p,
            None => return, // No persistence configured
        };

        let users: HashMap<String, User> = self
            .users
            .iter()
            .map(|r| (r.key().clone(), r.value().clone()))
            .collect();

        let data = PersistedData { users };

        let json = match serde_json::to_string_pretty(&data) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize user data");
                return;
            }
        };

        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::error!(error = %e, path = %parent.display(), "Failed to create data directory");
                return;
            }
        }

        let tmp_path = path.with_extension("json.tmp");
        match std::fs::write(&tmp_path, &json) {
            Ok(()) => {
                if let Err(e) = std::fs::rename(&tmp_path, &path) {
                    tracing::error!(error = %e, "Failed to rename temp file to users.json");
                    let _ = std::fs::remove_file(&tmp_path);
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to write user data temp file");
            }
        }
    }

    // ── Repository Operations ─────────────────────────────────────────────────

    /// Generate a fresh store-native identifier: 24 hex characters.
    fn new_object_id() -> String {
        let mut bytes = [0u8; 12];
        rand::thread_rng().fill_bytes(&mut bytes);
        hex::encode(bytes)
    }

    /// Insert a new user document under a fresh identifier (any
    /// caller-provided id is replaced). Returns the stored document, or
    /// `None` if the store could not assign an identifier.
    pub fn insert(&self, mut user: User) -> Option<User> {
        let id = Self::new_object_id();
        if self.users.contains_key(&id) {
            // Identifier collision. No retry: transient store failures
            // surface to the caller immediately.
            return None;
        }

        user.id = id.clone();
        self.users.insert(id, user.clone());
        self.persist_to_disk();
        Some(user)
    }

    /// Find a document by identifier.
    pub fn find_by_id(&self, id: &str) -> Option<User> {
        self.users.get(id).map(|u| u.clone())
    }

    /// Find-by-filter over the username field. Exact match; with no
    /// uniqueness constraint the first match wins.
    pub fn find_by_username(&self, username: &str) -> Option<User> {
        self.users
            .iter()
            .find(|u| u.username == username)
            .map(|u| u.value().clone())
    }

    /// Replace the document stored under `id` with `updated`.
    ///
    /// Returns whether a stored document was modified: `false` both when no
    /// document has this identifier and when the replacement equals the
    /// stored value (modified-count semantics).
    pub fn update(&self, id: &str, updated: User) -> bool {
        let modified = match self.users.get_mut(id) {
            Some(mut entry) => {
                if *entry == updated {
                    false
                } else {
                    *entry = updated;
                    true
                }
            }
            None => false,
        };

        if modified {
            self.persist_to_disk();
        }
        modified
    }

    /// Delete a document by identifier. Returns whether one was removed.
    pub fn delete_by_id(&self, id: &str) -> bool {
        let removed = self.users.remove(id).is_some();
        if removed {
            self.persist_to_disk();
        }
        removed
    }

    /// Every stored document, in unspecified order.
    pub fn all(&self) -> Vec<User> {
        self.users.iter().map(|u| u.value().clone()).collect()
    }

    /// Number of stored documents.
    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
