use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::domain::{Bonus, BonusId};
use super::repository::BonusRepository;

/// Namespace key under which the favorite ids are persisted.
pub const FAVORITES_STORAGE_KEY: &str = "bonus-favorites";

/// Favorite bonus ids, injected wherever favorites are read or toggled.
pub trait FavoritesStore: Send + Sync {
    /// Unique ids in the order they were first marked.
    fn list(&self) -> Vec<BonusId>;
    fn has(&self, id: &BonusId) -> bool;
    /// Flip membership, returning the new state.
    fn toggle(&self, id: &BonusId) -> bool;

    fn count(&self) -> usize {
        self.list().len()
    }
}

/// Storage failure surfaced by a backend; the store logs these and never propagates them.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

/// Durable string key-value mechanism backing the favorites list.
pub trait FavoritesBackend: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Process-local backend, mainly for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn with_entry(key: &str, value: &str) -> Self {
        let backend = Self::default();
        lock(&backend.entries).insert(key.to_string(), value.to_string());
        backend
    }
}

impl FavoritesBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(lock(&self.entries).get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        lock(&self.entries).insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl FavoritesBackend for FileBackend {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }
}

/// Favorites persisted as a JSON array of ids under [`FAVORITES_STORAGE_KEY`].
///
/// Missing or corrupt storage reads as an empty list and failed writes are dropped, so the
/// catalog keeps working when storage does not.
#[derive(Debug)]
pub struct KeyValueFavorites<B> {
    backend: B,
    writer: Mutex<()>,
}

impl<B: FavoritesBackend> KeyValueFavorites<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            writer: Mutex::new(()),
        }
    }

    fn load(&self) -> Vec<BonusId> {
        let raw = match self.backend.read(FAVORITES_STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                tracing::warn!(error = %err, "favorites unreadable, treating as empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<BonusId>>(&raw) {
            Ok(mut ids) => {
                let mut seen = std::collections::HashSet::new();
                ids.retain(|id| seen.insert(id.clone()));
                ids
            }
            Err(err) => {
                tracing::warn!(error = %err, "favorites corrupt, treating as empty");
                Vec::new()
            }
        }
    }

    fn save(&self, ids: &[BonusId]) {
        let payload = match serde_json::to_string(ids) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::error!(error = %err, "failed to encode favorites");
                return;
            }
        };

        if let Err(err) = self.backend.write(FAVORITES_STORAGE_KEY, &payload) {
            tracing::error!(error = %err, "failed to persist favorites");
        }
    }
}

impl<B: FavoritesBackend> FavoritesStore for KeyValueFavorites<B> {
    fn list(&self) -> Vec<BonusId> {
        self.load()
    }

    fn has(&self, id: &BonusId) -> bool {
        self.load().contains(id)
    }

    fn toggle(&self, id: &BonusId) -> bool {
        let _guard = lock(&self.writer);
        let mut ids = self.load();

        let now_favorite = match ids.iter().position(|existing| existing == id) {
            Some(position) => {
                ids.remove(position);
                false
            }
            None => {
                ids.push(id.clone());
                true
            }
        };

        self.save(&ids);
        tracing::debug!(bonus = %id, favorite = now_favorite, "toggled favorite");
        now_favorite
    }
}

/// Favorite bonuses in catalog order; ids no longer in the catalog are skipped.
pub fn favorite_bonuses<'a, R, F>(repository: &'a R, store: &F) -> Vec<&'a Bonus>
where
    R: BonusRepository + ?Sized,
    F: FavoritesStore + ?Sized,
{
    let favorites = store.list();
    repository
        .all()
        .iter()
        .filter(|bonus| favorites.contains(&bonus.id))
        .collect()
}
