use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::domain::{Bonus, BonusDataset, BonusId};

/// Read-only access to the catalog. Order is stable for the lifetime of the repository.
pub trait BonusRepository: Send + Sync {
    fn all(&self) -> &[Bonus];
    fn get(&self, id: &BonusId) -> Option<&Bonus>;
}

/// Failures while loading the static dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to open bonus dataset at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("bonus dataset is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("bonus dataset lists id '{0}' more than once")]
    DuplicateId(BonusId),
}

/// Repository over a dataset that was deserialized once at startup.
#[derive(Debug, Clone)]
pub struct InMemoryBonusRepository {
    bonuses: Vec<Bonus>,
    index: HashMap<BonusId, usize>,
    last_updated: String,
}

impl InMemoryBonusRepository {
    pub fn from_dataset(dataset: BonusDataset) -> Result<Self, DatasetError> {
        let mut index = HashMap::with_capacity(dataset.bonus.len());
        for (position, bonus) in dataset.bonus.iter().enumerate() {
            if index.insert(bonus.id.clone(), position).is_some() {
                return Err(DatasetError::DuplicateId(bonus.id.clone()));
            }
        }

        Ok(Self {
            bonuses: dataset.bonus,
            index,
            last_updated: dataset.last_updated,
        })
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let dataset: BonusDataset = serde_json::from_reader(reader)?;
        Self::from_dataset(dataset)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let repository = Self::from_reader(BufReader::new(file))?;

        tracing::info!(
            path = %path.display(),
            bonuses = repository.bonuses.len(),
            last_updated = %repository.last_updated,
            "loaded bonus dataset"
        );
        Ok(repository)
    }

    pub fn last_updated(&self) -> &str {
        &self.last_updated
    }
}

impl BonusRepository for InMemoryBonusRepository {
    fn all(&self) -> &[Bonus] {
        &self.bonuses
    }

    fn get(&self, id: &BonusId) -> Option<&Bonus> {
        self.index
            .get(id)
            .and_then(|position| self.bonuses.get(*position))
    }
}
