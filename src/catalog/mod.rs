//! Bonus catalog: dataset model, filter pipeline, eligibility gates and favorites.
//!
//! The filter and eligibility modules are pure functions over borrowed catalog entries;
//! the repository and favorites store are injected through traits so the service and
//! router can be exercised against in-memory doubles.

pub mod domain;
pub mod eligibility;
pub mod favorites;
pub mod filters;
pub mod repository;
pub mod router;
pub mod service;
pub mod views;

#[cfg(test)]
mod tests;

pub use domain::{
    AmountSpec, ApplicationMethod, Bonus, BonusDataset, BonusId, BonusStatus, BracketAmount,
    Category, ChildAgeBracket, Deadline, IncomeBracket, IseeRequirement, Requirement,
    Requirements, TagParseError,
};
pub use eligibility::{
    Child, Citizenship, EligibilityConfig, EligibilityDecision, EligibilityEngine,
    EligibilityOutcome, EligibilityProfile, IneligibilityReason, Region, Residence,
};
pub use favorites::{
    FavoritesBackend, FavoritesStore, FileBackend, KeyValueFavorites, MemoryBackend,
    StorageError, FAVORITES_STORAGE_KEY,
};
pub use filters::{apply_all_filters, DisbursementType, FilterCriteria, IseeBracket};
pub use repository::{BonusRepository, DatasetError, InMemoryBonusRepository};
pub use router::catalog_router;
pub use service::{CatalogPage, CatalogService, CatalogServiceError, EligibleBonus};
