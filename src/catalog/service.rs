use std::sync::Arc;

use super::domain::{Bonus, BonusId};
use super::eligibility::{EligibilityEngine, EligibilityOutcome, EligibilityProfile};
use super::favorites::{favorite_bonuses, FavoritesStore};
use super::filters::{apply_all_filters, FilterCriteria};
use super::repository::BonusRepository;
use super::views::{BonusCardView, BonusDetailView, ResultSummary};

/// Service composing the catalog repository, favorites store and eligibility engine.
pub struct CatalogService<R, F> {
    repository: Arc<R>,
    favorites: Arc<F>,
    engine: Arc<EligibilityEngine>,
}

/// Cards plus the headline counts for one listing request.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CatalogPage {
    pub summary: ResultSummary,
    pub headline: String,
    pub bonus: Vec<BonusCardView>,
}

/// Eligible bonus with the decision trail behind it.
#[derive(Debug, Clone, serde::Serialize)]
pub struct EligibleBonus {
    #[serde(flatten)]
    pub card: BonusCardView,
    pub outcome: EligibilityOutcome,
}

impl<R, F> CatalogService<R, F>
where
    R: BonusRepository + 'static,
    F: FavoritesStore + 'static,
{
    pub fn new(repository: Arc<R>, favorites: Arc<F>, engine: EligibilityEngine) -> Self {
        Self {
            repository,
            favorites,
            engine: Arc::new(engine),
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    fn page(&self, matched: Vec<&Bonus>, total: usize) -> CatalogPage {
        let favorites = self.favorites.list();
        let summary = ResultSummary::new(matched.len(), total);
        CatalogPage {
            headline: summary.headline(),
            summary,
            bonus: matched
                .into_iter()
                .map(|bonus| BonusCardView::new(bonus, favorites.contains(&bonus.id)))
                .collect(),
        }
    }

    /// Catalog listing narrowed by the search bar and sidebar selections.
    pub fn search(&self, criteria: &FilterCriteria) -> CatalogPage {
        let all = self.repository.all();
        let matched = apply_all_filters(all, criteria);
        self.page(matched, all.len())
    }

    pub fn get(&self, id: &BonusId) -> Result<BonusDetailView, CatalogServiceError> {
        let bonus = self
            .repository
            .get(id)
            .ok_or_else(|| CatalogServiceError::NotFound(id.clone()))?;
        Ok(BonusDetailView::new(bonus, self.favorites.has(id)))
    }

    /// Bonuses the profile qualifies for, in catalog order.
    pub fn eligible(
        &self,
        profile: &EligibilityProfile,
    ) -> Result<Vec<EligibleBonus>, CatalogServiceError> {
        if !profile.is_complete() {
            return Err(CatalogServiceError::IncompleteProfile);
        }

        let favorites = self.favorites.list();
        let eligible = self
            .engine
            .evaluate_eligible(self.repository.all(), profile)
            .into_iter()
            .map(|(bonus, outcome)| EligibleBonus {
                card: BonusCardView::new(bonus, favorites.contains(&bonus.id)),
                outcome,
            })
            .collect::<Vec<_>>();

        tracing::info!(
            eligible = eligible.len(),
            total = self.repository.all().len(),
            "evaluated eligibility profile"
        );
        Ok(eligible)
    }

    /// Decision for every bonus, including the ineligible ones.
    pub fn evaluate_all(&self, profile: &EligibilityProfile) -> Vec<EligibilityOutcome> {
        self.repository
            .all()
            .iter()
            .map(|bonus| self.engine.evaluate(bonus, profile))
            .collect()
    }

    pub fn toggle_favorite(&self, id: &BonusId) -> Result<bool, CatalogServiceError> {
        if self.repository.get(id).is_none() {
            return Err(CatalogServiceError::NotFound(id.clone()));
        }
        Ok(self.favorites.toggle(id))
    }

    /// Favorites page: favorite bonuses narrowed by the same filters as the catalog.
    pub fn favorites(&self, criteria: &FilterCriteria) -> CatalogPage {
        let favorite = favorite_bonuses(self.repository.as_ref(), self.favorites.as_ref());
        let total = favorite.len();
        let matched = apply_all_filters(favorite, criteria);
        self.page(matched, total)
    }
}

/// Error raised by the catalog service.
#[derive(Debug, thiserror::Error)]
pub enum CatalogServiceError {
    #[error("bonus '{0}' not found")]
    NotFound(BonusId),
    #[error("residence and citizenship are required for the eligibility check")]
    IncompleteProfile,
}
