//! Predicate filters over the catalog.
//!
//! Every filter keeps the input order and treats an empty selection as "no constraint", so
//! the stages can be chained in any order with the same result.

mod criteria;

pub use criteria::{BracketParseError, DisbursementType, FilterCriteria, IseeBracket};

use super::domain::{Bonus, BonusStatus, Category, ChildAgeBracket};

fn retain<'a, I, P>(bonuses: I, predicate: P) -> Vec<&'a Bonus>
where
    I: IntoIterator<Item = &'a Bonus>,
    P: Fn(&Bonus) -> bool,
{
    bonuses.into_iter().filter(|bonus| predicate(bonus)).collect()
}

pub fn matches_search(bonus: &Bonus, needle: &str) -> bool {
    bonus.name.to_lowercase().contains(needle)
        || bonus.description.to_lowercase().contains(needle)
        || bonus
            .categories
            .iter()
            .any(|category| category.tag().to_lowercase().contains(needle))
}

/// Case-insensitive match on name, description or category tag.
pub fn filter_by_search<'a, I>(bonuses: I, search: &str) -> Vec<&'a Bonus>
where
    I: IntoIterator<Item = &'a Bonus>,
{
    if search.trim().is_empty() {
        return bonuses.into_iter().collect();
    }

    let needle = search.to_lowercase();
    retain(bonuses, |bonus| matches_search(bonus, &needle))
}

/// Parse the selected bracket tags, skipping (and logging) malformed ones.
pub fn parse_isee_brackets(tags: &[String]) -> Vec<IseeBracket> {
    tags.iter()
        .filter_map(|tag| match tag.parse::<IseeBracket>() {
            Ok(bracket) => Some(bracket),
            Err(err) => {
                tracing::warn!(error = %err, "skipping ISEE bracket");
                None
            }
        })
        .collect()
}

pub fn matches_isee(bonus: &Bonus, brackets: &[IseeBracket]) -> bool {
    !bonus.isee.required
        || brackets
            .iter()
            .any(|bracket| bracket.overlaps(bonus.isee.min, bonus.isee.max))
}

/// Bonuses compatible with at least one selected ISEE bracket; bonuses without an ISEE
/// requirement always pass.
pub fn filter_by_isee<'a, I>(bonuses: I, tags: &[String]) -> Vec<&'a Bonus>
where
    I: IntoIterator<Item = &'a Bonus>,
{
    if tags.is_empty() {
        return bonuses.into_iter().collect();
    }

    let brackets = parse_isee_brackets(tags);
    retain(bonuses, |bonus| matches_isee(bonus, &brackets))
}

pub fn filter_by_categories<'a, I>(bonuses: I, categories: &[Category]) -> Vec<&'a Bonus>
where
    I: IntoIterator<Item = &'a Bonus>,
{
    if categories.is_empty() {
        return bonuses.into_iter().collect();
    }

    retain(bonuses, |bonus| {
        categories
            .iter()
            .any(|category| bonus.has_category(*category))
    })
}

pub fn filter_by_disbursement<'a, I>(bonuses: I, selected: &[DisbursementType]) -> Vec<&'a Bonus>
where
    I: IntoIterator<Item = &'a Bonus>,
{
    if selected.is_empty() {
        return bonuses.into_iter().collect();
    }

    retain(bonuses, |bonus| selected.contains(&DisbursementType::of(bonus)))
}

/// Bonuses declaring at least one of the selected child-age brackets. Bonuses without a
/// child-age requirement are dropped while this filter is active.
pub fn filter_by_child_age<'a, I>(bonuses: I, selected: &[ChildAgeBracket]) -> Vec<&'a Bonus>
where
    I: IntoIterator<Item = &'a Bonus>,
{
    if selected.is_empty() {
        return bonuses.into_iter().collect();
    }

    retain(bonuses, |bonus| {
        bonus
            .requirements
            .child_ages
            .iter()
            .any(|bracket| selected.contains(bracket))
    })
}

pub fn filter_by_status<'a, I>(bonuses: I, selected: &[BonusStatus]) -> Vec<&'a Bonus>
where
    I: IntoIterator<Item = &'a Bonus>,
{
    if selected.is_empty() {
        return bonuses.into_iter().collect();
    }

    retain(bonuses, |bonus| selected.contains(&bonus.status))
}

/// Search, then ISEE, category, disbursement, child age and status.
pub fn apply_all_filters<'a, I>(bonuses: I, criteria: &FilterCriteria) -> Vec<&'a Bonus>
where
    I: IntoIterator<Item = &'a Bonus>,
{
    let filtered = filter_by_search(bonuses, &criteria.search);
    let filtered = filter_by_isee(filtered, &criteria.isee);
    let filtered = filter_by_categories(filtered, &criteria.categories);
    let filtered = filter_by_disbursement(filtered, &criteria.disbursement);
    let filtered = filter_by_child_age(filtered, &criteria.child_ages);
    let filtered = filter_by_status(filtered, &criteria.status);

    tracing::debug!(
        matched = filtered.len(),
        active = criteria.has_active_filters(),
        "applied catalog filters"
    );
    filtered
}
