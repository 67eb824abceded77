use super::common::*;
use crate::catalog::domain::{BonusStatus, Category, ChildAgeBracket};
use crate::catalog::filters::{
    apply_all_filters, filter_by_categories, filter_by_child_age, filter_by_disbursement,
    filter_by_isee, filter_by_search, filter_by_status, DisbursementType, FilterCriteria,
};

#[test]
fn empty_criteria_is_identity() {
    let catalog = catalog();
    let all = apply_all_filters(&catalog, &FilterCriteria::default());
    assert_eq!(all.len(), catalog.len());
    assert_eq!(
        ids(&all),
        catalog.iter().map(|bonus| bonus.id.to_string()).collect::<Vec<_>>()
    );
}

#[test]
fn search_is_case_insensitive_over_name_description_and_category() {
    let catalog = catalog();
    assert_eq!(ids(&filter_by_search(&catalog, "NIDO")), vec!["bonus-nido"]);
    assert_eq!(
        ids(&filter_by_search(&catalog, "utenze")),
        vec!["bonus-sociale"]
    );
    assert_eq!(filter_by_search(&catalog, "   ").len(), catalog.len());
}

#[test]
fn open_isee_bracket_excludes_bonuses_capped_at_its_floor() {
    let mut catalog = catalog();
    catalog.push(with_isee(
        bonus("capped", "Capped", &[Category::Family]),
        None,
        Some(40000.0),
    ));

    let matched = filter_by_isee(&catalog, &["40000+".to_string()]);
    let matched = ids(&matched);
    assert!(!matched.contains(&"capped".to_string()));
    assert!(!matched.contains(&"bonus-nido".to_string()));
    assert!(matched.contains(&"assegno-unico".to_string()));
}

#[test]
fn closed_isee_bracket_keeps_overlapping_bonuses() {
    let catalog = catalog();
    let matched = filter_by_isee(&catalog, &["0-17000".to_string()]);
    assert_eq!(matched.len(), catalog.len());

    let matched = filter_by_isee(&catalog, &["17000-25000".to_string()]);
    assert!(!ids(&matched).contains(&"bonus-sociale".to_string()));
}

#[test]
fn malformed_isee_tag_only_keeps_bonuses_without_isee() {
    let catalog = catalog();
    let matched = filter_by_isee(&catalog, &["molto basso".to_string()]);
    assert_eq!(ids(&matched), vec!["assegno-unico", "bonus-psicologo"]);
}

#[test]
fn categories_match_any_selected() {
    let catalog = catalog();
    let matched = filter_by_categories(&catalog, &[Category::Birth, Category::Culture]);
    assert_eq!(
        ids(&matched),
        vec!["assegno-unico", "bonus-nido", "carta-cultura"]
    );
}

#[test]
fn disbursement_is_inferred_from_amount_and_wording() {
    let catalog = catalog();
    assert_eq!(
        ids(&filter_by_disbursement(&catalog, &[DisbursementType::Monthly])),
        vec!["assegno-unico"]
    );
    assert_eq!(
        filter_by_disbursement(&catalog, &[DisbursementType::LumpSum]).len(),
        catalog.len() - 1
    );
    assert!(filter_by_disbursement(&catalog, &[DisbursementType::Annual]).is_empty());
}

#[test]
fn child_age_filter_drops_bonuses_without_brackets() {
    let catalog = catalog();
    let matched = filter_by_child_age(&catalog, &[ChildAgeBracket::Prenatal]);
    assert_eq!(ids(&matched), vec!["assegno-unico"]);
}

#[test]
fn status_filter_selects_tags() {
    let catalog = catalog();
    assert_eq!(
        ids(&filter_by_status(&catalog, &[BonusStatus::Expired])),
        vec!["bonus-psicologo"]
    );
}

#[test]
fn stage_order_does_not_change_result() {
    let catalog = catalog();
    let criteria = FilterCriteria {
        search: "bonus".to_string(),
        isee: vec!["17000-25000".to_string()],
        categories: vec![Category::Birth, Category::Health],
        status: vec![BonusStatus::Active, BonusStatus::Expired],
        ..FilterCriteria::default()
    };

    let pipeline = apply_all_filters(&catalog, &criteria);

    let reversed = filter_by_status(&catalog, &criteria.status);
    let reversed = filter_by_categories(reversed, &criteria.categories);
    let reversed = filter_by_isee(reversed, &criteria.isee);
    let reversed = filter_by_search(reversed, &criteria.search);

    assert_eq!(ids(&pipeline), ids(&reversed));
    assert_eq!(ids(&pipeline), vec!["bonus-nido", "bonus-psicologo"]);
}

#[test]
fn adding_a_selection_never_grows_results() {
    let catalog = catalog();
    let mut criteria = FilterCriteria::default();
    criteria.toggle_category(Category::Family);
    let broad = apply_all_filters(&catalog, &criteria).len();

    criteria.toggle_status(BonusStatus::Expired);
    let narrow = apply_all_filters(&catalog, &criteria).len();
    assert!(narrow <= broad);

    criteria.clear();
    assert!(!criteria.has_active_filters());
    assert_eq!(apply_all_filters(&catalog, &criteria).len(), catalog.len());
}
