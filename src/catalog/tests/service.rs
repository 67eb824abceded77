use super::common::*;
use crate::catalog::domain::{BonusId, Category, ChildAgeBracket};
use crate::catalog::eligibility::{Child, EligibilityProfile};
use crate::catalog::filters::FilterCriteria;
use crate::catalog::CatalogServiceError;

#[test]
fn search_reports_headline_counts() {
    let service = build_service();

    let page = service.search(&FilterCriteria::default());
    assert_eq!(page.summary.shown, 5);
    assert_eq!(page.headline, "Tutti i 5 bonus disponibili");

    let criteria = FilterCriteria {
        categories: vec![Category::Birth],
        ..FilterCriteria::default()
    };
    let page = service.search(&criteria);
    assert_eq!(page.headline, "2 di 5 bonus");
    assert_eq!(page.bonus[0].id, BonusId::new("assegno-unico"));
}

#[test]
fn get_propagates_not_found() {
    let service = build_service();
    match service.get(&BonusId::new("bonus-fantasma")) {
        Err(CatalogServiceError::NotFound(id)) => assert_eq!(id.as_str(), "bonus-fantasma"),
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn detail_reflects_favorite_state() {
    let service = build_service();
    let id = BonusId::new("bonus-nido");

    assert!(!service.get(&id).expect("detail").card.favorite);
    assert!(service.toggle_favorite(&id).expect("toggle"));
    assert!(service.get(&id).expect("detail").card.favorite);
}

#[test]
fn toggle_rejects_unknown_bonus() {
    let service = build_service();
    assert!(matches!(
        service.toggle_favorite(&BonusId::new("bonus-fantasma")),
        Err(CatalogServiceError::NotFound(_))
    ));
    assert_eq!(service.favorites(&FilterCriteria::default()).summary.total, 0);
}

#[test]
fn favorites_page_applies_filters() {
    let service = build_service();
    service
        .toggle_favorite(&BonusId::new("bonus-nido"))
        .expect("toggle");
    service
        .toggle_favorite(&BonusId::new("carta-cultura"))
        .expect("toggle");

    let criteria = FilterCriteria {
        search: "cultura".to_string(),
        ..FilterCriteria::default()
    };
    let page = service.favorites(&criteria);
    assert_eq!(page.summary.total, 2);
    assert_eq!(page.summary.shown, 1);
    assert!(page.bonus.iter().all(|card| card.favorite));
}

#[test]
fn eligible_requires_complete_profile() {
    let service = build_service();
    assert!(matches!(
        service.eligible(&EligibilityProfile::default()),
        Err(CatalogServiceError::IncompleteProfile)
    ));
}

#[test]
fn eligible_pairs_cards_with_outcomes() {
    let service = build_service();
    let mut profile = EligibilityProfile::nationwide_italian();
    profile.isee = Some(12000.0);
    profile.children = vec![Child::new(ChildAgeBracket::UnderOne)];

    let eligible = service.eligible(&profile).expect("complete profile");
    let ids = eligible
        .iter()
        .map(|entry| entry.card.id.to_string())
        .collect::<Vec<_>>();
    assert_eq!(
        ids,
        vec!["assegno-unico", "bonus-nido", "carta-cultura", "bonus-psicologo"]
    );
    assert!(eligible
        .iter()
        .all(|entry| entry.outcome.decision.is_eligible()));

    let all = service.evaluate_all(&profile);
    assert_eq!(all.len(), 5);
    assert_eq!(all[3].failed_gate.as_deref(), Some("isee"));
}
