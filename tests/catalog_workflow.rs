use std::path::PathBuf;
use std::sync::Arc;

use bonus_catalog::catalog::views::{amount_summary, write_csv, BonusCardView};
use bonus_catalog::catalog::{
    apply_all_filters, BonusId, BonusRepository, BonusStatus, CatalogService, Child,
    ChildAgeBracket, DisbursementType, EligibilityConfig, EligibilityEngine, EligibilityProfile,
    FileBackend, FilterCriteria, InMemoryBonusRepository, KeyValueFavorites,
};

fn dataset_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/bonus.json")
}

fn repository() -> InMemoryBonusRepository {
    InMemoryBonusRepository::from_path(dataset_path()).expect("bundled dataset loads")
}

fn engine() -> EligibilityEngine {
    EligibilityEngine::new(EligibilityConfig::default().with_reference_year(2025))
}

fn eligible_ids(repository: &InMemoryBonusRepository, profile: &EligibilityProfile) -> Vec<String> {
    engine()
        .filter_eligible(repository.all(), profile)
        .iter()
        .map(|bonus| bonus.id.to_string())
        .collect()
}

fn matched_ids(repository: &InMemoryBonusRepository, criteria: &FilterCriteria) -> Vec<String> {
    apply_all_filters(repository.all(), criteria)
        .iter()
        .map(|bonus| bonus.id.to_string())
        .collect()
}

#[test]
fn bundled_dataset_loads_in_file_order() {
    let repository = repository();
    assert_eq!(repository.all().len(), 13);
    assert_eq!(repository.last_updated(), "2025-06-30");
    assert_eq!(repository.all()[0].id, BonusId::new("assegno-unico"));
    assert!(repository.get(&BonusId::new("bonus-natale")).is_some());
}

#[test]
fn default_profile_keeps_isee_gated_bonuses_pending_verification() {
    let repository = repository();
    let profile = EligibilityProfile::nationwide_italian();

    assert_eq!(
        eligible_ids(&repository, &profile),
        vec![
            "bonus-asilo-nido",
            "carta-acquisti",
            "carta-cultura-giovani",
            "bonus-famiglie-numerose",
            "bonus-psicologo",
            "bonus-sociale-bollette",
            "prestazione-universale",
            "dote-scuola-lombardia",
            "bonus-assunzioni-giovani",
            "bonus-natale",
        ]
    );
}

#[test]
fn young_family_qualifies_for_birth_support() {
    let repository = repository();
    let mut profile = EligibilityProfile::nationwide_italian();
    profile.isee = Some(10000.0);
    profile.children = vec![Child::new(ChildAgeBracket::UnderOne)];

    assert_eq!(
        eligible_ids(&repository, &profile),
        vec![
            "assegno-unico",
            "bonus-asilo-nido",
            "carta-cultura-giovani",
            "bonus-psicologo",
            "bonus-assunzioni-giovani",
            "bonus-natale",
        ]
    );
}

#[test]
fn elderly_applicant_with_disability_qualifies_for_assistance() {
    let repository = repository();
    let mut profile = EligibilityProfile::nationwide_italian();
    profile.isee = Some(5000.0);
    profile.isee_sociosanitario = Some(5500.0);
    profile.gross_income = Some(7000.0);
    profile.applicant_age = Some(82);
    profile.household_disability = true;

    let eligible = eligible_ids(&repository, &profile);
    assert!(eligible.contains(&"carta-acquisti".to_string()));
    assert!(eligible.contains(&"prestazione-universale".to_string()));
    assert!(!eligible.contains(&"carta-cultura-giovani".to_string()));
}

#[test]
fn sidebar_filters_over_bundled_dataset() {
    let repository = repository();

    let expiring = FilterCriteria {
        status: vec![BonusStatus::ExpiringSoon],
        ..FilterCriteria::default()
    };
    assert_eq!(
        matched_ids(&repository, &expiring),
        vec!["bonus-mobili", "dote-scuola-lombardia"]
    );

    let monthly = FilterCriteria {
        disbursement: vec![DisbursementType::Monthly],
        ..FilterCriteria::default()
    };
    assert_eq!(
        matched_ids(&repository, &monthly),
        vec!["assegno-unico", "contributo-figli-disabili"]
    );

    let search = FilterCriteria {
        search: "Carta".to_string(),
        ..FilterCriteria::default()
    };
    assert_eq!(
        matched_ids(&repository, &search),
        vec!["carta-acquisti", "carta-cultura-giovani"]
    );
}

#[test]
fn amount_summaries_cover_fixed_variable_and_unknown() {
    let repository = repository();
    let amount = |id: &str| {
        amount_summary(
            repository
                .get(&BonusId::new(id))
                .expect("bonus present in dataset"),
        )
    };

    assert_eq!(amount("assegno-unico"), "201,00 € - 57,00 €");
    assert_eq!(amount("carta-cultura-giovani"), "500,00 €");
    assert_eq!(amount("bonus-mobili"), "Variabile");
}

#[test]
fn csv_export_has_header_and_one_row_per_card() {
    let repository = repository();
    let cards = repository
        .all()
        .iter()
        .map(|bonus| BonusCardView::new(bonus, false))
        .collect::<Vec<_>>();

    let mut buffer = Vec::new();
    write_csv(&cards, &mut buffer).expect("csv written");
    let output = String::from_utf8(buffer).expect("utf8 csv");

    let mut lines = output.lines();
    assert_eq!(
        lines.next(),
        Some("id,nome,importo,status,categoria,erogazione,isee,scadenza")
    );
    assert_eq!(lines.count(), 13);
}

#[test]
fn favorites_survive_service_restart() {
    let favorites_dir = tempfile::tempdir().expect("temp dir");
    let build = || {
        CatalogService::new(
            Arc::new(repository()),
            Arc::new(KeyValueFavorites::new(FileBackend::new(favorites_dir.path()))),
            engine(),
        )
    };

    let service = build();
    assert!(service
        .toggle_favorite(&BonusId::new("bonus-asilo-nido"))
        .expect("known bonus"));

    let restarted = build();
    let page = restarted.favorites(&FilterCriteria::default());
    assert_eq!(page.summary.shown, 1);
    assert_eq!(page.bonus[0].id, BonusId::new("bonus-asilo-nido"));
    assert!(page.bonus[0].favorite);
}
