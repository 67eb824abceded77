use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::catalog::domain::{
    AmountSpec, ApplicationMethod, Bonus, BonusDataset, BonusId, BonusStatus, BracketAmount,
    Category, ChildAgeBracket, IncomeBracket, IseeRequirement, Requirement, Requirements,
};
use crate::catalog::favorites::{KeyValueFavorites, MemoryBackend};
use crate::catalog::repository::InMemoryBonusRepository;
use crate::catalog::{catalog_router, CatalogService, EligibilityConfig, EligibilityEngine};

pub(super) type TestService = CatalogService<InMemoryBonusRepository, KeyValueFavorites<MemoryBackend>>;

pub(super) fn bonus(id: &str, name: &str, categories: &[Category]) -> Bonus {
    Bonus {
        id: BonusId::new(id),
        name: name.to_string(),
        categories: categories.to_vec(),
        status: BonusStatus::Active,
        description: format!("{name} per le famiglie"),
        amount: AmountSpec::Fixed {
            value: Some(500.0),
            note: None,
        },
        isee: IseeRequirement::default(),
        requirements: Requirements::default(),
        deadline: None,
        official_link: "https://www.inps.it".to_string(),
        application: ApplicationMethod {
            method: "Online".to_string(),
            ..ApplicationMethod::default()
        },
        compatible_with: Vec::new(),
        additional_notes: None,
    }
}

pub(super) fn with_isee(mut bonus: Bonus, min: Option<f64>, max: Option<f64>) -> Bonus {
    bonus.isee = IseeRequirement {
        required: true,
        min,
        max,
        note: None,
    };
    bonus
}

pub(super) fn with_child_ages(mut bonus: Bonus, brackets: &[ChildAgeBracket]) -> Bonus {
    bonus.requirements.child_ages = brackets.to_vec();
    bonus
}

pub(super) fn with_requirement(mut bonus: Bonus, kind: &str, description: &str) -> Bonus {
    bonus.requirements.other.push(Requirement {
        kind: kind.to_string(),
        description: description.to_string(),
    });
    bonus
}

pub(super) fn variable_amount(mut bonus: Bonus, description: &str) -> Bonus {
    bonus.description = description.to_string();
    bonus.amount = AmountSpec::Variable {
        brackets: vec![
            IncomeBracket {
                min: None,
                max: Some(17000.0),
                amount: BracketAmount::Value(201.0),
            },
            IncomeBracket {
                min: Some(17000.0),
                max: None,
                amount: BracketAmount::Value(57.0),
            },
        ],
        note: None,
    };
    bonus
}

/// Small catalog covering every filter dimension.
pub(super) fn catalog() -> Vec<Bonus> {
    let mut expired = bonus("bonus-psicologo", "Bonus Psicologo", &[Category::Health]);
    expired.status = BonusStatus::Expired;

    vec![
        with_child_ages(
            variable_amount(
                bonus("assegno-unico", "Assegno Unico", &[Category::Family, Category::Birth]),
                "Sostegno mensile per i figli a carico",
            ),
            &[
                ChildAgeBracket::Prenatal,
                ChildAgeBracket::UnderOne,
                ChildAgeBracket::OneToThree,
                ChildAgeBracket::ThreeToEighteen,
            ],
        ),
        with_child_ages(
            with_isee(
                bonus("bonus-nido", "Bonus Asilo Nido", &[Category::Birth, Category::Education]),
                None,
                Some(40000.0),
            ),
            &[ChildAgeBracket::UnderOne, ChildAgeBracket::OneToThree],
        ),
        with_isee(
            bonus("carta-cultura", "Carta Cultura Giovani", &[Category::Culture]),
            None,
            Some(35000.0),
        ),
        with_isee(
            bonus("bonus-sociale", "Bonus Sociale Bollette", &[Category::Utilities]),
            None,
            Some(9530.0),
        ),
        expired,
    ]
}

pub(super) fn repository() -> InMemoryBonusRepository {
    InMemoryBonusRepository::from_dataset(BonusDataset {
        bonus: catalog(),
        last_updated: "2025-06-30".to_string(),
    })
    .expect("catalog has unique ids")
}

pub(super) fn engine() -> EligibilityEngine {
    EligibilityEngine::new(EligibilityConfig::default().with_reference_year(2025))
}

pub(super) fn build_service() -> Arc<TestService> {
    Arc::new(CatalogService::new(
        Arc::new(repository()),
        Arc::new(KeyValueFavorites::new(MemoryBackend::default())),
        engine(),
    ))
}

pub(super) fn router_with_service(service: Arc<TestService>) -> axum::Router {
    catalog_router(service)
}

pub(super) fn ids(bonuses: &[&Bonus]) -> Vec<String> {
    bonuses.iter().map(|bonus| bonus.id.to_string()).collect()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
