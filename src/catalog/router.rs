use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use crate::error::AppError;

use super::domain::BonusId;
use super::eligibility::EligibilityProfile;
use super::favorites::FavoritesStore;
use super::filters::FilterCriteria;
use super::repository::BonusRepository;
use super::service::{CatalogService, CatalogServiceError};

/// Router builder exposing the catalog, eligibility and favorites endpoints.
pub fn catalog_router<R, F>(service: Arc<CatalogService<R, F>>) -> Router
where
    R: BonusRepository + 'static,
    F: FavoritesStore + 'static,
{
    Router::new()
        .route("/api/v1/bonus", get(list_handler::<R, F>))
        .route("/api/v1/bonus/search", post(search_handler::<R, F>))
        .route("/api/v1/bonus/:bonus_id", get(detail_handler::<R, F>))
        .route("/api/v1/eligibility", post(eligibility_handler::<R, F>))
        .route("/api/v1/favorites", get(favorites_handler::<R, F>))
        .route(
            "/api/v1/favorites/:bonus_id/toggle",
            post(toggle_favorite_handler::<R, F>),
        )
        .with_state(service)
}

fn error_response(error: CatalogServiceError) -> Response {
    AppError::from(error).into_response()
}

pub(crate) async fn list_handler<R, F>(
    State(service): State<Arc<CatalogService<R, F>>>,
) -> Response
where
    R: BonusRepository + 'static,
    F: FavoritesStore + 'static,
{
    let page = service.search(&FilterCriteria::default());
    (StatusCode::OK, Json(page)).into_response()
}

pub(crate) async fn search_handler<R, F>(
    State(service): State<Arc<CatalogService<R, F>>>,
    Json(criteria): Json<FilterCriteria>,
) -> Response
where
    R: BonusRepository + 'static,
    F: FavoritesStore + 'static,
{
    let page = service.search(&criteria);
    (StatusCode::OK, Json(page)).into_response()
}

pub(crate) async fn detail_handler<R, F>(
    State(service): State<Arc<CatalogService<R, F>>>,
    Path(bonus_id): Path<String>,
) -> Response
where
    R: BonusRepository + 'static,
    F: FavoritesStore + 'static,
{
    match service.get(&BonusId(bonus_id)) {
        Ok(detail) => (StatusCode::OK, Json(detail)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn eligibility_handler<R, F>(
    State(service): State<Arc<CatalogService<R, F>>>,
    Json(profile): Json<EligibilityProfile>,
) -> Response
where
    R: BonusRepository + 'static,
    F: FavoritesStore + 'static,
{
    match service.eligible(&profile) {
        Ok(eligible) => {
            let payload = json!({
                "eligible": eligible.len(),
                "total": service.repository().all().len(),
                "bonus": eligible,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn favorites_handler<R, F>(
    State(service): State<Arc<CatalogService<R, F>>>,
) -> Response
where
    R: BonusRepository + 'static,
    F: FavoritesStore + 'static,
{
    let page = service.favorites(&FilterCriteria::default());
    (StatusCode::OK, Json(page)).into_response()
}

pub(crate) async fn toggle_favorite_handler<R, F>(
    State(service): State<Arc<CatalogService<R, F>>>,
    Path(bonus_id): Path<String>,
) -> Response
where
    R: BonusRepository + 'static,
    F: FavoritesStore + 'static,
{
    let id = BonusId(bonus_id);
    match service.toggle_favorite(&id) {
        Ok(favorite) => {
            let payload = json!({ "bonus_id": id, "favorite": favorite });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}
