use crate::dto::{RentalPayload, StatusPayload};
use crate::error::{ApiError, INVALID_STATUS, RENTAL_NOT_FOUND, SEARCH_USER_NOT_FOUND};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, put},
    Router,
};
use domain::{Rental, RentalFilter, RentalStatus};
use serde::Deserialize;
use tracing::info;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/rentals", get(search_rentals).post(create_rental))
        .route(
            "/rentals/:id",
            get(get_rental).put(update_rental).delete(delete_rental),
        )
        .route("/rentals/:id/status", put(update_rental_status))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub filme: Option<String>,
    pub mes: Option<i32>,
    pub ano: Option<i32>,
    pub usuario: Option<i32>,
}

/// Unreadable rental bodies are a 400 like any other invalid record.
fn rental_body(
    payload: Result<Json<RentalPayload>, JsonRejection>,
) -> Result<RentalPayload, ApiError> {
    payload
        .map(|Json(payload)| payload)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

/// Load a rental for a mutating request. A missing record is a 400 here,
/// unlike the plain lookup.
async fn load_for_change(state: &AppState, id: i32) -> Result<Rental, ApiError> {
    state
        .app
        .rental_service
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::bad_request(RENTAL_NOT_FOUND))
}

async fn search_rentals(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<RentalPayload>>, ApiError> {
    let user_id = params
        .usuario
        .ok_or_else(|| ApiError::bad_request(SEARCH_USER_NOT_FOUND))?;
    if state.app.user_service.find_by_id(user_id).await?.is_none() {
        return Err(ApiError::bad_request(SEARCH_USER_NOT_FOUND));
    }

    let mut filter = RentalFilter::new().user_id(user_id);
    filter.movie = params.filme;
    filter.month = params.mes;
    filter.year = params.ano;

    let rentals = state.app.rental_service.search(&filter).await?;
    Ok(Json(rentals.iter().map(RentalPayload::from).collect()))
}

async fn get_rental(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<RentalPayload>, ApiError> {
    let rental = state
        .app
        .rental_service
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(RentalPayload::from(&rental)))
}

async fn create_rental(
    State(state): State<AppState>,
    payload: Result<Json<RentalPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let rental = rental_body(payload)?.into_rental(&state.app.user_service).await?;
    let saved = state.app.rental_service.save(rental).await?;

    info!("Created rental {:?}", saved.id);
    Ok((StatusCode::CREATED, Json(RentalPayload::from(&saved))))
}

async fn update_rental(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    payload: Result<Json<RentalPayload>, JsonRejection>,
) -> Result<Json<RentalPayload>, ApiError> {
    let payload = rental_body(payload)?;
    let existing = load_for_change(&state, id).await?;

    let mut rental = payload.into_rental(&state.app.user_service).await?;
    rental.id = existing.id;
    if rental.status.is_none() {
        rental.status = existing.status;
    }
    if rental.registered_on.is_none() {
        rental.registered_on = existing.registered_on;
    }

    let updated = state.app.rental_service.update(&rental).await?;
    Ok(Json(RentalPayload::from(&updated)))
}

async fn update_rental_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    payload: Result<Json<StatusPayload>, JsonRejection>,
) -> Result<Json<RentalPayload>, ApiError> {
    let mut rental = load_for_change(&state, id).await?;

    // A body without a readable status string is an invalid status too.
    let status = payload
        .ok()
        .and_then(|Json(payload)| payload.status.parse::<RentalStatus>().ok())
        .ok_or_else(|| ApiError::bad_request(INVALID_STATUS))?;

    let updated = state
        .app
        .rental_service
        .update_status(&mut rental, status)
        .await?;

    info!("Rental {} is now {}", id, status);
    Ok(Json(RentalPayload::from(&updated)))
}

async fn delete_rental(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let rental = load_for_change(&state, id).await?;
    state.app.rental_service.delete(&rental).await?;
    Ok(StatusCode::NO_CONTENT)
}
