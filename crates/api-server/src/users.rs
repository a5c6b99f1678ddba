use crate::dto::{BalanceResponse, NewUserPayload, UserResponse};
use crate::error::ApiError;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use domain::User;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/:id", get(get_user))
        .route("/users/:id/balance", get(get_balance))
}

async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<NewUserPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.app.user_service.create_user(User::from(payload)).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .app
        .user_service
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(UserResponse::from(user)))
}

async fn get_balance(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let balance = state.app.balance_for_user(id).await?;
    Ok(Json(BalanceResponse {
        usuario: balance.user.id.unwrap_or(id),
        saldo: balance.balance,
    }))
}
