use application::RentalApp;
use axum::{response::IntoResponse, response::Json, routing::get, Router};
use config::Config;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod dto;
pub mod error;
mod rentals;
mod users;

pub use error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub app: Arc<RentalApp>,
}

/// All HTTP routes over an already constructed application.
pub fn router(app: Arc<RentalApp>) -> Router {
    Router::new()
        .merge(rentals::router())
        .merge(users::router())
        // Health check
        .route("/health", get(health_check))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { app })
}

/// Open the database, bind the listener and serve until Ctrl+C.
pub async fn serve(config: &Config) -> anyhow::Result<()> {
    info!("💾 Using database: {}", config.database_url);
    let app = Arc::new(RentalApp::new(&config.database_url, config.db_pool_size)?);

    let bind_address = config.api_address();
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("🌐 API Server listening on http://{}", bind_address);
    info!("   GET    /rentals?usuario=&filme=&mes=&ano=");
    info!("   POST   /rentals");
    info!("   GET    /rentals/:id");
    info!("   PUT    /rentals/:id");
    info!("   PUT    /rentals/:id/status");
    info!("   DELETE /rentals/:id");
    info!("   POST   /users");
    info!("   GET    /users/:id");
    info!("   GET    /users/:id/balance");
    info!("   GET    /health");

    axum::serve(listener, router(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::{BalanceResponse, RentalPayload, UserResponse};
    use crate::error::{INVALID_STATUS, RENTAL_NOT_FOUND, SEARCH_USER_NOT_FOUND, USER_NOT_FOUND};
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
    };
    use rust_decimal::Decimal;
    use serde_json::{json, Value};
    use tower::util::ServiceExt; // for `oneshot`

    fn setup_test_app() -> Router {
        let app = RentalApp::in_memory().expect("Failed to create test database");
        router(Arc::new(app))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    fn text(body: &[u8]) -> String {
        String::from_utf8(body.to_vec()).unwrap()
    }

    async fn create_user(app: &Router) -> i32 {
        let (status, body) = send(
            app,
            Method::POST,
            "/users",
            Some(json!({
                "nome": "Maria",
                "email": "maria@example.com",
                "senha": "secret",
                "sexo": "FEMALE",
                "dataNascimento": "1990-04-12"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let user: UserResponse = serde_json::from_slice(&body).unwrap();
        user.id.unwrap()
    }

    fn rental_body(user_id: i32, movie: &str, year: i32) -> Value {
        json!({
            "filme": movie,
            "mes": 1,
            "ano": year,
            "valor": 10,
            "usuario": user_id,
            "tipo": "RENTAL"
        })
    }

    async fn create_rental(app: &Router, body: Value) -> RentalPayload {
        let (status, body) = send(app, Method::POST, "/rentals", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "{}", text(&body));
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn health_check_reports_healthy() {
        let app = setup_test_app();

        let (status, body) = send(&app, Method::GET, "/health", None).await;

        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "healthy");
    }

    #[tokio::test]
    async fn post_valid_rental_is_created_pending() {
        let app = setup_test_app();
        let user_id = create_user(&app).await;

        let mut body = rental_body(user_id, "Matrix", 2020);
        body["status"] = json!("EFFECTIVE");
        let created = create_rental(&app, body).await;

        assert!(created.id.is_some());
        assert_eq!(created.status.as_deref(), Some("PENDING"));
        assert_eq!(created.usuario, Some(user_id));
        assert!(created.data_cadastro.is_some());
    }

    #[tokio::test]
    async fn post_rental_without_amount_is_rejected() {
        let app = setup_test_app();
        let user_id = create_user(&app).await;

        let mut body = rental_body(user_id, "Matrix", 2020);
        body.as_object_mut().unwrap().remove("valor");
        let (status, body) = send(&app, Method::POST, "/rentals", Some(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(text(&body), "Informe um Valor válido.");
    }

    #[tokio::test]
    async fn post_rental_for_unknown_user_is_rejected() {
        let app = setup_test_app();

        let (status, body) = send(
            &app,
            Method::POST,
            "/rentals",
            Some(rental_body(999, "Matrix", 2020)),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(text(&body), USER_NOT_FOUND);
    }

    #[tokio::test]
    async fn post_rental_with_unknown_kind_reports_missing_kind() {
        let app = setup_test_app();
        let user_id = create_user(&app).await;

        let mut body = rental_body(user_id, "Matrix", 2020);
        body["tipo"] = json!("LEASE");
        let (status, body) = send(&app, Method::POST, "/rentals", Some(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(text(&body), "Informe um tipo de Locação.");
    }

    #[tokio::test]
    async fn get_rental_returns_record_or_404() {
        let app = setup_test_app();
        let user_id = create_user(&app).await;
        let created = create_rental(&app, rental_body(user_id, "Matrix", 2020)).await;

        let uri = format!("/rentals/{}", created.id.unwrap());
        let (status, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        let found: RentalPayload = serde_json::from_slice(&body).unwrap();
        assert_eq!(found, created);

        let (status, body) = send(&app, Method::GET, "/rentals/4242", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn search_filters_by_title_and_year() {
        let app = setup_test_app();
        let user_id = create_user(&app).await;
        create_rental(&app, rental_body(user_id, "Matrix Reloaded", 2020)).await;
        create_rental(&app, rental_body(user_id, "The Matrix", 2019)).await;
        create_rental(&app, rental_body(user_id, "Alien", 2020)).await;

        let uri = format!("/rentals?usuario={}&filme=matrix&ano=2020", user_id);
        let (status, body) = send(&app, Method::GET, &uri, None).await;

        assert_eq!(status, StatusCode::OK);
        let found: Vec<RentalPayload> = serde_json::from_slice(&body).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].filme.as_deref(), Some("Matrix Reloaded"));
    }

    #[tokio::test]
    async fn search_requires_existing_user() {
        let app = setup_test_app();

        let (status, body) = send(&app, Method::GET, "/rentals?usuario=77", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(text(&body), SEARCH_USER_NOT_FOUND);

        let (status, body) = send(&app, Method::GET, "/rentals?filme=matrix", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(text(&body), SEARCH_USER_NOT_FOUND);
    }

    #[tokio::test]
    async fn put_rental_updates_fields() {
        let app = setup_test_app();
        let user_id = create_user(&app).await;
        let created = create_rental(&app, rental_body(user_id, "Matrix", 2020)).await;
        let uri = format!("/rentals/{}", created.id.unwrap());

        let (status, body) = send(
            &app,
            Method::PUT,
            &uri,
            Some(rental_body(user_id, "Teste Atualizar", 2018)),
        )
        .await;

        assert_eq!(status, StatusCode::OK, "{}", text(&body));
        let updated: RentalPayload = serde_json::from_slice(&body).unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.filme.as_deref(), Some("Teste Atualizar"));
        assert_eq!(updated.ano, Some(2018));
        assert_eq!(updated.status.as_deref(), Some("PENDING"));
        assert_eq!(updated.data_cadastro, created.data_cadastro);
    }

    #[tokio::test]
    async fn put_rental_validates_and_reports_unknown_id() {
        let app = setup_test_app();
        let user_id = create_user(&app).await;
        let created = create_rental(&app, rental_body(user_id, "Matrix", 2020)).await;

        let uri = format!("/rentals/{}", created.id.unwrap());
        let (status, body) = send(&app, Method::PUT, &uri, Some(rental_body(user_id, "Matrix", 20))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(text(&body), "Informe um Ano válido.");

        let (status, body) = send(
            &app,
            Method::PUT,
            "/rentals/4242",
            Some(rental_body(user_id, "Matrix", 2020)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(text(&body), RENTAL_NOT_FOUND);
    }

    #[tokio::test]
    async fn status_update_changes_status_and_balance() {
        let app = setup_test_app();
        let user_id = create_user(&app).await;

        let mut returned = rental_body(user_id, "Matrix", 2020);
        returned["tipo"] = json!("RETURN");
        returned["valor"] = json!("100.00");
        let returned = create_rental(&app, returned).await;
        let rented = create_rental(&app, rental_body(user_id, "Alien", 2020)).await;

        for rental in [&returned, &rented] {
            let uri = format!("/rentals/{}/status", rental.id.unwrap());
            let (status, body) = send(&app, Method::PUT, &uri, Some(json!({"status": "EFFECTIVE"}))).await;
            assert_eq!(status, StatusCode::OK);
            let updated: RentalPayload = serde_json::from_slice(&body).unwrap();
            assert_eq!(updated.status.as_deref(), Some("EFFECTIVE"));
        }

        let uri = format!("/users/{}/balance", user_id);
        let (status, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        let balance: BalanceResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(balance.saldo, Decimal::new(90, 0));
    }

    #[tokio::test]
    async fn status_update_rejects_unknown_status_and_id() {
        let app = setup_test_app();
        let user_id = create_user(&app).await;
        let created = create_rental(&app, rental_body(user_id, "Matrix", 2020)).await;

        let uri = format!("/rentals/{}/status", created.id.unwrap());
        let (status, body) = send(&app, Method::PUT, &uri, Some(json!({"status": "DONE"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(text(&body), INVALID_STATUS);

        let (status, body) = send(
            &app,
            Method::PUT,
            "/rentals/4242/status",
            Some(json!({"status": "CANCELED"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(text(&body), RENTAL_NOT_FOUND);
    }

    #[tokio::test]
    async fn status_update_without_readable_status_is_invalid() {
        let app = setup_test_app();
        let user_id = create_user(&app).await;
        let created = create_rental(&app, rental_body(user_id, "Matrix", 2020)).await;
        let uri = format!("/rentals/{}/status", created.id.unwrap());

        for body in [json!({}), json!({"status": 3})] {
            let (status, body) = send(&app, Method::PUT, &uri, Some(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(text(&body), INVALID_STATUS);
        }
    }

    #[tokio::test]
    async fn unreadable_rental_body_is_a_bad_request() {
        let app = setup_test_app();
        let user_id = create_user(&app).await;

        let mut body = rental_body(user_id, "Matrix", 2020);
        body["mes"] = json!("janeiro");
        let (status, _) = send(&app, Method::POST, "/rentals", Some(body.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let created = create_rental(&app, rental_body(user_id, "Matrix", 2020)).await;
        let uri = format!("/rentals/{}", created.id.unwrap());
        let (status, _) = send(&app, Method::PUT, &uri, Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn balance_overflow_answers_without_panicking() {
        let app = setup_test_app();
        let user_id = create_user(&app).await;

        for _ in 0..2 {
            let mut body = rental_body(user_id, "Matrix", 2020);
            body["tipo"] = json!("RETURN");
            body["valor"] = json!(Decimal::MAX.to_string());
            let created = create_rental(&app, body).await;

            let uri = format!("/rentals/{}/status", created.id.unwrap());
            let (status, _) =
                send(&app, Method::PUT, &uri, Some(json!({"status": "EFFECTIVE"}))).await;
            assert_eq!(status, StatusCode::OK);
        }

        let uri = format!("/users/{}/balance", user_id);
        let (status, _) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn delete_rental_then_not_found() {
        let app = setup_test_app();
        let user_id = create_user(&app).await;
        let created = create_rental(&app, rental_body(user_id, "Matrix", 2020)).await;
        let uri = format!("/rentals/{}", created.id.unwrap());

        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(text(&body), RENTAL_NOT_FOUND);
    }

    #[tokio::test]
    async fn duplicate_user_email_is_rejected() {
        let app = setup_test_app();
        create_user(&app).await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/users",
            Some(json!({"nome": "Outra", "email": "maria@example.com", "senha": "x"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(text(&body), domain::services::user_service::EMAIL_TAKEN);
    }

    #[tokio::test]
    async fn user_lookup_hides_password() {
        let app = setup_test_app();
        let user_id = create_user(&app).await;

        let (status, body) = send(&app, Method::GET, &format!("/users/{}", user_id), None).await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["email"], "maria@example.com");
        assert!(json.get("senha").is_none());

        let (status, _) = send(&app, Method::GET, "/users/999/balance", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
