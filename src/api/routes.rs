//! HTTP API route definitions.

use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use super::{meals, users, AppState};
use crate::build_info::BuildInfo;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    #[serde(flatten)]
    pub build: BuildInfo,
}

/// Health check handler - always returns 200.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        build: BuildInfo::current(),
    })
}

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/users", user_routes())
        .nest("/api/meals", meal_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list_users).post(users::register))
        .route("/sessions", post(users::login))
        .route("/:id", get(users::get_user))
}

fn meal_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(meals::list_meals).post(meals::create_meal))
        .route("/metrics", get(meals::get_metrics))
        .route(
            "/:id",
            get(meals::get_meal)
                .put(meals::update_meal)
                .delete(meals::delete_meal),
        )
}
