//! Meal handlers
//!
//! CRUD over the signed-in user's meals, plus diet metrics.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use super::{AppState, CurrentUser};
use crate::db::DbError;
use crate::error::{AppError, AppResult};
use crate::models::{DietMetrics, Meal, MealCreate, MealUpdate};
use crate::validation::{parse_id, MealRequest};

/// Response for list_meals
#[derive(Debug, Serialize)]
pub struct MealsResponse {
    pub meals: Vec<Meal>,
}

/// Response wrapping a single meal
#[derive(Debug, Serialize)]
pub struct MealResponse {
    pub meal: Meal,
}

/// Response for delete_meal
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Map a write that hit the per-user description constraint to a 400
///
/// The pre-check and the write are separate statements, so a concurrent
/// request can still claim the description in between.
fn duplicate_description(err: DbError) -> AppError {
    if err.is_unique_violation() {
        AppError::DuplicateDescription
    } else {
        AppError::Database(err)
    }
}

// ============================================================================
// Queries
// ============================================================================

/// List the user's meals, most recent first
pub async fn list_meals(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<MealsResponse>> {
    let meals = state
        .db
        .run(move |conn| Meal::list_for_user(conn, &user.id))
        .await?;

    Ok(Json(MealsResponse { meals }))
}

/// Get one of the user's meals
pub async fn get_meal(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<MealResponse>> {
    let id = parse_id(&id)?;
    let meal = state
        .db
        .run(move |conn| Meal::get_for_user(conn, &user.id, &id))
        .await?
        .ok_or(AppError::NotFound("Meal"))?;

    Ok(Json(MealResponse { meal }))
}

/// Totals and best on-diet streak for the user
pub async fn get_metrics(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<DietMetrics>> {
    let metrics = state
        .db
        .run(move |conn| Meal::metrics_for_user(conn, &user.id))
        .await?;

    Ok(Json(metrics))
}

// ============================================================================
// Mutations
// ============================================================================

/// Record a new meal
pub async fn create_meal(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<MealRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<MealResponse>)> {
    let Json(request) = payload?;
    let valid = request.validate()?;

    let data = MealCreate {
        user_id: user.id,
        name: valid.name,
        description: valid.description,
        date: valid.date,
        is_on_diet: valid.is_on_diet,
    };

    let meal = state
        .db
        .run(move |conn| -> AppResult<Meal> {
            if Meal::description_taken(conn, &data.user_id, &data.description, None)? {
                return Err(AppError::DuplicateDescription);
            }
            Meal::create(conn, &data).map_err(duplicate_description)
        })
        .await?;

    tracing::info!(
        user_id = %meal.user_id,
        meal_id = %meal.id,
        on_diet = meal.is_on_diet,
        "Meal created"
    );

    Ok((StatusCode::CREATED, Json(MealResponse { meal })))
}

/// Replace every field of one of the user's meals
pub async fn update_meal(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    payload: Result<Json<MealRequest>, JsonRejection>,
) -> AppResult<Json<MealResponse>> {
    let id = parse_id(&id)?;
    let Json(request) = payload?;

    let meal = state
        .db
        .run(move |conn| -> AppResult<Meal> {
            if Meal::get_for_user(conn, &user.id, &id)?.is_none() {
                return Err(AppError::NotFound("Meal"));
            }

            let valid = request.validate()?;
            if Meal::description_taken(conn, &user.id, &valid.description, Some(&id))? {
                return Err(AppError::DuplicateDescription);
            }

            let data = MealUpdate {
                name: valid.name,
                description: valid.description,
                date: valid.date,
                is_on_diet: valid.is_on_diet,
            };
            Meal::update(conn, &id, &data)
                .map_err(duplicate_description)?
                .ok_or(AppError::NotFound("Meal"))
        })
        .await?;

    tracing::info!(user_id = %meal.user_id, meal_id = %meal.id, "Meal updated");

    Ok(Json(MealResponse { meal }))
}

/// Delete one of the user's meals
pub async fn delete_meal(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = parse_id(&id)?;

    let user_id = user.id;
    let meal_id = id.clone();
    state
        .db
        .run(move |conn| -> AppResult<()> {
            if Meal::get_for_user(conn, &user_id, &meal_id)?.is_none() {
                return Err(AppError::NotFound("Meal"));
            }
            Meal::delete(conn, &meal_id)?;
            Ok(())
        })
        .await?;

    tracing::info!(meal_id = %id, "Meal deleted");

    Ok(Json(MessageResponse { message: "Meal deleted." }))
}
