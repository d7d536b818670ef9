//! User handlers
//!
//! Registration, sign-in, and user lookup.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;

use super::session::session_cookie;
use super::AppState;
use crate::db::DbError;
use crate::error::{AppError, AppResult};
use crate::models::{User, UserCreate};
use crate::validation::{parse_id, LoginRequest, RegisterRequest};

/// Response for list_users
#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<User>,
}

/// Response wrapping a single user
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: User,
}

/// Map a write that hit the username or email constraint to a 409
fn already_registered(err: DbError) -> AppError {
    if err.is_unique_violation() {
        AppError::Conflict("Username or email is already registered.".to_string())
    } else {
        AppError::Database(err)
    }
}

/// List every registered user
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<UsersResponse>> {
    let users = state.db.run(|conn| User::list(conn)).await?;
    Ok(Json(UsersResponse { users }))
}

/// Get one user by ID
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let id = parse_id(&id)?;
    let user = state
        .db
        .run(move |conn| User::get_by_id(conn, &id))
        .await?
        .ok_or(AppError::NotFound("User"))?;

    Ok(Json(UserResponse { user }))
}

/// Register a user and start their session
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<(StatusCode, CookieJar, Json<UserResponse>)> {
    let Json(request) = payload?;
    request.validate()?;

    let cost = state.config.bcrypt_cost;
    let password = request.password;
    let password_hash =
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;

    let data = UserCreate {
        username: request.username,
        email: request.email,
        password_hash,
    };

    let user = state
        .db
        .run(move |conn| -> AppResult<User> {
            if User::exists_with_username_or_email(conn, &data.username, &data.email)? {
                return Err(AppError::Conflict(
                    "Username or email is already registered.".to_string(),
                ));
            }
            User::create(conn, &data).map_err(already_registered)
        })
        .await?;

    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    let jar = jar.add(session_cookie(
        user.session_id.clone(),
        state.config.session_max_age_days,
    ));

    Ok((StatusCode::CREATED, jar, Json(UserResponse { user })))
}

/// Check credentials and issue a fresh session
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<(CookieJar, Json<UserResponse>)> {
    let Json(request) = payload?;

    let username = request.username.clone();
    let user = state
        .db
        .run(move |conn| User::get_by_username(conn, &username))
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let password = request.password;
    let password_hash = user.password_hash.clone();
    let is_valid =
        tokio::task::spawn_blocking(move || bcrypt::verify(password, &password_hash)).await??;

    if !is_valid {
        tracing::warn!(username = %request.username, "Rejected sign-in");
        return Err(AppError::InvalidCredentials);
    }

    let user_id = user.id;
    let user = state
        .db
        .run(move |conn| User::rotate_session(conn, &user_id))
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    tracing::info!(user_id = %user.id, "User signed in");

    let jar = jar.add(session_cookie(
        user.session_id.clone(),
        state.config.session_max_age_days,
    ));

    Ok((jar, Json(UserResponse { user })))
}
