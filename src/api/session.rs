//! Cookie sessions
//!
//! Resolves the `sessionId` cookie to the signed-in user.

use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use super::AppState;
use crate::error::AppError;
use crate::models::User;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "sessionId";

/// The user owning the request's session
///
/// Rejects with 401 when the cookie is missing or unknown.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);

        let session_id = jar
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
            .ok_or(AppError::Unauthorized)?;

        let user = state
            .db
            .run(move |conn| User::get_by_session_id(conn, &session_id))
            .await?;

        match user {
            Some(user) => Ok(CurrentUser(user)),
            None => {
                tracing::debug!("Rejected unknown session");
                Err(AppError::Unauthorized)
            }
        }
    }
}

/// Build the `sessionId` cookie for a session
///
/// `Config` keeps `max_age_days` positive and bounded; the multiplication
/// saturates regardless.
pub fn session_cookie(session_id: String, max_age_days: i64) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, session_id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(max_age_days.saturating_mul(86_400)))
        .build()
}
