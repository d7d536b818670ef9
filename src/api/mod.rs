//! HTTP API
//!
//! Axum router, shared state, and the user/meal handlers.

pub mod meals;
pub mod routes;
pub mod session;
pub mod users;

use std::sync::Arc;

use crate::config::Config;
use crate::db::Database;

pub use routes::create_router;
pub use session::{CurrentUser, SESSION_COOKIE};

/// Application state shared with handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: Database, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}
