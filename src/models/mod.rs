//! Data models
//!
//! Rust structs representing database entities.

mod diet_metrics;
mod meal;
mod user;

pub use diet_metrics::{DietMetrics, OnDiet};
pub use meal::{Meal, MealCreate, MealUpdate};
pub use user::{User, UserCreate};
