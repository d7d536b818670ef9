//! Daily Diet Library
//!
//! Meal tracking with on-diet streak metrics, served over HTTP.

pub mod api;
pub mod build_info;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod validation;
