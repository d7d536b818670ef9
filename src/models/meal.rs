//! Meal model
//!
//! A meal a user ate, flagged as on or off the diet.

use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::DietMetrics;
use crate::db::DbResult;

/// A recorded meal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub is_on_diet: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a meal
#[derive(Debug, Clone)]
pub struct MealCreate {
    pub user_id: String,
    pub name: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub is_on_diet: bool,
}

/// Data for updating a meal (every field is replaced)
#[derive(Debug, Clone)]
pub struct MealUpdate {
    pub name: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub is_on_diet: bool,
}

impl Meal {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let millis: i64 = row.get("date")?;
        let date = Utc.timestamp_millis_opt(millis).single().ok_or_else(|| {
            match row.as_ref().column_index("date") {
                Ok(idx) => rusqlite::Error::IntegralValueOutOfRange(idx, millis),
                Err(e) => e,
            }
        })?;

        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            name: row.get("name")?,
            description: row.get("description")?,
            date,
            is_on_diet: row.get("is_on_diet")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Create a new meal
    pub fn create(conn: &Connection, data: &MealCreate) -> DbResult<Self> {
        let id = Uuid::new_v4().to_string();

        conn.execute(
            r#"
            INSERT INTO meals (id, seq, user_id, name, description, date, is_on_diet)
            VALUES (?1, (SELECT COALESCE(MAX(seq), 0) + 1 FROM meals), ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                id,
                data.user_id,
                data.name,
                data.description,
                data.date.timestamp_millis(),
                data.is_on_diet,
            ],
        )?;

        Self::get_by_id(conn, &id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a meal by ID
    pub fn get_by_id(conn: &Connection, id: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM meals WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(meal) => Ok(Some(meal)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get a meal by ID, only if it belongs to the user
    pub fn get_for_user(conn: &Connection, user_id: &str, id: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM meals WHERE id = ?1 AND user_id = ?2")?;

        let result = stmt.query_row([id, user_id], Self::from_row);
        match result {
            Ok(meal) => Ok(Some(meal)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List a user's meals, most recent first
    pub fn list_for_user(conn: &Connection, user_id: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM meals WHERE user_id = ?1 ORDER BY date DESC, seq DESC",
        )?;

        let meals = stmt
            .query_map([user_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(meals)
    }

    /// List a user's meals oldest first; equal dates keep insertion order
    pub fn list_for_user_chronological(conn: &Connection, user_id: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM meals WHERE user_id = ?1 ORDER BY date ASC, seq ASC",
        )?;

        let meals = stmt
            .query_map([user_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(meals)
    }

    /// Whether another of the user's meals already uses this description
    pub fn description_taken(
        conn: &Connection,
        user_id: &str,
        description: &str,
        exclude_id: Option<&str>,
    ) -> DbResult<bool> {
        let taken: bool = conn.query_row(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM meals
                WHERE user_id = ?1 AND description = ?2 AND (?3 IS NULL OR id != ?3)
            )
            "#,
            params![user_id, description, exclude_id],
            |row| row.get(0),
        )?;
        Ok(taken)
    }

    /// Update a meal
    pub fn update(conn: &Connection, id: &str, data: &MealUpdate) -> DbResult<Option<Self>> {
        let rows = conn.execute(
            r#"
            UPDATE meals SET
                name = ?1,
                description = ?2,
                date = ?3,
                is_on_diet = ?4,
                updated_at = strftime('%Y-%m-%dT%H:%M:%SZ', 'now')
            WHERE id = ?5
            "#,
            params![
                data.name,
                data.description,
                data.date.timestamp_millis(),
                data.is_on_diet,
                id,
            ],
        )?;

        if rows == 0 {
            return Ok(None);
        }
        Self::get_by_id(conn, id)
    }

    /// Delete a meal
    pub fn delete(conn: &Connection, id: &str) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM meals WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }

    /// Compute diet metrics for a user straight from the table
    ///
    /// Rows are folded one at a time in chronological order.
    pub fn metrics_for_user(conn: &Connection, user_id: &str) -> DbResult<DietMetrics> {
        let mut stmt = conn.prepare(
            "SELECT is_on_diet FROM meals WHERE user_id = ?1 ORDER BY date ASC, seq ASC",
        )?;

        let mut metrics = DietMetrics::new();
        let mut rows = stmt.query([user_id])?;
        while let Some(row) = rows.next()? {
            metrics.push(row.get(0)?);
        }

        Ok(metrics)
    }
}
