//! Request payloads and their validation
//!
//! Incoming JSON is deserialized into the `*Request` types and then checked
//! into the model-level `*Create`/`*Update` data.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

const USERNAME_LEN: (usize, usize) = (3, 30);
const PASSWORD_LEN: (usize, usize) = (8, 20);

/// Body of `POST /api/users`
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
}

/// Body of `POST /api/users/sessions`
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body of `POST /api/meals` and `PUT /api/meals/:id`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealRequest {
    pub name: String,
    pub description: String,
    pub date: DateInput,
    pub is_on_diet: bool,
}

/// A date as clients send it
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DateInput {
    /// Epoch milliseconds
    Millis(i64),
    /// RFC 3339, naive `YYYY-MM-DDTHH:MM:SS` (UTC), or `YYYY-MM-DD`
    Text(String),
}

/// A meal payload that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidMeal {
    pub name: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub is_on_diet: bool,
}

impl RegisterRequest {
    pub fn validate(&self) -> AppResult<()> {
        check_len("username", &self.username, USERNAME_LEN)?;
        check_len("password", &self.password, PASSWORD_LEN)?;
        if !is_valid_email(&self.email) {
            return Err(AppError::Validation("email must be a valid e-mail address.".to_string()));
        }
        Ok(())
    }
}

impl MealRequest {
    pub fn validate(self) -> AppResult<ValidMeal> {
        let name = self.name.trim().to_string();
        let description = self.description.trim().to_string();

        if name.is_empty() {
            return Err(AppError::Validation("name must not be empty.".to_string()));
        }
        if description.is_empty() {
            return Err(AppError::Validation("description must not be empty.".to_string()));
        }

        Ok(ValidMeal {
            name,
            description,
            date: self.date.to_utc()?,
            is_on_diet: self.is_on_diet,
        })
    }
}

impl DateInput {
    /// Resolve to a UTC timestamp
    pub fn to_utc(&self) -> AppResult<DateTime<Utc>> {
        let invalid = || AppError::Validation("date must be a valid date.".to_string());

        match self {
            DateInput::Millis(ms) => Utc.timestamp_millis_opt(*ms).single().ok_or_else(invalid),
            DateInput::Text(text) => {
                let text = text.trim();
                if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
                    return Ok(dt.with_timezone(&Utc));
                }
                if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
                    return Ok(naive.and_utc());
                }
                if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
                    return date
                        .and_hms_opt(0, 0, 0)
                        .map(|naive| naive.and_utc())
                        .ok_or_else(invalid);
                }
                Err(invalid())
            }
        }
    }
}

/// Parse a path id, normalizing it to the hyphenated lowercase form
pub fn parse_id(raw: &str) -> AppResult<String> {
    Uuid::parse_str(raw)
        .map(|id| id.to_string())
        .map_err(|_| AppError::Validation("id must be a valid UUID.".to_string()))
}

fn check_len(field: &str, value: &str, (min, max): (usize, usize)) -> AppResult<()> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(AppError::Validation(format!(
            "{field} must be between {min} and {max} characters."
        )));
    }
    Ok(())
}

fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(username: &str, password: &str, email: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            password: password.to_string(),
            email: email.to_string(),
        }
    }

    #[test]
    fn test_register_bounds() {
        assert!(register("bob", "12345678", "bob@example.com").validate().is_ok());
        assert!(register("bo", "12345678", "bob@example.com").validate().is_err());
        assert!(register(&"b".repeat(31), "12345678", "bob@example.com").validate().is_err());
        assert!(register("bob", "1234567", "bob@example.com").validate().is_err());
        assert!(register("bob", &"1".repeat(21), "bob@example.com").validate().is_err());
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last@mail.example.org"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("a@localhost"));
        assert!(!is_valid_email("a@b..com"));
        assert!(!is_valid_email("a b@example.com"));
        assert!(!is_valid_email("a@b@example.com"));
    }

    #[test]
    fn test_date_inputs() {
        let expected = Utc.with_ymd_and_hms(2024, 11, 26, 12, 30, 0).unwrap();

        let rfc = DateInput::Text("2024-11-26T12:30:00Z".to_string());
        assert_eq!(rfc.to_utc().unwrap(), expected);

        let offset = DateInput::Text("2024-11-26T09:30:00-03:00".to_string());
        assert_eq!(offset.to_utc().unwrap(), expected);

        let naive = DateInput::Text("2024-11-26T12:30:00".to_string());
        assert_eq!(naive.to_utc().unwrap(), expected);

        let millis = DateInput::Millis(expected.timestamp_millis());
        assert_eq!(millis.to_utc().unwrap(), expected);

        let day = DateInput::Text("2024-11-26".to_string());
        assert_eq!(day.to_utc().unwrap(), Utc.with_ymd_and_hms(2024, 11, 26, 0, 0, 0).unwrap());

        assert!(DateInput::Text("yesterday".to_string()).to_utc().is_err());
    }

    #[test]
    fn test_meal_request_from_json() {
        let req: MealRequest = serde_json::from_value(serde_json::json!({
            "name": " Lunch ",
            "description": "rice and beans",
            "date": 1_732_624_200_000i64,
            "isOnDiet": true,
        }))
        .unwrap();

        let meal = req.validate().unwrap();
        assert_eq!(meal.name, "Lunch");
        assert!(meal.is_on_diet);

        let missing_flag = serde_json::from_value::<MealRequest>(serde_json::json!({
            "name": "Lunch",
            "description": "rice",
            "date": "2024-11-26",
        }));
        assert!(missing_flag.is_err());
    }

    #[test]
    fn test_blank_description_rejected() {
        let req = MealRequest {
            name: "Dinner".to_string(),
            description: "   ".to_string(),
            date: DateInput::Millis(0),
            is_on_diet: false,
        };
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_parse_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string().to_uppercase()).unwrap(), id.to_string());
        assert!(parse_id("42").is_err());
    }
}
