pub mod health;
pub mod security;
pub mod users;

use uuid::Uuid;
use wayfare_core::AppError;

/// Parses an identifier carried in a request body.
fn parse_id(value: &str, kind: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(value.trim())
        .map_err(|error| AppError::Validation(format!("invalid {kind} id '{value}': {error}")))
}
