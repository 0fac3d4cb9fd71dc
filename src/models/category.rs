use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub creation_date: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ExistsResponse {
    pub exists: bool,
}

const NAME_MIN_LEN: usize = 3;
const NAME_MAX_LEN: usize = 100;

pub fn validate_category_name(name: &str) -> Result<()> {
    let len = name.trim().chars().count();
    if len < NAME_MIN_LEN || len > NAME_MAX_LEN {
        return Err(AppError::BadRequest(format!(
            "Category name must be between {} and {} characters",
            NAME_MIN_LEN, NAME_MAX_LEN
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_names_shorter_than_three_chars() {
        assert!(validate_category_name("ab").is_err());
        assert!(validate_category_name("  a  ").is_err());
    }

    #[test]
    fn rejects_names_longer_than_hundred_chars() {
        let long = "x".repeat(101);
        assert!(validate_category_name(&long).is_err());
    }

    #[test]
    fn accepts_names_within_bounds() {
        assert!(validate_category_name("abc").is_ok());
        assert!(validate_category_name(&"x".repeat(100)).is_ok());
    }
}
