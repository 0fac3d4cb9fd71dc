use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Role {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct RoleRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

const FIELD_MAX_LEN: usize = 255;

pub fn validate_role(req: &RoleRequest) -> Result<()> {
    if req.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }
    if req.name.chars().count() > FIELD_MAX_LEN || req.description.chars().count() > FIELD_MAX_LEN {
        return Err(AppError::BadRequest(format!(
            "name and description cannot exceed {} characters",
            FIELD_MAX_LEN
        )));
    }
    Ok(())
}
