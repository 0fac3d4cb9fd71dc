use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Company {
    pub id: i32,
    pub name: String,
    pub code: String,
    pub rfc: Option<String>,
    pub is_active: bool,
    pub create_at: DateTime<Utc>,
    pub update_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct CompanyRequest {
    pub name: String,
    pub code: String,
    pub rfc: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

const FIELD_MAX_LEN: usize = 255;

pub fn validate_company(req: &CompanyRequest) -> Result<()> {
    if req.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }
    if req.code.trim().is_empty() {
        return Err(AppError::BadRequest("code is required".to_string()));
    }
    for (field, value) in [("name", &req.name), ("code", &req.code)] {
        if value.chars().count() > FIELD_MAX_LEN {
            return Err(AppError::BadRequest(format!(
                "{} cannot exceed {} characters",
                field, FIELD_MAX_LEN
            )));
        }
    }
    if let Some(rfc) = &req.rfc {
        if rfc.chars().count() > FIELD_MAX_LEN {
            return Err(AppError::BadRequest(format!(
                "rfc cannot exceed {} characters",
                FIELD_MAX_LEN
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_code_is_rejected() {
        let req = CompanyRequest {
            name: "Acme".to_string(),
            code: "  ".to_string(),
            rfc: None,
            is_active: true,
        };
        assert!(validate_company(&req).is_err());
    }

    #[test]
    fn valid_company_passes() {
        let req = CompanyRequest {
            name: "Acme".to_string(),
            code: "ACM".to_string(),
            rfc: Some("ACM010101AAA".to_string()),
            is_active: true,
        };
        assert!(validate_company(&req).is_ok());
    }
}
