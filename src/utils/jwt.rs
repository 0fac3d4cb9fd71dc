use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Tokens expire two hours after issuance.
const TOKEN_TTL_HOURS: i64 = 2;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub role: String,
    pub exp: usize,
}

pub fn generate_token(secret: &str, user_id: i32, username: &str, role: &str) -> Result<String> {
    let expiration = chrono::Utc::now()
        .checked_add_signed(chrono::Duration::hours(TOKEN_TTL_HOURS))
        .ok_or_else(|| AppError::InternalError("Failed to calculate expiration".to_string()))?
        .timestamp() as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        username: username.to_string(),
        role: role.to_string(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalError(format!("Token generation failed: {}", e)))
}

pub fn verify_token(secret: &str, token: &str) -> Result<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized("Invalid token".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn token_round_trips_its_claims() {
        let token = generate_token(SECRET, 42, "ana", "Admin").unwrap();
        let claims = verify_token(SECRET, &token).unwrap();

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.username, "ana");
        assert_eq!(claims.role, "Admin");
    }

    #[test]
    fn expiry_is_about_two_hours_out() {
        let token = generate_token(SECRET, 1, "ana", "User").unwrap();
        let claims = verify_token(SECRET, &token).unwrap();

        let now = chrono::Utc::now().timestamp() as usize;
        let two_hours = 2 * 60 * 60;
        assert!(claims.exp > now + two_hours - 60);
        assert!(claims.exp <= now + two_hours + 60);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = generate_token(SECRET, 1, "ana", "User").unwrap();
        assert!(verify_token("other-secret", &token).is_err());
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(matches!(
            verify_token(SECRET, "not.a.token"),
            Err(AppError::Unauthorized(_))
        ));
    }
}
