use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub name: String,
    pub password: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    #[serde(default)]
    pub name: String,
    pub password: String,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Public projection of a user. The password hash never leaves the server.
#[derive(Debug, Serialize)]
pub struct UserData {
    pub id: i32,
    pub username: String,
    pub name: String,
    pub role: String,
}

impl From<User> for UserData {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            name: user.name,
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserData,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_data_drops_the_password_hash() {
        let user = User {
            id: 1,
            username: "ana".to_string(),
            name: "Ana".to_string(),
            password: "$2b$12$secret".to_string(),
            role: "User".to_string(),
            created_at: Utc::now(),
        };

        let data = UserData::from(user);
        let json = serde_json::to_value(&data).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["username"], "ana");
        assert_eq!(json["role"], "User");
    }
}
