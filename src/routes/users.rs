use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, post},
    Router,
};

use crate::{
    app::AppState,
    error::{AppError, Result},
    middleware,
    models::{LoginRequest, LoginResponse, RegisterRequest, UserData},
    queries::{role_queries, user_queries},
    utils::jwt,
};

const DEFAULT_ROLE: &str = "User";
const MIN_PASSWORD_LEN: usize = 8;

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(get_users))
        .route("/{id}", get(get_user))
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ))
        .route("/", post(register_user))
        .route("/login", post(login_user))
}

pub async fn register_user(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    validate_registration(&payload)?;

    if user_queries::username_taken(&state.db, &payload.username).await? {
        return Err(AppError::Conflict("The username already exists".to_string()));
    }

    let role = payload
        .role
        .as_deref()
        .filter(|r| !r.trim().is_empty())
        .unwrap_or(DEFAULT_ROLE);

    // Roles are assigned by name; make sure the catalog row exists.
    role_queries::ensure_role(&state.db, role).await?;

    let password_hash = bcrypt::hash(&payload.password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {}", e)))?;

    let user = user_queries::create_user(
        &state.db,
        payload.username.trim(),
        payload.name.trim(),
        &password_hash,
        role,
    )
    .await?;

    let location = format!("/api/v1/users/{}", user.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(UserData::from(user)),
    ))
}

pub async fn login_user(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    // Every failure path answers the same way; the specifics only go to
    // the server log.
    let rejected = || AppError::Unauthorized("Invalid username or password".to_string());

    if payload.username.trim().is_empty() || payload.password.is_empty() {
        tracing::debug!("Login rejected: empty credentials");
        return Err(rejected());
    }

    let user = match user_queries::find_by_username(&state.db, &payload.username).await? {
        Some(user) => user,
        None => {
            tracing::debug!("Login rejected: unknown username");
            return Err(rejected());
        }
    };

    let is_valid = bcrypt::verify(&payload.password, &user.password)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {}", e)))?;

    if !is_valid {
        tracing::debug!(user_id = user.id, "Login rejected: wrong password");
        return Err(rejected());
    }

    let token = jwt::generate_token(&state.jwt_secret, user.id, &user.username, &user.role)?;

    Ok(Json(LoginResponse {
        token,
        user: UserData::from(user),
        message: "Login successful".to_string(),
    }))
}

pub async fn get_users(State(state): State<AppState>) -> Result<Json<Vec<UserData>>> {
    let users = user_queries::get_all(&state.db).await?;

    Ok(Json(users.into_iter().map(UserData::from).collect()))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<UserData>> {
    let user = user_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("The user with the specified id does not exist".to_string())
        })?;

    Ok(Json(UserData::from(user)))
}

fn validate_registration(payload: &RegisterRequest) -> Result<()> {
    if payload.username.trim().is_empty() {
        return Err(AppError::BadRequest(
            "The username cannot be empty".to_string(),
        ));
    }

    if payload.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(username: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            name: String::new(),
            password: password.to_string(),
            role: None,
        }
    }

    #[test]
    fn blank_username_is_rejected() {
        assert!(validate_registration(&request("   ", "long-enough-pw")).is_err());
    }

    #[test]
    fn short_password_is_rejected() {
        assert!(validate_registration(&request("ana", "short")).is_err());
    }

    #[test]
    fn valid_registration_passes() {
        assert!(validate_registration(&request("ana", "long-enough-pw")).is_ok());
    }

    #[test]
    fn stored_hash_verifies_the_original_password() {
        let hash = bcrypt::hash("hunter2hunter2", 4).unwrap();
        assert!(bcrypt::verify("hunter2hunter2", &hash).unwrap());
        assert!(!bcrypt::verify("wrong-password", &hash).unwrap());
    }
}
