use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::get,
    Router,
};

use crate::{
    app::AppState,
    error::{AppError, Result},
    middleware,
    models::{ExistsResponse, Role, RoleRequest, validate_role},
    queries::role_queries,
};

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(get_roles).post(create_role))
        .route("/{id}", get(get_role).put(update_role).delete(delete_role))
        .route("/exists/{id}", get(role_exists))
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ))
}

pub async fn get_roles(State(state): State<AppState>) -> Result<Json<Vec<Role>>> {
    let roles = role_queries::get_all(&state.db).await?;

    Ok(Json(roles))
}

pub async fn get_role(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<Role>> {
    let role = role_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("The role with id {} does not exist", id)))?;

    Ok(Json(role))
}

pub async fn create_role(
    State(state): State<AppState>,
    Json(payload): Json<RoleRequest>,
) -> Result<impl IntoResponse> {
    validate_role(&payload)?;

    if role_queries::exists_by_name(&state.db, &payload.name).await? {
        return Err(AppError::Conflict(format!(
            "A role named '{}' already exists",
            payload.name
        )));
    }

    let role = role_queries::create(&state.db, &payload).await?;
    let location = format!("/api/v1/catalog/roles/{}", role.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(role),
    ))
}

pub async fn update_role(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<RoleRequest>,
) -> Result<StatusCode> {
    validate_role(&payload)?;

    if !role_queries::exists(&state.db, id).await? {
        return Err(AppError::NotFound(format!(
            "The role with id {} does not exist",
            id
        )));
    }

    if role_queries::exists_by_name_excluding(&state.db, &payload.name, id).await? {
        return Err(AppError::Conflict(format!(
            "Another role named '{}' already exists",
            payload.name
        )));
    }

    if !role_queries::update(&state.db, id, &payload).await? {
        return Err(AppError::InternalError(
            "Something went wrong updating the role".to_string(),
        ));
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_role(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    if !role_queries::delete(&state.db, id).await? {
        return Err(AppError::NotFound(format!(
            "The role with id {} does not exist",
            id
        )));
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn role_exists(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ExistsResponse>> {
    let exists = role_queries::exists(&state.db, id).await?;

    Ok(Json(ExistsResponse { exists }))
}
