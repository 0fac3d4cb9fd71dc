//! v2 category endpoints. The v2 surface diverges from v1 on purpose:
//! the listing is ordered by id and updates use PATCH instead of PUT.

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, patch, post},
    Router,
};

use crate::{
    app::AppState,
    error::{AppError, Result},
    middleware,
    models::{Category, CategoryRequest, validate_category_name},
    queries::category_queries,
};

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_category))
        .route("/{id}", patch(update_category).delete(delete_category))
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware::admin_middleware,
        ))
        .route("/", get(get_categories))
        .route("/{id}", get(get_category))
}

pub async fn get_categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    let categories = category_queries::get_all_ordered_by_id(&state.db).await?;

    Ok(Json(categories))
}

pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Category>> {
    let category = category_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("The category with the specified id does not exist".to_string())
        })?;

    Ok(Json(category))
}

pub async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CategoryRequest>,
) -> Result<impl IntoResponse> {
    validate_category_name(&payload.name)?;

    if category_queries::exists_by_name(&state.db, &payload.name).await? {
        return Err(AppError::Conflict("The category already exists".to_string()));
    }

    let category = category_queries::create(&state.db, &payload.name).await?;
    let location = format!("/api/v2/categories/{}", category.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(category),
    ))
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<CategoryRequest>,
) -> Result<StatusCode> {
    validate_category_name(&payload.name)?;

    if !category_queries::exists(&state.db, id).await? {
        return Err(AppError::NotFound(
            "The category with the specified id does not exist".to_string(),
        ));
    }

    if category_queries::exists_by_name_excluding(&state.db, &payload.name, id).await? {
        return Err(AppError::Conflict("The category already exists".to_string()));
    }

    if !category_queries::update(&state.db, id, &payload.name).await? {
        return Err(AppError::InternalError(
            "Something went wrong updating the record".to_string(),
        ));
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    if !category_queries::exists(&state.db, id).await? {
        return Err(AppError::NotFound(
            "The category with the specified id does not exist".to_string(),
        ));
    }

    if !category_queries::delete(&state.db, id).await? {
        return Err(AppError::InternalError(
            "Something went wrong deleting the record".to_string(),
        ));
    }

    Ok(StatusCode::NO_CONTENT)
}
