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
    models::{Company, CompanyRequest, validate_company},
    queries::company_queries,
};

// Company data is internal; every endpoint requires a valid token.
pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(get_companies).post(create_company))
        .route(
            "/{id}",
            get(get_company).put(update_company).delete(delete_company),
        )
        .route("/by-code/{code}", get(get_company_by_code))
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ))
}

pub async fn get_companies(State(state): State<AppState>) -> Result<Json<Vec<Company>>> {
    let companies = company_queries::get_all(&state.db).await?;

    Ok(Json(companies))
}

pub async fn get_company(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Company>> {
    let company = company_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("The company with id {} does not exist", id)))?;

    Ok(Json(company))
}

pub async fn get_company_by_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<Company>> {
    let company = company_queries::find_by_code(&state.db, &code)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("The company with code '{}' does not exist", code))
        })?;

    Ok(Json(company))
}

pub async fn create_company(
    State(state): State<AppState>,
    Json(payload): Json<CompanyRequest>,
) -> Result<impl IntoResponse> {
    validate_company(&payload)?;

    if company_queries::exists_by_code(&state.db, &payload.code).await? {
        return Err(AppError::Conflict(format!(
            "A company with the code '{}' already exists",
            payload.code
        )));
    }

    let company = company_queries::create(&state.db, &payload).await?;
    let location = format!("/api/v1/catalog/companies/{}", company.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(company),
    ))
}

pub async fn update_company(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<CompanyRequest>,
) -> Result<StatusCode> {
    validate_company(&payload)?;

    if !company_queries::exists(&state.db, id).await? {
        return Err(AppError::NotFound(format!(
            "The company with id {} does not exist",
            id
        )));
    }

    if company_queries::exists_by_code_excluding(&state.db, &payload.code, id).await? {
        return Err(AppError::Conflict(format!(
            "Another company with the code '{}' already exists",
            payload.code
        )));
    }

    if !company_queries::update(&state.db, id, &payload).await? {
        return Err(AppError::InternalError(
            "Something went wrong updating the company".to_string(),
        ));
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_company(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    if !company_queries::delete(&state.db, id).await? {
        return Err(AppError::NotFound(format!(
            "The company with id {} does not exist",
            id
        )));
    }

    Ok(StatusCode::NO_CONTENT)
}
