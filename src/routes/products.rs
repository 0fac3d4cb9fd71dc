use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::{StatusCode, header},
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, patch, post, put},
    Router,
};

use crate::{
    app::AppState,
    error::{AppError, Result},
    middleware,
    models::{
        ExistsResponse, PageParams, PaginationResponse, ProductDto, ProductForm, UploadedImage,
    },
    queries::{category_queries, product_queries},
    services::image_service,
};

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_product))
        .route("/{id}", put(update_product).delete(delete_product))
        .route("/buy/{name}/{quantity}", patch(buy_product))
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware::admin_middleware,
        ))
        .route("/", get(get_products))
        .route("/paged", get(get_products_paged))
        .route("/{id}", get(get_product))
        .route("/by-category/{category_id}", get(get_products_by_category))
        .route("/search/{term}", get(search_products))
        .route("/exists/{id}", get(product_exists))
        .route("/exists/by-name/{name}", get(product_exists_by_name))
}

pub async fn get_products(State(state): State<AppState>) -> Result<Json<Vec<ProductDto>>> {
    let products = product_queries::get_all(&state.db).await?;

    Ok(Json(products.into_iter().map(ProductDto::from).collect()))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ProductDto>> {
    let product = product_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("The product with the specified id does not exist".to_string())
        })?;

    Ok(Json(ProductDto::from(product)))
}

pub async fn get_products_paged(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<PaginationResponse<ProductDto>>> {
    if params.page <= 0 || params.page_size <= 0 {
        return Err(AppError::BadRequest(
            "Page number and page size must be greater than zero".to_string(),
        ));
    }

    // Two statements, so the total and the slice may disagree under
    // concurrent writes. Acceptable for catalog browsing.
    let total_items = product_queries::count(&state.db).await?;
    let products = product_queries::get_page(&state.db, params.page, params.page_size).await?;

    if products.is_empty() {
        return Err(AppError::NotFound("No products found".to_string()));
    }

    let items = products.into_iter().map(ProductDto::from).collect();

    Ok(Json(PaginationResponse::new(
        total_items,
        params.page,
        params.page_size,
        items,
    )))
}

pub async fn get_products_by_category(
    State(state): State<AppState>,
    Path(category_id): Path<i32>,
) -> Result<Json<Vec<ProductDto>>> {
    let products = product_queries::get_by_category(&state.db, category_id).await?;

    if products.is_empty() {
        return Err(AppError::NotFound(
            "No products found for the specified category".to_string(),
        ));
    }

    Ok(Json(products.into_iter().map(ProductDto::from).collect()))
}

pub async fn search_products(
    State(state): State<AppState>,
    Path(term): Path<String>,
) -> Result<Json<Vec<ProductDto>>> {
    let products = product_queries::search(&state.db, &term).await?;

    if products.is_empty() {
        return Err(AppError::NotFound(
            "No products found for the specified name or description".to_string(),
        ));
    }

    Ok(Json(products.into_iter().map(ProductDto::from).collect()))
}

pub async fn create_product(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    let new = parse_product_form(multipart).await?.into_new_product()?;

    if !category_queries::exists(&state.db, new.category_id).await? {
        return Err(AppError::NotFound(
            "The specified category does not exist".to_string(),
        ));
    }

    if product_queries::exists_by_name(&state.db, &new.name).await? {
        return Err(AppError::Conflict("The product already exists".to_string()));
    }

    if product_queries::exists_by_sku(&state.db, &new.sku).await? {
        return Err(AppError::Conflict(
            "A product with the same SKU already exists".to_string(),
        ));
    }

    let img_url = match store_image(&state, new.image.as_ref()).await? {
        Some(url) => url,
        None => new
            .img_url
            .clone()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| image_service::PLACEHOLDER_URL.to_string()),
    };

    let product = product_queries::create(&state.db, &new, &img_url).await?;

    let record = product_queries::find_by_id(&state.db, product.id)
        .await?
        .ok_or_else(|| {
            AppError::InternalError("Could not retrieve the created product".to_string())
        })?;
    let location = format!("/api/v1/catalog/products/{}", product.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ProductDto::from(record)),
    ))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<StatusCode> {
    let new = parse_product_form(multipart).await?.into_new_product()?;

    if !product_queries::exists(&state.db, id).await? {
        return Err(AppError::NotFound(
            "The product with the specified id does not exist".to_string(),
        ));
    }

    if !category_queries::exists(&state.db, new.category_id).await? {
        return Err(AppError::NotFound(
            "The specified category does not exist".to_string(),
        ));
    }

    if product_queries::exists_by_name_excluding(&state.db, &new.name, id).await? {
        return Err(AppError::Conflict("The product already exists".to_string()));
    }

    if product_queries::exists_by_sku_excluding(&state.db, &new.sku, id).await? {
        return Err(AppError::Conflict(
            "A product with the same SKU already exists".to_string(),
        ));
    }

    let uploaded_url = store_image(&state, new.image.as_ref()).await?;
    let img_url = uploaded_url
        .or_else(|| new.img_url.clone().filter(|u| !u.trim().is_empty()));

    if !product_queries::update(&state.db, id, &new, img_url.as_deref()).await? {
        return Err(AppError::InternalError(
            "Something went wrong updating the product".to_string(),
        ));
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    let product = product_queries::delete(&state.db, id).await?.ok_or_else(|| {
        AppError::NotFound("The product with the specified id does not exist".to_string())
    })?;

    if let Some(img_url) = &product.img_url {
        image_service::delete_product_image(&state.uploads.dir, img_url).await;
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn buy_product(
    State(state): State<AppState>,
    Path((name, quantity)): Path<(String, i32)>,
) -> Result<String> {
    if name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "The product name cannot be empty".to_string(),
        ));
    }
    if quantity <= 0 {
        return Err(AppError::BadRequest(
            "The quantity must be greater than zero".to_string(),
        ));
    }

    match product_queries::buy(&state.db, &name, quantity).await? {
        Some(product) => {
            let units = if quantity == 1 { "unit" } else { "units" };
            Ok(format!(
                "Successful purchase of {} {} of product '{}'",
                quantity, units, product.name
            ))
        }
        // Nothing updated: either the product is unknown or the stock ran out.
        None => {
            if product_queries::exists_by_name(&state.db, &name).await? {
                Err(AppError::Conflict(
                    "Not enough stock to complete the purchase".to_string(),
                ))
            } else {
                Err(AppError::NotFound(
                    "The product with the specified name does not exist".to_string(),
                ))
            }
        }
    }
}

pub async fn product_exists(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ExistsResponse>> {
    let exists = product_queries::exists(&state.db, id).await?;

    Ok(Json(ExistsResponse { exists }))
}

pub async fn product_exists_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ExistsResponse>> {
    let exists = product_queries::exists_by_name(&state.db, &name).await?;

    Ok(Json(ExistsResponse { exists }))
}

async fn store_image(state: &AppState, image: Option<&UploadedImage>) -> Result<Option<String>> {
    let Some(image) = image else {
        return Ok(None);
    };

    let file_name =
        image_service::save_product_image(&state.uploads.dir, &image.file_name, &image.data)
            .await?;

    Ok(Some(image_service::public_image_url(
        &state.uploads.public_base_url,
        &file_name,
    )))
}

async fn parse_product_form(mut multipart: Multipart) -> Result<ProductForm> {
    let mut form = ProductForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        let Some(field_name) = field.name().map(str::to_string) else {
            continue;
        };

        match field_name.as_str() {
            "image" => {
                let file_name = field.file_name().unwrap_or("image").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Invalid image upload: {}", e)))?;
                if !data.is_empty() {
                    form.image = Some(UploadedImage {
                        file_name,
                        data: data.to_vec(),
                    });
                }
            }
            "name" => form.name = Some(read_text(field).await?),
            "description" => form.description = Some(read_text(field).await?),
            "img_url" => form.img_url = Some(read_text(field).await?),
            "sku" => form.sku = Some(read_text(field).await?),
            "price" => {
                form.price = Some(read_text(field).await?.trim().parse().map_err(|_| {
                    AppError::BadRequest("price must be a decimal number".to_string())
                })?)
            }
            "stock" => {
                form.stock = Some(read_text(field).await?.trim().parse().map_err(|_| {
                    AppError::BadRequest("stock must be an integer".to_string())
                })?)
            }
            "category_id" => {
                form.category_id = Some(read_text(field).await?.trim().parse().map_err(|_| {
                    AppError::BadRequest("category_id must be an integer".to_string())
                })?)
            }
            _ => {}
        }
    }

    Ok(form)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart field: {}", e)))
}
