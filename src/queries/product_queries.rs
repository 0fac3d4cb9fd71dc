use sqlx::PgPool;

use crate::{
    error::Result,
    models::{page_offset, NewProduct, Product, ProductRecord},
};

const SELECT_WITH_CATEGORY: &str =
    "SELECT p.*, c.name AS category_name FROM products p
     INNER JOIN categories c ON c.id = p.category_id";

/// Find product by ID, with its category name
pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<ProductRecord>> {
    let product = sqlx::query_as::<_, ProductRecord>(&format!(
        "{} WHERE p.id = $1",
        SELECT_WITH_CATEGORY
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(product)
}

/// Get all products ordered by name
pub async fn get_all(pool: &PgPool) -> Result<Vec<ProductRecord>> {
    let products = sqlx::query_as::<_, ProductRecord>(&format!(
        "{} ORDER BY p.name ASC",
        SELECT_WITH_CATEGORY
    ))
    .fetch_all(pool)
    .await?;

    Ok(products)
}

pub async fn count(pool: &PgPool) -> Result<i64> {
    let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
        .fetch_one(pool)
        .await?;

    Ok(total.0)
}

/// One page of products ordered by primary key. The count is a separate
/// statement, so the slice and the total may come from different states
/// under concurrent writes.
pub async fn get_page(pool: &PgPool, page: i64, page_size: i64) -> Result<Vec<ProductRecord>> {
    let products = sqlx::query_as::<_, ProductRecord>(&format!(
        "{} ORDER BY p.id ASC LIMIT $1 OFFSET $2",
        SELECT_WITH_CATEGORY
    ))
    .bind(page_size)
    .bind(page_offset(page, page_size))
    .fetch_all(pool)
    .await?;

    Ok(products)
}

pub async fn get_by_category(pool: &PgPool, category_id: i32) -> Result<Vec<ProductRecord>> {
    let products = sqlx::query_as::<_, ProductRecord>(&format!(
        "{} WHERE p.category_id = $1 ORDER BY p.name ASC",
        SELECT_WITH_CATEGORY
    ))
    .bind(category_id)
    .fetch_all(pool)
    .await?;

    Ok(products)
}

/// Case-insensitive substring search over name and description
pub async fn search(pool: &PgPool, term: &str) -> Result<Vec<ProductRecord>> {
    let pattern = format!("%{}%", term.trim());
    let products = sqlx::query_as::<_, ProductRecord>(&format!(
        "{} WHERE p.name ILIKE $1 OR p.description ILIKE $1 ORDER BY p.name ASC",
        SELECT_WITH_CATEGORY
    ))
    .bind(pattern)
    .fetch_all(pool)
    .await?;

    Ok(products)
}

pub async fn exists(pool: &PgPool, id: i32) -> Result<bool> {
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM products WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await?;

    Ok(exists.0)
}

pub async fn exists_by_name(pool: &PgPool, name: &str) -> Result<bool> {
    let exists: (bool,) = sqlx::query_as(
        "SELECT EXISTS (SELECT 1 FROM products WHERE LOWER(TRIM(name)) = LOWER(TRIM($1)))",
    )
    .bind(name)
    .fetch_one(pool)
    .await?;

    Ok(exists.0)
}

pub async fn exists_by_name_excluding(pool: &PgPool, name: &str, id: i32) -> Result<bool> {
    let exists: (bool,) = sqlx::query_as(
        "SELECT EXISTS (SELECT 1 FROM products
         WHERE LOWER(TRIM(name)) = LOWER(TRIM($1)) AND id <> $2)",
    )
    .bind(name)
    .bind(id)
    .fetch_one(pool)
    .await?;

    Ok(exists.0)
}

pub async fn exists_by_sku(pool: &PgPool, sku: &str) -> Result<bool> {
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM products WHERE sku = $1)")
        .bind(sku)
        .fetch_one(pool)
        .await?;

    Ok(exists.0)
}

pub async fn exists_by_sku_excluding(pool: &PgPool, sku: &str, id: i32) -> Result<bool> {
    let exists: (bool,) =
        sqlx::query_as("SELECT EXISTS (SELECT 1 FROM products WHERE sku = $1 AND id <> $2)")
            .bind(sku)
            .bind(id)
            .fetch_one(pool)
            .await?;

    Ok(exists.0)
}

pub async fn create(pool: &PgPool, new: &NewProduct, img_url: &str) -> Result<Product> {
    let product = sqlx::query_as::<_, Product>(
        "INSERT INTO products (name, description, price, img_url, sku, stock, category_id)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING *",
    )
    .bind(&new.name)
    .bind(&new.description)
    .bind(new.price)
    .bind(img_url)
    .bind(&new.sku)
    .bind(new.stock)
    .bind(new.category_id)
    .fetch_one(pool)
    .await?;

    Ok(product)
}

pub async fn update(
    pool: &PgPool,
    id: i32,
    new: &NewProduct,
    img_url: Option<&str>,
) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE products
         SET name = $1, description = $2, price = $3, sku = $4, stock = $5,
             category_id = $6, img_url = COALESCE($7, img_url), update_date = NOW()
         WHERE id = $8",
    )
    .bind(&new.name)
    .bind(&new.description)
    .bind(new.price)
    .bind(&new.sku)
    .bind(new.stock)
    .bind(new.category_id)
    .bind(img_url)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a product, returning the removed row so the caller can clean up
/// its stored image.
pub async fn delete(pool: &PgPool, id: i32) -> Result<Option<Product>> {
    let product =
        sqlx::query_as::<_, Product>("DELETE FROM products WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(pool)
            .await?;

    Ok(product)
}

/// Find product by case-insensitive trimmed name
pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<ProductRecord>> {
    let product = sqlx::query_as::<_, ProductRecord>(&format!(
        "{} WHERE LOWER(TRIM(p.name)) = LOWER(TRIM($1))",
        SELECT_WITH_CATEGORY
    ))
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(product)
}

/// Conditional decrement so concurrent purchases cannot oversell: the row
/// only updates while enough stock remains. Returns the updated product, or
/// None when the product is missing or stock is insufficient.
pub async fn buy(pool: &PgPool, name: &str, quantity: i32) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(
        "UPDATE products SET stock = stock - $2, update_date = NOW()
         WHERE LOWER(TRIM(name)) = LOWER(TRIM($1)) AND stock >= $2
         RETURNING *",
    )
    .bind(name)
    .bind(quantity)
    .fetch_optional(pool)
    .await?;

    Ok(product)
}
