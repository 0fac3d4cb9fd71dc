use sqlx::PgPool;

use crate::{error::Result, models::Category};

/// Find category by ID
pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Category>> {
    let category = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(category)
}

/// Get all categories ordered by name
pub async fn get_all(pool: &PgPool) -> Result<Vec<Category>> {
    let categories =
        sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name ASC")
            .fetch_all(pool)
            .await?;

    Ok(categories)
}

/// Get all categories ordered by ID
pub async fn get_all_ordered_by_id(pool: &PgPool) -> Result<Vec<Category>> {
    let categories = sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY id ASC")
        .fetch_all(pool)
        .await?;

    Ok(categories)
}

pub async fn exists(pool: &PgPool, id: i32) -> Result<bool> {
    let exists: (bool,) =
        sqlx::query_as("SELECT EXISTS (SELECT 1 FROM categories WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await?;

    Ok(exists.0)
}

// Exact match on name, matching the unique constraint.
pub async fn exists_by_name(pool: &PgPool, name: &str) -> Result<bool> {
    let exists: (bool,) =
        sqlx::query_as("SELECT EXISTS (SELECT 1 FROM categories WHERE name = $1)")
            .bind(name)
            .fetch_one(pool)
            .await?;

    Ok(exists.0)
}

/// Uniqueness check for updates, ignoring the record being updated.
pub async fn exists_by_name_excluding(pool: &PgPool, name: &str, id: i32) -> Result<bool> {
    let exists: (bool,) = sqlx::query_as(
        "SELECT EXISTS (SELECT 1 FROM categories WHERE name = $1 AND id <> $2)",
    )
    .bind(name)
    .bind(id)
    .fetch_one(pool)
    .await?;

    Ok(exists.0)
}

pub async fn create(pool: &PgPool, name: &str) -> Result<Category> {
    let category = sqlx::query_as::<_, Category>(
        "INSERT INTO categories (name) VALUES ($1) RETURNING *",
    )
    .bind(name)
    .fetch_one(pool)
    .await?;

    Ok(category)
}

pub async fn update(pool: &PgPool, id: i32, name: &str) -> Result<bool> {
    let result = sqlx::query("UPDATE categories SET name = $1 WHERE id = $2")
        .bind(name)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a category. Fails with a conflict while products reference it
/// (ON DELETE RESTRICT on products.category_id).
pub async fn delete(pool: &PgPool, id: i32) -> Result<bool> {
    let result = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
