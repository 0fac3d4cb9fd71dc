use sqlx::PgPool;

use crate::{
    error::Result,
    models::{Company, CompanyRequest},
};

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Company>> {
    let company = sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(company)
}

pub async fn find_by_code(pool: &PgPool, code: &str) -> Result<Option<Company>> {
    let company = sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE code = $1")
        .bind(code)
        .fetch_optional(pool)
        .await?;

    Ok(company)
}

pub async fn get_all(pool: &PgPool) -> Result<Vec<Company>> {
    let companies = sqlx::query_as::<_, Company>("SELECT * FROM companies ORDER BY name ASC")
        .fetch_all(pool)
        .await?;

    Ok(companies)
}

pub async fn exists(pool: &PgPool, id: i32) -> Result<bool> {
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM companies WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await?;

    Ok(exists.0)
}

pub async fn exists_by_code(pool: &PgPool, code: &str) -> Result<bool> {
    let exists: (bool,) =
        sqlx::query_as("SELECT EXISTS (SELECT 1 FROM companies WHERE code = $1)")
            .bind(code)
            .fetch_one(pool)
            .await?;

    Ok(exists.0)
}

pub async fn exists_by_code_excluding(pool: &PgPool, code: &str, id: i32) -> Result<bool> {
    let exists: (bool,) =
        sqlx::query_as("SELECT EXISTS (SELECT 1 FROM companies WHERE code = $1 AND id <> $2)")
            .bind(code)
            .bind(id)
            .fetch_one(pool)
            .await?;

    Ok(exists.0)
}

pub async fn create(pool: &PgPool, req: &CompanyRequest) -> Result<Company> {
    let company = sqlx::query_as::<_, Company>(
        "INSERT INTO companies (name, code, rfc, is_active)
         VALUES ($1, $2, $3, $4)
         RETURNING *",
    )
    .bind(&req.name)
    .bind(&req.code)
    .bind(&req.rfc)
    .bind(req.is_active)
    .fetch_one(pool)
    .await?;

    Ok(company)
}

/// Update a company, stamping update_at.
pub async fn update(pool: &PgPool, id: i32, req: &CompanyRequest) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE companies
         SET name = $1, code = $2, rfc = $3, is_active = $4, update_at = NOW()
         WHERE id = $5",
    )
    .bind(&req.name)
    .bind(&req.code)
    .bind(&req.rfc)
    .bind(req.is_active)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete(pool: &PgPool, id: i32) -> Result<bool> {
    let result = sqlx::query("DELETE FROM companies WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
