use sqlx::PgPool;

use crate::{
    error::Result,
    models::{Role, RoleRequest},
};

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Role>> {
    let role = sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(role)
}

pub async fn get_all(pool: &PgPool) -> Result<Vec<Role>> {
    let roles = sqlx::query_as::<_, Role>("SELECT * FROM roles ORDER BY name ASC")
        .fetch_all(pool)
        .await?;

    Ok(roles)
}

pub async fn exists(pool: &PgPool, id: i32) -> Result<bool> {
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM roles WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await?;

    Ok(exists.0)
}

pub async fn exists_by_name(pool: &PgPool, name: &str) -> Result<bool> {
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM roles WHERE name = $1)")
        .bind(name)
        .fetch_one(pool)
        .await?;

    Ok(exists.0)
}

pub async fn exists_by_name_excluding(pool: &PgPool, name: &str, id: i32) -> Result<bool> {
    let exists: (bool,) =
        sqlx::query_as("SELECT EXISTS (SELECT 1 FROM roles WHERE name = $1 AND id <> $2)")
            .bind(name)
            .bind(id)
            .fetch_one(pool)
            .await?;

    Ok(exists.0)
}

pub async fn create(pool: &PgPool, req: &RoleRequest) -> Result<Role> {
    let role = sqlx::query_as::<_, Role>(
        "INSERT INTO roles (name, description, is_active)
         VALUES ($1, $2, $3)
         RETURNING *",
    )
    .bind(&req.name)
    .bind(&req.description)
    .bind(req.is_active)
    .fetch_one(pool)
    .await?;

    Ok(role)
}

pub async fn update(pool: &PgPool, id: i32, req: &RoleRequest) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE roles
         SET name = $1, description = $2, is_active = $3, updated_at = NOW()
         WHERE id = $4",
    )
    .bind(&req.name)
    .bind(&req.description)
    .bind(req.is_active)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete(pool: &PgPool, id: i32) -> Result<bool> {
    let result = sqlx::query("DELETE FROM roles WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Create the role if it is not in the catalog yet. Registration assigns
/// roles by name, so the row must exist; ON CONFLICT keeps concurrent
/// registrations from racing each other.
pub async fn ensure_role(pool: &PgPool, name: &str) -> Result<()> {
    sqlx::query("INSERT INTO roles (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
        .bind(name)
        .execute(pool)
        .await?;

    Ok(())
}
