//! Database queries for the filament catalog

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::Filament;

/// Get the active filament catalog, ordered by name
pub async fn list_filaments(pool: &PgPool) -> Result<Vec<Filament>> {
    let filaments = sqlx::query_as::<_, Filament>(
        r#"
        SELECT id, name, color, cost_per_cm3, active, deleted_at
        FROM filaments
        WHERE active = true
          AND deleted_at IS NULL
        ORDER BY name, color
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(filaments)
}

/// Get a single active filament by id
pub async fn get_filament(pool: &PgPool, id: Uuid) -> Result<Option<Filament>> {
    let filament = sqlx::query_as::<_, Filament>(
        r#"
        SELECT id, name, color, cost_per_cm3, active, deleted_at
        FROM filaments
        WHERE id = $1
          AND active = true
          AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(filament)
}
