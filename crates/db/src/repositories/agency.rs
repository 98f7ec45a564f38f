use crate::models::DbAgency;
use chrono::Utc;
use eyre::Result;
use rendezvous_core::models::WorkingHours;
use sqlx::types::Json;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_agency(
    pool: &Pool<Postgres>,
    name: &str,
    address: &str,
    contact_info: Option<&str>,
    working_hours: &WorkingHours,
) -> Result<DbAgency> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!("Creating agency: id={}, name={}", id, name);

    let agency = sqlx::query_as::<_, DbAgency>(
        r#"
        INSERT INTO agencies (id, name, address, contact_info, working_hours, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, name, address, contact_info, working_hours, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(address)
    .bind(contact_info)
    .bind(Json(working_hours.rules().to_vec()))
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(agency)
}

pub async fn get_agency_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbAgency>> {
    let agency = sqlx::query_as::<_, DbAgency>(
        r#"
        SELECT id, name, address, contact_info, working_hours, created_at
        FROM agencies
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    if agency.is_none() {
        tracing::debug!("Agency not found: id={}", id);
    }

    Ok(agency)
}

/// Agencies ordered by name. `name` matches case-insensitively anywhere in the name.
pub async fn list_agencies(pool: &Pool<Postgres>, name: Option<&str>) -> Result<Vec<DbAgency>> {
    let agencies = sqlx::query_as::<_, DbAgency>(
        r#"
        SELECT id, name, address, contact_info, working_hours, created_at
        FROM agencies
        WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%')
        ORDER BY name ASC
        "#,
    )
    .bind(name)
    .fetch_all(pool)
    .await?;

    Ok(agencies)
}
