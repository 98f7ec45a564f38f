use crate::models::DbAdvisor;
use chrono::Utc;
use eyre::Result;
use rendezvous_core::models::WorkingHours;
use sqlx::types::Json;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_advisor(
    pool: &Pool<Postgres>,
    name: &str,
    email: &str,
    agency_id: Uuid,
    active: bool,
    working_hours: &WorkingHours,
) -> Result<DbAdvisor> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating advisor: id={}, name={}, agency_id={}, active={}",
        id, name, agency_id, active
    );

    let advisor = sqlx::query_as::<_, DbAdvisor>(
        r#"
        INSERT INTO advisors (id, name, email, agency_id, active, working_hours, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, name, email, agency_id, active, working_hours, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(email)
    .bind(agency_id)
    .bind(active)
    .bind(Json(working_hours.rules().to_vec()))
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(advisor)
}

pub async fn get_advisor_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbAdvisor>> {
    let advisor = sqlx::query_as::<_, DbAdvisor>(
        r#"
        SELECT id, name, email, agency_id, active, working_hours, created_at
        FROM advisors
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(advisor)
}

pub async fn get_active_advisors_by_agency(
    pool: &Pool<Postgres>,
    agency_id: Uuid,
) -> Result<Vec<DbAdvisor>> {
    let advisors = sqlx::query_as::<_, DbAdvisor>(
        r#"
        SELECT id, name, email, agency_id, active, working_hours, created_at
        FROM advisors
        WHERE agency_id = $1 AND active
        ORDER BY name ASC
        "#,
    )
    .bind(agency_id)
    .fetch_all(pool)
    .await?;

    Ok(advisors)
}
