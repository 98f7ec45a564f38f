use crate::models::DbAppointmentType;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_appointment_type(
    pool: &Pool<Postgres>,
    name: &str,
) -> Result<DbAppointmentType> {
    let appointment_type = sqlx::query_as::<_, DbAppointmentType>(
        r#"
        INSERT INTO appointment_types (id, name)
        VALUES ($1, $2)
        RETURNING id, name
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .fetch_one(pool)
    .await?;

    Ok(appointment_type)
}

pub async fn get_appointment_type_by_id(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbAppointmentType>> {
    let appointment_type = sqlx::query_as::<_, DbAppointmentType>(
        "SELECT id, name FROM appointment_types WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(appointment_type)
}

pub async fn list_appointment_types(pool: &Pool<Postgres>) -> Result<Vec<DbAppointmentType>> {
    let appointment_types = sqlx::query_as::<_, DbAppointmentType>(
        "SELECT id, name FROM appointment_types ORDER BY name ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(appointment_types)
}
