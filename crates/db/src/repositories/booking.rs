use crate::models::DbBooking;
use chrono::{NaiveDateTime, Utc};
use eyre::Result;
use rendezvous_core::models::{Booking, BookingFilter, BookingStatus, NewBooking};
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

const BOOKING_COLUMNS: &str = "id, title, agency_id, advisor_id, appointment_type_id, \
    start_time, end_time, customer_first_name, customer_last_name, customer_email, \
    customer_phone, status, notes, created_at, updated_at";

/// Result of a write that must not overlap another booking of the same advisor.
#[derive(Debug)]
pub enum SlotWrite {
    Saved(DbBooking),
    Overlaps,
}

// Serializes writers for one advisor until the transaction ends.
async fn lock_advisor(conn: &mut PgConnection, advisor_id: Uuid) -> Result<()> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1::text))")
        .bind(advisor_id.to_string())
        .execute(&mut *conn)
        .await?;
    Ok(())
}

async fn has_overlap(
    conn: &mut PgConnection,
    advisor_id: Uuid,
    start: NaiveDateTime,
    end: NaiveDateTime,
    excluding: Option<Uuid>,
) -> Result<bool> {
    let overlaps = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1
            FROM bookings
            WHERE advisor_id = $1
              AND status <> 'cancelled'
              AND start_time < $3
              AND $2 < end_time
              AND ($4::uuid IS NULL OR id <> $4)
        );
        "#,
    )
    .bind(advisor_id)
    .bind(start)
    .bind(end)
    .bind(excluding)
    .fetch_one(&mut *conn)
    .await?;

    Ok(overlaps)
}

pub async fn create_booking(pool: &Pool<Postgres>, booking: &NewBooking) -> Result<SlotWrite> {
    let mut tx = pool.begin().await?;
    lock_advisor(&mut tx, booking.advisor_id).await?;

    if has_overlap(
        &mut tx,
        booking.advisor_id,
        booking.range.start,
        booking.range.end,
        None,
    )
    .await?
    {
        tracing::debug!(
            "Refusing overlapping booking for advisor {} at {}",
            booking.advisor_id, booking.range.start
        );
        return Ok(SlotWrite::Overlaps);
    }

    let id = Uuid::new_v4();
    let now = Utc::now();
    let sql = format!(
        r#"
        INSERT INTO bookings (
            id, title, agency_id, advisor_id, appointment_type_id, start_time, end_time,
            customer_first_name, customer_last_name, customer_email, customer_phone,
            status, notes, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, NULL, $13, $13)
        RETURNING {}
        "#,
        BOOKING_COLUMNS
    );
    let saved = sqlx::query_as::<_, DbBooking>(&sql)
        .bind(id)
        .bind(&booking.title)
        .bind(booking.agency_id)
        .bind(booking.advisor_id)
        .bind(booking.appointment_type_id)
        .bind(booking.range.start)
        .bind(booking.range.end)
        .bind(&booking.customer.first_name)
        .bind(&booking.customer.last_name)
        .bind(&booking.customer.email)
        .bind(&booking.customer.phone)
        .bind(booking.status.as_str())
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

    tx.commit().await?;
    tracing::debug!("Booking created successfully: id={}", id);
    Ok(SlotWrite::Saved(saved))
}

/// Overwrites the mutable fields of `booking`. The caller checks that it exists.
pub async fn update_booking(pool: &Pool<Postgres>, booking: &Booking) -> Result<SlotWrite> {
    let mut tx = pool.begin().await?;
    lock_advisor(&mut tx, booking.advisor_id).await?;

    if booking.holds_slot()
        && has_overlap(
            &mut tx,
            booking.advisor_id,
            booking.start,
            booking.end,
            Some(booking.id),
        )
        .await?
    {
        return Ok(SlotWrite::Overlaps);
    }

    let sql = format!(
        r#"
        UPDATE bookings
        SET title = $2, start_time = $3, end_time = $4,
            customer_first_name = $5, customer_last_name = $6,
            customer_email = $7, customer_phone = $8,
            status = $9, notes = $10, updated_at = $11
        WHERE id = $1
        RETURNING {}
        "#,
        BOOKING_COLUMNS
    );
    let saved = sqlx::query_as::<_, DbBooking>(&sql)
        .bind(booking.id)
        .bind(&booking.title)
        .bind(booking.start)
        .bind(booking.end)
        .bind(&booking.customer.first_name)
        .bind(&booking.customer.last_name)
        .bind(&booking.customer.email)
        .bind(&booking.customer.phone)
        .bind(booking.status.as_str())
        .bind(&booking.notes)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(SlotWrite::Saved(saved))
}

pub async fn update_booking_status(
    pool: &Pool<Postgres>,
    id: Uuid,
    status: BookingStatus,
) -> Result<Option<DbBooking>> {
    let sql = format!(
        "UPDATE bookings SET status = $2, updated_at = $3 WHERE id = $1 RETURNING {}",
        BOOKING_COLUMNS
    );
    let booking = sqlx::query_as::<_, DbBooking>(&sql)
        .bind(id)
        .bind(status.as_str())
        .bind(Utc::now())
        .fetch_optional(pool)
        .await?;

    Ok(booking)
}

pub async fn get_booking_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbBooking>> {
    let sql = format!("SELECT {} FROM bookings WHERE id = $1", BOOKING_COLUMNS);
    let booking = sqlx::query_as::<_, DbBooking>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(booking)
}

pub async fn get_bookings_by_advisor(
    pool: &Pool<Postgres>,
    agency_id: Uuid,
    advisor_id: Uuid,
) -> Result<Vec<DbBooking>> {
    let sql = format!(
        "SELECT {} FROM bookings WHERE agency_id = $1 AND advisor_id = $2 ORDER BY start_time ASC",
        BOOKING_COLUMNS
    );
    let bookings = sqlx::query_as::<_, DbBooking>(&sql)
        .bind(agency_id)
        .bind(advisor_id)
        .fetch_all(pool)
        .await?;

    Ok(bookings)
}

pub async fn get_bookings_by_phone(pool: &Pool<Postgres>, phone: &str) -> Result<Vec<DbBooking>> {
    let sql = format!(
        "SELECT {} FROM bookings WHERE customer_phone = $1 ORDER BY created_at DESC",
        BOOKING_COLUMNS
    );
    let bookings = sqlx::query_as::<_, DbBooking>(&sql)
        .bind(phone)
        .fetch_all(pool)
        .await?;

    Ok(bookings)
}

/// Bookings matching every non-empty filter, ordered by title.
pub async fn list_bookings(
    pool: &Pool<Postgres>,
    filter: &BookingFilter,
) -> Result<Vec<DbBooking>> {
    let non_empty = |value: &Option<String>| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    let bookings = sqlx::query_as::<_, DbBooking>(
        r#"
        SELECT b.*
        FROM bookings b
        JOIN advisors a ON a.id = b.advisor_id
        WHERE ($1::text IS NULL OR b.title ILIKE '%' || $1 || '%')
          AND ($2::uuid IS NULL OR b.agency_id = $2)
          AND ($3::uuid IS NULL OR b.appointment_type_id = $3)
          AND ($4::text IS NULL OR a.name ILIKE '%' || $4 || '%')
        ORDER BY b.title ASC
        "#,
    )
    .bind(non_empty(&filter.title))
    .bind(filter.agency)
    .bind(filter.appointment_type)
    .bind(non_empty(&filter.adviser))
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}
