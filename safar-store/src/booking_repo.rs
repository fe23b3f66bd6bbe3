use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use safar_core::booking::{Booking, BookingStatus};
use safar_core::repository::{BookingRepository, RepoError};

pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    guide_id: Uuid,
    tourist_id: Uuid,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    party_size: i32,
    notes: Option<String>,
    itinerary_id: Option<String>,
    status: String,
    total_cost: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = RepoError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let status = BookingStatus::parse(&row.status)
            .ok_or_else(|| format!("Unknown booking status in store: {}", row.status))?;
        Ok(Booking {
            id: row.id,
            guide_id: row.guide_id,
            tourist_id: row.tourist_id,
            start_date: row.start_date,
            end_date: row.end_date,
            party_size: row.party_size,
            notes: row.notes,
            itinerary_id: row.itinerary_id,
            status,
            total_cost: row.total_cost,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const BOOKING_COLUMNS: &str = "id, guide_id, tourist_id, start_date, end_date, party_size, \
     notes, itinerary_id, status, total_cost, created_at, updated_at";

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn create(&self, booking: &Booking) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO bookings (id, guide_id, tourist_id, start_date, end_date, party_size,
                notes, itinerary_id, status, total_cost, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(booking.id)
        .bind(booking.guide_id)
        .bind(booking.tourist_id)
        .bind(booking.start_date)
        .bind(booking.end_date)
        .bind(booking.party_size)
        .bind(&booking.notes)
        .bind(&booking.itinerary_id)
        .bind(booking.status.as_str())
        .bind(booking.total_cost)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, RepoError> {
        let row: Option<BookingRow> = sqlx::query_as(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Booking::try_from).transpose()
    }

    async fn list_by_guide(
        &self,
        guide_id: Uuid,
        status: Option<BookingStatus>,
    ) -> Result<Vec<Booking>, RepoError> {
        let rows: Vec<BookingRow> = sqlx::query_as(&format!(
            r#"
            SELECT {BOOKING_COLUMNS} FROM bookings
            WHERE guide_id = $1 AND ($2::text IS NULL OR status = $2)
            ORDER BY created_at DESC
            "#
        ))
        .bind(guide_id)
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Booking::try_from).collect()
    }

    async fn list_by_tourist(
        &self,
        tourist_id: Uuid,
        status: Option<BookingStatus>,
    ) -> Result<Vec<Booking>, RepoError> {
        let rows: Vec<BookingRow> = sqlx::query_as(&format!(
            r#"
            SELECT {BOOKING_COLUMNS} FROM bookings
            WHERE tourist_id = $1 AND ($2::text IS NULL OR status = $2)
            ORDER BY created_at DESC
            "#
        ))
        .bind(tourist_id)
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Booking::try_from).collect()
    }

    async fn set_status(
        &self,
        id: Uuid,
        from: BookingStatus,
        to: BookingStatus,
    ) -> Result<Option<Booking>, RepoError> {
        // Compare-and-swap keyed on the status the caller observed; a
        // concurrent transition makes this a no-op.
        let row: Option<BookingRow> = sqlx::query_as(&format!(
            r#"
            UPDATE bookings SET status = $3, updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(from.as_str())
        .bind(to.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Booking::try_from).transpose()
    }
}
