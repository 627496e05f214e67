use aerobook_core::booking::{Booking, NewBooking};
use aerobook_core::repository::BookingRepository;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

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
    booking_code: String,
    airline: String,
    origin: String,
    destination: String,
    departure_time: NaiveDateTime,
    price_cents: i64,
    currency: String,
    passenger_name: String,
    passport_number: String,
    email: String,
    gender: String,
    created_at: DateTime<Utc>,
}

impl From<BookingRow> for Booking {
    fn from(row: BookingRow) -> Self {
        Booking {
            id: row.id,
            booking_code: row.booking_code,
            airline: row.airline,
            origin: row.origin,
            destination: row.destination,
            departure_time: row.departure_time,
            price_cents: row.price_cents,
            currency: row.currency,
            passenger_name: row.passenger_name,
            passport_number: row.passport_number,
            email: row.email,
            gender: row.gender,
            created_at: row.created_at,
        }
    }
}

const BOOKING_COLUMNS: &str = "id, booking_code, airline, origin, destination, departure_time, price_cents, currency, passenger_name, passport_number, email, gender, created_at";

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn create_booking(
        &self,
        booking: &NewBooking,
    ) -> Result<Booking, Box<dyn std::error::Error + Send + Sync>> {
        let sql = format!(
            r#"
            INSERT INTO bookings (id, booking_code, airline, origin, destination, departure_time, price_cents, currency, passenger_name, passport_number, email, gender, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {}
            "#,
            BOOKING_COLUMNS
        );

        let row: BookingRow = sqlx::query_as(&sql)
            .bind(Uuid::new_v4())
            .bind(&booking.booking_code)
            .bind(&booking.airline)
            .bind(&booking.origin)
            .bind(&booking.destination)
            .bind(booking.departure_time)
            .bind(booking.price_cents)
            .bind(&booking.currency)
            .bind(&booking.passenger_name)
            .bind(&booking.passport_number)
            .bind(&booking.email)
            .bind(&booking.gender)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| -> Box<dyn std::error::Error + Send + Sync> {
                let duplicate = e
                    .as_database_error()
                    .is_some_and(|db| db.is_unique_violation());
                if duplicate {
                    format!("booking code {} already recorded", booking.booking_code).into()
                } else {
                    Box::new(e)
                }
            })?;

        Ok(row.into())
    }

    async fn list_bookings(
        &self,
    ) -> Result<Vec<Booking>, Box<dyn std::error::Error + Send + Sync>> {
        let sql = format!("SELECT {} FROM bookings ORDER BY created_at DESC", BOOKING_COLUMNS);

        let rows: Vec<BookingRow> = sqlx::query_as(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Booking::from).collect())
    }
}
