use async_trait::async_trait;
use crate::booking::{Booking, NewBooking};

/// Repository trait for booking records
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Insert a confirmed booking. Fails if the booking code already exists.
    async fn create_booking(
        &self,
        booking: &NewBooking,
    ) -> Result<Booking, Box<dyn std::error::Error + Send + Sync>>;

    /// All bookings, newest first.
    async fn list_bookings(
        &self,
    ) -> Result<Vec<Booking>, Box<dyn std::error::Error + Send + Sync>>;
}
