pub mod offer;
pub mod traveler;
pub mod booking;
pub mod search;
pub mod supplier;
pub mod repository;
pub mod pii;

pub use booking::{Booking, BookingRequest, NewBooking, TripType};
pub use offer::FlightOffer;
pub use search::FlightSearchQuery;
pub use supplier::{AccessToken, FlightSupplier, OrderConfirmation, SupplierError};
pub use traveler::{
    Gender, PassengerDetails, PassengerPolicy, TravelerDefaults, TravelerInput, TravelerPayload,
};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
