use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::offer::FlightOffer;
use crate::traveler::TravelerInput;
use crate::{CoreError, CoreResult};

/// Body of a booking request. Both parts are optional on the wire so their
/// absence is reported as a validation failure instead of a decode failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingRequest {
    pub flight_offer: Option<FlightOffer>,
    pub traveler: Option<TravelerInput>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TripType {
    OneWay,
    RoundTrip,
}

impl TripType {
    /// Exactly two itineraries is a round trip; anything else is booked as one-way.
    pub fn from_itinerary_count(count: usize) -> Self {
        if count == 2 {
            TripType::RoundTrip
        } else {
            TripType::OneWay
        }
    }
}

impl fmt::Display for TripType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TripType::OneWay => write!(f, "One Way"),
            TripType::RoundTrip => write!(f, "Round Trip"),
        }
    }
}

/// A confirmed booking as stored locally.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    pub id: Uuid,
    pub booking_code: String,
    pub airline: String,
    pub origin: String,
    pub destination: String,
    pub departure_time: NaiveDateTime,
    /// Offer total in minor units (two decimal places)
    pub price_cents: i64,
    pub currency: String,
    pub passenger_name: String,
    pub passport_number: String,
    pub email: String,
    pub gender: String,
    pub created_at: DateTime<Utc>,
}

/// Everything needed to insert a booking; the store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub booking_code: String,
    pub airline: String,
    pub origin: String,
    pub destination: String,
    pub departure_time: NaiveDateTime,
    pub price_cents: i64,
    pub currency: String,
    pub passenger_name: String,
    pub passport_number: String,
    pub email: String,
    pub gender: String,
}

// ============================================================================
// Money & Time Helpers
// ============================================================================

/// Parse a decimal amount such as `"546.7"` or `"1520000.00"` into minor units.
///
/// Amounts with more than two decimals (KWD, BHD, OMR totals) are rounded
/// half-up to the nearest cent.
pub fn parse_minor_units(amount: &str) -> CoreResult<i64> {
    let invalid = || CoreError::InvalidAmount(amount.to_string());
    let trimmed = amount.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let (cents_part, excess) = fraction.split_at(fraction.len().min(2));
    let round_up = excess.bytes().next().is_some_and(|b| b >= b'5');

    let whole: i64 = whole.parse().map_err(|_| invalid())?;
    let cents: i64 = format!("{:0<2}", cents_part).parse().map_err(|_| invalid())?;
    let total = whole
        .checked_mul(100)
        .and_then(|v| v.checked_add(cents))
        .and_then(|v| v.checked_add(i64::from(round_up)))
        .ok_or_else(invalid)?;

    Ok(if negative { -total } else { total })
}

/// Render minor units back as a two-decimal string.
pub fn format_minor_units(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

/// Parse a supplier timestamp. Amadeus sends local airport time without an
/// offset; an RFC 3339 value is reduced to its local wall-clock time.
pub fn parse_departure_time(at: &str) -> CoreResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(at, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(at, "%Y-%m-%dT%H:%M"))
        .or_else(|_| DateTime::parse_from_rfc3339(at).map(|dt| dt.naive_local()))
        .map_err(|_| CoreError::ValidationError(format!("invalid departure time: {}", at)))
}
