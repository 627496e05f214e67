use aerobook_core::booking::{parse_departure_time, parse_minor_units, NewBooking};
use aerobook_core::offer::FlightOffer;
use aerobook_core::traveler::PassengerDetails;

use crate::error::{BookingError, Stage};

/// Summarize a confirmed order into the local booking record.
///
/// Route and carrier come from the first segment of the priced offer; the
/// destination is the one the traveler perceives (see
/// [`FlightOffer::perceived_destination`]). Only the primary passenger is kept.
pub fn booking_from_offer(
    booking_code: &str,
    offer: &FlightOffer,
    primary: &PassengerDetails,
) -> Result<NewBooking, BookingError> {
    let outbound = offer
        .first_segment()
        .ok_or_else(|| BookingError::malformed(Stage::Persist, "offer has no outbound segment"))?;
    let destination = offer
        .perceived_destination()
        .ok_or_else(|| BookingError::malformed(Stage::Persist, "offer has no destination segment"))?;
    let price = offer
        .price
        .as_ref()
        .ok_or_else(|| BookingError::malformed(Stage::Persist, "offer has no price"))?;

    let price_cents = parse_minor_units(&price.total)
        .map_err(|e| BookingError::malformed(Stage::Persist, e.to_string()))?;
    let departure_time = parse_departure_time(&outbound.departure.at)
        .map_err(|e| BookingError::malformed(Stage::Persist, e.to_string()))?;

    Ok(NewBooking {
        booking_code: booking_code.to_string(),
        airline: outbound.carrier_code.clone(),
        origin: outbound.departure.iata_code.clone(),
        destination: destination.to_string(),
        departure_time,
        price_cents,
        currency: price.currency.clone().unwrap_or_default(),
        passenger_name: primary.full_name.clone(),
        passport_number: primary.passport_number.expose().clone(),
        email: primary.email.clone(),
        gender: primary.gender.as_str().to_string(),
    })
}
