use aerobook_core::offer::FlightOffer;
use aerobook_core::traveler::{PassengerDetails, PassengerPolicy, TravelerDefaults, TravelerPayload};
use tracing::{debug, warn};

use crate::error::{BookingError, Stage};

/// Build one supplier traveler per priced traveler slot.
///
/// Slot `i` uses passenger `i`. When the form supplied fewer passengers than
/// the fare covers, `ReusePrimary` fills the remaining slots with passenger 0
/// and `Strict` refuses the booking.
pub fn build_traveler_payloads(
    offer: &FlightOffer,
    passengers: &[PassengerDetails],
    defaults: &TravelerDefaults,
    policy: PassengerPolicy,
) -> Result<Vec<TravelerPayload>, BookingError> {
    let slots = offer.traveler_count();
    if slots == 0 {
        return Err(BookingError::malformed(Stage::Travelers, "priced offer has no traveler pricings"));
    }

    let primary = passengers
        .first()
        .ok_or_else(|| BookingError::Validation("traveler data contains no passengers".to_string()))?;

    if passengers.len() < slots {
        match policy {
            PassengerPolicy::Strict => {
                return Err(BookingError::Validation(format!(
                    "The fare covers {} travelers but only {} passenger(s) were provided.",
                    slots,
                    passengers.len()
                )));
            }
            PassengerPolicy::ReusePrimary => warn!(
                "Offer prices {} travelers but {} passenger(s) given; reusing the first passenger",
                slots,
                passengers.len()
            ),
        }
    } else if passengers.len() > slots {
        debug!("Ignoring {} passenger(s) beyond the priced slots", passengers.len() - slots);
    }

    Ok((0..slots)
        .map(|i| {
            let passenger = passengers.get(i).unwrap_or(primary);
            TravelerPayload::from_passenger(i + 1, passenger, defaults)
        })
        .collect())
}
