use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::booking::TripType;

/// Supplier fields this service never inspects but must forward untouched.
pub type Extra = Map<String, Value>;

// ============================================================================
// Amadeus Flight Offer (typed view)
// ============================================================================

/// A flight offer as returned by the supplier's shopping API.
///
/// Only the parts the booking flow reads are typed. Everything else is kept in
/// `extra` at each level so the offer serializes back to an equivalent
/// document when it is sent for re-pricing or ordering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FlightOffer {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub itineraries: Vec<Itinerary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<OfferPrice>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub traveler_pricings: Vec<TravelerPricing>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Itinerary {
    #[serde(default)]
    pub segments: Vec<Segment>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub departure: FlightEndpoint,
    pub arrival: FlightEndpoint,
    pub carrier_code: String,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FlightEndpoint {
    pub iata_code: String,
    /// Local time at the airport, e.g. `2024-11-01T10:30:00`
    pub at: String,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OfferPrice {
    /// Decimal string, e.g. `"546.70"`
    pub total: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TravelerPricing {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traveler_id: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl FlightOffer {
    pub fn trip_type(&self) -> TripType {
        TripType::from_itinerary_count(self.itineraries.len())
    }

    /// Number of traveler slots the supplier priced.
    pub fn traveler_count(&self) -> usize {
        self.traveler_pricings.len()
    }

    /// First segment of the outbound itinerary.
    pub fn first_segment(&self) -> Option<&Segment> {
        self.itineraries.first()?.segments.first()
    }

    /// The destination the traveler perceives for this offer.
    ///
    /// Round trips report where the return leg departs from, which is the
    /// turnaround airport. One-way trips report the final arrival airport of
    /// the outbound itinerary.
    pub fn perceived_destination(&self) -> Option<&str> {
        match self.trip_type() {
            TripType::RoundTrip => self
                .itineraries
                .get(1)?
                .segments
                .first()
                .map(|s| s.departure.iata_code.as_str()),
            TripType::OneWay => self
                .itineraries
                .first()?
                .segments
                .last()
                .map(|s| s.arrival.iata_code.as_str()),
        }
    }
}
