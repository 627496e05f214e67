use chrono::NaiveDate;
use serde::Deserialize;

use crate::{CoreError, CoreResult};

/// Upper bound on offers requested from the supplier per search.
pub const MAX_OFFERS: u32 = 10;

/// Raw query string of a search request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub departure_date: Option<String>,
    pub return_date: Option<String>,
    pub adults: Option<u32>,
}

/// A validated flight search. Presence of `return_date` makes it a round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightSearchQuery {
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub adults: u32,
}

impl FlightSearchQuery {
    pub fn is_round_trip(&self) -> bool {
        self.return_date.is_some()
    }
}

fn required(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_date(field: &str, value: &str) -> CoreResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        CoreError::ValidationError(format!("{} must be a date in YYYY-MM-DD format", field))
    })
}

impl TryFrom<SearchParams> for FlightSearchQuery {
    type Error = CoreError;

    fn try_from(params: SearchParams) -> CoreResult<Self> {
        let (Some(origin), Some(destination), Some(departure_date)) = (
            required(params.origin),
            required(params.destination),
            required(params.departure_date),
        ) else {
            return Err(CoreError::ValidationError(
                "Please provide origin, destination and departure date".to_string(),
            ));
        };

        let departure_date = parse_date("departureDate", &departure_date)?;
        let return_date = required(params.return_date)
            .map(|d| parse_date("returnDate", &d))
            .transpose()?;

        let adults = params.adults.unwrap_or(1);
        if adults == 0 {
            return Err(CoreError::ValidationError("adults must be at least 1".to_string()));
        }

        Ok(Self {
            origin: origin.to_uppercase(),
            destination: destination.to_uppercase(),
            departure_date,
            return_date,
            adults,
        })
    }
}
