use aerobook_core::{CoreError, SupplierError};
use serde_json::Value;
use std::fmt;

pub const INCOMPLETE_REQUEST_MESSAGE: &str = "Flight or passenger data is incomplete.";
pub const PRICING_REJECTED_MESSAGE: &str =
    "Fare has changed or the flight is unavailable. Please search again.";
pub const SOLD_OUT_MESSAGE: &str = "Seats are sold out. Please choose another flight.";
pub const SEARCH_FAILED_MESSAGE: &str = "Failed to search flights. Check the API quota or the route.";

/// Marker the supplier puts in order errors when a seat can no longer be sold.
const SELL_FAILURE_MARKER: &str = "SEGMENT SELL FAILURE";

/// How a failure is reported to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or malformed input
    Validation,
    /// The supplier refused the search, the fare or the order
    ExternalApi,
    /// Anything else; details stay in the server log
    Unexpected,
}

/// Orchestration stage a booking failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validate,
    Authenticate,
    Pricing,
    Travelers,
    Order,
    Persist,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Validate => "validate",
            Stage::Authenticate => "authenticate",
            Stage::Pricing => "pricing",
            Stage::Travelers => "travelers",
            Stage::Order => "order",
            Stage::Persist => "persist",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("{0}")]
    Validation(String),
    #[error("{}", SEARCH_FAILED_MESSAGE)]
    Supplier(#[source] SupplierError),
}

impl SearchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SearchError::Validation(_) => ErrorKind::Validation,
            SearchError::Supplier(_) => ErrorKind::ExternalApi,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("{0}")]
    Validation(String),

    #[error("{}", PRICING_REJECTED_MESSAGE)]
    PricingRejected { status: u16 },

    #[error("{message}")]
    OrderRejected { status: u16, message: String },

    #[error("{stage} stage failed: {source}")]
    Supplier {
        stage: Stage,
        #[source]
        source: SupplierError,
    },

    #[error("{stage} stage received an unusable offer: {reason}")]
    MalformedOffer { stage: Stage, reason: String },

    #[error("order {booking_code} was created but could not be recorded: {source}")]
    Persistence {
        booking_code: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl BookingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BookingError::Validation(_) => ErrorKind::Validation,
            BookingError::PricingRejected { .. } | BookingError::OrderRejected { .. } => {
                ErrorKind::ExternalApi
            }
            BookingError::Supplier { .. }
            | BookingError::MalformedOffer { .. }
            | BookingError::Persistence { .. } => ErrorKind::Unexpected,
        }
    }

    pub fn stage(&self) -> Stage {
        match self {
            BookingError::Validation(_) => Stage::Validate,
            BookingError::PricingRejected { .. } => Stage::Pricing,
            BookingError::OrderRejected { .. } => Stage::Order,
            BookingError::Supplier { stage, .. } | BookingError::MalformedOffer { stage, .. } => *stage,
            BookingError::Persistence { .. } => Stage::Persist,
        }
    }

    pub(crate) fn malformed(stage: Stage, reason: impl Into<String>) -> Self {
        BookingError::MalformedOffer {
            stage,
            reason: reason.into(),
        }
    }
}

/// Message for a client-facing validation failure, without the error prefix.
pub(crate) fn validation_message(err: CoreError) -> String {
    match err {
        CoreError::ValidationError(message) => message,
        other => other.to_string(),
    }
}

/// Human-readable message for a rejected order.
///
/// Sell failures get a dedicated message. Otherwise the first structured
/// error detail is used, or the raw body when the error list is unusable.
pub fn order_failure_message(body: &Value) -> String {
    if body.to_string().contains(SELL_FAILURE_MARKER) {
        return SOLD_OUT_MESSAGE.to_string();
    }

    let detail = match body.get("errors") {
        None => match body {
            // Non-JSON response, e.g. a gateway error page
            Value::String(text) if !text.trim().is_empty() => text.trim().to_string(),
            _ => "Unknown error".to_string(),
        },
        Some(errors) => match errors.get(0).and_then(Value::as_object) {
            Some(first) => first
                .get("detail")
                .and_then(Value::as_str)
                .unwrap_or("Unknown error")
                .to_string(),
            None => body.to_string(),
        },
    };

    format!("Booking failed: {}", detail)
}
