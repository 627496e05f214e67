use async_trait::async_trait;
use serde_json::Value;

use crate::offer::FlightOffer;
use crate::pii::Masked;
use crate::search::FlightSearchQuery;
use crate::traveler::TravelerPayload;

/// Bearer token issued by the supplier for a single booking run.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessToken(pub Masked<String>);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Masked(token.into()))
    }

    pub fn secret(&self) -> &str {
        self.0.expose()
    }
}

/// Result of a successful order creation.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderConfirmation {
    /// Supplier booking reference (PNR equivalent)
    pub booking_code: String,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum SupplierError {
    /// The supplier answered with a non-success status.
    #[error("supplier rejected request with status {status}: {body}")]
    Rejected { status: u16, body: Value },
    #[error("supplier request failed: {0}")]
    Transport(String),
    #[error("unexpected supplier payload: {0}")]
    Payload(String),
}

/// Remote flight shopping and booking capability.
///
/// Calls are independent: nothing is cached between them, and the caller
/// obtains a fresh token for each booking run.
#[async_trait]
pub trait FlightSupplier: Send + Sync {
    /// Search flight offers; returns the supplier's offer documents untouched.
    async fn search_offers(&self, query: &FlightSearchQuery) -> Result<Vec<Value>, SupplierError>;

    /// Obtain a bearer token with the client-credentials grant.
    async fn access_token(&self) -> Result<AccessToken, SupplierError>;

    /// Confirm the fare of a previously returned offer.
    async fn price_offer(
        &self,
        token: &AccessToken,
        offer: &FlightOffer,
    ) -> Result<FlightOffer, SupplierError>;

    /// Create the order for a priced offer.
    async fn create_order(
        &self,
        token: &AccessToken,
        offer: &FlightOffer,
        travelers: &[TravelerPayload],
    ) -> Result<OrderConfirmation, SupplierError>;
}
