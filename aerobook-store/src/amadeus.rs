//! Amadeus Self-Service API client
//!
//! Implements [`FlightSupplier`] over the Amadeus REST endpoints. The client is
//! constructed from configuration and shared by reference; it holds no token
//! state, so every booking run authenticates again.

use aerobook_core::offer::FlightOffer;
use aerobook_core::pii::Masked;
use aerobook_core::search::{FlightSearchQuery, MAX_OFFERS};
use aerobook_core::supplier::{AccessToken, FlightSupplier, OrderConfirmation, SupplierError};
use aerobook_core::traveler::TravelerPayload;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::app_config::AmadeusConfig;

const TOKEN_PATH: &str = "/v1/security/oauth2/token";
const SEARCH_PATH: &str = "/v2/shopping/flight-offers";
const PRICING_PATH: &str = "/v1/shopping/flight-offers/pricing";
const ORDER_PATH: &str = "/v1/booking/flight-orders";

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PricingRequest<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    flight_offers: [&'a FlightOffer; 1],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PricedOffers {
    flight_offers: Vec<FlightOffer>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OrderRequest<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    flight_offers: [&'a FlightOffer; 1],
    travelers: &'a [TravelerPayload],
}

#[derive(Debug, Deserialize)]
struct CreatedOrder {
    id: String,
}

// ============================================================================
// Client
// ============================================================================

pub struct AmadeusClient {
    http_client: reqwest::Client,
    base_url: String,
    client_id: String,
    client_secret: Masked<String>,
}

impl AmadeusClient {
    pub fn new(config: &AmadeusConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(seconds) = config.request_timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }

        Ok(Self {
            http_client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client_id: config.client_id.clone(),
            client_secret: Masked(config.client_secret.clone()),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turn a non-success response into a `Rejected` error, keeping the body
    /// as JSON when it parses.
    async fn rejection(response: reqwest::Response) -> SupplierError {
        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
        SupplierError::Rejected { status, body }
    }
}

fn transport(e: reqwest::Error) -> SupplierError {
    SupplierError::Transport(e.to_string())
}

fn payload(e: reqwest::Error) -> SupplierError {
    SupplierError::Payload(e.to_string())
}

#[async_trait]
impl FlightSupplier for AmadeusClient {
    async fn search_offers(&self, query: &FlightSearchQuery) -> Result<Vec<Value>, SupplierError> {
        let token = self.access_token().await?;

        let mut params = vec![
            ("originLocationCode", query.origin.clone()),
            ("destinationLocationCode", query.destination.clone()),
            ("departureDate", query.departure_date.to_string()),
            ("adults", query.adults.to_string()),
            ("max", MAX_OFFERS.to_string()),
        ];
        if let Some(return_date) = query.return_date {
            params.push(("returnDate", return_date.to_string()));
        }

        let response = self
            .http_client
            .get(self.url(SEARCH_PATH))
            .bearer_auth(token.secret())
            .query(&params)
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        let offers: Envelope<Vec<Value>> = response.json().await.map_err(payload)?;
        debug!("Supplier returned {} offers", offers.data.len());
        Ok(offers.data)
    }

    async fn access_token(&self) -> Result<AccessToken, SupplierError> {
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.expose().as_str()),
        ];

        let response = self
            .http_client
            .post(self.url(TOKEN_PATH))
            .form(&form)
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        let token: TokenResponse = response.json().await.map_err(payload)?;
        let token = AccessToken::new(token.access_token);
        info!("Obtained supplier access token {:?}", token);
        Ok(token)
    }

    async fn price_offer(
        &self,
        token: &AccessToken,
        offer: &FlightOffer,
    ) -> Result<FlightOffer, SupplierError> {
        let body = Envelope {
            data: PricingRequest {
                kind: "flight-offers-pricing",
                flight_offers: [offer],
            },
        };

        let response = self
            .http_client
            .post(self.url(PRICING_PATH))
            .bearer_auth(token.secret())
            .json(&body)
            .send()
            .await
            .map_err(transport)?;

        info!("Pricing status: {}", response.status());
        if response.status() != StatusCode::OK {
            let err = Self::rejection(response).await;
            warn!("Pricing rejected: {}", err);
            return Err(err);
        }

        let priced: Envelope<PricedOffers> = response.json().await.map_err(payload)?;
        priced
            .data
            .flight_offers
            .into_iter()
            .next()
            .ok_or_else(|| SupplierError::Payload("pricing response contains no flight offer".to_string()))
    }

    async fn create_order(
        &self,
        token: &AccessToken,
        offer: &FlightOffer,
        travelers: &[TravelerPayload],
    ) -> Result<OrderConfirmation, SupplierError> {
        let body = Envelope {
            data: OrderRequest {
                kind: "flight-order",
                flight_offers: [offer],
                travelers,
            },
        };

        let response = self
            .http_client
            .post(self.url(ORDER_PATH))
            .bearer_auth(token.secret())
            .json(&body)
            .send()
            .await
            .map_err(transport)?;

        info!("Order status: {}", response.status());
        if !matches!(response.status(), StatusCode::OK | StatusCode::CREATED) {
            let err = Self::rejection(response).await;
            warn!("Order rejected: {}", err);
            return Err(err);
        }

        let order: Envelope<CreatedOrder> = response.json().await.map_err(payload)?;
        Ok(OrderConfirmation {
            booking_code: order.data.id,
        })
    }
}
