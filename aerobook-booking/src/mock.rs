//! In-memory stand-ins for the supplier and the booking store.

use aerobook_core::booking::{Booking, NewBooking};
use aerobook_core::offer::FlightOffer;
use aerobook_core::repository::BookingRepository;
use aerobook_core::search::FlightSearchQuery;
use aerobook_core::supplier::{AccessToken, FlightSupplier, OrderConfirmation, SupplierError};
use aerobook_core::traveler::TravelerPayload;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::sync::Mutex;
use uuid::Uuid;

/// A call received by [`MockSupplier`].
#[derive(Debug, Clone, PartialEq)]
pub enum SupplierCall {
    Search(FlightSearchQuery),
    Token,
    Pricing(FlightOffer),
    Order {
        offer: FlightOffer,
        travelers: Vec<TravelerPayload>,
    },
}

/// Scripted supplier. Succeeds by default: pricing echoes the submitted offer
/// and orders are confirmed as `MOCKPNR`.
pub struct MockSupplier {
    search: Result<Vec<Value>, SupplierError>,
    token: Result<AccessToken, SupplierError>,
    pricing: Option<Result<FlightOffer, SupplierError>>,
    order: Result<OrderConfirmation, SupplierError>,
    calls: Mutex<Vec<SupplierCall>>,
}

impl MockSupplier {
    pub fn new() -> Self {
        Self {
            search: Ok(Vec::new()),
            token: Ok(AccessToken::new("mock-token")),
            pricing: None,
            order: Ok(OrderConfirmation {
                booking_code: "MOCKPNR".to_string(),
            }),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_search_results(mut self, offers: Vec<Value>) -> Self {
        self.search = Ok(offers);
        self
    }

    pub fn failing_search(mut self, err: SupplierError) -> Self {
        self.search = Err(err);
        self
    }

    pub fn failing_token(mut self, err: SupplierError) -> Self {
        self.token = Err(err);
        self
    }

    /// Answer pricing with this offer instead of echoing the submitted one.
    pub fn with_priced_offer(mut self, offer: FlightOffer) -> Self {
        self.pricing = Some(Ok(offer));
        self
    }

    pub fn rejecting_pricing(mut self, status: u16, body: Value) -> Self {
        self.pricing = Some(Err(SupplierError::Rejected { status, body }));
        self
    }

    pub fn with_booking_code(mut self, code: &str) -> Self {
        self.order = Ok(OrderConfirmation {
            booking_code: code.to_string(),
        });
        self
    }

    pub fn rejecting_order(mut self, status: u16, body: Value) -> Self {
        self.order = Err(SupplierError::Rejected { status, body });
        self
    }

    pub fn calls(&self) -> Vec<SupplierCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn order_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, SupplierCall::Order { .. }))
            .count()
    }

    fn record(&self, call: SupplierCall) {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).push(call);
    }
}

impl Default for MockSupplier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FlightSupplier for MockSupplier {
    async fn search_offers(&self, query: &FlightSearchQuery) -> Result<Vec<Value>, SupplierError> {
        self.record(SupplierCall::Search(query.clone()));
        self.search.clone()
    }

    async fn access_token(&self) -> Result<AccessToken, SupplierError> {
        self.record(SupplierCall::Token);
        self.token.clone()
    }

    async fn price_offer(
        &self,
        _token: &AccessToken,
        offer: &FlightOffer,
    ) -> Result<FlightOffer, SupplierError> {
        self.record(SupplierCall::Pricing(offer.clone()));
        match &self.pricing {
            Some(outcome) => outcome.clone(),
            None => Ok(offer.clone()),
        }
    }

    async fn create_order(
        &self,
        _token: &AccessToken,
        offer: &FlightOffer,
        travelers: &[TravelerPayload],
    ) -> Result<OrderConfirmation, SupplierError> {
        self.record(SupplierCall::Order {
            offer: offer.clone(),
            travelers: travelers.to_vec(),
        });
        self.order.clone()
    }
}

/// Booking store kept in a vector. Enforces unique booking codes.
#[derive(Default)]
pub struct InMemoryBookingRepository {
    bookings: Mutex<Vec<Booking>>,
    fail_writes: bool,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every insert fails, as if the database were down.
    pub fn failing() -> Self {
        Self {
            bookings: Mutex::new(Vec::new()),
            fail_writes: true,
        }
    }

    pub fn len(&self) -> usize {
        self.bookings.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn create_booking(
        &self,
        booking: &NewBooking,
    ) -> Result<Booking, Box<dyn std::error::Error + Send + Sync>> {
        if self.fail_writes {
            return Err("connection refused".into());
        }

        let mut bookings = self.bookings.lock().unwrap_or_else(|e| e.into_inner());
        if bookings.iter().any(|b| b.booking_code == booking.booking_code) {
            return Err(format!("booking code {} already recorded", booking.booking_code).into());
        }

        let record = Booking {
            id: Uuid::new_v4(),
            booking_code: booking.booking_code.clone(),
            airline: booking.airline.clone(),
            origin: booking.origin.clone(),
            destination: booking.destination.clone(),
            departure_time: booking.departure_time,
            price_cents: booking.price_cents,
            currency: booking.currency.clone(),
            passenger_name: booking.passenger_name.clone(),
            passport_number: booking.passport_number.clone(),
            email: booking.email.clone(),
            gender: booking.gender.clone(),
            created_at: Utc::now(),
        };
        bookings.push(record.clone());
        Ok(record)
    }

    async fn list_bookings(
        &self,
    ) -> Result<Vec<Booking>, Box<dyn std::error::Error + Send + Sync>> {
        let mut bookings = self.bookings.lock().unwrap_or_else(|e| e.into_inner()).clone();
        // Newest insert first among equal timestamps.
        bookings.reverse();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookings)
    }
}
