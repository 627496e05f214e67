use aerobook_core::booking::{Booking, BookingRequest, TripType};
use aerobook_core::offer::FlightOffer;
use aerobook_core::repository::BookingRepository;
use aerobook_core::supplier::{AccessToken, FlightSupplier, OrderConfirmation, SupplierError};
use aerobook_core::traveler::{PassengerDetails, PassengerPolicy, TravelerDefaults, TravelerPayload};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::error::{order_failure_message, validation_message, BookingError, Stage, INCOMPLETE_REQUEST_MESSAGE};
use crate::record::booking_from_offer;
use crate::travelers::build_traveler_payloads;

/// Outcome of a successful booking run.
#[derive(Debug, Clone)]
pub struct BookingConfirmation {
    pub booking_code: String,
    pub trip_type: TripType,
    pub message: String,
    pub booking: Booking,
}

/// Books a previously searched offer against the supplier and records it.
///
/// Stages run strictly in order: validate, authenticate, re-price, build
/// travelers, create order, persist. The first failing stage ends the run.
/// Nothing already done upstream is undone; an order that fails to persist
/// stays booked with the supplier.
pub struct BookingOrchestrator {
    supplier: Arc<dyn FlightSupplier>,
    repository: Arc<dyn BookingRepository>,
    traveler_defaults: TravelerDefaults,
    passenger_policy: PassengerPolicy,
}

impl BookingOrchestrator {
    pub fn new(supplier: Arc<dyn FlightSupplier>, repository: Arc<dyn BookingRepository>) -> Self {
        Self {
            supplier,
            repository,
            traveler_defaults: TravelerDefaults::default(),
            passenger_policy: PassengerPolicy::default(),
        }
    }

    pub fn with_traveler_defaults(mut self, defaults: TravelerDefaults) -> Self {
        self.traveler_defaults = defaults;
        self
    }

    pub fn with_passenger_policy(mut self, policy: PassengerPolicy) -> Self {
        self.passenger_policy = policy;
        self
    }

    pub async fn book(&self, request: BookingRequest) -> Result<BookingConfirmation, BookingError> {
        let (offer, passengers) = validate(request)?;
        info!(
            "Booking request: {} passenger(s), {} itinerary(ies)",
            passengers.len(),
            offer.itineraries.len()
        );

        info!("[1/4] Authenticating with supplier");
        let token = self.authenticate().await?;

        info!("[2/4] Re-pricing offer");
        let priced = self.reprice(&token, &offer).await?;
        let trip_type = priced.trip_type();

        let travelers = build_traveler_payloads(
            &priced,
            &passengers,
            &self.traveler_defaults,
            self.passenger_policy,
        )?;

        info!("[3/4] Creating order for {} traveler(s)", travelers.len());
        let confirmation = self.create_order(&token, &priced, &travelers).await?;
        info!("Order confirmed, booking code {}", confirmation.booking_code);

        info!("[4/4] Recording booking");
        let booking = self.persist(&confirmation, &priced, &passengers[0]).await?;

        Ok(BookingConfirmation {
            message: format!("{} booking confirmed! Code: {}", trip_type, booking.booking_code),
            booking_code: booking.booking_code.clone(),
            trip_type,
            booking,
        })
    }

    async fn authenticate(&self) -> Result<AccessToken, BookingError> {
        self.supplier.access_token().await.map_err(|source| BookingError::Supplier {
            stage: Stage::Authenticate,
            source,
        })
    }

    /// The supplier's revalidated offer replaces the submitted one from here on.
    async fn reprice(&self, token: &AccessToken, offer: &FlightOffer) -> Result<FlightOffer, BookingError> {
        match self.supplier.price_offer(token, offer).await {
            Ok(priced) => Ok(priced),
            Err(SupplierError::Rejected { status, body }) => {
                warn!("Pricing rejected with status {}: {}", status, body);
                Err(BookingError::PricingRejected { status })
            }
            Err(source) => Err(BookingError::Supplier {
                stage: Stage::Pricing,
                source,
            }),
        }
    }

    async fn create_order(
        &self,
        token: &AccessToken,
        offer: &FlightOffer,
        travelers: &[TravelerPayload],
    ) -> Result<OrderConfirmation, BookingError> {
        match self.supplier.create_order(token, offer, travelers).await {
            Ok(confirmation) => Ok(confirmation),
            Err(SupplierError::Rejected { status, body }) => {
                warn!("Order rejected with status {}: {}", status, body);
                Err(BookingError::OrderRejected {
                    status,
                    message: order_failure_message(&body),
                })
            }
            Err(source) => Err(BookingError::Supplier {
                stage: Stage::Order,
                source,
            }),
        }
    }

    async fn persist(
        &self,
        confirmation: &OrderConfirmation,
        offer: &FlightOffer,
        primary: &PassengerDetails,
    ) -> Result<Booking, BookingError> {
        let record = booking_from_offer(&confirmation.booking_code, offer, primary).map_err(|e| {
            error!("Order {} is booked upstream but cannot be summarized: {}", confirmation.booking_code, e);
            e
        })?;

        self.repository.create_booking(&record).await.map_err(|source| {
            error!("Order {} is booked upstream but was not recorded: {}", confirmation.booking_code, source);
            BookingError::Persistence {
                booking_code: confirmation.booking_code.clone(),
                source,
            }
        })
    }
}

fn validate(request: BookingRequest) -> Result<(FlightOffer, Vec<PassengerDetails>), BookingError> {
    let (Some(offer), Some(traveler)) = (request.flight_offer, request.traveler) else {
        return Err(BookingError::Validation(INCOMPLETE_REQUEST_MESSAGE.to_string()));
    };

    if offer.itineraries.is_empty() {
        return Err(BookingError::Validation(INCOMPLETE_REQUEST_MESSAGE.to_string()));
    }

    let passengers = traveler
        .normalize()
        .map_err(|e| BookingError::Validation(validation_message(e)))?;

    Ok((offer, passengers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, PRICING_REJECTED_MESSAGE, SOLD_OUT_MESSAGE};
    use crate::mock::{InMemoryBookingRepository, MockSupplier, SupplierCall};
    use serde_json::{json, Value};

    fn segment(from: &str, to: &str, at: &str) -> Value {
        json!({
            "departure": { "iataCode": from, "at": at },
            "arrival": { "iataCode": to, "at": at },
            "carrierCode": "GA",
            "number": "400"
        })
    }

    fn one_way_offer(travelers: usize) -> Value {
        let pricings: Vec<Value> = (1..=travelers)
            .map(|i| json!({ "travelerId": i.to_string(), "travelerType": "ADULT" }))
            .collect();
        json!({
            "type": "flight-offer",
            "id": "1",
            "itineraries": [{ "segments": [
                segment("CGK", "SUB", "2024-12-20T07:00:00"),
                segment("SUB", "DPS", "2024-12-20T10:00:00")
            ] }],
            "price": { "currency": "IDR", "total": "1850000.00" },
            "travelerPricings": pricings
        })
    }

    fn round_trip_offer() -> Value {
        json!({
            "type": "flight-offer",
            "id": "2",
            "itineraries": [
                { "segments": [segment("CGK", "SIN", "2024-12-20T07:00:00"), segment("SIN", "NRT", "2024-12-20T15:00:00")] },
                { "segments": [segment("HND", "SIN", "2024-12-27T09:00:00"), segment("SIN", "CGK", "2024-12-27T18:00:00")] }
            ],
            "price": { "currency": "USD", "total": "980.10" },
            "travelerPricings": [{ "travelerId": "1" }]
        })
    }

    fn request(offer: Value, traveler: Value) -> BookingRequest {
        serde_json::from_value(json!({ "flight_offer": offer, "traveler": traveler })).unwrap()
    }

    fn jane() -> Value {
        json!({ "fullName": "Jane Mary Doe", "passportNumber": "P1", "email": "jane@example.com", "gender": "FEMALE" })
    }

    fn orchestrator(
        supplier: MockSupplier,
        repository: InMemoryBookingRepository,
    ) -> (BookingOrchestrator, Arc<MockSupplier>, Arc<InMemoryBookingRepository>) {
        let supplier = Arc::new(supplier);
        let repository = Arc::new(repository);
        (
            BookingOrchestrator::new(supplier.clone(), repository.clone()),
            supplier,
            repository,
        )
    }

    #[tokio::test]
    async fn test_one_way_booking_succeeds() {
        let (orchestrator, supplier, repository) =
            orchestrator(MockSupplier::new().with_booking_code("PNR001"), InMemoryBookingRepository::new());

        let confirmation = orchestrator.book(request(one_way_offer(1), jane())).await.unwrap();

        assert_eq!(confirmation.booking_code, "PNR001");
        assert_eq!(confirmation.trip_type, TripType::OneWay);
        assert_eq!(confirmation.message, "One Way booking confirmed! Code: PNR001");
        assert_eq!(confirmation.booking.destination, "DPS");
        assert_eq!(confirmation.booking.price_cents, 185000000);
        assert_eq!(repository.len(), 1);

        let calls = supplier.calls();
        assert!(matches!(
            &calls[..],
            [SupplierCall::Token, SupplierCall::Pricing(_), SupplierCall::Order { .. }]
        ));
    }

    #[tokio::test]
    async fn test_round_trip_booking_records_turnaround_destination() {
        let (orchestrator, _, repository) =
            orchestrator(MockSupplier::new().with_booking_code("PNR002"), InMemoryBookingRepository::new());

        let confirmation = orchestrator.book(request(round_trip_offer(), jane())).await.unwrap();

        assert_eq!(confirmation.message, "Round Trip booking confirmed! Code: PNR002");
        assert_eq!(confirmation.booking.origin, "CGK");
        assert_eq!(confirmation.booking.destination, "HND");

        let stored = repository.list_bookings().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].booking_code, "PNR002");
        assert_eq!(stored[0].passenger_name, "Jane Mary Doe");
    }

    #[tokio::test]
    async fn test_revalidated_offer_supersedes_submitted_one() {
        let mut repriced: FlightOffer = serde_json::from_value(one_way_offer(2)).unwrap();
        repriced.price.as_mut().unwrap().total = "2000000.00".to_string();
        let (orchestrator, supplier, _) = orchestrator(
            MockSupplier::new().with_priced_offer(repriced.clone()),
            InMemoryBookingRepository::new(),
        );

        let confirmation = orchestrator.book(request(one_way_offer(1), jane())).await.unwrap();
        assert_eq!(confirmation.booking.price_cents, 200000000);

        let calls = supplier.calls();
        let Some(SupplierCall::Order { offer, travelers }) = calls.last() else {
            panic!("no order call");
        };
        assert_eq!(offer, &repriced);
        // Slots follow the revalidated offer, the second reusing passenger one.
        assert_eq!(travelers.len(), 2);
        assert_eq!(travelers[1].name.first_name, "JANE");
    }

    #[tokio::test]
    async fn test_pricing_rejection_stops_before_order() {
        let (orchestrator, supplier, repository) = orchestrator(
            MockSupplier::new().rejecting_pricing(400, json!({ "errors": [{ "detail": "NO FARE" }] })),
            InMemoryBookingRepository::new(),
        );

        let err = orchestrator.book(request(one_way_offer(1), jane())).await.unwrap_err();

        assert!(matches!(err, BookingError::PricingRejected { status: 400 }));
        assert_eq!(err.kind(), ErrorKind::ExternalApi);
        assert_eq!(err.to_string(), PRICING_REJECTED_MESSAGE);
        assert_eq!(supplier.order_calls(), 0);
        assert!(repository.is_empty());
    }

    #[tokio::test]
    async fn test_sell_failure_maps_to_sold_out_message() {
        let (orchestrator, _, repository) = orchestrator(
            MockSupplier::new().rejecting_order(
                400,
                json!({ "errors": [{ "code": 34651, "title": "SEGMENT SELL FAILURE", "detail": "Could not sell segment 1" }] }),
            ),
            InMemoryBookingRepository::new(),
        );

        let err = orchestrator.book(request(one_way_offer(1), jane())).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ExternalApi);
        assert_eq!(err.to_string(), SOLD_OUT_MESSAGE);
        assert!(repository.is_empty());
    }

    #[tokio::test]
    async fn test_generic_order_failure_uses_detail() {
        let (orchestrator, _, _) = orchestrator(
            MockSupplier::new().rejecting_order(400, json!({ "errors": [{ "detail": "INVALID DATA RECEIVED" }] })),
            InMemoryBookingRepository::new(),
        );

        let err = orchestrator.book(request(one_way_offer(1), jane())).await.unwrap_err();
        assert_eq!(err.to_string(), "Booking failed: INVALID DATA RECEIVED");
    }

    #[tokio::test]
    async fn test_missing_parts_are_validation_errors() {
        let (orchestrator, supplier, _) = orchestrator(MockSupplier::new(), InMemoryBookingRepository::new());

        for req in [
            BookingRequest::default(),
            request(Value::Null, jane()),
            request(one_way_offer(1), Value::Null),
            request(one_way_offer(1), json!({})),
        ] {
            let err = orchestrator.book(req).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }
        assert!(supplier.calls().is_empty());
    }

    #[tokio::test]
    async fn test_token_failure_is_unexpected() {
        let (orchestrator, supplier, _) = orchestrator(
            MockSupplier::new().failing_token(SupplierError::Transport("connection refused".into())),
            InMemoryBookingRepository::new(),
        );

        let err = orchestrator.book(request(one_way_offer(1), jane())).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unexpected);
        assert_eq!(err.stage(), Stage::Authenticate);
        assert_eq!(supplier.calls(), vec![SupplierCall::Token]);
    }

    #[tokio::test]
    async fn test_persistence_failure_keeps_booking_code_in_error() {
        let (orchestrator, supplier, _) = orchestrator(
            MockSupplier::new().with_booking_code("PNR404"),
            InMemoryBookingRepository::failing(),
        );

        let err = orchestrator.book(request(one_way_offer(1), jane())).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unexpected);
        assert!(matches!(err, BookingError::Persistence { ref booking_code, .. } if booking_code == "PNR404"));
        assert_eq!(supplier.order_calls(), 1);
    }

    #[tokio::test]
    async fn test_strict_policy_rejects_before_order() {
        let supplier = Arc::new(MockSupplier::new());
        let orchestrator = BookingOrchestrator::new(supplier.clone(), Arc::new(InMemoryBookingRepository::new()))
            .with_passenger_policy(PassengerPolicy::Strict);

        let err = orchestrator.book(request(one_way_offer(3), jane())).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(supplier.order_calls(), 0);
    }
}
