use aerobook_api::error::UNEXPECTED_ERROR_MESSAGE;
use aerobook_api::{app, AppState};
use aerobook_booking::mock::{InMemoryBookingRepository, MockSupplier};
use aerobook_core::supplier::SupplierError;
use aerobook_core::traveler::{PassengerPolicy, TravelerDefaults};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn test_app(supplier: MockSupplier) -> (Router, Arc<MockSupplier>) {
    let supplier = Arc::new(supplier);
    let state = AppState::new(
        supplier.clone(),
        Arc::new(InMemoryBookingRepository::new()),
        PassengerPolicy::ReusePrimary,
        TravelerDefaults::default(),
    );
    (app(state), supplier)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap()
}

fn offer(id: &str, departure_at: &str, total: &str) -> Value {
    json!({
        "type": "flight-offer",
        "id": id,
        "itineraries": [{ "segments": [{
            "departure": { "iataCode": "CGK", "at": departure_at },
            "arrival": { "iataCode": "DPS", "at": departure_at },
            "carrierCode": "GA",
            "number": "404"
        }] }],
        "price": { "currency": "IDR", "total": total },
        "travelerPricings": [{ "travelerId": "1", "travelerType": "ADULT" }]
    })
}

fn booking_body(offer: Value) -> String {
    json!({
        "flight_offer": offer,
        "traveler": {
            "fullName": "Budi Santoso",
            "passportNumber": "B1234567",
            "email": "budi@example.com",
            "gender": "MALE"
        }
    })
    .to_string()
}

#[tokio::test]
async fn test_search_requires_route_and_date() {
    let (app, supplier) = test_app(MockSupplier::new());

    let (status, body) = send(&app, get("/api/search-flights?origin=CGK&destination=DPS")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("departure date"));
    assert!(supplier.calls().is_empty());
}

#[tokio::test]
async fn test_search_returns_supplier_offers() {
    let offers = vec![offer("1", "2024-12-25T08:00:00", "1500000.00")];
    let (app, _) = test_app(MockSupplier::new().with_search_results(offers.clone()));

    let (status, body) = send(
        &app,
        get("/api/search-flights?origin=cgk&destination=dps&departureDate=2024-12-25&adults=2"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"], Value::Array(offers));
}

#[tokio::test]
async fn test_search_supplier_failure_is_reported_generically() {
    let (app, _) = test_app(MockSupplier::new().failing_search(SupplierError::Transport("timed out".to_string())));

    let (status, body) = send(
        &app,
        get("/api/search-flights?origin=CGK&destination=DPS&departureDate=2024-12-25"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Failed to search flights. Check the API quota or the route.");
}

#[tokio::test]
async fn test_search_rejects_non_numeric_adults() {
    let (app, _) = test_app(MockSupplier::new());

    let (status, body) = send(
        &app,
        get("/api/search-flights?origin=CGK&destination=DPS&departureDate=2024-12-25&adults=two"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid query string"));
}

#[tokio::test]
async fn test_booking_without_offer_is_rejected() {
    let (app, supplier) = test_app(MockSupplier::new());

    let (status, body) = send(&app, post_json("/api/book-amadeus", json!({ "traveler": {} }).to_string())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Flight or passenger data is incomplete.");
    assert!(supplier.calls().is_empty());
}

#[tokio::test]
async fn test_malformed_booking_body_is_rejected() {
    let (app, _) = test_app(MockSupplier::new());

    let (status, body) = send(&app, post_json("/api/book-amadeus", "{not json".to_string())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));
}

#[tokio::test]
async fn test_booking_is_confirmed_and_listed_in_history() {
    let (app, _) = test_app(MockSupplier::new().with_booking_code("K7XQ2P"));

    let (status, body) = send(
        &app,
        post_json("/api/book-amadeus", booking_body(offer("1", "2024-12-25T08:00:00", "1500000.00"))),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["booking_code"], "K7XQ2P");
    assert_eq!(body["message"], "One Way booking confirmed! Code: K7XQ2P");

    let (status, history) = send(&app, get("/api/booking-history")).await;
    assert_eq!(status, StatusCode::OK);

    let entry = &history[0];
    assert_eq!(entry["booking_code"], "K7XQ2P");
    assert_eq!(entry["airline"], "GA");
    assert_eq!(entry["origin"], "CGK");
    assert_eq!(entry["destination"], "DPS");
    assert_eq!(entry["departure_time"], "2024-12-25T08:00:00");
    assert_eq!(entry["price"], "1500000.00");
    assert_eq!(entry["currency"], "IDR");
    assert_eq!(entry["passenger_name"], "Budi Santoso");
    assert_eq!(entry["passport_number"], "B1234567");
    assert_eq!(entry["gender"], "MALE");
}

#[tokio::test]
async fn test_pricing_rejection_never_orders() {
    let (app, supplier) = test_app(
        MockSupplier::new().rejecting_pricing(400, json!({ "errors": [{ "detail": "No fare" }] })),
    );

    let (status, body) = send(
        &app,
        post_json("/api/book-amadeus", booking_body(offer("1", "2024-12-25T08:00:00", "1500000.00"))),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Fare has changed or the flight is unavailable. Please search again.");
    assert_eq!(supplier.order_calls(), 0);
}

#[tokio::test]
async fn test_token_failure_hides_cause() {
    let (app, _) = test_app(
        MockSupplier::new().failing_token(SupplierError::Transport("dns error: test.api.amadeus.com".to_string())),
    );

    let (status, body) = send(
        &app,
        post_json("/api/book-amadeus", booking_body(offer("1", "2024-12-25T08:00:00", "1500000.00"))),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], UNEXPECTED_ERROR_MESSAGE);
    assert!(!body.to_string().contains("dns"));
}

#[tokio::test]
async fn test_history_lists_newest_first() {
    let repository = Arc::new(InMemoryBookingRepository::new());
    let router_for = |code: &str| {
        app(AppState::new(
            Arc::new(MockSupplier::new().with_booking_code(code)),
            repository.clone(),
            PassengerPolicy::ReusePrimary,
            TravelerDefaults::default(),
        ))
    };

    for code in ["OLDER1", "NEWER1"] {
        let (status, _) = send(
            &router_for(code),
            post_json("/api/book-amadeus", booking_body(offer("1", "2024-12-26T08:00:00", "200.00"))),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, history) = send(&router_for("UNUSED"), get("/api/booking-history")).await;
    assert_eq!(status, StatusCode::OK);

    let codes: Vec<&str> = history
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["booking_code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["NEWER1", "OLDER1"]);
}
