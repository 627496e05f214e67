use std::sync::Arc;
use aerobook_booking::{BookingOrchestrator, FlightSearchService};
use aerobook_core::repository::BookingRepository;
use aerobook_core::supplier::FlightSupplier;
use aerobook_core::traveler::{PassengerPolicy, TravelerDefaults};

#[derive(Clone)]
pub struct AppState {
    pub search: Arc<FlightSearchService>,
    pub orchestrator: Arc<BookingOrchestrator>,
    pub bookings: Arc<dyn BookingRepository>,
}

impl AppState {
    /// Wire the services around one supplier client and one booking store.
    pub fn new(
        supplier: Arc<dyn FlightSupplier>,
        bookings: Arc<dyn BookingRepository>,
        passenger_policy: PassengerPolicy,
        traveler_defaults: TravelerDefaults,
    ) -> Self {
        let orchestrator = BookingOrchestrator::new(supplier.clone(), bookings.clone())
            .with_passenger_policy(passenger_policy)
            .with_traveler_defaults(traveler_defaults);

        Self {
            search: Arc::new(FlightSearchService::new(supplier)),
            orchestrator: Arc::new(orchestrator),
            bookings,
        }
    }
}
