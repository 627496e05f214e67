pub mod error;
pub mod search;
pub mod travelers;
pub mod record;
pub mod orchestrator;
#[cfg(any(test, feature = "test-support"))]
pub mod mock;

pub use error::{BookingError, ErrorKind, SearchError, Stage};
pub use orchestrator::{BookingConfirmation, BookingOrchestrator};
pub use search::FlightSearchService;
