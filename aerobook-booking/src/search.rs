use aerobook_core::search::{FlightSearchQuery, SearchParams, MAX_OFFERS};
use aerobook_core::supplier::FlightSupplier;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

use crate::error::{validation_message, SearchError};

/// Flight search over the supplier's shopping API.
pub struct FlightSearchService {
    supplier: Arc<dyn FlightSupplier>,
}

impl FlightSearchService {
    pub fn new(supplier: Arc<dyn FlightSupplier>) -> Self {
        Self { supplier }
    }

    /// Validate the query and return the supplier's offers unmodified.
    pub async fn search(&self, params: SearchParams) -> Result<Vec<Value>, SearchError> {
        let query = FlightSearchQuery::try_from(params)
            .map_err(|e| SearchError::Validation(validation_message(e)))?;

        match query.return_date {
            Some(return_date) => info!(
                "Round trip search: {} -> {}, {} - {}",
                query.origin, query.destination, query.departure_date, return_date
            ),
            None => info!(
                "One way search: {} -> {}, {}",
                query.origin, query.destination, query.departure_date
            ),
        }

        let mut offers = self.supplier.search_offers(&query).await.map_err(|e| {
            error!("Flight search failed: {}", e);
            SearchError::Supplier(e)
        })?;
        offers.truncate(MAX_OFFERS as usize);

        info!("Found {} flight offers", offers.len());
        Ok(offers)
    }
}
