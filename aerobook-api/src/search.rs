use aerobook_core::search::SearchParams;
use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;

use crate::error::AppError;
use crate::extract::ApiQuery;
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct SearchResponse {
    results: Vec<Value>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/search-flights", get(search_flights))
}

/// GET /api/search-flights?origin&destination&departureDate[&returnDate][&adults]
async fn search_flights(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SearchParams>,
) -> Result<Json<SearchResponse>, AppError> {
    let results = state.search.search(params).await?;
    Ok(Json(SearchResponse { results }))
}
