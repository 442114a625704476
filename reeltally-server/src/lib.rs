//! reeltally server library
//!
//! Answers one query over HTTP: for a genre and a release-date interval,
//! which movies satisfy a revenue comparison, and what share of the
//! period's releases do they represent. The aggregation pipeline lives in
//! [`service`]; [`provider`] and [`cache`] hold the TMDB and redis
//! collaborators behind the traits in [`types`].

use std::sync::Arc;

use axum::Router;
use chrono::{DateTime, Utc};
use tower_http::trace::TraceLayer;

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod provider;
pub mod service;
pub mod types;

use service::GenrePeriodService;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The aggregation service behind every stats request
    pub service: Arc<GenrePeriodService>,
    /// Service start moment, for health reporting
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    /// Create new application state
    pub fn new(service: Arc<GenrePeriodService>) -> Self {
        Self {
            service,
            startup_time: Utc::now(),
        }
    }
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::stats_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
