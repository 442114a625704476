//! Genre/period statistics endpoint

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};

use reeltally_common::api::GenreStatsParams;
use reeltally_common::{GenrePeriodStats, ReleasePeriod};

use crate::error::ApiResult;
use crate::AppState;

/// GET /genre-stats
///
/// Runs one aggregation query and returns the assembled statistics.
/// Malformed parameters are rejected by the extractor with a 400 before
/// this handler runs.
pub async fn genre_stats(
    State(state): State<AppState>,
    Query(params): Query<GenreStatsParams>,
) -> ApiResult<Json<GenrePeriodStats>> {
    let period = ReleasePeriod::new(params.start_date, params.end_date);
    let stats = state
        .service
        .genre_period_stats(params.genre_id, period, params.revenue, params.operator)
        .await?;
    Ok(Json(stats))
}

/// Build statistics routes
pub fn stats_routes() -> Router<AppState> {
    Router::new().route("/genre-stats", get(genre_stats))
}
