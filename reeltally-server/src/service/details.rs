//! Per-movie cache-aside detail resolution
//!
//! The cache is consulted first; a hit bypasses the provider entirely, even
//! to refresh staleness. On a miss the provider result is written back
//! best-effort. Connectivity failures from the cache are tolerated on both
//! sides (a failed read becomes a miss, a failed write-back is skipped);
//! any other cache failure aborts the whole operation.

use reeltally_common::{MovieDetails, MovieId};
use tracing::{debug, warn};

use super::QueryContext;
use crate::types::QueryError;

/// Resolve one movie's details and apply the revenue comparison.
///
/// `Ok(None)` means the movie is excluded by the comparison, not an error.
pub(crate) async fn resolve_filtered(
    ctx: &QueryContext,
    id: MovieId,
) -> Result<Option<MovieDetails>, QueryError> {
    let details = resolve_details(ctx, id).await?;
    Ok(ctx
        .operator
        .matches(details.revenue, ctx.threshold)
        .then_some(details))
}

async fn resolve_details(ctx: &QueryContext, id: MovieId) -> Result<MovieDetails, QueryError> {
    match ctx.cache.get_details(id).await {
        Ok(Some(details)) => {
            debug!(movie_id = id, "cache hit");
            return Ok(details);
        }
        Ok(None) => {}
        Err(err) if err.is_connectivity() => {
            warn!(movie_id = id, error = %err, "cache read unavailable, treating as miss");
        }
        Err(err) => return Err(err.into()),
    }

    let details = ctx.provider.movie_details(id).await?;

    match ctx.cache.put_details(&details).await {
        Ok(()) => debug!(movie_id = id, "cached provider details"),
        Err(err) if err.is_connectivity() => {
            warn!(movie_id = id, error = %err, "cache write-back skipped");
        }
        Err(err) => return Err(err.into()),
    }

    Ok(details)
}
