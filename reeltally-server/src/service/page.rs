//! Per-page discovery and movie fan-out

use std::sync::Arc;

use reeltally_common::{MovieDetails, MovieId};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinSet;
use tracing::debug;

use super::{details, merge, note_failure, QueryContext};
use crate::types::{DiscoverFilter, QueryError};

/// Fetch one discovery page and resolve each listed movie concurrently.
///
/// Movies surviving the revenue comparison are sent upward through `sink`
/// as one batch once the whole page has resolved. The first real per-movie
/// failure cancels the operation and fails the page; sibling movie tasks
/// are still drained before this returns.
pub(crate) async fn fetch_page(
    ctx: &QueryContext,
    page_no: u32,
    sink: &merge::BatchSink<MovieDetails>,
) -> Result<(), QueryError> {
    let _permit = acquire(&ctx.page_permits, ctx).await?;

    let filter = DiscoverFilter::period(ctx.period)
        .with_genre(ctx.genre_id)
        .with_page(page_no);
    let page = tokio::select! {
        _ = ctx.cancel.cancelled() => return Err(QueryError::Cancelled),
        result = ctx.provider.discover_movies(&filter) => match result {
            Ok(page) => page,
            Err(err) => {
                ctx.cancel.cancel();
                return Err(err.into());
            }
        },
    };
    debug!(page = page_no, listed = page.movies.len(), "discovery page fetched");

    let (movie_sink, collector) = merge::funnel();
    let mut tasks = JoinSet::new();
    for summary in page.movies {
        let ctx = ctx.clone();
        let movie_sink = movie_sink.clone();
        tasks.spawn(async move { resolve_one(&ctx, summary.id, &movie_sink).await });
    }
    drop(movie_sink);

    let mut first_err = None;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(err)) => note_failure(&mut first_err, err, &ctx.cancel),
            Err(err) => note_failure(
                &mut first_err,
                QueryError::Internal(err.to_string()),
                &ctx.cancel,
            ),
        }
    }

    let movies = collector
        .finish()
        .await
        .map_err(|err| QueryError::Internal(err.to_string()))?;

    if let Some(err) = first_err {
        return Err(err);
    }
    if ctx.cancel.is_cancelled() {
        // A sibling page or the counter failed; this page's movies must
        // not reach the accumulator.
        return Err(QueryError::Cancelled);
    }

    if !movies.is_empty() {
        sink.send(movies).await.map_err(|_| QueryError::Cancelled)?;
    }
    Ok(())
}

/// Resolve one movie under the detail-permit cap and send a surviving
/// result onward as a single-item batch.
async fn resolve_one(
    ctx: &QueryContext,
    id: MovieId,
    sink: &merge::BatchSink<MovieDetails>,
) -> Result<(), QueryError> {
    let _permit = acquire(&ctx.detail_permits, ctx).await?;

    let resolved = tokio::select! {
        _ = ctx.cancel.cancelled() => return Err(QueryError::Cancelled),
        result = details::resolve_filtered(ctx, id) => result,
    };
    match resolved {
        Ok(Some(details)) => sink
            .send(vec![details])
            .await
            .map_err(|_| QueryError::Cancelled),
        Ok(None) => Ok(()),
        Err(err) => {
            ctx.cancel.cancel();
            Err(err)
        }
    }
}

/// Wait for a fan-out permit, giving up if the operation is cancelled
async fn acquire(
    permits: &Arc<Semaphore>,
    ctx: &QueryContext,
) -> Result<OwnedSemaphorePermit, QueryError> {
    tokio::select! {
        _ = ctx.cancel.cancelled() => Err(QueryError::Cancelled),
        permit = permits.clone().acquire_owned() => {
            permit.map_err(|err| QueryError::Internal(err.to_string()))
        }
    }
}
