//! Genre/period aggregation pipeline
//!
//! One query flows through four phases:
//! 1. Resolve the genre id to its name; nothing else starts until this
//!    succeeds.
//! 2. Concurrently count the period's total releases and discover the
//!    genre's page count.
//! 3. Fan out one task per page (bounded), each fanning out one task per
//!    listed movie (bounded), all feeding a single merge funnel.
//! 4. Join everything, then derive the percentage.
//!
//! The first real failure cancels the shared token; every spawned task is
//! drained before the error is returned, so no work outlives the query.

mod details;
pub mod merge;
mod page;

use std::sync::Arc;

use reeltally_common::{GenreId, GenrePeriodStats, ReleasePeriod, RevenueOp};
use tokio::sync::Semaphore;
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;

use crate::types::{DiscoverFilter, MovieCache, MovieProvider, QueryError};

/// Concurrency caps for one query's fan-out
#[derive(Debug, Clone, Copy)]
pub struct QueryLimits {
    /// Discovery pages processed concurrently
    pub max_page_fetches: usize,
    /// Movie detail lookups in flight at once, across all pages
    pub max_detail_fetches: usize,
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self {
            max_page_fetches: 4,
            max_detail_fetches: 16,
        }
    }
}

/// Shared state for one in-flight query, cloned into every spawned task
#[derive(Clone)]
pub(crate) struct QueryContext {
    provider: Arc<dyn MovieProvider>,
    cache: Arc<dyn MovieCache>,
    genre_id: GenreId,
    period: ReleasePeriod,
    threshold: i64,
    operator: RevenueOp,
    cancel: CancellationToken,
    page_permits: Arc<Semaphore>,
    detail_permits: Arc<Semaphore>,
}

/// Aggregation service answering genre/period revenue queries
pub struct GenrePeriodService {
    provider: Arc<dyn MovieProvider>,
    cache: Arc<dyn MovieCache>,
    limits: QueryLimits,
}

impl GenrePeriodService {
    pub fn new(
        provider: Arc<dyn MovieProvider>,
        cache: Arc<dyn MovieCache>,
        limits: QueryLimits,
    ) -> Self {
        Self {
            provider,
            cache,
            limits,
        }
    }

    /// Answer one genre/period query.
    ///
    /// Returns the genre's name, the movies that satisfy the revenue
    /// comparison, and the share they represent of every movie released in
    /// the period regardless of genre. Element order of the movie list is
    /// unspecified.
    pub async fn genre_period_stats(
        &self,
        genre_id: GenreId,
        period: ReleasePeriod,
        threshold: i64,
        operator: RevenueOp,
    ) -> Result<GenrePeriodStats, QueryError> {
        // Phase 1: the genre gate
        let genre_name = self.resolve_genre(genre_id).await?;
        tracing::info!(
            genre_id,
            genre = %genre_name,
            period = %period,
            "genre resolved, starting aggregation"
        );

        let ctx = QueryContext {
            provider: Arc::clone(&self.provider),
            cache: Arc::clone(&self.cache),
            genre_id,
            period,
            threshold,
            operator,
            cancel: CancellationToken::new(),
            page_permits: Arc::new(Semaphore::new(self.limits.max_page_fetches)),
            detail_permits: Arc::new(Semaphore::new(self.limits.max_detail_fetches)),
        };

        // Phase 2: the period total shares no data with page work, so it
        // runs alongside the page-count discovery.
        let counter = spawn_total_counter(&ctx);

        let first = match ctx
            .provider
            .discover_movies(&DiscoverFilter::period(period).with_genre(genre_id))
            .await
        {
            Ok(page) => page,
            Err(err) => {
                ctx.cancel.cancel();
                // The counter must not outlive the query
                let _ = counter.await;
                return Err(err.into());
            }
        };
        tracing::debug!(
            total_pages = first.total_pages,
            total_results = first.total_results,
            "page count discovered"
        );

        // Phase 3: bounded page fan-out into the merge funnel
        let (sink, collector) = merge::funnel();
        let mut pages = JoinSet::new();
        for page_no in 1..=first.total_pages {
            let ctx = ctx.clone();
            let sink = sink.clone();
            pages.spawn(async move { page::fetch_page(&ctx, page_no, &sink).await });
        }
        drop(sink);

        // Phase 4: full join; the funnel drains once every sink is gone
        let mut first_err = None;
        while let Some(joined) = pages.join_next().await {
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

        let total = match counter.await {
            Ok(Ok(total)) => total,
            Ok(Err(err)) => {
                note_failure(&mut first_err, err, &ctx.cancel);
                0
            }
            Err(err) => {
                note_failure(
                    &mut first_err,
                    QueryError::Internal(err.to_string()),
                    &ctx.cancel,
                );
                0
            }
        };

        let movies = collector
            .finish()
            .await
            .map_err(|err| QueryError::Internal(err.to_string()))?;

        if let Some(err) = first_err {
            return Err(err);
        }

        let percentage = if total == 0 {
            // An empty period yields zero rather than a division by zero
            0.0
        } else {
            movies.len() as f64 / total as f64 * 100.0
        };
        tracing::info!(
            genre_id,
            matched = movies.len(),
            total,
            percentage,
            "aggregation complete"
        );

        Ok(GenrePeriodStats {
            genre_id,
            genre_name,
            percentage,
            movies,
        })
    }

    /// Linear catalog scan; an absent id is a terminal domain error
    async fn resolve_genre(&self, genre_id: GenreId) -> Result<String, QueryError> {
        let genres = self.provider.list_genres().await?;
        genres
            .into_iter()
            .find(|genre| genre.id == genre_id)
            .map(|genre| genre.name)
            .ok_or(QueryError::GenreNotFound(genre_id))
    }
}

/// Count every release in the period regardless of genre.
///
/// Failure cancels the token immediately so page work stops promptly; the
/// error itself is surfaced at the final join.
fn spawn_total_counter(ctx: &QueryContext) -> JoinHandle<Result<u64, QueryError>> {
    let ctx = ctx.clone();
    tokio::spawn(async move {
        let filter = DiscoverFilter::period(ctx.period);
        let result = tokio::select! {
            _ = ctx.cancel.cancelled() => return Err(QueryError::Cancelled),
            result = ctx.provider.discover_movies(&filter) => result,
        };
        match result {
            Ok(page) => Ok(page.total_results),
            Err(err) => {
                ctx.cancel.cancel();
                Err(err.into())
            }
        }
    })
}

/// Record a task failure: the first real error wins and cancels siblings;
/// cancellations reported back by those siblings are dropped.
pub(crate) fn note_failure(
    first: &mut Option<QueryError>,
    err: QueryError,
    cancel: &CancellationToken,
) {
    if matches!(err, QueryError::Cancelled) {
        return;
    }
    if first.is_none() {
        cancel.cancel();
        *first = Some(err);
    }
}
