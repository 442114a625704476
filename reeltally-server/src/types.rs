//! Core types and trait definitions for the reeltally server
//!
//! Defines the two collaborator seams the aggregation pipeline depends on:
//! - **MovieProvider**: the external metadata service (genre catalog,
//!   paginated discovery, per-movie details)
//! - **MovieCache**: keyed storage of movie details with a connectivity /
//!   other failure split
//!
//! Both are object-safe async traits held as `Arc<dyn …>` so tests can
//! substitute in-memory fakes for the real TMDB and redis clients.

use reeltally_common::{Genre, GenreId, MovieDetails, MovieId, MovieSummary, ReleasePeriod};
use thiserror::Error;

// ============================================================================
// Discovery Types
// ============================================================================

/// Filters for one discovery request
#[derive(Debug, Clone, Copy)]
pub struct DiscoverFilter {
    /// Inclusive release-date interval
    pub period: ReleasePeriod,
    /// Restrict results to one genre; `None` discovers across all genres
    pub genre_id: Option<GenreId>,
    /// 1-based page to fetch; `None` lets the provider pick the first page
    pub page: Option<u32>,
}

impl DiscoverFilter {
    /// Period-only discovery: no genre constraint, provider-default page
    pub fn period(period: ReleasePeriod) -> Self {
        Self {
            period,
            genre_id: None,
            page: None,
        }
    }

    pub fn with_genre(mut self, genre_id: GenreId) -> Self {
        self.genre_id = Some(genre_id);
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }
}

/// One page of discovery results with the provider-reported totals
#[derive(Debug, Clone, Default)]
pub struct DiscoverPage {
    pub page: u32,
    pub total_pages: u32,
    /// Total matching movies across all pages
    pub total_results: u64,
    pub movies: Vec<MovieSummary>,
}

// ============================================================================
// Metadata Provider
// ============================================================================

/// External movie-metadata service
///
/// Calls are request/response and individually safe to issue concurrently.
/// Failures surface as [`ProviderError`] and are never retried here; retry
/// policy, if any, belongs to the implementation behind this trait.
#[async_trait::async_trait]
pub trait MovieProvider: Send + Sync {
    /// Fetch the full genre catalog (not paginated)
    async fn list_genres(&self) -> Result<Vec<Genre>, ProviderError>;

    /// Fetch one page of movies matching `filter`
    async fn discover_movies(&self, filter: &DiscoverFilter)
        -> Result<DiscoverPage, ProviderError>;

    /// Fetch the full details of one movie
    async fn movie_details(&self, id: MovieId) -> Result<MovieDetails, ProviderError>;
}

/// Metadata provider failure
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Transport-level failure (connect, timeout, body decode)
    #[error("provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered with a non-success status
    #[error("provider returned {status}: {message}")]
    Api { status: u16, message: String },
}

// ============================================================================
// Movie Cache
// ============================================================================

/// Keyed storage of movie details
///
/// The connectivity / other split is part of this contract, not an
/// implementation detail: callers treat a connectivity failure on read as a
/// miss and skip a write-back that fails the same way, while any other
/// failure aborts the whole operation. Replacement implementations must
/// preserve the distinction.
#[async_trait::async_trait]
pub trait MovieCache: Send + Sync {
    /// Look up cached details; `Ok(None)` is a miss
    async fn get_details(&self, id: MovieId) -> Result<Option<MovieDetails>, CacheError>;

    /// Store details for later lookups
    async fn put_details(&self, details: &MovieDetails) -> Result<(), CacheError>;
}

/// Cache failure, classified for the tolerance contract
#[derive(Debug, Error)]
pub enum CacheError {
    /// Backend unreachable or timed out; tolerated by callers
    #[error("cache unreachable: {0}")]
    Connectivity(String),

    /// Any other failure (protocol, encoding); fatal
    #[error("cache failure: {0}")]
    Other(String),
}

impl CacheError {
    pub fn is_connectivity(&self) -> bool {
        matches!(self, CacheError::Connectivity(_))
    }
}

// ============================================================================
// Query Errors
// ============================================================================

/// Terminal failure of one genre/period query
///
/// Concurrent tasks that stop because a sibling already failed report
/// [`QueryError::Cancelled`]; the orchestrating join keeps the first real
/// error and discards the cancellations.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Requested genre id is not in the provider's catalog
    #[error("no genre with id {0}")]
    GenreNotFound(GenreId),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    /// The operation stopped before producing a result
    #[error("query cancelled")]
    Cancelled,

    /// Task plumbing failure (join/channel); not expected in normal operation
    #[error("internal error: {0}")]
    Internal(String),
}
