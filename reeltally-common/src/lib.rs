//! # Reeltally Common Library
//!
//! Shared code for the reeltally server and CLI:
//! - Movie domain records (genres, summaries, details)
//! - Revenue comparison operator and aggregation result types
//! - HTTP request/response payloads

pub mod api;
pub mod movie;
pub mod stats;

pub use movie::{Genre, GenreId, MovieDetails, MovieId, MovieSummary};
pub use stats::{GenrePeriodStats, ReleasePeriod, RevenueOp};
