//! Movie domain records
//!
//! All records originate at the metadata provider and are immutable once
//! constructed. [`MovieDetails`] is the only record that crosses a
//! persistence boundary: the server caches it JSON-encoded, keyed by id.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Provider-assigned movie identifier
pub type MovieId = i64;

/// Provider-assigned genre identifier
pub type GenreId = i64;

/// One entry of the provider's genre catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
}

/// Minimal listing record returned by paginated discovery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: MovieId,
    pub title: String,
    /// Absent when the provider has no release date on file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<NaiveDate>,
    /// Genre tags attached to the movie
    #[serde(default)]
    pub genre_ids: Vec<GenreId>,
}

/// Full per-movie record, keyed by movie id
///
/// May come from the cache or from the provider; consumers treat both
/// origins identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieDetails {
    pub id: MovieId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<NaiveDate>,
    /// Worldwide revenue in US dollars as reported by the provider
    pub revenue: i64,
    /// Runtime in minutes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<u32>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub overview: String,
}
