//! TMDB metadata provider
//!
//! reqwest client for The Movie Database v3 API implementing
//! [`MovieProvider`]. The API key travels as the `api_key` query parameter
//! on every request; the base URL is configurable so tests can point the
//! client at a local stub.
//!
//! # API Reference
//! - `GET /genre/movie/list` - genre catalog
//! - `GET /discover/movie` - paginated discovery, filtered by
//!   `release_date.gte` / `release_date.lte` / `with_genres` / `page`
//! - `GET /movie/{id}` - full movie details

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use reeltally_common::{Genre, MovieDetails, MovieId, MovieSummary};

use crate::config::TmdbConfig;
use crate::types::{DiscoverFilter, DiscoverPage, MovieProvider, ProviderError};

/// TMDB v3 API root
pub const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Release dates on the wire, `YYYY-MM-DD`
const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct TmdbProvider {
    http_client: Client,
    base_url: String,
    api_key: String,
}

impl TmdbProvider {
    /// Create a provider from configuration
    pub fn new(config: &TmdbConfig) -> Result<Self, ProviderError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        params: &[(String, String)],
    ) -> Result<T, ProviderError> {
        let response = self
            .http_client
            .get(url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl MovieProvider for TmdbProvider {
    async fn list_genres(&self) -> Result<Vec<Genre>, ProviderError> {
        let url = format!("{}/genre/movie/list", self.base_url);
        let body: GenreListBody = self.get_json(&url, &[]).await?;
        debug!(genres = body.genres.len(), "genre catalog fetched");
        Ok(body
            .genres
            .into_iter()
            .map(|entry| Genre {
                id: entry.id,
                name: entry.name,
            })
            .collect())
    }

    async fn discover_movies(
        &self,
        filter: &DiscoverFilter,
    ) -> Result<DiscoverPage, ProviderError> {
        let url = format!("{}/discover/movie", self.base_url);
        let mut params = vec![
            (
                "release_date.gte".to_string(),
                filter.period.start.format(DATE_FORMAT).to_string(),
            ),
            (
                "release_date.lte".to_string(),
                filter.period.end.format(DATE_FORMAT).to_string(),
            ),
        ];
        if let Some(genre_id) = filter.genre_id {
            params.push(("with_genres".to_string(), genre_id.to_string()));
        }
        if let Some(page) = filter.page {
            params.push(("page".to_string(), page.to_string()));
        }

        let body: DiscoverBody = self.get_json(&url, &params).await?;
        debug!(
            page = body.page,
            total_pages = body.total_pages,
            total_results = body.total_results,
            "discover page fetched"
        );

        Ok(DiscoverPage {
            page: body.page,
            total_pages: body.total_pages,
            total_results: body.total_results,
            movies: body.results.into_iter().map(SummaryEntry::into_domain).collect(),
        })
    }

    async fn movie_details(&self, id: MovieId) -> Result<MovieDetails, ProviderError> {
        let url = format!("{}/movie/{}", self.base_url, id);
        let body: DetailsBody = self.get_json(&url, &[]).await?;
        Ok(MovieDetails {
            id: body.id,
            title: body.title,
            release_date: parse_date(body.release_date.as_deref()),
            revenue: body.revenue,
            runtime: body.runtime,
            overview: body.overview,
        })
    }
}

/// TMDB sends `""` for unknown release dates; both that and a missing
/// field map to `None`.
fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

// ============================================================================
// TMDB API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct GenreListBody {
    genres: Vec<GenreEntry>,
}

#[derive(Debug, Deserialize)]
struct GenreEntry {
    id: i64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct DiscoverBody {
    page: u32,
    total_pages: u32,
    total_results: u64,
    #[serde(default)]
    results: Vec<SummaryEntry>,
}

#[derive(Debug, Deserialize)]
struct SummaryEntry {
    id: i64,
    title: String,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    genre_ids: Vec<i64>,
}

impl SummaryEntry {
    fn into_domain(self) -> MovieSummary {
        MovieSummary {
            id: self.id,
            title: self.title,
            release_date: parse_date(self.release_date.as_deref()),
            genre_ids: self.genre_ids,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DetailsBody {
    id: i64,
    title: String,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    revenue: i64,
    #[serde(default)]
    runtime: Option<u32>,
    #[serde(default)]
    overview: String,
}

// ============================================================================
// Tests
// ============================================================================
