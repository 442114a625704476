//! Fixture data shared across the integration tests
//!
//! One small catalog: two genres and four movies released in 2021, one of
//! them ("Some Movie", id 1) in the Action genre.

use chrono::NaiveDate;

use reeltally_common::{Genre, GenreId, MovieDetails, MovieId, MovieSummary, ReleasePeriod};
use reeltally_server::types::DiscoverPage;

use super::mocks::MockProvider;

pub const ACTION: GenreId = 28;
pub const SCIFI: GenreId = 29;

pub fn genre_catalog() -> Vec<Genre> {
    vec![
        Genre {
            id: ACTION,
            name: "Action".to_string(),
        },
        Genre {
            id: SCIFI,
            name: "Sci-fi".to_string(),
        },
    ]
}

/// Calendar year 2021
pub fn test_period() -> ReleasePeriod {
    ReleasePeriod::new(
        NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2021, 12, 31).unwrap(),
    )
}

pub fn summary(id: MovieId, title: &str) -> MovieSummary {
    MovieSummary {
        id,
        title: title.to_string(),
        release_date: None,
        genre_ids: Vec::new(),
    }
}

pub fn details(id: MovieId, title: &str, revenue: i64) -> MovieDetails {
    MovieDetails {
        id,
        title: title.to_string(),
        release_date: None,
        revenue,
        runtime: None,
        overview: String::new(),
    }
}

/// Single-page discovery result reporting `total` matches overall
pub fn single_page(total: u64, movies: Vec<MovieSummary>) -> DiscoverPage {
    DiscoverPage {
        page: 1,
        total_pages: 1,
        total_results: total,
        movies,
    }
}

/// The four movies the catalog-wide discovery reports
pub fn all_summaries() -> Vec<MovieSummary> {
    vec![
        summary(1, "Some Movie"),
        summary(2, "Some Movie 1"),
        summary(3, "Some Movie 2"),
        summary(4, "Some Movie 3"),
    ]
}

/// Provider scripted for the happy path: four movies in the period, one of
/// them Action with revenue 1000
pub fn action_provider() -> MockProvider {
    MockProvider::new()
        .with_genres(genre_catalog())
        .on_discover(None, None, single_page(4, all_summaries()))
        .on_discover(
            Some(ACTION),
            None,
            single_page(1, vec![summary(1, "Some Movie")]),
        )
        .on_discover(
            Some(ACTION),
            Some(1),
            single_page(1, vec![summary(1, "Some Movie")]),
        )
        .on_details(details(1, "Some Movie", 1000))
}
