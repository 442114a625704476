//! Test Helper Utilities
//!
//! Shared fakes and fixture data for the reeltally-server integration tests

pub mod fixtures;
pub mod mocks;

// Re-export commonly used items
pub use fixtures::{
    action_provider, all_summaries, details, genre_catalog, single_page, summary, test_period,
    ACTION, SCIFI,
};
pub use mocks::{CacheFailure, MockCache, MockProvider};
