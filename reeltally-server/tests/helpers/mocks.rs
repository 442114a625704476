//! In-memory fakes for the provider and cache seams

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use reeltally_common::{Genre, GenreId, MovieDetails, MovieId};
use reeltally_server::types::{
    CacheError, DiscoverFilter, DiscoverPage, MovieCache, MovieProvider, ProviderError,
};

/// Scripted [`MovieProvider`] with per-call counters.
///
/// Discovery responses are keyed on the (genre, page) pair of the incoming
/// filter; an unscripted pair answers with an API error so the failing test
/// names the missing expectation instead of hanging.
pub struct MockProvider {
    genres: Vec<Genre>,
    discover: HashMap<(Option<GenreId>, Option<u32>), Result<DiscoverPage, String>>,
    details: HashMap<MovieId, Result<MovieDetails, String>>,
    delay: Option<Duration>,
    pub discover_calls: AtomicUsize,
    pub details_calls: AtomicUsize,
    details_in_flight: AtomicUsize,
    details_high_water: AtomicUsize,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            genres: Vec::new(),
            discover: HashMap::new(),
            details: HashMap::new(),
            delay: None,
            discover_calls: AtomicUsize::new(0),
            details_calls: AtomicUsize::new(0),
            details_in_flight: AtomicUsize::new(0),
            details_high_water: AtomicUsize::new(0),
        }
    }

    pub fn with_genres(mut self, genres: Vec<Genre>) -> Self {
        self.genres = genres;
        self
    }

    pub fn on_discover(
        mut self,
        genre_id: Option<GenreId>,
        page: Option<u32>,
        result: DiscoverPage,
    ) -> Self {
        self.discover.insert((genre_id, page), Ok(result));
        self
    }

    pub fn on_discover_error(
        mut self,
        genre_id: Option<GenreId>,
        page: Option<u32>,
        message: &str,
    ) -> Self {
        self.discover.insert((genre_id, page), Err(message.to_string()));
        self
    }

    pub fn on_details(mut self, details: MovieDetails) -> Self {
        self.details.insert(details.id, Ok(details));
        self
    }

    pub fn on_details_error(mut self, id: MovieId, message: &str) -> Self {
        self.details.insert(id, Err(message.to_string()));
        self
    }

    /// Hold every call open briefly so concurrent callers overlap
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Most detail lookups ever observed in flight at once
    pub fn details_high_water(&self) -> usize {
        self.details_high_water.load(Ordering::SeqCst)
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn api_error(message: &str) -> ProviderError {
        ProviderError::Api {
            status: 500,
            message: message.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl MovieProvider for MockProvider {
    async fn list_genres(&self) -> Result<Vec<Genre>, ProviderError> {
        Ok(self.genres.clone())
    }

    async fn discover_movies(
        &self,
        filter: &DiscoverFilter,
    ) -> Result<DiscoverPage, ProviderError> {
        self.discover_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        match self.discover.get(&(filter.genre_id, filter.page)) {
            Some(Ok(page)) => Ok(page.clone()),
            Some(Err(message)) => Err(Self::api_error(message)),
            None => Err(Self::api_error(&format!(
                "unscripted discovery for genre {:?} page {:?}",
                filter.genre_id, filter.page
            ))),
        }
    }

    async fn movie_details(&self, id: MovieId) -> Result<MovieDetails, ProviderError> {
        self.details_calls.fetch_add(1, Ordering::SeqCst);
        let in_flight = self.details_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.details_high_water.fetch_max(in_flight, Ordering::SeqCst);
        self.pause().await;
        self.details_in_flight.fetch_sub(1, Ordering::SeqCst);
        match self.details.get(&id) {
            Some(Ok(details)) => Ok(details.clone()),
            Some(Err(message)) => Err(Self::api_error(message)),
            None => Err(Self::api_error(&format!("unscripted details for movie {id}"))),
        }
    }
}

/// Failure mode injected into [`MockCache`] calls
#[derive(Debug, Clone, Copy)]
pub enum CacheFailure {
    Connectivity,
    Other,
}

impl CacheFailure {
    fn to_error(self) -> CacheError {
        match self {
            CacheFailure::Connectivity => CacheError::Connectivity("cache offline".into()),
            CacheFailure::Other => CacheError::Other("cache protocol failure".into()),
        }
    }
}

/// In-memory [`MovieCache`] with optional injected failures
pub struct MockCache {
    entries: Mutex<HashMap<MovieId, MovieDetails>>,
    read_failure: Option<CacheFailure>,
    write_failure: Option<CacheFailure>,
    pub get_calls: AtomicUsize,
    pub put_calls: AtomicUsize,
}

impl MockCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            read_failure: None,
            write_failure: None,
            get_calls: AtomicUsize::new(0),
            put_calls: AtomicUsize::new(0),
        }
    }

    /// Preload one entry, as if a previous query had written it back
    pub fn with_entry(self, details: MovieDetails) -> Self {
        self.entries.lock().unwrap().insert(details.id, details);
        self
    }

    pub fn failing_reads(mut self, failure: CacheFailure) -> Self {
        self.read_failure = Some(failure);
        self
    }

    pub fn failing_writes(mut self, failure: CacheFailure) -> Self {
        self.write_failure = Some(failure);
        self
    }

    /// What the cache currently holds for `id`
    pub fn stored(&self, id: MovieId) -> Option<MovieDetails> {
        self.entries.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait::async_trait]
impl MovieCache for MockCache {
    async fn get_details(&self, id: MovieId) -> Result<Option<MovieDetails>, CacheError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(failure) = self.read_failure {
            return Err(failure.to_error());
        }
        Ok(self.entries.lock().unwrap().get(&id).cloned())
    }

    async fn put_details(&self, details: &MovieDetails) -> Result<(), CacheError> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(failure) = self.write_failure {
            return Err(failure.to_error());
        }
        self.entries
            .lock()
            .unwrap()
            .insert(details.id, details.clone());
        Ok(())
    }
}
