//! Redis-backed movie cache
//!
//! Stores [`MovieDetails`] JSON-encoded under `movie:{id}`. Failures are
//! split per the [`MovieCache`] contract: anything that looks like the
//! backend being unreachable (timeouts, refused or dropped connections, IO
//! errors) maps to [`CacheError::Connectivity`]; everything else, including
//! payload decode failures, is [`CacheError::Other`].

use redis::{AsyncCommands, Client};
use tracing::debug;

use reeltally_common::{MovieDetails, MovieId};

use crate::config::CacheConfig;
use crate::types::{CacheError, MovieCache};

/// Key prefix for cached movie details
const KEY_PREFIX: &str = "movie:";

pub struct RedisMovieCache {
    client: Client,
    ttl_seconds: Option<u64>,
}

impl RedisMovieCache {
    /// Create a cache client; connections are established lazily per
    /// operation, so an unreachable backend surfaces as a connectivity
    /// failure at call time rather than here.
    pub fn new(config: &CacheConfig) -> Result<Self, CacheError> {
        let client = Client::open(config.url.as_str()).map_err(classify)?;
        Ok(Self {
            client,
            ttl_seconds: config.ttl_seconds,
        })
    }

    fn key(id: MovieId) -> String {
        format!("{KEY_PREFIX}{id}")
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, CacheError> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(classify)
    }
}

#[async_trait::async_trait]
impl MovieCache for RedisMovieCache {
    async fn get_details(&self, id: MovieId) -> Result<Option<MovieDetails>, CacheError> {
        let mut conn = self.connection().await?;
        let raw: Option<String> = conn.get(Self::key(id)).await.map_err(classify)?;
        match raw {
            Some(json) => {
                let details = serde_json::from_str(&json).map_err(|err| {
                    CacheError::Other(format!("bad cached payload for movie {id}: {err}"))
                })?;
                Ok(Some(details))
            }
            None => Ok(None),
        }
    }

    async fn put_details(&self, details: &MovieDetails) -> Result<(), CacheError> {
        let json = serde_json::to_string(details).map_err(|err| {
            CacheError::Other(format!("failed to encode movie {}: {err}", details.id))
        })?;

        let mut conn = self.connection().await?;
        let key = Self::key(details.id);
        match self.ttl_seconds {
            Some(ttl) => conn.set_ex::<_, _, ()>(key, json, ttl).await.map_err(classify)?,
            None => conn.set::<_, _, ()>(key, json).await.map_err(classify)?,
        }
        debug!(movie_id = details.id, "movie details cached");
        Ok(())
    }
}

/// Map a redis error onto the contract's connectivity / other split
fn classify(err: redis::RedisError) -> CacheError {
    if err.is_timeout()
        || err.is_connection_refusal()
        || err.is_connection_dropped()
        || err.is_io_error()
    {
        CacheError::Connectivity(err.to_string())
    } else {
        CacheError::Other(err.to_string())
    }
}
