//! Movie cache implementations

pub mod redis;

pub use redis::RedisMovieCache;
