//! Shared HTTP request/response payloads
//!
//! Used by the server's handlers and by the CLI client so both sides agree
//! on parameter names and the error envelope.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::movie::GenreId;
use crate::stats::RevenueOp;

/// Query parameters accepted by `GET /genre-stats`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenreStatsParams {
    pub genre_id: GenreId,
    /// Interval start, `YYYY-MM-DD`
    pub start_date: NaiveDate,
    /// Interval end, `YYYY-MM-DD`, inclusive
    pub end_date: NaiveDate,
    /// Revenue threshold the operator compares against
    pub revenue: i64,
    pub operator: RevenueOp,
}

/// Error envelope returned by every failing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Stable machine-readable code, e.g. `GENRE_NOT_FOUND`
    pub code: String,
    pub message: String,
}

impl ErrorBody {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
            },
        }
    }
}
