//! Revenue comparison operator and aggregation result types

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::movie::{GenreId, MovieDetails};

/// Revenue comparison operator
///
/// Appears as `lt` / `eq` / `gt` on the HTTP boundary and the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevenueOp {
    /// Revenue strictly below the threshold
    Lt,
    /// Revenue equal to the threshold
    Eq,
    /// Revenue strictly above the threshold
    Gt,
}

impl RevenueOp {
    /// Whether `revenue` satisfies this comparison against `threshold`
    pub fn matches(self, revenue: i64, threshold: i64) -> bool {
        match self {
            RevenueOp::Lt => revenue < threshold,
            RevenueOp::Eq => revenue == threshold,
            RevenueOp::Gt => revenue > threshold,
        }
    }
}

impl fmt::Display for RevenueOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RevenueOp::Lt => "lt",
            RevenueOp::Eq => "eq",
            RevenueOp::Gt => "gt",
        })
    }
}

impl FromStr for RevenueOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lt" => Ok(RevenueOp::Lt),
            "eq" => Ok(RevenueOp::Eq),
            "gt" => Ok(RevenueOp::Gt),
            other => Err(format!("unknown operator '{other}' (expected lt, eq or gt)")),
        }
    }
}

/// Inclusive calendar-date interval
///
/// `start <= end` is not validated anywhere; an inverted interval matches no
/// movies at the provider and yields an empty result rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleasePeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReleasePeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }
}

impl fmt::Display for ReleasePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Final aggregation result for one genre/period query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenrePeriodStats {
    pub genre_id: GenreId,
    pub genre_name: String,
    /// Share of the period's releases (all genres) that matched, in 0..=100.
    /// Defined as 0 when the period contains no releases at all.
    pub percentage: f64,
    /// Matching movies; element order is unspecified
    pub movies: Vec<MovieDetails>,
}
