//! One-shot query client for the reeltally server
//!
//! Issues a single `GET /genre-stats` request and prints the genre's share of
//! releases for the period together with the matching movies.
//!
//! **Usage:**
//! ```bash
//! reeltally --genre 28 --start 2021-11-12 --end 2021-11-13 --revenue 1000 --operator gt
//! ```

use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::Parser;

use reeltally_common::api::{ErrorBody, GenreStatsParams};
use reeltally_common::{GenreId, GenrePeriodStats, RevenueOp};

/// Command-line arguments for the query client
#[derive(Parser, Debug)]
#[command(name = "reeltally")]
#[command(about = "Query a reeltally server for genre/period movie statistics")]
#[command(version)]
struct Args {
    /// Base URL of the reeltally server
    #[arg(long, default_value = "http://127.0.0.1:3340", env = "REELTALLY_SERVER")]
    server: String,

    /// Genre id to search
    #[arg(short, long, default_value = "28")]
    genre: GenreId,

    /// Interval start (YYYY-MM-DD)
    #[arg(short, long, default_value = "2021-11-12")]
    start: NaiveDate,

    /// Interval end (YYYY-MM-DD), inclusive
    #[arg(short, long, default_value = "2021-11-13")]
    end: NaiveDate,

    /// Revenue threshold each movie is compared against
    #[arg(short, long, default_value = "1000")]
    revenue: i64,

    /// Comparison applied to each movie's revenue: lt, eq or gt
    #[arg(short, long, default_value = "gt")]
    operator: RevenueOp,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let params = GenreStatsParams {
        genre_id: args.genre,
        start_date: args.start,
        end_date: args.end,
        revenue: args.revenue,
        operator: args.operator,
    };

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .context("Failed to build HTTP client")?;

    let url = format!("{}/genre-stats", args.server.trim_end_matches('/'));
    let response = client
        .get(&url)
        .query(&params)
        .send()
        .await
        .with_context(|| format!("Request to {url} failed"))?;

    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error.message)
            .unwrap_or(text);
        bail!("Server returned {status}: {message}");
    }

    let stats: GenrePeriodStats = response
        .json()
        .await
        .context("Failed to decode server response")?;

    print_stats(&stats, &params);
    Ok(())
}

/// Render the statistics for human consumption
fn print_stats(stats: &GenrePeriodStats, params: &GenreStatsParams) {
    println!(
        "{} ({}) between {} and {}: {:.2}% of releases have revenue {} {}",
        stats.genre_name,
        stats.genre_id,
        params.start_date,
        params.end_date,
        stats.percentage,
        params.operator,
        params.revenue,
    );

    if stats.movies.is_empty() {
        println!("No matching movies.");
        return;
    }

    println!("\nMatched {} movie(s):", stats.movies.len());
    for movie in &stats.movies {
        let released = movie
            .release_date
            .map(|date| date.to_string())
            .unwrap_or_else(|| "unknown".into());
        let runtime = movie
            .runtime
            .map(|minutes| format!("{minutes} min"))
            .unwrap_or_else(|| "unknown runtime".into());
        println!("  [{}] {}", movie.id, movie.title);
        println!(
            "      released {released}, revenue {}, {runtime}",
            movie.revenue
        );
        if !movie.overview.is_empty() {
            println!("      {}", movie.overview);
        }
    }
}
