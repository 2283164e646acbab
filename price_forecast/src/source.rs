//! Price sources
//!
//! The pipeline never fetches data on its own; callers hand it a
//! [`PriceSource`]. Two are provided: daily CSV files on disk and an
//! in-memory map.

use crate::data::{PricePoint, PriceSeries};
use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Supplies the daily closing-price history of a symbol
pub trait PriceSource {
    /// Full available history for `symbol`, ascending by date
    fn fetch_series(&self, symbol: &str) -> Result<PriceSeries>;
}

/// Reads `<dir>/<SYMBOL>.csv` files with `date` and `close` columns
#[derive(Debug, Clone)]
pub struct CsvPriceSource {
    dir: PathBuf,
}

impl CsvPriceSource {
    /// Source rooted at `dir`
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory searched for symbol files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File that holds `symbol`'s history
    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", symbol.to_uppercase()))
    }

    /// Parse one CSV file into a series.
    ///
    /// The header must name a `date` column (`YYYY-MM-DD`, a trailing time
    /// is ignored) and a `close` column; `adj close` is used when there is
    /// no `close`. Header matching is case-insensitive. Rows with an empty
    /// or `null` close are skipped; rows may appear in any order.
    pub fn read_file<P: AsRef<Path>>(path: P) -> Result<PriceSeries> {
        let path = path.as_ref();
        let label = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_uppercase())
            .unwrap_or_else(|| path.display().to_string());
        read_csv(path, &label)
    }
}

impl PriceSource for CsvPriceSource {
    fn fetch_series(&self, symbol: &str) -> Result<PriceSeries> {
        let path = self.path_for(symbol);
        if !path.is_file() {
            return Err(unavailable(
                symbol,
                format!("no price file at {}", path.display()),
            ));
        }
        read_csv(&path, &symbol.to_uppercase())
    }
}

fn unavailable(symbol: &str, reason: impl Into<String>) -> ForecastError {
    ForecastError::UpstreamDataUnavailable {
        symbol: symbol.to_uppercase(),
        reason: reason.into(),
    }
}

fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    names.iter().find_map(|name| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    })
}

fn parse_date(field: &str) -> Option<NaiveDate> {
    let field = field.trim();
    let day = field.get(..10).unwrap_or(field);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn read_csv(path: &Path, symbol: &str) -> Result<PriceSeries> {
    let file = File::open(path).map_err(|e| unavailable(symbol, e.to_string()))?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));

    let headers = reader
        .headers()
        .map_err(|e| unavailable(symbol, e.to_string()))?
        .clone();
    let date_idx = find_column(&headers, &["date"])
        .ok_or_else(|| unavailable(symbol, "no 'date' column"))?;
    let close_idx = find_column(&headers, &["close", "adj close", "adj_close"])
        .ok_or_else(|| unavailable(symbol, "no 'close' column"))?;

    let mut points = Vec::new();
    let mut skipped = 0usize;
    for (row, result) in reader.records().enumerate() {
        let record = result.map_err(|e| unavailable(symbol, e.to_string()))?;

        let raw_date = record.get(date_idx).unwrap_or_default();
        let date = parse_date(raw_date).ok_or_else(|| {
            ForecastError::DataError(format!("row {}: invalid date '{}'", row + 1, raw_date))
        })?;

        let raw_close = record.get(close_idx).unwrap_or_default().trim();
        if raw_close.is_empty() || raw_close.eq_ignore_ascii_case("null") {
            skipped += 1;
            continue;
        }
        let close: f64 = raw_close.parse().map_err(|_| {
            ForecastError::DataError(format!("row {}: invalid close '{}'", row + 1, raw_close))
        })?;

        points.push(PricePoint::new(date, close));
    }

    if points.is_empty() {
        return Err(unavailable(symbol, "file contains no price rows"));
    }

    points.sort_by_key(|p| p.date);
    debug!(symbol, rows = points.len(), skipped, "loaded price file");
    PriceSeries::new(points)
}

/// Fixed set of series keyed by upper-cased symbol
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    series: HashMap<String, PriceSeries>,
}

impl InMemorySource {
    /// Empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the history for `symbol`
    pub fn insert(&mut self, symbol: &str, series: PriceSeries) {
        self.series.insert(symbol.to_uppercase(), series);
    }

    /// Builder form of [`InMemorySource::insert`]
    pub fn with_series(mut self, symbol: &str, series: PriceSeries) -> Self {
        self.insert(symbol, series);
        self
    }
}

impl PriceSource for InMemorySource {
    fn fetch_series(&self, symbol: &str) -> Result<PriceSeries> {
        self.series
            .get(&symbol.to_uppercase())
            .cloned()
            .ok_or_else(|| unavailable(symbol, "unknown symbol"))
    }
}
