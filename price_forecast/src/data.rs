//! Close-price table loaded from a multi-ticker stock CSV.
//!
//! The expected layout is `date,open,high,low,close,volume,Name`, one row per
//! ticker and day. Only the date, close and name columns are read.

use crate::error::Result;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

const DATE_COLUMN: usize = 0;
const CLOSE_COLUMN: usize = 4;
const NAME_COLUMN: usize = 6;
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Closing prices keyed by date, then by ticker
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceTable {
    rows: BTreeMap<NaiveDate, BTreeMap<String, f64>>,
}

impl PriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a table from a CSV file on disk
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let table = Self::from_reader(file)?;
        info!(
            path = %path.display(),
            dates = table.len(),
            tickers = table.tickers().len(),
            "price table loaded"
        );
        Ok(table)
    }

    /// Parse CSV text from any reader.
    ///
    /// The first line is a header. Rows that are too short, lack a date or
    /// name, or carry an unparsable close are skipped.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut table = Self::new();
        let mut skipped = 0usize;
        for record in csv_reader.records() {
            let record = record?;
            let date = record
                .get(DATE_COLUMN)
                .and_then(|s| NaiveDate::parse_from_str(s, DATE_FORMAT).ok());
            let name = record.get(NAME_COLUMN).filter(|s| !s.is_empty());
            let close = record
                .get(CLOSE_COLUMN)
                .and_then(|s| s.parse::<f64>().ok())
                .filter(|c| !c.is_nan());

            match (date, name, close) {
                (Some(date), Some(name), Some(close)) => table.insert(date, name, close),
                _ => skipped += 1,
            }
        }

        if skipped > 0 {
            debug!(skipped, "skipped malformed rows");
        }
        Ok(table)
    }

    /// Record one close; a repeated (date, ticker) pair keeps the latest value
    pub fn insert(&mut self, date: NaiveDate, ticker: &str, close: f64) {
        self.rows
            .entry(date)
            .or_default()
            .insert(ticker.to_string(), close);
    }

    /// All tickers present on any date, sorted
    pub fn tickers(&self) -> Vec<String> {
        self.rows
            .values()
            .flat_map(|row| row.keys().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Keep only dates within `start..=end`
    pub fn filter_dates(&self, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            rows: self
                .rows
                .range(start..=end)
                .map(|(date, row)| (*date, row.clone()))
                .collect(),
        }
    }

    /// Number of distinct dates
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Date-ordered rows
    pub fn rows(&self) -> impl Iterator<Item = (&NaiveDate, &BTreeMap<String, f64>)> {
        self.rows.iter()
    }

    /// Date-ordered closes of one ticker, skipping dates where it is absent
    pub fn closes(&self, ticker: &str) -> Vec<f64> {
        self.rows
            .values()
            .filter_map(|row| row.get(ticker).copied())
            .collect()
    }
}
