//! CSV file price data adapter.
//!
//! Expects a header row containing `Date`, `Open` and `Close` (any order, case
//! insensitive). Other columns are ignored. Timestamped rows are collapsed to
//! one observation per calendar day.

use crate::domain::error::RetrospectError;
use crate::domain::price::{PriceObservation, PriceSeries};
use crate::ports::data_port::PriceDataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub const REQUIRED_COLUMNS: [&str; 3] = ["Date", "Open", "Close"];

pub struct CsvPriceAdapter {
    path: PathBuf,
}

struct ColumnIndex {
    date: usize,
    open: usize,
    close: usize,
}

impl CsvPriceAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn locate_columns(headers: &csv::StringRecord) -> Result<ColumnIndex, RetrospectError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };

        let found = REQUIRED_COLUMNS.map(find);
        match found {
            [Some(date), Some(open), Some(close)] => Ok(ColumnIndex { date, open, close }),
            _ => Err(RetrospectError::MissingColumns {
                missing: REQUIRED_COLUMNS
                    .iter()
                    .zip(found)
                    .filter(|(_, idx)| idx.is_none())
                    .map(|(name, _)| name.to_string())
                    .collect(),
                available: headers.iter().map(|h| h.trim().to_string()).collect(),
            }),
        }
    }
}

/// Parse the calendar date from `2024-01-15`, `2024-01-15 09:30:00-05:00`,
/// `2024-01-15T09:30:00Z` or `01/15/2024`.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let date_part = value
        .split(|c: char| c == ' ' || c == 'T')
        .next()
        .unwrap_or(value);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(date_part, "%m/%d/%Y"))
        .ok()
}

/// `Ok(None)` for a blank or NaN cell, which drops the row.
fn parse_price(value: &str, column: &str, line: u64) -> Result<Option<f64>, RetrospectError> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    value
        .parse::<f64>()
        .map(Some)
        .map_err(|e| RetrospectError::DataParse {
            line,
            reason: format!("invalid {} value {:?}: {}", column, value, e),
        })
}

impl PriceDataPort for CsvPriceAdapter {
    fn fetch_series(&self) -> Result<PriceSeries, RetrospectError> {
        let content = fs::read_to_string(&self.path).map_err(|e| RetrospectError::DataRead {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| RetrospectError::DataParse {
                line: 1,
                reason: format!("CSV header error: {}", e),
            })?
            .clone();
        let columns = Self::locate_columns(&headers)?;

        let mut rows = Vec::new();
        let mut dropped = 0usize;

        for result in rdr.records() {
            let record = result.map_err(|e| RetrospectError::DataParse {
                line: e.position().map(|p| p.line()).unwrap_or(0),
                reason: format!("CSV parse error: {}", e),
            })?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);

            let date_str = record.get(columns.date).unwrap_or_default();
            let date = parse_date(date_str).ok_or_else(|| RetrospectError::DataParse {
                line,
                reason: format!("invalid date {:?}", date_str),
            })?;

            let open = parse_price(record.get(columns.open).unwrap_or_default(), "Open", line)?;
            let close = parse_price(record.get(columns.close).unwrap_or_default(), "Close", line)?;

            match (open, close) {
                (Some(open), Some(close)) => rows.push(PriceObservation::new(date, open, close)),
                _ => dropped += 1,
            }
        }

        if rows.is_empty() {
            return Err(RetrospectError::EmptySeries {
                source_name: self.path.display().to_string(),
            });
        }
        if dropped > 0 {
            tracing::debug!(dropped, path = %self.path.display(), "dropped rows with missing prices");
        }

        // Stable sort keeps intraday rows in file order within each day.
        rows.sort_by_key(|r| r.date);
        PriceSeries::from_intraday(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_csv(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn fetch_series_returns_correct_data() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "VOO.csv",
            "Date,Open,High,Low,Close,Volume\n\
             2024-01-15,100.0,110.0,90.0,105.0,50000\n\
             2024-01-16,105.0,115.0,100.0,110.0,60000\n\
             2024-01-17,110.0,120.0,105.0,115.0,55000\n",
        );
        let series = CsvPriceAdapter::new(path).fetch_series().unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(series.start_date(), date(2024, 1, 15));
        assert_eq!(series.first().open, 100.0);
        assert_eq!(series.first().close, 105.0);
        assert_eq!(series.end_date(), date(2024, 1, 17));
    }

    #[test]
    fn columns_found_by_name_in_any_order() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "VOO.csv",
            "close,Volume,date,OPEN\n105.0,1,2024-01-15,100.0\n",
        );
        let series = CsvPriceAdapter::new(path).fetch_series().unwrap();
        assert_eq!(
            series.first(),
            &PriceObservation::new(date(2024, 1, 15), 100.0, 105.0)
        );
    }

    #[test]
    fn missing_columns_are_reported() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "VOO.csv", "Date,High,Low\n2024-01-15,1,2\n");
        let err = CsvPriceAdapter::new(path).fetch_series().unwrap_err();

        match err {
            RetrospectError::MissingColumns { missing, available } => {
                assert_eq!(missing, vec!["Open", "Close"]);
                assert_eq!(available, vec!["Date", "High", "Low"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = TempDir::new().unwrap();
        let err = CsvPriceAdapter::new(dir.path().join("absent.csv"))
            .fetch_series()
            .unwrap_err();
        assert!(matches!(err, RetrospectError::DataRead { .. }));
    }

    #[test]
    fn header_only_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "VOO.csv", "Date,Open,Close\n");
        let err = CsvPriceAdapter::new(path).fetch_series().unwrap_err();
        assert!(matches!(err, RetrospectError::EmptySeries { .. }));
    }

    #[test]
    fn rows_with_missing_prices_are_dropped() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "VOO.csv",
            "Date,Open,Close\n2024-01-15,100,101\n2024-01-16,,102\n2024-01-17,NaN,103\n2024-01-18,103,104\n",
        );
        let series = CsvPriceAdapter::new(path).fetch_series().unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.end_date(), date(2024, 1, 18));
    }

    #[test]
    fn non_numeric_price_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "VOO.csv", "Date,Open,Close\n2024-01-15,abc,101\n");
        let err = CsvPriceAdapter::new(path).fetch_series().unwrap_err();
        assert!(matches!(err, RetrospectError::DataParse { line: 2, .. }));
    }

    #[test]
    fn unsorted_rows_are_ordered() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "VOO.csv",
            "Date,Open,Close\n2024-01-17,3,3\n2024-01-15,1,1\n2024-01-16,2,2\n",
        );
        let series = CsvPriceAdapter::new(path).fetch_series().unwrap();
        assert_eq!(series.closes(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn intraday_rows_collapse_to_daily() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "VOO.csv",
            "Date,Open,Close\n\
             2024-01-15 09:30:00-05:00,100,101\n\
             2024-01-15 10:30:00-05:00,101,99\n\
             2024-01-16 09:30:00-05:00,99,104\n",
        );
        let series = CsvPriceAdapter::new(path).fetch_series().unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(
            series.first(),
            &PriceObservation::new(date(2024, 1, 15), 100.0, 99.0)
        );
    }

    #[test]
    fn parse_date_formats() {
        assert_eq!(parse_date("2024-01-15"), Some(date(2024, 1, 15)));
        assert_eq!(parse_date("2024-01-15T14:00:00Z"), Some(date(2024, 1, 15)));
        assert_eq!(parse_date("01/15/2024"), Some(date(2024, 1, 15)));
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn data_range_reports_span() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "VOO.csv",
            "Date,Open,Close\n2024-01-15,1,1\n2024-01-16,2,2\n",
        );
        let (start, end, count) = CsvPriceAdapter::new(path).data_range().unwrap();
        assert_eq!(start, date(2024, 1, 15));
        assert_eq!(end, date(2024, 1, 16));
        assert_eq!(count, 2);
    }
}
