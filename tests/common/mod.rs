#![allow(dead_code)]

use chrono::NaiveDate;
use retrospect::domain::error::RetrospectError;
use retrospect::domain::price::{PriceObservation, PriceSeries};
use retrospect::ports::data_port::PriceDataPort;
use std::cell::RefCell;
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct MockDataPort {
    pub series: Option<PriceSeries>,
    pub error: Option<String>,
}

impl MockDataPort {
    pub fn with_series(series: PriceSeries) -> Self {
        Self {
            series: Some(series),
            error: None,
        }
    }

    pub fn with_error(reason: &str) -> Self {
        Self {
            series: None,
            error: Some(reason.to_string()),
        }
    }
}

impl PriceDataPort for MockDataPort {
    fn fetch_series(&self) -> Result<PriceSeries, RetrospectError> {
        if let Some(reason) = &self.error {
            return Err(RetrospectError::DataRead {
                path: "mock".into(),
                reason: reason.clone(),
            });
        }
        self.series.clone().ok_or_else(|| RetrospectError::EmptySeries {
            source_name: "mock".into(),
        })
    }
}

/// Records every path it was asked to write to, without touching disk.
#[derive(Default)]
pub struct RecordingSink {
    pub writes: RefCell<Vec<PathBuf>>,
}

impl retrospect::ports::report_port::ReportPort for RecordingSink {
    fn write(
        &self,
        _runs: &[retrospect::domain::strategy::StrategyRun],
        output_path: &Path,
    ) -> Result<(), RetrospectError> {
        self.writes.borrow_mut().push(output_path.to_path_buf());
        Ok(())
    }
}

impl retrospect::ports::report_port::ChartPort for RecordingSink {
    fn render(
        &self,
        _series: &PriceSeries,
        _runs: &[retrospect::domain::strategy::StrategyRun],
        _symbol: &str,
        output_path: &Path,
    ) -> Result<(), RetrospectError> {
        self.writes.borrow_mut().push(output_path.to_path_buf());
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Consecutive daily observations starting 2020-01-01.
pub fn series_from(prices: &[(f64, f64)]) -> PriceSeries {
    let start = date(2020, 1, 1);
    PriceSeries::new(
        prices
            .iter()
            .enumerate()
            .map(|(i, &(open, close))| {
                PriceObservation::new(start + chrono::Duration::days(i as i64), open, close)
            })
            .collect(),
    )
    .unwrap()
}

/// A gently trending, oscillating series long enough to pass the
/// moving-average warm-up.
pub fn generate_series(count: usize, start_price: f64) -> PriceSeries {
    let prices: Vec<(f64, f64)> = (0..count)
        .map(|i| {
            let base = start_price + i as f64 * 0.1 + (i as f64 * 0.35).sin() * 3.0;
            let close = base + (i as f64 * 0.9).cos();
            (base, close)
        })
        .collect();
    series_from(&prices)
}

pub fn csv_content(series: &PriceSeries) -> String {
    let mut out = String::from("Date,Open,High,Low,Close,Volume\n");
    for obs in series {
        out.push_str(&format!(
            "{},{},{},{},{},1000\n",
            obs.date,
            obs.open,
            obs.open.max(obs.close) + 1.0,
            obs.open.min(obs.close) - 1.0,
            obs.close
        ));
    }
    out
}

pub fn write_temp_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
