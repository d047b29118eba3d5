//! Integration tests for the strategy pipeline.
//!
//! Tests cover:
//! - Worked scenarios for passive hold, smart daily and annualized returns
//! - Full pipeline with a mock data port and recording outputs
//! - Full pipeline through the CSV, text report and SVG adapters on disk
//! - Input errors stop the pipeline before any output is written

mod common;

use approx::assert_relative_eq;
use common::*;
use retrospect::adapters::chart_svg::SvgChartAdapter;
use retrospect::adapters::csv_adapter::CsvPriceAdapter;
use retrospect::adapters::text_report::TextReportAdapter;
use retrospect::cli::{RunSettings, run_pipeline};
use retrospect::domain::error::RetrospectError;
use retrospect::domain::rates::DailyRate;
use retrospect::domain::strategy::StrategyKind;
use retrospect::domain::xirr::{XirrError, strategy_xirr, xirr};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn settings_in(dir: &TempDir) -> RunSettings {
    RunSettings {
        csv_path: dir.path().join("VOO.csv"),
        symbol: "VOO".into(),
        principal: 1_000.0,
        annual_credit_rate: 0.04,
        report_path: dir.path().join("results.txt"),
        chart_path: dir.path().join("chart.svg"),
    }
}

mod scenarios {
    use super::*;

    #[test]
    fn passive_two_period_hold() {
        let rate = DailyRate::default();
        let series = series_from(&[(100.0, 104.0), (103.0, 110.0)]);
        let run = StrategyKind::Passive.run(&series, 1_000.0, "VOO", rate);

        assert_relative_eq!(run.profits[0], 1_000.0 * rate.value(), max_relative = 1e-12);
        assert_relative_eq!(run.profits[1], 100.0, max_relative = 1e-12);
        assert_relative_eq!(
            run.summary.final_balance,
            1_000.0 + run.total_profit(),
            max_relative = 1e-12
        );
    }

    #[test]
    fn smart_daily_single_losing_period() {
        let series = series_from(&[(100.0, 90.0)]);
        let run = StrategyKind::SmartDaily.run(&series, 1_000.0, "VOO", DailyRate::default());

        // No sale on the day; the forced liquidation books the loss.
        assert_eq!(run.profits.len(), 1);
        assert_relative_eq!(run.profits[0], -100.0, max_relative = 1e-12);
        assert_relative_eq!(run.summary.final_balance, 900.0, max_relative = 1e-12);
    }

    #[test]
    fn daily_credit_rate_matches_four_percent_annual() {
        let rate = DailyRate::default();
        assert_relative_eq!(
            (1.0 + rate.value()).powf(365.0),
            1.04,
            max_relative = 1e-12
        );
    }

    #[test]
    fn ten_percent_over_one_year() {
        let rate = xirr(&[(date(2023, 1, 1), -1_000.0), (date(2024, 1, 1), 1_100.0)]).unwrap();
        assert_relative_eq!(rate, 0.10, epsilon = 1e-6);
    }

    #[test]
    fn non_positive_final_value_is_undefined() {
        let err = xirr(&[(date(2023, 1, 1), -1_000.0), (date(2024, 1, 1), 0.0)]).unwrap_err();
        assert_eq!(err, XirrError::NoSignChange);

        let series = series_from(&[(100.0, 100.0), (100.0, 100.0)]);
        assert_eq!(strategy_xirr(&series, &[-600.0, -500.0], 1_000.0), None);
    }

    #[test]
    fn moving_average_never_trades_on_short_series() {
        let rate = DailyRate::default();
        let series = generate_series(30, 100.0);
        let run = StrategyKind::MovingAverage.run(&series, 1_000.0, "VOO", rate);

        let mut balance = 1_000.0;
        for profit in &run.profits {
            assert_relative_eq!(*profit, balance * rate.value(), max_relative = 1e-12);
            balance += profit;
        }
    }
}

mod full_pipeline {
    use super::*;

    #[test]
    fn mock_pipeline_runs_every_strategy() {
        let dir = TempDir::new().unwrap();
        let settings = settings_in(&dir);
        let port = MockDataPort::with_series(generate_series(250, 100.0));
        let sink = RecordingSink::default();

        let outcome = run_pipeline(&port, &settings, &sink, &sink).unwrap();

        assert_eq!(outcome.runs.len(), StrategyKind::ALL.len());
        assert_eq!(outcome.rates.len(), StrategyKind::ALL.len());
        assert_eq!(outcome.drawdowns.len(), StrategyKind::ALL.len());
        for (run, kind) in outcome.runs.iter().zip(StrategyKind::ALL) {
            assert_eq!(run.kind, kind);
            assert_eq!(run.profits.len(), 250);
            assert_eq!(run.summary.instrument, "VOO");
        }
        for drawdown in &outcome.drawdowns {
            assert!((0.0..=1.0).contains(drawdown));
        }
        assert_eq!(
            *sink.writes.borrow(),
            vec![settings.report_path.clone(), settings.chart_path.clone()]
        );
    }

    #[test]
    fn data_error_stops_before_outputs() {
        let dir = TempDir::new().unwrap();
        let port = MockDataPort::with_error("connection refused");
        let sink = RecordingSink::default();

        let err = run_pipeline(&port, &settings_in(&dir), &sink, &sink).unwrap_err();

        assert!(matches!(err, RetrospectError::DataRead { .. }));
        assert!(sink.writes.borrow().is_empty());
    }

    #[test]
    fn csv_to_report_and_chart_on_disk() {
        let dir = TempDir::new().unwrap();
        let settings = settings_in(&dir);
        let series = generate_series(120, 300.0);
        fs::write(&settings.csv_path, csv_content(&series)).unwrap();

        let outcome = run_pipeline(
            &CsvPriceAdapter::new(settings.csv_path.clone()),
            &settings,
            &TextReportAdapter::new(),
            &SvgChartAdapter::new(),
        )
        .unwrap();
        assert_eq!(outcome.series.len(), 120);

        let report = fs::read_to_string(&settings.report_path).unwrap();
        assert_eq!(report.matches("Method: ").count(), 5);
        assert_eq!(report.matches("Instrument: VOO").count(), 5);
        assert!(report.contains("Start date: 2020-01-01"));
        assert!(report.contains("Starting balance: $1000.00"));

        let chart = fs::read_to_string(&settings.chart_path).unwrap();
        assert!(chart.contains("VOO Trading Strategy Comparison of Cumulative Profits"));
        for kind in StrategyKind::ALL {
            assert!(chart.contains(kind.legend()));
        }
    }

    #[test]
    fn missing_columns_write_nothing() {
        let dir = TempDir::new().unwrap();
        let settings = settings_in(&dir);
        fs::write(&settings.csv_path, "Date,High,Low\n2020-01-01,1,2\n").unwrap();

        let err = run_pipeline(
            &CsvPriceAdapter::new(settings.csv_path.clone()),
            &settings,
            &TextReportAdapter::new(),
            &SvgChartAdapter::new(),
        )
        .unwrap_err();

        assert!(matches!(err, RetrospectError::MissingColumns { .. }));
        assert!(!settings.report_path.exists());
        assert!(!settings.chart_path.exists());
    }

    #[test]
    fn missing_file_is_a_data_error() {
        let dir = TempDir::new().unwrap();
        let settings = RunSettings {
            csv_path: PathBuf::from("/nonexistent/VOO.csv"),
            ..settings_in(&dir)
        };
        let err = run_pipeline(
            &CsvPriceAdapter::new(settings.csv_path.clone()),
            &settings,
            &TextReportAdapter::new(),
            &SvgChartAdapter::new(),
        )
        .unwrap_err();
        assert!(matches!(err, RetrospectError::DataRead { .. }));
    }
}
