//! Strategy simulation engine.
//!
//! Each strategy is a single forward pass over an immutable [`PriceSeries`]
//! that emits one realized-profit entry per observation and a
//! [`StrategySummary`]. Strategies share no state, so callers may run them
//! concurrently. All five honour the same contract:
//!
//! - `profits.len() == series.len()`
//! - `final_balance == starting_balance + profits.iter().sum()` (to float tolerance)
//! - a period whose open is non-positive records zero profit and leaves the
//!   position untouched

pub mod daily_round_trip;
pub mod moving_average;
pub mod passive;
pub mod smart_daily;
pub mod trend_following;

use chrono::NaiveDate;
use std::fmt;

use crate::domain::price::PriceSeries;
use crate::domain::rates::DailyRate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    DailyRoundTrip,
    SmartDaily,
    TrendFollowing,
    Passive,
    MovingAverage,
}

impl StrategyKind {
    /// Report, console and chart order.
    pub const ALL: [StrategyKind; 5] = [
        StrategyKind::DailyRoundTrip,
        StrategyKind::SmartDaily,
        StrategyKind::TrendFollowing,
        StrategyKind::Passive,
        StrategyKind::MovingAverage,
    ];

    /// Method name written to the report.
    pub fn method_name(self) -> &'static str {
        match self {
            StrategyKind::DailyRoundTrip => "Daily trade",
            StrategyKind::SmartDaily => "Smart daily trade",
            StrategyKind::TrendFollowing => "Trend following",
            StrategyKind::Passive => "Passive trade",
            StrategyKind::MovingAverage => "60-day MA",
        }
    }

    /// Prefix of the annualized-rate console line.
    pub fn console_label(self) -> &'static str {
        match self {
            StrategyKind::DailyRoundTrip => "Daily Buy/Sell Strategy XIRR:",
            StrategyKind::SmartDaily => "Smart Daily Buy/Sell Strategy XIRR:",
            StrategyKind::TrendFollowing => "Trend Following Strategy XIRR:",
            StrategyKind::Passive => "Passive Investment Strategy XIRR:",
            StrategyKind::MovingAverage => "60-day MA Strategy XIRR:",
        }
    }

    pub fn legend(self) -> &'static str {
        match self {
            StrategyKind::DailyRoundTrip => "Method 1 - Daily Trading",
            StrategyKind::SmartDaily => "Method 2 - Smart Daily Trading",
            StrategyKind::TrendFollowing => "Method 3 - Trend Following",
            StrategyKind::Passive => "Method 4 - Passive Trade",
            StrategyKind::MovingAverage => "Method 5 - 60-day MA",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            StrategyKind::DailyRoundTrip => "blue",
            StrategyKind::SmartDaily => "green",
            StrategyKind::TrendFollowing => "red",
            StrategyKind::Passive => "purple",
            StrategyKind::MovingAverage => "orange",
        }
    }

    pub fn run(
        self,
        series: &PriceSeries,
        principal: f64,
        label: &str,
        rate: DailyRate,
    ) -> StrategyRun {
        let run = match self {
            StrategyKind::DailyRoundTrip => {
                daily_round_trip::simulate(series, principal, label, rate)
            }
            StrategyKind::SmartDaily => smart_daily::simulate(series, principal, label, rate),
            StrategyKind::TrendFollowing => {
                trend_following::simulate(series, principal, label, rate)
            }
            StrategyKind::Passive => passive::simulate(series, principal, label, rate),
            StrategyKind::MovingAverage => {
                moving_average::simulate(series, principal, label, rate)
            }
        };
        tracing::debug!(
            strategy = self.method_name(),
            final_balance = run.summary.final_balance,
            "strategy finished"
        );
        run
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method_name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrategySummary {
    pub method: String,
    pub instrument: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub starting_balance: f64,
    pub final_balance: f64,
    pub profit: f64,
    /// Fraction of the starting balance; undefined (non-finite) for a zero principal.
    pub profit_percentage: f64,
}

impl StrategySummary {
    pub fn new(
        kind: StrategyKind,
        instrument: &str,
        series: &PriceSeries,
        starting_balance: f64,
        final_balance: f64,
    ) -> Self {
        let profit = final_balance - starting_balance;
        StrategySummary {
            method: kind.method_name().to_string(),
            instrument: instrument.to_string(),
            start: series.start_date(),
            end: series.end_date(),
            starting_balance,
            final_balance,
            profit,
            profit_percentage: profit / starting_balance,
        }
    }
}

/// Output of one strategy over one series.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyRun {
    pub kind: StrategyKind,
    pub profits: Vec<f64>,
    pub summary: StrategySummary,
}

impl StrategyRun {
    pub fn total_profit(&self) -> f64 {
        self.profits.iter().sum()
    }
}

/// Cash and share holdings carried between periods.
///
/// The simpler strategies are always fully in cash or fully in shares.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PositionState {
    pub cash: f64,
    pub shares: f64,
    pub cost_basis: f64,
}

impl PositionState {
    pub fn with_cash(cash: f64) -> Self {
        PositionState {
            cash,
            ..Default::default()
        }
    }

    pub fn is_holding(&self) -> bool {
        self.shares > 0.0
    }

    /// Convert all cash to shares at `price`.
    pub fn buy_all(&mut self, price: f64) {
        self.shares = self.cash / price;
        self.cost_basis = price;
        self.cash = 0.0;
    }

    /// Convert all shares to cash at `price`, returning shares * (price - cost_basis).
    pub fn sell_all(&mut self, price: f64) -> f64 {
        let realized = self.shares * (price - self.cost_basis);
        self.cash = self.shares * price;
        self.shares = 0.0;
        realized
    }

    /// Credit one period of interest on the cash balance and return it.
    pub fn credit_interest(&mut self, rate: DailyRate) -> f64 {
        let interest = rate.interest_on(self.cash);
        self.cash += interest;
        interest
    }
}
