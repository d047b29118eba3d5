//! Daily round trip: buy everything at the open, sell everything at the close.
//!
//! The whole balance is back in cash at the end of each period, so every
//! tradable period also earns one period of interest.

use super::{StrategyKind, StrategyRun, StrategySummary};
use crate::domain::price::PriceSeries;
use crate::domain::rates::DailyRate;

pub fn simulate(series: &PriceSeries, principal: f64, label: &str, rate: DailyRate) -> StrategyRun {
    let growth = 1.0 + rate.value();
    let mut balance = principal;
    let mut profits = vec![0.0; series.len()];

    for (profit, obs) in profits.iter_mut().zip(series) {
        if !obs.is_tradable() {
            continue;
        }
        let shares = balance / obs.open;
        let mut period_profit = shares * obs.close - balance;
        balance += period_profit;
        balance *= growth;
        period_profit += balance - balance / growth;
        *profit = period_profit;
    }

    StrategyRun {
        kind: StrategyKind::DailyRoundTrip,
        profits,
        summary: StrategySummary::new(
            StrategyKind::DailyRoundTrip,
            label,
            series,
            principal,
            balance,
        ),
    }
}
