//! Passive buy and hold.
//!
//! The principal buys as many shares as it can at the first tradable open and
//! holds them to the end. The entry period is credited one period of interest
//! on the principal; that interest stays in cash for the rest of the run. The
//! holding gain is booked in the final period.

use super::{StrategyKind, StrategyRun, StrategySummary};
use crate::domain::price::PriceSeries;
use crate::domain::rates::DailyRate;

pub fn simulate(series: &PriceSeries, principal: f64, label: &str, rate: DailyRate) -> StrategyRun {
    let mut profits = vec![0.0; series.len()];
    let last = profits.len() - 1;

    let final_balance = match series.iter().position(|obs| obs.is_tradable()) {
        Some(entry) => {
            let entry_price = series.observations()[entry].open;
            let shares = principal / entry_price;
            let interest = rate.interest_on(principal);
            profits[entry] += interest;

            let final_close = series.last().close;
            profits[last] += (final_close - entry_price) * shares;
            shares * final_close + interest
        }
        None => principal,
    };

    StrategyRun {
        kind: StrategyKind::Passive,
        profits,
        summary: StrategySummary::new(
            StrategyKind::Passive,
            label,
            series,
            principal,
            final_balance,
        ),
    }
}
