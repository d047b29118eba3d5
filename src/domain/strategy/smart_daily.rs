//! Conditional daily round trip.
//!
//! Cash is always put to work at the open. Shares are only sold at the close
//! when the close beats the open; otherwise they are carried into the next
//! period. Only realized trades produce profit entries. Any position still
//! open after the last period is liquidated at the final close.

use super::{PositionState, StrategyKind, StrategyRun, StrategySummary};
use crate::domain::price::PriceSeries;
use crate::domain::rates::DailyRate;

pub fn simulate(series: &PriceSeries, principal: f64, label: &str, rate: DailyRate) -> StrategyRun {
    let mut state = PositionState::with_cash(principal);
    let mut profits = vec![0.0; series.len()];

    for (profit, obs) in profits.iter_mut().zip(series) {
        if !obs.is_tradable() {
            continue;
        }
        if state.cash > 0.0 {
            state.buy_all(obs.open);
        }
        if obs.close > obs.open {
            *profit = state.sell_all(obs.close);
            *profit += state.credit_interest(rate);
        }
    }

    if state.is_holding() {
        let last = profits.len() - 1;
        profits[last] += state.sell_all(series.last().close);
    }

    StrategyRun {
        kind: StrategyKind::SmartDaily,
        profits,
        summary: StrategySummary::new(
            StrategyKind::SmartDaily,
            label,
            series,
            principal,
            state.cash,
        ),
    }
}
