//! Trend following on overnight gaps.
//!
//! The first period only seeds the reference close. After that, a gap is
//! meaningful when the open moves more than [`GAP_THRESHOLD`] away from the
//! previous close:
//!
//! - gap up: buy with idle cash at the open, sell at the close if it finished
//!   above the purchase price
//! - gap down: sell any holding at the close; if the close is also below the
//!   open, buy straight back in at the close
//!
//! Cash that ends the period idle earns one period of interest. Without a
//! meaningful gap the position is left alone.

use super::{PositionState, StrategyKind, StrategyRun, StrategySummary};
use crate::domain::price::PriceSeries;
use crate::domain::rates::DailyRate;

pub const GAP_THRESHOLD: f64 = 0.01;

pub fn simulate(series: &PriceSeries, principal: f64, label: &str, rate: DailyRate) -> StrategyRun {
    let mut state = PositionState::with_cash(principal);
    let mut profits = vec![0.0; series.len()];
    let mut prior_close = series.first().close;

    for (profit, obs) in profits.iter_mut().zip(series).skip(1) {
        // A skipped period is ignored entirely, including as the next reference close.
        if !obs.is_tradable() {
            continue;
        }

        let mut left_idle = false;
        if obs.open > prior_close * (1.0 + GAP_THRESHOLD) {
            if state.cash > 0.0 {
                state.buy_all(obs.open);
                if obs.close > state.cost_basis {
                    *profit = state.sell_all(obs.close);
                    left_idle = true;
                }
            }
        } else if obs.open < prior_close * (1.0 - GAP_THRESHOLD) && state.is_holding() {
            *profit = state.sell_all(obs.close);
            left_idle = true;
            if obs.close < obs.open {
                state.buy_all(obs.close);
                left_idle = false;
            }
        }

        if left_idle {
            *profit += state.credit_interest(rate);
        }
        prior_close = obs.close;
    }

    // Proceeds stay in the final balance and are added to, not written over,
    // the last period's entry.
    if state.is_holding() {
        let last = profits.len() - 1;
        profits[last] += state.sell_all(series.last().close);
    }

    StrategyRun {
        kind: StrategyKind::TrendFollowing,
        profits,
        summary: StrategySummary::new(
            StrategyKind::TrendFollowing,
            label,
            series,
            principal,
            state.cash,
        ),
    }
}
