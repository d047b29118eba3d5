//! Moving-average crossover on the closing price.
//!
//! While the trailing average warms up, the balance sits in cash and earns
//! interest. Afterwards the strategy buys at the close when price is above the
//! average and sells at the close when it drops below. Idle cash keeps earning
//! interest; a held position books nothing until it is sold.

use super::{PositionState, StrategyKind, StrategyRun, StrategySummary};
use crate::domain::indicator::calculate_sma;
use crate::domain::price::PriceSeries;
use crate::domain::rates::DailyRate;

pub const WINDOW: usize = 60;

pub fn simulate(series: &PriceSeries, principal: f64, label: &str, rate: DailyRate) -> StrategyRun {
    let sma = calculate_sma(series, WINDOW);
    let mut state = PositionState::with_cash(principal);
    let mut profits = vec![0.0; series.len()];

    for ((profit, obs), average) in profits.iter_mut().zip(series).zip(&sma) {
        if !obs.is_tradable() {
            continue;
        }
        if !average.valid {
            *profit += state.credit_interest(rate);
            continue;
        }

        let price = obs.close;
        let holding = state.is_holding();
        if price > average.value && !holding {
            state.buy_all(price);
        } else if price < average.value && holding {
            let cost = state.shares * state.cost_basis;
            state.sell_all(price);
            *profit = state.cash - cost;
            *profit += state.credit_interest(rate);
        } else if !holding {
            *profit += state.credit_interest(rate);
        }
    }

    if state.is_holding() {
        let last = profits.len() - 1;
        profits[last] += state.sell_all(series.last().close);
    }

    StrategyRun {
        kind: StrategyKind::MovingAverage,
        profits,
        summary: StrategySummary::new(
            StrategyKind::MovingAverage,
            label,
            series,
            principal,
            state.cash,
        ),
    }
}
