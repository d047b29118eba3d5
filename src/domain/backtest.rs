//! Backtest configuration and the fan-out over all strategies.
//!
//! Strategies and their rate computations are independent, so both stages run
//! on the rayon pool. Results come back in [`StrategyKind::ALL`] order no matter
//! which task finishes first.

use rayon::prelude::*;

use crate::domain::price::PriceSeries;
use crate::domain::rates::DailyRate;
use crate::domain::strategy::{StrategyKind, StrategyRun};
use crate::domain::xirr::strategy_xirr;

#[derive(Debug, Clone)]
pub struct BacktestConfig {
    pub symbol: String,
    pub principal: f64,
    pub daily_rate: DailyRate,
}

pub fn run_strategies(series: &PriceSeries, config: &BacktestConfig) -> Vec<StrategyRun> {
    StrategyKind::ALL
        .par_iter()
        .map(|kind| kind.run(series, config.principal, &config.symbol, config.daily_rate))
        .collect()
}

/// One annualized rate per run, `None` where it could not be calculated.
pub fn annualized_rates(
    series: &PriceSeries,
    runs: &[StrategyRun],
    principal: f64,
) -> Vec<Option<f64>> {
    runs.par_iter()
        .map(|run| strategy_xirr(series, &run.profits, principal))
        .collect()
}
