//! Derived series and statistics over a strategy's profit stream.

use chrono::NaiveDate;

use crate::domain::price::PriceSeries;

#[derive(Debug, Clone, PartialEq)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub equity: f64,
}

/// Running sum of per-period profits.
pub fn cumulative_profits(profits: &[f64]) -> Vec<f64> {
    profits
        .iter()
        .scan(0.0, |total, p| {
            *total += p;
            Some(*total)
        })
        .collect()
}

/// Realized account value after each period: principal plus cumulative profit.
pub fn equity_curve(series: &PriceSeries, principal: f64, profits: &[f64]) -> Vec<EquityPoint> {
    series
        .iter()
        .zip(cumulative_profits(profits))
        .map(|(obs, total)| EquityPoint {
            date: obs.date,
            equity: principal + total,
        })
        .collect()
}

/// Largest peak-to-trough decline as a fraction of the peak.
pub fn max_drawdown(equity_curve: &[EquityPoint]) -> f64 {
    let Some(first) = equity_curve.first() else {
        return 0.0;
    };

    let mut peak = first.equity;
    let mut max_dd = 0.0_f64;

    for point in equity_curve {
        if point.equity > peak {
            peak = point.equity;
        } else if peak > 0.0 {
            let dd = (peak - point.equity) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }

    max_dd
}
