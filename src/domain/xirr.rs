//! Annualized rate of return over irregularly dated cashflows (XIRR).
//!
//! Solves sum(cf_i / (1 + r)^((d_i - d_0) / 365)) = 0 for r. Newton-Raphson
//! from a 10% guess, falling back to bisection over a bracketing interval when
//! Newton leaves the domain (r <= -1) or stalls.

use chrono::NaiveDate;

use crate::domain::price::PriceSeries;
use crate::domain::rates::DAYS_PER_YEAR;

const INITIAL_GUESS: f64 = 0.1;
const TOLERANCE: f64 = 1e-10;
const MAX_NEWTON_ITERATIONS: usize = 100;
const MAX_BISECTION_ITERATIONS: usize = 1_000;
const LOWER_BOUND: f64 = -0.999_999_999;
const UPPER_LIMIT: f64 = 1e10;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum XirrError {
    #[error("at least two cashflows are required, got {0}")]
    NotEnoughCashflows(usize),

    #[error("cashflows need at least one negative and one positive value")]
    NoSignChange,

    #[error("cashflows must span more than one date")]
    ZeroSpan,

    #[error("rate did not converge")]
    NotConverged,
}

fn year_fractions(cashflows: &[(NaiveDate, f64)]) -> Vec<(f64, f64)> {
    let origin = cashflows
        .iter()
        .map(|(d, _)| *d)
        .min()
        .unwrap_or(NaiveDate::MIN);
    cashflows
        .iter()
        .map(|(d, cf)| ((*d - origin).num_days() as f64 / DAYS_PER_YEAR, *cf))
        .collect()
}

fn npv(rate: f64, flows: &[(f64, f64)]) -> f64 {
    flows
        .iter()
        .map(|(t, cf)| cf / (1.0 + rate).powf(*t))
        .sum()
}

fn npv_derivative(rate: f64, flows: &[(f64, f64)]) -> f64 {
    flows
        .iter()
        .map(|(t, cf)| -t * cf / (1.0 + rate).powf(t + 1.0))
        .sum()
}

fn newton(flows: &[(f64, f64)]) -> Option<f64> {
    let mut rate = INITIAL_GUESS;
    for _ in 0..MAX_NEWTON_ITERATIONS {
        let value = npv(rate, flows);
        let slope = npv_derivative(rate, flows);
        if slope == 0.0 || !slope.is_finite() {
            return None;
        }
        let next = rate - value / slope;
        if !next.is_finite() || next <= -1.0 {
            return None;
        }
        if (next - rate).abs() < TOLERANCE {
            return Some(next);
        }
        rate = next;
    }
    None
}

fn bisection(flows: &[(f64, f64)]) -> Option<f64> {
    let mut low = LOWER_BOUND;
    let mut high = 1.0;
    let low_value = npv(low, flows);

    while npv(high, flows).signum() == low_value.signum() {
        high *= 2.0;
        if high > UPPER_LIMIT {
            return None;
        }
    }

    for _ in 0..MAX_BISECTION_ITERATIONS {
        let mid = (low + high) / 2.0;
        let value = npv(mid, flows);
        if value == 0.0 || (high - low) / 2.0 < TOLERANCE {
            return Some(mid);
        }
        if value.signum() == npv(low, flows).signum() {
            low = mid;
        } else {
            high = mid;
        }
    }
    None
}

pub fn xirr(cashflows: &[(NaiveDate, f64)]) -> Result<f64, XirrError> {
    if cashflows.len() < 2 {
        return Err(XirrError::NotEnoughCashflows(cashflows.len()));
    }
    let has_negative = cashflows.iter().any(|(_, cf)| *cf < 0.0);
    let has_positive = cashflows.iter().any(|(_, cf)| *cf > 0.0);
    if !has_negative || !has_positive {
        return Err(XirrError::NoSignChange);
    }

    let flows = year_fractions(cashflows);
    if flows.iter().all(|(t, _)| *t == 0.0) {
        return Err(XirrError::ZeroSpan);
    }

    newton(&flows)
        .or_else(|| bisection(&flows))
        .filter(|r| r.is_finite())
        .ok_or(XirrError::NotConverged)
}

/// Annualized rate for a strategy that turns `principal` into
/// `principal + sum(profits)` between the first and last observation.
///
/// `None` is the explicit "could not calculate" result.
pub fn strategy_xirr(series: &PriceSeries, profits: &[f64], principal: f64) -> Option<f64> {
    let final_value = principal + profits.iter().sum::<f64>();
    let cashflows = [
        (series.start_date(), -principal),
        (series.end_date(), final_value),
    ];
    match xirr(&cashflows) {
        Ok(rate) => Some(rate),
        Err(e) => {
            tracing::warn!(
                error = %e,
                principal,
                final_value,
                start = %series.start_date(),
                end = %series.end_date(),
                "XIRR calculation failed"
            );
            None
        }
    }
}
