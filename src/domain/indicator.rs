//! Trailing simple moving average over closing prices.
//!
//! SMA[i] = mean(C[i-n+1..=i]). Warmup: first (n-1) points are invalid.

use chrono::NaiveDate;

use crate::domain::price::PriceSeries;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub valid: bool,
    pub value: f64,
}

pub fn calculate_sma(series: &PriceSeries, period: usize) -> Vec<IndicatorPoint> {
    if period == 0 {
        return Vec::new();
    }

    let closes = series.closes();
    let mut values = Vec::with_capacity(closes.len());

    for (i, obs) in series.iter().enumerate() {
        if i + 1 < period {
            values.push(IndicatorPoint {
                date: obs.date,
                valid: false,
                value: 0.0,
            });
        } else {
            let window = &closes[i + 1 - period..=i];
            let mean = window.iter().sum::<f64>() / period as f64;
            values.push(IndicatorPoint {
                date: obs.date,
                valid: true,
                value: mean,
            });
        }
    }

    values
}
