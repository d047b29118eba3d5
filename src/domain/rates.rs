//! Interest credited on idle cash.

pub const DEFAULT_ANNUAL_CREDIT_RATE: f64 = 0.04;
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Per-period rate that compounds daily to a nominal annual rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyRate(f64);

impl DailyRate {
    /// (1 + annual)^(1/365) - 1
    pub fn from_annual(annual: f64) -> Self {
        DailyRate((1.0 + annual).powf(1.0 / DAYS_PER_YEAR) - 1.0)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Interest earned by `balance` over one period.
    pub fn interest_on(self, balance: f64) -> f64 {
        balance * self.0
    }
}

impl Default for DailyRate {
    fn default() -> Self {
        Self::from_annual(DEFAULT_ANNUAL_CREDIT_RATE)
    }
}
