//! Price data access port trait.

use crate::domain::error::RetrospectError;
use crate::domain::price::PriceSeries;
use chrono::NaiveDate;

pub trait PriceDataPort {
    /// Load the full daily series. Missing sources and missing required
    /// columns are errors; nothing downstream runs without a series.
    fn fetch_series(&self) -> Result<PriceSeries, RetrospectError>;

    /// First date, last date and observation count.
    fn data_range(&self) -> Result<(NaiveDate, NaiveDate, usize), RetrospectError> {
        let series = self.fetch_series()?;
        Ok((series.start_date(), series.end_date(), series.len()))
    }
}
