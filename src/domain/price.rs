//! Daily price observations and the validated series every strategy reads.

use chrono::NaiveDate;

use super::error::RetrospectError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceObservation {
    pub date: NaiveDate,
    pub open: f64,
    pub close: f64,
}

impl PriceObservation {
    pub fn new(date: NaiveDate, open: f64, close: f64) -> Self {
        Self { date, open, close }
    }

    /// A non-positive open cannot be traded against; strategies skip the period.
    pub fn is_tradable(&self) -> bool {
        self.open > 0.0
    }
}

/// Non-empty, strictly date-ascending sequence of observations.
///
/// Construction is the only place ordering is checked; afterwards the series is
/// read-only and can be shared freely between strategy runs.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    observations: Vec<PriceObservation>,
}

impl PriceSeries {
    pub fn new(observations: Vec<PriceObservation>) -> Result<Self, RetrospectError> {
        if observations.is_empty() {
            return Err(RetrospectError::EmptySeries {
                source_name: "price series".into(),
            });
        }
        for pair in observations.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(RetrospectError::UnorderedSeries {
                    previous: pair[0].date,
                    next: pair[1].date,
                });
            }
        }
        Ok(Self { observations })
    }

    /// Collapse rows that share a calendar date into one daily observation:
    /// the first row's open and the last row's close. Rows must already be in
    /// timestamp order.
    pub fn from_intraday(rows: Vec<PriceObservation>) -> Result<Self, RetrospectError> {
        let mut daily: Vec<PriceObservation> = Vec::with_capacity(rows.len());
        for row in rows {
            match daily.last_mut() {
                Some(day) if day.date == row.date => day.close = row.close,
                _ => daily.push(row),
            }
        }
        Self::new(daily)
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn first(&self) -> &PriceObservation {
        &self.observations[0]
    }

    pub fn last(&self) -> &PriceObservation {
        &self.observations[self.observations.len() - 1]
    }

    pub fn start_date(&self) -> NaiveDate {
        self.first().date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.last().date
    }

    pub fn observations(&self) -> &[PriceObservation] {
        &self.observations
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PriceObservation> {
        self.observations.iter()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.close).collect()
    }
}

impl<'a> IntoIterator for &'a PriceSeries {
    type Item = &'a PriceObservation;
    type IntoIter = std::slice::Iter<'a, PriceObservation>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.iter()
    }
}
