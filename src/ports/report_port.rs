//! Report and chart output port traits.

use std::path::Path;

use crate::domain::error::RetrospectError;
use crate::domain::price::PriceSeries;
use crate::domain::strategy::StrategyRun;

/// Port for writing the per-strategy summary report.
pub trait ReportPort {
    fn write(&self, runs: &[StrategyRun], output_path: &Path) -> Result<(), RetrospectError>;
}

/// Port for rendering cumulative-profit curves to an image file.
pub trait ChartPort {
    fn render(
        &self,
        series: &PriceSeries,
        runs: &[StrategyRun],
        symbol: &str,
        output_path: &Path,
    ) -> Result<(), RetrospectError>;
}
