//! SVG rendering of cumulative-profit curves, implementing ChartPort.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::domain::error::RetrospectError;
use crate::domain::metrics::cumulative_profits;
use crate::domain::price::PriceSeries;
use crate::domain::strategy::StrategyRun;
use crate::ports::report_port::ChartPort;

const WIDTH: f64 = 1200.0;
const HEIGHT: f64 = 600.0;
const MARGIN_LEFT: f64 = 90.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 90.0;
const Y_TICKS: usize = 5;

pub struct SvgChartAdapter;

impl SvgChartAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SvgChartAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn generate_profit_svg(series: &PriceSeries, runs: &[StrategyRun], symbol: &str) -> String {
    let curves: Vec<Vec<f64>> = runs.iter().map(|r| cumulative_profits(&r.profits)).collect();

    let (mut min_y, mut max_y) = curves
        .iter()
        .flatten()
        .fold((0.0_f64, 0.0_f64), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if max_y - min_y <= f64::EPSILON {
        min_y -= 1.0;
        max_y += 1.0;
    }

    let plot_width = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_height = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let scale_x = if series.len() > 1 {
        plot_width / (series.len() - 1) as f64
    } else {
        0.0
    };
    let scale_y = plot_height / (max_y - min_y);
    let x_at = |i: usize| MARGIN_LEFT + i as f64 * scale_x;
    let y_at = |v: f64| MARGIN_TOP + plot_height - (v - min_y) * scale_y;

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}" font-family="sans-serif">"#,
        w = WIDTH,
        h = HEIGHT
    );
    let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="30" text-anchor="middle" font-size="18">{} Trading Strategy Comparison of Cumulative Profits</text>"#,
        WIDTH / 2.0,
        escape(symbol)
    );

    // Horizontal grid and y-axis labels.
    for tick in 0..=Y_TICKS {
        let value = min_y + (max_y - min_y) * tick as f64 / Y_TICKS as f64;
        let y = y_at(value);
        let _ = writeln!(
            svg,
            r##"<line x1="{:.1}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="#cccccc" stroke-dasharray="4,4"/>"##,
            MARGIN_LEFT,
            WIDTH - MARGIN_RIGHT
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="end" font-size="12">{:.0}</text>"#,
            MARGIN_LEFT - 8.0,
            y + 4.0,
            value
        );
    }

    // Zero line.
    let zero_y = y_at(0.0);
    let _ = writeln!(
        svg,
        r##"<line x1="{:.1}" y1="{zero_y:.1}" x2="{:.1}" y2="{zero_y:.1}" stroke="#666666"/>"##,
        MARGIN_LEFT,
        WIDTH - MARGIN_RIGHT
    );

    // Axes.
    let _ = writeln!(
        svg,
        r#"<polyline points="{l:.1},{t:.1} {l:.1},{b:.1} {r:.1},{b:.1}" fill="none" stroke="black"/>"#,
        l = MARGIN_LEFT,
        t = MARGIN_TOP,
        b = MARGIN_TOP + plot_height,
        r = WIDTH - MARGIN_RIGHT
    );

    // Date ticks: first, middle and last observation.
    let observations = series.observations();
    let mut tick_indices = vec![0, observations.len() / 2, observations.len() - 1];
    tick_indices.dedup();
    for i in tick_indices {
        let x = x_at(i);
        let y = MARGIN_TOP + plot_height + 16.0;
        let _ = writeln!(
            svg,
            r#"<text x="{x:.1}" y="{y:.1}" font-size="12" text-anchor="end" transform="rotate(-45 {x:.1} {y:.1})">{}</text>"#,
            observations[i].date
        );
    }

    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="14">Date</text>"#,
        MARGIN_LEFT + plot_width / 2.0,
        HEIGHT - 10.0
    );
    let _ = writeln!(
        svg,
        r#"<text x="20" y="{y:.1}" text-anchor="middle" font-size="14" transform="rotate(-90 20 {y:.1})">Cumulative Profit ($)</text>"#,
        y = MARGIN_TOP + plot_height / 2.0
    );

    for (run, curve) in runs.iter().zip(&curves) {
        let points: Vec<String> = curve
            .iter()
            .enumerate()
            .map(|(i, &v)| format!("{:.1},{:.1}", x_at(i), y_at(v)))
            .collect();
        let _ = writeln!(
            svg,
            r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="1.5"/>"#,
            points.join(" "),
            run.kind.color()
        );
    }

    // Legend.
    let legend_x = MARGIN_LEFT + 15.0;
    let mut legend_y = MARGIN_TOP + 15.0;
    let _ = writeln!(
        svg,
        r##"<rect x="{:.1}" y="{:.1}" width="240" height="{:.1}" fill="white" stroke="#999999"/>"##,
        legend_x - 8.0,
        legend_y - 12.0,
        runs.len() as f64 * 20.0 + 8.0
    );
    for run in runs {
        let _ = writeln!(
            svg,
            r#"<line x1="{:.1}" y1="{legend_y:.1}" x2="{:.1}" y2="{legend_y:.1}" stroke="{}" stroke-width="3"/>"#,
            legend_x,
            legend_x + 24.0,
            run.kind.color()
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" font-size="12">{}</text>"#,
            legend_x + 32.0,
            legend_y + 4.0,
            escape(run.kind.legend())
        );
        legend_y += 20.0;
    }

    svg.push_str("</svg>\n");
    svg
}

impl ChartPort for SvgChartAdapter {
    fn render(
        &self,
        series: &PriceSeries,
        runs: &[StrategyRun],
        symbol: &str,
        output_path: &Path,
    ) -> Result<(), RetrospectError> {
        fs::write(output_path, generate_profit_svg(series, runs, symbol))?;
        Ok(())
    }
}
