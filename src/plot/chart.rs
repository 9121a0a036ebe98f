//! Historical-vs-forecast chart rendering.
//!
//! Charts are written as SVG through Plotters. The x axis is the month ordinal
//! (`YearMonth::ordinal`), labelled back as `YYYY-MM`; historical sales are a
//! solid line and the forecast a dashed one.
//!
//! Rendering is a pure sink: a failure is returned as `RenderFailure` and
//! never touches the numbers it was given.

use std::fs::create_dir_all;
use std::path::{Path, PathBuf};

use plotters::prelude::*;
use plotters::series::DashedLineSeries;

use crate::domain::{ForecastResult, ProductSeries};
use crate::error::ForecastError;

pub const CHART_EXTENSION: &str = "svg";

const HISTORY_COLOR: RGBColor = RGBColor(31, 119, 180);
const FORECAST_COLOR: RGBColor = RGBColor(214, 39, 40);

/// Deterministic file name for a product's chart: spaces become `_`.
pub fn chart_file_name(product: &str) -> String {
    format!("forecast_{}.{CHART_EXTENSION}", product.replace(' ', "_"))
}

/// Render the chart into `output_dir` and return the written path.
pub fn render_forecast_chart(
    output_dir: &Path,
    series: &ProductSeries,
    forecast: &ForecastResult,
    size: (u32, u32),
) -> Result<PathBuf, ForecastError> {
    let path = output_dir.join(chart_file_name(&series.product));
    let failure = |message: String| ForecastError::RenderFailure {
        path: path.clone(),
        message,
    };

    create_dir_all(output_dir).map_err(|e| failure(format!("cannot create output directory: {e}")))?;

    let history = history_line(series);
    let future = forecast_line(forecast);
    let Some((x_bounds, y_bounds)) = bounds(&history, &future) else {
        return Err(failure("nothing to plot".to_string()));
    };

    draw(&path, &series.product, &history, &future, x_bounds, y_bounds, size).map_err(|e| failure(e.to_string()))?;
    Ok(path)
}

fn history_line(series: &ProductSeries) -> Vec<(f64, f64)> {
    let mut pts: Vec<(f64, f64)> = series
        .points
        .iter()
        .map(|p| (p.period.ordinal() as f64, p.monthly_sales as f64))
        .collect();
    pts.sort_by(|a, b| a.0.total_cmp(&b.0));
    pts
}

fn forecast_line(forecast: &ForecastResult) -> Vec<(f64, f64)> {
    forecast
        .points
        .iter()
        .map(|p| (p.period.ordinal() as f64, p.predicted_sales))
        .collect()
}

fn bounds(history: &[(f64, f64)], future: &[(f64, f64)]) -> Option<([f64; 2], [f64; 2])> {
    let all = history.iter().chain(future.iter());
    let (mut x0, mut x1) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y0, mut y1) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in all {
        x0 = x0.min(x);
        x1 = x1.max(x);
        y0 = y0.min(y);
        y1 = y1.max(y);
    }
    if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) {
        return None;
    }

    // A single month or a flat line still needs a non-empty range.
    if x1 - x0 < 1.0 {
        x0 -= 1.0;
        x1 += 1.0;
    }
    let pad = ((y1 - y0) * 0.05).max(y1.abs().max(1.0) * 0.01);
    Some(([x0, x1], [y0 - pad, y1 + pad]))
}

fn month_label(ordinal: f64) -> String {
    let ordinal = ordinal.round() as i64;
    let year = ordinal.div_euclid(12);
    let month = ordinal.rem_euclid(12) + 1;
    format!("{year:04}-{month:02}")
}

fn draw(
    path: &Path,
    product: &str,
    history: &[(f64, f64)],
    future: &[(f64, f64)],
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    size: (u32, u32),
) -> Result<(), Box<dyn std::error::Error>> {
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Sales Forecast for {product}"), ("sans-serif", 24))
        .margin(16)
        .set_label_area_size(LabelAreaPosition::Left, 70)
        .set_label_area_size(LabelAreaPosition::Bottom, 50)
        .build_cartesian_2d(x_bounds[0]..x_bounds[1], y_bounds[0]..y_bounds[1])?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Monthly Sales")
        .x_labels(8)
        .y_labels(8)
        .x_label_formatter(&|v| month_label(*v))
        .y_label_formatter(&|v| format!("{v:.0}"))
        .light_line_style(WHITE.mix(0.0))
        .bold_line_style(BLACK.mix(0.1))
        .draw()?;

    // 1) Historical sales.
    chart
        .draw_series(LineSeries::new(history.iter().copied(), HISTORY_COLOR.stroke_width(2)))?
        .label("Historical Sales")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], HISTORY_COLOR.stroke_width(2)));

    // 2) Forecast, dashed.
    chart
        .draw_series(DashedLineSeries::new(
            future.iter().copied(),
            8,
            5,
            FORECAST_COLOR.stroke_width(2),
        ))?
        .label("Forecasted Sales")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], FORECAST_COLOR.stroke_width(2)));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_replaces_spaces() {
        assert_eq!(chart_file_name("Laptop Pro"), "forecast_Laptop_Pro.svg");
        assert_eq!(chart_file_name("Wireless Headphones"), "forecast_Wireless_Headphones.svg");
    }

    #[test]
    fn month_labels_roundtrip_ordinals() {
        let jan = crate::domain::YearMonth::new(2024, 1).unwrap();
        assert_eq!(month_label(jan.ordinal() as f64), "2024-01");
        assert_eq!(month_label(jan.ordinal() as f64 - 1.0), "2023-12");
    }

    #[test]
    fn bounds_widen_degenerate_ranges() {
        let (x, y) = bounds(&[(10.0, 5.0)], &[]).unwrap();
        assert!(x[1] > x[0]);
        assert!(y[1] > y[0]);
        assert!(bounds(&[], &[]).is_none());
    }
}
