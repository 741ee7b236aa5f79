//! Chart Rendering
//!
//! Two stacked panes on a dark background: price on top, RSI below with
//! dashed guides at 70/30 and shaded overbought/oversold bands. Rendered
//! to SVG in memory, so no display or font files are needed.

use plotters::prelude::*;

use crate::error::{AdvisorError, Result};
use crate::model::{Lookback, PriceSeries};

const WIDTH: u32 = 1200;
const HEIGHT: u32 = 800;
const PRICE_PANE_HEIGHT: i32 = 560;

const BACKGROUND: RGBColor = RGBColor(18, 18, 18);
const GRID: RGBColor = RGBColor(80, 80, 80);
const PRICE_LINE: RGBColor = RGBColor(235, 235, 235);
const RSI_LINE: RGBColor = RGBColor(0, 200, 200);
const OVERBOUGHT: RGBColor = RGBColor(220, 70, 70);
const OVERSOLD: RGBColor = RGBColor(70, 190, 100);

/// RSI guide levels drawn on the lower pane
const OVERBOUGHT_LEVEL: f64 = 70.0;
const OVERSOLD_LEVEL: f64 = 30.0;

/// Render the price + RSI chart for a fetched series.
///
/// `rsi` must be index-aligned with the series (warm-up entries `None`).
/// Returns the SVG document bytes.
pub fn render_rsi_chart(
    series: &PriceSeries,
    rsi: &[Option<f64>],
    coin_id: &str,
    lookback: Lookback,
) -> Result<Vec<u8>> {
    let closes = series.closes();
    if closes.len() < 2 || closes.len() != rsi.len() {
        return Err(AdvisorError::Chart(format!(
            "series of {} closes and {} rsi values cannot be plotted",
            closes.len(),
            rsi.len()
        )));
    }

    let timestamps: Vec<_> = series.points().iter().map(|p| p.timestamp).collect();
    let x_max = (closes.len() - 1) as f64;

    let mut price_min = f64::INFINITY;
    let mut price_max = f64::NEG_INFINITY;
    for close in &closes {
        price_min = price_min.min(*close);
        price_max = price_max.max(*close);
    }
    let pad = ((price_max - price_min) * 0.03).max(price_max * 0.001);

    let label_for = |x: &f64| -> String {
        let idx = (x.round() as usize).min(timestamps.len() - 1);
        timestamps[idx].format("%m-%d").to_string()
    };

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&BACKGROUND)
            .map_err(|e| AdvisorError::Chart(e.to_string()))?;

        let (upper, lower) = root.split_vertically(PRICE_PANE_HEIGHT);

        // ── Price pane ──────────────────────────────────────────────────
        let mut price_chart = ChartBuilder::on(&upper)
            .caption(
                format!(
                    "Price and RSI for {} over {}",
                    crate::text::capitalize(coin_id),
                    lookback
                ),
                ("sans-serif", 28).into_font().color(&WHITE),
            )
            .margin(12)
            .x_label_area_size(30)
            .y_label_area_size(80)
            .build_cartesian_2d(0.0..x_max, (price_min - pad)..(price_max + pad))
            .map_err(|e| AdvisorError::Chart(e.to_string()))?;

        price_chart
            .configure_mesh()
            .axis_style(&WHITE.mix(0.6))
            .bold_line_style(&GRID.mix(0.4))
            .light_line_style(&TRANSPARENT)
            .label_style(("sans-serif", 14).into_font().color(&WHITE))
            .x_label_formatter(&label_for)
            .draw()
            .map_err(|e| AdvisorError::Chart(e.to_string()))?;

        price_chart
            .draw_series(LineSeries::new(
                closes.iter().enumerate().map(|(i, c)| (i as f64, *c)),
                &PRICE_LINE,
            ))
            .map_err(|e| AdvisorError::Chart(e.to_string()))?
            .label(format!("{} price (USD)", crate::text::capitalize(coin_id)))
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], &PRICE_LINE));

        price_chart
            .configure_series_labels()
            .border_style(&WHITE.mix(0.4))
            .background_style(&BACKGROUND.mix(0.85))
            .label_font(("sans-serif", 14).into_font().color(&WHITE))
            .draw()
            .map_err(|e| AdvisorError::Chart(e.to_string()))?;

        // ── RSI pane ────────────────────────────────────────────────────
        let mut rsi_chart = ChartBuilder::on(&lower)
            .margin(12)
            .x_label_area_size(30)
            .y_label_area_size(80)
            .build_cartesian_2d(0.0..x_max, 0.0..100.0)
            .map_err(|e| AdvisorError::Chart(e.to_string()))?;

        rsi_chart
            .configure_mesh()
            .axis_style(&WHITE.mix(0.6))
            .bold_line_style(&GRID.mix(0.4))
            .light_line_style(&TRANSPARENT)
            .y_labels(5)
            .label_style(("sans-serif", 14).into_font().color(&WHITE))
            .x_label_formatter(&label_for)
            .draw()
            .map_err(|e| AdvisorError::Chart(e.to_string()))?;

        // Shaded overbought/oversold bands
        rsi_chart
            .draw_series([
                Rectangle::new(
                    [(0.0, OVERBOUGHT_LEVEL), (x_max, 100.0)],
                    OVERBOUGHT.mix(0.15).filled(),
                ),
                Rectangle::new(
                    [(0.0, 0.0), (x_max, OVERSOLD_LEVEL)],
                    OVERSOLD.mix(0.15).filled(),
                ),
            ])
            .map_err(|e| AdvisorError::Chart(e.to_string()))?;

        // Dashed guide lines
        for (level, color) in [(OVERBOUGHT_LEVEL, OVERBOUGHT), (OVERSOLD_LEVEL, OVERSOLD)] {
            rsi_chart
                .draw_series(DashedLineSeries::new(
                    [(0.0, level), (x_max, level)],
                    8,
                    6,
                    ShapeStyle::from(&color),
                ))
                .map_err(|e| AdvisorError::Chart(e.to_string()))?;
        }

        rsi_chart
            .draw_series(LineSeries::new(
                rsi.iter()
                    .enumerate()
                    .filter_map(|(i, v)| v.map(|v| (i as f64, v))),
                &RSI_LINE,
            ))
            .map_err(|e| AdvisorError::Chart(e.to_string()))?;

        root.present()
            .map_err(|e| AdvisorError::Chart(e.to_string()))?;
    }

    Ok(svg.into_bytes())
}

/// Filename for a rendered chart attachment
pub fn chart_filename(coin_id: &str) -> String {
    format!("{}_rsi_chart.svg", coin_id)
}
