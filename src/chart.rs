//! Data and options handed to the charting library on the page.
//!
//! The page reads a [`ChartModel`] as JSON and feeds `data` straight into a
//! dual-axis line chart. Field names follow the charting library's dataset
//! keys (`borderColor`, `yAxisID`, ...) so no client-side remapping is needed.

use serde::Serialize;

use crate::axes::PlotBounds;
use crate::physics::{sample_series, BoxParams, SampledSeries, NUM_INTERVALS};

pub const WAVE_AXIS_ID: &str = "yPsi";
pub const DENSITY_AXIS_ID: &str = "yProb";

const WAVE_NAME: &str = "Wave Pattern";
const DENSITY_NAME: &str = "Probability Distribution";

/// Decimal places for grid labels on the category axis
pub const LABEL_PRECISION: usize = 3;
/// Decimal places for tick labels on the x axis
pub const TICK_PRECISION: usize = 2;
/// Decimal places in hover tooltips
pub const TOOLTIP_PRECISION: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    pub border_color: &'static str,
    pub background_color: &'static str,
    pub tension: f64,
    pub point_radius: u32,
    pub border_width: u32,
    pub fill: bool,
    #[serde(rename = "yAxisID")]
    pub y_axis_id: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTitles {
    pub x: String,
    pub wave: String,
    pub density: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartOptions {
    pub title: String,
    pub bounds: PlotBounds,
    pub axis_titles: AxisTitles,
    pub tick_precision: usize,
    pub tooltip_precision: usize,
}

/// Everything needed to draw one configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartModel {
    pub params: BoxParams,
    pub series: SampledSeries,
    pub data: ChartData,
    pub options: ChartOptions,
    pub captions: Vec<String>,
}

impl ChartModel {
    pub fn build(params: BoxParams) -> Self {
        let series = sample_series(params);
        let length = params.effective_length();
        let suffix = legend_suffix(params.level, length, params.normalized);

        let labels = series
            .grid
            .iter()
            .map(|x| format!("{x:.prec$}", prec = LABEL_PRECISION))
            .collect();

        let wave = Dataset {
            label: format!("{WAVE_NAME} {suffix}"),
            data: series.wave.clone(),
            border_color: "rgb(54, 162, 235)",
            background_color: "rgba(54, 162, 235, 0.1)",
            tension: 0.1,
            point_radius: 0,
            border_width: 2,
            fill: false,
            y_axis_id: WAVE_AXIS_ID,
        };
        let density = Dataset {
            label: format!("{DENSITY_NAME} {suffix}"),
            data: series.density.clone(),
            border_color: "rgb(255, 99, 132)",
            background_color: "rgba(255, 99, 132, 0.3)",
            tension: 0.1,
            point_radius: 0,
            border_width: 2,
            fill: true,
            y_axis_id: DENSITY_AXIS_ID,
        };

        let scaled = if params.normalized { " (Scaled)" } else { "" };
        let options = ChartOptions {
            title: format!(
                "Particle in a Box (Length={length:.2}) - Energy Level {}",
                params.level
            ),
            bounds: PlotBounds::for_params(params),
            axis_titles: AxisTitles {
                x: "Position (x)".to_string(),
                wave: format!("{WAVE_NAME}{scaled}"),
                density: format!("{DENSITY_NAME}{scaled}"),
            },
            tick_precision: TICK_PRECISION,
            tooltip_precision: TOOLTIP_PRECISION,
        };

        ChartModel {
            params,
            series,
            data: ChartData {
                labels,
                datasets: vec![wave, density],
            },
            options,
            captions: formula_captions(params.normalized),
        }
    }
}

fn legend_suffix(level: u32, length: f64, normalized: bool) -> String {
    let scaled = if normalized { ", Scaled" } else { "" };
    format!("(n={level}, L={length:.2}{scaled})")
}

/// Closed forms shown under the chart
pub fn formula_captions(normalized: bool) -> Vec<String> {
    let (wave_factor, density_factor) = if normalized {
        ("√(2/L) × ", "(2/L) × ")
    } else {
        ("", "")
    };
    vec![
        format!("{WAVE_NAME} = {wave_factor}sin(n×π×x/L) when x is between 0 and L"),
        format!("{DENSITY_NAME} = {density_factor}sin²(n×π×x/L) when x is between 0 and L"),
    ]
}

/// Tooltip heading for the hovered grid index
pub fn tooltip_title(index: usize, length: f64) -> String {
    let x = index as f64 * (length / NUM_INTERVALS as f64);
    format!("x = {x:.prec$}", prec = TOOLTIP_PRECISION)
}

/// Tooltip line: the dataset name without its parameter suffix, then the value
pub fn tooltip_label(dataset_label: &str, value: f64) -> String {
    let name = dataset_label.split(" (").next().unwrap_or_default();
    if name.is_empty() {
        format!("{value:.prec$}", prec = TOOLTIP_PRECISION)
    } else {
        format!("{name}: {value:.prec$}", prec = TOOLTIP_PRECISION)
    }
}

pub fn format_tick(value: f64) -> String {
    format!("{value:.prec$}", prec = TICK_PRECISION)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(level: u32, length: f64, normalized: bool) -> ChartModel {
        ChartModel::build(BoxParams::new(level, length, normalized).unwrap())
    }

    #[test]
    fn test_titles_and_legends() {
        let m = model(3, 2.5, false);
        assert_eq!(
            m.options.title,
            "Particle in a Box (Length=2.50) - Energy Level 3"
        );
        assert_eq!(m.data.datasets[0].label, "Wave Pattern (n=3, L=2.50)");
        assert_eq!(
            m.data.datasets[1].label,
            "Probability Distribution (n=3, L=2.50)"
        );
        assert_eq!(m.options.axis_titles.wave, "Wave Pattern");
        assert_eq!(m.options.axis_titles.density, "Probability Distribution");
    }

    #[test]
    fn test_scaled_labels() {
        let m = model(1, 1.0, true);
        assert_eq!(m.data.datasets[0].label, "Wave Pattern (n=1, L=1.00, Scaled)");
        assert_eq!(m.options.axis_titles.wave, "Wave Pattern (Scaled)");
        assert_eq!(
            m.options.axis_titles.density,
            "Probability Distribution (Scaled)"
        );
        assert!(m.captions[0].starts_with("Wave Pattern = √(2/L) × sin"));
        assert!(m.captions[1].starts_with("Probability Distribution = (2/L) × sin²"));
    }

    #[test]
    fn test_datasets_match_series() {
        let m = model(5, 1.2, true);
        assert_eq!(m.data.labels.len(), 201);
        assert_eq!(m.data.labels[0], "0.000");
        assert_eq!(m.data.labels[200], "1.200");
        assert_eq!(m.data.datasets[0].data, m.series.wave);
        assert_eq!(m.data.datasets[1].data, m.series.density);
        assert!(!m.data.datasets[0].fill);
        assert!(m.data.datasets[1].fill);
        assert_eq!(m.data.datasets[0].y_axis_id, WAVE_AXIS_ID);
        assert_eq!(m.data.datasets[1].y_axis_id, DENSITY_AXIS_ID);
    }

    #[test]
    fn test_dataset_json_keys() {
        let json = serde_json::to_value(model(1, 1.0, false)).unwrap();
        let first = &json["data"]["datasets"][0];
        assert_eq!(first["yAxisID"], "yPsi");
        assert_eq!(first["borderColor"], "rgb(54, 162, 235)");
        assert_eq!(first["pointRadius"], 0);
        assert_eq!(json["options"]["bounds"]["x"]["max"], 1.0);
    }

    #[test]
    fn test_tooltip_text() {
        assert_eq!(tooltip_title(100, 1.0), "x = 0.5000");
        assert_eq!(tooltip_title(1, 2.0), "x = 0.0100");
        let far = tooltip_title(200, 1e307);
        assert!(far.starts_with("x = 1") && !far.contains("inf"), "{far}");
        assert_eq!(
            tooltip_label("Wave Pattern (n=1, L=1.00)", 0.70710678),
            "Wave Pattern: 0.7071"
        );
        assert_eq!(
            tooltip_label("Probability Distribution (n=2, L=1.00)", 1.0),
            "Probability Distribution: 1.0000"
        );
        assert_eq!(tooltip_label("", -0.5), "-0.5000");
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(0.3), "0.30");
        assert_eq!(format_tick(2.0 / 3.0), "0.67");
    }
}
