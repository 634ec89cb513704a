//! Chart overlay: price action with the plan's zones drawn on top.
//!
//! Describes what to draw, not how. A front end consumes the JSON and renders
//! the price line, the EMA trend, the first-action line and one dashed
//! horizontal marker per grid level in its fund's color.

use crate::config::ChartConfig;
use crate::market::{ema, PriceSeries};
use crate::plan::{CapitalPlan, FundType};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const PRICE_COLOR: &str = "#2ef6cf";
const TREND_COLOR: &str = "#a32efe";
const FIRST_ACTION_COLOR: &str = "white";
const FUND_A_COLOR: &str = "red";
const FUND_B_COLOR: &str = "#1d8348";
const PAPER_BACKGROUND: &str = "#1c2833";
const PLOT_BACKGROUND: &str = "#212f3d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dash {
    Solid,
    Dash,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub color: String,
    pub width: f64,
    pub dash: Dash,
}

impl LineStyle {
    fn new(color: &str, width: f64, dash: Dash) -> Self {
        Self {
            color: color.to_string(),
            width,
            dash,
        }
    }

    /// Marker style for a fund tier.
    pub fn for_fund(fund_type: FundType) -> Self {
        match fund_type {
            FundType::FundA => Self::new(FUND_A_COLOR, 1.5, Dash::Dash),
            FundType::FundB => Self::new(FUND_B_COLOR, 0.75, Dash::Dash),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub timestamp: DateTime<Utc>,
    pub value: Decimal,
}

/// A named time-series line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineTrace {
    pub name: String,
    pub style: LineStyle,
    pub points: Vec<SeriesPoint>,
}

/// A full-width horizontal line at one grid level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HorizontalMarker {
    pub price: Decimal,
    pub fund_type: FundType,
    pub style: LineStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartLayout {
    pub title: String,
    pub x_axis_title: String,
    pub y_axis_title: String,
    pub font_color: String,
    pub grid_color: String,
    pub paper_background: String,
    pub plot_background: String,
    pub width: u32,
    pub height: u32,
}

/// Everything a renderer needs to draw the plan against price history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartOverlay {
    pub layout: ChartLayout,
    pub traces: Vec<LineTrace>,
    pub markers: Vec<HorizontalMarker>,
}

impl ChartOverlay {
    /// Build the overlay for `plan` over `series`.
    ///
    /// The trend line starts once `chart.ema_length` closes are available.
    pub fn build(
        symbol: &str,
        series: &PriceSeries,
        plan: &CapitalPlan,
        first_action_price: Decimal,
        chart: &ChartConfig,
    ) -> Self {
        let timestamps = series.timestamps();
        let closes = series.closes();

        let price = LineTrace {
            name: "Price".to_string(),
            style: LineStyle::new(PRICE_COLOR, 2.0, Dash::Solid),
            points: timestamps
                .iter()
                .zip(&closes)
                .map(|(ts, close)| SeriesPoint {
                    timestamp: *ts,
                    value: *close,
                })
                .collect(),
        };

        let trend = LineTrace {
            name: "EMA Trend".to_string(),
            style: LineStyle::new(TREND_COLOR, 1.75, Dash::Solid),
            points: timestamps
                .iter()
                .zip(ema(&closes, chart.ema_length))
                .filter_map(|(ts, value)| {
                    value.map(|value| SeriesPoint {
                        timestamp: *ts,
                        value,
                    })
                })
                .collect(),
        };

        let first_action = LineTrace {
            name: "Initial Investment".to_string(),
            style: LineStyle::new(FIRST_ACTION_COLOR, 2.0, Dash::Solid),
            points: timestamps
                .iter()
                .map(|ts| SeriesPoint {
                    timestamp: *ts,
                    value: first_action_price,
                })
                .collect(),
        };

        let markers = plan
            .grid_a()
            .iter()
            .map(|price| (*price, FundType::FundA))
            .chain(plan.grid_b().iter().map(|price| (*price, FundType::FundB)))
            .map(|(price, fund_type)| HorizontalMarker {
                price,
                fund_type,
                style: LineStyle::for_fund(fund_type),
            })
            .collect();

        Self {
            layout: ChartLayout {
                title: format!("Market Price & Investment Zones: {}", symbol),
                x_axis_title: "Date".to_string(),
                y_axis_title: "Price".to_string(),
                font_color: "white".to_string(),
                grid_color: "gray".to_string(),
                paper_background: PAPER_BACKGROUND.to_string(),
                plot_background: PLOT_BACKGROUND.to_string(),
                width: chart.width,
                height: chart.height,
            },
            traces: vec![price, trend, first_action],
            markers,
        }
    }

    pub fn markers_for(&self, fund_type: FundType) -> impl Iterator<Item = &HorizontalMarker> {
        self.markers.iter().filter(move |m| m.fund_type == fund_type)
    }

    pub fn trace(&self, name: &str) -> Option<&LineTrace> {
        self.traces.iter().find(|t| t.name == name)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize chart overlay")
    }
}
