//! Highcharts configuration assembly.
//!
//! Produces the JSON object handed to `new Highcharts.Chart(...)`: a
//! horizontal stacked bar chart with one category per issue group.

use super::tooltip::{escape_html, point_detail};
use super::{ChartMode, SegmentKind};
use crate::analysis::{breakdown, legacy_point, CategoryGroups, Evaluation, SeriesPoint};
use crate::models::{Issue, Platform};
use serde::Serialize;

/// Root chart configuration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighchartsConfig {
    pub chart: ChartOptions,
    pub title: TitleOptions,
    pub subtitle: TitleOptions,
    pub plot_options: PlotOptions,
    pub x_axis: XAxis,
    pub y_axis: YAxis,
    pub legend: Legend,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<Tooltip>,
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub render_to: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub spacing_bottom: u32,
    pub spacing_top: u32,
    pub spacing_left: u32,
    pub spacing_right: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct TitleOptions {
    pub text: String,
    pub x: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlotOptions {
    pub series: SeriesDefaults,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeriesDefaults {
    pub stacking: String,
    pub animation: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct XAxis {
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct YAxis {
    pub title: AxisTitle,
}

#[derive(Debug, Clone, Serialize)]
pub struct AxisTitle {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Legend {
    pub layout: String,
    pub align: String,
    pub vertical_align: String,
    pub border_width: u32,
    pub reversed: bool,
}

/// Tooltip reading the precomputed `detail` text of each point.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tooltip {
    #[serde(rename = "useHTML")]
    pub use_html: bool,
    pub header_format: String,
    pub point_format: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub name: String,
    pub color: String,
    pub border_width: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    pub data: Vec<Point>,
}

/// A single bar segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<PointIssue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Issue reference carried by a point.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointIssue {
    pub key: String,
    pub title: String,
    pub story_points: f64,
}

impl From<&Issue> for PointIssue {
    fn from(issue: &Issue) -> Self {
        Self {
            key: issue.key.clone(),
            title: issue.title.clone(),
            story_points: issue.story_points,
        }
    }
}

/// Presentation settings that are not derived from issue data.
#[derive(Debug, Clone)]
pub struct ChartSettings {
    pub render_to: String,
    pub title: String,
    pub y_axis_title: String,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            render_to: "chart".to_string(),
            title: String::new(),
            y_axis_title: "Story Points".to_string(),
        }
    }
}

/// Outline weight marking work in progress.
const PROGRESS_BORDER: u32 = 2;

/// Build the full chart configuration for the grouped issues.
pub fn build_chart(
    groups: &CategoryGroups<'_>,
    mode: ChartMode,
    eval: &Evaluation,
    settings: &ChartSettings,
) -> HighchartsConfig {
    let (series, tooltip) = match mode {
        ChartMode::Open => (
            open_series(groups, eval),
            Some(Tooltip {
                use_html: true,
                header_format: "<span>{point.key}</span><br/>".to_string(),
                point_format: "{point.detail}".to_string(),
            }),
        ),
        ChartMode::Legacy => (legacy_series(groups, eval), None),
    };

    HighchartsConfig {
        chart: ChartOptions {
            render_to: settings.render_to.clone(),
            kind: "bar".to_string(),
            spacing_bottom: 30,
            spacing_top: 65,
            spacing_left: 10,
            spacing_right: 10,
        },
        title: TitleOptions {
            text: settings.title.clone(),
            x: -20,
        },
        subtitle: TitleOptions {
            text: String::new(),
            x: -20,
        },
        plot_options: PlotOptions {
            series: SeriesDefaults {
                stacking: "normal".to_string(),
                animation: false,
            },
        },
        x_axis: XAxis {
            // Category labels are story titles and the tooltip header renders HTML.
            categories: groups.labels().iter().map(|label| escape_html(label)).collect(),
        },
        y_axis: YAxis {
            title: AxisTitle {
                text: settings.y_axis_title.clone(),
            },
        },
        legend: Legend {
            layout: "vertical".to_string(),
            align: "right".to_string(),
            vertical_align: "middle".to_string(),
            border_width: 0,
            reversed: true,
        },
        tooltip,
        series,
    }
}

/// Five series, one per platform, with progress-weighted outlines.
fn legacy_series(groups: &CategoryGroups<'_>, eval: &Evaluation) -> Vec<Series> {
    Platform::ALL
        .into_iter()
        .map(|platform| Series {
            name: platform.label().to_string(),
            color: platform.color().to_string(),
            border_width: 0,
            stack: None,
            opacity: None,
            data: groups
                .iter()
                .map(|(_, group)| {
                    let point = legacy_point(group, platform, eval);
                    Point {
                        y: point.y,
                        border_width: Some(if point.in_progress { PROGRESS_BORDER } else { 0 }),
                        platform: None,
                        issues: Vec::new(),
                        detail: None,
                    }
                })
                .collect(),
        })
        .collect()
}

/// Three series per platform sharing one stack.
fn open_series(groups: &CategoryGroups<'_>, eval: &Evaluation) -> Vec<Series> {
    let mut series = Vec::with_capacity(Platform::ALL.len() * SegmentKind::ALL.len());

    for platform in Platform::ALL {
        let bars: Vec<_> = groups
            .iter()
            .map(|(_, group)| breakdown(group, platform, eval))
            .collect();

        for kind in SegmentKind::ALL {
            series.push(Series {
                name: format!("{} {}", platform, kind.label()),
                color: platform.color().to_string(),
                border_width: kind.border_width(),
                stack: Some(platform.label().to_string()),
                opacity: kind.opacity(),
                data: bars
                    .iter()
                    .map(|bar| segment_point(kind.select(bar), kind))
                    .collect(),
            });
        }
    }

    series
}

fn segment_point(point: &SeriesPoint<'_>, kind: SegmentKind) -> Point {
    Point {
        y: point.y,
        border_width: None,
        platform: Some(point.platform),
        issues: point.issues.iter().map(|issue| PointIssue::from(*issue)).collect(),
        detail: Some(point_detail(point, kind.label(), kind.is_completed())),
    }
}
