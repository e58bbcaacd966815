//! Chart rendering.
//!
//! Turns grouped, summarised issues into a Highcharts configuration or a
//! Markdown overview.

pub mod highcharts;
pub mod markdown;
pub mod tooltip;

pub use highcharts::{build_chart, ChartSettings};
pub use markdown::generate_markdown_report;

use crate::analysis::{Breakdown, SeriesPoint};
use serde::{Deserialize, Serialize};

/// Which aggregation the chart shows.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ChartMode {
    /// Done since yesterday, in progress and backlog, stacked per platform
    #[default]
    Open,
    /// Remaining points per platform, including subtask points
    Legacy,
}

/// One stacked segment of a platform bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Completed,
    InProgress,
    Backlog,
}

impl SegmentKind {
    /// Stacking order, bottom to top.
    pub const ALL: [SegmentKind; 3] = [
        SegmentKind::Completed,
        SegmentKind::InProgress,
        SegmentKind::Backlog,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SegmentKind::Completed => "done",
            SegmentKind::InProgress => "in progress",
            SegmentKind::Backlog => "open",
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, SegmentKind::Completed)
    }

    pub fn select<'b, 'a>(&self, bar: &'b Breakdown<'a>) -> &'b SeriesPoint<'a> {
        match self {
            SegmentKind::Completed => &bar.completed,
            SegmentKind::InProgress => &bar.in_progress,
            SegmentKind::Backlog => &bar.backlog,
        }
    }

    fn border_width(&self) -> u32 {
        match self {
            SegmentKind::InProgress => 2,
            _ => 0,
        }
    }

    fn opacity(&self) -> Option<f64> {
        match self {
            SegmentKind::Completed => Some(0.45),
            _ => None,
        }
    }
}
