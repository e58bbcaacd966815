//! Story-point summaries per category and platform.
//!
//! Every summary takes an [`Evaluation`] so that all series computed for
//! one chart agree on what "now" is.

use crate::models::{Issue, Platform};
use chrono::{DateTime, FixedOffset, Local, Timelike, Utc};

/// Hour of day before which yesterday's completions are still reported.
pub const DEFAULT_CUTOFF_HOUR: u32 = 13;

/// The instant a chart is evaluated at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    now: DateTime<FixedOffset>,
    cutoff_hour: u32,
}

impl Evaluation {
    pub fn new(now: DateTime<FixedOffset>, cutoff_hour: u32) -> Self {
        Self { now, cutoff_hour }
    }

    /// Capture the local clock once.
    pub fn capture(cutoff_hour: u32) -> Self {
        Self::new(Local::now().fixed_offset(), cutoff_hour)
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        self.now
    }

    /// Whether the issue is still counted by the legacy summary: closed
    /// strictly after now, or never closed.
    pub fn is_counting(&self, issue: &Issue) -> bool {
        issue
            .close_date
            .map_or(true, |closed| closed > self.now.with_timezone(&Utc))
    }

    /// Not done, and not closed as of now.
    pub fn is_open(&self, issue: &Issue) -> bool {
        !issue.is_done && self.is_counting(issue)
    }

    /// Whether a close date falls in the reporting window: today, or
    /// yesterday while the current hour is before the cutoff. Dates are
    /// compared in the evaluation's UTC offset.
    pub fn in_report_window(&self, closed: DateTime<Utc>) -> bool {
        let today = self.now.date_naive();
        let closed_on = closed.with_timezone(self.now.offset()).date_naive();

        if closed_on == today {
            return true;
        }
        today.pred_opt() == Some(closed_on) && self.now.hour() < self.cutoff_hour
    }
}

/// One point of the legacy per-platform series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegacyPoint {
    pub y: f64,
    /// Any platform issue is in progress, regardless of openness.
    pub in_progress: bool,
}

/// One point of an open or completed series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint<'a> {
    pub y: f64,
    pub platform: Platform,
    pub issues: Vec<&'a Issue>,
}

impl<'a> SeriesPoint<'a> {
    fn from_issues(platform: Platform, issues: Vec<&'a Issue>) -> Self {
        let y = issues.iter().fold(0.0, |acc, issue| acc + issue.story_points);
        Self { y, platform, issues }
    }
}

/// Legacy summary: open story points including subtask points.
pub fn legacy_point(group: &[&Issue], platform: Platform, eval: &Evaluation) -> LegacyPoint {
    let on_platform: Vec<&Issue> = group
        .iter()
        .copied()
        .filter(|issue| issue.is_on(platform))
        .collect();

    // fold from +0.0: an empty f64 sum is -0.0
    let y = on_platform
        .iter()
        .filter(|issue| eval.is_counting(issue))
        .fold(0.0, |acc, issue| acc + issue.story_points + issue.children_stories);

    LegacyPoint {
        y,
        in_progress: on_platform.iter().any(|issue| issue.is_progress),
    }
}

/// Open work on `platform` whose progress flag equals `in_progress`.
/// Story containers and subtask points are not counted.
pub fn open_point<'a>(
    group: &[&'a Issue],
    platform: Platform,
    in_progress: bool,
    eval: &Evaluation,
) -> SeriesPoint<'a> {
    let issues = group
        .iter()
        .copied()
        .filter(|issue| issue.is_on(platform) && !issue.is_story)
        .filter(|issue| issue.is_progress == in_progress)
        .filter(|issue| eval.is_open(issue))
        .collect();

    SeriesPoint::from_issues(platform, issues)
}

/// Work on `platform` completed in the current reporting window.
pub fn completed_point<'a>(
    group: &[&'a Issue],
    platform: Platform,
    eval: &Evaluation,
) -> SeriesPoint<'a> {
    let issues = group
        .iter()
        .copied()
        .filter(|issue| issue.is_on(platform) && !issue.is_story && issue.is_done)
        .filter(|issue| {
            issue
                .close_date
                .is_some_and(|closed| eval.in_report_window(closed))
        })
        .collect();

    SeriesPoint::from_issues(platform, issues)
}

/// The three stacked segments of one platform bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Breakdown<'a> {
    pub completed: SeriesPoint<'a>,
    pub in_progress: SeriesPoint<'a>,
    pub backlog: SeriesPoint<'a>,
}

impl Breakdown<'_> {
    /// Height of the whole platform bar.
    pub fn total(&self) -> f64 {
        self.completed.y + self.in_progress.y + self.backlog.y
    }
}

/// Completed, in-progress and backlog points for one category and platform.
pub fn breakdown<'a>(group: &[&'a Issue], platform: Platform, eval: &Evaluation) -> Breakdown<'a> {
    Breakdown {
        completed: completed_point(group, platform, eval),
        in_progress: open_point(group, platform, true, eval),
        backlog: open_point(group, platform, false, eval),
    }
}
