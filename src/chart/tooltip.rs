//! Hover text for chart points.

use crate::analysis::SeriesPoint;

/// Story points with an explicit sign. Completed work is shown negative.
pub fn signed_points(value: f64, completed: bool) -> String {
    if value == 0.0 {
        return "+0".to_string();
    }
    let shown = if completed { -value } else { value };
    format!("{:+}", shown)
}

/// Compose the detail text for one point: a summary line followed by one
/// line per contributing issue.
pub fn point_detail(point: &SeriesPoint<'_>, label: &str, completed: bool) -> String {
    let mut lines = Vec::with_capacity(point.issues.len() + 1);

    lines.push(format!(
        "<b>{} {}: {} SP</b>",
        point.platform,
        label,
        signed_points(point.y, completed)
    ));

    for issue in &point.issues {
        lines.push(format!(
            "{} {} {}",
            signed_points(issue.story_points, completed),
            escape_html(&issue.key),
            escape_html(&issue.title)
        ));
    }

    lines.join("<br/>")
}

pub(super) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
