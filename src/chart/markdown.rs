//! Markdown report generation.
//!
//! A text rendering of the same aggregates the chart shows, for pasting
//! into stand-up notes.

use super::ChartMode;
use crate::analysis::{breakdown, legacy_point, CategoryGroups, Evaluation};
use crate::models::Platform;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(
    groups: &CategoryGroups<'_>,
    mode: ChartMode,
    eval: &Evaluation,
) -> String {
    let mut output = String::new();

    output.push_str("# Sprint Story Points\n\n");
    output.push_str(&generate_metadata_section(groups, mode, eval));

    if groups.is_empty() {
        output.push_str("No issues in this sprint.\n");
        return output;
    }

    match mode {
        ChartMode::Open => output.push_str(&generate_open_table(groups, eval)),
        ChartMode::Legacy => output.push_str(&generate_legacy_table(groups, eval)),
    }

    output
}

fn generate_metadata_section(
    groups: &CategoryGroups<'_>,
    mode: ChartMode,
    eval: &Evaluation,
) -> String {
    let mut section = String::new();

    section.push_str(&format!(
        "- **Evaluated at:** {}\n",
        eval.now().format("%Y-%m-%d %H:%M %:z")
    ));
    section.push_str(&format!("- **Categories:** {}\n", groups.len()));
    match mode {
        ChartMode::Open => {
            section.push_str("- **Cells:** done since yesterday / in progress / open\n")
        }
        ChartMode::Legacy => {
            section.push_str("- **Cells:** remaining points (`*` marks work in progress)\n")
        }
    }
    section.push('\n');

    section
}

fn table_header() -> String {
    let mut header = String::from("| Category |");
    let mut rule = String::from("|:---|");
    for platform in Platform::ALL {
        header.push_str(&format!(" {} |", platform));
        rule.push_str(":---:|");
    }
    header.push_str(" **Total** |\n");
    rule.push_str(":---:|\n");
    header + &rule
}

fn category_name(label: &str) -> String {
    if label.is_empty() {
        return "_(no category)_".to_string();
    }
    // Keep the label inside one table cell.
    label.replace('|', "\\|").replace(['\r', '\n'], " ")
}

fn generate_open_table(groups: &CategoryGroups<'_>, eval: &Evaluation) -> String {
    let mut table = table_header();

    for (label, group) in groups.iter() {
        table.push_str(&format!("| {} |", category_name(label)));
        let mut total = 0.0;
        for platform in Platform::ALL {
            let bar = breakdown(group, platform, eval);
            total += bar.total();
            table.push_str(&format!(
                " {} / {} / {} |",
                bar.completed.y, bar.in_progress.y, bar.backlog.y
            ));
        }
        table.push_str(&format!(" **{}** |\n", total));
    }

    table.push('\n');
    table
}

fn generate_legacy_table(groups: &CategoryGroups<'_>, eval: &Evaluation) -> String {
    let mut table = table_header();

    for (label, group) in groups.iter() {
        table.push_str(&format!("| {} |", category_name(label)));
        let mut total = 0.0;
        for platform in Platform::ALL {
            let point = legacy_point(group, platform, eval);
            total += point.y;
            let marker = if point.in_progress { "*" } else { "" };
            table.push_str(&format!(" {}{} |", point.y, marker));
        }
        table.push_str(&format!(" **{}** |\n", total));
    }

    table.push('\n');
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Issue;
    use chrono::{FixedOffset, TimeZone};

    fn eval() -> Evaluation {
        let offset = FixedOffset::east_opt(3 * 3600).unwrap();
        Evaluation::new(offset.with_ymd_and_hms(2024, 3, 14, 10, 0, 0).unwrap(), 13)
    }

    fn issue(key: &str, parents: &[&str], platform: Platform, points: f64) -> Issue {
        Issue {
            key: key.to_string(),
            title: key.to_string(),
            parents: parents.iter().map(|p| p.to_string()).collect(),
            platforms: vec![platform],
            story_points: points,
            children_stories: 0.0,
            close_date: None,
            is_done: false,
            is_progress: false,
            is_story: false,
        }
    }

    #[test]
    fn test_open_report_rows() {
        let mut working = issue("F-1", &["Search"], Platform::Frontend, 2.0);
        working.is_progress = true;
        let issues = vec![
            working,
            issue("F-2", &["Search"], Platform::Frontend, 4.0),
            issue("B-1", &[], Platform::Backend, 1.0),
        ];
        let groups = CategoryGroups::from_issues(&issues);

        let report = generate_markdown_report(&groups, ChartMode::Open, &eval());

        assert!(report.contains("- **Evaluated at:** 2024-03-14 10:00 +03:00"));
        assert!(report.contains("| Category | Backend | Frontend | Android | iOS | QA | **Total** |"));
        assert!(report.contains(
            "| _(no category)_ | 0 / 0 / 1 | 0 / 0 / 0 | 0 / 0 / 0 | 0 / 0 / 0 | 0 / 0 / 0 | **1** |"
        ));
        assert!(report.contains(
            "| Search | 0 / 0 / 0 | 0 / 2 / 4 | 0 / 0 / 0 | 0 / 0 / 0 | 0 / 0 / 0 | **6** |"
        ));
    }

    #[test]
    fn test_legacy_report_marks_progress() {
        let mut working = issue("A-1", &["Q1"], Platform::Android, 3.0);
        working.is_progress = true;
        let issues = vec![working];
        let groups = CategoryGroups::from_issues(&issues);

        let report = generate_markdown_report(&groups, ChartMode::Legacy, &eval());
        assert!(report.contains("| Q1 | 0 | 0 | 3* | 0 | 0 | **3** |"));
    }

    #[test]
    fn test_category_label_stays_in_one_cell() {
        let issues = vec![issue("A-1", &["Cards | wallet\nv2"], Platform::Qa, 1.0)];
        let groups = CategoryGroups::from_issues(&issues);

        let report = generate_markdown_report(&groups, ChartMode::Legacy, &eval());
        assert!(report.contains("| Cards \\| wallet v2 | 0 | 0 | 0 | 0 | 1 | **1** |"));
    }

    #[test]
    fn test_empty_sprint() {
        let groups = CategoryGroups::from_issues(&[]);
        let report = generate_markdown_report(&groups, ChartMode::Open, &eval());
        assert!(report.contains("No issues in this sprint."));
    }
}
