//! Conversion of Jira search results into sprint issues.

use super::models::{JiraIssue, JiraSearch};
use crate::models::{parse_close_date, Issue, Platform, Sprint};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::{debug, info};

/// Statuses that count as actively worked on.
pub const PROGRESS_STATUSES: [&str; 5] = [
    "Waiting for release",
    "In Progress",
    "In test",
    "In Review",
    "QA Progress",
];

const STORY_TYPE: &str = "Story";
const BLOCKS_LINK: &str = "Blocks";
const DONE_CATEGORY: &str = "done";

/// Convert a search result into a sprint.
///
/// Stories become categories: an issue that blocks a story in the same
/// result lists that story's summary as a parent. Subtask points and
/// progress roll up into their parent issue.
pub fn convert_search(search: &JiraSearch, story_points_field: &str) -> Sprint {
    info!("Converting {} Jira issues", search.issues.len());

    let stories: HashMap<&str, &str> = search
        .issues
        .iter()
        .filter(|issue| issue.fields.type_name() == STORY_TYPE)
        .map(|issue| (issue.key.as_str(), issue.fields.summary.as_str()))
        .collect();

    let base: Vec<Issue> = search
        .issues
        .iter()
        .map(|issue| convert_issue(issue, &stories, story_points_field))
        .collect();

    let by_key: HashMap<&str, &Issue> = base
        .iter()
        .map(|issue| (issue.key.as_str(), issue))
        .collect();

    let issues = search
        .issues
        .iter()
        .zip(base.iter())
        .map(|(jira, issue)| {
            let mut issue = issue.clone();
            for subtask in &jira.fields.subtasks {
                if let Some(child) = by_key.get(subtask.key.as_str()) {
                    issue.children_stories += child.story_points;
                    issue.is_progress |= child.is_progress;
                }
            }
            if issue.children_stories > 0.0 {
                debug!("{}: children stories {}", issue.key, issue.children_stories);
            }
            issue
        })
        .collect();

    Sprint { issues }
}

fn convert_issue(
    jira: &JiraIssue,
    stories: &HashMap<&str, &str>,
    story_points_field: &str,
) -> Issue {
    let fields = &jira.fields;

    let parents = fields
        .issuelinks
        .iter()
        .filter(|link| link.kind.name == BLOCKS_LINK)
        .filter_map(|link| link.outward_issue.as_ref())
        .filter_map(|target| stories.get(target.key.as_str()))
        .map(|title| title.to_string())
        .collect();

    let platforms = fields
        .components
        .iter()
        .filter_map(|component| {
            let platform = Platform::from_label(&component.name);
            if platform.is_none() {
                debug!("{}: ignoring unknown platform label: {}", jira.key, component.name);
            }
            platform
        })
        .collect();

    let status = fields.status.as_ref();
    let is_progress = status.is_some_and(|s| PROGRESS_STATUSES.contains(&s.name.as_str()));
    let is_done = status
        .and_then(|s| s.status_category.as_ref())
        .is_some_and(|category| category.key == DONE_CATEGORY);

    Issue {
        key: jira.key.clone(),
        title: fields.summary.clone(),
        parents,
        platforms,
        story_points: fields.number(story_points_field).max(0.0),
        children_stories: 0.0,
        close_date: fields.resolutiondate.as_deref().and_then(parse_resolution_date),
        is_done,
        is_progress,
        is_story: fields.type_name() == STORY_TYPE,
    }
}

/// Parse Jira's `2024-03-14T10:00:00.000+0300` timestamps.
fn parse_resolution_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f%z")
        .map(|ts| ts.with_timezone(&Utc))
        .ok()
        .or_else(|| parse_close_date(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn search() -> JiraSearch {
        serde_json::from_str(include_str!("../../fixtures/jira_search.json")).unwrap()
    }

    fn find<'a>(sprint: &'a Sprint, key: &str) -> &'a Issue {
        sprint.issues.iter().find(|i| i.key == key).unwrap()
    }

    #[test]
    fn test_blocked_stories_become_parents() {
        let sprint = convert_search(&search(), "customfield_10212");

        let task = find(&sprint, "APP-2");
        assert_eq!(task.parents, vec!["Guest checkout", "Saved cards"]);
        assert_eq!(task.platforms, vec![Platform::Backend]);
        assert!(!task.is_story);

        // Links to non-stories are not categories.
        assert!(find(&sprint, "APP-5").parents.is_empty());
        assert!(find(&sprint, "APP-1").is_story);
    }

    #[test]
    fn test_subtasks_roll_up() {
        let sprint = convert_search(&search(), "customfield_10212");

        let task = find(&sprint, "APP-2");
        assert_eq!(task.story_points, 5.0);
        assert_eq!(task.children_stories, 3.0);
        // Own status is "To Do", the subtask is "In Review".
        assert!(task.is_progress);
    }

    #[test]
    fn test_status_and_resolution() {
        let sprint = convert_search(&search(), "customfield_10212");

        let done = find(&sprint, "APP-5");
        assert!(done.is_done);
        assert!(!done.is_progress);
        assert_eq!(
            done.close_date,
            Some(Utc.with_ymd_and_hms(2024, 3, 13, 15, 20, 0).unwrap())
        );
        // Unknown component names are dropped.
        assert_eq!(done.platforms, vec![Platform::Qa]);

        let sub = find(&sprint, "APP-3");
        assert!(sub.is_progress);
        assert!(!sub.is_done);
        assert_eq!(sub.close_date, None);
    }

    #[test]
    fn test_story_points_field_is_configurable() {
        let sprint = convert_search(&search(), "customfield_20000");
        assert!(sprint.issues.iter().all(|i| i.story_points == 0.0));
        assert!(sprint.validate().is_ok());
    }

    #[test]
    fn test_resolution_date_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 14, 7, 0, 0).unwrap();
        assert_eq!(parse_resolution_date("2024-03-14T10:00:00.000+0300"), Some(expected));
        assert_eq!(parse_resolution_date("2024-03-14T10:00:00+0300"), Some(expected));
        assert_eq!(parse_resolution_date("not a date"), None);
    }
}
