//! Jira REST v2 search response records.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// Response of `GET /rest/api/2/search`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraSearch {
    #[serde(default)]
    pub issues: Vec<JiraIssue>,
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub max_results: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JiraIssue {
    pub key: String,
    pub fields: JiraFields,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JiraFields {
    #[serde(default)]
    pub summary: String,
    pub issuetype: Option<JiraNamed>,
    pub status: Option<JiraStatus>,
    pub resolutiondate: Option<String>,
    #[serde(default)]
    pub issuelinks: Vec<JiraLink>,
    #[serde(default)]
    pub components: Vec<JiraNamed>,
    #[serde(default)]
    pub subtasks: Vec<JiraIssueRef>,
    /// Custom fields, keyed by field id.
    #[serde(flatten)]
    pub custom: HashMap<String, Value>,
}

impl JiraFields {
    pub fn type_name(&self) -> &str {
        self.issuetype.as_ref().map_or("", |t| t.name.as_str())
    }

    /// Numeric custom field, 0 when absent or null.
    pub fn number(&self, field: &str) -> f64 {
        self.custom.get(field).and_then(Value::as_f64).unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JiraNamed {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraStatus {
    pub name: String,
    pub status_category: Option<JiraStatusCategory>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JiraStatusCategory {
    pub key: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraLink {
    #[serde(rename = "type")]
    pub kind: JiraNamed,
    pub outward_issue: Option<JiraIssueRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JiraIssueRef {
    pub key: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_issue_with_custom_field() {
        let json = r#"{
            "key": "APP-7",
            "fields": {
                "summary": "Checkout button",
                "issuetype": {"id": "3", "name": "Task"},
                "status": {"name": "In Review", "statusCategory": {"key": "indeterminate"}},
                "resolutiondate": null,
                "components": [{"id": "1", "name": "Frontend"}],
                "customfield_10212": 3.0,
                "customfield_99999": "text"
            }
        }"#;
        let issue: JiraIssue = serde_json::from_str(json).unwrap();
        assert_eq!(issue.fields.type_name(), "Task");
        assert_eq!(issue.fields.number("customfield_10212"), 3.0);
        assert_eq!(issue.fields.number("customfield_99999"), 0.0);
        assert_eq!(issue.fields.number("missing"), 0.0);
        assert!(issue.fields.issuelinks.is_empty());
    }

    #[test]
    fn test_deserialize_minimal_search() {
        let search: JiraSearch = serde_json::from_str(r#"{"total": 0}"#).unwrap();
        assert!(search.issues.is_empty());
    }
}
