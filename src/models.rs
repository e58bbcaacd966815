//! Data models for sprint issues.
//!
//! This module contains the input records (`Sprint`, `Issue`) and the
//! closed set of delivery platforms the chart is split by.

use crate::error::ValidationError;
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Delivery platform of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Platform {
    Backend,
    Frontend,
    Android,
    Ios,
    Qa,
}

impl Platform {
    /// All platforms in chart order.
    pub const ALL: [Platform; 5] = [
        Platform::Backend,
        Platform::Frontend,
        Platform::Android,
        Platform::Ios,
        Platform::Qa,
    ];

    /// Label as it appears in issue data and in the chart legend.
    pub fn label(&self) -> &'static str {
        match self {
            Platform::Backend => "Backend",
            Platform::Frontend => "Frontend",
            Platform::Android => "Android",
            Platform::Ios => "iOS",
            Platform::Qa => "QA",
        }
    }

    /// Series colour.
    pub fn color(&self) -> &'static str {
        match self {
            Platform::Backend => "#fc6267",
            Platform::Frontend => "#a06ef4",
            Platform::Android => "#98cd38",
            Platform::Ios => "#95afc0",
            Platform::Qa => "#1dacfc",
        }
    }

    /// Parse an exact platform label. Labels are case-sensitive.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.label() == label)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Platform {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// A single sprint issue as supplied by the data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Tracker key, e.g. `APP-123`.
    pub key: String,
    /// Summary line.
    pub title: String,
    /// Category labels this issue contributes to. Empty means uncategorised.
    #[serde(default)]
    pub parents: Vec<String>,
    /// Platforms the issue is delivered on. Unknown labels are dropped.
    #[serde(deserialize_with = "deserialize_known_platforms")]
    pub platforms: Vec<Platform>,
    pub story_points: f64,
    /// Points carried by in-sprint subtasks.
    #[serde(default)]
    pub children_stories: f64,
    #[serde(
        default,
        deserialize_with = "deserialize_close_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub close_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_done: bool,
    #[serde(default)]
    pub is_progress: bool,
    /// Story containers are excluded from the open and done summaries.
    #[serde(default)]
    pub is_story: bool,
}

impl Issue {
    /// Whether the issue lists `platform` among its platforms.
    pub fn is_on(&self, platform: Platform) -> bool {
        self.platforms.contains(&platform)
    }

    fn validate(&self, index: usize) -> Result<(), ValidationError> {
        if self.key.trim().is_empty() {
            return Err(ValidationError::EmptyKey { index });
        }
        for (field, value) in [
            ("storyPoints", self.story_points),
            ("childrenStories", self.children_stories),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ValidationError::InvalidPoints {
                    key: self.key.clone(),
                    field,
                    value,
                });
            }
        }
        Ok(())
    }
}

/// A sprint board snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sprint {
    pub issues: Vec<Issue>,
}

impl Sprint {
    /// Parse and validate a sprint from JSON text.
    pub fn from_json(content: &str) -> Result<Self> {
        let sprint: Sprint =
            serde_json::from_str(content).context("Failed to parse sprint JSON")?;
        sprint.validate()?;
        Ok(sprint)
    }

    /// Load and validate a sprint file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read sprint file: {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Invalid sprint file: {}", path.display()))
    }

    /// Check every issue against the input contract.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.issues
            .iter()
            .enumerate()
            .try_for_each(|(index, issue)| issue.validate(index))
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize sprint")
    }
}

fn deserialize_known_platforms<'de, D>(deserializer: D) -> Result<Vec<Platform>, D::Error>
where
    D: Deserializer<'de>,
{
    let labels = Vec::<String>::deserialize(deserializer)?;
    Ok(labels
        .iter()
        .filter_map(|label| {
            let platform = Platform::from_label(label);
            if platform.is_none() {
                debug!("Ignoring unknown platform label: {}", label);
            }
            platform
        })
        .collect())
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
pub fn parse_close_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn deserialize_close_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => parse_close_date(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid closeDate: {}", s))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_platform_labels_round_trip() {
        for platform in Platform::ALL {
            assert_eq!(Platform::from_label(platform.label()), Some(platform));
        }
        assert_eq!(Platform::from_label("ios"), None);
        assert_eq!(Platform::Ios.to_string(), "iOS");
    }

    #[test]
    fn test_parse_minimal_issue() {
        let json = r#"{"issues": [
            {"key": "APP-1", "title": "Login", "platforms": ["Backend"], "storyPoints": 3}
        ]}"#;
        let sprint = Sprint::from_json(json).unwrap();
        let issue = &sprint.issues[0];
        assert!(issue.parents.is_empty());
        assert_eq!(issue.children_stories, 0.0);
        assert_eq!(issue.close_date, None);
        assert!(!issue.is_done && !issue.is_progress && !issue.is_story);
    }

    #[test]
    fn test_unknown_platforms_are_dropped() {
        let json = r#"{"issues": [
            {"key": "APP-1", "title": "t", "platforms": ["Web", "QA"], "storyPoints": 1}
        ]}"#;
        let sprint = Sprint::from_json(json).unwrap();
        assert_eq!(sprint.issues[0].platforms, vec![Platform::Qa]);
    }

    #[test]
    fn test_close_date_formats() {
        assert_eq!(
            parse_close_date("2024-03-05"),
            Some(Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap())
        );
        assert_eq!(
            parse_close_date("2024-03-05T10:00:00+03:00"),
            Some(Utc.with_ymd_and_hms(2024, 3, 5, 7, 0, 0).unwrap())
        );
        assert_eq!(parse_close_date("yesterday"), None);
    }

    #[test]
    fn test_missing_platforms_is_rejected() {
        let json = r#"{"issues": [{"key": "APP-1", "title": "t", "storyPoints": 1}]}"#;
        assert!(Sprint::from_json(json).is_err());
    }

    #[test]
    fn test_invalid_close_date_is_rejected() {
        let json = r#"{"issues": [
            {"key": "APP-1", "title": "t", "platforms": [], "storyPoints": 1, "closeDate": "soon"}
        ]}"#;
        assert!(Sprint::from_json(json).is_err());
    }

    #[test]
    fn test_negative_points_are_rejected() {
        let sprint = Sprint {
            issues: vec![Issue {
                key: "APP-9".to_string(),
                title: "t".to_string(),
                parents: vec![],
                platforms: vec![Platform::Backend],
                story_points: -1.0,
                children_stories: 0.0,
                close_date: None,
                is_done: false,
                is_progress: false,
                is_story: false,
            }],
        };
        assert_eq!(
            sprint.validate(),
            Err(ValidationError::InvalidPoints {
                key: "APP-9".to_string(),
                field: "storyPoints",
                value: -1.0,
            })
        );
    }

    #[test]
    fn test_empty_key_is_rejected() {
        let json = r#"{"issues": [{"key": " ", "title": "t", "platforms": [], "storyPoints": 1}]}"#;
        let err = Sprint::from_json(json).unwrap_err();
        assert!(err
            .downcast_ref::<ValidationError>()
            .is_some_and(|e| *e == ValidationError::EmptyKey { index: 0 }));
    }
}
