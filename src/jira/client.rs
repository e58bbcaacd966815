//! Jira search client.

use super::models::JiraSearch;
use crate::config::JiraConfig;
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum JiraClientError {
    #[error("jira.{0} is not configured")]
    MissingSetting(&'static str),

    #[error("invalid Jira base URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP {status}: {body}")]
    HttpError { status: StatusCode, body: String },

    #[error("request failed: {0}")]
    RequestError(#[from] reqwest::Error),
}

/// Build the JQL for a sprint board.
///
/// An explicit query wins. Otherwise the query selects the sprint's
/// non-epic issues that are unresolved or resolved since the sprint
/// start, optionally limited to a feature team.
pub fn build_jql(config: &JiraConfig) -> Result<String, JiraClientError> {
    if let Some(query) = config.query.as_deref().filter(|q| !q.trim().is_empty()) {
        return Ok(query.to_string());
    }

    let code = config
        .sprint_code
        .ok_or(JiraClientError::MissingSetting("sprint_code"))?;

    let mut clauses = vec![format!("Sprint = {}", code), "type != Epic".to_string()];
    if !config.start_date.is_empty() {
        clauses.push(format!(
            "(resolutiondate is EMPTY OR resolutiondate >= {})",
            quote_jql_value(&config.start_date)
        ));
    }
    if !config.team.is_empty() {
        clauses.push(format!(
            "(\"Feature Team\" is EMPTY OR \"Feature Team\" = {})",
            quote_jql_value(&config.team)
        ));
    }

    Ok(clauses.join(" AND "))
}

/// Quote a JQL string value, escaping backslashes and quotes.
fn quote_jql_value(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Search URL with encoded query parameters.
pub fn search_url(base_url: &str, jql: &str, max_results: usize) -> Result<Url, JiraClientError> {
    if base_url.is_empty() {
        return Err(JiraClientError::MissingSetting("base_url"));
    }
    let mut url = Url::parse(base_url.trim_end_matches('/'))
        .map_err(|e| JiraClientError::InvalidUrl(format!("{}: {}", base_url, e)))?;
    url.path_segments_mut()
        .map_err(|_| JiraClientError::InvalidUrl(base_url.to_string()))?
        .pop_if_empty()
        .extend(["rest", "api", "2", "search"]);
    url.query_pairs_mut()
        .append_pair("jql", jql)
        .append_pair("maxResults", &max_results.to_string());
    Ok(url)
}

pub struct JiraClient {
    client: Client,
    config: JiraConfig,
    password: Option<String>,
}

impl JiraClient {
    pub fn new(config: JiraConfig, password: Option<String>) -> Result<Self, JiraClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            config,
            password,
        })
    }

    /// Run one search request.
    pub async fn search(&self, jql: &str) -> Result<JiraSearch, JiraClientError> {
        let url = search_url(&self.config.base_url, jql, self.config.max_results)?;
        info!("Search: {}", jql);
        debug!("Request: {}", url);

        let mut request = self.client.get(url);
        if !self.config.login.is_empty() {
            request = request.basic_auth(&self.config.login, self.password.as_deref());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(JiraClientError::HttpError { status, body });
        }

        let search: JiraSearch = response.json().await?;
        if search.total > search.issues.len() {
            warn!(
                "Jira returned {} of {} issues (maxResults = {})",
                search.issues.len(),
                search.total,
                search.max_results
            );
        }
        Ok(search)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JiraConfig {
        JiraConfig {
            base_url: "https://jira.example.com".to_string(),
            sprint_code: Some(1042),
            start_date: "2024-03-11".to_string(),
            team: "Payments".to_string(),
            ..JiraConfig::default()
        }
    }

    #[test]
    fn test_sprint_query() {
        let jql = build_jql(&config()).unwrap();
        assert_eq!(
            jql,
            "Sprint = 1042 AND type != Epic \
             AND (resolutiondate is EMPTY OR resolutiondate >= \"2024-03-11\") \
             AND (\"Feature Team\" is EMPTY OR \"Feature Team\" = \"Payments\")"
        );
    }

    #[test]
    fn test_team_quotes_are_escaped() {
        let mut config = config();
        config.team = r#"Pay" OR project = SECRET OR "x"#.to_string();
        let jql = build_jql(&config).unwrap();
        assert!(jql.ends_with(
            r#"AND ("Feature Team" is EMPTY OR "Feature Team" = "Pay\" OR project = SECRET OR \"x")"#
        ));

        config.team = r"Back\end".to_string();
        assert!(build_jql(&config).unwrap().ends_with(r#""Feature Team" = "Back\\end")"#));
    }

    #[test]
    fn test_minimal_query() {
        let config = JiraConfig {
            sprint_code: Some(7),
            ..JiraConfig::default()
        };
        assert_eq!(build_jql(&config).unwrap(), "Sprint = 7 AND type != Epic");
    }

    #[test]
    fn test_explicit_query_wins() {
        let mut config = config();
        config.query = Some("project = APP".to_string());
        assert_eq!(build_jql(&config).unwrap(), "project = APP");
    }

    #[test]
    fn test_missing_sprint_code() {
        let config = JiraConfig::default();
        assert!(matches!(
            build_jql(&config),
            Err(JiraClientError::MissingSetting("sprint_code"))
        ));
    }

    #[test]
    fn test_search_url() {
        let url = search_url("https://jira.example.com/", "Sprint = 7", 500).unwrap();
        assert_eq!(
            url.as_str(),
            "https://jira.example.com/rest/api/2/search?jql=Sprint+%3D+7&maxResults=500"
        );

        let nested = search_url("https://example.com/jira", "x", 10).unwrap();
        assert_eq!(nested.path(), "/jira/rest/api/2/search");
    }

    #[test]
    fn test_search_url_requires_base() {
        assert!(matches!(
            search_url("", "x", 10),
            Err(JiraClientError::MissingSetting("base_url"))
        ));
        assert!(matches!(
            search_url("not a url", "x", 10),
            Err(JiraClientError::InvalidUrl(_))
        ));
    }
}
