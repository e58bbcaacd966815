//! Grouping of issues into chart categories.

use crate::models::Issue;
use std::collections::HashMap;

/// Category assigned to issues that declare no parents.
pub const UNLABELED: &str = "";

/// Issues grouped by category label.
///
/// Built once from a slice of issues and never mutated afterwards. Labels
/// are ordered alphabetically (byte order, so the unlabeled category sorts
/// first); within a group, issues keep their input order.
#[derive(Debug, Clone)]
pub struct CategoryGroups<'a> {
    labels: Vec<String>,
    members: HashMap<String, Vec<&'a Issue>>,
}

impl<'a> CategoryGroups<'a> {
    /// Group issues by each of their parent labels.
    ///
    /// An issue listing N distinct parents is referenced from N groups. A
    /// parent label repeated on the same issue counts once.
    pub fn from_issues(issues: &'a [Issue]) -> Self {
        let mut members: HashMap<String, Vec<&'a Issue>> = HashMap::new();

        for issue in issues {
            if issue.parents.is_empty() {
                members.entry(UNLABELED.to_string()).or_default().push(issue);
                continue;
            }
            for (i, parent) in issue.parents.iter().enumerate() {
                if issue.parents[..i].contains(parent) {
                    continue;
                }
                members.entry(parent.clone()).or_default().push(issue);
            }
        }

        let mut labels: Vec<String> = members.keys().cloned().collect();
        labels.sort();

        Self { labels, members }
    }

    /// Category labels in axis order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Issues of one category, in input order.
    pub fn get(&self, label: &str) -> Option<&[&'a Issue]> {
        self.members.get(label).map(Vec::as_slice)
    }

    /// Iterate `(label, issues)` pairs in axis order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[&'a Issue])> + '_ {
        self.labels
            .iter()
            .map(move |label| (label.as_str(), self.get(label).unwrap_or(&[])))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
