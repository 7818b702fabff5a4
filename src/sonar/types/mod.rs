//! SonarQube data types

use serde::{Deserialize, Serialize};


/// Issue as returned by `/api/issues/search`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueRecord {
    /// Issue key
    #[serde(default)]
    pub key: String,
    /// Issue type (BUG, VULNERABILITY, CODE_SMELL)
    #[serde(rename = "type", default)]
    pub issue_type: String,
    /// Rule key (e.g., "java:S1234")
    #[serde(default)]
    pub rule: String,
    /// Severity (BLOCKER, CRITICAL, MAJOR, MINOR, INFO)
    #[serde(default)]
    pub severity: String,
    /// Component key, "<projectKey>:<path>"
    #[serde(default)]
    pub component: String,
    /// Location in the file; absent for file- and project-level issues
    #[serde(default)]
    pub text_range: Option<TextRange>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
    /// Resolution (FIXED, FALSE-POSITIVE, ...), only set once resolved
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub creation_date: String,
    #[serde(default)]
    pub update_date: String,
    /// Project key the issue belongs to
    #[serde(default)]
    pub project: String,
}

/// Line span of an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRange {
    pub start_line: u32,
    pub end_line: u32,
}

impl TextRange {
    #[cfg(test)]
    pub fn new(start_line: u32, end_line: u32) -> Self {
        Self {
            start_line,
            end_line,
        }
    }

    /// True when the issue sits on a single line
    pub fn is_single_line(&self) -> bool {
        self.start_line == self.end_line
    }
}

/// Paging block of a search response
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Paging {
    #[serde(default)]
    pub total: u64,
}

/// One page of `/api/issues/search`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchPage {
    pub issues: Vec<IssueRecord>,
    /// Deprecated top-level total, still sent by most server versions
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub paging: Option<Paging>,
}

impl SearchPage {
    /// Total reported by the server, preferring the top-level field
    pub fn reported_total(&self) -> Option<u64> {
        self.total.or_else(|| self.paging.map(|p| p.total))
    }
}
