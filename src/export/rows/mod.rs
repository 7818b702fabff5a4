//! Issue to row mapping
//!
//! Every column of the export is derived here; the workbook writer only
//! places cells.

use crate::error::ExportError;
use crate::sonar::{IssueRecord, TextRange};


/// Column of the export sheet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    pub header: &'static str,
    pub width: f64,
}

const fn column(header: &'static str, width: f64) -> Column {
    Column { header, width }
}

/// Sheet columns, in output order
pub const COLUMNS: [Column; 16] = [
    column("Key", 20.0),
    column("Type", 15.0),
    column("Rule", 15.0),
    column("Severity", 15.0),
    column("Component", 40.0),
    column("Line", 40.0),
    column("Message", 50.0),
    column("Status", 15.0),
    column("Resolution", 15.0),
    column("Creation Date", 20.0),
    column("Update Date", 20.0),
    column("Number", 20.0),
    column("Assessment Path", 50.0),
    column("Assessment Rule", 50.0),
    column("Assessment Message", 50.0),
    column("Link", 20.0),
];

/// Hyperlink to the issue in the SonarQube UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueLink {
    pub text: String,
    pub url: String,
}

/// Value of one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell<'a> {
    Text(&'a str),
    Blank,
    Link(&'a IssueLink),
}

/// One row of the export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    pub key: String,
    pub issue_type: String,
    pub rule: String,
    pub severity: String,
    pub component: String,
    pub line: String,
    pub message: String,
    pub status: String,
    pub resolution: Option<String>,
    pub creation_date: String,
    pub update_date: String,
    pub number: String,
    pub assessment_path: String,
    pub assessment_rule: String,
    pub assessment_message: String,
    pub link: IssueLink,
}

impl ExportRow {
    /// Derive the row for the issue at `index` (0-based) of the export
    pub fn from_issue(
        issue: &IssueRecord,
        index: usize,
        base_url: &str,
        project_key: &str,
    ) -> Result<Self, ExportError> {
        let range = issue
            .text_range
            .as_ref()
            .ok_or_else(|| ExportError::MissingTextRange {
                key: issue.key.clone(),
            })?;

        let url = issue_url(base_url, &issue.key, &issue.project);

        Ok(Self {
            key: issue.key.clone(),
            issue_type: issue.issue_type.clone(),
            rule: issue.rule.clone(),
            severity: issue.severity.clone(),
            component: issue.component.clone(),
            line: line_range(range),
            message: issue.message.clone(),
            status: issue.status.clone(),
            resolution: issue.resolution.clone(),
            creation_date: issue.creation_date.clone(),
            update_date: issue.update_date.clone(),
            number: sequence_number(index),
            assessment_path: assessment_path(&issue.component, project_key, range),
            assessment_rule: assessment_rule(&issue.rule, &issue.message),
            // Same value as severity
            assessment_message: issue.severity.clone(),
            link: IssueLink {
                text: url.clone(),
                url,
            },
        })
    }

    /// Cells in [`COLUMNS`] order
    pub fn cells(&self) -> [Cell<'_>; 16] {
        [
            Cell::Text(&self.key),
            Cell::Text(&self.issue_type),
            Cell::Text(&self.rule),
            Cell::Text(&self.severity),
            Cell::Text(&self.component),
            Cell::Text(&self.line),
            Cell::Text(&self.message),
            Cell::Text(&self.status),
            self.resolution.as_deref().map_or(Cell::Blank, Cell::Text),
            Cell::Text(&self.creation_date),
            Cell::Text(&self.update_date),
            Cell::Text(&self.number),
            Cell::Text(&self.assessment_path),
            Cell::Text(&self.assessment_rule),
            Cell::Text(&self.assessment_message),
            Cell::Link(&self.link),
        ]
    }
}

/// Map every issue to a row, in input order.
///
/// All issues are checked before any row is returned, so a bad record
/// never yields a partial export.
pub fn build_rows(
    issues: &[IssueRecord],
    base_url: &str,
    project_key: &str,
) -> Result<Vec<ExportRow>, ExportError> {
    issues
        .iter()
        .enumerate()
        .map(|(index, issue)| ExportRow::from_issue(issue, index, base_url, project_key))
        .collect()
}

/// "{start}-{end}", hyphenated even for single-line issues
pub fn line_range(range: &TextRange) -> String {
    format!("{}-{}", range.start_line, range.end_line)
}

/// 1-based ordinal with a trailing period
pub fn sequence_number(index: usize) -> String {
    format!("{}.", index + 1)
}

/// File path relative to the project, with its line or line span
pub fn assessment_path(component: &str, project_key: &str, range: &TextRange) -> String {
    let prefix = format!("{}:", project_key);
    let path = component.strip_prefix(prefix.as_str()).unwrap_or(component);

    if range.is_single_line() {
        format!("{}:{}", path, range.start_line)
    } else {
        format!("{}:{}-{}", path, range.start_line, range.end_line)
    }
}

pub fn assessment_rule(rule: &str, message: &str) -> String {
    format!("(Rule {}) {}", rule, message)
}

/// Issue page in the SonarQube UI
pub fn issue_url(base_url: &str, key: &str, project: &str) -> String {
    format!("{}/project/issues?open={}&id={}", base_url, key, project)
}
