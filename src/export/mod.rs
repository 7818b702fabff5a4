//! Issue export
//!
//! Fetches every issue of a project and renders them into an xlsx workbook.
//!
//! # CLI Usage
//! Use [`run`] for the `export` command, which writes the workbook to disk.
//!
//! # Programmatic Usage (HTTP)
//! - [`ExportRequest::validate`] - check the inbound fields
//! - [`export_issues`] - fetch and render, returning the workbook bytes

mod cli;
pub mod rows;
mod workbook;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::error::ExportError;
use crate::sonar::{fetch_all_issues, normalize_base_url, PaginationConfig, SonarApi, SonarClient};
use crate::util::Settings;

pub use cli::ExportArgs;
pub use workbook::CONTENT_TYPE;

#[cfg(test)]
pub(crate) use workbook::contents;

/// Inbound export request, as posted by the form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub sonar_url: Option<String>,
    pub token: Option<String>,
    pub project_key: Option<String>,
}

/// Export request with every field present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    /// Server URL without trailing slash
    pub base_url: String,
    pub token: String,
    pub project_key: String,
}

impl ExportRequest {
    /// Reject missing or blank fields before any network activity
    pub fn validate(self) -> Result<ValidatedRequest, ExportError> {
        let sonar_url = non_blank(self.sonar_url);
        let token = non_blank(self.token);
        let project_key = non_blank(self.project_key);

        match (sonar_url, token, project_key) {
            (Some(url), Some(token), Some(project_key)) => Ok(ValidatedRequest {
                base_url: normalize_base_url(url.trim()),
                token,
                project_key: project_key.trim().to_string(),
            }),
            (url, token, project_key) => {
                let missing = [
                    ("sonarUrl", url.is_none()),
                    ("token", token.is_none()),
                    ("projectKey", project_key.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, missing)| missing.then_some(name))
                .collect();
                Err(ExportError::MissingFields(missing))
            }
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Finished workbook
#[derive(Debug)]
pub struct Export {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub issue_count: usize,
}

/// Fetch all issues of the project and render the workbook
pub async fn export_issues(
    api: &impl SonarApi,
    request: &ValidatedRequest,
    pagination: &PaginationConfig,
) -> Result<Export, ExportError> {
    let issues = fetch_all_issues(api, &request.project_key, pagination).await?;
    let rows = rows::build_rows(&issues, &request.base_url, &request.project_key)?;
    let bytes = workbook::write_workbook(&rows)?;

    Ok(Export {
        filename: export_filename(&request.project_key),
        bytes,
        issue_count: rows.len(),
    })
}

/// Download name for a project's export, safe for a Content-Disposition header
pub fn export_filename(project_key: &str) -> String {
    let safe: String = project_key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("sonarqube-issues-{}.xlsx", safe)
}

/// Run the export command (CLI entry point - writes the file and prints)
#[cfg(not(tarpaulin_include))]
pub async fn run(args: ExportArgs, settings: &Settings) -> Result<()> {
    let request = args.request(settings).validate()?;
    let pagination = args.pagination(settings)?;

    let client = SonarClient::new(&request.base_url, &request.token)?;
    let export = export_issues(&client, &request, &pagination)
        .await
        .with_context(|| format!("Failed to export issues for {}", request.project_key))?;

    let path = args
        .output
        .unwrap_or_else(|| PathBuf::from(&export.filename));
    fs::write(&path, &export.bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!(
        "\x1b[32m\u{2713}\x1b[0m Exported {} issues to {}",
        export.issue_count,
        path.display()
    );
    Ok(())
}
