//! Issue fetching - walks the search endpoint page by page
//!
//! Functions in this module accept trait objects and return typed data.
//! They never print - that's the CLI layer's job.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ExportError;

use super::client::SonarApi;
use super::types::{IssueRecord, SearchPage};

pub const DEFAULT_PAGE_SIZE: u32 = 500;
pub const DEFAULT_MAX_PAGES: u32 = 20;
/// Largest `ps` the search endpoint accepts
pub const MAX_PAGE_SIZE: u32 = 500;

/// Page size and page ceiling for one fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub page_size: u32,
    pub max_pages: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

impl PaginationConfig {
    /// Create a validated config
    pub fn new(page_size: u32, max_pages: u32) -> Result<Self, ExportError> {
        let config = Self {
            page_size,
            max_pages,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ExportError> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(ExportError::InvalidConfig(format!(
                "page_size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, self.page_size
            )));
        }
        if self.max_pages == 0 {
            return Err(ExportError::InvalidConfig(
                "max_pages must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Upper bound on the number of issues a fetch can return
    pub fn max_issues(&self) -> usize {
        self.page_size as usize * self.max_pages as usize
    }
}

/// Accumulator for a single fetch
#[derive(Debug)]
struct FetchState {
    issues: Vec<IssueRecord>,
    page: u32,
    page_size: u32,
    has_more: bool,
    pages_fetched: u32,
}

impl FetchState {
    fn new(page_size: u32) -> Self {
        Self {
            issues: Vec::new(),
            page: 1,
            page_size,
            has_more: true,
            pages_fetched: 0,
        }
    }

    /// Fold one page into the accumulator and decide whether to continue
    fn absorb(&mut self, page: SearchPage) {
        self.pages_fetched += 1;
        let total = page.reported_total();
        let mut issues = page.issues;

        if issues.is_empty() {
            self.has_more = false;
            return;
        }

        let page_size = self.page_size as usize;
        if issues.len() > page_size {
            warn!(
                page = self.page,
                received = issues.len(),
                page_size,
                "server returned more issues than requested, truncating page"
            );
            issues.truncate(page_size);
        }

        let received = issues.len();
        self.issues.extend(issues);

        // A zero total is treated as unknown
        let reached_total = matches!(total, Some(t) if t > 0 && self.issues.len() as u64 >= t);
        if reached_total || received < page_size {
            self.has_more = false;
        } else {
            self.page += 1;
        }
    }

    fn into_issues(self) -> Vec<IssueRecord> {
        self.issues
    }
}

/// Fetch every issue of a project, stopping at the page ceiling
pub async fn fetch_all_issues(
    api: &impl SonarApi,
    project_key: &str,
    config: &PaginationConfig,
) -> Result<Vec<IssueRecord>, ExportError> {
    config.validate()?;
    let mut state = FetchState::new(config.page_size);

    while state.has_more {
        if state.pages_fetched >= config.max_pages {
            warn!(
                project = project_key,
                max_pages = config.max_pages,
                limit = config.max_issues(),
                fetched = state.issues.len(),
                "page ceiling reached, export is truncated"
            );
            break;
        }

        let page = api
            .search_issues(project_key, state.page, state.page_size)
            .await?;
        debug!(
            project = project_key,
            page = state.page,
            issues = page.issues.len(),
            total = ?page.reported_total(),
            "fetched issue page"
        );
        state.absorb(page);
    }

    info!(
        project = project_key,
        issues = state.issues.len(),
        pages = state.pages_fetched,
        "issue fetch complete"
    );
    Ok(state.into_issues())
}
