//! SonarQube integration
//!
//! Pages through `/api/issues/search` for a single project.

mod client;
mod service;
pub mod types;

pub use client::{build_http_client, normalize_base_url, SonarApi, SonarClient};
pub use service::{fetch_all_issues, PaginationConfig};
pub use types::{IssueRecord, TextRange};
