//! SonarQube HTTP client

use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::Client;
use std::future::Future;

use crate::error::ExportError;

use super::types::SearchPage;

#[cfg(test)]
mod tests;

const SEARCH_PATH: &str = "/api/issues/search";
const USER_AGENT: &str = concat!("sonar-export/", env!("CARGO_PKG_VERSION"));
const ERROR_SNIPPET_CHARS: usize = 200;

/// SonarQube API trait for testability
pub trait SonarApi: Send + Sync {
    /// Fetch one page of issues for a project
    fn search_issues(
        &self,
        project_key: &str,
        page: u32,
        page_size: u32,
    ) -> impl Future<Output = Result<SearchPage, ExportError>> + Send;
}

/// SonarQube HTTP client
pub struct SonarClient {
    http: Client,
    base_url: String,
    auth_header: String,
}

impl SonarClient {
    /// Create a client with its own connection pool
    pub fn new(base_url: &str, token: &str) -> Result<Self, ExportError> {
        Ok(Self::with_http(build_http_client()?, base_url, token))
    }

    /// Create a client on top of an existing `reqwest::Client`
    pub fn with_http(http: Client, base_url: &str, token: &str) -> Self {
        Self {
            http,
            base_url: normalize_base_url(base_url),
            auth_header: basic_auth_header(token),
        }
    }
}

impl SonarApi for SonarClient {
    async fn search_issues(
        &self,
        project_key: &str,
        page: u32,
        page_size: u32,
    ) -> Result<SearchPage, ExportError> {
        let url = format!("{}{}", self.base_url, SEARCH_PATH);
        let params = build_search_params(project_key, page, page_size);

        let response = self
            .http
            .get(&url)
            .header("Authorization", &self.auth_header)
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExportError::Status {
                status: status.as_u16(),
                body: snippet(&body),
            });
        }

        let text = response.text().await?;
        parse_search_page(&text)
    }
}

/// Build the shared HTTP client
pub fn build_http_client() -> Result<Client, ExportError> {
    Ok(Client::builder().user_agent(USER_AGENT).build()?)
}

/// Strip a single trailing slash
pub fn normalize_base_url(url: &str) -> String {
    url.strip_suffix('/').unwrap_or(url).to_string()
}

/// Basic auth header with the token as user name and an empty password
pub fn basic_auth_header(token: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:", token)))
}

/// Build query parameters for the issue search endpoint
fn build_search_params(project_key: &str, page: u32, page_size: u32) -> Vec<(&'static str, String)> {
    vec![
        ("componentKeys", project_key.to_string()),
        ("p", page.to_string()),
        ("ps", page_size.to_string()),
    ]
}

fn parse_search_page(text: &str) -> Result<SearchPage, ExportError> {
    serde_json::from_str(text).map_err(|e| ExportError::Parse(format!("{}: {}", e, snippet(text))))
}

fn snippet(text: &str) -> String {
    text.chars().take(ERROR_SNIPPET_CHARS).collect()
}
