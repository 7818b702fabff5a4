use clap::Args;
use std::path::PathBuf;

use crate::error::ExportError;
use crate::sonar::PaginationConfig;
use crate::util::Settings;

use super::ExportRequest;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// SonarQube server URL (e.g., http://localhost:9000)
    #[arg(short, long)]
    pub url: Option<String>,

    /// User token used as the basic auth user name
    #[arg(short, long)]
    pub token: Option<String>,

    /// Project key to export
    #[arg(short, long)]
    pub project: Option<String>,

    /// Output file [default: sonarqube-issues-<project>.xlsx]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Issues per page (1-500)
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Maximum number of pages to fetch
    #[arg(long)]
    pub max_pages: Option<u32>,
}

impl ExportArgs {
    /// Connection fields, falling back to settings for anything not on the command line
    pub fn request(&self, settings: &Settings) -> ExportRequest {
        ExportRequest {
            sonar_url: self.url.clone().or_else(|| settings.sonar.url.clone()),
            token: self.token.clone().or_else(|| settings.sonar.token.clone()),
            project_key: self
                .project
                .clone()
                .or_else(|| settings.sonar.project_key.clone()),
        }
    }

    /// Pagination limits, command line over settings
    pub fn pagination(&self, settings: &Settings) -> Result<PaginationConfig, ExportError> {
        PaginationConfig::new(
            self.page_size.unwrap_or(settings.export.page_size),
            self.max_pages.unwrap_or(settings.export.max_pages),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: ExportArgs,
    }

    fn parse(argv: &[&str]) -> ExportArgs {
        TestCli::try_parse_from(std::iter::once("test").chain(argv.iter().copied()))
            .unwrap()
            .args
    }

    fn settings() -> Settings {
        let mut settings = Settings::default();
        settings.sonar.url = Some("http://from-file:9000".to_string());
        settings.sonar.token = Some("file-token".to_string());
        settings.sonar.project_key = Some("file-proj".to_string());
        settings
    }

    #[test]
    fn parses_all_flags() {
        let args = parse(&[
            "--url",
            "http://h",
            "--token",
            "t",
            "--project",
            "p",
            "-o",
            "out.xlsx",
            "--page-size",
            "100",
            "--max-pages",
            "3",
        ]);
        assert_eq!(args.url.as_deref(), Some("http://h"));
        assert_eq!(args.output, Some(PathBuf::from("out.xlsx")));
        assert_eq!(args.page_size, Some(100));
        assert_eq!(args.max_pages, Some(3));
    }

    #[test]
    fn flags_override_settings() {
        let args = parse(&["-u", "http://flag", "-p", "flag-proj"]);
        let req = args.request(&settings());
        assert_eq!(req.sonar_url.as_deref(), Some("http://flag"));
        assert_eq!(req.token.as_deref(), Some("file-token"));
        assert_eq!(req.project_key.as_deref(), Some("flag-proj"));
    }

    #[test]
    fn no_flags_and_empty_settings_fail_validation() {
        let args = parse(&[]);
        let err = args.request(&Settings::default()).validate().unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn pagination_defaults_from_settings() {
        let args = parse(&[]);
        let pagination = args.pagination(&Settings::default()).unwrap();
        assert_eq!(pagination, PaginationConfig::default());
    }

    #[test]
    fn pagination_flag_is_validated() {
        let args = parse(&["--page-size", "1000"]);
        assert!(args.pagination(&Settings::default()).is_err());
    }
}
