//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::SessionInfo;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP and crawling behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Site location and known legislative sessions
    #[serde(default)]
    pub jurisdiction: JurisdictionConfig,

    /// Where scraped records are written
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        url::Url::parse(&self.jurisdiction.base_url).map_err(|e| {
            AppError::validation(format!(
                "jurisdiction.base_url '{}' is not a URL: {e}",
                self.jurisdiction.base_url
            ))
        })?;
        if self.jurisdiction.sessions.is_empty() {
            return Err(AppError::validation("No sessions defined"));
        }
        for session in &self.jurisdiction.sessions {
            if session.identifier.trim().is_empty() || session.slug.trim().is_empty() {
                return Err(AppError::validation(format!(
                    "session entry {:?} needs both identifier and slug",
                    session
                )));
            }
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawler: CrawlerConfig::default(),
            jurisdiction: JurisdictionConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// HTTP client and crawling behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay before each request in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
        }
    }
}

/// The legislature being scraped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JurisdictionConfig {
    /// Display name
    #[serde(default = "defaults::jurisdiction_name")]
    pub name: String,

    /// Site root every page URL is built from
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Known sessions, oldest first. The last entry is the latest session.
    #[serde(default = "defaults::sessions")]
    pub sessions: Vec<SessionInfo>,
}

impl Default for JurisdictionConfig {
    fn default() -> Self {
        Self {
            name: defaults::jurisdiction_name(),
            base_url: defaults::base_url(),
            sessions: defaults::sessions(),
        }
    }
}

impl JurisdictionConfig {
    /// The most recent known session.
    pub fn latest_session(&self) -> Option<&SessionInfo> {
        self.sessions.last()
    }

    /// Look up a session by its human identifier.
    pub fn find_session(&self, identifier: &str) -> Option<&SessionInfo> {
        self.sessions.iter().find(|s| s.identifier == identifier)
    }

    /// Root of a session's report pages.
    pub fn reports_url(&self, slug: &str) -> String {
        format!(
            "{}/Session/{}/Reports/",
            self.base_url.trim_end_matches('/'),
            slug
        )
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving one JSON file per record
    #[serde(default = "defaults::output_dir")]
    pub dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: defaults::output_dir(),
        }
    }
}

mod defaults {
    use crate::models::SessionInfo;

    // Crawler defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; nvleg/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn request_delay() -> u64 {
        250
    }

    // Jurisdiction defaults
    pub fn jurisdiction_name() -> String {
        "Nevada".into()
    }
    pub fn base_url() -> String {
        "https://www.leg.state.nv.us".into()
    }
    pub fn sessions() -> Vec<SessionInfo> {
        [
            ("75", "75th2009"),
            ("26", "26th2010Special"),
            ("76", "76th2011"),
            ("27", "27th2013Special"),
            ("77", "77th2013"),
            ("28", "28th2014Special"),
            ("78", "78th2015"),
            ("29", "29th2015Special"),
            ("30", "30th2016Special"),
            ("79", "79th2017"),
            ("80", "80th2019"),
        ]
        .into_iter()
        .map(|(identifier, slug)| SessionInfo::new(identifier, slug))
        .collect()
    }

    // Output defaults
    pub fn output_dir() -> String {
        "_data/nv".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.crawler.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_base_url() {
        let mut config = Config::default();
        config.jurisdiction.base_url = "leg.state.nv.us".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_sessions() {
        let mut config = Config::default();
        config.jurisdiction.sessions.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn latest_session_is_last_entry() {
        let config = Config::default();
        let latest = config.jurisdiction.latest_session().unwrap();
        assert_eq!(latest.identifier, "80");
        assert_eq!(latest.slug, "80th2019");
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"
            [crawler]
            timeout_secs = 5

            [[jurisdiction.sessions]]
            identifier = "81"
            slug = "81st2021"
            "#,
        )
        .unwrap();

        assert_eq!(config.crawler.timeout_secs, 5);
        assert_eq!(config.crawler.request_delay_ms, 250);
        assert_eq!(config.jurisdiction.base_url, "https://www.leg.state.nv.us");
        assert_eq!(config.jurisdiction.sessions.len(), 1);
        assert!(config.jurisdiction.find_session("81").is_some());
    }

    #[test]
    fn reports_url_trims_trailing_slash() {
        let mut config = Config::default();
        config.jurisdiction.base_url = "https://example.com/".to_string();
        assert_eq!(
            config.jurisdiction.reports_url("80th2019"),
            "https://example.com/Session/80th2019/Reports/"
        );
    }
}
