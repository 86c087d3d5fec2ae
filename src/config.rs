use std::path::Path;

use serde::Deserialize;

use crate::error::{AppError, AppResult, ConfigError};

/// Runtime configuration
///
/// Resolution order: `Default` → optional TOML file → environment variables.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Attach to a browser already listening on this debug port instead of launching one
    pub browser_debug_port: Option<u16>,
    /// Chromium/Chrome executable for the launched browser
    pub chrome_executable: Option<String>,
    /// Launch without a visible window
    pub headless: bool,
    /// User-Agent for Crossref and direct HTTP fetches
    pub user_agent: String,
    /// Crossref REST API base URL
    pub crossref_api_base: String,
    /// Works requested per journal
    pub crossref_rows: usize,
    /// Contact address for the Crossref polite pool
    pub crossref_mailto: Option<String>,
    pub page_load_timeout_secs: u64,
    pub api_timeout_secs: u64,
    pub pdf_timeout_secs: u64,
    /// Delay after each candidate attempt and after each journal
    pub polite_delay_ms: u64,
    /// Wait for Enter before closing the browser
    pub pause_before_exit: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            browser_debug_port: None,
            chrome_executable: None,
            headless: true,
            user_agent: "AcademicLinkTester/1.0".to_string(),
            crossref_api_base: "https://api.crossref.org".to_string(),
            crossref_rows: 50,
            crossref_mailto: None,
            page_load_timeout_secs: 5,
            api_timeout_secs: 10,
            pdf_timeout_secs: 15,
            polite_delay_ms: 500,
            pause_before_exit: true,
        }
    }
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        Self::default().with_env_overrides()
    }

    /// Load a TOML file, then apply environment overrides on top of it.
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;
        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::TomlParseFailed {
                path: path.display().to_string(),
                source,
            })?;
        config.with_env_overrides()
    }

    /// `--config` file when given, environment only otherwise
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::from_env(),
        }
    }

    fn with_env_overrides(self) -> AppResult<Self> {
        Ok(Self {
            browser_debug_port: match env_parse::<u16>("LINKCHECK_BROWSER_DEBUG_PORT", "port")? {
                Some(port) => Some(port),
                None => self.browser_debug_port,
            },
            chrome_executable: std::env::var("LINKCHECK_CHROME_EXECUTABLE")
                .ok()
                .or(self.chrome_executable),
            headless: env_parse("LINKCHECK_HEADLESS", "bool")?.unwrap_or(self.headless),
            user_agent: std::env::var("LINKCHECK_USER_AGENT").unwrap_or(self.user_agent),
            crossref_api_base: std::env::var("LINKCHECK_CROSSREF_API_BASE")
                .unwrap_or(self.crossref_api_base),
            crossref_rows: env_parse("LINKCHECK_CROSSREF_ROWS", "integer")?
                .unwrap_or(self.crossref_rows),
            crossref_mailto: std::env::var("LINKCHECK_CROSSREF_MAILTO")
                .ok()
                .or(self.crossref_mailto),
            page_load_timeout_secs: env_parse("LINKCHECK_PAGE_LOAD_TIMEOUT_SECS", "integer")?
                .unwrap_or(self.page_load_timeout_secs),
            api_timeout_secs: env_parse("LINKCHECK_API_TIMEOUT_SECS", "integer")?
                .unwrap_or(self.api_timeout_secs),
            pdf_timeout_secs: env_parse("LINKCHECK_PDF_TIMEOUT_SECS", "integer")?
                .unwrap_or(self.pdf_timeout_secs),
            polite_delay_ms: env_parse("LINKCHECK_POLITE_DELAY_MS", "integer")?
                .unwrap_or(self.polite_delay_ms),
            pause_before_exit: env_parse("LINKCHECK_PAUSE_BEFORE_EXIT", "bool")?
                .unwrap_or(self.pause_before_exit),
        })
    }
}

fn env_parse<T: std::str::FromStr>(var_name: &str, expected_type: &str) -> AppResult<Option<T>> {
    match std::env::var(var_name) {
        Ok(value) => value.trim().parse().map(Some).map_err(|_| {
            ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }
            .into()
        }),
        Err(_) => Ok(None),
    }
}
