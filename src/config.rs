//! # Scrape Configuration
//!
//! Run settings, loaded from a JSON file (camelCase keys, every key optional)
//! and adjusted through `ScrapeConfigBuilder` or CLI overrides.
//!
//! ```json
//! { "driverPath": "/usr/bin/chromium", "concurrency": 4, "private": true,
//!   "headless": true, "logging": true }
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::extract::WaitOptions;
use crate::page::BrowserOptions;

/// Entry listing of the state's auction portal
pub const DEFAULT_ENTRY_URL: &str = "http://udhonline.rajasthan.gov.in/Portal/AuctionListNew";

/// Authority scraped when none is configured
pub const DEFAULT_AUTHORITY: &str = "Jaipur Development Authority";

/// Which page session drives the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Driver {
    /// Headless Chrome; renders scripted pages
    #[default]
    Browser,
    /// Plain HTTP requests; no script execution
    Http,
}

/// Configuration for a scrape run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScrapeConfig {
    /// Top-level authority listing
    pub entry_url: String,

    /// Authority name as shown in the listing
    pub authority: String,

    /// CSV report path
    pub output: PathBuf,

    /// Session implementation
    pub driver: Driver,

    /// Browser binary; auto-detected when unset
    pub driver_path: Option<PathBuf>,

    /// Run the browser without a window
    pub headless: bool,

    /// Launch the browser in incognito mode
    pub private: bool,

    /// Worker cap for scheme row parsing
    pub concurrency: usize,

    /// Emit progress messages
    pub logging: bool,

    /// Also write logs to this file
    pub log_file: Option<PathBuf>,

    /// How long a plot page may take to render, in milliseconds
    pub wait_timeout_ms: u64,

    /// Delay between render checks, in milliseconds
    pub poll_interval_ms: u64,

    /// Log and skip plots that fail instead of aborting the run
    pub skip_failed_plots: bool,

    /// User agent for the HTTP session
    pub user_agent: String,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            entry_url: DEFAULT_ENTRY_URL.to_string(),
            authority: DEFAULT_AUTHORITY.to_string(),
            output: PathBuf::from("plots.csv"),
            driver: Driver::default(),
            driver_path: None,
            headless: true,
            private: false,
            concurrency: 4,
            logging: true,
            log_file: None,
            wait_timeout_ms: 60_000,
            poll_interval_ms: 500,
            skip_failed_plots: true,
            user_agent: format!("plotscrape/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Builder for ScrapeConfig
#[derive(Debug, Default)]
pub struct ScrapeConfigBuilder {
    config: ScrapeConfig,
}

impl ScrapeConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: ScrapeConfig::default(),
        }
    }

    /// Start from an existing configuration
    pub fn from_config(config: ScrapeConfig) -> Self {
        Self { config }
    }

    pub fn entry_url(mut self, entry_url: impl Into<String>) -> Self {
        self.config.entry_url = entry_url.into();
        self
    }

    pub fn authority(mut self, authority: impl Into<String>) -> Self {
        self.config.authority = authority.into();
        self
    }

    pub fn output(mut self, output: impl Into<PathBuf>) -> Self {
        self.config.output = output.into();
        self
    }

    pub fn driver(mut self, driver: Driver) -> Self {
        self.config.driver = driver;
        self
    }

    pub fn driver_path(mut self, driver_path: impl Into<PathBuf>) -> Self {
        self.config.driver_path = Some(driver_path.into());
        self
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    pub fn private(mut self, private: bool) -> Self {
        self.config.private = private;
        self
    }

    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.config.concurrency = concurrency;
        self
    }

    pub fn logging(mut self, logging: bool) -> Self {
        self.config.logging = logging;
        self
    }

    pub fn log_file(mut self, log_file: impl Into<PathBuf>) -> Self {
        self.config.log_file = Some(log_file.into());
        self
    }

    /// Set the render wait bounds
    pub fn wait(mut self, timeout: Duration, poll_interval: Duration) -> Self {
        self.config.wait_timeout_ms = timeout.as_millis() as u64;
        self.config.poll_interval_ms = poll_interval.as_millis() as u64;
        self
    }

    pub fn skip_failed_plots(mut self, skip: bool) -> Self {
        self.config.skip_failed_plots = skip;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Build the configuration
    pub fn build(self) -> ScrapeConfig {
        self.config
    }
}

impl ScrapeConfig {
    /// Create a new builder
    pub fn builder() -> ScrapeConfigBuilder {
        ScrapeConfigBuilder::new()
    }

    /// Read a JSON configuration file
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let config = tokio::fs::read_to_string(path).await?;
        let config: Self = serde_json::from_str(&config)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings no run can use
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.entry_url)
            .map_err(|e| Error::Config(format!("entryUrl `{}`: {}", self.entry_url, e)))?;
        if self.authority.trim().is_empty() {
            return Err(Error::Config("authority must not be empty".to_string()));
        }
        if self.concurrency == 0 {
            return Err(Error::Config("concurrency must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Render wait bounds for plot pages
    pub fn wait_options(&self) -> WaitOptions {
        WaitOptions {
            timeout: Duration::from_millis(self.wait_timeout_ms),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        }
    }

    /// Launch options for the browser session
    pub fn browser_options(&self) -> BrowserOptions {
        BrowserOptions {
            driver_path: self.driver_path.clone(),
            headless: self.headless,
            private: self.private,
        }
    }
}
