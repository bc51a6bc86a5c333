//! Headless Chrome page session

use std::ffi::OsStr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions, Tab};
use tracing::{debug, info, instrument};

use super::{PageAccessor, PageError};

/// How long the browser may sit idle between driver commands
const IDLE_TIMEOUT_SECS: u64 = 600;

/// Browser launch options
#[derive(Debug, Clone, Default)]
pub struct BrowserOptions {
    /// Browser executable; `None` lets the driver locate one
    pub driver_path: Option<PathBuf>,

    /// Run without a visible window
    pub headless: bool,

    /// Start an incognito profile
    pub private: bool,
}

/// Session driving a single Chrome tab.
///
/// The driver is blocking, so every command runs on tokio's blocking pool.
pub struct BrowserSession {
    browser: Option<Browser>,
    tab: Arc<Tab>,
    current_url: Option<String>,
}

impl BrowserSession {
    /// Launch a browser and open the tab this session will drive
    #[instrument]
    pub async fn launch(options: BrowserOptions) -> Result<Self, PageError> {
        let (browser, tab) = tokio::task::spawn_blocking(move || {
            let mut args = Vec::new();
            if options.private {
                args.push(OsStr::new("--incognito"));
            }

            let launch = LaunchOptions::default_builder()
                .headless(options.headless)
                .path(options.driver_path)
                .args(args)
                .idle_browser_timeout(Duration::from_secs(IDLE_TIMEOUT_SECS))
                .build()
                .map_err(|e| PageError::Browser(e.to_string()))?;

            let browser = Browser::new(launch).map_err(|e| PageError::Browser(e.to_string()))?;
            let tab = browser
                .new_tab()
                .map_err(|e| PageError::Browser(e.to_string()))?;
            Ok::<_, PageError>((browser, tab))
        })
        .await??;

        info!("Browser session started");
        Ok(Self {
            browser: Some(browser),
            tab,
            current_url: None,
        })
    }
}

#[async_trait]
impl PageAccessor for BrowserSession {
    #[instrument(skip(self))]
    async fn navigate(&mut self, url: &str) -> Result<(), PageError> {
        let tab = Arc::clone(&self.tab);
        let target = url.to_string();
        let landed = tokio::task::spawn_blocking(move || {
            tab.navigate_to(&target)
                .and_then(|tab| tab.wait_until_navigated())
                .map(|tab| tab.get_url())
                .map_err(|e| PageError::Browser(e.to_string()))
        })
        .await??;

        debug!("Navigated to {}", landed);
        self.current_url = Some(landed);
        Ok(())
    }

    async fn content(&mut self) -> Result<String, PageError> {
        if self.current_url.is_none() {
            return Err(PageError::NoPage);
        }
        let tab = Arc::clone(&self.tab);
        tokio::task::spawn_blocking(move || {
            tab.get_content()
                .map_err(|e| PageError::Browser(e.to_string()))
        })
        .await?
    }

    fn current_url(&self) -> Option<&str> {
        self.current_url.as_deref()
    }

    async fn close(&mut self) -> Result<(), PageError> {
        // Dropping the browser terminates the child process.
        if self.browser.take().is_some() {
            info!("Browser session closed");
        }
        Ok(())
    }
}
