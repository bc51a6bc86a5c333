//! # Page Session Module
//!
//! The only part of the crate that touches the live portal. A session loads one
//! page at a time; everything else queries a [`Page`] snapshot of whatever the
//! session currently shows.
//!
//! ## Key Components
//!
//! - `PageAccessor`: navigation + content capability implemented by each session
//! - `Page`: parsed DOM snapshot with `find` / `find_all` structural queries
//! - `HttpSession`: plain HTTP session backed by reqwest
//! - `BrowserSession`: headless Chrome session for script-rendered pages
//! - `StaticSession`: in-memory pages for tests and offline replay
//!
//! Sessions are passed explicitly to every component. There is no global driver.

mod browser;
pub mod dom;
mod error;
mod http;
mod snapshot;
mod static_pages;

pub use browser::{BrowserOptions, BrowserSession};
pub use error::PageError;
pub use http::HttpSession;
pub use snapshot::Page;
pub use static_pages::StaticSession;

use async_trait::async_trait;
use tracing::debug;

/// Navigation and content capability of a page session.
///
/// Only one navigation is ever in flight: every method takes `&mut self`.
#[async_trait]
pub trait PageAccessor: Send {
    /// Load `url` as the session's current page.
    async fn navigate(&mut self, url: &str) -> Result<(), PageError>;

    /// Read the current page's markup as it stands right now.
    async fn content(&mut self) -> Result<String, PageError>;

    /// URL of the current page after redirects.
    fn current_url(&self) -> Option<&str>;

    /// Release the session. Called once at the end of a run, even on failure.
    async fn close(&mut self) -> Result<(), PageError> {
        Ok(())
    }
}

/// Take a fresh snapshot of the session's current page.
pub async fn snapshot<P>(session: &mut P) -> Result<Page, PageError>
where
    P: PageAccessor + ?Sized,
{
    let markup = session.content().await?;
    let url = session.current_url().ok_or(PageError::NoPage)?;
    debug!("Snapshot of {} ({} bytes)", url, markup.len());
    Page::parse(url, &markup)
}

/// Navigate and snapshot in one step.
pub async fn open<P>(session: &mut P, url: &str) -> Result<Page, PageError>
where
    P: PageAccessor + ?Sized,
{
    session.navigate(url).await?;
    snapshot(session).await
}
