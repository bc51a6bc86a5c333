//! Parsed DOM snapshot of a loaded page

use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::error::PageError;

/// A parsed copy of one loaded page.
///
/// Snapshots are cheap to discard; take a new one whenever the session's page
/// may have changed.
pub struct Page {
    url: Url,
    document: Html,
}

impl Page {
    /// Parse `markup` as the document found at `url`.
    pub fn parse(url: &str, markup: &str) -> Result<Self, PageError> {
        Ok(Self {
            url: Url::parse(url)?,
            document: Html::parse_document(markup),
        })
    }

    /// URL the snapshot was taken from
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The underlying document
    pub fn document(&self) -> &Html {
        &self.document
    }

    /// First element matching `query`, in document order.
    pub fn find(&self, query: &str) -> Result<ElementRef<'_>, PageError> {
        let selector = selector(query)?;
        self.document
            .select(&selector)
            .next()
            .ok_or_else(|| PageError::not_found(query))
    }

    /// Every element matching `query`, in document order. May be empty.
    pub fn find_all(&self, query: &str) -> Result<Vec<ElementRef<'_>>, PageError> {
        let selector = selector(query)?;
        Ok(self.document.select(&selector).collect())
    }

    /// Resolve an `href` against this page, the way a browser reports it.
    pub fn resolve(&self, href: &str) -> Result<String, PageError> {
        Ok(self.url.join(href.trim())?.to_string())
    }
}

/// Parse a CSS selector, keeping the query in the error.
pub(crate) fn selector(query: &str) -> Result<Selector, PageError> {
    Selector::parse(query).map_err(|e| PageError::InvalidSelector {
        query: query.to_string(),
        reason: e.to_string(),
    })
}
