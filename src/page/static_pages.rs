//! In-memory page session for tests and offline replay

use std::collections::HashMap;

use async_trait::async_trait;

use super::{PageAccessor, PageError};

/// Session serving fixed markup per URL.
///
/// A URL may hold several renderings: successive `content` reads after a
/// navigation step through them and then keep returning the last one. This
/// stands in for a page that fills in after load.
#[derive(Debug, Default)]
pub struct StaticSession {
    pages: HashMap<String, Vec<String>>,
    current: Option<String>,
    reads: usize,
    history: Vec<String>,
}

impl StaticSession {
    /// Create an empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `markup` at `url`
    pub fn with_page(mut self, url: impl Into<String>, markup: impl Into<String>) -> Self {
        self.pages.insert(url.into(), vec![markup.into()]);
        self
    }

    /// Serve successive `renderings` at `url`
    pub fn with_renderings(mut self, url: impl Into<String>, renderings: Vec<String>) -> Self {
        self.pages.insert(url.into(), renderings);
        self
    }

    /// Every URL navigated to, in order
    pub fn history(&self) -> &[String] {
        &self.history
    }
}

#[async_trait]
impl PageAccessor for StaticSession {
    async fn navigate(&mut self, url: &str) -> Result<(), PageError> {
        self.history.push(url.to_string());
        if !self.pages.contains_key(url) {
            return Err(PageError::HttpStatus {
                url: url.to_string(),
                status: 404,
            });
        }
        self.current = Some(url.to_string());
        self.reads = 0;
        Ok(())
    }

    async fn content(&mut self) -> Result<String, PageError> {
        let url = self.current.as_ref().ok_or(PageError::NoPage)?;
        let renderings = self.pages.get(url).ok_or(PageError::NoPage)?;
        let index = self.reads.min(renderings.len().saturating_sub(1));
        self.reads += 1;
        renderings.get(index).cloned().ok_or(PageError::NoPage)
    }

    fn current_url(&self) -> Option<&str> {
        self.current.as_deref()
    }
}
