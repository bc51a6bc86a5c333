//! Plain HTTP page session

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use super::{PageAccessor, PageError};

/// Default timeout for page requests in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Session that loads pages over HTTP without running scripts.
///
/// Works for server-rendered portals. The body fetched by `navigate` is what
/// `content` returns until the next navigation.
pub struct HttpSession {
    client: Client,
    current: Option<LoadedPage>,
}

struct LoadedPage {
    url: String,
    body: String,
}

impl HttpSession {
    /// Create a session sending `user_agent` with every request
    pub fn new(user_agent: &str) -> Result<Self, PageError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .cookie_store(true)
            .build()?;

        Ok(Self {
            client,
            current: None,
        })
    }
}

#[async_trait]
impl PageAccessor for HttpSession {
    #[instrument(skip(self))]
    async fn navigate(&mut self, url: &str) -> Result<(), PageError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PageError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().to_string();
        let body = response.text().await?;
        debug!("Loaded {} ({} bytes)", final_url, body.len());

        self.current = Some(LoadedPage {
            url: final_url,
            body,
        });
        Ok(())
    }

    async fn content(&mut self) -> Result<String, PageError> {
        self.current
            .as_ref()
            .map(|page| page.body.clone())
            .ok_or(PageError::NoPage)
    }

    fn current_url(&self) -> Option<&str> {
        self.current.as_ref().map(|page| page.url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::snapshot;
    use mockito::Server;

    #[tokio::test]
    async fn test_navigate_and_snapshot() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/Portal/AuctionListNew")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<html><body><table><tr><td>Jaipur Development Authority</td></tr></table></body></html>")
            .expect(1)
            .create_async()
            .await;

        let mut session = HttpSession::new("plotscrape-test").unwrap();
        let url = format!("{}/Portal/AuctionListNew", server.url());
        session.navigate(&url).await.unwrap();
        assert_eq!(session.current_url(), Some(url.as_str()));

        let page = snapshot(&mut session).await.unwrap();
        let td = page.find("td").unwrap();
        assert_eq!(td.text().collect::<String>(), "Jaipur Development Authority");

        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let mut session = HttpSession::new("plotscrape-test").unwrap();
        let err = session
            .navigate(&format!("{}/missing", server.url()))
            .await
            .unwrap_err();
        assert!(matches!(err, PageError::HttpStatus { status: 404, .. }));
        assert!(session.current_url().is_none());
    }

    #[tokio::test]
    async fn test_content_before_navigation() {
        let mut session = HttpSession::new("plotscrape-test").unwrap();
        tokio_test::assert_err!(session.content().await);
    }
}
