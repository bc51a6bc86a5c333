//! # plotscrape - Auction Portal Plot Scraper
//!
//! Crawls a government land-auction portal from an authority down to every
//! individual plot auction, reads each plot's details from its sectioned
//! detail page, and writes one normalised CSV row per plot.
//!
//! ## Features
//!
//! - Authority → scheme → paginated plot listing crawl
//! - Field extraction from fixed table positions under titled sections
//! - Typed record assembly with derived columns (area in square yards, total
//!   price, corner/commercial flags)
//! - Rupee amounts with Indian digit grouping (`₹12,34,567.89`)
//! - Interchangeable page sessions: headless Chrome, plain HTTP, or in-memory
//! - Async API with Tokio, structured logging with `tracing`
//!
//! ## Example
//!
//! ```rust,no_run
//! use plotscrape::config::{Driver, ScrapeConfig};
//! use plotscrape::page::HttpSession;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ScrapeConfig::builder()
//!         .driver(Driver::Http)
//!         .output("jda-plots.csv")
//!         .build();
//!
//!     let mut session = HttpSession::new(&config.user_agent)?;
//!     let summary = plotscrape::pipeline::run(&mut session, &config, None).await?;
//!
//!     println!("{} plots written", summary.written);
//!     Ok(())
//! }
//! ```

mod error;

pub mod config;
pub mod crawler;
pub mod extract;
pub mod fields;
pub mod page;
pub mod pipeline;
pub mod report;
pub mod transform;

#[cfg(test)]
mod fixtures;

pub use error::Error;

/// Re-export of types module for public use
pub mod prelude {
    pub use crate::config::{Driver, ScrapeConfig};
    pub use crate::error::Error;
    pub use crate::error::Result;
    pub use crate::page::PageAccessor;
    pub use crate::pipeline::{RunSummary, run};
}
