//! # Scrape Pipeline
//!
//! Wires the crawl phases to the report: discover every plot of the
//! configured authority, then visit each plot in order, extract its fields,
//! transform them and append one CSV row.
//!
//! Crawl failures abort the run. A plot whose own page fails is logged and
//! skipped unless `skip_failed_plots` is off, in which case it aborts the run
//! too. Session failures always abort. Rows written before an abort stay in
//! the report.

use std::path::PathBuf;

use tokio::sync::mpsc;
use tracing::{info, instrument, warn};

use crate::config::ScrapeConfig;
use crate::crawler;
use crate::error::Result;
use crate::extract::{self, WaitOptions};
use crate::fields::header_titles;
use crate::page::PageAccessor;
use crate::report::ReportWriter;
use crate::transform::{FormattedRecord, Transformer};

/// Progress events sent while plots are processed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// Crawl finished; this many plots will be visited
    Discovered { total: usize },
    /// A row was written
    Written { sequence: usize, url: String },
    /// A plot failed and was skipped
    Skipped { url: String, reason: String },
}

/// Outcome of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Authority scraped
    pub authority: String,
    /// Plot total shown in the authority listing
    pub advertised: Option<u32>,
    /// Plot links found across all schemes
    pub discovered: usize,
    /// Rows written to the report
    pub written: usize,
    /// Plots skipped after an error
    pub skipped: usize,
    /// Report location
    pub output: PathBuf,
}

impl RunSummary {
    /// Whether the written rows match the advertised total, when one was shown
    pub fn matches_advertised(&self) -> Option<bool> {
        self.advertised.map(|n| n as usize == self.written)
    }
}

async fn notify(progress: &Option<mpsc::Sender<Progress>>, event: Progress) {
    if let Some(tx) = progress {
        // A closed receiver only means nobody is watching.
        let _ = tx.send(event).await;
    }
}

/// Load, extract and transform one plot page.
async fn scrape_plot<P>(
    session: &mut P,
    transformer: &mut Transformer,
    url: &str,
    wait: WaitOptions,
) -> Result<FormattedRecord>
where
    P: PageAccessor + ?Sized,
{
    session.navigate(url).await?;
    let raw = extract::extract_plot(session, wait).await?;
    Ok(transformer.transform(&raw, url)?)
}

/// Run a full scrape with `session`, writing the report named in `config`.
#[instrument(skip(session, config, progress), fields(authority = %config.authority))]
pub async fn run<P>(
    session: &mut P,
    config: &ScrapeConfig,
    progress: Option<mpsc::Sender<Progress>>,
) -> Result<RunSummary>
where
    P: PageAccessor + ?Sized,
{
    let authority = crawler::find_authority(session, &config.entry_url, &config.authority).await?;
    let schemes = crawler::scheme_links(session, &authority.link, config.concurrency).await?;

    // An earlier report survives until the authority and its schemes resolve.
    let mut report = ReportWriter::open(&config.output).await?;
    report.write_header(header_titles()).await?;

    let plots = crawler::plot_links(session, &schemes).await?;
    notify(&progress, Progress::Discovered { total: plots.len() }).await;

    let wait = config.wait_options();
    let mut transformer = Transformer::new();
    let mut skipped = 0;

    for url in &plots {
        match scrape_plot(session, &mut transformer, url, wait).await {
            Ok(record) => {
                report.append_row(record.cells()).await?;
                info!("{} record added", report.rows());
                notify(
                    &progress,
                    Progress::Written {
                        sequence: report.rows(),
                        url: url.clone(),
                    },
                )
                .await;
            }
            Err(e) if config.skip_failed_plots && e.is_plot_local() => {
                warn!("Skipping {}: {}", url, e);
                skipped += 1;
                notify(
                    &progress,
                    Progress::Skipped {
                        url: url.clone(),
                        reason: e.to_string(),
                    },
                )
                .await;
            }
            Err(e) => {
                if let Err(close_err) = report.close().await {
                    warn!("Failed to close report: {}", close_err);
                }
                return Err(e);
            }
        }
    }
    report.close().await?;

    let summary = RunSummary {
        authority: authority.name,
        advertised: authority.plot_count,
        discovered: plots.len(),
        written: report.rows(),
        skipped,
        output: report.path().to_path_buf(),
    };

    info!(
        "Step 4 completed: {} of {} plots written to {}",
        summary.written,
        summary.discovered,
        summary.output.display()
    );
    if summary.matches_advertised() == Some(false) {
        warn!(
            "{} advertises {} plots but {} rows were written",
            summary.authority,
            summary.advertised.unwrap_or_default(),
            summary.written
        );
    }
    Ok(summary)
}
