//! # plotscrape CLI
//!
//! Command-line front end for the auction portal scraper.
//!
//! - `scrape`: crawl one authority's auctions and write the CSV report
//! - `columns`: print the report's column titles
//!
//! Settings come from an optional JSON config file; flags override it.

mod telemetry;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use plotscrape::config::{Driver, ScrapeConfig, ScrapeConfigBuilder};
use plotscrape::page::{BrowserSession, HttpSession, PageAccessor};
use plotscrape::pipeline::{self, Progress, RunSummary};
use tokio::sync::mpsc;
use tracing::{error, instrument, warn};

#[derive(Parser)]
#[command(author, version, about = "Scrape plot auctions from the Rajasthan UDH portal into a CSV report", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Crawl an authority's auctions and write the plot report
    Scrape(ScrapeArgs),

    /// Print the report's column titles
    Columns,
}

#[derive(Args, Debug)]
struct ScrapeArgs {
    /// JSON config file (camelCase keys)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// CSV report path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Authority name as shown in the portal listing
    #[arg(short, long)]
    authority: Option<String>,

    /// Authority listing URL
    #[arg(long)]
    entry_url: Option<String>,

    /// Page session to use
    #[arg(long, value_enum)]
    driver: Option<Driver>,

    /// Browser binary
    #[arg(long)]
    driver_path: Option<PathBuf>,

    /// Show the browser window
    #[arg(long)]
    headed: bool,

    /// Launch the browser in incognito mode
    #[arg(long)]
    private: bool,

    /// Workers reading scheme rows
    #[arg(short = 'j', long)]
    concurrency: Option<usize>,

    /// Seconds to wait for a plot page to render
    #[arg(long)]
    wait_timeout: Option<u64>,

    /// Abort on the first plot that fails instead of skipping it
    #[arg(long)]
    fail_fast: bool,

    /// Hide progress messages and show a progress bar instead
    #[arg(short, long)]
    quiet: bool,

    /// Also write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl ScrapeArgs {
    /// Config file (or defaults) with the flags applied on top
    async fn into_config(self) -> anyhow::Result<ScrapeConfig> {
        let base = match &self.config {
            Some(path) => ScrapeConfig::from_file(path)
                .await
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => ScrapeConfig::default(),
        };

        let mut builder = ScrapeConfigBuilder::from_config(base);
        if let Some(output) = self.output {
            builder = builder.output(output);
        }
        if let Some(authority) = self.authority {
            builder = builder.authority(authority);
        }
        if let Some(entry_url) = self.entry_url {
            builder = builder.entry_url(entry_url);
        }
        if let Some(driver) = self.driver {
            builder = builder.driver(driver);
        }
        if let Some(driver_path) = self.driver_path {
            builder = builder.driver_path(driver_path);
        }
        if self.headed {
            builder = builder.headless(false);
        }
        if self.private {
            builder = builder.private(true);
        }
        if let Some(concurrency) = self.concurrency {
            builder = builder.concurrency(concurrency);
        }
        if self.fail_fast {
            builder = builder.skip_failed_plots(false);
        }
        if self.quiet {
            builder = builder.logging(false);
        }
        if let Some(log_file) = self.log_file {
            builder = builder.log_file(log_file);
        }

        let mut config = builder.build();
        if let Some(secs) = self.wait_timeout {
            let poll = Duration::from_millis(config.poll_interval_ms);
            config = ScrapeConfigBuilder::from_config(config)
                .wait(Duration::from_secs(secs), poll)
                .build();
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Scrape(args)) => {
            let config = args.into_config().await?;
            let _guard =
                telemetry::init_tracing_subscriber(config.logging, config.log_file.as_deref())?;
            scrape_command(config).await?;
        }
        Some(Commands::Columns) => {
            for title in plotscrape::fields::header_titles() {
                println!("{}", title);
            }
        }
        None => {
            // If no command is provided, show help
            let _ = Cli::parse_from(["plotscrape", "--help"]);
        }
    }

    Ok(())
}

#[instrument(skip(config), fields(authority = %config.authority))]
async fn scrape_command(config: ScrapeConfig) -> anyhow::Result<()> {
    let summary = match config.driver {
        Driver::Http => {
            let session = HttpSession::new(&config.user_agent)?;
            run_session(session, &config).await?
        }
        Driver::Browser => {
            let session = BrowserSession::launch(config.browser_options())
                .await
                .context("Failed to launch browser")?;
            run_session(session, &config).await?
        }
    };

    println!(
        "Wrote {} of {} plots for {} to {}",
        summary.written,
        summary.discovered,
        summary.authority,
        summary.output.display()
    );
    if summary.skipped > 0 {
        println!("Skipped {} plots; see the log for reasons", summary.skipped);
    }
    if let (Some(false), Some(advertised)) = (summary.matches_advertised(), summary.advertised) {
        println!("The portal advertises {} plots for this authority", advertised);
    }
    Ok(())
}

/// Run the pipeline and release the session whether or not it succeeded.
async fn run_session<P>(mut session: P, config: &ScrapeConfig) -> anyhow::Result<RunSummary>
where
    P: PageAccessor,
{
    let (progress_sender, progress_handle) = if config.logging {
        (None, None)
    } else {
        let (sender, receiver) = mpsc::channel(100);
        (Some(sender), Some(tokio::spawn(show_progress(receiver))))
    };

    let result = pipeline::run(&mut session, config, progress_sender).await;

    // The progress task ends once the pipeline has dropped its sender.
    if let Some(handle) = progress_handle {
        let _ = handle.await;
    }
    if let Err(e) = session.close().await {
        warn!("Failed to close session: {}", e);
    }

    result.map_err(|e| {
        error!("Scrape failed: {}", e);
        anyhow::Error::new(e).context(format!(
            "Scrape aborted; {} holds the rows written so far",
            config.output.display()
        ))
    })
}

async fn show_progress(mut receiver: mpsc::Receiver<Progress>) {
    let progress_bar = ProgressBar::new(0);
    let style = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} ({eta}) {msg}")
        .map(|style| style.progress_chars("##-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress_bar.set_style(style);
    progress_bar.set_message("Discovering plots...");

    while let Some(event) = receiver.recv().await {
        match event {
            Progress::Discovered { total } => {
                progress_bar.set_length(total as u64);
                progress_bar.set_message("Extracting plots...");
            }
            Progress::Written { sequence, url } => {
                progress_bar.inc(1);
                progress_bar.set_message(format!("Record {} from {}", sequence, url));
            }
            Progress::Skipped { url, .. } => {
                progress_bar.inc(1);
                progress_bar.set_message(format!("Skipped {}", url));
            }
        }
    }
    progress_bar.finish_with_message("Done");
}
