//! Fetch command implementation
//!
//! Runs the whole sweep: paginated fetch with streaming output, optional
//! filtering and optional closing of the matches.

use crate::config::{load_config, SweepConfig};
use crate::core::sweep::{RunSummary, SweepCoordinator};
use clap::Args;
use tokio::sync::watch;

/// Arguments for the fetch command
#[derive(Args, Debug, Default)]
pub struct FetchArgs {
    /// Skip the confirmation prompt shown when closing is enabled
    #[arg(short, long)]
    pub yes: bool,

    /// Override the first page to fetch
    #[arg(long)]
    pub page: Option<u32>,

    /// Override the number of concurrent page requests
    #[arg(long)]
    pub max_concurrent_pages: Option<usize>,

    /// Override the flush threshold
    #[arg(long)]
    pub flush_every: Option<usize>,

    /// Override the streaming output file
    #[arg(short, long)]
    pub output: Option<String>,

    /// Enable filtering
    #[arg(long, conflicts_with = "no_filter")]
    pub filter: bool,

    /// Disable filtering
    #[arg(long)]
    pub no_filter: bool,

    /// Close filtered alerts
    #[arg(long, conflicts_with = "no_close")]
    pub close: bool,

    /// Do not close filtered alerts
    #[arg(long)]
    pub no_close: bool,

    /// Override the close reason
    #[arg(long)]
    pub close_reason: Option<String>,
}

impl FetchArgs {
    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply_overrides(&self, config: &mut SweepConfig) {
        if let Some(page) = self.page {
            tracing::info!(page = page, "Overriding start page from CLI");
            config.query.page_number = page;
        }

        if let Some(pages) = self.max_concurrent_pages {
            tracing::info!(
                max_concurrent_pages = pages,
                "Overriding page concurrency from CLI"
            );
            config.fetch.max_concurrent_pages = pages;
        }

        if let Some(every) = self.flush_every {
            tracing::info!(flush_every = every, "Overriding flush threshold from CLI");
            config.fetch.flush_every = every;
        }

        if let Some(output) = &self.output {
            tracing::info!(output = %output, "Overriding output file from CLI");
            config.fetch.output_file = output.clone();
        }

        if self.filter {
            config.filter.enabled = true;
        } else if self.no_filter {
            config.filter.enabled = false;
        }

        if self.close {
            config.close.enabled = true;
        } else if self.no_close {
            config.close.enabled = false;
        }

        if let Some(reason) = &self.close_reason {
            tracing::info!(reason = %reason, "Overriding close reason from CLI");
            config.close.reason = reason.clone();
        }
    }

    /// Execute the fetch command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting fetch command");

        let mut config = match load_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("❌ {e}");
                return Ok(2);
            }
        };

        self.apply_overrides(&mut config);

        // Validate configuration
        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2); // Configuration error exit code
        }

        // Closing changes server state; ask first unless --yes
        if config.close.enabled && config.filter.enabled && !self.yes {
            println!("Close Configuration:");
            println!("  API: {}", config.api.base_url);
            println!("  Tenants: {:?}", config.query.tenant_ids);
            println!("  Filters: {}", config.filter.rules.len());
            println!("  Reason: {}", config.close.reason);
            println!();
            print!("Every alert matching the filters will be closed. Proceed? [y/N]: ");
            use std::io::{self, Write};
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Fetch cancelled.");
                return Ok(0);
            }
        }

        let coordinator = match SweepCoordinator::new(config, shutdown_signal) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create sweep coordinator");
                eprintln!("Failed to initialize fetch: {e}");
                return Ok(2);
            }
        };

        println!("🚀 Fetching alerts...");
        println!();

        let summary = match coordinator.execute().await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Sweep failed");
                eprintln!("Fetch failed: {e}");
                return Ok(5); // Fatal error exit code
            }
        };

        print_summary(&summary);

        Ok(exit_code(&summary))
    }
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("📊 Fetch Summary:");
    println!("  Pages fetched: {}", summary.pages_fetched);
    println!("  Pages failed: {}", summary.pages_failed);
    println!(
        "  Alerts written: {} ({})",
        summary.alerts_written,
        summary.output_file.display()
    );
    if let Some(filtered) = summary.alerts_filtered {
        match &summary.filtered_file {
            Some(path) => println!("  Alerts matched: {} ({})", filtered, path.display()),
            None => println!("  Alerts matched: {filtered}"),
        }
    }
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!();

    if let Some(close) = &summary.close {
        println!("🔒 Close Summary:");
        println!("  Success: {}", close.succeeded);
        println!("  Failed: {}", close.failed);
        println!("  Total: {}", close.total);
        for failure in &close.failures {
            println!(
                "  ✗ Failed to close {} ({}): {}",
                failure.alert_name,
                failure.alert_id,
                failure.error.as_deref().unwrap_or("unknown error")
            );
        }
        println!();
    }

    let fetch_errors: Vec<_> = summary
        .errors
        .iter()
        .filter(|e| e.kind == crate::core::sweep::RunErrorKind::Fetch)
        .collect();
    if !fetch_errors.is_empty() {
        println!("⚠️  Page errors:");
        for error in fetch_errors {
            println!(
                "  - {}: {}",
                error.context.as_deref().unwrap_or("page=?"),
                error.message
            );
        }
        println!();
    }
}

/// Map a finished run to the process exit code
pub fn exit_code(summary: &RunSummary) -> i32 {
    if summary.interrupted {
        println!("⚠️  Fetch interrupted. The output file holds every alert fetched so far.");
        tracing::info!("Fetch interrupted by user signal");
        130 // SIGINT exit code (standard Unix convention)
    } else if summary.is_successful() {
        println!("✅ Fetch completed successfully!");
        0
    } else {
        println!("⚠️  Fetch completed with failures");
        1 // Partial success
    }
}
