//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the xdr-sweep configuration file.

use crate::config::{load_config, SweepConfig};
use clap::Args;
use secrecy::ExposeSecret;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // Loading also validates
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        println!("✅ Configuration is valid");
        println!();
        print_summary(&config);
        Ok(0)
    }
}

fn print_summary(config: &SweepConfig) {
    println!("Configuration Summary:");
    println!("  Environment: {:?}", config.environment);
    println!("  Log Level: {}", config.application.log_level);
    println!("  XDR API: {}", config.api.base_url);
    println!("  Token: {}", config.api.token.expose_secret().masked());
    println!("  Timeout: {}s", config.api.timeout_seconds);
    if !config.api.tls_verify {
        println!("  ⚠️  TLS verification: DISABLED");
    }
    println!("  Tenants: {:?}", config.query.tenant_ids);
    if !config.query.statuses.is_empty() {
        println!("  Statuses: {:?}", config.query.statuses);
    }
    if let Some(from) = &config.query.from_date {
        println!("  From: {from}");
    }
    if let Some(to) = &config.query.to_date {
        println!("  To: {to}");
    }
    println!("  Start Page: {}", config.query.page_number);
    println!(
        "  Concurrent Pages: {}",
        config.fetch.max_concurrent_pages
    );
    println!("  Flush Every: {} alerts", config.fetch.flush_every);
    println!("  Output File: {}", config.fetch.output_file);

    if config.filter.enabled {
        println!(
            "  Filters: {} rule(s) -> {}",
            config.filter.rules.len(),
            config.filter.output_file
        );
        for rule in &config.filter.rules {
            println!("    - {} contains \"{}\"", rule.field, rule.value);
        }
    } else {
        println!("  Filters: disabled");
    }

    if config.close.enabled {
        println!(
            "  Close: enabled (reason {}, {} concurrent, {} attempts)",
            config.close.reason, config.close.max_concurrency, config.close.max_attempts
        );
    } else {
        println!("  Close: disabled");
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_config_is_exit_code_2() {
        let args = ValidateArgs {};
        let code = args
            .execute("definitely-missing-xdr-sweep.toml")
            .await
            .unwrap();
        assert_eq!(code, 2);
    }
}
