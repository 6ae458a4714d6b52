//! Init command implementation
//!
//! This module implements the `init` command for generating a starter
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "xdr-sweep.toml")]
    pub output: String,

    /// Include filter and close examples
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing xdr-sweep configuration");
        println!();

        // Check if file already exists
        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        let config_content = generate_config(self.with_examples);

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your tenant IDs and API URL", self.output);
                println!("  2. Export XDR_SWEEP_TOKEN or put it in a .env file");
                println!("  3. Validate configuration: xdr-sweep validate-config");
                println!("  4. Fetch alerts: xdr-sweep fetch");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5) // Fatal error exit code
            }
        }
    }
}

const MINIMAL_CONFIG: &str = r#"# xdr-sweep configuration

environment = "development"  # development | staging | production

[application]
log_level = "info"
verbose = false

[api]
base_url = "https://mydomain.com/xdr/api/v1"
token = "${XDR_SWEEP_TOKEN}"
timeout_seconds = 60
tls_verify = true

[query]
page_number = 1
tenant_ids = ["00000000-0000-0000-0000-000000000000"]
statuses = []
# from_date = "2025-01-01T00:00:00Z"
# to_date = "2025-01-31T23:59:59Z"

[fetch]
max_concurrent_pages = 50
page_size = 100
flush_every = 1000
output_file = "out.json"

[filter]
enabled = false
output_file = "filtered.json"
rules = []

[close]
enabled = false
reason = "falsePositive"

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#;

const EXAMPLE_SECTIONS: &str = r#"
# ---------------------------------------------------------------------------
# Examples
#
# Filter rules use "Section|Field". All rules must match; values are
# case-insensitive substrings.
#
#   Observable: value, type, details
#   Rule:       name, id, type, severity, confidence
#   BaseEvent:  destinationaddress, sourceaddress, deviceaddress,
#               devicehostname, deviceaction, devicevendor, deviceproduct,
#               transportprotocol, applicationprotocol, message, name,
#               destinationport, sourceport
#   Alert:      name, severity, status, internalid, incidentid, externalref
#
# [filter]
# enabled = true
# rules = [
#     { field = "Rule|Name", value = "port scan" },
#     { field = "BaseEvent|SourceAddress", value = "10.20." },
# ]
#
# [close]
# enabled = true
# reason = "falsePositive"
# max_concurrency = 10
# max_attempts = 3
# backoff_unit_ms = 1000
#
# Extra query parameters are passed through unchanged:
#
# [query.extra_params]
# sort = "createdAt"
"#;

/// Starter configuration text
pub fn generate_config(with_examples: bool) -> String {
    let mut content = MINIMAL_CONFIG.to_string();
    if with_examples {
        content.push_str(EXAMPLE_SECTIONS);
    }
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SweepConfig;
    use tempfile::TempDir;

    fn parse(content: &str) -> SweepConfig {
        let content = content.replace("${XDR_SWEEP_TOKEN}", "test-token");
        toml::from_str(&content).unwrap()
    }

    #[test]
    fn test_generated_config_is_valid() {
        for with_examples in [false, true] {
            let config = parse(&generate_config(with_examples));
            assert!(config.validate().is_ok());
            assert_eq!(config.fetch.max_concurrent_pages, 50);
            assert_eq!(config.close.reason, "falsePositive");
        }
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("xdr-sweep.toml");
        fs::write(&path, "existing").unwrap();

        let args = InitArgs {
            output: path.to_string_lossy().to_string(),
            with_examples: false,
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), 2);
        assert_eq!(fs::read_to_string(&path).unwrap(), "existing");

        let forced = InitArgs {
            force: true,
            ..args
        };
        assert_eq!(forced.execute().await.unwrap(), 0);
        assert!(fs::read_to_string(&path).unwrap().contains("[fetch]"));
    }
}
