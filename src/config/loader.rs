//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::SweepConfig;
use super::secret::secret_string;
use crate::domain::errors::SweepError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into SweepConfig
/// 4. Applies environment variable overrides (XDR_SWEEP_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use xdr_sweep::config::loader::load_config;
///
/// let config = load_config("xdr-sweep.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<SweepConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(SweepError::Configuration(format!(
            "Configuration file not found: {} (run `xdr-sweep init` to create one)",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        SweepError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: SweepConfig = toml::from_str(&contents)
        .map_err(|e| SweepError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        SweepError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| SweepError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        // Placeholders inside comments are left alone
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(SweepError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Applies environment variable overrides using XDR_SWEEP_* prefix
///
/// Environment variables follow the pattern: XDR_SWEEP_<SECTION>_<KEY>
/// For example: XDR_SWEEP_API_TOKEN, XDR_SWEEP_FETCH_FLUSH_EVERY
fn apply_env_overrides(config: &mut SweepConfig) {
    // Application overrides
    if let Ok(val) = std::env::var("XDR_SWEEP_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("XDR_SWEEP_APPLICATION_VERBOSE") {
        config.application.verbose = val.parse().unwrap_or(false);
    }

    // API overrides
    if let Ok(val) = std::env::var("XDR_SWEEP_API_BASE_URL") {
        config.api.base_url = val;
    }
    if let Ok(val) = std::env::var("XDR_SWEEP_API_TOKEN") {
        config.api.token = secret_string(val);
    }
    if let Ok(val) = std::env::var("XDR_SWEEP_API_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.api.timeout_seconds = timeout;
        }
    }
    if let Ok(val) = std::env::var("XDR_SWEEP_API_TLS_VERIFY") {
        config.api.tls_verify = val.parse().unwrap_or(true);
    }

    // Query overrides
    if let Ok(val) = std::env::var("XDR_SWEEP_QUERY_TENANT_IDS") {
        config.query.tenant_ids = split_list(&val);
    }
    if let Ok(val) = std::env::var("XDR_SWEEP_QUERY_STATUSES") {
        config.query.statuses = split_list(&val);
    }
    if let Ok(val) = std::env::var("XDR_SWEEP_QUERY_FROM_DATE") {
        config.query.from_date = Some(val);
    }
    if let Ok(val) = std::env::var("XDR_SWEEP_QUERY_TO_DATE") {
        config.query.to_date = Some(val);
    }

    // Fetch overrides
    if let Ok(val) = std::env::var("XDR_SWEEP_FETCH_MAX_CONCURRENT_PAGES") {
        if let Ok(pages) = val.parse() {
            config.fetch.max_concurrent_pages = pages;
        }
    }
    if let Ok(val) = std::env::var("XDR_SWEEP_FETCH_FLUSH_EVERY") {
        if let Ok(every) = val.parse() {
            config.fetch.flush_every = every;
        }
    }
    if let Ok(val) = std::env::var("XDR_SWEEP_FETCH_OUTPUT_FILE") {
        config.fetch.output_file = val;
    }

    // Filter and close overrides
    if let Ok(val) = std::env::var("XDR_SWEEP_FILTER_ENABLED") {
        config.filter.enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("XDR_SWEEP_CLOSE_ENABLED") {
        config.close.enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("XDR_SWEEP_CLOSE_REASON") {
        config.close.reason = val;
    }

    // Logging overrides
    if let Ok(val) = std::env::var("XDR_SWEEP_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("XDR_SWEEP_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("XDR_SWEEP_LOADER_TEST_VAR", "test_value");
        let input = "token = \"${XDR_SWEEP_LOADER_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "token = \"test_value\"\n");
        std::env::remove_var("XDR_SWEEP_LOADER_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("XDR_SWEEP_LOADER_MISSING_VAR");
        let input = "token = \"${XDR_SWEEP_LOADER_MISSING_VAR}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("XDR_SWEEP_LOADER_MISSING_VAR"));
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        std::env::remove_var("XDR_SWEEP_LOADER_COMMENTED");
        let input = "# token = \"${XDR_SWEEP_LOADER_COMMENTED}\"";
        let result = substitute_env_vars(input).unwrap();
        assert!(result.contains("${XDR_SWEEP_LOADER_COMMENTED}"));
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("a, b ,,c"), vec!["a", "b", "c"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent-xdr-sweep.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[api]
base_url = "https://xdr.example.com/xdr/api/v1"
token = "secret-token"

[query]
tenant_ids = ["tenant-a", "tenant-b"]
statuses = ["new"]

[fetch]
max_concurrent_pages = 4
flush_every = 250

[filter]
enabled = true
rules = [{ field = "Rule|Name", value = "scan" }]

[close]
enabled = true
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.api.base_url, "https://xdr.example.com/xdr/api/v1");
        assert_eq!(config.api.token.expose_secret(), "secret-token");
        assert_eq!(config.query.tenant_ids, vec!["tenant-a", "tenant-b"]);
        assert_eq!(config.query.page_number, 1);
        assert_eq!(config.fetch.max_concurrent_pages, 4);
        assert_eq!(config.fetch.page_size, 100);
        assert_eq!(config.fetch.flush_every, 250);
        assert_eq!(config.filter.rules.len(), 1);
        assert!(config.close.enabled);
        assert_eq!(config.close.reason, "falsePositive");
    }

    #[test]
    fn test_load_config_invalid_values() {
        let toml_content = r#"
[api]
token = "secret-token"

[query]
tenant_ids = ["tenant-a"]

[fetch]
max_concurrent_pages = 0
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let err = load_config(temp_file.path()).unwrap_err();
        assert!(err.to_string().contains("max_concurrent_pages"));
    }
}
