//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and env var fallbacks.

use clap::Parser;
use std::path::PathBuf;

/// SalaryScope - salary transparency dashboard API
///
/// Serves salary records, descriptive statistics, agency rankings and
/// side-by-side comparisons over a PostgREST (Supabase) table or a local
/// JSON file.
///
/// Examples:
///   salaryscope --store-url https://xyz.supabase.co --store-key <KEY>
///   salaryscope --data fixtures/salaries.json --port 8080
///   salaryscope --data fixtures/salaries.json --dry-run
///   salaryscope --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Interface to bind the HTTP server to
    #[arg(long, value_name = "HOST", env = "SALARYSCOPE_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, value_name = "PORT", env = "PORT")]
    pub port: Option<u16>,

    /// Deployment environment reported by /api/health
    #[arg(long, value_name = "NAME", env = "SALARYSCOPE_ENV")]
    pub environment: Option<String>,

    /// PostgREST project URL
    #[arg(long, value_name = "URL", env = "SUPABASE_URL")]
    pub store_url: Option<String>,

    /// PostgREST API key
    #[arg(long, value_name = "KEY", env = "SUPABASE_KEY", hide_env_values = true)]
    pub store_key: Option<String>,

    /// Table holding the salary records
    #[arg(long, value_name = "TABLE")]
    pub table: Option<String>,

    /// Record store request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Serve records from a local JSON file instead of a remote store
    #[arg(long, value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Ignore unparsable numeric filters instead of rejecting the request
    #[arg(long)]
    pub lenient_filters: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for .salaryscope.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Dry run: query the store once, log overall statistics and exit
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .salaryscope.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref url) = self.store_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("Store URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if let Some(ref data) = self.data {
            if !data.is_file() {
                return Err(format!("Data file does not exist: {}", data.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            host: None,
            port: None,
            environment: None,
            store_url: Some("https://example.supabase.co".to_string()),
            store_key: Some("key".to_string()),
            table: None,
            timeout: None,
            data: None,
            lenient_filters: false,
            config: None,
            verbose: false,
            quiet: false,
            dry_run: false,
            init_config: false,
        }
    }

    #[test]
    fn test_validation_ok() {
        assert!(make_args().validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_url() {
        let mut args = make_args();
        args.store_url = Some("example.supabase.co".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_missing_data_file() {
        let mut args = make_args();
        args.data = Some(PathBuf::from("does/not/exist.json"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_parse_from_command_line() {
        let args = Args::try_parse_from([
            "salaryscope",
            "--data",
            "fixtures/salaries.json",
            "--port",
            "8080",
            "--lenient-filters",
        ])
        .unwrap();
        assert_eq!(args.port, Some(8080));
        assert!(args.lenient_filters);
        assert_eq!(args.data, Some(PathBuf::from("fixtures/salaries.json")));
    }

    #[test]
    fn test_args_override_config() {
        let mut args = make_args();
        args.port = Some(9000);
        args.lenient_filters = true;

        let mut config = crate::config::Config::default();
        config.merge_with_args(&args);

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.store.api_key.as_deref(), Some("key"));
        assert_eq!(
            config.analysis.numeric_filters,
            crate::filter::ParsePolicy::Lenient
        );
    }
}
