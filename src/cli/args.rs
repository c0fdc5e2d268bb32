use crate::config::{ScanConfig, DEFAULT_ENDPOINT};
use crate::error::ScanError;
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cyscan")]
#[command(about = "Submit URLs and files to a scanning service and watch the verdict")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    /// Base URL of the scanning service
    #[arg(short = 'e', long, env = "CYSCAN_ENDPOINT", default_value = DEFAULT_ENDPOINT, global = true)]
    pub endpoint: String,

    /// Maximum time for a scan request in seconds (1-300)
    #[arg(short = 't', long, env = "CYSCAN_TIMEOUT", default_value = "90", value_parser = validate_timeout, global = true)]
    pub timeout: u64,

    /// Enable verbose output to stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Enable debug output including every presentation cue
    #[arg(short = 'd', long, global = true)]
    pub debug: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Scan a URL
    Url {
        /// The URL to submit
        url: String,
    },
    /// Scan a local file
    File {
        /// Path of the file to upload
        path: Option<PathBuf>,
    },
    /// Check that the scanning service is up
    Health,
    /// Read `url <URL>` and `file <PATH>` lines from stdin; a new line
    /// supersedes the scan that is still running
    Interactive,
}

impl Cli {
    pub fn parse_args() -> Result<Self, ScanError> {
        let cli = match Self::try_parse() {
            Ok(cli) => cli,
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                e.exit()
            }
            Err(e) => return Err(ScanError::InvalidArguments(e.to_string())),
        };

        cli.validate()?;

        Ok(cli)
    }

    pub fn validate(&self) -> Result<(), ScanError> {
        if !(1..=300).contains(&self.timeout) {
            return Err(ScanError::InvalidArguments(
                "Timeout must be between 1 and 300 seconds".to_string(),
            ));
        }

        if self.endpoint.trim().is_empty() {
            return Err(ScanError::InvalidArguments(
                "Endpoint must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose || self.debug
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn should_use_color(&self) -> bool {
        !self.no_color && std::env::var_os("NO_COLOR").is_none()
    }

    /// Resolves the options into the runtime configuration.
    pub fn to_config(&self) -> Result<ScanConfig, ScanError> {
        let config = ScanConfig::new(self.endpoint.trim().to_string())
            .with_timeout(self.timeout)
            .with_colors(self.should_use_color());
        config.validate()?;
        Ok(config)
    }
}

fn validate_timeout(s: &str) -> Result<u64, String> {
    let timeout: u64 = s.parse().map_err(|_| "Timeout must be a number")?;

    if (1..=300).contains(&timeout) {
        Ok(timeout)
    } else {
        Err("Timeout must be between 1 and 300 seconds".to_string())
    }
}
