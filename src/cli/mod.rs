pub mod args;
pub mod terminal;

pub use args::{Cli, Command};
pub use terminal::TerminalView;

use crate::config::ScanConfig;
use crate::controller::ScanController;
use crate::error::ScanError;
use crate::models::{FileUpload, RiskTier};
use crate::presentation::{classify, ScanView, SequenceState, SequenceToken};
use crate::service::HttpScanService;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

/// Exit code when the scan settled on a dangerous verdict.
pub const EXIT_DANGEROUS: i32 = 3;
/// Exit code when the scan failed after dispatch.
pub const EXIT_SCAN_FAILED: i32 = 1;
/// Exit code when the submission was rejected before dispatch.
pub const EXIT_REJECTED: i32 = 2;

/// One line of an interactive session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Url(String),
    File(Option<PathBuf>),
    Quit,
    Blank,
}

pub fn parse_session_line(line: &str) -> Result<SessionCommand, ScanError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(SessionCommand::Blank);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    match verb.to_lowercase().as_str() {
        "url" => Ok(SessionCommand::Url(rest.to_string())),
        "file" if rest.is_empty() => Ok(SessionCommand::File(None)),
        "file" => Ok(SessionCommand::File(Some(PathBuf::from(rest)))),
        "quit" | "exit" => Ok(SessionCommand::Quit),
        other => Err(ScanError::InvalidArguments(format!(
            "Unknown command '{}'. Use: url <URL> | file <PATH> | quit",
            other
        ))),
    }
}

pub struct CliHandler {
    cli: Cli,
}

impl CliHandler {
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    pub async fn run(&self) -> Result<i32, ScanError> {
        let config = self.cli.to_config()?;
        debug!(endpoint = %config.endpoint, timeout = config.timeout_seconds, "resolved configuration");

        let service = Arc::new(HttpScanService::new(config.clone())?);

        match self.cli.command {
            Command::Health => self.check_health(&service).await,
            Command::Url { ref url } => {
                let mut controller = Self::controller(service, &config);
                if controller.submit_url(url).is_err() {
                    return Ok(EXIT_REJECTED);
                }
                Ok(Self::finish(&mut controller).await)
            }
            Command::File { ref path } => {
                let file = match path {
                    Some(path) => Some(read_upload(path).await?),
                    None => None,
                };
                let mut controller = Self::controller(service, &config);
                if controller.submit_file(file).is_err() {
                    return Ok(EXIT_REJECTED);
                }
                Ok(Self::finish(&mut controller).await)
            }
            Command::Interactive => self.interactive(service, &config).await,
        }
    }

    fn controller(service: Arc<HttpScanService>, config: &ScanConfig) -> ScanController<TerminalView> {
        ScanController::new(
            service,
            TerminalView::stdout(config.use_colors),
            config.timings.clone(),
        )
    }

    async fn finish(controller: &mut ScanController<TerminalView>) -> i32 {
        controller.run_until_idle().await;

        match controller.state() {
            SequenceState::Settled => {
                let tier = summarize(controller);
                info!(tier = %tier.unwrap_or(RiskTier::Safe), "scan finished");
                match tier {
                    Some(RiskTier::Dangerous) => EXIT_DANGEROUS,
                    _ => 0,
                }
            }
            _ => EXIT_SCAN_FAILED,
        }
    }

    async fn check_health(&self, service: &HttpScanService) -> Result<i32, ScanError> {
        let health = service.check_health().await?;
        let endpoint = &service.config().endpoint;

        if health.is_ok() {
            println!("✅ Scanning service at {} is up", endpoint);
            Ok(0)
        } else {
            println!(
                "⚠️ Scanning service at {} reports status '{}'",
                endpoint, health.status
            );
            Ok(EXIT_SCAN_FAILED)
        }
    }

    async fn interactive(
        &self,
        service: Arc<HttpScanService>,
        config: &ScanConfig,
    ) -> Result<i32, ScanError> {
        let mut controller = Self::controller(service, config);
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut summarized: Option<SequenceToken> = None;

        controller
            .view_mut()
            .message("Commands: url <URL> | file <PATH> | quit");

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        debug!("stdin closed, finishing the running scan");
                        controller.run_until_idle().await;
                        summarize_once(&mut controller, &mut summarized);
                        break;
                    };
                    match parse_session_line(&line) {
                        Ok(SessionCommand::Blank) => {}
                        Ok(SessionCommand::Quit) => {
                            controller.cancel();
                            break;
                        }
                        Ok(SessionCommand::Url(url)) => {
                            let _ = controller.submit_url(&url);
                        }
                        Ok(SessionCommand::File(path)) => {
                            let file = match path {
                                Some(path) => match read_upload(&path).await {
                                    Ok(file) => Some(file),
                                    Err(error) => {
                                        controller.view_mut().report_error(&error);
                                        continue;
                                    }
                                },
                                None => None,
                            };
                            let _ = controller.submit_file(file);
                        }
                        Err(error) => controller.view_mut().report_error(&error),
                    }
                }
                _ = controller.pump(), if !controller.is_idle() => {
                    summarize_once(&mut controller, &mut summarized);
                }
            }
        }

        Ok(0)
    }
}

async fn read_upload(path: &Path) -> Result<FileUpload, ScanError> {
    FileUpload::from_path(path).await.map_err(|error| match error {
        ScanError::IoError(io) => ScanError::InvalidArguments(format!(
            "Cannot read '{}': {}",
            path.display(),
            io
        )),
        other => other,
    })
}

fn summarize(controller: &mut ScanController<TerminalView>) -> Option<RiskTier> {
    let result = controller.sequencer().presented().cloned()?;
    controller.view_mut().summarize(&result);
    Some(classify(result.danger_percentage))
}

fn summarize_once(
    controller: &mut ScanController<TerminalView>,
    summarized: &mut Option<SequenceToken>,
) {
    if controller.state() != SequenceState::Settled {
        return;
    }
    let token = controller.sequencer().current_token();
    if token.is_some() && token != *summarized {
        summarize(controller);
        *summarized = token;
    }
}
