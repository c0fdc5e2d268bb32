use cyscan::{
    cli::{Cli, CliHandler},
    error::ScanError,
    logging,
};
use std::process;

#[tokio::main]
async fn main() {
    let cli = match Cli::parse_args() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("❌ Argument parsing failed: {}", e);
            process::exit(2);
        }
    };

    logging::init(cli.is_verbose(), cli.is_debug());

    let handler = CliHandler::new(cli);

    let exit_code = match handler.run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("❌ {}", e);
            match e {
                ScanError::InvalidArguments(_)
                | ScanError::Validation(_)
                | ScanError::ConfigError(_) => 2,
                ScanError::Timeout { .. } => 4,
                _ => 1,
            }
        }
    };

    process::exit(exit_code);
}
