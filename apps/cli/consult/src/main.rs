use consult::args::Args;
use consult::commands::execute;
use consult::error::ConsultError;
use consult::logger::initialize as LoggerInitialize;

use expert_core::credential::load_dotenv;
use expert_core::error::CoreError;
use expert_core::{ConsultationGateway, GATEWAY_APP_DIR, GatewayConfig};

use common::ErrorLocation;

use std::fs::create_dir_all;
use std::panic::Location;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

const LOG_DIR_NAME: &str = "logs";

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e}");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<bool, ConsultError> {
    let action = args.action()?;

    let log_dir = match &args.log_dir {
        Some(dir) => dir.clone(),
        None => default_log_dir()?,
    };

    create_dir_all(&log_dir).map_err(|e| ConsultError::Consult {
        message: format!("Failed to create log directory: {}", e),
        location: ErrorLocation::from(Location::caller()),
    })?;

    // Initialize logger FIRST
    LoggerInitialize(&log_dir, args.verbose)?;

    info!("consult starting");
    info!("Log directory: {}", log_dir.display());

    load_dotenv();

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => GatewayConfig::default_path().map_err(CoreError::from)?,
    };
    let config = GatewayConfig::load(&config_path).map_err(CoreError::from)?;
    let gateway = ConsultationGateway::from_config(&config)?;

    let outcome = execute(&gateway, action).await;
    print!("{}", outcome.output);

    Ok(outcome.success)
}

fn default_log_dir() -> Result<PathBuf, ConsultError> {
    dirs::data_dir()
        .map(|dir| dir.join(GATEWAY_APP_DIR).join(LOG_DIR_NAME))
        .ok_or_else(|| ConsultError::Consult {
            message: "Failed to get log directory".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
}
