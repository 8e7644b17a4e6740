//! tfplatform-probe - report which binary launched this process
//!
//! Run it the way a provider would be run (as a child of terraform/tofu) or
//! directly from a shell to see how detection degrades.

use anyhow::{bail, Result};
use clap::Parser;
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

use tfplatform_core::CommandContext;
use tfplatform_runtime::config::RuntimeConfig;
use tfplatform_runtime::{logging, VERSION};

#[derive(Parser)]
#[command(name = "tfplatform-probe")]
#[command(about = "Detect the platform binary driving this process", long_about = None)]
#[command(version)]
struct Cli {
    /// Print the detection report as JSON
    #[arg(long)]
    json: bool,

    /// Timeout for COMMAND, in seconds
    #[arg(long, default_value_t = 30, env = "TFPLATFORM_COMMAND_TIMEOUT_SECS")]
    timeout: u64,

    /// Allow-listed command to run against the detected binary (e.g. `version -json`)
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
}

#[derive(Serialize)]
struct Report {
    platform: String,
    binary_path: Option<String>,
    binary: String,
    provider_registry: &'static str,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    validation_error: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Configuration and logging
    let config = RuntimeConfig::from_env();
    let _log_guard = logging::init_logging(config.log_format)?;
    for warning in &config.warnings {
        warn!("{}", warning);
    }

    info!("tfplatform-probe v{} starting...", VERSION);

    // 2. One-shot detection, before anything else uses the platform
    let runtime = tfplatform_runtime::init(config.detection.clone()).await;
    let platform_config = runtime.config();

    let validation = tfplatform_runtime::validate();
    let report = Report {
        platform: platform_config.platform().to_string(),
        binary_path: platform_config
            .binary_path()
            .map(|p| p.display().to_string()),
        binary: platform_config.binary(),
        provider_registry: platform_config.provider_registry(),
        valid: validation.is_ok(),
        validation_error: validation.as_ref().err().map(|e| e.to_string()),
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("platform:          {}", report.platform);
        println!(
            "binary path:       {}",
            report.binary_path.as_deref().unwrap_or("-")
        );
        println!("provider registry: {}", report.provider_registry);
        if let Some(error) = &report.validation_error {
            println!("validation:        {}", error);
        }
    }

    // 3. Optional command through the guarded executor
    if cli.command.is_empty() {
        return Ok(());
    }

    let ctx = CommandContext::with_timeout(Duration::from_secs(cli.timeout));
    match tfplatform_runtime::execute_command(Some(&ctx), cli.command.as_slice()).await {
        Ok(output) => {
            print!("{}", output.stdout);
            eprint!("{}", output.stderr);
            Ok(())
        }
        Err(e) => {
            if let Some(output) = e.output() {
                print!("{}", output.stdout);
                eprint!("{}", output.stderr);
            }
            if e.is_deadline_exceeded() {
                bail!("command timed out after {}s", cli.timeout);
            }
            Err(e.into())
        }
    }
}
