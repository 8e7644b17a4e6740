// Logging setup
// Logs go to stderr: a provider's stdout is reserved for the plugin handshake

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogFormat;

const DEFAULT_LOG_FILTER: &str = "tfplatform=info";

/// Install the global tracing subscriber
///
/// The returned guard flushes buffered events when dropped; hold it for the
/// lifetime of the process.
pub fn init_logging(format: LogFormat) -> Result<WorkerGuard> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))?;

    let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(writer))
                .try_init()?;
        }
        LogFormat::Compact => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().compact().with_writer(writer))
                .try_init()?;
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty().with_writer(writer))
                .try_init()?;
        }
    }

    Ok(guard)
}
