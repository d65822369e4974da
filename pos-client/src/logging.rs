//! Logging Infrastructure
//!
//! Console logging for applications embedding the client.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize console logging.
///
/// `RUST_LOG` wins over `level` when set.
///
/// # Examples
/// ```no_run
/// // Development
/// pos_client::logging::init_logger("debug", false)?;
///
/// // Production (JSON lines)
/// pos_client::logging::init_logger("info", true)?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn init_logger(level: &str, json_format: bool) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(env_filter);

    if json_format {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .with_thread_ids(true),
            )
            .try_init()?;
    } else {
        registry
            .with(fmt::layer().with_target(true).with_thread_ids(false))
            .try_init()?;
    }

    Ok(())
}
