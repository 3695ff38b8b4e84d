use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::presentation::config::{Environment, LoggingSettings};

/// `RUST_LOG` wins over the configured level.
pub fn build_env_filter(settings: &LoggingSettings) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize the tracing subscriber with structured logging.
pub fn init_tracing(settings: &LoggingSettings, environment: Environment) {
    let env_filter = build_env_filter(settings);

    let registry = tracing_subscriber::registry().with(env_filter);
    let initialized = if settings.json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init()
    };

    if let Err(e) = initialized {
        eprintln!("tracing already initialized: {e}");
        return;
    }

    tracing::info!(
        environment = %environment,
        json_format = settings.json,
        "Tracing initialized"
    );
}
