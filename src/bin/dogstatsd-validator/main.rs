#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(unused_extern_crates)]
#![deny(unused_allocation)]
#![deny(unused_assignments)]
#![deny(unused_comparisons)]
#![deny(unreachable_pub)]
#![deny(missing_copy_implementations)]
#![deny(missing_debug_implementations)]

use dogstatsd_validator::{
    config::{self, log_level::LogLevel, Config},
    dogstatsd::{
        dogstatsd::{DogStatsD, DogStatsDConfig},
        validator::LogReporter,
    },
    logger, DOGSTATSD_HOST, DOGSTATSD_PORT,
};
use std::{
    env,
    io::{Error, ErrorKind, Result},
    path::Path,
    sync::Arc,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Configuration fallbacks log at the default level, the configured one
    // is not known yet.
    let config = tracing::subscriber::with_default(
        logger::subscriber(LogLevel::default(), std::io::stdout),
        load_config,
    )?;

    enable_logging_subsystem(&config);

    let dogstatsd_cancel_token = CancellationToken::new();
    let dogstatsd = start_dogstatsd(&config, dogstatsd_cancel_token.clone()).await?;
    let mut dogstatsd_handle = tokio::spawn(dogstatsd.spin());

    let stopped = tokio::select! {
        () = shutdown_signal() => {
            info!("Shutdown signal received, stopping DogStatsD");
            dogstatsd_cancel_token.cancel();
            dogstatsd_handle.await
        }
        stopped = &mut dogstatsd_handle => stopped,
    };

    match stopped {
        Ok(Ok(())) => {
            debug!("DogStatsD stopped");
            Ok(())
        }
        Ok(Err(e)) => {
            error!("DogStatsD stopped: {e}");
            Err(Error::other(e.to_string()))
        }
        Err(e) => {
            error!("DogStatsD task failed: {e}");
            Err(Error::other(e.to_string()))
        }
    }
}

fn load_config() -> Result<Config> {
    let config_directory = env::var("DD_CONFIG_DIR").unwrap_or_else(|_| ".".to_string());
    config::get_config(Path::new(&config_directory)).map_err(|e| {
        eprintln!("Failed to load configuration from {config_directory}: {e}");
        Error::new(ErrorKind::InvalidData, e.to_string())
    })
}

fn enable_logging_subsystem(config: &Config) {
    let subscriber = logger::subscriber(config.log_level, std::io::stdout);
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    debug!("Logging subsystem enabled");
}

async fn start_dogstatsd(config: &Config, cancel_token: CancellationToken) -> Result<DogStatsD> {
    let dogstatsd_config = DogStatsDConfig {
        host: DOGSTATSD_HOST.to_string(),
        port: DOGSTATSD_PORT,
        buffer_size: config.dogstatsd_buffer_size,
    };
    let reporter = Arc::new(LogReporter::new(config.dogstatsd_log_received));

    DogStatsD::new(&dogstatsd_config, reporter, cancel_token)
        .await
        .map_err(|e| {
            error!("Can't start DogStatsD: {e}");
            Error::other(e.to_string())
        })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
