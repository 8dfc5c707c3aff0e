mod bus;
mod cli;
mod console;
mod main_window;
mod satellite_window;

use std::time::Duration;

use tether_common::WindowKey;
use tracing_subscriber::EnvFilter;

use cli::Command;

fn main() {
    let args = cli::parse();

    let config = tether_config::load_config_from(args.config.as_deref());

    // Initialize logging: --log-level, then config, then RUST_LOG on top.
    let log_directive = match (&args.log_level, &config) {
        (Some(level), _) => format!("tether={level}"),
        (None, Ok(config)) => config.logging.level.directive(),
        (None, Err(_)) => "tether=info".to_string(),
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                log_directive
                    .parse()
                    .unwrap_or_else(|_| tracing_subscriber::filter::LevelFilter::INFO.into()),
            ),
        )
        .init();

    tracing::info!("tether v{} starting", env!("CARGO_PKG_VERSION"));

    if let Some(ref path) = args.config {
        tracing::info!("Using config override: {}", path.display());
    }
    let config = config.unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {e}");
        tether_config::TetherConfig::default()
    });

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to start async runtime: {e}");
            std::process::exit(1);
        }
    };

    match args.command {
        Command::Main => runtime.block_on(main_window::run(config, args.config)),
        Command::Satellite { key } => {
            runtime.block_on(satellite_window::run(config, WindowKey::from(key)))
        }
    }

    // Stdin readers sit on blocking threads; don't wait for them.
    runtime.shutdown_timeout(Duration::from_millis(250));
    tracing::info!("Shutdown complete");
}
