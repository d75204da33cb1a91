use clap::Parser;
use dashlet_api::AppState;
use dashlet_application::services::ConfigWatcher;
use dashlet_application::use_cases::LoadExternalConfigUseCase;
use dashlet_domain::CliOverrides;
use dashlet_infrastructure::external::build_config_source;
use dashlet_jobs::ConfigWatchJob;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

mod bootstrap;
mod di;
mod server;

#[derive(Parser)]
#[command(name = "dashlet")]
#[command(version)]
#[command(about = "Dashlet - lightweight self-hosted dashboard with external config sync")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Web server port
    #[arg(short = 'w', long)]
    web_port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Database path
    #[arg(long)]
    database: Option<String>,

    /// External config location (file path or http(s) URL)
    #[arg(short = 'e', long)]
    external: Option<String>,

    /// External config poll interval in milliseconds
    #[arg(long)]
    poll_interval_ms: Option<u64>,

    /// Load the external config once at startup without watching it
    #[arg(long)]
    no_watch: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        web_port: cli.web_port,
        bind_address: cli.bind.clone(),
        database_path: cli.database.clone(),
        external_location: cli.external.clone(),
        poll_interval_ms: cli.poll_interval_ms,
        disable_watch: cli.no_watch,
        log_level: cli.log_level.clone(),
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config.logging);

    info!("Starting Dashlet v{}", env!("CARGO_PKG_VERSION"));

    let pool = bootstrap::init_database(&config.database).await?;
    let stores = di::Stores::new(pool).await?;
    let shutdown = CancellationToken::new();

    let mut watch_handle = None;
    let watcher = if config.external.is_enabled() {
        let source = build_config_source(&config.external.location)?;

        LoadExternalConfigUseCase::new(
            source.clone(),
            stores.settings.clone(),
            stores.services.clone(),
        )
        .execute()
        .await;

        let watcher = Arc::new(ConfigWatcher::new(
            source,
            stores.settings.clone(),
            stores.services.clone(),
        ));

        if config.external.watch {
            let job = Arc::new(
                ConfigWatchJob::new(watcher.clone())
                    .with_interval_ms(config.external.poll_interval_ms)
                    .with_cancellation(shutdown.clone()),
            );
            watch_handle = Some(job.start().await);
        } else {
            info!("External config watching disabled");
        }
        Some(watcher)
    } else {
        info!("No external config location configured");
        None
    };

    let app_state = AppState::new(stores.settings.clone(), stores.services.clone(), watcher);

    let web_addr: SocketAddr = format!("{}:{}", config.server.bind_address, config.server.web_port)
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid bind address: {}", e))?;

    server::start_web_server(
        web_addr,
        app_state,
        &config.server.static_dir,
        shutdown.clone(),
    )
    .await?;

    shutdown.cancel();
    if let Some(handle) = watch_handle {
        let _ = handle.await;
    }

    info!("Server shutdown complete");
    Ok(())
}
