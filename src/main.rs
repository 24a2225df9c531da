use std::sync::Arc;

use bookmarks::config::{Cli, Config, Log, LogFormat, default_config_dir, default_config_path};
use bookmarks::db::Database;
use bookmarks::handler::AppState;
use clap::Parser;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

fn init_tracing(log: &Log) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    match log.format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

#[tokio::main]
async fn main() {
    let args = Cli::parse();
    dotenvy::dotenv().ok();

    // --config puts the database next to the config file; otherwise ~/.bookmarks/ holds both
    let (config_path, data_dir) = match args.config_path {
        Some(path) => {
            let path = std::path::PathBuf::from(path);
            let dir = path
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| std::path::PathBuf::from("."));
            (path, dir)
        }
        None => (default_config_path(), default_config_dir()),
    };

    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        eprintln!("failed to create data directory {:?}: {}", data_dir, e);
        std::process::exit(1);
    }

    let cfg = Config::new(&config_path.to_string_lossy()).unwrap_or_else(|e| {
        eprintln!("failed to load config file {:?}: {}", config_path, e);
        std::process::exit(1);
    });

    init_tracing(&cfg.log);
    tracing::info!("bookmarks.svc starting");

    let db = Arc::new(Database::new(&cfg, &data_dir).await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to setup database");
        std::process::exit(1);
    }));

    let address = format!("0.0.0.0:{}", cfg.app.get_port());
    let cancellation_token = CancellationToken::new();

    let signal_token = cancellation_token.clone();
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => tracing::info!("ctrl+c signal received, preparing to shutdown"),
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for ctrl+c");
                return;
            }
        }
        signal_token.cancel();
    });

    let app = bookmarks::app(AppState::new(db.clone(), &cfg));

    let listener = tokio::net::TcpListener::bind(&address).await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to setup tcp listener");
        std::process::exit(1);
    });

    tracing::info!("bookmarks.svc running on {}", &address);
    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(cancellation_token.cancelled_owned())
        .await
    {
        tracing::error!(error = %err, "server exited with error");
        std::process::exit(1);
    }

    if db.is_replica() {
        if let Err(e) = db.sync().await {
            tracing::warn!(error = %e, "final replica sync failed");
        }
    }
    tracing::info!("bookmarks.svc going off, graceful shutdown complete");
}
