// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! kilnd: answer-file and image build daemon.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use fs2::FileExt;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::info;

use kiln_daemon::env::ConfigError;
use kiln_daemon::http::{router, Ctx};
use kiln_daemon::{Config, Orchestrator};

#[derive(Debug, Error)]
enum DaemonError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("another kilnd instance holds {}", path.display())]
    Locked { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("kilnd: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), DaemonError> {
    let config = Config::load()?;
    std::fs::create_dir_all(&config.state_dir)?;
    std::fs::create_dir_all(&config.artifacts_dir)?;

    let _log_guard = init_tracing(&config);

    // Acquire the lock before touching any shared state. The lock file
    // doubles as the PID file and is held for the daemon's lifetime.
    let lock_file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&config.lock_path)?;
    lock_file
        .try_lock_exclusive()
        .map_err(|_| DaemonError::Locked { path: config.lock_path.clone() })?;
    let mut lock_file = lock_file;
    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;

    let orchestrator = Arc::new(Orchestrator::new(config.clone()));
    let app = router(Arc::new(Ctx::new(orchestrator)));

    let listener = TcpListener::bind(config.http_addr).await?;
    info!(addr = %config.http_addr, state_dir = %config.state_dir.display(), "kilnd listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    info!("kilnd shutting down");
    drop(lock_file);
    let _ = std::fs::remove_file(&config.lock_path);
    Ok(())
}

fn init_tracing(config: &Config) -> tracing_appender::non_blocking::WorkerGuard {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::EnvFilter;

    let log_dir = config.log_path.parent().unwrap_or(&config.state_dir);
    let log_name = config
        .log_path
        .file_name()
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| "kilnd.log".into());
    let file = tracing_appender::rolling::never(log_dir, log_name);
    let (file_writer, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(file_writer))
        .init();
    guard
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
