//! Serve command implementation

use crate::api::{self, AppState};
use crate::config::Config;
use crate::market::CoinGeckoClient;
use crate::refresh::RefreshJob;
use crate::store::PriceStore;
use anyhow::Context;
use clap::Args;
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Bind host, overrides config
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port, overrides config and PORT
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Start serving without the initial refresh
    #[arg(long)]
    pub skip_initial_refresh: bool,
}

impl ServeArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let mut server = config.server.clone();
        if let Some(host) = &self.host {
            server.host = host.clone();
        }
        if let Some(port) = self.port {
            server.port = port;
        }
        let addr = server.bind_addr()?;

        let client = CoinGeckoClient::new(config.upstream.clone())
            .context("Failed to create upstream client")?;
        let store = Arc::new(PriceStore::new());
        let job = RefreshJob::new(Arc::new(client), store);

        if config.refresh.refresh_on_start && !self.skip_initial_refresh {
            job.run().await;
        }

        let scheduler = job.spawn_scheduler(config.refresh.interval());

        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        let result = api::serve(listener, AppState::new(job), shutdown_signal()).await;

        scheduler.abort();
        tracing::info!("Server stopped");
        result.context("HTTP server error")
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
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
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
