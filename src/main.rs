use anyhow::{Context, Result};
use dotenv::dotenv;
use salvo::conn::tcp::TcpAcceptor;
use salvo::prelude::*;
use std::time::Duration;
use tokio::signal;

use student_ai_backend::{api, AppState, Config};

/// Bind to address, retrying while a previous process still holds the port
async fn bind_with_retry(address: &str, max_retries: u32) -> Result<TcpAcceptor> {
    let socket_addr: std::net::SocketAddr = address
        .parse()
        .with_context(|| format!("Invalid address format: {}", address))?;

    for attempt in 1..=max_retries {
        // Test if the port is available before handing it to salvo
        match tokio::net::TcpListener::bind(socket_addr).await {
            Ok(test_listener) => {
                drop(test_listener);
                tracing::info!("Binding to {} (attempt {})", address, attempt);
                return TcpListener::new(socket_addr)
                    .try_bind()
                    .await
                    .with_context(|| format!("Failed to bind to {}", address));
            }
            Err(e) if e.kind() == std::io::ErrorKind::AddrInUse && attempt < max_retries => {
                tracing::warn!(
                    "Port {} is in use (attempt {}/{}), retrying in 1 second...",
                    socket_addr.port(),
                    attempt,
                    max_retries
                );
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to bind to {}", address));
            }
        }
    }

    anyhow::bail!("Failed to bind to {} after {} attempts", address, max_retries)
}

/// Wait for shutdown signal (SIGTERM, SIGINT, or Ctrl+C)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal");
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("student_ai_backend=info".parse()?)
                .add_directive("salvo=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;
    let state = AppState::new(&config)?;

    tracing::info!("Tool catalog: {}", config.catalog_path.display());
    tracing::info!("Chat backend: {}", state.chat.endpoint());

    let acceptor = bind_with_retry(&config.server_address, 5).await?;
    tracing::info!("Student AI backend listening on {}", config.server_address);

    let server = Server::new(acceptor);

    tokio::select! {
        _ = server.serve(api::service(state)) => {
            tracing::info!("Server stopped");
        }
        _ = shutdown_signal() => {
            tracing::info!("Shutting down gracefully");
        }
    }

    Ok(())
}
