//! Products inventory server.
//!
//! Runs as an AWS Lambda function behind an API Gateway proxy integration
//! when `AWS_LAMBDA_RUNTIME_API` is set, and as a plain HTTP server otherwise.
//!
//! # Usage
//!
//! ```text
//! PRODUCT_STORE=memory GATEWAY_LISTEN=127.0.0.1:3000 inventory-server
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `PRODUCTS_TABLE` | `products-inventory` | DynamoDB table name |
//! | `DEFAULT_REGION` | `us-east-1` | Region when the environment sets none |
//! | `DYNAMODB_ENDPOINT_URL` | *(unset)* | DynamoDB endpoint override |
//! | `PRODUCT_STORE` | `dynamodb` | `dynamodb` or `memory` |
//! | `MEMORY_PAGE_SIZE` | `100` | Scan page size of the memory store |
//! | `STORE_MAX_ATTEMPTS` | `3` | Attempts per store call |
//! | `STORE_RETRY_BASE_MS` | `50` | First retry backoff |
//! | `STORE_RETRY_MAX_MS` | `1000` | Backoff cap |
//! | `STORE_TIMEOUT_MS` | `3000` | Timeout of one store request |
//! | `INVOCATION_TIMEOUT_MS` | `10000` | Deadline of one invocation |
//! | `MAX_BODY_BYTES` | `6291456` | Largest accepted request body (local mode) |
//! | `GATEWAY_LISTEN` | `0.0.0.0:3000` | Bind address (local mode) |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

mod lambda;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use inventory_core::dynamodb::DynamoDBProductStore;
use inventory_core::memory::InMemoryProductStore;
use inventory_core::{
    InventoryConfig, InventoryHandler, InventoryProvider, ProductStore, StoreBackend, StoreGateway,
};
use inventory_http::InventoryHttpService;

/// Server version reported at startup.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
/// Lambda mode writes JSON lines without ANSI colours for CloudWatch.
fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_current_span(false)
            .without_time()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }

    Ok(())
}

/// Construct the configured store backend.
async fn build_store(config: &InventoryConfig) -> Arc<dyn ProductStore> {
    match config.store_backend {
        StoreBackend::DynamoDB => Arc::new(DynamoDBProductStore::connect(config).await),
        StoreBackend::Memory => Arc::new(InMemoryProductStore::new(config.memory_page_size)),
    }
}

/// Wire store, gateway, provider and handler together.
async fn build_handler(config: &InventoryConfig) -> Arc<InventoryHandler> {
    let store = build_store(config).await;
    let gateway = StoreGateway::new(store, config.retry_policy());
    let provider = InventoryProvider::new(gateway);
    Arc::new(InventoryHandler::new(Arc::new(provider)))
}

/// Run the accept loop, serving connections until a shutdown signal is received.
async fn serve(
    listener: TcpListener,
    service: InventoryHttpService<InventoryHandler>,
) -> Result<()> {
    let graceful = hyper_util::server::graceful::GracefulShutdown::new();
    let http = HttpConnBuilder::new(TokioExecutor::new());

    let shutdown = async {
        tokio::signal::ctrl_c().await.ok();
        info!("received shutdown signal, draining connections");
    };

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer_addr) = match result {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };

                let svc = service.clone();
                let conn = http.serve_connection(TokioIo::new(stream), svc);
                let conn = graceful.watch(conn.into_owned());

                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        error!(peer_addr = %peer_addr, error = %e, "connection error");
                    }
                });
            }

            () = &mut shutdown => {
                info!("shutting down gracefully");
                break;
            }
        }
    }

    // Wait for in-flight requests to complete.
    graceful.shutdown().await;
    info!("all connections drained, exiting");

    Ok(())
}

/// Probe a running local server's health endpoint.
async fn run_health_check(addr: &str) -> Result<()> {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    let stream = TcpStream::connect(addr)
        .await
        .with_context(|| format!("cannot connect to {addr}"))?;

    let (mut reader, mut writer) = stream.into_split();

    let request = format!("GET /health HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    writer.write_all(request.as_bytes()).await?;
    writer.shutdown().await?;

    let mut response = String::new();
    reader.read_to_string(&mut response).await?;

    if is_healthy_response(&response) {
        Ok(())
    } else {
        anyhow::bail!("unhealthy response from {addr}")
    }
}

fn is_healthy_response(raw: &str) -> bool {
    raw.starts_with("HTTP/1.1 200") || raw.starts_with("HTTP/1.0 200")
}

/// Address the health probe connects to.
fn probe_addr(listen_addr: &str) -> String {
    listen_addr.replace("0.0.0.0", "127.0.0.1")
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = InventoryConfig::from_env().context("invalid configuration")?;

    // Handle --health-check flag for container HEALTHCHECK.
    if std::env::args().any(|a| a == "--health-check") {
        let healthy = run_health_check(&probe_addr(&config.gateway_listen))
            .await
            .is_ok();
        std::process::exit(i32::from(!healthy));
    }

    init_tracing(&config.log_level, config.is_lambda())?;

    info!(
        table = %config.table_name,
        store = config.store_backend.as_str(),
        endpoint = ?config.dynamodb_endpoint_url,
        max_attempts = config.store_max_attempts,
        invocation_timeout = ?config.invocation_timeout,
        "initializing products inventory",
    );

    let handler = build_handler(&config).await;

    if config.is_lambda() {
        info!(version = VERSION, "starting Lambda runtime");
        return lambda::run(handler, config.http_config())
            .await
            .map_err(|e| anyhow::anyhow!(e))
            .context("lambda runtime failed");
    }

    let addr: SocketAddr = config
        .gateway_listen
        .parse()
        .with_context(|| format!("invalid bind address: {}", config.gateway_listen))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    let service = InventoryHttpService::new(handler, config.http_config());

    info!(%addr, version = VERSION, "starting products inventory server");

    serve(listener, service).await
}
