use clap::Parser;
use skycast_tonic_server::server::app::App;
use skycast_tonic_server::server::config::{CliArgs, ServerConfig};
use skycast_tonic_server::server::telemetry::init_telemetry;
use tokio::net::TcpListener;
use tokio::signal;
use tokio_stream::wrappers::TcpListenerStream;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = ServerConfig::try_from(args)?;

    init_telemetry();

    let app = App::new(config);

    let token_listener = TcpListener::bind(&app.config().token_addr).await?;
    tracing::info!(addr = %token_listener.local_addr()?, "token endpoint listening");
    let token_routes = app.token_routes();
    tokio::spawn(async move {
        if let Err(e) = axum::serve(token_listener, token_routes).await {
            tracing::error!("token endpoint failed: {e}");
        }
    });

    let grpc_listener = TcpListener::bind(&app.config().server_addr).await?;
    tracing::info!(
        addr = %grpc_listener.local_addr()?,
        max_records = app.config().stream.max_records,
        interval_ms = app.config().stream.interval.as_millis() as u64,
        "gRPC server listening"
    );
    let incoming = TcpListenerStream::new(grpc_listener);

    let shutdown = app.shutdown_token();
    app.grpc_router()
        .await?
        .serve_with_incoming_shutdown(incoming, shutdown_signal(shutdown))
        .await?;

    tracing::info!("service shut down successfully");
    Ok(())
}

async fn shutdown_signal(shutdown: CancellationToken) {
    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C signal"),
        () = terminate => tracing::info!("received SIGTERM signal"),
    }

    tracing::info!("shutdown signal received, terminating gracefully...");

    // Cancelling the parent token tears down every live stream session.
    shutdown.cancel();
}
