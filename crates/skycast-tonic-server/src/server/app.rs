//! Assembly of the serveable application.
//!
//! [`App`] owns the pieces every entry point needs: the token issuer shared
//! between the HTTP endpoint and the gRPC gate, the server-wide shutdown
//! token parenting every stream session, and the configured gRPC router.
//! The binary and the integration tests both build on it.

use crate::server::auth::{BearerAuth, TokenIssuer, http};
use crate::server::config::ServerConfig;
use crate::server::service::{GreeterService, WeatherService};
use skycast_tonic_core::proto::FILE_DESCRIPTOR_SET;
use skycast_tonic_core::proto::greeter_server::GreeterServer;
use skycast_tonic_core::proto::weather_forecasts_server::WeatherForecastsServer;
use tokio_util::sync::CancellationToken;
use tonic::transport::Server;
use tonic::transport::server::Router;
use tonic_reflection::server::Builder;

pub struct App {
    config: ServerConfig,
    issuer: TokenIssuer,
    shutdown: CancellationToken,
}

impl App {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            issuer: TokenIssuer::new(),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn issuer(&self) -> TokenIssuer {
        self.issuer.clone()
    }

    /// Token parenting every stream session; cancelling it tears down all
    /// live streams.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Routes for the token issuance HTTP listener.
    pub fn token_routes(&self) -> axum::Router {
        http::token_routes(self.issuer.clone())
    }

    /// Builds the gRPC router: health, reflection, and both application
    /// services behind the bearer gate.
    pub async fn grpc_router(&self) -> anyhow::Result<Router> {
        let (health_reporter, health_service) = tonic_health::server::health_reporter();
        health_reporter
            .set_serving::<GreeterServer<GreeterService>>()
            .await;
        health_reporter
            .set_serving::<WeatherForecastsServer<WeatherService>>()
            .await;

        let reflection = Builder::configure()
            .register_encoded_file_descriptor_set(FILE_DESCRIPTOR_SET)
            .build_v1()?;

        let gate = BearerAuth::new(self.issuer.clone());
        let weather = WeatherService::new(self.config.stream.clone(), self.shutdown.child_token());

        let router = Server::builder()
            .add_service(health_service)
            .add_service(reflection)
            .add_service(GreeterServer::with_interceptor(
                GreeterService::default(),
                gate.clone(),
            ))
            .add_service(WeatherForecastsServer::with_interceptor(weather, gate));

        Ok(router)
    }
}
