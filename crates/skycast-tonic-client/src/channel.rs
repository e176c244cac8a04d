//! Channel construction.
//!
//! [`ChannelFactory`] assembles a reusable connection handle from an
//! address, a transport security mode, and an optional credential bundle.
//! Credentials can only be attached once the factory carries an encrypted
//! transport.

use crate::credentials::{BearerInjector, CredentialBundle, CredentialSource};
use crate::error::ClientError;
use skycast_tonic_core::proto::greeter_client::GreeterClient;
use skycast_tonic_core::proto::weather_forecasts_client::WeatherForecastsClient;
use std::sync::Arc;
use tonic::service::interceptor::InterceptedService;
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};

/// Transport-level security for a channel.
#[derive(Clone, Debug, Default)]
pub enum TransportSecurity {
    /// Unencrypted TCP. Credential bundles are refused on this transport;
    /// per-call metadata remains available for local development.
    #[default]
    Plaintext,
    /// TLS with the given client configuration.
    Tls(ClientTlsConfig),
}

/// Builds connection handles for the skycast services.
pub struct ChannelFactory {
    endpoint: Endpoint,
    security: TransportSecurity,
    bundle: Option<CredentialBundle>,
}

impl ChannelFactory {
    pub fn new(addr: impl Into<String>) -> Result<Self, ClientError> {
        let endpoint = Endpoint::from_shared(addr.into())?;
        Ok(Self {
            endpoint,
            security: TransportSecurity::default(),
            bundle: None,
        })
    }

    /// Sets the transport security mode. Must precede
    /// [`with_credentials`](Self::with_credentials).
    pub fn with_security(mut self, security: TransportSecurity) -> Self {
        self.security = security;
        self
    }

    /// Attaches channel-wide credentials.
    ///
    /// Fails with [`ClientError::InsecureCredentials`] while the factory
    /// is configured for a plaintext transport.
    pub fn with_credentials(mut self, source: impl CredentialSource) -> Result<Self, ClientError> {
        let bundle = CredentialBundle::build(&self.security, Arc::new(source))?;
        self.bundle = Some(bundle);
        Ok(self)
    }

    /// Connects and returns the reusable channel handle.
    pub async fn connect(self) -> Result<AuthChannel, ClientError> {
        let Self {
            endpoint,
            security,
            bundle,
        } = self;

        let endpoint = match security {
            TransportSecurity::Plaintext => endpoint,
            TransportSecurity::Tls(tls) => endpoint.tls_config(tls)?,
        };

        let channel = endpoint.connect().await?;
        Ok(AuthChannel { channel, bundle })
    }
}

/// A connected channel plus the credentials riding on every call made
/// through it. Cheap to clone.
#[derive(Clone)]
pub struct AuthChannel {
    channel: Channel,
    bundle: Option<CredentialBundle>,
}

type Intercepted = InterceptedService<Channel, BearerInjector>;

impl AuthChannel {
    fn injector(&self) -> BearerInjector {
        self.bundle
            .as_ref()
            .map_or_else(BearerInjector::passthrough, CredentialBundle::injector)
    }

    pub fn greeter(&self) -> GreeterClient<Intercepted> {
        GreeterClient::with_interceptor(self.channel.clone(), self.injector())
    }

    pub fn forecasts(&self) -> WeatherForecastsClient<Intercepted> {
        WeatherForecastsClient::with_interceptor(self.channel.clone(), self.injector())
    }
}
