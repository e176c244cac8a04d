//! Bearer credential plumbing.
//!
//! A [`CredentialSource`] produces the current token for each outbound
//! call; a [`CredentialBundle`] pairs one with an encrypted transport and
//! turns it into a per-call metadata injector. The pairing rule lives in
//! [`CredentialBundle::build`]: a bundle cannot exist on a plaintext
//! transport, so a bearer token can never ride an unencrypted channel.

use crate::channel::TransportSecurity;
use crate::error::ClientError;
use skycast_tonic_core::types::{AUTHORIZATION_HEADER, BEARER_PREFIX};
use std::fmt;
use std::sync::Arc;
use tonic::metadata::MetadataValue;
use tonic::service::Interceptor;
use tonic::{Request, Status};

/// An opaque bearer credential.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw token value. Only metadata construction should need this.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

/// The credential itself must never end up in logs.
impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(..)")
    }
}

#[derive(Debug, thiserror::Error)]
#[error("bearer token unavailable: {reason}")]
pub struct CredentialError {
    pub reason: String,
}

/// Narrow capability producing the bearer token for one outbound call.
///
/// Invoked once per call; a failure aborts the call before anything is
/// sent. The source may block briefly (e.g. a token refresh); callers
/// bound that with their own timeout, the stream consumer's deadline does
/// not cover it.
pub trait CredentialSource: Send + Sync + 'static {
    fn token(&self) -> Result<BearerToken, CredentialError>;
}

/// A fixed token, e.g. one obtained once from the login endpoint.
#[derive(Clone)]
pub struct StaticToken(BearerToken);

impl StaticToken {
    pub fn new(token: BearerToken) -> Self {
        Self(token)
    }
}

impl CredentialSource for StaticToken {
    fn token(&self) -> Result<BearerToken, CredentialError> {
        Ok(self.0.clone())
    }
}

impl<F> CredentialSource for F
where
    F: Fn() -> Result<BearerToken, CredentialError> + Send + Sync + 'static,
{
    fn token(&self) -> Result<BearerToken, CredentialError> {
        self()
    }
}

/// A credential source admitted onto an encrypted transport.
#[derive(Clone)]
pub struct CredentialBundle {
    source: Arc<dyn CredentialSource>,
}

impl CredentialBundle {
    /// Pairs `source` with `security`.
    ///
    /// Fails unless the transport is encrypted: there is no way to obtain
    /// a bundle for a plaintext channel.
    pub fn build(
        security: &TransportSecurity,
        source: Arc<dyn CredentialSource>,
    ) -> Result<Self, ClientError> {
        match security {
            TransportSecurity::Plaintext => Err(ClientError::InsecureCredentials),
            TransportSecurity::Tls(_) => Ok(Self { source }),
        }
    }

    pub(crate) fn injector(&self) -> BearerInjector {
        BearerInjector {
            source: Some(Arc::clone(&self.source)),
        }
    }
}

/// Client interceptor inserting `Authorization: Bearer <token>` into each
/// outbound call. Without a source it passes calls through untouched.
#[derive(Clone)]
pub struct BearerInjector {
    source: Option<Arc<dyn CredentialSource>>,
}

impl BearerInjector {
    pub(crate) fn passthrough() -> Self {
        Self { source: None }
    }
}

impl Interceptor for BearerInjector {
    fn call(&mut self, mut req: Request<()>) -> Result<Request<()>, Status> {
        if let Some(source) = &self.source {
            let token = source
                .token()
                .map_err(|e| Status::unauthenticated(e.to_string()))?;
            attach_bearer(&mut req, &token)?;
        }
        Ok(req)
    }
}

/// Sets the one `Authorization` metadata entry for `token`, replacing any
/// existing value.
pub fn attach_bearer<T>(request: &mut Request<T>, token: &BearerToken) -> Result<(), Status> {
    let value = MetadataValue::try_from(format!("{BEARER_PREFIX}{}", token.expose()))
        .map_err(|_| Status::invalid_argument("bearer token is not valid metadata"))?;
    request.metadata_mut().insert(AUTHORIZATION_HEADER, value);
    Ok(())
}
