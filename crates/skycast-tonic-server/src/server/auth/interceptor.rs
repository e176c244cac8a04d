use super::issuer::TokenIssuer;
use skycast_tonic_core::Error;
use skycast_tonic_core::types::{AUTHORIZATION_HEADER, BEARER_PREFIX};
use tonic::service::Interceptor;
use tonic::{Request, Status};

/// gRPC interceptor gating every call on a valid bearer token.
///
/// Applied per service via `with_interceptor`, so rejected calls never
/// reach a handler. On success the validated [`CallerIdentity`] is stored
/// in the request extensions for handlers to observe; the token itself is
/// not.
///
/// [`CallerIdentity`]: super::issuer::CallerIdentity
#[derive(Clone)]
pub struct BearerAuth {
    issuer: TokenIssuer,
}

impl BearerAuth {
    pub fn new(issuer: TokenIssuer) -> Self {
        Self { issuer }
    }
}

impl Interceptor for BearerAuth {
    fn call(&mut self, mut req: Request<()>) -> Result<Request<()>, Status> {
        let header = match req.metadata().get(AUTHORIZATION_HEADER) {
            Some(value) => value.to_str().map_err(|_| Error::InvalidCredentials)?,
            None => return Err(Error::MissingCredentials.into()),
        };

        let token = header
            .strip_prefix(BEARER_PREFIX)
            .ok_or(Error::InvalidCredentials)?;

        let identity = self
            .issuer
            .validate(token)
            .ok_or(Error::InvalidCredentials)?;

        req.extensions_mut().insert(identity);
        Ok(req)
    }
}
