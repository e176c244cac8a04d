//! Error types for the weather streaming service.
//!
//! This module defines the central `Error` enum, which captures the
//! recoverable and reportable error cases shared by the server and client
//! crates. It implements `From<Error>` for `tonic::Status` so errors
//! propagate to gRPC peers with the appropriate status codes.
//!
//! ## Error Cases
//! - `MissingCredentials`: The call carried no `Authorization` metadata.
//! - `InvalidCredentials`: The presented bearer token was not accepted by
//!   the issuer.
//! - `RequestCancelled`: The client cancelled the call mid-flight.
//! - `ChannelError`: An internal communication failure between tasks.
//! - `ServiceShutdown`: A request arrived while the service was shutting
//!   down.

use tonic::Status;

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for the weather streaming service.
#[derive(Clone, thiserror::Error, Debug)]
pub enum Error {
    /// The call carried no `Authorization` metadata entry.
    #[error("Missing authorization metadata")]
    MissingCredentials,

    /// The bearer token was malformed, unknown, or revoked.
    #[error("Invalid bearer token")]
    InvalidCredentials,

    /// The client aborted the request.
    #[error("Request cancelled by client")]
    RequestCancelled,

    /// Internal channel send/receive failure (e.g., closed or full channel).
    #[error("Channel error: {context}")]
    ChannelError { context: String },

    /// The service is in the process of shutting down.
    #[error("Service is shutting down")]
    ServiceShutdown,
}

impl From<Error> for Status {
    fn from(err: Error) -> Self {
        match err {
            Error::MissingCredentials => Status::unauthenticated("missing authorization header"),
            Error::InvalidCredentials => Status::unauthenticated("invalid bearer token"),
            Error::RequestCancelled => Status::cancelled("Request was cancelled"),
            Error::ChannelError { context } => {
                Status::internal(format!("Channel error: {}", context))
            }
            Error::ServiceShutdown => Status::unavailable("Service is shutting down"),
        }
    }
}
