//! Bearer-token authentication for the gRPC surface.
//!
//! Three pieces cooperate here:
//! - [`issuer::TokenIssuer`] mints opaque tokens and answers validation
//!   lookups.
//! - [`http`] exposes the issuance endpoint
//!   (`GET /generateToken?name=<identity>`).
//! - [`interceptor::BearerAuth`] gates every inbound RPC, rejecting calls
//!   without a valid token before any handler runs.

pub mod http;
pub mod interceptor;
pub mod issuer;

pub use interceptor::BearerAuth;
pub use issuer::{CallerIdentity, TokenIssuer};
