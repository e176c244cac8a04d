#![doc = include_str!("../README.md")]

pub mod channel;
pub mod consumer;
pub mod credentials;
pub mod error;
pub mod login;

pub use channel::{AuthChannel, ChannelFactory, TransportSecurity};
pub use consumer::{StreamConsumer, StreamEnding, StreamSummary, WeatherStream};
pub use credentials::{BearerToken, CredentialSource, StaticToken};
pub use error::ClientError;
