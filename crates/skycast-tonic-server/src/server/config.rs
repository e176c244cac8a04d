use anyhow::bail;
use clap::Parser;
use core::time::Duration;
use skycast_tonic_core::types::{DEFAULT_MAX_RECORDS, DEFAULT_RECORD_INTERVAL};

/// Runtime configuration for the `skycast-tonic-server` binary.
///
/// These settings control the listen addresses and the shape of forecast
/// streams. All values are parsed from CLI arguments or environment
/// variables, with defaults matching the original service behavior.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "skycast-tonic-server",
    version,
    about = "A gRPC service streaming bearer-token-gated weather forecasts"
)]
pub struct CliArgs {
    /// Address the gRPC server listens on.
    ///
    /// Environment variable: `SERVER_ADDR`
    #[arg(long, env = "SERVER_ADDR", default_value_t = String::from("0.0.0.0:50051"))]
    pub server_addr: String,

    /// Address the token issuance HTTP endpoint listens on.
    ///
    /// Environment variable: `TOKEN_ADDR`
    #[arg(long, env = "TOKEN_ADDR", default_value_t = String::from("0.0.0.0:50052"))]
    pub token_addr: String,

    /// Maximum number of forecast records produced per stream.
    ///
    /// Environment variable: `MAX_RECORDS`
    #[arg(long, env = "MAX_RECORDS", default_value_t = DEFAULT_MAX_RECORDS)]
    pub max_records: usize,

    /// Wait between consecutive records, in milliseconds.
    ///
    /// Environment variable: `RECORD_INTERVAL_MS`
    #[arg(long, env = "RECORD_INTERVAL_MS", default_value_t = DEFAULT_RECORD_INTERVAL.as_millis() as u64)]
    pub record_interval_ms: u64,

    /// Capacity of the response buffer between a session and the gRPC
    /// stream.
    ///
    /// Lower values increase backpressure responsiveness; higher values
    /// enable deeper pipelining.
    ///
    /// Environment variable: `STREAM_BUFFER_SIZE`
    #[arg(long, env = "STREAM_BUFFER_SIZE", default_value_t = 8)]
    pub stream_buffer_size: usize,
}

/// Shape of one forecast stream session.
#[derive(Debug, Clone)]
pub struct StreamSettings {
    pub max_records: usize,
    pub interval: Duration,
    pub buffer_size: usize,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub server_addr: String,
    pub token_addr: String,
    pub stream: StreamSettings,
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.max_records == 0 {
            bail!("MAX_RECORDS must be greater than 0");
        }

        if args.record_interval_ms == 0 {
            bail!("RECORD_INTERVAL_MS must be greater than 0");
        }

        if args.stream_buffer_size == 0 {
            bail!("STREAM_BUFFER_SIZE must be greater than 0");
        }

        Ok(Self {
            server_addr: args.server_addr,
            token_addr: args.token_addr,
            stream: StreamSettings {
                max_records: args.max_records,
                interval: Duration::from_millis(args.record_interval_ms),
                buffer_size: args.stream_buffer_size,
            },
        })
    }
}
