//! # Shared Forecast Constants
//!
//! This module defines the constants that make up the forecast contract
//! between the server and its clients: the fixed set of summary labels, the
//! temperature bounds, and the default stream shape. Keeping them here
//! ensures both sides of the wire agree at compile time.

use core::time::Duration;

/// The fixed set of forecast summary labels.
///
/// Every streamed record carries exactly one of these, chosen by the
/// session's own pseudo-random generator.
pub const SUMMARIES: [&str; 10] = [
    "Freezing",
    "Bracing",
    "Chilly",
    "Cool",
    "Mild",
    "Warm",
    "Balmy",
    "Hot",
    "Sweltering",
    "Scorching",
];

/// Inclusive lower bound for generated temperatures, in degrees Celsius.
pub const TEMPERATURE_MIN_C: i32 = -20;

/// Exclusive upper bound for generated temperatures, in degrees Celsius.
pub const TEMPERATURE_MAX_C: i32 = 55;

/// Default maximum number of records produced by one stream session.
pub const DEFAULT_MAX_RECORDS: usize = 20;

/// Default wait between consecutive records.
pub const DEFAULT_RECORD_INTERVAL: Duration = Duration::from_millis(500);

/// Forecast horizon step: each record's timestamp advances by one day from
/// the session start.
pub const FORECAST_STEP: Duration = Duration::from_secs(24 * 60 * 60);

/// Metadata key carrying the bearer credential.
pub const AUTHORIZATION_HEADER: &str = "authorization";

/// Required scheme prefix inside the authorization metadata value.
pub const BEARER_PREFIX: &str = "Bearer ";
