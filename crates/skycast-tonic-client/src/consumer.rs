//! Deadline-driven consumption of forecast streams.
//!
//! [`StreamConsumer::open`] starts one server-streaming call and arms an
//! absolute deadline. The returned [`WeatherStream`] yields records lazily
//! and classifies how the stream ended: normal completion, cancellation
//! (deadline, explicit cancel, or a server-side `Cancelled`/`Aborted`
//! status), or the known teardown race where the transport and the
//! application disagree about stream liveness. Only unexpected statuses
//! surface as errors, and the consumer never retries on its own.

use crate::channel::AuthChannel;
use crate::credentials::{BearerToken, attach_bearer};
use crate::error::ClientError;
use core::pin::Pin;
use core::time::Duration;
use skycast_tonic_core::proto::WeatherData;
use tokio::time::{Instant, Sleep, sleep_until};
use tokio_util::sync::CancellationToken;
use tonic::{Code, Request, Status, Streaming};

/// How a forecast stream ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnding {
    /// The server produced its full sequence.
    Completed,
    /// The deadline elapsed or the caller cancelled; also covers
    /// server-side `Cancelled` and `Aborted` statuses. Expected, not an
    /// application error.
    Cancelled,
    /// The transport and the application disagreed about stream liveness
    /// during teardown. Known, recoverable condition.
    TransportRace,
}

/// Every record delivered by a finished stream, plus its ending.
#[derive(Debug)]
pub struct StreamSummary {
    pub records: Vec<WeatherData>,
    pub ending: StreamEnding,
}

/// Opens forecast streams over an [`AuthChannel`].
pub struct StreamConsumer {
    channel: AuthChannel,
}

impl StreamConsumer {
    pub fn new(channel: AuthChannel) -> Self {
        Self { channel }
    }

    /// Opens one server-streaming call with an absolute deadline.
    ///
    /// `override_token` authenticates this call explicitly instead of
    /// relying on channel-wide credentials. The deadline runs from this
    /// point; if it elapses before the sequence completes, the call is
    /// dropped — resetting the stream server-side — and the ending is
    /// [`StreamEnding::Cancelled`].
    pub async fn open(
        &self,
        override_token: Option<&BearerToken>,
        deadline: Duration,
    ) -> Result<WeatherStream, ClientError> {
        let deadline_at = Instant::now() + deadline;
        let mut client = self.channel.forecasts();

        let mut request = Request::new(());
        if let Some(token) = override_token {
            attach_bearer(&mut request, token).map_err(ClientError::Rpc)?;
        }

        let opened = tokio::select! {
            response = client.get_weather_stream(request) => {
                Some(response.map_err(ClientError::from_status)?)
            }
            () = sleep_until(deadline_at) => None,
        };

        let (inner, ending) = match opened {
            Some(response) => (Some(response.into_inner()), None),
            // The deadline elapsed before the server answered; the call
            // was dropped and the handle starts out terminal.
            None => (None, Some(StreamEnding::Cancelled)),
        };

        Ok(WeatherStream {
            inner,
            deadline: Box::pin(sleep_until(deadline_at)),
            cancel: CancellationToken::new(),
            ending,
            received: 0,
        })
    }
}

/// A lazy, finite, non-restartable sequence of forecast records.
#[derive(Debug)]
pub struct WeatherStream {
    inner: Option<Streaming<WeatherData>>,
    deadline: Pin<Box<Sleep>>,
    cancel: CancellationToken,
    ending: Option<StreamEnding>,
    received: usize,
}

impl WeatherStream {
    /// Handle for cancelling this stream explicitly. Idempotent.
    pub fn cancel_handle(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Terminal classification; `None` while records may still arrive.
    pub fn ending(&self) -> Option<StreamEnding> {
        self.ending
    }

    /// Number of records delivered so far.
    pub fn received(&self) -> usize {
        self.received
    }

    /// The next record, or `None` once the stream is terminal.
    ///
    /// Expected terminal conditions end iteration and set
    /// [`ending`](Self::ending); any other status is surfaced as an
    /// error.
    pub async fn try_next(&mut self) -> Result<Option<WeatherData>, ClientError> {
        if self.ending.is_some() {
            return Ok(None);
        }
        let Some(stream) = self.inner.as_mut() else {
            return Ok(None);
        };

        tokio::select! {
            biased;

            () = self.cancel.cancelled() => {
                self.finish(StreamEnding::Cancelled);
                Ok(None)
            }
            () = &mut self.deadline => {
                self.finish(StreamEnding::Cancelled);
                Ok(None)
            }
            message = stream.message() => match message {
                Ok(Some(record)) => {
                    self.received += 1;
                    Ok(Some(record))
                }
                Ok(None) => {
                    self.ending = Some(StreamEnding::Completed);
                    self.inner = None;
                    Ok(None)
                }
                Err(status) => match classify_terminal(&status) {
                    Some(ending) => {
                        tracing::debug!(code = ?status.code(), ?ending, "stream ended by status");
                        self.finish(ending);
                        Ok(None)
                    }
                    None => {
                        self.inner = None;
                        Err(ClientError::from_status(status))
                    }
                },
            },
        }
    }

    /// Drains the stream, returning every delivered record and the
    /// ending.
    pub async fn collect(mut self) -> Result<StreamSummary, ClientError> {
        let mut records = Vec::new();
        while let Some(record) = self.try_next().await? {
            records.push(record);
        }
        Ok(StreamSummary {
            records,
            ending: self.ending.unwrap_or(StreamEnding::Completed),
        })
    }

    /// Dropping the call half resets the underlying HTTP/2 stream, which
    /// is what actually tells the server to stop producing.
    fn finish(&mut self, ending: StreamEnding) {
        self.ending = Some(ending);
        self.inner = None;
    }
}

/// Maps a terminal status to an expected stream ending, or `None` for
/// statuses the caller must treat as failures.
fn classify_terminal(status: &Status) -> Option<StreamEnding> {
    match status.code() {
        Code::Cancelled | Code::Aborted | Code::DeadlineExceeded => Some(StreamEnding::Cancelled),
        Code::Unknown | Code::Internal if is_transport_race(status) => {
            Some(StreamEnding::TransportRace)
        }
        _ => None,
    }
}

/// The transport's reset vocabulary for the case where it disagrees with
/// the application about whether the stream is still active.
fn is_transport_race(status: &Status) -> bool {
    let message = status.message();
    [
        "stream no longer needed",
        "stream reset",
        "connection reset",
        "broken pipe",
        "h2 protocol error",
    ]
    .iter()
    .any(|needle| message.contains(needle))
}
