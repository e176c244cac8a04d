//! Per-call forecast stream sessions.
//!
//! One [`StreamSession`] exists per accepted `GetWeatherStream` call. It
//! produces up to a configured number of records at a fixed cadence and
//! observes a cancellation token between and during production steps.
//! Sessions share no state: each owns its output channel and its own
//! pseudo-random generator.

use crate::server::config::StreamSettings;
use prost_types::Timestamp;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use skycast_tonic_core::proto::WeatherData;
use skycast_tonic_core::types::{FORECAST_STEP, SUMMARIES, TEMPERATURE_MAX_C, TEMPERATURE_MIN_C};
use std::time::SystemTime;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tonic::Status;

/// Terminal state of one stream session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The session produced its full record sequence.
    Completed,
    /// The cancellation signal fired, or the peer stopped reading.
    Cancelled,
    /// A write failed with the cancellation signal untriggered: the
    /// transport tore the stream down outside the normal cancellation
    /// path.
    Faulted,
}

/// State for a single forecast stream.
///
/// Constructed when the RPC is dispatched and consumed by [`run`], which
/// drives the session to a terminal [`SessionEnd`]. The output channel and
/// the cancellation token are released on every path.
///
/// [`run`]: StreamSession::run
pub struct StreamSession {
    settings: StreamSettings,
    cancel: CancellationToken,
    out: mpsc::Sender<Result<WeatherData, Status>>,
    rng: SmallRng,
    started_at: SystemTime,
    sequence: usize,
}

impl StreamSession {
    pub fn new(
        settings: StreamSettings,
        cancel: CancellationToken,
        out: mpsc::Sender<Result<WeatherData, Status>>,
    ) -> Self {
        Self {
            settings,
            cancel,
            out,
            rng: SmallRng::from_os_rng(),
            started_at: SystemTime::now(),
            sequence: 0,
        }
    }

    /// Drives the session until it reaches a terminal state.
    ///
    /// Each iteration waits one interval, synthesizes a record, re-checks
    /// the cancellation signal, and writes. The wait itself is
    /// interruptible: cancellation or the peer closing the response
    /// channel aborts it immediately rather than at the next boundary.
    pub async fn run(mut self) -> SessionEnd {
        loop {
            if self.cancel.is_cancelled() {
                return SessionEnd::Cancelled;
            }

            tokio::select! {
                () = self.cancel.cancelled() => return SessionEnd::Cancelled,
                () = self.out.closed() => return SessionEnd::Cancelled,
                () = tokio::time::sleep(self.settings.interval) => {}
            }

            let record = self.next_record();

            // Cancellation may have landed while the record was being
            // prepared; never write after the signal is set.
            if self.cancel.is_cancelled() {
                return SessionEnd::Cancelled;
            }

            tracing::debug!(sequence = self.sequence, "sending forecast record");
            if self.out.send(Ok(record)).await.is_err() {
                return SessionEnd::Faulted;
            }

            self.sequence += 1;
            if self.sequence >= self.settings.max_records {
                return SessionEnd::Completed;
            }
        }
    }

    fn next_record(&mut self) -> WeatherData {
        let stamp = self.started_at + FORECAST_STEP * self.sequence as u32;
        WeatherData {
            date_time_stamp: Some(Timestamp::from(stamp)),
            temperature_c: self.rng.random_range(TEMPERATURE_MIN_C..TEMPERATURE_MAX_C),
            summary: SUMMARIES[self.rng.random_range(0..SUMMARIES.len())].to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::time::Duration;

    fn settings(max_records: usize, interval: Duration) -> StreamSettings {
        StreamSettings {
            max_records,
            interval,
            buffer_size: 8,
        }
    }

    #[tokio::test]
    async fn produces_the_full_sequence() {
        let (tx, mut rx) = mpsc::channel(32);
        let session = StreamSession::new(
            settings(20, Duration::from_millis(1)),
            CancellationToken::new(),
            tx,
        );

        let driver = tokio::spawn(session.run());

        let mut records = Vec::new();
        while let Some(record) = rx.recv().await {
            records.push(record.expect("no error records"));
        }

        assert_eq!(driver.await.expect("driver"), SessionEnd::Completed);
        assert_eq!(records.len(), 20);

        for pair in records.windows(2) {
            let (a, b) = (
                pair[0].date_time_stamp.clone().expect("stamp"),
                pair[1].date_time_stamp.clone().expect("stamp"),
            );
            assert!((a.seconds, a.nanos) < (b.seconds, b.nanos));
        }
        for record in &records {
            assert!(record.temperature_c >= TEMPERATURE_MIN_C);
            assert!(record.temperature_c < TEMPERATURE_MAX_C);
            assert!(SUMMARIES.contains(&record.summary.as_str()));
        }
    }

    #[tokio::test]
    async fn already_cancelled_session_emits_nothing() {
        let (tx, mut rx) = mpsc::channel(8);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let session = StreamSession::new(settings(20, Duration::from_millis(1)), cancel, tx);
        assert_eq!(session.run().await, SessionEnd::Cancelled);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_interrupts_the_wait() {
        let (tx, mut rx) = mpsc::channel(8);
        let cancel = CancellationToken::new();

        let session = StreamSession::new(
            settings(20, Duration::from_secs(3600)),
            cancel.clone(),
            tx,
        );
        let driver = tokio::spawn(session.run());

        // Let the session enter its wait, then fire the signal mid-wait.
        tokio::task::yield_now().await;
        cancel.cancel();

        assert_eq!(driver.await.expect("driver"), SessionEnd::Cancelled);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn observing_cancellation_twice_is_harmless() {
        let (tx, _rx) = mpsc::channel(8);
        let cancel = CancellationToken::new();
        cancel.cancel();
        cancel.cancel();

        let session = StreamSession::new(settings(20, Duration::from_millis(1)), cancel, tx);
        assert_eq!(session.run().await, SessionEnd::Cancelled);
    }

    #[tokio::test]
    async fn dropped_receiver_cancels_the_session() {
        let (tx, rx) = mpsc::channel(8);
        drop(rx);

        let session = StreamSession::new(
            settings(20, Duration::from_millis(1)),
            CancellationToken::new(),
            tx,
        );
        // The closed channel is observed during the wait, before any write
        // is attempted.
        assert_eq!(session.run().await, SessionEnd::Cancelled);
    }

    #[tokio::test]
    async fn write_failure_outside_the_signal_faults() {
        let (tx, rx) = mpsc::channel(1);
        let session = StreamSession::new(
            settings(20, Duration::from_millis(1)),
            CancellationToken::new(),
            tx,
        );
        let driver = tokio::spawn(session.run());

        // Let the session fill the buffer and block on the next write,
        // then walk away without reading: the blocked write observes the
        // closed channel with the cancellation signal untriggered.
        tokio::time::sleep(Duration::from_millis(50)).await;
        drop(rx);

        assert_eq!(driver.await.expect("driver"), SessionEnd::Faulted);
    }
}
