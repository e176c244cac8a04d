mod support;

use core::time::Duration;
use skycast_tonic_client::consumer::{StreamConsumer, StreamEnding};
use skycast_tonic_client::login;
use skycast_tonic_core::types::{SUMMARIES, TEMPERATURE_MAX_C, TEMPERATURE_MIN_C};
use std::time::Instant;

#[tokio::test]
async fn full_streams_deliver_the_complete_ordered_sequence() {
    let server = support::spawn(support::settings(20, Duration::from_millis(5))).await;
    let channel = support::connect(&server).await;

    let token = login::fetch_token(&server.token_url, "TopSwagCode")
        .await
        .expect("token issued");

    let summary = StreamConsumer::new(channel)
        .open(Some(&token), Duration::from_secs(10))
        .await
        .expect("stream opened")
        .collect()
        .await
        .expect("stream drained");

    assert_eq!(summary.ending, StreamEnding::Completed);
    assert_eq!(summary.records.len(), 20);

    for pair in summary.records.windows(2) {
        let (a, b) = (
            pair[0].date_time_stamp.clone().expect("stamp"),
            pair[1].date_time_stamp.clone().expect("stamp"),
        );
        assert!((a.seconds, a.nanos) < (b.seconds, b.nanos));
    }

    for record in &summary.records {
        assert!(record.temperature_c >= TEMPERATURE_MIN_C);
        assert!(record.temperature_c < TEMPERATURE_MAX_C);
        assert!(SUMMARIES.contains(&record.summary.as_str()));
    }
}

#[tokio::test]
async fn deadlines_cancel_long_streams_promptly() {
    let server = support::spawn(support::settings(20, Duration::from_millis(500))).await;
    let channel = support::connect(&server).await;

    let token = login::fetch_token(&server.token_url, "TopSwagCode")
        .await
        .expect("token issued");

    let started = Instant::now();
    let summary = StreamConsumer::new(channel)
        .open(Some(&token), Duration::from_secs(2))
        .await
        .expect("stream opened")
        .collect()
        .await
        .expect("expected endings are not errors");

    assert_eq!(summary.ending, StreamEnding::Cancelled);
    assert!(
        summary.records.len() <= 4,
        "got {} records",
        summary.records.len()
    );
    assert!(started.elapsed() < Duration::from_millis(3500));
}

#[tokio::test]
async fn deadlines_shorter_than_the_interval_deliver_at_most_one_record() {
    let server = support::spawn(support::settings(20, Duration::from_secs(5))).await;
    let channel = support::connect(&server).await;

    let token = login::fetch_token(&server.token_url, "TopSwagCode")
        .await
        .expect("token issued");

    let started = Instant::now();
    let summary = StreamConsumer::new(channel)
        .open(Some(&token), Duration::from_millis(300))
        .await
        .expect("stream opened")
        .collect()
        .await
        .expect("expected endings are not errors");

    assert_eq!(summary.ending, StreamEnding::Cancelled);
    assert!(summary.records.len() <= 1);
    assert!(started.elapsed() < Duration::from_millis(1500));
}

#[tokio::test]
async fn explicit_cancellation_ends_the_stream() {
    let server = support::spawn(support::settings(20, Duration::from_millis(100))).await;
    let channel = support::connect(&server).await;

    let token = login::fetch_token(&server.token_url, "TopSwagCode")
        .await
        .expect("token issued");

    let mut stream = StreamConsumer::new(channel)
        .open(Some(&token), Duration::from_secs(30))
        .await
        .expect("stream opened");

    let first = stream.try_next().await.expect("first record");
    assert!(first.is_some());

    let cancel = stream.cancel_handle();
    cancel.cancel();
    // A second observation of the signal must be harmless.
    cancel.cancel();

    assert_eq!(stream.try_next().await.expect("terminal"), None);
    assert_eq!(stream.ending(), Some(StreamEnding::Cancelled));
    assert_eq!(stream.received(), 1);

    // The handle stays terminal on further polls.
    assert_eq!(stream.try_next().await.expect("still terminal"), None);
}
