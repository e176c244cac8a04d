//! Server-streaming forecast service.
//!
//! Each accepted call gets its own [`StreamSession`] writing into a bounded
//! channel; the handler returns the receiving half as the response stream.
//! The session's cancellation token is a child of the server-wide shutdown
//! token, so process shutdown cancels every live stream.

use crate::server::auth::CallerIdentity;
use crate::server::config::StreamSettings;
use crate::server::streaming::session::{SessionEnd, StreamSession};
use core::pin::Pin;
use skycast_tonic_core::proto::WeatherData;
use skycast_tonic_core::proto::weather_forecasts_server::WeatherForecasts;
use tokio::sync::mpsc;
use tokio_stream::{Stream, wrappers::ReceiverStream};
use tokio_util::sync::CancellationToken;
use tonic::{Request, Response, Status};
use tracing::Instrument;

#[derive(Clone)]
pub struct WeatherService {
    settings: StreamSettings,
    shutdown: CancellationToken,
}

impl WeatherService {
    pub fn new(settings: StreamSettings, shutdown: CancellationToken) -> Self {
        Self { settings, shutdown }
    }
}

#[tonic::async_trait]
impl WeatherForecasts for WeatherService {
    type GetWeatherStreamStream = Pin<Box<dyn Stream<Item = Result<WeatherData, Status>> + Send>>;

    async fn get_weather_stream(
        &self,
        request: Request<()>,
    ) -> Result<Response<Self::GetWeatherStreamStream>, Status> {
        let caller = request.extensions().get::<CallerIdentity>().cloned();

        let (tx, rx) = mpsc::channel(self.settings.buffer_size);
        let cancel = self.shutdown.child_token();
        let session = StreamSession::new(self.settings.clone(), cancel, tx);

        let span = tracing::info_span!("streaming", caller = ?caller);
        tokio::spawn(
            async move {
                match session.run().await {
                    SessionEnd::Completed => {
                        tracing::debug!("forecast stream completed");
                    }
                    SessionEnd::Cancelled => {
                        tracing::warn!("stream has been cancelled by the client");
                    }
                    SessionEnd::Faulted => {
                        tracing::warn!("stream torn down by the transport mid-write");
                    }
                }
            }
            .instrument(span),
        );

        Ok(Response::new(Box::pin(ReceiverStream::new(rx))))
    }
}
