//! Shared setup for integration tests: boots the real gRPC router and the
//! token endpoint on ephemeral listeners and hands back client handles.

use core::time::Duration;
use skycast_tonic_client::channel::{AuthChannel, ChannelFactory};
use skycast_tonic_server::server::app::App;
use skycast_tonic_server::server::config::{ServerConfig, StreamSettings};
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;

pub struct TestServer {
    pub grpc_addr: String,
    pub token_url: String,
}

pub fn settings(max_records: usize, interval: Duration) -> StreamSettings {
    StreamSettings {
        max_records,
        interval,
        buffer_size: 8,
    }
}

pub async fn spawn(stream: StreamSettings) -> TestServer {
    let app = App::new(ServerConfig {
        server_addr: String::from("127.0.0.1:0"),
        token_addr: String::from("127.0.0.1:0"),
        stream,
    });

    let grpc_listener = TcpListener::bind("127.0.0.1:0").await.expect("bind grpc");
    let grpc_addr = grpc_listener.local_addr().expect("grpc addr");
    let router = app.grpc_router().await.expect("router");
    tokio::spawn(async move {
        let _ = router
            .serve_with_incoming(TcpListenerStream::new(grpc_listener))
            .await;
    });

    let token_listener = TcpListener::bind("127.0.0.1:0").await.expect("bind token");
    let token_addr = token_listener.local_addr().expect("token addr");
    let routes = app.token_routes();
    tokio::spawn(async move {
        let _ = axum::serve(token_listener, routes).await;
    });

    TestServer {
        grpc_addr: format!("http://{grpc_addr}"),
        token_url: format!("http://{token_addr}"),
    }
}

pub async fn connect(server: &TestServer) -> AuthChannel {
    ChannelFactory::new(server.grpc_addr.clone())
        .expect("endpoint")
        .connect()
        .await
        .expect("connect")
}
