use core::time::Duration;
use skycast_tonic_client::channel::{AuthChannel, ChannelFactory, TransportSecurity};
use skycast_tonic_client::consumer::{StreamConsumer, StreamEnding};
use skycast_tonic_client::credentials::{BearerToken, StaticToken, attach_bearer};
use skycast_tonic_client::login;
use skycast_tonic_core::proto::HelloRequest;
use tonic::transport::ClientTlsConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let grpc_addr = std::env::var("SKYCAST_ADDR")
        .unwrap_or_else(|_| String::from("http://127.0.0.1:50051"));
    let token_url = std::env::var("SKYCAST_TOKEN_URL")
        .unwrap_or_else(|_| String::from("http://127.0.0.1:50052"));

    let channel = ChannelFactory::new(grpc_addr.clone())?.connect().await?;

    // Show the call without credentials failing.
    match channel
        .greeter()
        .say_hello(HelloRequest {
            name: String::from("GreeterClient"),
        })
        .await
    {
        Err(status) if status.code() == tonic::Code::Unauthenticated => {
            println!("Failed to make insecure call to secure endpoint. That's good! :)");
        }
        Err(status) => anyhow::bail!("unexpected greeter failure: {status}"),
        Ok(_) => anyhow::bail!("unauthenticated call was admitted"),
    }

    let token = login::fetch_token(&token_url, "TopSwagCode").await?;

    // Per-call credentials.
    let mut request = tonic::Request::new(HelloRequest {
        name: String::from("GreeterClient"),
    });
    attach_bearer(&mut request, &token)?;
    let reply = channel.greeter().say_hello(request).await?;
    println!("Greeting: {}", reply.into_inner().message);

    stream_forecasts(&channel, Some(&token)).await?;

    // Channel-wide credentials require an encrypted transport.
    if let Ok(domain) = std::env::var("SKYCAST_TLS_DOMAIN") {
        let tls = ClientTlsConfig::new()
            .domain_name(domain)
            .with_native_roots();
        let secure = ChannelFactory::new(grpc_addr)?
            .with_security(TransportSecurity::Tls(tls))
            .with_credentials(StaticToken::new(token.clone()))?
            .connect()
            .await?;

        let reply = secure
            .greeter()
            .say_hello(HelloRequest {
                name: String::from("GreeterClient"),
            })
            .await?;
        println!("Greeting: {}", reply.into_inner().message);

        stream_forecasts(&secure, None).await?;
    }

    Ok(())
}

async fn stream_forecasts(
    channel: &AuthChannel,
    token: Option<&BearerToken>,
) -> anyhow::Result<()> {
    let consumer = StreamConsumer::new(channel.clone());
    let mut stream = consumer.open(token, Duration::from_secs(2)).await?;

    while let Some(record) = stream.try_next().await? {
        let stamp = record
            .date_time_stamp
            .map(|t| t.to_string())
            .unwrap_or_else(|| String::from("-"));
        println!("{stamp} | {} | {} C", record.summary, record.temperature_c);
    }

    match stream.ending() {
        Some(StreamEnding::Cancelled) => println!("Stream cancelled."),
        Some(StreamEnding::TransportRace) => {
            println!("Client and server disagree on active stream count.");
        }
        _ => {}
    }

    Ok(())
}
