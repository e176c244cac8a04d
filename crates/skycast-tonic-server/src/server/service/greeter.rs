use crate::server::auth::CallerIdentity;
use skycast_tonic_core::proto::greeter_server::Greeter;
use skycast_tonic_core::proto::{HelloReply, HelloRequest};
use tonic::{Request, Response, Status};

/// Unary echo service, gated by the bearer interceptor.
///
/// Serves as the minimal smoke test for credential handling: a call that
/// reaches this handler has already been authenticated.
#[derive(Clone, Default)]
pub struct GreeterService;

#[tonic::async_trait]
impl Greeter for GreeterService {
    async fn say_hello(
        &self,
        request: Request<HelloRequest>,
    ) -> Result<Response<HelloReply>, Status> {
        let caller = request.extensions().get::<CallerIdentity>().cloned();
        let name = request.into_inner().name;

        tracing::info!(caller = ?caller, "greeting request");

        Ok(Response::new(HelloReply {
            message: format!("Hello {name}"),
        }))
    }
}
