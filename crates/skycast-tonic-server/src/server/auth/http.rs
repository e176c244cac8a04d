use super::issuer::TokenIssuer;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

#[derive(Deserialize)]
struct TokenQuery {
    name: Option<String>,
}

/// `GET /generateToken?name=<identity>` — mints a bearer token for the
/// given identity and returns it as the plain-text response body.
async fn generate_token(
    State(issuer): State<TokenIssuer>,
    Query(query): Query<TokenQuery>,
) -> Result<String, StatusCode> {
    let name = query
        .name
        .filter(|name| !name.is_empty())
        .ok_or(StatusCode::BAD_REQUEST)?;

    tracing::info!(identity = %name, "issuing bearer token");
    Ok(issuer.issue(&name))
}

/// Routes for the token issuance endpoint.
pub fn token_routes(issuer: TokenIssuer) -> Router {
    Router::new()
        .route("/generateToken", get(generate_token))
        .with_state(issuer)
}
