use crate::credentials::BearerToken;
use crate::error::ClientError;

/// Fetches a bearer token for `identity` from the issuance endpoint.
///
/// Sends `GET {base_url}/generateToken?name={identity}`. Any non-success
/// HTTP status is a hard failure; the success body is the opaque token.
pub async fn fetch_token(base_url: &str, identity: &str) -> Result<BearerToken, ClientError> {
    let url = format!("{}/generateToken", base_url.trim_end_matches('/'));

    let response = reqwest::Client::new()
        .get(url)
        .query(&[("name", identity)])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::TokenRejected { status });
    }

    Ok(BearerToken::new(response.text().await?))
}
