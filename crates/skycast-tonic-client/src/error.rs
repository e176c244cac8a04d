use tonic::{Code, Status};

/// Unified error type for client-side operations.
///
/// Expected stream endings (cancellation, the documented teardown race)
/// are not errors; they are reported through
/// [`StreamEnding`](crate::consumer::StreamEnding). This enum covers the
/// genuinely failing paths.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A credential bundle was paired with an unencrypted transport.
    #[error("credential injection requires an encrypted transport")]
    InsecureCredentials,

    /// Endpoint construction or connection failure.
    #[error("transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    /// The call was rejected by the authorization gate.
    #[error("call rejected: {0}")]
    Unauthenticated(Status),

    /// Terminal status with no expected classification.
    #[error("rpc failed: {0}")]
    Rpc(Status),

    /// The token endpoint could not be reached.
    #[error("token endpoint request failed: {0}")]
    TokenEndpoint(#[from] reqwest::Error),

    /// The token endpoint answered with a non-success status.
    #[error("token endpoint returned {status}")]
    TokenRejected { status: reqwest::StatusCode },

    /// The credential source could not produce a token.
    #[error(transparent)]
    Credential(#[from] crate::credentials::CredentialError),
}

impl ClientError {
    pub(crate) fn from_status(status: Status) -> Self {
        if status.code() == Code::Unauthenticated {
            Self::Unauthenticated(status)
        } else {
            Self::Rpc(status)
        }
    }

    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated(_))
    }
}
