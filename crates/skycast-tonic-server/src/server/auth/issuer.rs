use parking_lot::RwLock;
use rand::Rng;
use rand::distr::Alphanumeric;
use std::collections::HashMap;
use std::sync::Arc;

/// Length of a minted token, in characters.
const TOKEN_LEN: usize = 32;

/// Identity a token was issued for, made available to handlers through the
/// request extensions once the gate has admitted a call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallerIdentity(pub String);

/// Mints and validates opaque bearer tokens.
///
/// Tokens are random alphanumeric strings remembered against the identity
/// they were issued for. Validation is a lookup; the token's content is
/// never interpreted anywhere else, so the format can change without
/// touching the gate or the clients.
#[derive(Clone, Default)]
pub struct TokenIssuer {
    issued: Arc<RwLock<HashMap<String, String>>>,
}

impl TokenIssuer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mints a fresh token for `identity`.
    pub fn issue(&self, identity: &str) -> String {
        let token: String = rand::rng()
            .sample_iter(Alphanumeric)
            .take(TOKEN_LEN)
            .map(char::from)
            .collect();
        self.issued
            .write()
            .insert(token.clone(), identity.to_string());
        token
    }

    /// Returns the identity behind `token`, or `None` for tokens this
    /// issuer never minted.
    pub fn validate(&self, token: &str) -> Option<CallerIdentity> {
        self.issued.read().get(token).cloned().map(CallerIdentity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_tokens_validate_to_their_identity() {
        let issuer = TokenIssuer::new();
        let token = issuer.issue("TopSwagCode");
        assert_eq!(
            issuer.validate(&token),
            Some(CallerIdentity("TopSwagCode".to_string()))
        );
    }

    #[test]
    fn unknown_tokens_are_rejected() {
        let issuer = TokenIssuer::new();
        issuer.issue("TopSwagCode");
        assert_eq!(issuer.validate("not-a-real-token"), None);
    }

    #[test]
    fn tokens_are_unique_per_issue() {
        let issuer = TokenIssuer::new();
        let a = issuer.issue("a");
        let b = issuer.issue("a");
        assert_ne!(a, b);
        assert_eq!(a.len(), TOKEN_LEN);
    }
}
