//! Bearer token verification.
//!
//! Verification is deliberately a per-service concern: every service holds
//! its own verifier and re-checks signature, expiry and issuer on each
//! request. Results are never shared across process boundaries.

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde_json::Value;
use thiserror::Error;

/// Claims extracted from a successfully verified token.
///
/// The full claim map is retained because role extraction needs the
/// provider's nested `realm_access` structure.
#[derive(Debug, Clone)]
pub struct VerifiedClaims {
    pub subject: String,
    pub claims: Value,
}

impl VerifiedClaims {
    /// Optional string claim lookup; absence is not an error.
    pub fn string_claim(&self, name: &str) -> Option<&str> {
        self.claims.get(name).and_then(Value::as_str)
    }
}

/// Why a token was rejected.
///
/// The distinction exists for logs only; callers must surface every variant
/// as a single unauthenticated outcome, since telling an external caller
/// *why* their credential failed is an information-disclosure risk.
#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("token rejected: {0}")]
    Rejected(#[from] jsonwebtoken::errors::Error),

    #[error("token not yet valid")]
    NotYetValid,

    #[error("token has no subject")]
    MissingSubject,
}

/// Verifies a raw bearer value (scheme prefix already stripped).
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<VerifiedClaims, VerificationError>;
}

/// HS256 verifier with a configured shared secret and trusted issuer.
///
/// Key material and issuer are fixed at construction; there is no ambient
/// configuration. Swapping in other key material (e.g. a JWKS-backed
/// verifier) only requires another [`TokenVerifier`] implementation.
pub struct Hs256Verifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl Hs256Verifier {
    pub fn new(secret: &[u8], issuer: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.set_issuer(&[issuer]);

        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }
}

impl TokenVerifier for Hs256Verifier {
    fn verify(&self, token: &str) -> Result<VerifiedClaims, VerificationError> {
        let data = jsonwebtoken::decode::<Value>(token, &self.decoding_key, &self.validation)?;
        let claims = data.claims;

        // `nbf` is optional in the tokens we consume; check it only when present.
        if let Some(nbf) = claims.get("nbf").and_then(Value::as_i64) {
            if chrono::Utc::now().timestamp() < nbf {
                return Err(VerificationError::NotYetValid);
            }
        }

        let subject = claims
            .get("sub")
            .and_then(Value::as_str)
            .ok_or(VerificationError::MissingSubject)?
            .to_string();

        Ok(VerifiedClaims { subject, claims })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header};
    use serde_json::json;

    const SECRET: &str = "test-secret";
    const ISSUER: &str = "http://keycloak.local/realms/feed";

    fn mint(secret: &str, claims: Value) -> String {
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("failed to encode jwt")
    }

    fn base_claims() -> Value {
        let now = chrono::Utc::now().timestamp();
        json!({
            "sub": "subject-1",
            "iss": ISSUER,
            "exp": now + 600,
            "preferred_username": "alice",
            "email": "alice@example.com",
        })
    }

    #[test]
    fn valid_token_yields_subject_and_claims() {
        let verifier = Hs256Verifier::new(SECRET.as_bytes(), ISSUER);
        let token = mint(SECRET, base_claims());

        let verified = verifier.verify(&token).unwrap();
        assert_eq!(verified.subject, "subject-1");
        assert_eq!(verified.string_claim("preferred_username"), Some("alice"));
        assert_eq!(verified.string_claim("email"), Some("alice@example.com"));
    }

    #[test]
    fn expired_token_rejected() {
        let verifier = Hs256Verifier::new(SECRET.as_bytes(), ISSUER);
        let mut claims = base_claims();
        // Well past the default validation leeway.
        claims["exp"] = json!(chrono::Utc::now().timestamp() - 600);
        let token = mint(SECRET, claims);

        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn wrong_issuer_rejected() {
        let verifier = Hs256Verifier::new(SECRET.as_bytes(), ISSUER);
        let mut claims = base_claims();
        claims["iss"] = json!("http://evil.local/realms/feed");
        let token = mint(SECRET, claims);

        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn wrong_secret_rejected() {
        let verifier = Hs256Verifier::new(SECRET.as_bytes(), ISSUER);
        let token = mint("other-secret", base_claims());

        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn missing_subject_rejected() {
        let verifier = Hs256Verifier::new(SECRET.as_bytes(), ISSUER);
        let now = chrono::Utc::now().timestamp();
        let token = mint(SECRET, json!({ "iss": ISSUER, "exp": now + 600 }));

        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn not_yet_valid_token_rejected() {
        let verifier = Hs256Verifier::new(SECRET.as_bytes(), ISSUER);
        let mut claims = base_claims();
        claims["nbf"] = json!(chrono::Utc::now().timestamp() + 600);
        let token = mint(SECRET, claims);

        assert!(matches!(
            verifier.verify(&token),
            Err(VerificationError::NotYetValid)
        ));
    }

    #[test]
    fn garbage_token_rejected() {
        let verifier = Hs256Verifier::new(SECRET.as_bytes(), ISSUER);
        assert!(verifier.verify("not-a-jwt").is_err());
    }
}
