/// Signed-token verification
///
/// One primitive serves both credential tiers: the server's stored API key
/// (signed with the server secret) and client access tokens (signed with the
/// client secret). The secret and expected subject are always parameters,
/// never hard-coded.
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

/// Verify an HS256 token against a secret and an expected `name` claim.
///
/// Fails closed: a malformed token, a signature mismatch, or a wrong subject
/// all yield `false`, with the cause logged.
pub fn verify_token(token: &str, secret: &str, expected_subject: &str) -> bool {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    // Tokens carry no exp claim; signature and subject are the contract
    validation.validate_exp = false;
    validation.required_spec_claims = std::collections::HashSet::new();

    let data = match decode::<serde_json::Value>(token, &decoding_key, &validation) {
        Ok(data) => data,
        Err(e) => {
            tracing::warn!(error = %e, "token verification failed");
            return false;
        }
    };

    let subject = data.claims.get("name").and_then(|v| v.as_str());
    if subject != Some(expected_subject) {
        tracing::warn!("token subject does not match expected subject");
        return false;
    }

    true
}
