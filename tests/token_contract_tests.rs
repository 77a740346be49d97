/// Tests for the signed-token contract both credential tiers rely on
///
/// Note: These exercise the HS256 token shape directly. Full request-level
/// tests live beside the router in the crate.

#[cfg(test)]
mod tests {
    use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
    use serde_json::json;

    fn relaxed_validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims = std::collections::HashSet::new();
        validation
    }

    #[test]
    fn test_token_round_trip_preserves_subject_claim() {
        let token = encode(
            &Header::default(),
            &json!({ "name": "timekeeper" }),
            &EncodingKey::from_secret(b"a-signing-secret".as_ref()),
        )
        .unwrap();

        let data = decode::<serde_json::Value>(
            &token,
            &DecodingKey::from_secret(b"a-signing-secret".as_ref()),
            &relaxed_validation(),
        )
        .unwrap();

        assert_eq!(data.claims["name"], "timekeeper");
    }

    #[test]
    fn test_token_signed_with_other_secret_fails_decode() {
        let token = encode(
            &Header::default(),
            &json!({ "name": "timekeeper" }),
            &EncodingKey::from_secret(b"secret-one".as_ref()),
        )
        .unwrap();

        let result = decode::<serde_json::Value>(
            &token,
            &DecodingKey::from_secret(b"secret-two".as_ref()),
            &relaxed_validation(),
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_tampered_token_fails_decode() {
        let token = encode(
            &Header::default(),
            &json!({ "name": "timekeeper" }),
            &EncodingKey::from_secret(b"a-signing-secret".as_ref()),
        )
        .unwrap();

        // Flip a character in the payload segment
        let mut tampered: Vec<String> = token.split('.').map(str::to_string).collect();
        tampered[1] = format!("x{}", &tampered[1][1..]);
        let tampered = tampered.join(".");

        let result = decode::<serde_json::Value>(
            &tampered,
            &DecodingKey::from_secret(b"a-signing-secret".as_ref()),
            &relaxed_validation(),
        );

        assert!(result.is_err());
    }
}
