//! Bearer validation exercised through the public API, header to claims.

use jsonwebtoken::{EncodingKey, Header, encode};
use secrecy::SecretString;
use vouch_auth::{
    BearerValidator, SigningKeySource, TokenRejection, ValidationConstraints, token_from_header,
};

const KEY: &str = "integration-test-signing-key";

fn validator() -> BearerValidator {
    BearerValidator::new(SigningKeySource::from_secret(SecretString::from(KEY)))
}

fn mint(payload: serde_json::Value, key: &str) -> String {
    encode(
        &Header::default(),
        &payload,
        &EncodingKey::from_secret(key.as_bytes()),
    )
    .expect("token encodes")
}

fn in_an_hour() -> i64 {
    chrono::Utc::now().timestamp() + 3600
}

#[test]
fn header_to_claims_round_trip() {
    let token = mint(
        serde_json::json!({"sub": "kermit", "exp": in_an_hour(), "role": "admin"}),
        KEY,
    );
    let header_value = format!("Bearer {token}");

    let credential = token_from_header(Some(&header_value)).expect("bearer token extracted");
    let claims = validator()
        .validate(credential, &ValidationConstraints::default())
        .expect("credential accepted");

    assert!(claims.has("sub", "kermit"));
    assert!(claims.has("role", "admin"));
}

#[test]
fn missing_header_is_malformed() {
    assert_eq!(
        token_from_header(None),
        Err(TokenRejection::MalformedCredential)
    );
}

#[test]
fn foreign_key_is_bad_signature() {
    let token = mint(
        serde_json::json!({"sub": "kermit", "exp": in_an_hour()}),
        "an-entirely-different-key",
    );

    let result = validator().validate(&token, &ValidationConstraints::default());
    assert_eq!(result, Err(TokenRejection::BadSignature));
}

#[test]
fn past_expiry_is_expired() {
    let token = mint(
        serde_json::json!({"sub": "kermit", "exp": chrono::Utc::now().timestamp() - 3600}),
        KEY,
    );

    let result = validator().validate(&token, &ValidationConstraints::default());
    assert_eq!(result, Err(TokenRejection::Expired));
}

#[test]
fn past_expiry_wins_even_with_a_foreign_key() {
    let token = mint(
        serde_json::json!({"exp": chrono::Utc::now().timestamp() - 3600}),
        "an-entirely-different-key",
    );

    let result = validator().validate(&token, &ValidationConstraints::default());
    assert_eq!(result, Err(TokenRejection::Expired));
}

#[test]
fn issuer_and_audience_are_opt_in() {
    // Default posture ignores issuer and audience entirely.
    let token = mint(
        serde_json::json!({
            "exp": in_an_hour(),
            "iss": "https://whoever.example.com",
            "aud": "https://wherever.example.com",
        }),
        KEY,
    );
    assert!(
        validator()
            .validate(&token, &ValidationConstraints::default())
            .is_ok()
    );

    // Opting in pins them exactly.
    let constraints = ValidationConstraints::default()
        .require_issuer("https://issuer.example.com")
        .require_audience("https://service.example.com");
    assert_eq!(
        validator().validate(&token, &constraints),
        Err(TokenRejection::IssuerMismatch)
    );

    let pinned = mint(
        serde_json::json!({
            "exp": in_an_hour(),
            "iss": "https://issuer.example.com",
            "aud": "https://service.example.com",
        }),
        KEY,
    );
    assert!(validator().validate(&pinned, &constraints).is_ok());
}
