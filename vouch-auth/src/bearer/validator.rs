//! Bearer-credential validator.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{Algorithm, Validation, decode};
use vouch_core::{ClaimSet, well_known};

use super::{SigningKeySource, TokenRejection, ValidationConstraints};

/// Maximum accepted credential size in bytes.
///
/// Anything larger is rejected before any base64 or cryptographic work, so
/// an oversized token costs one length check. Real-world bearer tokens run
/// a few hundred bytes; 8KB leaves generous headroom.
pub const MAX_TOKEN_SIZE_BYTES: usize = 8192;

/// Extract the credential from an `Authorization` header value.
///
/// The bearer header is the sole transport for credentials into the
/// validator; an absent header, a non-bearer scheme, or an empty token all
/// count as [`TokenRejection::MalformedCredential`].
pub fn token_from_header(header: Option<&str>) -> Result<&str, TokenRejection> {
    let token = header
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .ok_or(TokenRejection::MalformedCredential)?;
    if token.is_empty() {
        return Err(TokenRejection::MalformedCredential);
    }
    Ok(token)
}

/// Validates bearer credentials against the process-wide signing key.
///
/// Pure over its inputs: no interior mutability, no IO, no suspension
/// points. A single validator may be shared freely across request handlers.
#[derive(Debug, Clone)]
pub struct BearerValidator {
    key: SigningKeySource,
}

impl BearerValidator {
    /// Create a validator over the given signing key.
    pub fn new(key: SigningKeySource) -> Self {
        Self { key }
    }

    /// Validate a credential and return its decoded claim set.
    ///
    /// Expiry is checked first and wins over every other failure: a
    /// credential whose expiry is at or before the current time is
    /// [`TokenRejection::Expired`] even if its signature would not verify.
    /// A credential with no expiry field while expiry checking is on is
    /// malformed, not non-expiring.
    ///
    /// # Errors
    ///
    /// One of the [`TokenRejection`] variants; see the taxonomy there.
    pub fn validate(
        &self,
        credential: &str,
        constraints: &ValidationConstraints,
    ) -> Result<ClaimSet, TokenRejection> {
        self.validate_at(credential, constraints, chrono::Utc::now().timestamp())
    }

    /// Deterministic validation against an explicit `now` timestamp.
    ///
    /// Prefer [`validate`](Self::validate) in production code; this variant
    /// exists so expiry boundaries can be tested without wall-clock
    /// dependence.
    fn validate_at(
        &self,
        credential: &str,
        constraints: &ValidationConstraints,
        now: i64,
    ) -> Result<ClaimSet, TokenRejection> {
        if credential.len() > MAX_TOKEN_SIZE_BYTES {
            tracing::debug!(
                size = credential.len(),
                max = MAX_TOKEN_SIZE_BYTES,
                "credential rejected: exceeds size cap"
            );
            return Err(TokenRejection::MalformedCredential);
        }

        let payload = decode_payload(credential)?;

        if constraints.check_expiry {
            let exp = payload
                .get(well_known::EXPIRY)
                .and_then(serde_json::Value::as_i64)
                .ok_or_else(|| {
                    tracing::debug!("credential rejected: expiry claim missing or non-numeric");
                    TokenRejection::MalformedCredential
                })?;
            if now >= exp {
                tracing::debug!(exp, now, "credential rejected: expired");
                return Err(TokenRejection::Expired);
            }
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry was handled above with exact at-or-after semantics; the
        // library's leeway-based check must not run a second time.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims::<&str>(&[]);

        if constraints.check_issuer {
            match &constraints.expected_issuer {
                Some(issuer) => validation.set_issuer(&[issuer]),
                // Checking against an unset expectation fails closed.
                None => return Err(TokenRejection::IssuerMismatch),
            }
        }
        if constraints.check_audience {
            match &constraints.expected_audience {
                Some(audience) => {
                    validation.validate_aud = true;
                    validation.set_audience(&[audience]);
                }
                None => return Err(TokenRejection::AudienceMismatch),
            }
        }

        let data = decode::<serde_json::Map<String, serde_json::Value>>(
            credential,
            &self.key.decoding_key(),
            &validation,
        )
        .map_err(|err| {
            tracing::debug!(error = %err, "credential rejected");
            TokenRejection::from(err)
        })?;

        Ok(ClaimSet::from_json_object(&data.claims))
    }
}

/// Decode the payload segment without verifying the signature.
///
/// Used only for the expiry pre-check; the claims handed to callers come
/// from the verified decode above.
fn decode_payload(
    credential: &str,
) -> Result<serde_json::Map<String, serde_json::Value>, TokenRejection> {
    let mut segments = credential.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (segments.next(), segments.next(), segments.next(), segments.next())
    else {
        return Err(TokenRejection::MalformedCredential);
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| TokenRejection::MalformedCredential)?;
    match serde_json::from_slice(&bytes) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        _ => Err(TokenRejection::MalformedCredential),
    }
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{EncodingKey, Header, encode};
    use secrecy::SecretString;

    use super::*;

    const KEY: &str = "unit-test-signing-key-material";
    const NOW: i64 = 1_700_000_000;

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

    #[test]
    fn test_valid_credential_yields_claims() {
        let token = mint(
            serde_json::json!({"sub": "kermit", "exp": NOW + 600, "role": "admin"}),
            KEY,
        );

        let claims = validator()
            .validate_at(&token, &ValidationConstraints::default(), NOW)
            .expect("credential accepted");

        assert!(claims.has("sub", "kermit"));
        assert!(claims.has("role", "admin"));
    }

    #[test]
    fn test_wrong_key_is_bad_signature() {
        let token = mint(serde_json::json!({"exp": NOW + 600}), "a-different-key");

        let result = validator().validate_at(&token, &ValidationConstraints::default(), NOW);
        assert_eq!(result, Err(TokenRejection::BadSignature));
    }

    #[test]
    fn test_expiry_at_now_is_expired() {
        // "at or after" boundary: exp == now is already expired
        let token = mint(serde_json::json!({"exp": NOW}), KEY);
        let result = validator().validate_at(&token, &ValidationConstraints::default(), NOW);
        assert_eq!(result, Err(TokenRejection::Expired));

        let token = mint(serde_json::json!({"exp": NOW + 1}), KEY);
        assert!(
            validator()
                .validate_at(&token, &ValidationConstraints::default(), NOW)
                .is_ok()
        );
    }

    #[test]
    fn test_expired_wins_over_bad_signature() {
        let token = mint(serde_json::json!({"exp": NOW - 60}), "a-different-key");

        let result = validator().validate_at(&token, &ValidationConstraints::default(), NOW);
        assert_eq!(result, Err(TokenRejection::Expired));
    }

    #[test]
    fn test_missing_expiry_is_malformed_not_eternal() {
        let token = mint(serde_json::json!({"sub": "kermit"}), KEY);

        let result = validator().validate_at(&token, &ValidationConstraints::default(), NOW);
        assert_eq!(result, Err(TokenRejection::MalformedCredential));

        // With expiry checking off the same credential is fine.
        let constraints = ValidationConstraints::default().without_expiry_check();
        assert!(validator().validate_at(&token, &constraints, NOW).is_ok());
    }

    #[test]
    fn test_issuer_mismatch() {
        let token = mint(
            serde_json::json!({"exp": NOW + 600, "iss": "https://other.example.com"}),
            KEY,
        );
        let constraints =
            ValidationConstraints::default().require_issuer("https://fake.issuer.example.com");

        let result = validator().validate_at(&token, &constraints, NOW);
        assert_eq!(result, Err(TokenRejection::IssuerMismatch));
    }

    #[test]
    fn test_issuer_exact_match_is_case_sensitive() {
        let token = mint(
            serde_json::json!({"exp": NOW + 600, "iss": "https://Issuer.example.com"}),
            KEY,
        );
        let constraints =
            ValidationConstraints::default().require_issuer("https://issuer.example.com");

        let result = validator().validate_at(&token, &constraints, NOW);
        assert_eq!(result, Err(TokenRejection::IssuerMismatch));
    }

    #[test]
    fn test_audience_mismatch() {
        let token = mint(
            serde_json::json!({"exp": NOW + 600, "aud": "https://other.example.com"}),
            KEY,
        );
        let constraints =
            ValidationConstraints::default().require_audience("https://service.example.com");

        let result = validator().validate_at(&token, &constraints, NOW);
        assert_eq!(result, Err(TokenRejection::AudienceMismatch));
    }

    #[test]
    fn test_missing_issuer_fails_when_checked() {
        let token = mint(serde_json::json!({"exp": NOW + 600}), KEY);
        let constraints =
            ValidationConstraints::default().require_issuer("https://issuer.example.com");

        let result = validator().validate_at(&token, &constraints, NOW);
        assert_eq!(result, Err(TokenRejection::IssuerMismatch));
    }

    #[test]
    fn test_check_flag_without_expectation_fails_closed() {
        let token = mint(serde_json::json!({"exp": NOW + 600}), KEY);

        let constraints = ValidationConstraints {
            check_issuer: true,
            ..ValidationConstraints::default()
        };
        assert_eq!(
            validator().validate_at(&token, &constraints, NOW),
            Err(TokenRejection::IssuerMismatch)
        );

        let constraints = ValidationConstraints {
            check_audience: true,
            ..ValidationConstraints::default()
        };
        assert_eq!(
            validator().validate_at(&token, &constraints, NOW),
            Err(TokenRejection::AudienceMismatch)
        );
    }

    #[test]
    fn test_not_a_jwt_is_malformed() {
        for garbage in ["", "not-a-jwt", "a.b", "a.b.c.d", "!!!.###.$$$"] {
            assert_eq!(
                validator().validate_at(garbage, &ValidationConstraints::default(), NOW),
                Err(TokenRejection::MalformedCredential),
                "expected malformed for {garbage:?}"
            );
        }
    }

    #[test]
    fn test_oversized_credential_is_malformed() {
        let oversized = "a".repeat(MAX_TOKEN_SIZE_BYTES + 1);
        assert_eq!(
            validator().validate_at(&oversized, &ValidationConstraints::default(), NOW),
            Err(TokenRejection::MalformedCredential)
        );
    }

    #[test]
    fn test_token_from_header() {
        assert_eq!(token_from_header(Some("Bearer abc.def.ghi")), Ok("abc.def.ghi"));
        assert_eq!(
            token_from_header(None),
            Err(TokenRejection::MalformedCredential)
        );
        assert_eq!(
            token_from_header(Some("Basic dXNlcjpwYXNz")),
            Err(TokenRejection::MalformedCredential)
        );
        assert_eq!(
            token_from_header(Some("Bearer ")),
            Err(TokenRejection::MalformedCredential)
        );
    }
}
