//! Bearer validation and policy evaluation end to end.
//!
//! Run with:
//!
//! ```sh
//! VOUCH_SIGNING_KEY=demo-signing-key-not-for-production \
//!     cargo run -p vouch-demos --example bearer_policy
//! ```

use anyhow::Context;
use jsonwebtoken::{EncodingKey, Header, encode};
use vouch_auth::{AuthConfig, PolicyRule, ValidationConstraints, token_from_header};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = AuthConfig::from_env()
        .context("set VOUCH_SIGNING_KEY to run this demo")?
        .with_policies(vec![PolicyRule {
            name: "CheeseburgerPolicy".into(),
            claim_type: "icanhazcheeseburger".into(),
            required_value: "true".into(),
        }]);

    let validator = config.validator();
    let policies = config.policy_engine();

    // Stand in for an upstream token issuer sharing the same key.
    let secret = std::env::var(AuthConfig::SIGNING_KEY_ENV)?;
    let token = encode(
        &Header::default(),
        &serde_json::json!({
            "sub": "kermit",
            "icanhazcheeseburger": true,
            "exp": chrono::Utc::now().timestamp() + 300,
        }),
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    let header_value = format!("Bearer {token}");

    let credential = token_from_header(Some(&header_value))?;
    let claims = validator.validate(credential, &ValidationConstraints::default())?;
    println!("validated claims:");
    for claim in claims.iter() {
        println!("  {} = {}", claim.claim_type, claim.value);
    }

    let decision = policies.evaluate("CheeseburgerPolicy", &claims);
    println!("CheeseburgerPolicy  -> {decision:?}");

    // An unregistered policy denies too, but is distinguishable for
    // diagnostics.
    let unknown = policies.evaluate("NoSuchPolicy", &claims);
    println!("NoSuchPolicy        -> {unknown:?} (allowed = {})", unknown.is_allowed());

    Ok(())
}
