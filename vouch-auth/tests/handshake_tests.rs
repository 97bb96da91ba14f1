//! Coordinator configuration surface and ticket delivery, without a live
//! provider.

use std::time::Duration;

use secrecy::SecretString;
use vouch_auth::{
    CompletedTicket, HandshakeError, LoginCoordinator, OidcSettings, ticket_slot,
};
use vouch_core::{ClaimSet, well_known};

fn settings() -> OidcSettings {
    OidcSettings::builder()
        .domain("tenant.auth.example.com")
        .client_id("client-123")
        .client_secret(SecretString::from("client-secret"))
        .callback_path("/signin-auth0")
        .scope("name")
        .scope("email")
        .scope("picture")
        .claims_issuer("Auth0")
        .build()
        .expect("settings build")
}

fn ticket(claims: ClaimSet) -> CompletedTicket {
    CompletedTicket {
        claims,
        id_token: "header.payload.signature".to_string(),
        access_token: Some("opaque-access-token".to_string()),
        provider: Some("Auth0".to_string()),
    }
}

#[test]
fn endpoints_compose_from_the_authority() {
    let coordinator = LoginCoordinator::new(settings());

    let endpoints = coordinator.endpoints();
    assert_eq!(
        endpoints.authorization,
        "https://tenant.auth.example.com/authorize"
    );
    assert_eq!(endpoints.token, "https://tenant.auth.example.com/oauth/token");
    assert_eq!(
        endpoints.jwks,
        "https://tenant.auth.example.com/.well-known/jwks.json"
    );
}

#[test]
fn authorize_url_carries_the_code_flow_parameters() {
    let coordinator = LoginCoordinator::new(settings());

    let url = coordinator
        .authorize_url("https://app.example.com", "state-1", "nonce-1")
        .expect("authorization url builds");
    let parsed = reqwest::Url::parse(&url).expect("valid url");
    let pairs: Vec<(String, String)> = parsed
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let get = |key: &str| {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    };

    assert_eq!(get("response_type"), Some("code"));
    assert_eq!(get("client_id"), Some("client-123"));
    assert_eq!(
        get("redirect_uri"),
        Some("https://app.example.com/signin-auth0")
    );
    assert_eq!(get("scope"), Some("openid name email picture"));
    assert_eq!(get("state"), Some("state-1"));
    assert_eq!(get("nonce"), Some("nonce-1"));
}

#[test]
fn ticket_reception_normalizes_provider_claims() {
    let coordinator = LoginCoordinator::new(settings());
    let raw = serde_json::json!({"sub": "user-42", "name": "Kermit"});

    let claims = coordinator
        .on_ticket_received(&raw)
        .expect("claims parsed");

    assert!(claims.has(well_known::RAW_NAME, "Kermit"));
    assert!(claims.has(well_known::DISPLAY_NAME, "Kermit"));
    assert!(claims.has("sub", "user-42"));
}

#[test]
fn unparseable_ticket_fails_the_handshake() {
    let coordinator = LoginCoordinator::new(settings());

    for raw in [
        serde_json::json!("just a string"),
        serde_json::json!(["an", "array"]),
        serde_json::json!(42),
    ] {
        assert!(matches!(
            coordinator.on_ticket_received(&raw),
            Err(HandshakeError::HandshakeFailed(_))
        ));
    }
}

#[test]
fn completed_ticket_debug_redacts_tokens() {
    let ticket = ticket(ClaimSet::from_pairs([("sub", "user-42")]));

    let debug_str = format!("{ticket:?}");
    assert!(!debug_str.contains("header.payload.signature"));
    assert!(!debug_str.contains("opaque-access-token"));
    assert!(debug_str.contains("REDACTED"));
}

#[tokio::test]
async fn completed_ticket_is_delivered_once() {
    let (slot, wait) = ticket_slot();
    let claims = ClaimSet::from_pairs([(well_known::DISPLAY_NAME, "Kermit")]);

    slot.complete(ticket(claims)).expect("receiver alive");

    let received = wait.wait(Duration::from_secs(1)).await.expect("ticket arrives");
    assert!(received.claims.has(well_known::DISPLAY_NAME, "Kermit"));
    assert_eq!(received.provider.as_deref(), Some("Auth0"));
}

#[tokio::test(start_paused = true)]
async fn unanswered_handshake_times_out() {
    let (slot, wait) = ticket_slot();
    // Keep the slot alive so the wait can only end by timeout.
    let _slot = slot;

    let result = wait.wait(Duration::from_secs(30)).await;
    assert_eq!(result.unwrap_err(), HandshakeError::TimedOut);
}

#[tokio::test]
async fn abandoned_login_is_cancelled() {
    let (slot, wait) = ticket_slot();
    drop(slot);

    let result = wait.wait(Duration::from_secs(1)).await;
    assert_eq!(result.unwrap_err(), HandshakeError::Cancelled);
}

#[tokio::test]
async fn completing_after_the_caller_gave_up_reports_cancellation() {
    let (slot, wait) = ticket_slot();
    drop(wait);

    let result = slot.complete(ticket(ClaimSet::new()));
    assert_eq!(result.unwrap_err(), HandshakeError::Cancelled);
}
