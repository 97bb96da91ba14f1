//! Federated login surface: authorization URL, ticket delivery, claim
//! normalization. Runs entirely offline; the provider round trip is
//! simulated.
//!
//! ```sh
//! cargo run -p vouch-demos --example federated_login
//! ```

use std::time::Duration;

use secrecy::SecretString;
use vouch_auth::{CompletedTicket, LoginCoordinator, OidcSettings, ticket_slot};
use vouch_core::ClaimSet;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let settings = OidcSettings::builder()
        .domain("demo-tenant.auth.example.com")
        .client_id("demo-client-id")
        .client_secret(SecretString::from("demo-client-secret"))
        .callback_path("/signin-auth0")
        .scope("name")
        .scope("email")
        .scope("picture")
        .claims_issuer("Auth0")
        .build()?;
    let coordinator = LoginCoordinator::new(settings);

    let url = coordinator.authorize_url("https://app.example.com", "state-1", "nonce-1")?;
    println!("would redirect the browser to:\n  {url}\n");

    // What the provider hands back once the user has signed in.
    let raw = serde_json::json!({
        "sub": "muppet|0042",
        "name": "Kermit",
        "email": "kermit@example.com",
    });
    let claims = coordinator.on_ticket_received(&raw)?;
    println!("normalized claims:");
    for claim in claims.iter() {
        println!("  {} = {}", claim.claim_type, claim.value);
    }

    // Ticket delivery is single-shot and bounded; here the "provider"
    // answers shortly after the wait begins.
    let (slot, wait) = ticket_slot();
    let provider = coordinator.settings().claims_issuer().map(str::to_string);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        let ticket = CompletedTicket {
            claims: ClaimSet::from_pairs([("sub", "muppet|0042")]),
            id_token: "header.payload.signature".into(),
            access_token: None,
            provider,
        };
        let _ = slot.complete(ticket);
    });

    let ticket = wait.wait(Duration::from_secs(2)).await?;
    println!("\nticket delivered: {ticket:?}");

    Ok(())
}
