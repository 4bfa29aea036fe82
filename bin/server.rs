// Wallet API Suite - Fake Wallet Server
// Serves the in-memory wallet service for local suite runs

use anyhow::{Context, Result};
use axum::Router;
use std::env;
use tracing_subscriber::EnvFilter;
use wallet_api_suite::fake_service::{router, FakeWalletOptions};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("🧪 Wallet API Suite - Fake Wallet Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let mut options = FakeWalletOptions::default();
    if let Ok(username) = env::var("WALLET_TEST_USERNAME") {
        options.username = username;
    }
    if let Ok(password) = env::var("WALLET_TEST_PASSWORD") {
        options.password = password;
    }
    if let Ok(raw) = env::var("FAKE_WALLET_PENDING_POLLS") {
        options.pending_polls = raw
            .parse()
            .with_context(|| format!("FAKE_WALLET_PENDING_POLLS must be a number, got '{}'", raw))?;
    }
    let addr = env::var("FAKE_WALLET_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    println!("✓ Login: {}", options.username);
    println!("✓ Pending polls before settlement: {}", options.pending_polls);

    let app = Router::new().nest("/api", router(options));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    println!("\n🚀 Server running on http://{}/api", addr);
    println!("   Run the suite with: WALLET_API_BASE_URL=http://localhost:3000/api wallet-suite");
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app).await.context("Server failed")?;
    Ok(())
}
