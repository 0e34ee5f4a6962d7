/*
[INPUT]:  EVM private key and NakaRobo API base URL (environment)
[OUTPUT]: Signed-in session printed to stdout
[POS]:    Examples - wallet login flow demonstration
[UPDATE]: When auth flow changes
*/

use std::sync::Arc;

use nakarobo_adapter::*;
use tokio_util::sync::CancellationToken;

/// Example: Authentication flow
///
/// 1. Create session store and HTTP client
/// 2. Connect a local wallet
/// 3. Start the reconciler (disconnect debounce, account-switch guard)
/// 4. Log in: nonce -> sign -> verify
/// 5. Use the session for an authenticated call
///
/// Run with:
/// NAKAROBO_PRIVATE_KEY=0x... NAKAROBO_API_BASE_URL=http://localhost:3000/api \
///     cargo run --example login_example
#[tokio::main]
async fn main() {
    println!("=== NakaRobo Login Example ===\n");

    let Ok(private_key) = std::env::var("NAKAROBO_PRIVATE_KEY") else {
        eprintln!("Set NAKAROBO_PRIVATE_KEY to a hex-encoded EVM private key");
        return;
    };
    let base_url = std::env::var("NAKAROBO_API_BASE_URL")
        .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());

    // Step 1: Store + client
    let store = SessionStore::in_memory();
    let config = ClientConfig {
        base_url,
        ..ClientConfig::default()
    };
    let client = match NakaroboClient::with_config(config, store) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create client: {}", e);
            return;
        }
    };
    println!("✓ HTTP client created ({})", client.base_url());

    // Step 2: Wallet
    let wallet = match LocalWallet::new(&private_key) {
        Ok(w) => Arc::new(w),
        Err(e) => {
            eprintln!("Failed to load wallet: {}", e);
            return;
        }
    };
    wallet.connect();
    println!("✓ Wallet connected: {}", wallet.address());

    // Step 3: Authenticator + reconciler
    let auth = SessionAuthenticator::new(client.clone(), wallet, AuthConfig::default());
    let shutdown = CancellationToken::new();
    let reconciler = auth.spawn_reconciler(shutdown.clone());
    let mut notices = auth.subscribe_notices();

    // Step 4: Login
    let result = auth.login().await;
    while let Ok(notice) = notices.try_recv() {
        println!("  {}", notice);
    }
    if let Err(e) = result {
        eprintln!("Login failed: {}", e);
        shutdown.cancel();
        let _ = reconciler.await;
        return;
    }
    println!("✓ Signed in, state = {:?}", auth.state());

    // Step 5: Authenticated call
    match client.get_my_points().await {
        Ok(points) => println!("✓ Points: {}", points.total_points),
        Err(e) => eprintln!("Failed to load points: {}", e),
    }

    shutdown.cancel();
    let _ = reconciler.await;
    println!("\n✓ Login example complete");
}
