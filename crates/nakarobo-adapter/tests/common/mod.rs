/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for nakarobo-adapter tests

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use nakarobo_adapter::{
    AuthConfig, ClientConfig, MockWallet, NakaroboClient, SessionAuthenticator, SessionStore,
};
use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Checksummed address as a browser wallet would report it
pub const TEST_ADDRESS: &str = "0xAbC0000000000000000000000000000000000001";
pub const OTHER_ADDRESS: &str = "0xDeF0000000000000000000000000000000000002";
pub const TEST_SIGNATURE: &str = "0xmock_signature";

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Mock JWT token for testing
pub fn mock_jwt_token() -> String {
    "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.test.signature".to_string()
}

pub fn lowercase(address: &str) -> String {
    address.to_ascii_lowercase()
}

/// Client pointed at the mock server
pub fn client_for(server: &MockServer, store: SessionStore) -> NakaroboClient {
    let config = ClientConfig {
        base_url: server.uri(),
        timeout: Duration::from_secs(5),
        ..ClientConfig::default()
    };
    NakaroboClient::with_config(config, store).unwrap()
}

/// Client that never talks to the network
pub fn offline_client(store: SessionStore) -> NakaroboClient {
    NakaroboClient::new(store).unwrap()
}

pub fn authenticator(client: NakaroboClient, wallet: &MockWallet) -> SessionAuthenticator {
    authenticator_with(client, wallet, AuthConfig::default())
}

pub fn authenticator_with(
    client: NakaroboClient,
    wallet: &MockWallet,
    config: AuthConfig,
) -> SessionAuthenticator {
    SessionAuthenticator::new(client, Arc::new(wallet.clone()), config)
}

/// Mount `POST /auth/nonce`, expecting exactly `calls` requests
pub async fn mount_nonce(server: &MockServer, body: Value, calls: u64) {
    Mock::given(method("POST"))
        .and(path("/auth/nonce"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(calls)
        .mount(server)
        .await;
}

/// Mount `POST /auth/verify`, expecting exactly `calls` requests
pub async fn mount_verify(server: &MockServer, body: Value, calls: u64) {
    Mock::given(method("POST"))
        .and(path("/auth/verify"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(calls)
        .mount(server)
        .await;
}
