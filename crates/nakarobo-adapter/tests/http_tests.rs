/*
[INPUT]:  Mock HTTP responses
[OUTPUT]: Test results for HTTP client
[POS]:    Integration tests - HTTP endpoints
[UPDATE]: When HTTP endpoints change
*/

mod common;

use common::{client_for, mock_jwt_token, setup_mock_server};
use nakarobo_adapter::{
    ClientConfig, FundsRecordType, NakaroboClient, NakaroboError, SessionStore,
};
use serde_json::json;
use tokio_test::assert_ok;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[test]
fn test_client_creation() {
    let _client = assert_ok!(NakaroboClient::new(SessionStore::in_memory()));
}

#[test]
fn test_client_rejects_empty_base_url() {
    let config = ClientConfig {
        base_url: "  ".to_string(),
        ..ClientConfig::default()
    };
    let err = NakaroboClient::with_config(config, SessionStore::in_memory()).unwrap_err();
    assert!(matches!(err, NakaroboError::Config(_)));
}

#[test]
fn test_error_retryable() {
    let timeout_err = NakaroboError::Timeout { duration: 10 };
    assert!(timeout_err.is_retryable());

    let auth_err = NakaroboError::AuthorizationExpired;
    assert!(!auth_err.is_retryable());
    assert!(auth_err.is_auth_error());
}

#[tokio::test]
async fn test_envelope_success_unwraps_data() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/points/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "data": {"totalPoints": "1250.5", "available": 1000, "staked": 250.5, "rewards": null},
            "error": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, SessionStore::in_memory());
    let points = assert_ok!(client.get_my_points().await);
    assert_eq!(points.total_points, 1250.5);
    assert_eq!(points.available, 1000.0);
    assert_eq!(points.rewards, 0.0);
}

#[tokio::test]
async fn test_bearer_token_is_attached() {
    let server = setup_mock_server().await;
    let token = mock_jwt_token();
    Mock::given(method("GET"))
        .and(path("/user/profile"))
        .and(header("authorization", format!("Bearer {token}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "data": {"address": "0xabc"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = SessionStore::in_memory();
    store.set_session(token, "0xabc").unwrap();
    let client = client_for(&server, store);

    let profile = assert_ok!(client.get_profile().await);
    assert_eq!(profile["address"], "0xabc");
}

#[tokio::test]
async fn test_envelope_unauthorized_clears_session() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/node/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 401,
            "data": null,
            "error": "Token expired"
        })))
        .mount(&server)
        .await;

    let store = SessionStore::in_memory();
    store.set_session(mock_jwt_token(), "0xabc").unwrap();
    let client = client_for(&server, store.clone());

    let err = client.get_my_node().await.unwrap_err();
    assert!(matches!(err, NakaroboError::AuthorizationExpired));
    assert!(store.get_session().is_none());
}

#[tokio::test]
async fn test_http_401_clears_session() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/quests"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let store = SessionStore::in_memory();
    store.set_session(mock_jwt_token(), "0xabc").unwrap();
    let client = client_for(&server, store.clone());

    let err = client.get_quest_summary().await.unwrap_err();
    assert!(err.is_auth_error());
    assert!(!store.has_token());
}

#[tokio::test]
async fn test_envelope_error_code() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/quests/check-in"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 1001,
            "data": null,
            "error": "Already checked in today"
        })))
        .mount(&server)
        .await;

    let store = SessionStore::in_memory();
    store.set_session(mock_jwt_token(), "0xabc").unwrap();
    let client = client_for(&server, store.clone());

    let err = client.check_in().await.unwrap_err();
    match err {
        NakaroboError::Api { code, message } => {
            assert_eq!(code, 1001);
            assert_eq!(message, "Already checked in today");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    // Application errors leave the session alone
    assert!(store.has_token());
}

#[tokio::test]
async fn test_non_success_status_uses_body_message() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/referral/me"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"error": "Internal failure"})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, SessionStore::in_memory());
    let err = client.get_my_referral().await.unwrap_err();
    match err {
        NakaroboError::Api { code, message } => {
            assert_eq!(code, 500);
            assert_eq!(message, "Internal failure");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_legacy_response_passes_through() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/stats/network"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "nodes": 42,
            "tvl": "1500000.25"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, SessionStore::in_memory());
    let stats = assert_ok!(client.get_network_stats().await);
    assert_eq!(stats.nodes, 42);
    assert_eq!(stats.tvl, 1_500_000.25);
}

#[tokio::test]
async fn test_network_failure_is_plain_message() {
    let config = ClientConfig {
        base_url: "http://127.0.0.1:1/api".to_string(),
        ..ClientConfig::default()
    };
    let client = assert_ok!(NakaroboClient::with_config(config, SessionStore::in_memory()));

    let err = client.get_network_stats().await.unwrap_err();
    assert!(matches!(err, NakaroboError::Network(_)));
    assert_eq!(err.to_string(), "Network error, please try again");
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_leaderboard_query_and_wrapped_list() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/leaderboard/network"))
        .and(query_param("sort", "deposited"))
        .and(query_param("page", "1"))
        .and(query_param("pageSize", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "data": {"list": [
                {"rank": 1, "user": "0xaaa", "deposited": "5000"},
                {"rank": 2, "user": "0xbbb", "deposited": "4000"}
            ]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, SessionStore::in_memory());
    let entries = assert_ok!(client.get_network_leaderboard("deposited", 1, 10).await);
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].user.as_deref(), Some("0xaaa"));
    assert_eq!(entries[1].extra["deposited"], "4000");
}

#[tokio::test]
async fn test_funds_records_page() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/funds/records"))
        .and(query_param("page", "2"))
        .and(query_param("pageSize", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "data": {
                "items": [
                    {"type": "deposit", "amount": "1500000", "tokenSymbol": "USDC", "tokenDecimals": 6},
                    {"type": "redeem", "amount": "250000"}
                ],
                "total": "22"
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, SessionStore::in_memory());
    let page = assert_ok!(client.get_funds_records(2, 20).await);
    assert_eq!(page.total, 22);
    assert_eq!(page.items[0].kind, Some(FundsRecordType::Deposit));
    assert_eq!(page.items[0].symbol(), "USDC");
    assert_eq!(page.items[1].symbol(), "USDT");
    assert_eq!(page.items[1].decimals(), 6);
}

#[tokio::test]
async fn test_bind_referral() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/referral/bind"))
        .and(body_json(json!({"referralCode": "FRIEND42"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 0, "data": {}})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, SessionStore::in_memory());
    assert_ok!(client.bind_referral(" FRIEND42 ").await);

    let err = client.bind_referral("   ").await.unwrap_err();
    assert!(matches!(err, NakaroboError::Config(_)));
}

#[tokio::test]
async fn test_yappers_connect_and_callback() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/yappers/connect"))
        .and(query_param("redirectUri", "http://localhost:3000/yappers/callback"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "data": {"url": "https://twitter.com/i/oauth2/authorize?x=1", "codeVerifier": "v123"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/yappers/callback"))
        .and(query_param("code", "c1"))
        .and(query_param("codeVerifier", "v123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "data": {"twitterId": "777", "isReplacement": false}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, SessionStore::in_memory());
    let redirect = "http://localhost:3000/yappers/callback";
    let connect = assert_ok!(client.yappers_connect(redirect).await);
    assert!(connect.is_complete());

    let callback = assert_ok!(
        client
            .yappers_callback("c1", &connect.code_verifier, redirect)
            .await
    );
    assert_eq!(callback.twitter_id.as_deref(), Some("777"));
}

#[tokio::test]
async fn test_non_json_success_body_is_invalid_response() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/user/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, SessionStore::in_memory());
    let err = client.get_profile().await.unwrap_err();
    assert!(matches!(err, NakaroboError::InvalidResponse(_)));
    assert!(!err.is_auth_error());
}

#[tokio::test]
async fn test_chain_config_query() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/config/chain"))
        .and(query_param("chainId", "56"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "data": {"chainId": 56, "name": "BNB Smart Chain"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/config/chain"))
        .and(query_param("list", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "data": [{"chainId": 56}, {"chainId": 1}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, SessionStore::in_memory());
    let single = assert_ok!(client.get_chain_config(Some(56), false).await);
    assert_eq!(single["name"], "BNB Smart Chain");

    let list = assert_ok!(client.get_chain_config(None, true).await);
    assert_eq!(list.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_yappers_claimables_and_drafts() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/yappers/claimables"))
        .and(header("authorization", format!("Bearer {}", mock_jwt_token()).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "data": {"amount": "120", "activityId": "7"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/yappers/ai/drafts"))
        .and(body_json(json!({"promptInput": "launch day"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "data": {"drafts": ["gm", "launch day!"]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = SessionStore::in_memory();
    store.set_session(mock_jwt_token(), "0xabc").unwrap();
    let client = client_for(&server, store);

    let claimables = assert_ok!(client.yappers_claimables().await);
    assert_eq!(claimables["amount"], "120");

    let drafts = assert_ok!(client.yappers_drafts("launch day").await);
    assert_eq!(drafts["drafts"][1], "launch day!");
}
