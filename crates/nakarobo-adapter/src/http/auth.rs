/*
[INPUT]:  Wallet address, signature and optional referral code
[OUTPUT]: Raw nonce and verification payloads
[POS]:    HTTP layer - challenge/verify endpoints used by the authenticator
[UPDATE]: When auth endpoints or request bodies change
*/

use reqwest::Method;
use serde_json::Value;

use crate::http::{NakaroboClient, Result};
use crate::types::{NonceRequest, VerifyRequest};

impl NakaroboClient {
    /// Request a one-time challenge for `address`
    ///
    /// POST /auth/nonce
    ///
    /// The payload is returned raw; `Challenge::from_response` decides which
    /// shape it has.
    pub async fn request_nonce(&self, address: &str) -> Result<Value> {
        let body = NonceRequest {
            address: address.to_string(),
        };
        let builder = self.request(Method::POST, "/auth/nonce")?.json(&body);
        self.send_value(builder).await
    }

    /// Submit a signed challenge for verification
    ///
    /// POST /auth/verify
    pub async fn verify_signature(&self, request: &VerifyRequest) -> Result<Value> {
        let builder = self.request(Method::POST, "/auth/verify")?.json(request);
        self.send_value(builder).await
    }
}
