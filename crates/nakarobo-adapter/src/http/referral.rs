/*
[INPUT]:  Bearer session and referral codes
[OUTPUT]: Referral info, stats and bind/skip acknowledgements
[POS]:    HTTP layer - referral endpoints (require session)
[UPDATE]: When adding new referral endpoints
*/

use reqwest::Method;
use serde_json::Value;

use crate::http::{NakaroboClient, NakaroboError, Result};
use crate::types::ReferralBindRequest;

impl NakaroboClient {
    /// GET /referral/me
    pub async fn get_my_referral(&self) -> Result<Value> {
        let builder = self.request(Method::GET, "/referral/me")?;
        self.send_value(builder).await
    }

    /// GET /referral/stats
    pub async fn get_referral_stats(&self) -> Result<Value> {
        let builder = self.request(Method::GET, "/referral/stats")?;
        self.send_value(builder).await
    }

    /// Bind an inviter's referral code to the signed-in account
    ///
    /// POST /referral/bind
    pub async fn bind_referral(&self, referral_code: &str) -> Result<Value> {
        let referral_code = referral_code.trim();
        if referral_code.is_empty() {
            return Err(NakaroboError::Config(
                "Please enter a referral code".to_string(),
            ));
        }

        let body = ReferralBindRequest {
            referral_code: referral_code.to_string(),
        };
        let builder = self.request(Method::POST, "/referral/bind")?.json(&body);
        self.send_value(builder).await
    }

    /// POST /referral/skip
    pub async fn skip_referral(&self) -> Result<Value> {
        let builder = self.request(Method::POST, "/referral/skip")?;
        self.send_value(builder).await
    }
}
