/*
[INPUT]:  Bearer session and optional chain filters
[OUTPUT]: User profile and chain configuration payloads
[POS]:    HTTP layer - profile/config endpoints
[UPDATE]: When adding new user endpoints or changing query parameters
*/

use reqwest::Method;
use serde_json::Value;

use crate::http::{NakaroboClient, Result};

impl NakaroboClient {
    /// Fetch the signed-in user's profile
    ///
    /// GET /user/profile
    pub async fn get_profile(&self) -> Result<Value> {
        let builder = self.request(Method::GET, "/user/profile")?;
        self.send_value(builder).await
    }

    /// Fetch chain configuration, optionally for one chain or as a list
    ///
    /// GET /config/chain?chainId={chain_id}&list=true
    pub async fn get_chain_config(&self, chain_id: Option<u64>, list: bool) -> Result<Value> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(id) = chain_id {
            params.push(("chainId", id.to_string()));
        }
        if list {
            params.push(("list", "true".to_string()));
        }

        let builder = self.request(Method::GET, "/config/chain")?.query(&params);
        self.send_value(builder).await
    }
}
