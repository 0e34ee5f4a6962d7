/*
[INPUT]:  Bearer session and pagination parameters
[OUTPUT]: Node info, asset summary, avatars and funds history
[POS]:    HTTP layer - node endpoints (require session)
[UPDATE]: When adding new node endpoints or changing query parameters
*/

use reqwest::Method;
use serde_json::Value;

use crate::http::{NakaroboClient, Result};
use crate::types::{FundsRecord, Page};

pub const DEFAULT_PAGE_SIZE: u32 = 20;

impl NakaroboClient {
    /// Node identity (avatar, name, id, creation time)
    ///
    /// GET /node/me
    pub async fn get_my_node(&self) -> Result<Value> {
        let builder = self.request(Method::GET, "/node/me")?;
        self.send_value(builder).await
    }

    /// Minted base rewards, current bonus and redeemable amounts
    ///
    /// GET /node/me/asset-summary
    pub async fn get_asset_summary(&self) -> Result<Value> {
        let builder = self.request(Method::GET, "/node/me/asset-summary")?;
        self.send_value(builder).await
    }

    /// GET /node/avatar/random
    pub async fn get_random_avatar(&self) -> Result<Value> {
        let builder = self.request(Method::GET, "/node/avatar/random")?;
        self.send_value(builder).await
    }

    /// POST /node/avatar/refresh
    pub async fn refresh_avatar(&self) -> Result<Value> {
        let builder = self.request(Method::POST, "/node/avatar/refresh")?;
        self.send_value(builder).await
    }

    /// Deposit, redeem and waive history
    ///
    /// GET /funds/records?page={page}&pageSize={page_size}
    pub async fn get_funds_records(&self, page: u32, page_size: u32) -> Result<Page<FundsRecord>> {
        let builder = self
            .request(Method::GET, "/funds/records")?
            .query(&[("page", page), ("pageSize", page_size)]);
        self.send_json(builder).await
    }
}
