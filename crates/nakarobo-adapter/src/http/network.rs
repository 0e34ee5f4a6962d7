/*
[INPUT]:  Sort key and pagination parameters
[OUTPUT]: Network-wide statistics and node leaderboard
[POS]:    HTTP layer - public network endpoints
[UPDATE]: When adding new network endpoints or changing query parameters
*/

use reqwest::Method;

use crate::http::{NakaroboClient, Result};
use crate::types::{LeaderboardList, NetworkLeaderboardEntry, NetworkStats};

pub const DEFAULT_NETWORK_SORT: &str = "deposited";

impl NakaroboClient {
    /// GET /stats/network
    pub async fn get_network_stats(&self) -> Result<NetworkStats> {
        let builder = self.request(Method::GET, "/stats/network")?;
        self.send_json(builder).await
    }

    /// GET /leaderboard/network?sort={sort}&page={page}&pageSize={page_size}
    pub async fn get_network_leaderboard(
        &self,
        sort: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<NetworkLeaderboardEntry>> {
        let builder = self.request(Method::GET, "/leaderboard/network")?.query(&[
            ("sort", sort.to_string()),
            ("page", page.to_string()),
            ("pageSize", page_size.to_string()),
        ]);
        let list: LeaderboardList<NetworkLeaderboardEntry> = self.send_json(builder).await?;
        Ok(list.into_inner())
    }
}
