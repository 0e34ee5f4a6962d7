/*
[INPUT]:  Bearer session and pagination parameters
[OUTPUT]: Points summaries and the points leaderboard
[POS]:    HTTP layer - points endpoints
[UPDATE]: When adding new points endpoints or changing query parameters
*/

use reqwest::Method;
use serde_json::Value;

use crate::http::{NakaroboClient, Result};
use crate::types::{MyPoints, Page, PointsLeaderboardEntry};

impl NakaroboClient {
    /// GET /points/summary
    pub async fn get_points_summary(&self) -> Result<Value> {
        let builder = self.request(Method::GET, "/points/summary")?;
        self.send_value(builder).await
    }

    /// GET /points/me
    pub async fn get_my_points(&self) -> Result<MyPoints> {
        let builder = self.request(Method::GET, "/points/me")?;
        self.send_json(builder).await
    }

    /// GET /leaderboard/points?page={page}&pageSize={page_size}
    pub async fn get_points_leaderboard(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<Page<PointsLeaderboardEntry>> {
        let builder = self
            .request(Method::GET, "/leaderboard/points")?
            .query(&[("page", page), ("pageSize", page_size)]);
        self.send_json(builder).await
    }
}
