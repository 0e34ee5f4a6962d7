/*
[INPUT]:  Bearer session, activity id and pagination parameters
[OUTPUT]: Quest summary, check-in results, claim proofs, quest leaderboard
[POS]:    HTTP layer - quest endpoints (require session)
[UPDATE]: When adding new quest endpoints or changing query parameters
*/

use reqwest::Method;
use serde_json::Value;

use crate::http::{NakaroboClient, Result};
use crate::types::{CheckInResult, ClaimProof, LeaderboardList, QuestSummary};

pub const DEFAULT_ACTIVITY_ID: &str = "1";

impl NakaroboClient {
    /// Check-in status, streak and campaign list
    ///
    /// GET /quests
    pub async fn get_quest_summary(&self) -> Result<QuestSummary> {
        let builder = self.request(Method::GET, "/quests")?;
        self.send_json(builder).await
    }

    /// Daily check-in
    ///
    /// POST /quests/check-in
    pub async fn check_in(&self) -> Result<CheckInResult> {
        let builder = self.request(Method::POST, "/quests/check-in")?;
        self.send_json(builder).await
    }

    /// Proof for claiming quest rewards on-chain
    ///
    /// GET /quests/claim-proof?activityId={activity_id}
    pub async fn get_claim_proof(&self, activity_id: &str) -> Result<ClaimProof> {
        let builder = self
            .request(Method::GET, "/quests/claim-proof")?
            .query(&[("activityId", activity_id)]);
        self.send_json(builder).await
    }

    /// GET /quests/leaderboard?page={page}&pageSize={page_size}&search={search}
    pub async fn get_quest_leaderboard(
        &self,
        page: u32,
        page_size: u32,
        search: Option<&str>,
    ) -> Result<Vec<Value>> {
        let mut params = vec![
            ("page", page.to_string()),
            ("pageSize", page_size.to_string()),
        ];
        if let Some(term) = search {
            params.push(("search", term.to_string()));
        }

        let builder = self.request(Method::GET, "/quests/leaderboard")?.query(&params);
        let list: LeaderboardList<Value> = self.send_json(builder).await?;
        Ok(list.into_inner())
    }
}
