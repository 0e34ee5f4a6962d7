/*
[INPUT]:  Bearer session, OAuth redirect/code/verifier, pagination parameters
[OUTPUT]: Twitter link state, scores, claimables, leaderboard and AI drafts
[POS]:    HTTP layer - yappers (social engagement) endpoints
[UPDATE]: When adding new yappers endpoints or changing the OAuth flow
*/

use reqwest::Method;
use serde_json::Value;

use crate::http::{NakaroboClient, Result};
use crate::types::{
    DraftsRequest, LeaderboardList, YappersCallback, YappersConnect, YappersLeaderboardEntry,
    YappersScores, YappersStatus,
};

impl NakaroboClient {
    /// Start the Twitter OAuth flow; returns the auth URL and PKCE verifier
    ///
    /// GET /yappers/connect?redirectUri={redirect_uri}
    pub async fn yappers_connect(&self, redirect_uri: &str) -> Result<YappersConnect> {
        let builder = self
            .request(Method::GET, "/yappers/connect")?
            .query(&[("redirectUri", redirect_uri)]);
        self.send_json(builder).await
    }

    /// Complete the OAuth flow
    ///
    /// GET /yappers/callback?code={code}&codeVerifier={code_verifier}&redirectUri={redirect_uri}
    pub async fn yappers_callback(
        &self,
        code: &str,
        code_verifier: &str,
        redirect_uri: &str,
    ) -> Result<YappersCallback> {
        let builder = self.request(Method::GET, "/yappers/callback")?.query(&[
            ("code", code),
            ("codeVerifier", code_verifier),
            ("redirectUri", redirect_uri),
        ]);
        self.send_json(builder).await
    }

    /// GET /yappers/status
    pub async fn yappers_status(&self) -> Result<YappersStatus> {
        let builder = self.request(Method::GET, "/yappers/status")?;
        self.send_json(builder).await
    }

    /// GET /yappers/scores
    pub async fn yappers_scores(&self) -> Result<YappersScores> {
        let builder = self.request(Method::GET, "/yappers/scores")?;
        self.send_json(builder).await
    }

    /// GET /yappers/claimables
    pub async fn yappers_claimables(&self) -> Result<Value> {
        let builder = self.request(Method::GET, "/yappers/claimables")?;
        self.send_value(builder).await
    }

    /// GET /yappers/leaderboard?page={page}&pageSize={page_size}&search={search}
    pub async fn yappers_leaderboard(
        &self,
        page: u32,
        page_size: u32,
        search: Option<&str>,
    ) -> Result<Vec<YappersLeaderboardEntry>> {
        let mut params = vec![
            ("page", page.to_string()),
            ("pageSize", page_size.to_string()),
        ];
        if let Some(term) = search {
            params.push(("search", term.to_string()));
        }

        let builder = self.request(Method::GET, "/yappers/leaderboard")?.query(&params);
        let list: LeaderboardList<YappersLeaderboardEntry> = self.send_json(builder).await?;
        Ok(list.into_inner())
    }

    /// Unlink the Twitter account
    ///
    /// POST /yappers/disconnect
    pub async fn yappers_disconnect(&self) -> Result<Value> {
        let builder = self.request(Method::POST, "/yappers/disconnect")?;
        self.send_value(builder).await
    }

    /// AI-generated post drafts
    ///
    /// POST /yappers/ai/drafts
    pub async fn yappers_drafts(&self, prompt_input: &str) -> Result<Value> {
        let body = DraftsRequest {
            prompt_input: prompt_input.to_string(),
        };
        let builder = self.request(Method::POST, "/yappers/ai/drafts")?.json(&body);
        self.send_value(builder).await
    }
}
