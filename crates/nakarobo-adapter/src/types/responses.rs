/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust response structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::models::{QuestCampaign, QuestOverview, flexible};

/// Paginated list (`{items, total}`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default)]
    pub items: Vec<T>,
    #[serde(default, deserialize_with = "flexible::count")]
    pub total: u64,
}

/// Leaderboard payload tolerated as a bare array or wrapped in `list`, `items` or `data`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LeaderboardList<T>(pub Vec<T>);

impl<T> LeaderboardList<T> {
    pub fn into_inner(self) -> Vec<T> {
        self.0
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for LeaderboardList<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw<T> {
            Bare(Vec<T>),
            List { list: Vec<T> },
            Items { items: Vec<T> },
            Data { data: Vec<T> },
            Other(Value),
        }

        let entries = match Option::<Raw<T>>::deserialize(deserializer)? {
            Some(Raw::Bare(entries))
            | Some(Raw::List { list: entries })
            | Some(Raw::Items { items: entries })
            | Some(Raw::Data { data: entries }) => entries,
            Some(Raw::Other(_)) | None => Vec::new(),
        };
        Ok(LeaderboardList(entries))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestSummary {
    pub summary: Option<QuestOverview>,
    pub campaigns: Vec<QuestCampaign>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckInResult {
    pub message: Option<String>,
    #[serde(deserialize_with = "flexible::optional_number")]
    pub points_earned: Option<f64>,
    pub streak: Option<u32>,
}

impl CheckInResult {
    /// Message shown to the user after a check-in
    pub fn notice(&self) -> String {
        match &self.message {
            Some(message) if !message.is_empty() => message.clone(),
            _ => format!(
                "Checked in successfully! +{} Points",
                self.points_earned.unwrap_or(0.0)
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimProof {
    #[serde(deserialize_with = "flexible::optional_string")]
    pub amount: Option<String>,
    #[serde(flatten)]
    pub proof: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct YappersConnect {
    pub url: String,
    pub code_verifier: String,
}

impl YappersConnect {
    pub fn is_complete(&self) -> bool {
        !self.url.is_empty() && !self.code_verifier.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct YappersCallback {
    pub twitter_id: Option<String>,
    pub connected_at: Option<String>,
    pub referral_status: Option<String>,
    pub is_replacement: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct YappersStatus {
    pub is_bound: bool,
    pub twitter_handle: Option<String>,
    pub twitter_name: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DailyScore {
    #[serde(deserialize_with = "flexible::number")]
    pub daily_total: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct YappersScores {
    #[serde(deserialize_with = "flexible::number")]
    pub cumulative_total: f64,
    pub daily: Vec<DailyScore>,
}

impl YappersScores {
    /// Most recent daily total (the backend lists newest first)
    pub fn today(&self) -> f64 {
        self.daily.first().map(|day| day.daily_total).unwrap_or(0.0)
    }
}
