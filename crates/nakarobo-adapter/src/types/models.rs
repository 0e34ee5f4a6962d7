/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust model structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::enums::{FundsRecordType, QuestStatus};

/// Deserializers for numeric fields the backend sends either as JSON numbers or strings
pub(crate) mod flexible {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        optional_number(deserializer).map(|value| value.unwrap_or(0.0))
    }

    pub fn optional_number<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<f64>, D::Error> {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n
                .as_f64()
                .map(Some)
                .ok_or_else(|| D::Error::custom("number out of range")),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => s.trim().parse().map(Some).map_err(D::Error::custom),
            Some(other) => Err(D::Error::custom(format!("expected number, got {other}"))),
        }
    }

    pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let value = optional_number(deserializer)?.unwrap_or(0.0);
        if value < 0.0 {
            return Err(D::Error::custom("count must not be negative"));
        }
        Ok(value as u64)
    }

    pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        optional_string(deserializer).map(Option::unwrap_or_default)
    }

    pub fn optional_string<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(other) => Err(D::Error::custom(format!("expected string, got {other}"))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MyPoints {
    #[serde(deserialize_with = "flexible::number")]
    pub total_points: f64,
    #[serde(deserialize_with = "flexible::number")]
    pub available: f64,
    #[serde(deserialize_with = "flexible::number")]
    pub staked: f64,
    #[serde(deserialize_with = "flexible::number")]
    pub rewards: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PointsLeaderboardEntry {
    pub rank: u32,
    #[serde(deserialize_with = "flexible::string")]
    pub user: String,
    #[serde(deserialize_with = "flexible::number")]
    pub week_points: f64,
    #[serde(deserialize_with = "flexible::number")]
    pub total_points: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkStats {
    #[serde(deserialize_with = "flexible::count")]
    pub nodes: u64,
    #[serde(deserialize_with = "flexible::number")]
    pub tvl: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkLeaderboardEntry {
    pub rank: u32,
    pub user: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundsRecord {
    #[serde(rename = "type", default)]
    pub kind: Option<FundsRecordType>,
    /// Raw integer amount in the token's smallest unit
    #[serde(default, deserialize_with = "flexible::string")]
    pub amount: String,
    #[serde(default)]
    pub token_symbol: Option<String>,
    #[serde(default)]
    pub token_decimals: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FundsRecord {
    pub fn symbol(&self) -> &str {
        self.token_symbol.as_deref().unwrap_or("USDT")
    }

    pub fn decimals(&self) -> u32 {
        self.token_decimals.unwrap_or(6)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuestOverview {
    pub today_checked_in: bool,
    pub streak_days: u32,
    #[serde(deserialize_with = "flexible::number")]
    pub pending_claim: f64,
    #[serde(deserialize_with = "flexible::number")]
    pub claimed: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestTask {
    pub title: Option<String>,
    pub status: QuestStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestCampaign {
    pub title: String,
    pub description: String,
    pub status: QuestStatus,
    #[serde(deserialize_with = "flexible::number")]
    pub reward: f64,
    pub tasks: Vec<QuestTask>,
}

/// Completion of a campaign's task list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CampaignProgress {
    pub completed: usize,
    pub total: usize,
    pub percent: u32,
}

impl QuestCampaign {
    pub fn progress(&self) -> CampaignProgress {
        let total = self.tasks.len();
        let completed = self
            .tasks
            .iter()
            .filter(|task| task.status == QuestStatus::Completed)
            .count();
        let percent = if total > 0 {
            ((completed as f64 / total as f64) * 100.0).round() as u32
        } else {
            0
        };
        CampaignProgress {
            completed,
            total,
            percent,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct YapperUser {
    pub name: Option<String>,
    pub twitter_name: Option<String>,
    pub handle: Option<String>,
    pub twitter_handle: Option<String>,
    pub username: Option<String>,
    pub avatar_url: Option<String>,
    pub profile_image_url: Option<String>,
}

impl YapperUser {
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.twitter_name.as_deref())
            .unwrap_or("Unknown")
    }

    pub fn display_handle(&self) -> &str {
        self.handle
            .as_deref()
            .or(self.twitter_handle.as_deref())
            .or(self.username.as_deref())
            .unwrap_or("")
    }
}

/// Yappers leaderboard row; user fields may be nested under `user` or inline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct YappersLeaderboardEntry {
    pub rank: u32,
    pub user: Option<YapperUser>,
    #[serde(deserialize_with = "flexible::number")]
    pub mindshare: f64,
    #[serde(deserialize_with = "flexible::number")]
    pub daily_score: f64,
    #[serde(deserialize_with = "flexible::optional_number")]
    pub total_score: Option<f64>,
    #[serde(deserialize_with = "flexible::optional_number")]
    pub score: Option<f64>,
    #[serde(flatten)]
    pub inline_user: YapperUser,
}

impl YappersLeaderboardEntry {
    pub fn author(&self) -> &YapperUser {
        self.user.as_ref().unwrap_or(&self.inline_user)
    }

    pub fn total(&self) -> f64 {
        self.total_score.or(self.score).unwrap_or(0.0)
    }
}
