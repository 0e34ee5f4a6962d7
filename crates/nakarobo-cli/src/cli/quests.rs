/*
[INPUT]:  AppContext with an authenticated session
[OUTPUT]: Quest summary, check-in, claim proof and leaderboard output
[POS]:    CLI commands - daily quests
[UPDATE]: When quest endpoints or rollover rules change
*/

use anyhow::{Context, Result};
use chrono::Utc;

use nakarobo_adapter::QuestStatus;

use crate::cli::context::AppContext;
use crate::cli::render;
use crate::datetime::{business_day, countdown, next_rollover_at};
use crate::format::{format_percent, format_points};

pub const DEFAULT_ACTIVITY_ID: &str = "1";

pub async fn summary(ctx: &AppContext) -> Result<()> {
    ctx.require_session()?;
    let quests = ctx
        .client
        .get_quest_summary()
        .await
        .context("load quests")?;

    render::heading("Quests");
    render::field("Business day", business_day().format("%Y-%m-%d"));
    render::field("Next rollover", countdown(next_rollover_at(Utc::now())));

    let overview = quests.summary.unwrap_or_default();
    render::field(
        "Checked in",
        if overview.today_checked_in { "yes" } else { "no" },
    );
    render::field("Streak", format!("{} days", overview.streak_days));
    render::field("Pending claim", format_points(overview.pending_claim, 2));
    render::field("Claimed", format_points(overview.claimed, 2));

    if quests.campaigns.is_empty() {
        render::empty("  No campaigns");
        return Ok(());
    }
    render::heading("Campaigns");
    for campaign in &quests.campaigns {
        let progress = campaign.progress();
        let status = match campaign.status {
            QuestStatus::Active => "active",
            QuestStatus::Completed => "completed",
            QuestStatus::Locked => "locked",
            QuestStatus::Other => "-",
        };
        render::field(
            &campaign.title,
            format!(
                "{}/{} tasks ({})  reward {}  {status}",
                progress.completed,
                progress.total,
                format_percent(f64::from(progress.percent), 0),
                format_points(campaign.reward, 2)
            ),
        );
    }
    Ok(())
}

pub async fn check_in(ctx: &AppContext) -> Result<()> {
    ctx.require_session()?;
    let result = ctx.client.check_in().await.context("check in")?;
    render::success(&result.notice());
    if let Some(streak) = result.streak {
        render::field("Streak", format!("{streak} days"));
    }
    Ok(())
}

pub async fn claim_proof(ctx: &AppContext, activity_id: &str) -> Result<()> {
    ctx.require_session()?;
    let proof = ctx
        .client
        .get_claim_proof(activity_id)
        .await
        .context("load claim proof")?;

    render::heading(&format!("Claim proof (activity {activity_id})"));
    match proof.amount.as_deref() {
        Some(amount) => render::success(&format!(
            "Proof fetched. Pending on-chain claim. Reward: {amount}"
        )),
        None => render::empty("  Nothing to claim"),
    }
    if !proof.proof.is_empty() {
        render::json(&serde_json::Value::Object(proof.proof));
    }
    Ok(())
}

pub async fn leaderboard(
    ctx: &AppContext,
    page: u32,
    page_size: u32,
    search: Option<&str>,
) -> Result<()> {
    let entries = ctx
        .client
        .get_quest_leaderboard(page, page_size, search)
        .await
        .context("load quest leaderboard")?;

    render::heading("Quest leaderboard");
    if entries.is_empty() {
        render::empty("  No entries");
    }
    for (index, entry) in entries.iter().enumerate() {
        let rank = render::text(entry, "rank").unwrap_or_else(|| (index + 1).to_string());
        let user = render::text(entry, "user")
            .or_else(|| render::text(entry, "address"))
            .unwrap_or_default();
        let points = render::number(entry, "points")
            .map(|points| format_points(points, 2))
            .unwrap_or_else(|| "-".to_string());
        render::field(&format!("#{rank}"), format!("{user}  {points}"));
    }
    Ok(())
}
