/*
[INPUT]:  AppContext with an authenticated session, pending OAuth state
[OUTPUT]: Referral and Yappers (Twitter link) output
[POS]:    CLI commands - referral program and social link
[UPDATE]: When referral or Yappers endpoints change
*/

use anyhow::{Context, Result, bail};

use crate::cli::context::AppContext;
use crate::cli::render;
use crate::format::{format_percent, format_points};
use crate::state::PendingLink;

const REFERRAL_LABELS: &[(&str, &str)] = &[
    ("code", "Code"),
    ("referralCode", "Code"),
    ("inviter", "Invited by"),
    ("bound", "Bound"),
];

const CLAIMABLE_LABELS: &[(&str, &str)] = &[("amount", "Amount"), ("activityId", "Activity")];

const REFERRAL_STATS_LABELS: &[(&str, &str)] = &[
    ("invited", "Invited"),
    ("totalInvited", "Invited"),
    ("rewards", "Rewards"),
    ("totalRewards", "Rewards"),
];

pub async fn referral(ctx: &AppContext) -> Result<()> {
    ctx.require_session()?;
    let mine = ctx
        .client
        .get_my_referral()
        .await
        .context("load referral")?;
    render::object("Referral", &mine, REFERRAL_LABELS);
    Ok(())
}

pub async fn referral_stats(ctx: &AppContext) -> Result<()> {
    ctx.require_session()?;
    let stats = ctx
        .client
        .get_referral_stats()
        .await
        .context("load referral stats")?;
    render::object("Referral stats", &stats, REFERRAL_STATS_LABELS);
    Ok(())
}

pub async fn bind_referral(ctx: &AppContext, code: &str) -> Result<()> {
    ctx.require_session()?;
    if code.trim().is_empty() {
        bail!("Please enter a referral code");
    }
    ctx.client
        .bind_referral(code.trim())
        .await
        .context("Failed to bind referral code")?;
    render::success("Referral code bound successfully!");
    Ok(())
}

pub async fn skip_referral(ctx: &AppContext) -> Result<()> {
    ctx.require_session()?;
    ctx.client.skip_referral().await.context("Failed to skip")?;
    render::success("Referral step skipped");
    Ok(())
}

pub async fn yappers_status(ctx: &AppContext) -> Result<()> {
    ctx.require_session()?;
    let status = ctx
        .client
        .yappers_status()
        .await
        .context("load yappers status")?;

    render::heading("Yappers");
    if !status.is_bound {
        render::field("Twitter", "not linked");
        render::empty("Run `nakarobo-cli yappers connect` to link your account.");
        return Ok(());
    }
    render::field(
        "Twitter",
        format!(
            "{} (@{})",
            status.twitter_name.as_deref().unwrap_or("Unknown"),
            status.twitter_handle.as_deref().unwrap_or("")
        ),
    );

    let scores = ctx
        .client
        .yappers_scores()
        .await
        .context("load yappers scores")?;
    render::field("Today", format_points(scores.today(), 2));
    render::field("Total", format_points(scores.cumulative_total, 2));

    let claimables = ctx
        .client
        .yappers_claimables()
        .await
        .context("load yappers claimables")?;
    render::object("Claimable", &claimables, CLAIMABLE_LABELS);
    Ok(())
}

/// AI post drafts for `prompt`
pub async fn yappers_drafts(ctx: &AppContext, prompt: &str) -> Result<()> {
    ctx.require_session()?;
    if prompt.trim().is_empty() {
        bail!("Please enter a prompt");
    }
    let drafts = ctx
        .client
        .yappers_drafts(prompt.trim())
        .await
        .context("generate drafts")?;

    render::heading("Drafts");
    let list = drafts
        .get("drafts")
        .or(Some(&drafts))
        .and_then(serde_json::Value::as_array);
    match list {
        Some(list) if !list.is_empty() => {
            for (index, draft) in list.iter().enumerate() {
                let text = draft
                    .as_str()
                    .map(str::to_string)
                    .or_else(|| render::text(draft, "content"))
                    .unwrap_or_else(|| draft.to_string());
                render::field(&format!("#{}", index + 1), text);
            }
        }
        Some(_) => render::empty("  No drafts"),
        None => render::json(&drafts),
    }
    Ok(())
}

/// Start the Twitter link: print the authorize URL and keep the PKCE verifier
pub async fn yappers_connect(ctx: &AppContext) -> Result<()> {
    ctx.require_session()?;
    let redirect_uri = ctx.config.yappers_redirect_uri.clone();
    let connect = ctx
        .client
        .yappers_connect(&redirect_uri)
        .await
        .context("start twitter link")?;
    if !connect.is_complete() {
        bail!("Failed to get authorization URL");
    }

    ctx.storage
        .save_pending_link(&PendingLink::new(connect.code_verifier, redirect_uri))
        .await
        .context("save pending link")?;

    render::heading("Link Twitter");
    println!("  Open this URL to authorize:\n\n  {}\n", connect.url);
    render::empty("Then run `nakarobo-cli yappers callback --code <code>`.");
    Ok(())
}

/// Finish the Twitter link with the `code` from the redirect
pub async fn yappers_callback(ctx: &AppContext, code: &str) -> Result<()> {
    ctx.require_session()?;
    if code.trim().is_empty() {
        bail!("Missing authorization code");
    }
    let Some(link) = ctx
        .storage
        .load_pending_link()
        .await
        .context("load pending link")?
    else {
        bail!("Session expired. Please try connecting again.");
    };

    let linked = ctx
        .client
        .yappers_callback(code.trim(), &link.code_verifier, &link.redirect_uri)
        .await
        .context("Connection Failed")?;
    ctx.storage
        .clear_pending_link()
        .await
        .context("clear pending link")?;

    render::success("Connected Successfully");
    if let Some(id) = &linked.twitter_id {
        render::field("Twitter id", id);
    }
    if let Some(status) = &linked.referral_status {
        render::field("Referral", status);
    }
    if linked.is_replacement {
        render::empty("Replaced the previously linked account.");
    }
    Ok(())
}

pub async fn yappers_disconnect(ctx: &AppContext) -> Result<()> {
    ctx.require_session()?;
    ctx.client
        .yappers_disconnect()
        .await
        .context("unlink twitter")?;
    ctx.storage
        .clear_pending_link()
        .await
        .context("clear pending link")?;
    render::success("Twitter account disconnected");
    Ok(())
}

pub async fn yappers_leaderboard(
    ctx: &AppContext,
    page: u32,
    page_size: u32,
    search: Option<&str>,
) -> Result<()> {
    let entries = ctx
        .client
        .yappers_leaderboard(page, page_size, search)
        .await
        .context("load yappers leaderboard")?;

    render::heading("Yappers leaderboard");
    if entries.is_empty() {
        render::empty("  No entries");
    }
    for entry in &entries {
        let author = entry.author();
        render::field(
            &format!("#{}", entry.rank),
            format!(
                "{} @{}  mindshare {}  today {}  total {}",
                author.display_name(),
                author.display_handle(),
                format_percent(entry.mindshare, 2),
                format_points(entry.daily_score, 2),
                format_points(entry.total(), 2)
            ),
        );
    }
    Ok(())
}
