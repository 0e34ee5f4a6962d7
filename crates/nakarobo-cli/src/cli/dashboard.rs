/*
[INPUT]:  AppContext with an authenticated session
[OUTPUT]: Node, funds, points and network views
[POS]:    CLI commands - read-only dashboard
[UPDATE]: When dashboard endpoints or their layout change
*/

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde_json::Value;

use nakarobo_adapter::FundsRecordType;

use crate::cli::context::AppContext;
use crate::cli::render;
use crate::datetime::{format_date, parse_timestamp};
use crate::format::{
    format_address, format_large_number, format_points, format_token_amount, format_usd,
};
use crate::validation::{validate_amount, validate_node_name};

const NODE_LABELS: &[(&str, &str)] = &[
    ("name", "Name"),
    ("level", "Level"),
    ("status", "Status"),
    ("avatar", "Avatar"),
];

const ASSET_LABELS: &[(&str, &str)] = &[
    ("deposited", "Deposited"),
    ("staked", "Staked"),
    ("redeemable", "Redeemable"),
    ("pendingRedeem", "Pending redeem"),
];

pub async fn node(ctx: &AppContext) -> Result<()> {
    ctx.require_session()?;
    let node = ctx.client.get_my_node().await.context("load node")?;
    let assets = ctx
        .client
        .get_asset_summary()
        .await
        .context("load asset summary")?;

    render::object("Node", &node, NODE_LABELS);
    render::object("Assets", &assets, ASSET_LABELS);
    Ok(())
}

/// Validate node form input locally without sending anything
pub fn node_check(name: Option<&str>, amount: Option<&str>, min: Decimal) -> Result<()> {
    if let Some(name) = name {
        validate_node_name(name)?;
        render::field("Name", format!("{name} (ok)"));
    }
    if let Some(amount) = amount {
        let value = validate_amount(amount, min, None)?;
        render::field("Amount", format!("{value} (ok)"));
    }
    Ok(())
}

pub async fn avatar(ctx: &AppContext, refresh: bool) -> Result<()> {
    ctx.require_session()?;
    let avatar = if refresh {
        ctx.client.refresh_avatar().await.context("refresh avatar")?
    } else {
        ctx.client
            .get_random_avatar()
            .await
            .context("load random avatar")?
    };
    render::object("Avatar", &avatar, &[("url", "URL"), ("avatar", "Avatar")]);
    Ok(())
}

pub async fn funds(ctx: &AppContext, page: u32, page_size: u32) -> Result<()> {
    ctx.require_session()?;
    let records = ctx
        .client
        .get_funds_records(page, page_size)
        .await
        .context("load funds records")?;

    render::heading(&format!("Funds (page {page}, {} total)", records.total));
    if records.items.is_empty() {
        render::empty("  No records");
        return Ok(());
    }
    for record in &records.items {
        let kind = match record.kind {
            Some(FundsRecordType::Deposit) => "Deposit",
            Some(FundsRecordType::Redeem) => "Redeem",
            Some(FundsRecordType::Waive) => "Waive",
            Some(FundsRecordType::Other) | None => "Other",
        };
        let when = record
            .extra
            .get("createdAt")
            .and_then(parse_timestamp)
            .map(|at| format_date(&at, true))
            .unwrap_or_else(|| "-".to_string());
        render::field(
            kind,
            format!(
                "{} {}  {when}",
                format_token_amount(&record.amount, record.decimals(), 2),
                record.symbol()
            ),
        );
    }
    Ok(())
}

pub async fn points(ctx: &AppContext, leaderboard: bool, page: u32, page_size: u32) -> Result<()> {
    ctx.require_session()?;
    let mine = ctx.client.get_my_points().await.context("load points")?;
    render::heading("Points");
    render::field("Total", format_points(mine.total_points, 2));
    render::field("Available", format_points(mine.available, 2));
    render::field("Staked", format_points(mine.staked, 2));
    render::field("Rewards", format_points(mine.rewards, 2));

    let summary = ctx
        .client
        .get_points_summary()
        .await
        .context("load points summary")?;
    render::object("Summary", &summary, &[]);

    if leaderboard {
        let board = ctx
            .client
            .get_points_leaderboard(page, page_size)
            .await
            .context("load points leaderboard")?;
        render::heading(&format!("Points leaderboard ({} total)", board.total));
        if board.items.is_empty() {
            render::empty("  No entries");
        }
        for entry in &board.items {
            render::field(
                &format!("#{}", entry.rank),
                format!(
                    "{}  week {}  total {}",
                    format_address(&entry.user),
                    format_points(entry.week_points, 2),
                    format_points(entry.total_points, 2)
                ),
            );
        }
    }
    Ok(())
}

pub async fn network(ctx: &AppContext, sort: &str, page: u32, page_size: u32) -> Result<()> {
    let stats = ctx
        .client
        .get_network_stats()
        .await
        .context("load network stats")?;
    render::heading("Network");
    render::field("Nodes", format_large_number(stats.nodes as f64));
    render::field("TVL", format_usd(stats.tvl));

    let board = ctx
        .client
        .get_network_leaderboard(sort, page, page_size)
        .await
        .context("load network leaderboard")?;
    render::heading(&format!("Leaderboard by {sort}"));
    if board.is_empty() {
        render::empty("  No entries");
    }
    for entry in &board {
        let user = entry.user.as_deref().map(format_address).unwrap_or_default();
        let metric = entry
            .extra
            .get(sort)
            .and_then(|value| match value {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.parse().ok(),
                _ => None,
            })
            .map(format_large_number)
            .unwrap_or_else(|| "-".to_string());
        render::field(&format!("#{}", entry.rank), format!("{user}  {metric}"));
    }
    Ok(())
}
