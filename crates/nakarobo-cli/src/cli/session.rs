/*
[INPUT]:  AppContext and shutdown token
[OUTPUT]: Login, logout and session status output
[POS]:    CLI commands - session lifecycle
[UPDATE]: When login/logout flow or status output changes
*/

use anyhow::{Context, Result, bail};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use nakarobo_adapter::{AuthError, Notice};

use crate::cli::context::AppContext;
use crate::cli::render;
use crate::datetime::{business_day, format_date, format_relative_time};
use crate::format::format_address;

pub async fn login(ctx: &AppContext, force: bool, shutdown: CancellationToken) -> Result<()> {
    let wallet = ctx.wallet()?;

    if !force
        && let Some(session) = ctx.store.get_session()
        && session.is_bound_to(wallet.address())
    {
        render::success(&format!(
            "Already signed in as {}",
            format_address(&session.address)
        ));
        return Ok(());
    }

    wallet.connect();
    let auth = ctx.authenticator(wallet.clone());
    let mut notices = auth.subscribe_notices();
    let reconciler_shutdown = shutdown.child_token();
    let reconciler = auth.spawn_reconciler(reconciler_shutdown.clone());

    info!(address = %wallet.address(), "signing in");
    let result = tokio::select! {
        result = auth.login() => result,
        _ = shutdown.cancelled() => {
            reconciler_shutdown.cancel();
            bail!("login interrupted");
        }
    };

    drain_notices(&mut notices);
    reconciler_shutdown.cancel();
    if let Err(err) = reconciler.await {
        debug!(error = %err, "reconciler task ended abnormally");
    }

    match result {
        Ok(()) => {
            render::field("Address", format_address(wallet.address()));
            Ok(())
        }
        // Already shown as a notice
        Err(AuthError::UserRejected) => Ok(()),
        Err(err) => Err(err.into()),
    }
}

pub async fn logout(ctx: &AppContext) -> Result<()> {
    match ctx.wallet() {
        Ok(wallet) => {
            wallet.connect();
            let auth = ctx.authenticator(wallet);
            auth.logout().await?;
        }
        // No wallet configured: only the local session can be dropped
        Err(_) => {
            ctx.store.clear_session()?;
        }
    }
    render::success("Signed out");
    Ok(())
}

/// Print session state after re-reading it from disk
///
/// With `chains`, also lists the chain configuration served by the API.
pub async fn status(ctx: &AppContext, chains: bool) -> Result<()> {
    let wallet = ctx.wallet().ok();
    match &wallet {
        Some(wallet) => {
            ctx.authenticator(wallet.clone()).refresh()?;
        }
        None => ctx.store.reload().context("reload session")?,
    }

    render::heading("Session");
    render::field("API", ctx.client.base_url());
    render::field("Business day", business_day().format("%Y-%m-%d"));

    let wallet_address = wallet.map(|wallet| wallet.address().to_string());
    match &wallet_address {
        Some(address) => render::field("Wallet", format_address(address)),
        None => render::field("Wallet", "not configured"),
    }

    if chains {
        let config = ctx
            .client
            .get_chain_config(None, true)
            .await
            .context("load chain config")?;
        render::heading("Chains");
        match config.as_array() {
            Some(list) if !list.is_empty() => {
                for chain in list {
                    let id = render::text(chain, "chainId").unwrap_or_else(|| "-".to_string());
                    let name = render::text(chain, "name").unwrap_or_default();
                    render::field(&id, name);
                }
            }
            Some(_) => render::empty("  No chains"),
            None => render::json(&config),
        }
    }

    let Some(session) = ctx.store.get_session() else {
        render::field("Status", "signed out");
        return Ok(());
    };

    render::field("Status", "signed in");
    render::field("Bound address", format_address(&session.address));
    render::field(
        "Signed in",
        format!(
            "{} ({})",
            format_date(&session.issued_at, true),
            format_relative_time(session.issued_at)
        ),
    );

    if let Some(address) = wallet_address.as_deref()
        && !session.is_bound_to(address)
    {
        render::empty(
            "Configured wallet differs from the signed-in account. Run `nakarobo-cli login`.",
        );
    }
    Ok(())
}

fn drain_notices(notices: &mut broadcast::Receiver<Notice>) {
    while let Ok(notice) = notices.try_recv() {
        render::notice(&notice);
    }
}
