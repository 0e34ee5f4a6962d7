/*
[INPUT]:  Interactive user input via CLI
[OUTPUT]: Generated YAML configuration file
[POS]:    CLI initialization layer
[UPDATE]: When AppConfig schema changes
*/

use anyhow::{Context, Result};
use console::style;
use dialoguer::{Confirm, Input, Password, theme::ColorfulTheme};
use std::path::PathBuf;

use crate::config::{AppConfig, PRIVATE_KEY_ENV, WalletConfig};

pub fn run_init(output: PathBuf) -> Result<()> {
    println!("{}", style("Welcome to Nakarobo CLI Init").bold().cyan());
    println!(
        "{}",
        style("This will guide you through creating a new configuration.").dim()
    );

    let theme = ColorfulTheme::default();
    let defaults = AppConfig::default();

    println!("\n{}", style("--- API ---").bold());
    let api_base_url: String = Input::with_theme(&theme)
        .with_prompt("API base URL")
        .default(defaults.api_base_url.clone())
        .interact_text()?;

    let session_dir: String = Input::with_theme(&theme)
        .with_prompt("Session directory")
        .default(defaults.session_dir.display().to_string())
        .interact_text()?;

    let disconnect_debounce_ms: u64 = Input::with_theme(&theme)
        .with_prompt("Disconnect debounce (ms)")
        .default(defaults.disconnect_debounce_ms)
        .interact_text()?;

    let referral_code: String = Input::with_theme(&theme)
        .with_prompt("Referral code (optional)")
        .allow_empty(true)
        .interact_text()?;

    println!("\n{}", style("--- Wallet ---").bold());
    let store_key = Confirm::with_theme(&theme)
        .with_prompt(format!(
            "Store the private key in the config file? (otherwise set {PRIVATE_KEY_ENV})"
        ))
        .default(false)
        .interact()?;
    let private_key = if store_key {
        let key = Password::with_theme(&theme)
            .with_prompt("Private key (hex)")
            .interact()?;
        Some(key).filter(|key| !key.trim().is_empty())
    } else {
        None
    };

    let config = AppConfig {
        api_base_url,
        disconnect_debounce_ms,
        session_dir: PathBuf::from(session_dir),
        referral_code: Some(referral_code.trim().to_string()).filter(|code| !code.is_empty()),
        wallet: WalletConfig { private_key },
        ..defaults
    };
    config.validate().context("invalid configuration")?;

    let yaml = serde_yaml::to_string(&config).context("failed to serialize config to YAML")?;

    if let Some(parent) = output.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(&output, yaml)
        .with_context(|| format!("failed to write config to {}", output.display()))?;

    println!("\n{}", style("SUCCESS!").bold().green());
    println!(
        "Configuration written to: {}",
        style(output.display()).cyan()
    );

    Ok(())
}
