/*
[INPUT]:  User-entered node names, amounts, addresses and emails
[OUTPUT]: Validated values or a human-readable rejection
[POS]:    Input validation layer
[UPDATE]: When input rules change
*/

use std::str::FromStr;

use anyhow::{Result, anyhow, bail};
use rust_decimal::Decimal;

const NODE_NAME_MIN_CHARS: usize = 2;
const NODE_NAME_MAX_CHARS: usize = 20;

pub fn validate_node_name(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("Name is required");
    }
    let len = name.chars().count();
    if !(NODE_NAME_MIN_CHARS..=NODE_NAME_MAX_CHARS).contains(&len) {
        bail!("Name must be between 2 and 20 characters");
    }
    if name.trim() != name {
        bail!("Name cannot have leading or trailing spaces");
    }
    if name.chars().any(is_emoji) {
        bail!("Name cannot contain emojis");
    }
    Ok(())
}

fn is_emoji(c: char) -> bool {
    matches!(
        c as u32,
        0x1F600..=0x1F64F   // emoticons
            | 0x1F300..=0x1F5FF // symbols & pictographs
            | 0x1F680..=0x1F6FF // transport & map
            | 0x2600..=0x26FF   // misc symbols
            | 0x2700..=0x27BF // dingbats
    )
}

/// Parse an amount and check it against `[min, max]`
pub fn validate_amount(amount: &str, min: Decimal, max: Option<Decimal>) -> Result<Decimal> {
    let amount = amount.trim();
    if amount.is_empty() || amount == "0" {
        bail!("Amount is required");
    }
    let value = Decimal::from_str(amount).map_err(|_| anyhow!("Invalid amount"))?;
    if value < min {
        bail!("Amount must be at least {min}");
    }
    if let Some(max) = max.filter(|max| value > *max) {
        bail!("Amount cannot exceed {max}");
    }
    Ok(value)
}

/// `0x` followed by exactly 40 hex digits
pub fn validate_address(address: &str) -> bool {
    address
        .strip_prefix("0x")
        .is_some_and(|hex| hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

/// `local@domain.tld` with no whitespace and a single `@`
pub fn validate_email(email: &str) -> bool {
    if email.is_empty() || email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    // At least one dot with something on both sides
    domain
        .rsplit_once('.')
        .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}
