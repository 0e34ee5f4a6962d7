/*
[INPUT]:  Typed and raw API payloads
[OUTPUT]: Styled terminal output
[POS]:    CLI output helpers shared by all commands
[UPDATE]: When output layout conventions change
*/

use console::style;
use serde_json::Value;

use nakarobo_adapter::{Notice, NoticeLevel};

pub fn heading(title: &str) {
    println!("\n{}", style(title).bold().cyan());
}

pub fn field(label: &str, value: impl std::fmt::Display) {
    println!("  {:<18} {}", style(label).dim(), value);
}

pub fn empty(message: &str) {
    println!("{}", style(message).yellow());
}

pub fn success(message: &str) {
    println!("{}", style(message).green());
}

pub fn notice(notice: &Notice) {
    let styled = match notice.level {
        NoticeLevel::Success => style(notice.message.as_str()).green(),
        NoticeLevel::Info => style(notice.message.as_str()).cyan(),
        NoticeLevel::Warning => style(notice.message.as_str()).yellow(),
        NoticeLevel::Error => style(notice.message.as_str()).red(),
    };
    println!("{styled}");
}

/// Display text for `key` in a raw payload: strings as-is, numbers and bools printed
pub fn text(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Numeric value for `key`, accepting numbers and numeric strings
pub fn number(value: &Value, key: &str) -> Option<f64> {
    match value.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Print the fields of a raw object under `title`, using `labels` for known keys
pub fn object(title: &str, payload: &Value, labels: &[(&str, &str)]) {
    heading(title);
    let Some(map) = payload.as_object() else {
        empty("  No data");
        return;
    };

    let mut printed = false;
    for (key, label) in labels {
        if let Some(text) = text(payload, key) {
            field(label, text);
            printed = true;
        }
    }
    // Anything the labels don't cover, so new backend fields still show up
    for (key, value) in map {
        if labels.iter().any(|(known, _)| known == key) {
            continue;
        }
        match value {
            Value::String(_) | Value::Number(_) | Value::Bool(_) => {
                if let Some(text) = text(payload, key) {
                    field(key, text);
                    printed = true;
                }
            }
            _ => {}
        }
    }
    if !printed {
        empty("  No data");
    }
}

pub fn json(payload: &Value) {
    match serde_json::to_string_pretty(payload) {
        Ok(pretty) => println!("{pretty}"),
        Err(_) => println!("{payload}"),
    }
}
