//! Output formatting utilities.

use serde_json::Value;

/// Formats a value as pretty JSON.
pub fn format_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Formats a verification verdict as a table row.
pub fn format_verdict_row(app_id: &str, out_trade_no: &str, verdict: &str) -> String {
    format!("{:<24} {:<32} {}", truncate(app_id, 24), truncate(out_trade_no, 32), verdict)
}

/// Prints the verdict table header.
#[allow(clippy::print_literal)]
pub fn print_verdict_header() {
    println!("{:<24} {:<32} {}", "APP_ID", "OUT_TRADE_NO", "VERDICT");
    println!("{}", "-".repeat(70));
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
