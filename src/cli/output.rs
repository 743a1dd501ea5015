//! CLI output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use serde::Serialize;

use crate::config::AccountConfig;

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print a warning message
pub fn warn(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// Account row safe to print: no hash, no password
#[derive(Debug, Serialize)]
pub struct AccountSummary {
    pub id: u64,
    pub username: String,
    pub credential: String,
}

impl From<&AccountConfig> for AccountSummary {
    fn from(account: &AccountConfig) -> Self {
        Self {
            id: account.id,
            username: account.username.clone(),
            credential: account.credential_kind().to_string(),
        }
    }
}

/// Print a table of configured accounts
pub fn print_account_table(accounts: &[AccountSummary]) {
    if accounts.is_empty() {
        warn("No accounts configured");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").fg(Color::Cyan),
            Cell::new("Username").fg(Color::Cyan),
            Cell::new("Credential").fg(Color::Cyan),
        ]);

    for account in accounts {
        let credential_color = match account.credential.as_str() {
            "bcrypt hash" => Color::Green,
            "missing" => Color::Red,
            _ => Color::Yellow,
        };

        table.add_row(vec![
            Cell::new(account.id),
            Cell::new(&account.username),
            Cell::new(&account.credential).fg(credential_color),
        ]);
    }

    println!("{table}");
}
