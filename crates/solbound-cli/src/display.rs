//! Display utilities for the CLI

use colored::*;
use solbound_types::Pubkey;

/// Print a section header
pub fn section(title: &str) {
    println!();
    println!("{}", "━".repeat(60).bright_black());
    println!(" {}", title.bright_white().bold());
    println!("{}", "━".repeat(60).bright_black());
}

pub fn success(message: &str) {
    println!("  {} {}", "✓".bright_green(), message);
}

pub fn warning(message: &str) {
    println!("  {} {}", "⚠".yellow(), message.yellow());
}

/// Print a labeled value
pub fn labeled(label: &str, value: &str) {
    println!("  {}: {}", label.bright_white(), value.bright_cyan());
}

/// Inventory, issued and remaining counts
pub fn issuance_counts(total: usize, issued: usize) {
    let remaining = total.saturating_sub(issued);
    labeled("Inventory", &total.to_string());
    labeled("Issued", &issued.to_string());
    if remaining == 0 && total > 0 {
        println!("  {}: {}", "Remaining".bright_white(), "0".bright_red());
    } else {
        labeled("Remaining", &remaining.to_string());
    }
}

/// One line of the per-item listing; `owner` is set once the item is minted
pub fn issuance_row(name: &str, identity: &Pubkey, owner: Option<&Pubkey>) -> String {
    let marker = match owner {
        Some(_) => "●".bright_green(),
        None => "○".bright_black(),
    };
    let owner = owner.map(|o| o.to_string()).unwrap_or_default();
    format!("  {} {:<24} {}  {}", marker, name, identity, owner.bright_black())
}
