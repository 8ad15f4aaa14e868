//! Report Formatting
//!
//! Terminal and JSON rendering of per-user nuke statistics. The terminal
//! report is a summary row plus a detail table in store order; JSON output is
//! the serialized [`UserStats`] for scripting against.

use crate::models::UserStats;
use colored::Colorize;

const RULE_WIDTH: usize = 100;

pub struct DisplayManager;

impl Default for DisplayManager {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayManager {
    pub fn new() -> Self {
        Self
    }

    pub fn display_user_stats(&self, stats: &UserStats, retention_days: i64, json_output: bool) {
        if json_output {
            match serde_json::to_string_pretty(stats) {
                Ok(json_str) => println!("{}", json_str),
                Err(e) => eprintln!("Error serializing user stats to JSON: {}", e),
            }
            return;
        }

        println!(
            "\nStatistics for user: {} (Last {} Days)",
            stats.username.bright_white().bold(),
            retention_days
        );

        println!("\n{}", "=".repeat(RULE_WIDTH).bright_cyan());
        println!(
            "{}",
            format!(
                "{:<20} | {:<15} | {:<20}",
                "Username", "Total GB", "Nuke Count"
            )
            .bright_white()
            .bold()
        );
        println!("{}", "-".repeat(RULE_WIDTH).bright_cyan());
        println!(
            "{:<20} | {} | {:<20}",
            stats.username,
            format!("{:<15.2} GB", stats.total_gb).bright_green(),
            stats.count
        );

        println!("\n{}", "=".repeat(RULE_WIDTH).bright_cyan());
        println!(
            "{}",
            format!(
                "{:<25} | {:<60} | {:<30} | {:<15} | {:<15}",
                "Timestamp", "Release", "Nuke Reason", "Multiplier", "Total GB"
            )
            .bright_white()
            .bold()
        );
        println!("{}", "-".repeat(RULE_WIDTH).bright_cyan());
        for detail in &stats.details {
            println!(
                "{:<25} | {} | {:<30} | {:<15} | {} GB",
                detail.timestamp,
                format!("{:<60}", detail.release).bright_cyan(),
                detail.nuke_reason,
                detail.multiplier,
                format!("{:<15.2}", detail.total_gb).bright_green()
            );
        }
    }

    pub fn display_no_data(&self, username: &str, json_output: bool) {
        if json_output {
            let output = serde_json::json!({
                "error": format!("No data found for user: {}", username)
            });
            println!("{}", output);
        } else {
            println!("No data found for user: {}.", username);
        }
    }
}
