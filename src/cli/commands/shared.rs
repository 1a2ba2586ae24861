//! Shared components for CLI commands
//!
//! Banner/summary printing and the progress bar used while working through a
//! directory's files.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

/// Print a command banner in the monitor's house style.
pub fn print_banner(title: &str) {
    let rule = "=".repeat(title.len() + 4);
    println!("{}", rule.cyan());
    println!("{}", format!("= {} =", title).cyan().bold());
    println!("{}", rule.cyan());
}

/// Progress bar over the files of one directory.
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb.set_message(message.to_string());
    pb
}

/// Render a labeled count line for command summaries.
pub fn summary_line(label: &str, value: impl std::fmt::Display) {
    println!("  {:<22} {}", format!("{}:", label), value.to_string().green());
}
