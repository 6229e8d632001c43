// Colored terminal output for sweep matches, mitigation reports and feeds.
//
// This module handles all terminal-specific formatting. main.rs delegates
// here and keeps only the control flow.

use std::io::BufRead;

use colored::Colorize;

use crate::vendor::mitigation::{MitigationReport, OutcomeStatus};
use crate::vendor::models::{EmailRecord, MitigationAction};

/// Display the emails a sweep found.
pub fn display_matches(records: &[EmailRecord]) {
    if records.is_empty() {
        println!("No matching emails found.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Matches ({} emails) ===", records.len()).bold()
    );
    println!();
    println!(
        "  {:<36} {:<22} {}",
        "Mailbox".dimmed(),
        "Delivered (UTC)".dimmed(),
        "Message ID".dimmed(),
    );
    println!("  {}", "-".repeat(96).dimmed());

    for record in records {
        let delivered = record
            .delivered_at()
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| super::fit_column(&record.delivery_time, 22));
        println!(
            "  {:<36} {:<22} {}",
            super::fit_column(&record.mailbox, 36),
            delivered,
            super::fit_column(&record.message_id, 40).dimmed(),
        );
    }
    println!();
}

/// Display the outcome of a purge or quarantine run.
pub fn display_report(report: &MitigationReport) {
    let accepted = report.accepted();
    let failed: Vec<_> = report.failed().collect();

    println!(
        "\n{}",
        format!("=== {} complete ===", capitalize(&report.action.to_string())).bold()
    );
    println!("  Batches sent: {}", report.batches_sent);
    println!(
        "  {} {} emails {}",
        "ok".green().bold(),
        accepted,
        report.action.past_tense()
    );

    if failed.is_empty() {
        return;
    }

    println!("  {} {} emails failed", "!!".red().bold(), failed.len());
    for outcome in failed {
        if let OutcomeStatus::Failed { reason } = &outcome.status {
            println!(
                "    batch {:>3}  {:<36} {}",
                outcome.batch + 1,
                outcome.record.mailbox,
                super::fit_column(reason, 80).dimmed()
            );
        }
    }
}

/// Print feed URLs, one per line, under a header.
pub fn display_feed_urls(feed: &str, urls: &[String]) {
    println!(
        "\n{}",
        format!("=== {} feed ({} URLs) ===", feed, urls.len()).bold()
    );
    for url in urls {
        println!("{url}");
    }
}

/// Warn before touching mailboxes and ask for a Y/N answer on `input`.
///
/// Anything other than `y`/`yes` is a refusal, including EOF.
pub fn confirm_mitigation<R: BufRead>(
    action: MitigationAction,
    count: usize,
    input: &mut R,
) -> std::io::Result<bool> {
    let stars = "*".repeat(32);
    println!("{}", format!("{stars}WARNING{stars}").yellow().bold());
    println!(
        "You are going to {} email from {} mailboxes.",
        action.to_string().bold(),
        count
    );
    print!("Press Y/N to continue> ");
    std::io::Write::flush(&mut std::io::stdout())?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let confirmed = is_affirmative(&answer);

    if !confirmed {
        println!("{}", format!("{stars}ABORTING{stars}").red().bold());
    }
    Ok(confirmed)
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
