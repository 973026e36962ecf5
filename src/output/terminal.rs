// Colored terminal output for ranked posts and keyword reports.
//
// This module handles all terminal-specific formatting: colors and tables.
// The main.rs command handlers delegate here.

use colored::Colorize;

use super::{format_optional, single_line, truncate_chars};
use crate::analysis::{KeywordReport, KeywordResult};
use crate::dataset::models::{Dataset, RejectedRecord};
use crate::narration::narrator::PersonaPost;

/// Display the most engaging posts.
pub fn display_ranked_posts(dataset: &Dataset, n: usize) {
    if dataset.is_empty() {
        println!("No posts loaded.");
        return;
    }

    let top = dataset.top(n);
    println!(
        "\n{}",
        format!("=== Top Posts ({} of {}) ===", top.len(), dataset.len()).bold()
    );
    println!();
    println!(
        "  {:>4}  {:>10}  {:>8}  {:>10}  {}",
        "Rank".dimmed(),
        "Engagement".dimmed(),
        "Favs".dimmed(),
        "Views".dimmed(),
        "Text".dimmed(),
    );
    println!("  {}", "-".repeat(90).dimmed());

    for (i, post) in top.iter().enumerate() {
        let engagement = match post.engagement {
            Some(e) => format!("{e:>10.4}").normal(),
            None => format!("{:>10}", "n/a").dimmed(),
        };
        println!(
            "  {:>4}. {}  {:>8}  {:>10}  {}",
            i + 1,
            engagement,
            post.favorite_count,
            post.view_count,
            truncate_chars(&single_line(&post.text), 60),
        );
    }

    let missing = dataset.missing_engagement();
    if missing > 0 {
        println!(
            "\n  {} {} posts have zero views (engagement undefined)",
            "~".yellow(),
            missing
        );
    }
}

/// Display a keyword report as a table, with significant rows highlighted.
pub fn display_keyword_report(report: &KeywordReport, alpha: f64) {
    if report.results.is_empty() {
        println!("No keywords to analyze.");
        return;
    }

    println!(
        "\n{}",
        format!(
            "=== Keyword Engagement ({} keywords, {} tested) ===",
            report.results.len(),
            report.tested
        )
        .bold()
    );
    println!(
        "{}",
        format!(
            "  Posts with engagement: {}  |  zero views: {}  |  FDR alpha: {}",
            report.posts_with_engagement, report.posts_missing_engagement, alpha
        )
        .dimmed()
    );
    println!();
    println!(
        "  {:<20} {:>10} {:>10} {:>6} {:>6} {:>9} {:>9}",
        "Keyword".dimmed(),
        "With".dimmed(),
        "Without".dimmed(),
        "n+".dimmed(),
        "n-".dimmed(),
        "p".dimmed(),
        "p (BH)".dimmed(),
    );
    println!("  {}", "-".repeat(78).dimmed());

    for result in &report.results {
        println!(
            "  {:<20} {:>10} {:>10} {:>6} {:>6} {:>9} {}",
            truncate_chars(&result.keyword, 20),
            format_optional(result.engagement_true, 4),
            format_optional(result.engagement_false, 4),
            result.count_true,
            result.count_false,
            format_optional(result.raw_pvalue, 4),
            colorize_pvalue(result, alpha),
        );
        if let Some(error) = &result.error {
            println!("    {} {}", error.kind.as_str().red(), error.message.dimmed());
        }
    }

    println!();
    let significant = report.significant(alpha);
    if significant.is_empty() {
        println!("  No keyword is significant at FDR {alpha}.");
    }
    for result in significant {
        let direction = match result.lift() {
            Some(l) if l > 0.0 => "higher".green(),
            Some(_) => "lower".red(),
            None => "different".normal(),
        };
        println!(
            "  {} \"{}\" posts get {} engagement",
            "*".bold(),
            result.keyword,
            direction
        );
    }
}

/// Display records dropped while loading.
pub fn display_rejected(rejected: &[RejectedRecord]) {
    if rejected.is_empty() {
        return;
    }
    println!(
        "\n  {} {} records skipped:",
        "!".bright_red(),
        rejected.len()
    );
    for record in rejected.iter().take(10) {
        println!("    {}", record.error.message.dimmed());
    }
    if rejected.len() > 10 {
        println!("    {}", format!("... and {} more", rejected.len() - 10).dimmed());
    }
}

/// Display a generated persona post.
pub fn display_persona_post(post: &PersonaPost) {
    println!();
    println!("  {}", format!("@{}", post.screen_name).bright_blue().bold());
    for line in post.text.lines() {
        println!("  {line}");
    }
    println!();
}

/// Colorize a corrected p-value by significance.
fn colorize_pvalue(result: &KeywordResult, alpha: f64) -> colored::ColoredString {
    let text = format!("{:>9}", format_optional(result.corrected_pvalue, 4));
    match result.corrected_pvalue {
        Some(_) if result.is_significant(alpha) => text.green().bold(),
        Some(_) => text.normal(),
        None => text.dimmed(),
    }
}
