// Colored terminal output for metrics, recommendation lists and neighbors.
//
// main.rs delegates all human-readable formatting here; `--json` output goes
// through `output::print_json` instead.

use colored::Colorize;

use super::{EvaluationReport, NamedScore};
use crate::data::DatasetStats;
use crate::similarity::Mode;

/// Display the four evaluation metrics with the settings that produced them.
pub fn display_evaluation(report: &EvaluationReport) {
    println!(
        "\n{}",
        format!(
            "=== {}-based CF ({}, K={}, N={}) ===",
            capitalize(&report.mode.to_string()),
            report.weighting,
            report.neighbors,
            report.top_n
        )
        .bold()
    );
    println!(
        "  {}",
        format!(
            "fold {}/{} seed {} · {} users evaluated",
            report.fold, report.folds, report.seed, report.users
        )
        .dimmed()
    );
    println!();

    let m = &report.metrics;
    println!("  {:<12} {:>9.4}%", "Recall", m.recall * 100.0);
    println!("  {:<12} {:>9.4}%", "Precision", m.precision * 100.0);
    println!("  {:<12} {:>9.4}%", "Coverage", m.coverage * 100.0);
    println!("  {:<12} {:>10.4}", "Popularity", m.popularity);
}

/// Display a ranked recommendation list for one user.
pub fn display_recommendations(user: &str, list: &[NamedScore]) {
    if list.is_empty() {
        println!("No recommendations for user {user}: no neighbor has unseen items.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Top {} for user {} ===", list.len(), user).bold()
    );
    print_ranked(list, "Item");
}

/// Display the nearest neighbors of a user or item.
pub fn display_neighbors(entity: &str, mode: Mode, neighbors: &[NamedScore]) {
    if neighbors.is_empty() {
        println!("{} {entity} shares no interactions with anyone.", capitalize(&mode.to_string()));
        return;
    }

    println!(
        "\n{}",
        format!("=== {} most similar to {} {} ===", neighbors.len(), mode, entity).bold()
    );
    print_ranked(neighbors, &capitalize(&mode.to_string()));
}

/// Display dataset and split sizes.
pub fn display_stats(stats: &DatasetStats) {
    println!("\n{}", "=== Dataset ===".bold());
    println!("  Users: {}  Items: {}", stats.users, stats.items);
    println!(
        "  Train: {} interactions from {} users (density {:.4}%)",
        stats.train_interactions,
        stats.train_users,
        stats.train_density * 100.0
    );
    println!(
        "  Test:  {} interactions from {} users",
        stats.test_interactions, stats.test_users
    );
}

fn print_ranked(entries: &[NamedScore], label: &str) {
    println!();
    println!(
        "  {:>4}  {:<24} {:>10}",
        "Rank".dimmed(),
        label.dimmed(),
        "Score".dimmed()
    );
    println!("  {}", "-".repeat(42).dimmed());
    for entry in entries {
        println!(
            "  {:>4}. {:<24} {:>10}",
            entry.rank,
            entry.id,
            colorize_score(entry.score)
        );
    }
}

fn colorize_score(score: f64) -> colored::ColoredString {
    let text = format!("{score:.4}");
    if score >= 0.5 {
        text.green().bold()
    } else if score >= 0.1 {
        text.normal()
    } else {
        text.dimmed()
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
