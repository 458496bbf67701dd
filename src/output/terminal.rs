// Colored terminal output for canonical tables.
//
// This module handles all terminal-specific formatting: colors, column
// alignment, headers. The main.rs display paths delegate here.

use colored::Colorize;

use crate::output::truncate_chars;
use crate::table::{DocumentTopicTable, KeyWeights, TopicTable};

/// Display a topic table, one row per topic with its ranked keys.
pub fn display_topic_table(table: &TopicTable) {
    println!(
        "\n{}",
        format!(
            "=== Topics ({} topics, {} keys each) ===",
            table.num_topics(),
            table.num_keys()
        )
        .bold()
    );
    println!();

    for (label, keys) in table.row_labels().iter().zip(&table.topics) {
        println!("  {:<10} {}", label.bold(), keys.join(" ").dimmed());
    }
    println!();
}

/// Display a document-topic table: topics as rows, documents as columns.
pub fn display_document_topic_table(table: &DocumentTopicTable) {
    println!(
        "\n{}",
        format!(
            "=== Document topics ({} topics x {} documents) ===",
            table.num_topics(),
            table.num_documents()
        )
        .bold()
    );
    println!();

    // Header
    let header: Vec<String> = table
        .document_labels
        .iter()
        .map(|label| format!("{:>12}", truncate_chars(label, 9)))
        .collect();
    println!("  {:<32} {}", "", header.join(" ").dimmed());
    println!("  {}", "-".repeat(34 + 13 * header.len()).dimmed());

    for (label, row) in table.topic_labels.iter().zip(&table.proportions) {
        let cells: Vec<String> = row.iter().map(|share| format!("{share:>12.4}")).collect();
        println!(
            "  {:<32} {}",
            truncate_chars(label, 29).bold(),
            cells.join(" ")
        );
    }
    println!();
}

/// Display key weights for one topic as a simple aligned list.
pub fn display_key_weights(topic: usize, weights: &KeyWeights) {
    println!(
        "\n{}",
        format!("=== Key weights for topic {topic} ===").bold()
    );
    println!();

    for (key, weight) in &weights.pairs {
        println!("  {:<24} {:>12.6}", key, weight);
    }
    if weights.is_empty() {
        println!("  {}", "(no keys for this topic)".dimmed());
    }
    println!();
}
