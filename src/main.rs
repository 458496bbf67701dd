use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

mod config;

use granary::builder::{show_document_topics, show_key_weights, show_topics, FileInput, ModelSource};
use granary::matrix::save::save_sparse_matrix;
use granary::matrix::{LabelIds, SparseDocumentTermMatrix};
use granary::output::terminal;
use granary::table::SortOrder;
use granary::adapters::tool_files::ColumnOrder;

/// Granary: topic-model output normalization.
///
/// Reads external-tool topic model output and shows it as canonical tables;
/// converts document-term matrices between interoperable formats.
#[derive(Parser)]
#[command(name = "granary", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the topics of a fitted model from its topic-keys file
    Topics {
        /// Path to the tool's topic-keys file
        #[arg(long)]
        topic_keys: PathBuf,

        /// Number of top keys to show per topic (default: GRANARY_NUM_KEYS or 10)
        #[arg(long)]
        num_keys: Option<usize>,
    },

    /// Show topic proportions per document from a doc-topics file
    DocTopics {
        /// Path to the tool's topic-keys file (for topic row labels)
        #[arg(long)]
        topic_keys: PathBuf,

        /// Path to the tool's doc-topics file
        #[arg(long)]
        doc_topics: PathBuf,

        /// Keep file order for sparse-layout columns instead of the
        /// compatibility default of sorted document labels
        #[arg(long)]
        file_order: bool,

        /// Number of top keys joined into each topic's row label (default: 3)
        #[arg(long, default_value = "3")]
        num_keys: usize,
    },

    /// Show raw key weights for one topic from a word-weights file
    KeyWeights {
        /// Path to the tool's topic-word-weights file
        #[arg(long)]
        word_weights: PathBuf,

        /// Topic to show
        #[arg(long)]
        topic: usize,

        /// Number of keys to show (default: GRANARY_NUM_KEYS or 10)
        #[arg(long)]
        num_keys: Option<usize>,

        /// Sort by weight before truncating: "asc" or "desc"
        #[arg(long)]
        sort: Option<String>,
    },

    /// Convert a labeled triples CSV into an on-disk sparse matrix
    ExportMatrix {
        /// Input CSV of `document_label,type_label,count` lines
        #[arg(long)]
        input: PathBuf,

        /// Output directory (default: GRANARY_OUT_DIR or .)
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Write coordinate-list (.mm) format instead of triples + label maps
        #[arg(long)]
        matrix_market: bool,
    },
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("granary=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = config::Config::load()?;

    match cli.command {
        Commands::Topics {
            topic_keys,
            num_keys,
        } => {
            let source = ModelSource::ToolFiles(FileInput {
                topic_keys: Some(topic_keys),
                ..FileInput::default()
            });
            let table = show_topics(&source, num_keys.unwrap_or(config.num_keys))?;
            terminal::display_topic_table(&table);
        }

        Commands::DocTopics {
            topic_keys,
            doc_topics,
            file_order,
            num_keys,
        } => {
            let column_order = if file_order {
                ColumnOrder::FileOrder
            } else {
                ColumnOrder::SortedLabels
            };
            let source = ModelSource::ToolFiles(FileInput {
                topic_keys: Some(topic_keys),
                document_topics: Some(doc_topics),
                column_order,
                ..FileInput::default()
            });
            // Row labels are the joined top num_keys keys per topic
            let topics = show_topics(&source, num_keys)?;
            let table = show_document_topics(&source, &topics, &[], num_keys)?;
            terminal::display_document_topic_table(&table);
        }

        Commands::KeyWeights {
            word_weights,
            topic,
            num_keys,
            sort,
        } => {
            let sort = match sort.as_deref() {
                None => None,
                Some("asc") => Some(SortOrder::Ascending),
                Some("desc") => Some(SortOrder::Descending),
                Some(other) => anyhow::bail!("unknown sort order '{other}', use asc or desc"),
            };
            let source = ModelSource::ToolFiles(FileInput {
                word_weights: Some(word_weights),
                ..FileInput::default()
            });
            let weights =
                show_key_weights(&source, topic, num_keys.unwrap_or(config.num_keys), sort)?;
            terminal::display_key_weights(topic, &weights);
        }

        Commands::ExportMatrix {
            input,
            out_dir,
            matrix_market,
        } => {
            let (matrix, document_ids, type_ids) = read_labeled_triples(&input)?;
            let dir = out_dir.unwrap_or(config.out_dir);
            let ids = (!matrix_market).then_some((&document_ids, &type_ids));
            let written = save_sparse_matrix(&matrix, &dir, ids, matrix_market)?;
            for path in written {
                println!("Wrote {}", path.display());
            }
        }
    }

    Ok(())
}

/// Read `document_label,type_label,count` lines, assigning dense identifiers
/// to labels in first-seen order.
fn read_labeled_triples(
    path: &PathBuf,
) -> Result<(SparseDocumentTermMatrix, LabelIds, LabelIds)> {
    info!(path = %path.display(), "Reading labeled triples");
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;

    let mut matrix = SparseDocumentTermMatrix::new();
    let mut document_ids = LabelIds::new();
    let mut type_ids = LabelIds::new();

    for (n, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("failed to read line {}", n + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.trim_end().split(',').collect();
        let &[document_label, type_label, count] = fields.as_slice() else {
            anyhow::bail!("malformed triple on line {}: '{line}'", n + 1);
        };
        let count: u64 = count
            .parse()
            .with_context(|| format!("bad count on line {}: '{count}'", n + 1))?;
        let document_id = document_ids.assign(document_label);
        let type_id = type_ids.assign(type_label);
        matrix.insert(document_id, type_id, count);
    }
    Ok((matrix, document_ids, type_ids))
}
