// Adapter for external-tool output files.
//
// The external topic-modeling tool is assumed to have already run; this
// adapter only parses what it left behind:
//
//   topic keys file     topic_id \t alpha \t space-joined keys
//   doc-topics file     either one weight column per topic ("easy" layout)
//                       or a '#'-commented sparse layout of
//                       topic/share pairs
//   word weights file   topic_id \t key \t weight
//
// The sparse doc-topics layout historically reorders documents into sorted
// label order, unlike every other adapter. That quirk is load-bearing for
// existing consumers, so it stays the default, behind an explicit
// [`ColumnOrder`] flag.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{bail, Context, Result};
use indexmap::IndexMap;
use tracing::info;

use crate::chunks::chunked;
use crate::table::{DocumentTopicTable, KeyWeights, TopicTable};

/// Column ordering for the sparse doc-topics layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColumnOrder {
    /// Documents sorted by label — the tool's historical behavior and the
    /// order existing downstream consumers expect.
    #[default]
    SortedLabels,
    /// Documents in file order, matching the easy layout and the in-memory
    /// adapters.
    FileOrder,
}

/// A parsed topic-keys file: the canonical table plus each topic's alpha
/// parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicKeys {
    pub table: TopicTable,
    pub alphas: Vec<f64>,
}

/// Read a topic-keys file from disk.
pub fn read_topic_keys(path: &Path) -> Result<TopicKeys> {
    info!(path = %path.display(), "Reading topic keys file");
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    parse_topic_keys(BufReader::new(file))
}

/// Parse topic-keys lines: `topic_id \t alpha \t space-joined keys`.
///
/// Every topic must list the same number of keys; a mismatch is an explicit
/// error rather than a silent truncation.
pub fn parse_topic_keys<R: BufRead>(reader: R) -> Result<TopicKeys> {
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut alphas = Vec::new();

    for (n, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read line {}", n + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = line.splitn(3, '\t');
        let (Some(_topic_id), Some(alpha), Some(keys)) =
            (fields.next(), fields.next(), fields.next())
        else {
            bail!("malformed topic-keys line {}: '{line}'", n + 1);
        };
        let alpha: f64 = alpha
            .trim()
            .parse()
            .with_context(|| format!("bad alpha on line {}: '{alpha}'", n + 1))?;
        let keys: Vec<String> = keys
            .trim_end()
            .split(' ')
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect();
        if let Some(first) = rows.first() {
            if keys.len() != first.len() {
                bail!(
                    "topic on line {} has {} keys, expected {} as in the first topic",
                    n + 1,
                    keys.len(),
                    first.len()
                );
            }
        }
        alphas.push(alpha);
        rows.push(keys);
    }

    if rows.is_empty() {
        bail!("topic-keys file contains no topics");
    }
    Ok(TopicKeys {
        table: TopicTable::new(rows),
        alphas,
    })
}

/// Read a doc-topics file from disk. The layout is auto-detected from the
/// first non-blank line.
pub fn read_document_topics(
    path: &Path,
    topic_labels: &[String],
    order: ColumnOrder,
) -> Result<DocumentTopicTable> {
    info!(path = %path.display(), "Reading document topics file");
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    parse_document_topics(BufReader::new(file), topic_labels, order)
}

/// Parse a doc-topics file in either layout.
///
/// A first non-blank line starting with `#` selects the sparse layout;
/// anything else selects the easy layout. `topic_labels` fixes both the
/// topic count and the row labels of the result.
pub fn parse_document_topics<R: BufRead>(
    reader: R,
    topic_labels: &[String],
    order: ColumnOrder,
) -> Result<DocumentTopicTable> {
    let lines: Vec<String> = reader
        .lines()
        .collect::<std::io::Result<_>>()
        .context("failed to read document topics")?;
    let first = lines.iter().find(|l| !l.trim().is_empty());
    match first {
        None => bail!("document topics file is empty"),
        Some(l) if l.trim_start().starts_with('#') => {
            parse_sparse_layout(&lines, topic_labels, order)
        }
        Some(_) => parse_easy_layout(&lines, topic_labels),
    }
}

/// Easy layout: `doc_index \t path \t w0 .. w{T-1}`, weights in fixed topic
/// order, documents in file order.
fn parse_easy_layout(lines: &[String], topic_labels: &[String]) -> Result<DocumentTopicTable> {
    let num_topics = topic_labels.len();
    let mut document_labels = Vec::new();
    let mut columns: Vec<Vec<f64>> = Vec::new();

    for (n, line) in lines.iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.trim_end().split('\t').collect();
        if fields.len() != num_topics + 2 {
            bail!(
                "doc-topics line {} has {} weight columns, expected {}",
                n + 1,
                fields.len().saturating_sub(2),
                num_topics
            );
        }
        document_labels.push(document_label(fields[1]));
        let weights = fields[2..]
            .iter()
            .map(|w| {
                w.parse::<f64>()
                    .with_context(|| format!("bad weight on line {}: '{w}'", n + 1))
            })
            .collect::<Result<Vec<f64>>>()?;
        columns.push(weights);
    }

    // columns[d][t] -> proportions[t][d]
    let proportions = (0..num_topics)
        .map(|t| columns.iter().map(|col| col[t]).collect())
        .collect();
    Ok(DocumentTopicTable {
        topic_labels: topic_labels.to_vec(),
        document_labels,
        proportions,
    })
}

/// Sparse layout: a `#` comment line, then `doc_index \t path \t topic_a \t
/// share_a \t ...` with only nonzero topics listed.
fn parse_sparse_layout(
    lines: &[String],
    topic_labels: &[String],
    order: ColumnOrder,
) -> Result<DocumentTopicTable> {
    let num_topics = topic_labels.len();
    let mut triples: Vec<(String, usize, f64)> = Vec::new();
    // Map preserves first-seen order; key set doubles as the label universe
    let mut seen_labels: IndexMap<String, ()> = IndexMap::new();

    for (n, line) in lines.iter().enumerate() {
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.trim_end().split('\t').collect();
        if fields.len() < 2 {
            bail!("malformed doc-topics line {}: '{line}'", n + 1);
        }
        let label = document_label(fields[1]);
        seen_labels.entry(label.clone()).or_insert(());

        for pair in chunked(fields[2..].iter().copied(), 2, "") {
            let (topic, share) = (pair[0], pair[1]);
            if share.is_empty() {
                bail!(
                    "doc-topics line {} has an odd number of topic/share fields",
                    n + 1
                );
            }
            let topic: usize = topic
                .parse()
                .with_context(|| format!("bad topic id on line {}: '{topic}'", n + 1))?;
            if topic >= num_topics {
                bail!(
                    "doc-topics line {} references topic {} but only {} topic labels were given",
                    n + 1,
                    topic,
                    num_topics
                );
            }
            let share: f64 = share
                .parse()
                .with_context(|| format!("bad share on line {}: '{share}'", n + 1))?;
            triples.push((label.clone(), topic, share));
        }
    }

    triples.sort_by(|a, b| (&a.0, a.1).cmp(&(&b.0, b.1)));

    let mut document_labels: Vec<String> = seen_labels.into_keys().collect();
    if order == ColumnOrder::SortedLabels {
        document_labels.sort();
    }

    let mut proportions = vec![vec![0.0; document_labels.len()]; num_topics];
    for (label, topic, share) in &triples {
        // Labels all come from seen_labels, so the lookup cannot fail
        let d = document_labels
            .iter()
            .position(|l| l == label)
            .context("document label vanished during assembly")?;
        proportions[*topic][d] = *share;
    }
    Ok(DocumentTopicTable {
        topic_labels: topic_labels.to_vec(),
        document_labels,
        proportions,
    })
}

/// Read a word-weights file and keep only `topic_id`'s rows, in file order.
pub fn read_key_weights(path: &Path, topic_id: usize) -> Result<KeyWeights> {
    info!(path = %path.display(), topic_id, "Reading word weights file");
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    parse_key_weights(BufReader::new(file), topic_id)
}

/// Parse `topic_id \t key \t weight` triples, filtered to one topic.
/// The result is in file order, not necessarily weight-sorted.
pub fn parse_key_weights<R: BufRead>(reader: R, topic_id: usize) -> Result<KeyWeights> {
    let mut pairs = Vec::new();
    for (topic, key, weight) in parse_weight_triples(reader)? {
        if topic == topic_id {
            pairs.push((key, weight));
        }
    }
    Ok(KeyWeights::new(pairs))
}

/// One row of a word-weights file.
#[derive(Debug, Clone, PartialEq)]
pub struct WordWeight {
    pub topic_id: usize,
    pub key: String,
    pub weight: f64,
}

/// Read a whole word-weights file, sorted by weight descending and
/// truncated to the top `num_tokens` rows across all topics.
pub fn read_word_weights(path: &Path, num_tokens: usize) -> Result<Vec<WordWeight>> {
    info!(path = %path.display(), num_tokens, "Reading word weights file");
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut rows: Vec<WordWeight> = parse_weight_triples(BufReader::new(file))?
        .into_iter()
        .map(|(topic_id, key, weight)| WordWeight {
            topic_id,
            key,
            weight,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.weight
            .partial_cmp(&a.weight)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    rows.truncate(num_tokens);
    Ok(rows)
}

fn parse_weight_triples<R: BufRead>(reader: R) -> Result<Vec<(usize, String, f64)>> {
    let mut triples = Vec::new();
    for (n, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read line {}", n + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = line.trim_end().split('\t');
        let (Some(topic), Some(key), Some(weight)) =
            (fields.next(), fields.next(), fields.next())
        else {
            bail!("malformed word-weights line {}: '{line}'", n + 1);
        };
        let topic: usize = topic
            .parse()
            .with_context(|| format!("bad topic id on line {}: '{topic}'", n + 1))?;
        let weight: f64 = weight
            .parse()
            .with_context(|| format!("bad weight on line {}: '{weight}'", n + 1))?;
        triples.push((topic, key.to_string(), weight));
    }
    Ok(triples)
}

/// Strip directory and extension from a file-embedded document path.
fn document_label(raw: &str) -> String {
    Path::new(raw)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| raw.to_string())
}
