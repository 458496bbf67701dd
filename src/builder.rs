// Canonical table builder — dispatch over the three model sources.
//
// Callers say which source they have by constructing the matching
// [`ModelSource`] variant. The sum type makes "no source" and "two sources
// at once" unrepresentable; what remains checkable only at runtime is a
// file-based source missing the particular file an operation needs.

use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::adapters::dense::{self, DenseModel};
use crate::adapters::probabilistic::{self, BowDocument, ProbabilisticModel};
use crate::adapters::tool_files::{self, ColumnOrder};
use crate::table::{DocumentTopicTable, KeyWeights, SortOrder, TopicTable};

/// A dense-matrix model together with the vocabulary its columns index.
pub struct DenseInput<'a> {
    pub model: &'a DenseModel,
    pub vocabulary: &'a [String],
}

/// A probabilistic model together with the bag-of-words corpus needed for
/// per-document inference.
pub struct ProbabilisticInput<'a> {
    pub model: &'a dyn ProbabilisticModel,
    pub bow_corpus: &'a [BowDocument],
}

/// Paths to external-tool output files. Each operation needs exactly one of
/// them; the unused ones may stay `None`.
#[derive(Debug, Clone, Default)]
pub struct FileInput {
    pub topic_keys: Option<PathBuf>,
    pub document_topics: Option<PathBuf>,
    pub word_weights: Option<PathBuf>,
    /// Column ordering for the sparse doc-topics layout
    pub column_order: ColumnOrder,
}

/// The source a canonical table is built from — exactly one of the three
/// supported model formats.
pub enum ModelSource<'a> {
    Dense(DenseInput<'a>),
    Probabilistic(ProbabilisticInput<'a>),
    ToolFiles(FileInput),
}

/// Build the canonical topic table: T topics x `num_keys` key tokens.
///
/// The file-based source is truncated to its top `num_keys` keys per topic;
/// a file holding fewer keys than requested is a configuration error rather
/// than a silently narrower table.
pub fn show_topics(source: &ModelSource, num_keys: usize) -> Result<TopicTable> {
    match source {
        ModelSource::Dense(input) => dense::topics(input.model, input.vocabulary, num_keys),
        ModelSource::Probabilistic(input) => probabilistic::topics(input.model, num_keys),
        ModelSource::ToolFiles(files) => {
            let Some(path) = &files.topic_keys else {
                bail!("file-based source needs a topic_keys path to show topics");
            };
            let parsed = tool_files::read_topic_keys(path)?;
            if parsed.table.num_keys() < num_keys {
                bail!(
                    "topic keys file holds {} keys per topic but {} were requested",
                    parsed.table.num_keys(),
                    num_keys
                );
            }
            let rows = parsed
                .table
                .topics
                .into_iter()
                .map(|mut keys| {
                    keys.truncate(num_keys);
                    keys
                })
                .collect();
            Ok(TopicTable::new(rows))
        }
    }
}

/// Build the canonical document-topic table (T x D).
///
/// Row labels are the space-joined top `num_keys` keys from `topics`. For
/// the in-memory sources, columns follow `document_labels` exactly; the
/// file-based source derives its labels from the file and ignores
/// `document_labels`.
pub fn show_document_topics(
    source: &ModelSource,
    topics: &TopicTable,
    document_labels: &[String],
    num_keys: usize,
) -> Result<DocumentTopicTable> {
    let topic_labels = topics.key_labels(num_keys);
    match source {
        ModelSource::Dense(input) => {
            dense::document_topics(input.model, document_labels, &topic_labels)
        }
        ModelSource::Probabilistic(input) => probabilistic::document_topics(
            input.model,
            input.bow_corpus,
            document_labels,
            &topic_labels,
        ),
        ModelSource::ToolFiles(files) => {
            let Some(path) = &files.document_topics else {
                bail!("file-based source needs a document_topics path to show document topics");
            };
            tool_files::read_document_topics(path, &topic_labels, files.column_order)
        }
    }
}

/// Raw key weights for one topic, optionally sorted.
///
/// With `sort = None` the adapter's native order is kept and truncated to
/// `num_keys`: original vocabulary order for dense models, model order for
/// probabilistic models, file order for tool files. A `Some` sort is
/// applied before truncation.
pub fn show_key_weights(
    source: &ModelSource,
    topic: usize,
    num_keys: usize,
    sort: Option<SortOrder>,
) -> Result<KeyWeights> {
    let weights = match source {
        ModelSource::Dense(input) => {
            dense::key_weights(input.model, input.vocabulary, topic, num_keys)?
        }
        ModelSource::Probabilistic(input) => {
            probabilistic::key_weights(input.model, topic, num_keys)?
        }
        ModelSource::ToolFiles(files) => {
            let Some(path) = &files.word_weights else {
                bail!("file-based source needs a word_weights path to show key weights");
            };
            tool_files::read_key_weights(path, topic)?
        }
    };
    Ok(match sort {
        None => weights.truncated(num_keys),
        Some(order) => weights.sorted(order).truncated(num_keys),
    })
}
