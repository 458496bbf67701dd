// Adapter for dense-matrix models.
//
// These models expose their fitted state as two plain weight grids: a
// topic-word matrix (T x V) and a precomputed document-topic matrix
// (D x T). The adapter reads the fields directly; no method calls, no
// inference at read time.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::table::{DocumentTopicTable, KeyWeights, TopicTable};

/// A fitted dense-matrix model: raw topic-word and document-topic grids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseModel {
    /// topic_word[t][v] = weight of vocabulary entry v in topic t
    pub topic_word: Vec<Vec<f64>>,
    /// doc_topic[d][t] = proportion of topic t in document d
    pub doc_topic: Vec<Vec<f64>>,
}

impl DenseModel {
    /// Build a model from its two grids, checking that they agree on the
    /// number of topics and that each grid is rectangular.
    pub fn new(topic_word: Vec<Vec<f64>>, doc_topic: Vec<Vec<f64>>) -> Result<Self> {
        let num_topics = topic_word.len();
        if num_topics == 0 {
            bail!("dense model has no topics");
        }
        let vocab_size = topic_word[0].len();
        if let Some(row) = topic_word.iter().find(|row| row.len() != vocab_size) {
            bail!(
                "topic-word matrix is ragged: expected {} columns, found a row with {}",
                vocab_size,
                row.len()
            );
        }
        if let Some(row) = doc_topic.iter().find(|row| row.len() != num_topics) {
            bail!(
                "document-topic matrix has a row with {} topics, model has {}",
                row.len(),
                num_topics
            );
        }
        Ok(Self {
            topic_word,
            doc_topic,
        })
    }

    pub fn num_topics(&self) -> usize {
        self.topic_word.len()
    }

    pub fn vocab_size(&self) -> usize {
        self.topic_word.first().map_or(0, |row| row.len())
    }

    pub fn num_documents(&self) -> usize {
        self.doc_topic.len()
    }
}

impl crate::corpus::ModelBlob for DenseModel {
    fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Top `num_keys` vocabulary entries per topic, weight-descending.
///
/// Ties keep their original vocabulary order: the sort is stable over
/// vocabulary indices, so two equal-weight tokens appear in the order the
/// vocabulary lists them.
pub fn topics(model: &DenseModel, vocabulary: &[String], num_keys: usize) -> Result<TopicTable> {
    if vocabulary.len() != model.vocab_size() {
        bail!(
            "vocabulary has {} entries but the model's topic-word matrix has {} columns",
            vocabulary.len(),
            model.vocab_size()
        );
    }
    if num_keys > vocabulary.len() {
        bail!(
            "requested {} keys per topic but the vocabulary only has {} entries",
            num_keys,
            vocabulary.len()
        );
    }
    info!(topics = model.num_topics(), num_keys, "Reading topics from dense model");

    let rows = model
        .topic_word
        .iter()
        .map(|weights| {
            let mut order: Vec<usize> = (0..weights.len()).collect();
            // Stable sort by weight descending; equal weights keep
            // vocabulary order
            order.sort_by(|&a, &b| {
                weights[b]
                    .partial_cmp(&weights[a])
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            order
                .into_iter()
                .take(num_keys)
                .map(|v| vocabulary[v].clone())
                .collect()
        })
        .collect();
    Ok(TopicTable::new(rows))
}

/// Transpose the model's precomputed document-topic grid into the canonical
/// T x D table. Column order is exactly the caller's label order.
pub fn document_topics(
    model: &DenseModel,
    document_labels: &[String],
    topic_labels: &[String],
) -> Result<DocumentTopicTable> {
    if document_labels.len() != model.num_documents() {
        bail!(
            "{} document labels were given but the model holds {} documents",
            document_labels.len(),
            model.num_documents()
        );
    }
    if topic_labels.len() != model.num_topics() {
        bail!(
            "{} topic labels were given but the model has {} topics",
            topic_labels.len(),
            model.num_topics()
        );
    }

    let proportions = (0..model.num_topics())
        .map(|t| model.doc_topic.iter().map(|row| row[t]).collect())
        .collect();
    Ok(DocumentTopicTable {
        topic_labels: topic_labels.to_vec(),
        document_labels: document_labels.to_vec(),
        proportions,
    })
}

/// Key weights for one topic, zipping the first `num_keys` vocabulary
/// entries with the first `num_keys` weights of that topic's row.
///
/// Unlike [`topics`], this is *not* sorted by weight — the pairs come back
/// in original vocabulary order. Callers wanting a weight order pass a sort
/// flag at the dispatch layer.
pub fn key_weights(
    model: &DenseModel,
    vocabulary: &[String],
    topic: usize,
    num_keys: usize,
) -> Result<KeyWeights> {
    let Some(weights) = model.topic_word.get(topic) else {
        bail!("topic {} does not exist, model has {} topics", topic, model.num_topics());
    };
    if vocabulary.len() != weights.len() {
        bail!(
            "vocabulary has {} entries but the model's topic-word matrix has {} columns",
            vocabulary.len(),
            weights.len()
        );
    }
    let take = num_keys.min(vocabulary.len());
    let pairs = vocabulary[..take]
        .iter()
        .cloned()
        .zip(weights[..take].iter().copied())
        .collect();
    Ok(KeyWeights::new(pairs))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn sample_model() -> DenseModel {
        DenseModel::new(
            vec![
                vec![0.1, 0.5, 0.3, 0.1],
                vec![0.4, 0.1, 0.1, 0.4],
            ],
            vec![vec![0.7, 0.3], vec![0.2, 0.8], vec![0.5, 0.5]],
        )
        .unwrap()
    }

    #[test]
    fn topics_ranks_by_weight_descending() {
        let model = sample_model();
        let table = topics(&model, &vocab(&["a", "b", "c", "d"]), 2).unwrap();
        assert_eq!(table.num_topics(), 2);
        assert_eq!(table.num_keys(), 2);
        assert_eq!(table.topics[0], vec!["b", "c"]);
        // Topic 1 has a tie between "a" and "d" — vocabulary order wins
        assert_eq!(table.topics[1], vec!["a", "d"]);
    }

    #[test]
    fn document_topics_transposes_and_keeps_caller_order() {
        let model = sample_model();
        let docs = vocab(&["doc_one", "doc_two", "doc_three"]);
        let labels = vocab(&["first topic", "second topic"]);
        let table = document_topics(&model, &docs, &labels).unwrap();
        assert_eq!(table.num_topics(), 2);
        assert_eq!(table.num_documents(), 3);
        assert_eq!(table.document_labels, docs);
        // Row 0 is topic 0's proportion across documents in caller order
        assert_eq!(table.proportions[0], vec![0.7, 0.2, 0.5]);
        assert_eq!(table.proportions[1], vec![0.3, 0.8, 0.5]);
    }

    #[test]
    fn key_weights_stay_in_vocabulary_order() {
        let model = sample_model();
        let kw = key_weights(&model, &vocab(&["a", "b", "c", "d"]), 0, 3).unwrap();
        // First three vocabulary entries with their raw weights, unsorted
        assert_eq!(
            kw.pairs,
            vec![("a".to_string(), 0.1), ("b".to_string(), 0.5), ("c".to_string(), 0.3)]
        );
    }

    #[test]
    fn label_count_mismatch_is_an_error() {
        let model = sample_model();
        let labels = vocab(&["first", "second"]);
        assert!(document_topics(&model, &vocab(&["only_one"]), &labels).is_err());
    }

    #[test]
    fn ragged_grids_are_rejected() {
        assert!(DenseModel::new(vec![vec![0.1, 0.2], vec![0.3]], vec![]).is_err());
        assert!(DenseModel::new(vec![vec![0.1]], vec![vec![0.5, 0.5]]).is_err());
    }
}
