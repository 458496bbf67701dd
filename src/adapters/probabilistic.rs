// Adapter for probabilistic models with a method-call interface.
//
// Like the swap-ready traits elsewhere in this crate, `ProbabilisticModel`
// is the seam: any library whose model can list its top words and infer a
// topic distribution for a bag-of-words document plugs in here without
// touching the rest of the pipeline.

use anyhow::{bail, Result};
use indexmap::IndexMap;
use tracing::info;

use crate::matrix::SparseDocumentTermMatrix;
use crate::table::{DocumentTopicTable, KeyWeights, TopicTable};

/// One document as a sparse bag of words: (type_id, count) pairs.
pub type BowDocument = Vec<(u32, u64)>;

/// The capabilities this adapter needs from a probabilistic topic model.
pub trait ProbabilisticModel {
    /// Number of topics the model was fitted with.
    fn num_topics(&self) -> usize;

    /// The top `num_keys` (token, weight) pairs for one topic, already
    /// weight-sorted by the model.
    fn top_keys(&self, topic_id: usize, num_keys: usize) -> Vec<(String, f64)>;

    /// Sparse topic distribution for one bag-of-words document. Topics
    /// below the model's relevance threshold may be omitted; a missing
    /// topic means proportion 0.0.
    fn document_topics(&self, document: &[(u32, u64)]) -> Vec<(usize, f64)>;
}

/// Convert a sparse document-term matrix into one bag-of-words list per
/// document.
///
/// Documents come out in first-seen order of their identifiers, and each
/// document's (type_id, count) pairs keep the matrix's row order. A single
/// grouped pass, O(n) in the number of entries.
pub fn doc2bow(matrix: &SparseDocumentTermMatrix) -> Vec<BowDocument> {
    let mut grouped: IndexMap<u32, BowDocument> = IndexMap::new();
    for (document_id, type_id, count) in matrix.iter() {
        grouped
            .entry(document_id)
            .or_default()
            .push((type_id, count));
    }
    grouped.into_values().collect()
}

/// Canonical topic table from the model's own top-words capability, keeping
/// only the tokens.
pub fn topics(model: &dyn ProbabilisticModel, num_keys: usize) -> Result<TopicTable> {
    info!(
        topics = model.num_topics(),
        num_keys, "Reading topics from probabilistic model"
    );
    let mut rows = Vec::with_capacity(model.num_topics());
    for topic_id in 0..model.num_topics() {
        let keys: Vec<String> = model
            .top_keys(topic_id, num_keys)
            .into_iter()
            .map(|(token, _)| token)
            .collect();
        if keys.len() != num_keys {
            bail!(
                "model returned {} keys for topic {} but {} were requested",
                keys.len(),
                topic_id,
                num_keys
            );
        }
        rows.push(keys);
    }
    Ok(TopicTable::new(rows))
}

/// Dense T x D document-topic table assembled from per-document sparse
/// distributions. Column order is exactly the caller's label order.
pub fn document_topics(
    model: &dyn ProbabilisticModel,
    bow_corpus: &[BowDocument],
    document_labels: &[String],
    topic_labels: &[String],
) -> Result<DocumentTopicTable> {
    if document_labels.len() != bow_corpus.len() {
        bail!(
            "{} document labels were given but the bag-of-words corpus has {} documents",
            document_labels.len(),
            bow_corpus.len()
        );
    }
    let num_topics = model.num_topics();
    if topic_labels.len() != num_topics {
        bail!(
            "{} topic labels were given but the model has {} topics",
            topic_labels.len(),
            num_topics
        );
    }

    let mut proportions = vec![vec![0.0; bow_corpus.len()]; num_topics];
    for (d, document) in bow_corpus.iter().enumerate() {
        for (topic_id, share) in model.document_topics(document) {
            if topic_id >= num_topics {
                bail!(
                    "model reported topic {} for document {} but only has {} topics",
                    topic_id,
                    d,
                    num_topics
                );
            }
            proportions[topic_id][d] = share;
        }
    }
    Ok(DocumentTopicTable {
        topic_labels: topic_labels.to_vec(),
        document_labels: document_labels.to_vec(),
        proportions,
    })
}

/// Key weights for one topic, delegated entirely to the model. The result
/// is already weight-sorted by the model; no re-sort is applied here.
pub fn key_weights(
    model: &dyn ProbabilisticModel,
    topic: usize,
    num_keys: usize,
) -> Result<KeyWeights> {
    if topic >= model.num_topics() {
        bail!("topic {} does not exist, model has {} topics", topic, model.num_topics());
    }
    Ok(KeyWeights::new(model.top_keys(topic, num_keys)))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal fixed-output model for adapter tests.
    struct StubModel;

    impl ProbabilisticModel for StubModel {
        fn num_topics(&self) -> usize {
            2
        }

        fn top_keys(&self, topic_id: usize, num_keys: usize) -> Vec<(String, f64)> {
            let words = match topic_id {
                0 => ["milk", "honey", "bread"],
                _ => ["iron", "coal", "steam"],
            };
            words
                .iter()
                .take(num_keys)
                .enumerate()
                .map(|(i, w)| (w.to_string(), 1.0 - i as f64 * 0.1))
                .collect()
        }

        fn document_topics(&self, document: &[(u32, u64)]) -> Vec<(usize, f64)> {
            // Document 'about' topic 0 iff it contains type 0; topic 1 is
            // omitted entirely below the threshold for such documents
            if document.iter().any(|&(t, _)| t == 0) {
                vec![(0, 0.9)]
            } else {
                vec![(0, 0.2), (1, 0.8)]
            }
        }
    }

    #[test]
    fn doc2bow_groups_in_first_seen_order() {
        let mut m = SparseDocumentTermMatrix::new();
        // Document 7 appears before document 2; entries interleave
        m.insert(7, 1, 4);
        m.insert(2, 0, 1);
        m.insert(7, 3, 2);
        let bow = doc2bow(&m);
        assert_eq!(bow, vec![vec![(1, 4), (3, 2)], vec![(0, 1)]]);
    }

    #[test]
    fn doc2bow_of_empty_matrix_is_empty() {
        assert!(doc2bow(&SparseDocumentTermMatrix::new()).is_empty());
    }

    #[test]
    fn topics_keeps_tokens_only() {
        let table = topics(&StubModel, 2).unwrap();
        assert_eq!(table.num_topics(), 2);
        assert_eq!(table.num_keys(), 2);
        assert_eq!(table.topics[0], vec!["milk", "honey"]);
        assert_eq!(table.topics[1], vec!["iron", "coal"]);
    }

    #[test]
    fn omitted_topics_become_zero() {
        let bow_corpus = vec![vec![(0, 3)], vec![(5, 1)]];
        let docs = vec!["one".to_string(), "two".to_string()];
        let labels = vec!["milk honey".to_string(), "iron coal".to_string()];
        let table = document_topics(&StubModel, &bow_corpus, &docs, &labels).unwrap();
        // Document one only got a topic-0 share; topic 1 defaults to 0.0
        assert_eq!(table.proportions[0], vec![0.9, 0.2]);
        assert_eq!(table.proportions[1], vec![0.0, 0.8]);
    }

    #[test]
    fn key_weights_keep_model_order() {
        let kw = key_weights(&StubModel, 1, 3).unwrap();
        assert_eq!(kw.pairs[0].0, "iron");
        assert_eq!(kw.pairs[2].0, "steam");
        assert!(key_weights(&StubModel, 9, 3).is_err());
    }

    #[test]
    fn label_count_mismatch_is_an_error() {
        let labels = vec!["a".to_string(), "b".to_string()];
        let err = document_topics(&StubModel, &[vec![(0, 1)]], &labels, &labels);
        assert!(err.is_err());
    }
}
