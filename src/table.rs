// Canonical tables — the one tabular shape every adapter projects into.
//
// Three source formats (dense-matrix models, probabilistic models, external
// tool files) all land in these structures, so downstream code never has to
// know where a model came from.

use serde::{Deserialize, Serialize};

/// Topics summarized by their top keys: T rows of K key tokens each.
///
/// Row `t` holds topic t's keys in descending weight order. Every adapter
/// must produce the same uniform T x K shape for a given request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicTable {
    /// One row per topic, each row the topic's keys ranked best-first
    pub topics: Vec<Vec<String>>,
}

impl TopicTable {
    pub fn new(topics: Vec<Vec<String>>) -> Self {
        Self { topics }
    }

    pub fn num_topics(&self) -> usize {
        self.topics.len()
    }

    /// Number of key columns, taken from the first row. Adapters guarantee
    /// uniform row width, so any row would do.
    pub fn num_keys(&self) -> usize {
        self.topics.first().map_or(0, |row| row.len())
    }

    /// Row labels in the canonical `Topic {n}` form.
    pub fn row_labels(&self) -> Vec<String> {
        (0..self.num_topics()).map(|n| format!("Topic {n}")).collect()
    }

    /// Column labels in the canonical `Key {n}` form.
    pub fn column_labels(&self) -> Vec<String> {
        (0..self.num_keys()).map(|n| format!("Key {n}")).collect()
    }

    /// Per-topic labels built from the space-joined top `num_keys` keys.
    ///
    /// These are the row labels of a [`DocumentTopicTable`], so a reader can
    /// see at a glance what each topic is about.
    pub fn key_labels(&self, num_keys: usize) -> Vec<String> {
        self.topics
            .iter()
            .map(|keys| {
                let take = num_keys.min(keys.len());
                keys[..take].join(" ")
            })
            .collect()
    }
}

/// Topic proportions per document: a T x D grid with labeled axes.
///
/// Entry (t, d) is the share of topic t in document d. Shares are
/// probability-like but need not sum to 1 across topics when the source
/// truncates low-relevance entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentTopicTable {
    /// Row labels, one per topic (usually joined top keys)
    pub topic_labels: Vec<String>,
    /// Column labels, one per document
    pub document_labels: Vec<String>,
    /// proportions[t][d] = share of topic t in document d
    pub proportions: Vec<Vec<f64>>,
}

impl DocumentTopicTable {
    pub fn num_topics(&self) -> usize {
        self.topic_labels.len()
    }

    pub fn num_documents(&self) -> usize {
        self.document_labels.len()
    }

    pub fn get(&self, topic: usize, document: usize) -> Option<f64> {
        self.proportions.get(topic)?.get(document).copied()
    }
}

/// Raw key weights for a single topic: ordered token -> weight pairs.
///
/// The order is whatever the source adapter produced — file order for tool
/// output, model order for probabilistic models, original vocabulary order
/// for dense-matrix models. Sorting happens at the dispatch layer, on
/// request only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyWeights {
    pub pairs: Vec<(String, f64)>,
}

/// Direction for an explicit key-weight sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl KeyWeights {
    pub fn new(pairs: Vec<(String, f64)>) -> Self {
        Self { pairs }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn weight(&self, key: &str) -> Option<f64> {
        self.pairs.iter().find(|(k, _)| k == key).map(|(_, w)| *w)
    }

    /// Keep only the first `n` pairs, in place order.
    pub fn truncated(mut self, n: usize) -> Self {
        self.pairs.truncate(n);
        self
    }

    /// Return a copy sorted by weight. Ties keep their original order
    /// (stable sort), so equal-weight keys stay in source order.
    pub fn sorted(mut self, order: SortOrder) -> Self {
        self.pairs.sort_by(|a, b| {
            let cmp = a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal);
            match order {
                SortOrder::Ascending => cmp,
                SortOrder::Descending => cmp.reverse(),
            }
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_table_labels() {
        let table = TopicTable::new(vec![
            vec!["a".into(), "b".into(), "c".into()],
            vec!["d".into(), "e".into(), "f".into()],
        ]);
        assert_eq!(table.num_topics(), 2);
        assert_eq!(table.num_keys(), 3);
        assert_eq!(table.row_labels(), vec!["Topic 0", "Topic 1"]);
        assert_eq!(table.column_labels(), vec!["Key 0", "Key 1", "Key 2"]);
    }

    #[test]
    fn key_labels_join_top_keys() {
        let table = TopicTable::new(vec![vec!["this".into(), "is".into(), "first".into()]]);
        assert_eq!(table.key_labels(2), vec!["this is"]);
        // Requesting more keys than exist joins what is there
        assert_eq!(table.key_labels(10), vec!["this is first"]);
    }

    #[test]
    fn key_weights_sort_and_truncate() {
        let kw = KeyWeights::new(vec![
            ("low".into(), 0.1),
            ("high".into(), 0.9),
            ("mid".into(), 0.5),
        ]);
        let desc = kw.clone().sorted(SortOrder::Descending);
        assert_eq!(desc.pairs[0].0, "high");
        let asc = kw.clone().sorted(SortOrder::Ascending).truncated(2);
        assert_eq!(asc.pairs.len(), 2);
        assert_eq!(asc.pairs[0].0, "low");
        // Truncation without sort keeps source order
        assert_eq!(kw.truncated(1).pairs[0].0, "low");
    }
}
