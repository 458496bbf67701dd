// Document-term matrices — the corpus-side input to every adapter.
//
// Two physical shapes exist: a dense labeled grid for small corpora, and a
// sparse composite-indexed form for large ones. Identifiers in the sparse
// form are dense integers assigned upstream; they are stable across
// save/load and this crate never reassigns them.

pub mod market;
pub mod save;

use anyhow::{bail, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Sparse document-term matrix keyed by (document_id, type_id).
///
/// Entries keep their insertion order. That order is semantic: doc2bow
/// grouping and the coordinate-list export both reproduce it, so a matrix
/// built row-by-row round-trips byte-for-byte.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SparseDocumentTermMatrix {
    entries: IndexMap<(u32, u32), u64>,
}

impl SparseDocumentTermMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the count for one (document, type) cell. Re-inserting a key
    /// overwrites the count but keeps the original position.
    pub fn insert(&mut self, document_id: u32, type_id: u32, count: u64) {
        self.entries.insert((document_id, type_id), count);
    }

    pub fn get(&self, document_id: u32, type_id: u32) -> Option<u64> {
        self.entries.get(&(document_id, type_id)).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order as (document_id, type_id, count).
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, u64)> + '_ {
        self.entries.iter().map(|(&(d, t), &c)| (d, t, c))
    }

    /// Largest document identifier present.
    pub fn max_document_id(&self) -> Option<u32> {
        self.entries.keys().map(|&(d, _)| d).max()
    }

    /// Largest type identifier present.
    pub fn max_type_id(&self) -> Option<u32> {
        self.entries.keys().map(|&(_, t)| t).max()
    }

    /// Sum of all stored counts.
    pub fn sum_counts(&self) -> u64 {
        self.entries.values().sum()
    }
}

/// Dense document-term matrix: labeled rows (documents) x columns (types).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseDocumentTermMatrix {
    pub document_labels: Vec<String>,
    pub type_labels: Vec<String>,
    /// counts[d][t] = frequency of type t in document d
    pub counts: Vec<Vec<u64>>,
}

impl DenseDocumentTermMatrix {
    /// Build a dense matrix, checking that the grid matches the labels.
    pub fn new(
        document_labels: Vec<String>,
        type_labels: Vec<String>,
        counts: Vec<Vec<u64>>,
    ) -> Result<Self> {
        if counts.len() != document_labels.len() {
            bail!(
                "count grid has {} rows but {} document labels were given",
                counts.len(),
                document_labels.len()
            );
        }
        for (row, label) in counts.iter().zip(&document_labels) {
            if row.len() != type_labels.len() {
                bail!(
                    "row for document '{}' has {} counts but {} type labels were given",
                    label,
                    row.len(),
                    type_labels.len()
                );
            }
        }
        Ok(Self {
            document_labels,
            type_labels,
            counts,
        })
    }
}

/// Label -> dense identifier map for one matrix axis.
///
/// Saved alongside a sparse matrix so the integer identifiers stay
/// resolvable. Insertion order is preserved on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelIds {
    ids: IndexMap<String, u32>,
}

impl LabelIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the next free identifier to `label`, or return the existing
    /// one if the label was already registered.
    pub fn assign(&mut self, label: &str) -> u32 {
        if let Some(&id) = self.ids.get(label) {
            return id;
        }
        let id = self.ids.len() as u32;
        self.ids.insert(label.to_string(), id);
        id
    }

    pub fn get(&self, label: &str) -> Option<u32> {
        self.ids.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.ids.iter().map(|(label, &id)| (label.as_str(), id))
    }
}
