// Granary: normalizes heterogeneous topic-model output into canonical
// tables and persists corpus artifacts in interoperable formats.
//
// This is the library root. Three source formats (dense-matrix models,
// probabilistic models, external-tool files) are projected into one tabular
// shape by the adapters; the builder dispatches between them.

pub mod adapters;
pub mod builder;
pub mod chunks;
pub mod config;
pub mod corpus;
pub mod matrix;
pub mod output;
pub mod table;
