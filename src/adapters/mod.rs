// Source adapters — one per topic-model output format.
//
// Each adapter projects its native format into the canonical tables in
// `table`. The builder module dispatches between them; nothing else in the
// crate needs to know which library or tool produced a model.

pub mod dense;
pub mod probabilistic;
pub mod tool_files;
