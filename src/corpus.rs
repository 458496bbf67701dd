// Corpus and model persistence.
//
// Two write-once artifacts live here: per-document plain-text token files,
// and the opaque serialized model blob. The model's wire format belongs to
// whatever library produced it; this crate only moves the bytes.

use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::{debug, info};

/// Write one `{label}.txt` file per document, tokens newline-joined.
///
/// The output directory is created if missing. Re-running overwrites prior
/// files; there are no append semantics.
pub fn save_tokenized_corpus(
    corpus: &[Vec<String>],
    document_labels: &[String],
    dir: &Path,
) -> Result<()> {
    if corpus.len() != document_labels.len() {
        bail!(
            "corpus has {} documents but {} labels were given",
            corpus.len(),
            document_labels.len()
        );
    }
    if !dir.exists() {
        info!(dir = %dir.display(), "Creating output directory");
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create directory {}", dir.display()))?;
    }
    info!(documents = corpus.len(), dir = %dir.display(), "Saving tokenized corpus");

    for (tokens, label) in corpus.iter().zip(document_labels) {
        debug!(document = %label, "Writing document");
        let path = dir.join(format!("{label}.txt"));
        let mut out = BufWriter::new(
            File::create(&path).with_context(|| format!("failed to create {}", path.display()))?,
        );
        out.write_all(tokens.join("\n").as_bytes())?;
        out.flush()?;
    }
    Ok(())
}

/// A model that can serialize itself to opaque bytes and back.
///
/// The byte format is the model's own; nothing here inspects it. Implement
/// this on the collaborator's model type to make it persistable through
/// [`save_model`] / [`read_model`].
pub trait ModelBlob: Sized {
    fn to_bytes(&self) -> Result<Vec<u8>>;
    fn from_bytes(bytes: &[u8]) -> Result<Self>;
}

/// Serialize a model to a single file at `path`.
pub fn save_model<M: ModelBlob>(model: &M, path: &Path) -> Result<()> {
    info!(path = %path.display(), "Saving model");
    let bytes = model.to_bytes()?;
    fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))
}

/// Read a model back from the file written by [`save_model`].
pub fn read_model<M: ModelBlob>(path: &Path) -> Result<M> {
    info!(path = %path.display(), "Reading model");
    let mut bytes = Vec::new();
    File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?
        .read_to_end(&mut bytes)?;
    M::from_bytes(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corpus_and_label_counts_must_match() {
        let corpus = vec![vec!["one".to_string()]];
        let err = save_tokenized_corpus(&corpus, &[], Path::new("/nonexistent"));
        assert!(err.is_err());
    }
}
