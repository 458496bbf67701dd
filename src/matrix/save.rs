// Saving document-term matrices and their companion label-id maps.
//
// Three on-disk variants:
//   - dense matrix        -> document_term_matrix.csv (labeled grid)
//   - sparse matrix       -> document_term_matrix.csv (id triples)
//                            + document_ids.csv + type_ids.csv
//   - sparse matrix (.mm) -> document_term_matrix.mm (coordinate list)
//
// Saving a sparse matrix without both label-id maps is a configuration
// error: the integer identifiers would be unresolvable on read-back.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::info;

use super::market::write_matrix_market;
use super::{DenseDocumentTermMatrix, LabelIds, SparseDocumentTermMatrix};

/// File name shared by the dense and sparse CSV variants.
pub const MATRIX_CSV: &str = "document_term_matrix.csv";
/// File name of the coordinate-list variant.
pub const MATRIX_MM: &str = "document_term_matrix.mm";
/// Companion map for the document axis.
pub const DOCUMENT_IDS_CSV: &str = "document_ids.csv";
/// Companion map for the type axis.
pub const TYPE_IDS_CSV: &str = "type_ids.csv";

/// Write a dense matrix as a labeled delimited table.
///
/// Header row = type labels, first column = document labels. Returns the
/// path of the written file.
pub fn save_dense_matrix(matrix: &DenseDocumentTermMatrix, dir: &Path) -> Result<PathBuf> {
    ensure_dir(dir)?;
    let path = dir.join(MATRIX_CSV);
    info!(path = %path.display(), "Saving dense document-term matrix");

    let mut out = BufWriter::new(
        File::create(&path).with_context(|| format!("failed to create {}", path.display()))?,
    );
    writeln!(out, ",{}", matrix.type_labels.join(","))?;
    for (label, row) in matrix.document_labels.iter().zip(&matrix.counts) {
        let counts: Vec<String> = row.iter().map(u64::to_string).collect();
        writeln!(out, "{},{}", label, counts.join(","))?;
    }
    out.flush()?;
    Ok(path)
}

/// Write a sparse matrix, either as id triples with its two label-id maps
/// or (with `matrix_market` set) in coordinate-list format.
///
/// In triples mode both `document_ids` and `type_ids` are required; passing
/// `None` fails instead of writing a matrix nobody can decode.
pub fn save_sparse_matrix(
    matrix: &SparseDocumentTermMatrix,
    dir: &Path,
    ids: Option<(&LabelIds, &LabelIds)>,
    matrix_market: bool,
) -> Result<Vec<PathBuf>> {
    ensure_dir(dir)?;

    if matrix_market {
        let path = dir.join(MATRIX_MM);
        info!(path = %path.display(), "Saving sparse matrix in coordinate-list format");
        let mut out = BufWriter::new(
            File::create(&path).with_context(|| format!("failed to create {}", path.display()))?,
        );
        write_matrix_market(matrix, &mut out)?;
        out.flush()?;
        return Ok(vec![path]);
    }

    let Some((document_ids, type_ids)) = ids else {
        bail!("saving a sparse matrix requires both document_ids and type_ids label maps");
    };

    let matrix_path = dir.join(MATRIX_CSV);
    info!(path = %matrix_path.display(), "Saving sparse document-term matrix");
    let mut out = BufWriter::new(
        File::create(&matrix_path)
            .with_context(|| format!("failed to create {}", matrix_path.display()))?,
    );
    for (document_id, type_id, count) in matrix.iter() {
        writeln!(out, "{document_id},{type_id},{count}")?;
    }
    out.flush()?;

    let document_ids_path = dir.join(DOCUMENT_IDS_CSV);
    let type_ids_path = dir.join(TYPE_IDS_CSV);
    save_label_ids(document_ids, &document_ids_path)?;
    save_label_ids(type_ids, &type_ids_path)?;
    Ok(vec![matrix_path, document_ids_path, type_ids_path])
}

/// Write one label-id map as `label,id` lines in insertion order.
pub fn save_label_ids(ids: &LabelIds, path: &Path) -> Result<()> {
    info!(path = %path.display(), "Saving label-id map");
    let mut out = BufWriter::new(
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
    );
    for (label, id) in ids.iter() {
        writeln!(out, "{label},{id}")?;
    }
    out.flush()?;
    Ok(())
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        info!(dir = %dir.display(), "Creating output directory");
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create directory {}", dir.display()))?;
    }
    Ok(())
}
