// Matrix Market style coordinate-list codec for sparse document-term
// matrices.
//
// The on-disk shape is a fixed three-line header followed by one line per
// nonzero entry:
//
//   %%MatrixMarket matrix coordinate real general
//   {num_docs} {num_types} {sum_counts}
//   {document_id} {type_id} {count}
//   ...
//
// num_docs and num_types are the largest identifiers observed, not entity
// counts — that matches the files downstream consumers already read.

use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};

use super::SparseDocumentTermMatrix;

/// Format banner, first line of every coordinate-list file.
pub const MARKET_BANNER: &str = "%%MatrixMarket matrix coordinate real general";

/// Write `matrix` in coordinate-list format.
///
/// Entries are emitted in the matrix's insertion order. An empty matrix is
/// rejected: there is no meaningful header for it. A failure mid-write
/// leaves a truncated file; the export is deterministic and re-runnable, so
/// no recovery is attempted.
pub fn write_matrix_market<W: Write>(matrix: &SparseDocumentTermMatrix, mut out: W) -> Result<()> {
    let (Some(num_docs), Some(num_types)) = (matrix.max_document_id(), matrix.max_type_id())
    else {
        bail!("cannot write an empty matrix in coordinate-list format");
    };
    writeln!(out, "{MARKET_BANNER}")?;
    writeln!(out, "{} {} {}", num_docs, num_types, matrix.sum_counts())?;
    for (document_id, type_id, count) in matrix.iter() {
        writeln!(out, "{document_id} {type_id} {count}")?;
    }
    Ok(())
}

/// Read a coordinate-list file back into a sparse matrix.
///
/// The banner and the declared count sum are both verified, so a truncated
/// or foreign file fails loudly instead of producing a silently short
/// matrix.
pub fn read_matrix_market<R: BufRead>(reader: R) -> Result<SparseDocumentTermMatrix> {
    let mut lines = reader.lines();

    let banner = lines
        .next()
        .context("coordinate-list file is empty")?
        .context("failed to read banner line")?;
    if banner.trim_end() != MARKET_BANNER {
        bail!("unrecognized banner line: '{banner}'");
    }

    let header = lines
        .next()
        .context("coordinate-list file has no header line")?
        .context("failed to read header line")?;
    let mut fields = header.split_whitespace();
    let (num_docs, num_types, declared_sum) = match (
        fields.next().map(str::parse::<u32>),
        fields.next().map(str::parse::<u32>),
        fields.next().map(str::parse::<u64>),
    ) {
        (Some(Ok(d)), Some(Ok(t)), Some(Ok(s))) => (d, t, s),
        _ => bail!("malformed header line: '{header}'"),
    };

    let mut matrix = SparseDocumentTermMatrix::new();
    for (n, line) in lines.enumerate() {
        let line = line.with_context(|| format!("failed to read entry line {}", n + 3))?;
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = line.split_whitespace();
        let (document_id, type_id, count) = match (
            fields.next().map(str::parse::<u32>),
            fields.next().map(str::parse::<u32>),
            fields.next().map(str::parse::<u64>),
        ) {
            (Some(Ok(d)), Some(Ok(t)), Some(Ok(c))) => (d, t, c),
            _ => bail!("malformed entry on line {}: '{line}'", n + 3),
        };
        if document_id > num_docs || type_id > num_types {
            bail!(
                "entry ({document_id}, {type_id}) exceeds declared bounds {num_docs} x {num_types}"
            );
        }
        matrix.insert(document_id, type_id, count);
    }

    let actual_sum = matrix.sum_counts();
    if actual_sum != declared_sum {
        bail!("declared count sum {declared_sum} does not match entries sum {actual_sum}");
    }
    Ok(matrix)
}
