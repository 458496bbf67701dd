// Unit tests for matrix persistence: coordinate-list codec round-trips,
// dense CSV shape, and the sparse-save companion-file contract.

use std::fs;

use granary::matrix::market::{read_matrix_market, write_matrix_market, MARKET_BANNER};
use granary::matrix::save::{
    save_dense_matrix, save_sparse_matrix, DOCUMENT_IDS_CSV, MATRIX_CSV, MATRIX_MM, TYPE_IDS_CSV,
};
use granary::matrix::{DenseDocumentTermMatrix, LabelIds, SparseDocumentTermMatrix};

fn sample_sparse() -> SparseDocumentTermMatrix {
    let mut m = SparseDocumentTermMatrix::new();
    m.insert(0, 0, 1);
    m.insert(0, 1, 1);
    m.insert(1, 0, 1);
    m.insert(1, 2, 1);
    m
}

fn sample_ids() -> (LabelIds, LabelIds) {
    let mut document_ids = LabelIds::new();
    document_ids.assign("document_one");
    document_ids.assign("document_two");
    let mut type_ids = LabelIds::new();
    for token in ["this", "is", "one"] {
        type_ids.assign(token);
    }
    (document_ids, type_ids)
}

// ============================================================
// Coordinate-list codec
// ============================================================

#[test]
fn market_header_is_max_ids_and_sum() {
    let mut buf = Vec::new();
    write_matrix_market(&sample_sparse(), &mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], MARKET_BANNER);
    // max doc id = 1, max type id = 2, sum of counts = 4
    assert_eq!(lines[1], "1 2 4");
    assert_eq!(lines[2..], ["0 0 1", "0 1 1", "1 0 1", "1 2 1"]);
}

#[test]
fn market_round_trip_through_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let matrix = sample_sparse();

    let written = save_sparse_matrix(&matrix, dir.path(), None, true).unwrap();
    assert_eq!(written, vec![dir.path().join(MATRIX_MM)]);

    let bytes = fs::read(&written[0]).unwrap();
    let read_back = read_matrix_market(bytes.as_slice()).unwrap();
    assert_eq!(read_back, matrix);
}

#[test]
fn market_read_rejects_truncated_file() {
    // Drop the last entry line: the declared sum no longer matches
    let mut buf = Vec::new();
    write_matrix_market(&sample_sparse(), &mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let truncated: String = text.lines().take(5).map(|l| format!("{l}\n")).collect();
    assert!(read_matrix_market(truncated.as_bytes()).is_err());
}

// ============================================================
// Sparse save — companion label-id maps
// ============================================================

#[test]
fn sparse_save_without_id_maps_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = save_sparse_matrix(&sample_sparse(), dir.path(), None, false).unwrap_err();
    assert!(
        err.to_string().contains("document_ids and type_ids"),
        "unexpected error: {err}"
    );
    // Nothing should have been written
    assert!(!dir.path().join(MATRIX_CSV).exists());
}

#[test]
fn sparse_save_writes_matrix_and_both_maps() {
    let dir = tempfile::tempdir().unwrap();
    let (document_ids, type_ids) = sample_ids();

    save_sparse_matrix(
        &sample_sparse(),
        dir.path(),
        Some((&document_ids, &type_ids)),
        false,
    )
    .unwrap();

    let matrix_text = fs::read_to_string(dir.path().join(MATRIX_CSV)).unwrap();
    assert_eq!(matrix_text, "0,0,1\n0,1,1\n1,0,1\n1,2,1\n");

    let docs_text = fs::read_to_string(dir.path().join(DOCUMENT_IDS_CSV)).unwrap();
    assert_eq!(docs_text, "document_one,0\ndocument_two,1\n");

    let types_text = fs::read_to_string(dir.path().join(TYPE_IDS_CSV)).unwrap();
    assert_eq!(types_text, "this,0\nis,1\none,2\n");
}

#[test]
fn save_creates_missing_output_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("artifacts").join("matrices");
    save_sparse_matrix(&sample_sparse(), &nested, None, true).unwrap();
    assert!(nested.join(MATRIX_MM).exists());
}

// ============================================================
// Dense save
// ============================================================

#[test]
fn dense_save_writes_labeled_grid() {
    let dir = tempfile::tempdir().unwrap();
    let matrix = DenseDocumentTermMatrix::new(
        vec!["document_one".into(), "document_two".into()],
        vec!["this".into(), "is".into(), "one".into()],
        vec![vec![1, 1, 1], vec![1, 1, 0]],
    )
    .unwrap();

    let path = save_dense_matrix(&matrix, dir.path()).unwrap();
    let text = fs::read_to_string(path).unwrap();
    assert_eq!(text, ",this,is,one\ndocument_one,1,1,1\ndocument_two,1,1,0\n");
}

#[test]
fn rerunning_a_save_overwrites_prior_output() {
    let dir = tempfile::tempdir().unwrap();
    save_sparse_matrix(&sample_sparse(), dir.path(), None, true).unwrap();

    let mut smaller = SparseDocumentTermMatrix::new();
    smaller.insert(0, 0, 2);
    save_sparse_matrix(&smaller, dir.path(), None, true).unwrap();

    let text = fs::read_to_string(dir.path().join(MATRIX_MM)).unwrap();
    assert_eq!(text.lines().count(), 3, "old entries must not linger");
}
