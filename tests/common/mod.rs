//! Shared fixtures for integration test suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's main.rs.

#![allow(dead_code)]

use std::sync::{Arc, Once};

pub use arrow_array::{
    ArrayRef, BinaryArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
    RecordBatch, StringArray, UInt64Array,
};
pub use tabula::{
    CodecConfig, ColumnarFramer, Compression, DatasetDocument, DatasetRecord,
    DeserializationError, TextEncoding, ValidationError,
};

/// Identity used throughout the suites
pub const SAMPLE_ID: &str = "8fba0c5b-4792-4bc1-a8d6-3eea6cc5d086";

static INIT_TRACING: Once = Once::new();

/// Install a test-writer subscriber once per process
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    });
}

/// The four-person table: Name (utf8), Age (int64)
pub fn people() -> RecordBatch {
    let names: ArrayRef = Arc::new(StringArray::from(vec!["Tom", "nick", "krish", "jack"]));
    let ages: ArrayRef = Arc::new(Int64Array::from(vec![20, 21, 19, 18]));
    RecordBatch::try_from_iter(vec![("Name", names), ("Age", ages)]).unwrap()
}

/// One column of every supported type, with nulls where allowed
pub fn every_type(rows: usize) -> RecordBatch {
    let nth = |i: usize| i % 3 != 1;
    let flag: ArrayRef = Arc::new(BooleanArray::from(
        (0..rows).map(|i| nth(i).then_some(i % 2 == 0)).collect::<Vec<_>>(),
    ));
    let small: ArrayRef = Arc::new(Int32Array::from(
        (0..rows).map(|i| nth(i).then_some(i as i32 - 5)).collect::<Vec<_>>(),
    ));
    let big: ArrayRef = Arc::new(Int64Array::from(
        (0..rows).map(|i| i as i64 * 1_000_000_007).collect::<Vec<_>>(),
    ));
    let count: ArrayRef = Arc::new(UInt64Array::from(
        (0..rows).map(|i| u64::MAX - i as u64).collect::<Vec<_>>(),
    ));
    let ratio: ArrayRef = Arc::new(Float32Array::from(
        (0..rows).map(|i| nth(i).then_some(i as f32 / 4.0)).collect::<Vec<_>>(),
    ));
    let score: ArrayRef = Arc::new(Float64Array::from(
        (0..rows).map(|i| -(i as f64) * 0.1).collect::<Vec<_>>(),
    ));
    let label: ArrayRef = Arc::new(
        (0..rows)
            .map(|i| nth(i).then(|| format!("row-{i}-ü")))
            .collect::<StringArray>(),
    );
    let blob: ArrayRef = Arc::new(BinaryArray::from_iter(
        (0..rows).map(|i| nth(i).then(|| vec![0xFFu8, i as u8, 0x00])),
    ));
    RecordBatch::try_from_iter(vec![
        ("flag", flag),
        ("small", small),
        ("big", big),
        ("count", count),
        ("ratio", ratio),
        ("score", score),
        ("label", label),
        ("blob", blob),
    ])
    .unwrap()
}

/// A record around [`people`]
pub fn ppl_dataset() -> DatasetRecord {
    DatasetRecord::new(SAMPLE_ID, "ppl_dataset", people()).unwrap()
}
