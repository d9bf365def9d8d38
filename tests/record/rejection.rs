//! Rejection Tests
//!
//! Construction-time checks and document-level failures, each reporting
//! the stage and offending value.

use crate::common::*;
use tabula::{
    validate_identity, validate_name_length, DatasetDocument, EncodeError, SerializationError,
};

#[test]
fn invalid_identity_is_rejected() {
    let err = DatasetRecord::new("not-a-uuid", "x", people()).unwrap_err();
    assert_eq!(
        err,
        ValidationError::InvalidIdentity {
            value: "not-a-uuid".to_string()
        }
    );
}

#[test]
fn non_canonical_identities_are_rejected() {
    let cases = [
        SAMPLE_ID.to_uppercase(),
        SAMPLE_ID.replace('-', ""),
        format!("{{{SAMPLE_ID}}}"),
        format!("urn:uuid:{SAMPLE_ID}"),
        format!(" {SAMPLE_ID}"),
        // version 1
        "8fba0c5b-4792-1bc1-a8d6-3eea6cc5d086".to_string(),
        String::new(),
    ];
    for id in cases {
        assert!(!validate_identity(&id), "accepted {id:?}");
        assert_eq!(
            DatasetRecord::new(&id, "x", people()).unwrap_err().check(),
            "identity"
        );
    }
    assert!(validate_identity(SAMPLE_ID));
}

#[test]
fn long_name_is_rejected() {
    let name = "a".repeat(129);
    assert!(!validate_name_length(&name));
    assert_eq!(
        DatasetRecord::new(SAMPLE_ID, &name, people()).unwrap_err(),
        ValidationError::NameTooLong {
            length: 129,
            max: 128
        }
    );
}

#[test]
fn unsupported_column_fails_encode_and_keeps_record() {
    use arrow_array::Date32Array;
    use std::sync::Arc;

    let days: ArrayRef = Arc::new(Date32Array::from(vec![19000, 19001]));
    let table = RecordBatch::try_from_iter(vec![("day", days)]).unwrap();
    let record = DatasetRecord::new(SAMPLE_ID, "dates", table.clone()).unwrap();

    let err = record.to_document().unwrap_err();
    assert!(matches!(
        err,
        SerializationError::Encode(EncodeError::UnsupportedColumnType { ref column, .. })
            if column == "day"
    ));
    assert!(record.to_text().is_err());
    assert_eq!(record.table(), &table);
}

#[test]
fn document_with_bad_identity_fails_validation() {
    let mut doc = ppl_dataset().to_document().unwrap();
    doc.id = "8fba0c5b47924bc1a8d63eea6cc5d086".to_string();
    let err = DatasetRecord::from_document(&doc).unwrap_err();
    assert_eq!(err.stage(), "validation");
}

#[test]
fn document_with_long_name_fails_validation() {
    let mut doc = ppl_dataset().to_document().unwrap();
    doc.name = "n".repeat(200);
    assert!(matches!(
        DatasetRecord::from_document(&doc),
        Err(DeserializationError::Validation(ValidationError::NameTooLong {
            length: 200,
            ..
        }))
    ));
}

#[test]
fn malformed_json_is_reported_as_document_error() {
    let cases = [
        "not json",
        "{}",
        r#"{"id": "8fba0c5b-4792-4bc1-a8d6-3eea6cc5d086", "name": "x"}"#,
        r#"{"id": "8fba0c5b-4792-4bc1-a8d6-3eea6cc5d086", "name": 5, "table": "b64:"}"#,
    ];
    for text in cases {
        assert!(
            matches!(
                DatasetRecord::from_text(text),
                Err(DeserializationError::MalformedDocument(_))
            ),
            "input: {text}"
        );
    }
}

#[test]
fn unknown_envelope_tag_is_reported() {
    let doc = DatasetDocument {
        id: SAMPLE_ID.to_string(),
        name: "x".to_string(),
        table: "py/b64:AAAA".to_string(),
    };
    let err = DatasetRecord::from_document(&doc).unwrap_err();
    assert_eq!(err.stage(), "envelope");
    assert!(err.to_string().contains("py/b64"));
}
