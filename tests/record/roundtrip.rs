//! Round Trip Tests
//!
//! A valid record survives to_text/from_text with identical id, name and
//! table contents under every codec configuration.

use crate::common::*;
use arrow_schema::{DataType, Field, Schema};
use std::collections::HashMap;
use std::sync::Arc;

#[test]
fn ppl_dataset_text_has_exact_fields() {
    init_tracing();
    let record = ppl_dataset();
    let text = record.to_text().unwrap();

    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    let obj = json.as_object().unwrap();
    assert_eq!(obj.len(), 3);
    assert_eq!(obj["id"], SAMPLE_ID);
    assert_eq!(obj["name"], "ppl_dataset");
    assert!(obj["table"].as_str().unwrap().starts_with("b64:"));
}

#[test]
fn ppl_dataset_decodes_to_original_table() {
    init_tracing();
    let text = ppl_dataset().to_text().unwrap();
    let decoded = DatasetRecord::from_text(&text).unwrap();

    assert_eq!(decoded.id().to_string(), SAMPLE_ID);
    assert_eq!(decoded.name().as_str(), "ppl_dataset");

    let table = decoded.table();
    assert_eq!(table.num_rows(), 4);
    assert_eq!(table.num_columns(), 2);

    let schema = table.schema();
    assert_eq!(schema.field(0).name(), "Name");
    assert_eq!(schema.field(0).data_type(), &DataType::Utf8);
    assert_eq!(schema.field(1).name(), "Age");
    assert_eq!(schema.field(1).data_type(), &DataType::Int64);

    let names = table
        .column(0)
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();
    let ages = table
        .column(1)
        .as_any()
        .downcast_ref::<Int64Array>()
        .unwrap();
    let rows: Vec<(&str, i64)> = names.iter().flatten().zip(ages.values().iter().copied()).collect();
    assert_eq!(
        rows,
        vec![("Tom", 20), ("nick", 21), ("krish", 19), ("jack", 18)]
    );
}

#[test]
fn schema_and_field_metadata_survive() {
    init_tracing();
    let table = people();
    let fields: Vec<Field> = table
        .schema()
        .fields()
        .iter()
        .map(|f| {
            f.as_ref().clone().with_metadata(HashMap::from([(
                "description".to_string(),
                format!("{} of the person", f.name()),
            )]))
        })
        .collect();
    let schema = Schema::new(fields).with_metadata(HashMap::from([
        (
            "pandas".to_string(),
            r#"{"index_columns": [{"kind": "range"}], "columns": []}"#.to_string(),
        ),
        ("origin".to_string(), "census".to_string()),
    ]));
    let table = RecordBatch::try_new(Arc::new(schema), table.columns().to_vec()).unwrap();
    let record = DatasetRecord::new(SAMPLE_ID, "ppl_dataset", table).unwrap();

    for compression in [Compression::None, Compression::Zstd] {
        let config = CodecConfig::new().with_compression(compression);
        let back = DatasetRecord::from_text(&record.to_text_with(&config).unwrap()).unwrap();
        assert_eq!(back, record, "{compression}");
        assert_eq!(back.table().schema().metadata()["origin"], "census");
        assert_eq!(
            back.table().schema().field(1).metadata()["description"],
            "Age of the person"
        );
    }
}

#[test]
fn every_codec_configuration_roundtrips() {
    init_tracing();
    let record = DatasetRecord::new(SAMPLE_ID, "all types", every_type(37)).unwrap();

    for compression in [Compression::None, Compression::Zstd] {
        for encoding in [TextEncoding::Base64, TextEncoding::Base64Url] {
            let config = CodecConfig::for_testing()
                .with_compression(compression)
                .with_text_encoding(encoding);
            let text = record.to_text_with(&config).unwrap();
            let decoded = DatasetRecord::from_text_with(&text, &config).unwrap();
            assert_eq!(decoded, record, "{compression} / {encoding}");
        }
    }
}

#[test]
fn compression_is_transparent() {
    let record = DatasetRecord::new(SAMPLE_ID, "all types", every_type(200)).unwrap();
    let plain = CodecConfig::new().with_compression(Compression::None);
    let packed = CodecConfig::new().with_compression(Compression::Zstd);

    let a = DatasetRecord::from_text(&record.to_text_with(&plain).unwrap()).unwrap();
    let b = DatasetRecord::from_text(&record.to_text_with(&packed).unwrap()).unwrap();
    assert_eq!(a, b);
    assert_eq!(a, record);
}

#[test]
fn zero_rows_keep_shape() {
    let table = every_type(0);
    let record = DatasetRecord::new(SAMPLE_ID, "", table.clone()).unwrap();
    let decoded = DatasetRecord::from_text(&record.to_text().unwrap()).unwrap();

    assert_eq!(decoded.table().num_rows(), 0);
    assert_eq!(decoded.table().schema(), table.schema());
    assert_eq!(decoded.name().as_str(), "");
}

#[test]
fn sliced_table_roundtrips_as_values() {
    let table = every_type(50).slice(7, 20);
    let record = DatasetRecord::new(SAMPLE_ID, "slice", table.clone()).unwrap();
    let decoded = DatasetRecord::from_text(&record.to_text().unwrap()).unwrap();
    assert_eq!(decoded.table(), &table);
}

#[test]
fn name_at_limit_counts_characters() {
    let name = "ж".repeat(128);
    let record = DatasetRecord::new(SAMPLE_ID, &name, people()).unwrap();
    let decoded = DatasetRecord::from_text(&record.to_text().unwrap()).unwrap();
    assert_eq!(decoded.name().as_str(), name);
}

#[test]
fn encoding_is_deterministic() {
    let record = ppl_dataset();
    assert_eq!(record.to_text().unwrap(), record.to_text().unwrap());
}

#[test]
fn concurrent_roundtrips_share_nothing() {
    let record = DatasetRecord::new(SAMPLE_ID, "shared", every_type(64)).unwrap();
    let expected = record.to_text().unwrap();

    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                for _ in 0..8 {
                    let text = record.to_text().unwrap();
                    assert_eq!(text, expected);
                    assert_eq!(DatasetRecord::from_text(&text).unwrap(), record);
                }
            });
        }
    });
}
