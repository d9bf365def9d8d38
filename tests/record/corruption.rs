//! Corruption Tests
//!
//! Damaged frames and envelopes fail to decode; they never yield a
//! silently wrong table.

use crate::common::*;
use tabula::{DecodeError, Frame};
use tabula_format::envelope;

fn frame_bytes(config: &CodecConfig) -> Vec<u8> {
    ColumnarFramer::new(config.clone())
        .unwrap()
        .encode_to_bytes(&every_type(40))
        .unwrap()
}

fn document_with(bytes: &[u8]) -> DatasetDocument {
    DatasetDocument {
        id: SAMPLE_ID.to_string(),
        name: "damaged".to_string(),
        table: envelope::wrap(bytes, TextEncoding::Base64),
    }
}

#[test]
fn truncated_last_body_byte_is_detected() {
    init_tracing();
    for compression in [Compression::None, Compression::Zstd] {
        let config = CodecConfig::new().with_compression(compression);
        let frame = ColumnarFramer::new(config.clone())
            .unwrap()
            .encode(&every_type(40))
            .unwrap();
        let (codec, rows, schema, mut body, raw_len) = frame.into_parts();
        body.pop();
        let damaged = Frame::from_parts(codec, rows, schema, body, raw_len);

        let framer = ColumnarFramer::new(config).unwrap();
        assert!(framer.decode(&damaged).is_err(), "{compression}");

        // Re-serialized with a fresh checksum, so only the body check can catch it
        let bytes = damaged.to_bytes().unwrap();
        let err = DatasetRecord::from_document(&document_with(&bytes)).unwrap_err();
        assert_eq!(err.stage(), "frame", "{compression}");
    }
}

#[test]
fn every_single_bit_flip_is_detected() {
    let bytes = frame_bytes(&CodecConfig::new());
    let framer = ColumnarFramer::default();
    for i in (0..bytes.len()).step_by(7) {
        let mut damaged = bytes.clone();
        damaged[i] ^= 0x10;
        assert!(framer.decode_from_bytes(&damaged).is_err(), "flip at {i}");
    }
}

#[test]
fn body_flip_reports_checksum_mismatch() {
    let mut bytes = frame_bytes(&CodecConfig::new().with_compression(Compression::None));
    let last_body_byte = bytes.len() - 5;
    bytes[last_body_byte] ^= 0x01;
    assert!(matches!(
        DatasetRecord::from_document(&document_with(&bytes)),
        Err(DeserializationError::Frame(DecodeError::ChecksumMismatch { .. }))
    ));
}

#[test]
fn every_truncation_is_detected() {
    let bytes = frame_bytes(&CodecConfig::new());
    let framer = ColumnarFramer::default();
    for len in 0..bytes.len() {
        assert!(framer.decode_from_bytes(&bytes[..len]).is_err(), "len {len}");
    }
}

#[test]
fn header_fields_are_checked() {
    let bytes = frame_bytes(&CodecConfig::new());

    let mut bad_magic = bytes.clone();
    bad_magic[0] = b'X';
    assert!(matches!(
        Frame::from_bytes(&bad_magic),
        Err(DecodeError::BadMagic(_))
    ));

    let mut bad_version = bytes.clone();
    bad_version[4] = 9;
    assert_eq!(
        Frame::from_bytes(&bad_version),
        Err(DecodeError::UnsupportedVersion(9))
    );

    let mut bad_codec = bytes;
    bad_codec[8] = 0xEE;
    assert_eq!(
        Frame::from_bytes(&bad_codec),
        Err(DecodeError::UnrecognizedCodecTag(0xEE))
    );
}

#[test]
fn decode_limit_rejects_large_frames() {
    let bytes = frame_bytes(&CodecConfig::new());
    let strict = CodecConfig::new().with_max_decoded_bytes(64);
    let err = DatasetRecord::from_text_with(
        &serde_json::to_string(&document_with(&bytes)).unwrap(),
        &strict,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        DeserializationError::Frame(DecodeError::FrameTooLarge { limit: 64, .. })
    ));
}

#[test]
fn damaged_envelope_is_reported() {
    let mut doc = ppl_dataset().to_document().unwrap();
    doc.table.push('*');
    let err = DatasetRecord::from_document(&doc).unwrap_err();
    assert_eq!(err.stage(), "envelope");
}
