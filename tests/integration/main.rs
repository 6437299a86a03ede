//! runwire integration tests.
//!
//! Each module drives the public API of runwire-core end to end:
//! outbound conversion and splitting, response decoding, and the
//! round trips between them.
//!
//!   cargo test --test integration

mod outbound;
mod responses;
mod roundtrip;

use bytes::Bytes;
use runwire_core::{DataTree, Fields};

// ── Fixtures ──────────────────────────────────────────────────────────────────

/// Start of a baseline JFIF file: SOI, APP0 with the JFIF identifier, then a
/// stretch of entropy-coded filler and EOI.
pub fn jpeg_fixture() -> Bytes {
    let mut data = vec![
        0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0x01, 0x01, 0x00, 0x00,
        0x01, 0x00, 0x01, 0x00, 0x00,
    ];
    data.extend((0..2048u32).map(|i| (i * 31 % 251) as u8));
    data.extend_from_slice(&[0xFF, 0xD9]);
    Bytes::from(data)
}

pub fn png_fixture() -> Bytes {
    let mut data = b"\x89PNG\r\n\x1a\n\x00\x00\x00\x0dIHDR".to_vec();
    data.extend_from_slice(&[0, 0, 0, 1, 0, 0, 0, 1, 8, 6, 0, 0, 0]);
    Bytes::from(data)
}

/// Build an ordered field map from literal pairs.
pub fn fields(pairs: Vec<(&str, DataTree)>) -> Fields {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

/// Write `data` to a per-process temp file and return its path.
pub fn temp_file(name: &str, data: &[u8]) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("runwire-it-{}-{name}", std::process::id()));
    std::fs::write(&path, data).expect("write temp file");
    path
}
