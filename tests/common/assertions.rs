//! Assertion helpers for tests.

use std::io::Read;

use flate2::read::GzDecoder;

/// Assert bytes are a PNG image
pub fn assert_png(bytes: &[u8]) {
    assert!(
        bytes.starts_with(&[0x89, b'P', b'N', b'G']),
        "Expected PNG image, got {} bytes starting with {:?}",
        bytes.len(),
        &bytes[..8.min(bytes.len())]
    );
}

/// Assert bytes are gzip and return the inflated payload
pub fn gunzip(bytes: &[u8]) -> Vec<u8> {
    assert!(
        bytes.starts_with(&[0x1f, 0x8b]),
        "Expected gzip data, got {:?}",
        &bytes[..4.min(bytes.len())]
    );
    let mut out = Vec::new();
    GzDecoder::new(bytes).read_to_end(&mut out).unwrap();
    out
}
