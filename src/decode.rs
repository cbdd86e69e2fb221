//! Two-stage payload decoding
//!
//! Dataset payloads are published gzip-compressed, but a proxy or static host
//! may already have inflated them. Stage one gunzips; if that fails for any
//! reason the raw bytes are read as UTF-8 text. The outcome is tagged so the
//! caller can tell which path produced the text. Neither path is an error:
//! only the JSON parse that follows can fail.

use std::io::Read;

use flate2::read::GzDecoder;

/// Which decode path produced the text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Gzip,
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub encoding: Encoding,
    pub text: String,
}

/// Gunzip `bytes` into UTF-8 text, or `None` if they are not a complete gzip
/// stream of UTF-8.
pub fn gunzip(bytes: &[u8]) -> Option<String> {
    let mut text = String::new();
    GzDecoder::new(bytes).read_to_string(&mut text).ok()?;
    Some(text)
}

/// Read `bytes` as UTF-8 text. Invalid sequences become U+FFFD and will
/// surface as a parse error later.
pub fn plain_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

pub fn decode_payload(bytes: &[u8]) -> Decoded {
    match gunzip(bytes) {
        Some(text) => Decoded { encoding: Encoding::Gzip, text },
        None => Decoded { encoding: Encoding::Plain, text: plain_text(bytes) },
    }
}

#[cfg(test)]
pub(crate) fn gzip_bytes(text: &str) -> Vec<u8> {
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes()).unwrap();
    encoder.finish().unwrap()
}
