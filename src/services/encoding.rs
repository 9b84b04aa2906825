use std::path::Path;

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use serde::Serialize;

use crate::error::{Error, Result};

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct EncodingDetectionResult {
    pub best: String,
    pub confidence: f32,
    pub had_bom: bool,
}

/// Guess how resource bytes are encoded.
///
/// `.strings` files show up as UTF-8 or UTF-16 depending on which tool
/// wrote them, so the BOM is checked first and only BOM-less input is
/// handed to the detector.
pub fn detect(bytes: &[u8]) -> EncodingDetectionResult {
    let (encoding, had_bom) = pick_encoding(bytes);
    let confidence = if had_bom {
        0.99
    } else if encoding == UTF_16LE || encoding == UTF_16BE {
        0.70
    } else {
        estimate_confidence(bytes, encoding)
    };

    EncodingDetectionResult {
        best: encoding.name().to_lowercase(),
        confidence,
        had_bom,
    }
}

pub fn detect_from_file(path: &Path) -> Result<EncodingDetectionResult> {
    let bytes = std::fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(detect(&bytes))
}

/// Decode resource bytes to text. Never fails; undecodable sequences are
/// replaced.
pub fn decode(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return String::new();
    }

    let (encoding, _) = pick_encoding(bytes);
    // `decode` strips a matching BOM itself.
    let (text, _, _) = encoding.decode(bytes);
    text.into_owned()
}

fn pick_encoding(bytes: &[u8]) -> (&'static Encoding, bool) {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return (encoding, true);
    }

    // Checked before UTF-8, which happily accepts NUL bytes.
    if let Some(encoding) = sniff_utf16(bytes) {
        return (encoding, false);
    }

    if std::str::from_utf8(bytes).is_ok() {
        return (UTF_8, false);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    (detector.guess(None, true), false)
}

/// Resource text never contains U+0000, so a NUL byte means UTF-16. The
/// zero half of each ASCII code unit tells the byte order.
fn sniff_utf16(bytes: &[u8]) -> Option<&'static Encoding> {
    if bytes.len() < 2 || !bytes.contains(&0) {
        return None;
    }

    let even_zeros = bytes.iter().step_by(2).filter(|b| **b == 0).count();
    let odd_zeros = bytes.iter().skip(1).step_by(2).filter(|b| **b == 0).count();

    if odd_zeros >= even_zeros {
        Some(UTF_16LE)
    } else {
        Some(UTF_16BE)
    }
}

fn estimate_confidence(bytes: &[u8], encoding: &'static Encoding) -> f32 {
    let (text, _, had_errors) = encoding.decode(bytes);

    if had_errors {
        return 0.35;
    }

    let len = text.len();
    if len < 64 {
        0.55
    } else if len < 512 {
        0.70
    } else if len < 4096 {
        0.82
    } else {
        0.90
    }
}
