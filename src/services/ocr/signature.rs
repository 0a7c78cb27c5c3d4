//! Glyph signatures.
//!
//! A signature is the zlib stream (level 6) of the glyph's row-major bit
//! string (`1` for ink, `0` for background) rendered as a bytes literal,
//! e.g. `b'x\x9c...'`. Corpora store signatures in exactly this form, so the
//! encoding here must stay byte-for-byte stable: any drift makes every
//! lookup miss.
use super::preprocessing::is_foreground;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::GrayImage;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::io::Write as _;

const ZLIB_LEVEL: u32 = 6;

/// Canonical exact-match key for a glyph bitmap
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature(String);

impl Signature {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Encode a trimmed glyph
    pub fn encode(glyph: &GrayImage) -> Self {
        let bits: String = glyph
            .pixels()
            .map(|p| if is_foreground(p) { '1' } else { '0' })
            .collect();

        Self(render_bytes_literal(&compress(bits.as_bytes())))
    }
}

impl From<String> for Signature {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Signature {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn compress(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(data.len() / 4 + 16), Compression::new(ZLIB_LEVEL));
    // Writes go to an in-memory Vec and cannot fail
    encoder
        .write_all(data)
        .and_then(|_| encoder.finish())
        .expect("zlib into Vec<u8> is infallible")
}

/// Render bytes as a `b'...'` literal.
///
/// Single quotes delimit the literal unless the data contains `'` but no `"`.
/// The delimiter and backslash are escaped, `\t` `\n` `\r` use their short
/// escapes, other bytes outside printable ASCII become `\xNN`.
pub fn render_bytes_literal(data: &[u8]) -> String {
    let quote = if data.contains(&b'\'') && !data.contains(&b'"') {
        b'"'
    } else {
        b'\''
    };

    let mut out = String::with_capacity(data.len() * 2 + 3);
    out.push('b');
    out.push(quote as char);
    for &byte in data {
        match byte {
            b'\\' => out.push_str("\\\\"),
            b'\t' => out.push_str("\\t"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b if b == quote => {
                out.push('\\');
                out.push(b as char);
            }
            0x20..=0x7e => out.push(byte as char),
            _ => {
                let _ = write!(out, "\\x{:02x}", byte);
            }
        }
    }
    out.push(quote as char);
    out
}
