//! Content hashing and classification of buffered file bytes.

use sha2::{Digest, Sha256};

/// Number of leading bytes inspected when sniffing content.
const SNIFF_LEN: usize = 512;

/// Fallback type for content that matches no signature.
pub const OCTET_STREAM: &str = "application/octet-stream";

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Hash, sniffed MIME type, and extension token of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Lowercase hex SHA-256 of the exact bytes.
    pub content_hash: String,
    /// Sniffed MIME type.
    pub mime: String,
    /// Lowercase token after the last `.` of the file name, or empty.
    pub extension: String,
}

/// Classify a file from its name and contents.
///
/// Deterministic: identical inputs always produce identical output.
pub fn classify(name: &str, bytes: &[u8]) -> Classification {
    let extension = extension_of(name);
    let mut mime = sniff_mime(bytes).to_string();

    if mime == OCTET_STREAM && !extension.is_empty() {
        if let Some(guess) = mime_guess::from_ext(&extension).first() {
            mime = guess.essence_str().to_string();
        }
    }

    Classification {
        content_hash: sha256_hex(bytes),
        mime,
        extension,
    }
}

/// Hex-encoded SHA-256 digest.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Extension policy: the token after the **last** `.` of the base name,
/// lowercased. Names without a dot, hidden files such as `.env`, and names
/// ending in `.` have no extension.
pub fn extension_of(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    match base.rfind('.') {
        None | Some(0) => String::new(),
        Some(dot) => base[dot + 1..].to_lowercase(),
    }
}

/// Sniff a MIME type from leading content bytes.
pub fn sniff_mime(bytes: &[u8]) -> &'static str {
    let data = &bytes[..bytes.len().min(SNIFF_LEN)];
    if data.is_empty() {
        return TEXT_PLAIN;
    }

    if let Some(mime) = match_markup(data) {
        return mime;
    }
    if let Some(mime) = match_signature(data) {
        return mime;
    }
    if data.iter().all(|b| !is_binary_byte(*b)) {
        return TEXT_PLAIN;
    }
    OCTET_STREAM
}

/// Exact-prefix magic numbers.
const SIGNATURES: &[(&[u8], &str)] = &[
    (b"%PDF-", "application/pdf"),
    (b"%!PS-Adobe-", "application/postscript"),
    (b"\xFE\xFF", "text/plain; charset=utf-16be"),
    (b"\xFF\xFE", "text/plain; charset=utf-16le"),
    (b"\xEF\xBB\xBF", TEXT_PLAIN),
    (b"GIF87a", "image/gif"),
    (b"GIF89a", "image/gif"),
    (b"\x89PNG\r\n\x1A\n", "image/png"),
    (b"\xFF\xD8\xFF", "image/jpeg"),
    (b"BM", "image/bmp"),
    (b"\x00\x00\x01\x00", "image/x-icon"),
    (b"\x00\x00\x02\x00", "image/x-icon"),
    (b"OggS\x00", "application/ogg"),
    (b"ID3", "audio/mpeg"),
    (b"PK\x03\x04", "application/zip"),
    (b"\x1F\x8B\x08", "application/x-gzip"),
    (b"Rar!\x1A\x07", "application/x-rar-compressed"),
    (b"7z\xBC\xAF\x27\x1C", "application/x-7z-compressed"),
    (b"\x00asm", "application/wasm"),
];

fn match_signature(data: &[u8]) -> Option<&'static str> {
    if let Some((_, mime)) = SIGNATURES.iter().find(|(sig, _)| data.starts_with(sig)) {
        return Some(*mime);
    }

    if data.len() >= 12 && data.starts_with(b"RIFF") {
        match &data[8..12] {
            b"WEBP" => return Some("image/webp"),
            b"WAVE" => return Some("audio/wave"),
            b"AVI " => return Some("video/avi"),
            _ => {}
        }
    }

    if data.len() >= 12 && &data[4..8] == b"ftyp" {
        return Some("video/mp4");
    }

    None
}

/// HTML tags recognised at the start of a document, matched
/// case-insensitively and terminated by a space or `>`.
const HTML_TAGS: &[&[u8]] = &[
    b"<!DOCTYPE HTML",
    b"<HTML",
    b"<HEAD",
    b"<SCRIPT",
    b"<IFRAME",
    b"<H1",
    b"<DIV",
    b"<FONT",
    b"<TABLE",
    b"<A",
    b"<STYLE",
    b"<TITLE",
    b"<B",
    b"<BODY",
    b"<BR",
    b"<P",
    b"<!--",
];

fn match_markup(data: &[u8]) -> Option<&'static str> {
    let start = data
        .iter()
        .position(|b| !matches!(b, b'\t' | b'\n' | b'\x0C' | b'\r' | b' '))?;
    let data = &data[start..];

    for tag in HTML_TAGS {
        if data.len() > tag.len()
            && data[..tag.len()].eq_ignore_ascii_case(tag)
            && matches!(data[tag.len()], b' ' | b'>')
        {
            return Some("text/html; charset=utf-8");
        }
    }

    if data.starts_with(b"<?xml") {
        return Some("text/xml; charset=utf-8");
    }
    None
}

/// Control bytes that never appear in plain text.
fn is_binary_byte(b: u8) -> bool {
    matches!(b, 0x00..=0x08 | 0x0B | 0x0E..=0x1A | 0x1C..=0x1F)
}
