//! Byte-level codecs used by the lyrics containers
//!
//! - zlib deflate streams (HRCX, HRCS, KRC payload)
//! - KRC obfuscation: `krc1` magic + XOR with a fixed 16-byte key
//! - standard Base64 for embedded JSON and for lyrics fetched as text

use crate::error::{LyricsError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::{Read, Write};

/// Magic bytes at the start of every KRC file
pub const KRC_MAGIC: &[u8; 4] = b"krc1";

/// XOR key applied to the compressed KRC payload
const KRC_KEY: [u8; 16] = [
    0x40, 0x47, 0x61, 0x77, 0x5E, 0x32, 0x74, 0x47, 0x51, 0x36, 0x31, 0x2D, 0xCE, 0xD2, 0x6E, 0x69,
];

/// Deflate UTF-8 text into a zlib stream
pub fn compress(text: &str) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes())?;
    encoder
        .finish()
        .map_err(|e| LyricsError::Compression(e.to_string()))
}

/// Inflate a zlib stream into raw bytes
pub fn decompress(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(bytes);
    let mut out = Vec::with_capacity(bytes.len() * 4);
    decoder
        .read_to_end(&mut out)
        .map_err(|e| LyricsError::Compression(e.to_string()))?;
    Ok(out)
}

fn xor_in_place(bytes: &mut [u8]) {
    for (k, b) in bytes.iter_mut().enumerate() {
        *b ^= KRC_KEY[k % KRC_KEY.len()];
    }
}

/// Undo KRC obfuscation, returning the decompressed bytes
pub fn krc_decrypt(bytes: &[u8]) -> Result<Vec<u8>> {
    let payload = bytes
        .strip_prefix(KRC_MAGIC.as_slice())
        .ok_or_else(|| LyricsError::malformed("KRC", "missing krc1 header"))?;

    let mut payload = payload.to_vec();
    xor_in_place(&mut payload);
    decompress(&payload)
}

/// Compress, obfuscate and prefix text as a KRC file body
pub fn krc_encrypt(text: &str) -> Result<Vec<u8>> {
    let mut payload = compress(text)?;
    xor_in_place(&mut payload);

    let mut out = Vec::with_capacity(KRC_MAGIC.len() + payload.len());
    out.extend_from_slice(KRC_MAGIC);
    out.extend_from_slice(&payload);
    Ok(out)
}

pub fn base64_encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode standard Base64, ignoring embedded whitespace
pub fn base64_decode(text: &str) -> Result<Vec<u8>> {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    Ok(STANDARD.decode(cleaned)?)
}

/// Decode bytes as UTF-8 text, dropping a BOM and replacing invalid sequences
pub fn decode_text(bytes: &[u8], format: &'static str) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF".as_slice()).unwrap_or(bytes);
    match String::from_utf8_lossy(bytes) {
        std::borrow::Cow::Borrowed(s) => s.to_string(),
        std::borrow::Cow::Owned(s) => {
            tracing::warn!(format, "Lyrics text is not valid UTF-8, invalid bytes replaced");
            s
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compress_decompress() {
        let text = "haplayer.lrc('0','作词','<0,300,0>');\n".repeat(20);
        let packed = compress(&text).unwrap();
        assert!(packed.len() < text.len());
        // zlib header
        assert_eq!(packed[0], 0x78);
        assert_eq!(decompress(&packed).unwrap(), text.as_bytes());
    }

    #[test]
    fn test_decompress_rejects_garbage() {
        assert!(matches!(
            decompress(b"definitely not zlib"),
            Err(LyricsError::Compression(_))
        ));
    }

    #[test]
    fn test_krc_envelope() {
        let body = krc_encrypt("[ti:test]\n").unwrap();
        assert_eq!(&body[..4], KRC_MAGIC);
        // payload is obfuscated, so it must not start with a plain zlib header
        assert_ne!(body[4], 0x78);
        assert_eq!(krc_decrypt(&body).unwrap(), b"[ti:test]\n");
    }

    #[test]
    fn test_krc_requires_magic() {
        let err = krc_decrypt(b"krc2....").unwrap_err();
        assert!(matches!(err, LyricsError::Malformed { format: "KRC", .. }));
    }

    #[test]
    fn test_base64_tolerates_whitespace() {
        let encoded = base64_encode("歌词".as_bytes());
        let spaced = format!("{}\n{}", &encoded[..4], &encoded[4..]);
        assert_eq!(base64_decode(&spaced).unwrap(), "歌词".as_bytes());
        assert!(base64_decode("!!!").is_err());
    }

    #[test]
    fn test_decode_text_strips_bom_and_replaces_invalid() {
        assert_eq!(decode_text(b"\xEF\xBB\xBF[ti:a]", "LRC"), "[ti:a]");
        assert_eq!(decode_text(b"a\xFFb", "LRC"), "a\u{FFFD}b");
    }
}
