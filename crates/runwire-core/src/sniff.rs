//! Byte sniffing — coarse file type from leading magic bytes.
//!
//! This is a label, not a validator. Anything that matches no signature is
//! tagged `string`, whether or not it is decodable text.

use serde::Serialize;
use std::fmt;

/// Only this many leading bytes are ever inspected.
pub const SNIFF_LEN: usize = 262;

/// Coarse type tag attached to every binary payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    Jpg,
    Png,
    Gif,
    Webp,
    Wav,
    Avi,
    Pdf,
    Zip,
    Gz,
    Bz2,
    #[serde(rename = "7z")]
    SevenZ,
    Tif,
    Bmp,
    Ico,
    Mp3,
    Ogg,
    Flac,
    Mov,
    Heic,
    Mp4,
    Webm,
    Mkv,
    Wasm,
    Psd,
    /// Generic fallback.
    String,
}

impl TypeTag {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Jpg => "jpg",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Webp => "webp",
            Self::Wav => "wav",
            Self::Avi => "avi",
            Self::Pdf => "pdf",
            Self::Zip => "zip",
            Self::Gz => "gz",
            Self::Bz2 => "bz2",
            Self::SevenZ => "7z",
            Self::Tif => "tif",
            Self::Bmp => "bmp",
            Self::Ico => "ico",
            Self::Mp3 => "mp3",
            Self::Ogg => "ogg",
            Self::Flac => "flac",
            Self::Mov => "mov",
            Self::Heic => "heic",
            Self::Mp4 => "mp4",
            Self::Webm => "webm",
            Self::Mkv => "mkv",
            Self::Wasm => "wasm",
            Self::Psd => "psd",
            Self::String => "string",
        }
    }

    /// File extension used when naming an upload part.
    pub fn extension(self) -> &'static str {
        match self {
            Self::String => "txt",
            other => other.as_str(),
        }
    }

    /// MIME type used for an upload part's Content-Type.
    pub fn mime(self) -> &'static str {
        match self {
            Self::Jpg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
            Self::Wav => "audio/wav",
            Self::Avi => "video/x-msvideo",
            Self::Pdf => "application/pdf",
            Self::Zip => "application/zip",
            Self::Gz => "application/gzip",
            Self::Bz2 => "application/x-bzip2",
            Self::SevenZ => "application/x-7z-compressed",
            Self::Tif => "image/tiff",
            Self::Bmp => "image/bmp",
            Self::Ico => "image/x-icon",
            Self::Mp3 => "audio/mpeg",
            Self::Ogg => "audio/ogg",
            Self::Flac => "audio/flac",
            Self::Mov => "video/quicktime",
            Self::Heic => "image/heic",
            Self::Mp4 => "video/mp4",
            Self::Webm => "video/webm",
            Self::Mkv => "video/x-matroska",
            Self::Wasm => "application/wasm",
            Self::Psd => "image/vnd.adobe.photoshop",
            Self::String => "text/plain",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Signature table ───────────────────────────────────────────────────────────

/// Every `(offset, bytes)` pair must match for the pattern to match.
type Pattern = &'static [(usize, &'static [u8])];

/// Checked in order; the first matching pattern wins. Container formats with
/// a shared outer header (RIFF, ISO-BMFF) list their specific sub-types first.
const SIGNATURES: &[(TypeTag, Pattern)] = &[
    (TypeTag::Jpg, &[(0, &[0xFF, 0xD8, 0xFF])]),
    (TypeTag::Png, &[(0, &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A])]),
    (TypeTag::Gif, &[(0, b"GIF87a")]),
    (TypeTag::Gif, &[(0, b"GIF89a")]),
    (TypeTag::Webp, &[(0, b"RIFF"), (8, b"WEBP")]),
    (TypeTag::Wav, &[(0, b"RIFF"), (8, b"WAVE")]),
    (TypeTag::Avi, &[(0, b"RIFF"), (8, b"AVI ")]),
    (TypeTag::Pdf, &[(0, b"%PDF")]),
    (TypeTag::Zip, &[(0, &[b'P', b'K', 0x03, 0x04])]),
    (TypeTag::Zip, &[(0, &[b'P', b'K', 0x05, 0x06])]),
    (TypeTag::Zip, &[(0, &[b'P', b'K', 0x07, 0x08])]),
    (TypeTag::Gz, &[(0, &[0x1F, 0x8B, 0x08])]),
    (TypeTag::Bz2, &[(0, b"BZh")]),
    (TypeTag::SevenZ, &[(0, &[b'7', b'z', 0xBC, 0xAF, 0x27, 0x1C])]),
    (TypeTag::Tif, &[(0, &[b'I', b'I', 0x2A, 0x00])]),
    (TypeTag::Tif, &[(0, &[b'M', b'M', 0x00, 0x2A])]),
    (TypeTag::Psd, &[(0, b"8BPS")]),
    (TypeTag::Ico, &[(0, &[0x00, 0x00, 0x01, 0x00])]),
    (TypeTag::Wasm, &[(0, &[0x00, b'a', b's', b'm'])]),
    (TypeTag::Mp3, &[(0, b"ID3")]),
    (TypeTag::Mp3, &[(0, &[0xFF, 0xFB])]),
    (TypeTag::Ogg, &[(0, b"OggS")]),
    (TypeTag::Flac, &[(0, b"fLaC")]),
    (TypeTag::Mov, &[(4, b"ftyp"), (8, b"qt  ")]),
    (TypeTag::Heic, &[(4, b"ftyp"), (8, b"heic")]),
    (TypeTag::Heic, &[(4, b"ftyp"), (8, b"heix")]),
    (TypeTag::Heic, &[(4, b"ftyp"), (8, b"mif1")]),
    (TypeTag::Mp4, &[(4, b"ftyp")]),
    (TypeTag::Mkv, &[(0, &[0x1A, 0x45, 0xDF, 0xA3])]),
    (TypeTag::Bmp, &[(0, b"BM")]),
];

fn matches(prefix: &[u8], pattern: &[(usize, &[u8])]) -> bool {
    pattern.iter().all(|(offset, magic)| {
        prefix
            .get(*offset..*offset + magic.len())
            .is_some_and(|window| window == *magic)
    })
}

/// Classify a buffer by its leading bytes.
///
/// Never fails: empty and short inputs simply match nothing and come back as
/// [`TypeTag::String`].
pub fn classify(bytes: &[u8]) -> TypeTag {
    let prefix = &bytes[..bytes.len().min(SNIFF_LEN)];
    let tag = SIGNATURES
        .iter()
        .find(|(_, pattern)| matches(prefix, pattern))
        .map(|(tag, _)| *tag)
        .unwrap_or(TypeTag::String);

    // WebM is Matroska with a "webm" DocType element inside the EBML header.
    if tag == TypeTag::Mkv && prefix.windows(4).any(|w| w == b"webm") {
        return TypeTag::Webm;
    }
    tag
}
