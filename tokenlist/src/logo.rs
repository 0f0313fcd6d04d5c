//! Logo URI shapes and image sniffing
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
pub const JPEG_SIGNATURE: [u8; 2] = [0xff, 0xd8];

static RELATIVE_LOGO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\./logos/(0x[0-9a-fA-F]{40})\.png$").unwrap());
static ASSETS_LOGO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/assets/(\d+)/logos/(0x[0-9a-fA-F]{40})\.png$").unwrap());

#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Png,
    Jpeg,
    Unknown,
}

impl ImageKind {
    /// Identifies an image by its leading magic bytes.
    pub fn sniff(bytes: &[u8]) -> ImageKind {
        if bytes.starts_with(&PNG_SIGNATURE) {
            ImageKind::Png
        } else if bytes.starts_with(&JPEG_SIGNATURE) {
            ImageKind::Jpeg
        } else {
            ImageKind::Unknown
        }
    }
}

/// Width and height from a PNG's IHDR chunk, which always directly follows the signature.
pub fn png_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    if ImageKind::sniff(bytes) != ImageKind::Png || bytes.len() < 24 || &bytes[12..16] != b"IHDR"
    {
        return None;
    }

    let width = u32::from_be_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]);
    let height = u32::from_be_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]);

    Some((width, height))
}

/// The accepted shapes of a token's `logoURI`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LogoUri {
    /// `./logos/<address>.png`
    Relative { file_name: String },
    /// `/assets/<chainId>/logos/<address>.png`
    Absolute { chain_id: u64, file_name: String },
    /// `<raw_base_url>/assets/<chainId>/logos/<address>.png`
    Repository { chain_id: u64, file_name: String },
    /// Any other http(s) URL
    Remote(String),
}

impl LogoUri {
    /// Classifies `uri`, returning `None` if it matches none of the accepted shapes.
    /// URLs under `raw_base_url` only count as repository logos if their path has the
    /// logo layout; anything else under it is rejected rather than treated as remote.
    pub fn parse(uri: &str, raw_base_url: &str) -> Option<LogoUri> {
        if let Some(caps) = RELATIVE_LOGO.captures(uri) {
            return Some(LogoUri::Relative {
                file_name: format!("{}.png", &caps[1]),
            });
        }

        if let Some(caps) = ASSETS_LOGO.captures(uri) {
            return Some(LogoUri::Absolute {
                chain_id: caps[1].parse().ok()?,
                file_name: format!("{}.png", &caps[2]),
            });
        }

        let base = raw_base_url.trim_end_matches('/');
        if !base.is_empty() {
            if let Some(rest) = uri.strip_prefix(base) {
                let caps = ASSETS_LOGO.captures(rest)?;
                return Some(LogoUri::Repository {
                    chain_id: caps[1].parse().ok()?,
                    file_name: format!("{}.png", &caps[2]),
                });
            }
        }

        let url = url::Url::parse(uri).ok()?;
        if matches!(url.scheme(), "http" | "https") && url.host().is_some() {
            return Some(LogoUri::Remote(uri.to_string()));
        }

        None
    }

    /// The file name of a local logo, `None` for remote URLs.
    pub fn file_name(&self) -> Option<&str> {
        match self {
            LogoUri::Relative { file_name }
            | LogoUri::Absolute { file_name, .. }
            | LogoUri::Repository { file_name, .. } => Some(file_name),
            LogoUri::Remote(_) => None,
        }
    }

    /// The address embedded in a local logo path.
    pub fn address(&self) -> Option<&str> {
        self.file_name().and_then(|f| f.strip_suffix(".png"))
    }

    /// The chain ID embedded in the URI, if the shape carries one.
    pub fn chain_id(&self) -> Option<u64> {
        match self {
            LogoUri::Absolute { chain_id, .. } | LogoUri::Repository { chain_id, .. } => {
                Some(*chain_id)
            }
            _ => None,
        }
    }

    /// Resolves a local logo to its path inside `chain_dir`.
    pub fn local_path(&self, chain_dir: &Path) -> Option<PathBuf> {
        self.file_name()
            .map(|file_name| chain_dir.join("logos").join(file_name))
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, LogoUri::Remote(_))
    }
}
