use serde::{Deserialize, Serialize};
use std::{fmt, path::PathBuf};
use thiserror::Error;

// Higher level errors: TokenListError is fatal and ends a run, ViolationKind is collected into reports
#[derive(Debug, Error)]
pub enum TokenListError {
    #[error("error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("error serializing token list: {0}")]
    Json(#[from] serde_json::error::Error),
    #[error("error during token list request: {0}")]
    Request(#[from] reqwest::Error),
    #[error("{0}")]
    InvalidChainDirectory(String),
    #[error("{0} has no \"tokens\" array")]
    InvalidDocument(String),
    #[error("{0}")]
    Address(#[from] AddressError),
}

impl TokenListError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TokenListError::Io {
            path: path.into(),
            source,
        }
    }
}

// Lower level errors; should be used by higher level errors
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("address must start with 0x: {0}")]
    MissingPrefix(String),
    #[error("address must have 40 hex digits, got {1}: {0}")]
    InvalidLength(String, usize),
    #[error("address contains non-hex characters: {0}")]
    InvalidHex(String),
}

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("server responded with status {0}")]
    Status(u16),
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

/// Non-fatal validation failures. These are collected per token and per file, never thrown.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Deserialize, Serialize)]
pub enum ViolationKind {
    ParseError,
    SchemaError,
    FieldError,
    TypeError,
    AddressFormatError,
    DuplicateAddressError,
    ChainIdMismatchError,
    SubsetViolationError,
    MissingLogoFile,
    InvalidLogoFormat,
    OversizedLogoFile,
    #[serde(rename = "UnreachableURL")]
    UnreachableUrl,
    MissingDocument,
}

impl ViolationKind {
    /// Logo problems are counted separately from invalid files.
    pub fn is_logo(&self) -> bool {
        matches!(
            self,
            ViolationKind::MissingLogoFile
                | ViolationKind::InvalidLogoFormat
                | ViolationKind::OversizedLogoFile
        )
    }

    /// Warnings are reported but never fail the run.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            ViolationKind::OversizedLogoFile | ViolationKind::UnreachableUrl
        )
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViolationKind::ParseError => "ParseError",
            ViolationKind::SchemaError => "SchemaError",
            ViolationKind::FieldError => "FieldError",
            ViolationKind::TypeError => "TypeError",
            ViolationKind::AddressFormatError => "AddressFormatError",
            ViolationKind::DuplicateAddressError => "DuplicateAddressError",
            ViolationKind::ChainIdMismatchError => "ChainIdMismatchError",
            ViolationKind::SubsetViolationError => "SubsetViolationError",
            ViolationKind::MissingLogoFile => "MissingLogoFile",
            ViolationKind::InvalidLogoFormat => "InvalidLogoFormat",
            ViolationKind::OversizedLogoFile => "OversizedLogoFile",
            ViolationKind::UnreachableUrl => "UnreachableURL",
            ViolationKind::MissingDocument => "MissingDocument",
        };

        f.write_str(name)
    }
}

/// A single collected validation failure.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub message: String,
}

impl Violation {
    pub fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
        Violation {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}
