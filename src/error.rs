//! Error types for the ingestion and aggregation pipeline.

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error for every fallible pipeline step.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("I/O error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// File the failed I/O operation targeted, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Error::Io { path, .. } => Some(path.as_path()),
            _ => None,
        }
    }

    /// Returns `true` when the error is a missing file.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

/// Network or transport failure while downloading the dataset.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request to {url} failed")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid dataset URL: {url}")]
    InvalidUrl { url: String },
}

/// A canonical-file line that could not be turned into a record.
#[derive(Error, Debug, PartialEq)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    /// 1-based line number in the canonical file.
    pub line: usize,
    pub kind: ParseErrorKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    FieldCount { expected: usize, found: usize },
    Mpg(String),
    Year(String),
    MissingName,
    UnterminatedQuote,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::FieldCount { expected, found } => {
                write!(f, "expected {expected} fields, found {found}")
            }
            ParseErrorKind::Mpg(raw) => write!(f, "mpg is not a number: {raw:?}"),
            ParseErrorKind::Year(raw) => write!(f, "model year is not an integer: {raw:?}"),
            ParseErrorKind::MissingName => write!(f, "make/model name is empty"),
            ParseErrorKind::UnterminatedQuote => write!(f, "unterminated quoted name"),
        }
    }
}
