use std::io;
use std::str::Utf8Error;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while decoding SDP text.
///
/// Every variant produced by the decoder is fatal for the whole document;
/// no partially populated description is ever returned alongside it.
#[derive(Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum Error {
    #[error("sdp: decode error '{line}'")]
    Syntax { line: String },
    #[error("sdp: unknown line type '{tag}' in '{line}'")]
    UnknownType { tag: char, line: String },
    #[error("sdp: invalid value '{value}' in '{line}'")]
    InvalidValue { value: String, line: String },
    #[error("sdp: malformed rtpmap '{0}'")]
    Rtpmap(String),
    #[error("sdp: malformed fmtp '{0}'")]
    Fmtp(String),
    #[error("sdp: line exceeds {max} bytes")]
    LineTooLong { max: usize },
    #[error("{0}")]
    Io(#[source] IoError),
    #[error("utf-8 error: {0}")]
    Utf8(#[from] Utf8Error),
    #[error("parse url: {0}")]
    ParseUrl(#[from] url::ParseError),
}

impl Error {
    pub(crate) fn syntax(line: &str) -> Self {
        Error::Syntax {
            line: line.to_owned(),
        }
    }

    pub(crate) fn invalid_value(value: &str, line: &str) -> Self {
        Error::InvalidValue {
            value: value.to_owned(),
            line: line.to_owned(),
        }
    }

    /// Returns the raw line that caused the error, if the error carries one.
    pub fn line(&self) -> Option<&str> {
        match self {
            Error::Syntax { line }
            | Error::UnknownType { line, .. }
            | Error::InvalidValue { line, .. } => Some(line),
            Error::Rtpmap(line) | Error::Fmtp(line) => Some(line),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
#[error("io error: {0}")]
pub struct IoError(#[from] pub io::Error);

// Workaround for wanting PartialEq for io::Error.
impl PartialEq for IoError {
    fn eq(&self, other: &Self) -> bool {
        self.0.kind() == other.0.kind()
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(IoError(e))
    }
}
