use crate::config::ParseError;
use crate::value::DecodeError;
use thiserror::Error;

/// Top-level error type for the stanza library.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
}
