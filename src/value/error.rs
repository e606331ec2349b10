use std::num::{ParseFloatError, ParseIntError};

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DecodeError {
    #[error("invalid integer literal '{text}': {source}")]
    InvalidInteger {
        text: String,
        source: ParseIntError,
    },

    #[error("invalid float literal '{text}': {source}")]
    InvalidFloat {
        text: String,
        source: ParseFloatError,
    },

    #[error("invalid boolean literal '{0}'")]
    InvalidBool(String),

    #[error("missing '[' or ']' in array literal '{0}'")]
    MissingBracket(String),

    #[error("unmatched '[' in array literal '{0}'")]
    UnmatchedBracket(String),

    #[error("tuple field {index}: {source}")]
    TupleField {
        index: usize,
        source: Box<DecodeError>,
    },

    #[error("{0}")]
    Message(String),
}
