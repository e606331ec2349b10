//! Type-directed decoding of raw property text.
//!
//! Property values are stored verbatim by the parser; nothing is decoded
//! until a caller asks for a concrete type. [`FromValue`] is the dispatch
//! point: the requested type alone decides how the text is read, so the
//! same property can be decoded more than once with different targets
//! (`"4"` as an `i64`, or as a `String`).

mod error;
mod scalar;
mod seq;
mod tuple;

pub use error::DecodeError;

pub(crate) use scalar::unquote;
pub(crate) use tuple::Tokens;

/// A type that can be decoded from raw property text.
///
/// Implemented for the integer and float primitives, `bool`, `String`,
/// tuples of up to eight fields, and `Vec<T>` for any `T: FromValue`.
///
/// ## Example
///
/// ```
/// use stanza::FromValue;
///
/// let size = <Vec<i64>>::from_value("[1920, 1080]").unwrap();
/// assert_eq!(size, vec![1920, 1080]);
/// ```
pub trait FromValue: Sized {
    /// Marks types that decode from a bracketed `[...]` list.
    ///
    /// The `Vec<T>` decoder consults this to choose between the flat
    /// comma-split and the nesting-aware element scan. The choice is made
    /// from the requested type, never by sniffing the text, so a caller
    /// must ask for the correct nesting depth.
    const IS_SEQUENCE: bool = false;

    /// Decodes `text` into `Self`.
    ///
    /// `text` is expected to be pre-trimmed of surrounding whitespace;
    /// the parser guarantees this for stored property values.
    fn from_value(text: &str) -> Result<Self, DecodeError>;
}
