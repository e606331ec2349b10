//! Sequence decoding: flat `[a, b, c]` and nested `[[...], [...]]` lists.

use super::{DecodeError, FromValue};

impl<T: FromValue> FromValue for Vec<T> {
    const IS_SEQUENCE: bool = true;

    fn from_value(text: &str) -> Result<Self, DecodeError> {
        if T::IS_SEQUENCE {
            decode_nested(text)
        } else {
            decode_flat(text)
        }
    }
}

/// Scalar-element case: split the bracket body on every comma.
///
/// A plain comma scan is sufficient here; the element type is scalar, so
/// no comma can be nested.
fn decode_flat<T: FromValue>(text: &str) -> Result<Vec<T>, DecodeError> {
    let open = text
        .find('[')
        .ok_or_else(|| DecodeError::MissingBracket(text.to_string()))?;
    let close = text
        .rfind(']')
        .filter(|&close| close > open)
        .ok_or_else(|| DecodeError::MissingBracket(text.to_string()))?;

    let body = &text[open + 1..close];
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    body.split(',')
        .map(|segment| T::from_value(segment.trim()))
        .collect()
}

/// Sequence-element case: walk the text tracking bracket depth and emit
/// one element for each balanced `[...]` run seen directly inside the
/// outer brackets. The walk stops once the outer bracket closes; seeing
/// the end of input first means the brackets never balanced.
fn decode_nested<T: FromValue>(text: &str) -> Result<Vec<T>, DecodeError> {
    let open = text
        .find('[')
        .ok_or_else(|| DecodeError::MissingBracket(text.to_string()))?;

    let mut elements = Vec::new();
    let mut level = 1usize;
    let mut start = open;
    let bytes = text.as_bytes();

    let mut idx = open + 1;
    while idx < bytes.len() && level > 0 {
        match bytes[idx] {
            b'[' => {
                level += 1;
                if level == 2 {
                    start = idx;
                }
            }
            b']' => {
                level -= 1;
                if level == 1 {
                    elements.push(T::from_value(&text[start..=idx])?);
                }
            }
            _ => {}
        }
        idx += 1;
    }

    if level > 0 {
        return Err(DecodeError::UnmatchedBracket(text.to_string()));
    }

    Ok(elements)
}
