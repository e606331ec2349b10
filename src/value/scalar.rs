//! Scalar decoders: integers, floats, booleans, strings.

use super::{DecodeError, FromValue};

/// Strips one pair of double quotes, if present.
///
/// Returns the substring strictly between the first `"` and the next `"`
/// after it; text without a complete pair is returned verbatim, so a
/// string property may be written quoted or bare.
pub(crate) fn unquote(text: &str) -> &str {
    if let Some(first) = text.find('"') {
        let inner = &text[first + 1..];
        if let Some(len) = inner.find('"') {
            return &inner[..len];
        }
    }
    text
}

macro_rules! impl_integer {
    ($($ty:ty),+) => {
        $(
            impl FromValue for $ty {
                fn from_value(text: &str) -> Result<Self, DecodeError> {
                    // Hex literals announce themselves by their second
                    // character: '0x...' / '0X...'.
                    let parsed = match text.as_bytes().get(1) {
                        Some(b'x') | Some(b'X') => {
                            <$ty>::from_str_radix(&text[2..], 16)
                        }
                        _ => text.parse::<$ty>(),
                    };
                    parsed.map_err(|source| DecodeError::InvalidInteger {
                        text: text.to_string(),
                        source,
                    })
                }
            }
        )+
    };
}

impl_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! impl_float {
    ($($ty:ty),+) => {
        $(
            impl FromValue for $ty {
                fn from_value(text: &str) -> Result<Self, DecodeError> {
                    text.parse::<$ty>().map_err(|source| DecodeError::InvalidFloat {
                        text: text.to_string(),
                        source,
                    })
                }
            }
        )+
    };
}

impl_float!(f32, f64);

impl FromValue for bool {
    fn from_value(text: &str) -> Result<Self, DecodeError> {
        if text.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if text.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err(DecodeError::InvalidBool(text.to_string()))
        }
    }
}

impl FromValue for String {
    fn from_value(text: &str) -> Result<Self, DecodeError> {
        Ok(unquote(text).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_integers() {
        assert_eq!(i64::from_value("42").unwrap(), 42);
        assert_eq!(i64::from_value("-17").unwrap(), -17);
        assert_eq!(u16::from_value("8080").unwrap(), 8080);
    }

    #[test]
    fn test_hex_integers() {
        assert_eq!(i64::from_value("0xAB").unwrap(), 171);
        assert_eq!(i64::from_value("0XFF").unwrap(), 255);
        assert_eq!(u32::from_value("0x10").unwrap(), 16);
    }

    #[test]
    fn test_malformed_integer() {
        let result = i64::from_value("forty-two");
        assert!(matches!(result, Err(DecodeError::InvalidInteger { .. })));

        let result = i64::from_value("");
        assert!(matches!(result, Err(DecodeError::InvalidInteger { .. })));
    }

    #[test]
    fn test_floats() {
        assert_eq!(f64::from_value("3.14159").unwrap(), 3.14159);
        assert_eq!(f32::from_value("-0.5").unwrap(), -0.5);
        assert!(matches!(
            f64::from_value("pi"),
            Err(DecodeError::InvalidFloat { .. })
        ));
    }

    #[test]
    fn test_bools() {
        assert!(bool::from_value("true").unwrap());
        assert!(bool::from_value("TRUE").unwrap());
        assert!(!bool::from_value("false").unwrap());
        assert!(matches!(
            bool::from_value("yes"),
            Err(DecodeError::InvalidBool(_))
        ));
    }

    #[test]
    fn test_bare_string() {
        assert_eq!(String::from_value("localhost").unwrap(), "localhost");
    }

    #[test]
    fn test_quoted_string() {
        assert_eq!(
            String::from_value("\"Hello World\"").unwrap(),
            "Hello World"
        );
    }

    #[test]
    fn test_quotes_mid_text() {
        assert_eq!(String::from_value("say \"hi\" now").unwrap(), "hi");
    }

    #[test]
    fn test_unclosed_quote_is_verbatim() {
        assert_eq!(String::from_value("\"dangling").unwrap(), "\"dangling");
    }
}
