//! Tuple decoding: space-separated positional tokens.

use super::{DecodeError, FromValue};

/// Cursor over the space-separated tokens of a tuple literal.
///
/// A token opening with `"` runs up to (not including) the next `"`,
/// consuming one trailing space after the closing quote; any other token
/// is a maximal run of non-space characters. An exhausted cursor yields
/// the empty token, letting the field decoder report the failure.
pub(crate) struct Tokens<'a> {
    rest: &'a str,
}

impl<'a> Tokens<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self { rest: text }
    }

    pub(crate) fn next(&mut self) -> &'a str {
        self.rest = self.rest.trim_start_matches(' ');

        if let Some(inner) = self.rest.strip_prefix('"') {
            match inner.find('"') {
                Some(end) => {
                    let token = &inner[..end];
                    self.rest = inner[end + 1..].strip_prefix(' ').unwrap_or(&inner[end + 1..]);
                    token
                }
                None => {
                    // Unclosed quote: the remainder is the token.
                    self.rest = "";
                    inner
                }
            }
        } else {
            match self.rest.find(' ') {
                Some(split) => {
                    let token = &self.rest[..split];
                    self.rest = &self.rest[split + 1..];
                    token
                }
                None => {
                    let token = self.rest;
                    self.rest = "";
                    token
                }
            }
        }
    }
}

macro_rules! impl_tuple {
    ($($idx:tt $field:ident)+) => {
        impl<$($field: FromValue),+> FromValue for ($($field,)+) {
            fn from_value(text: &str) -> Result<Self, DecodeError> {
                let mut tokens = Tokens::new(text);
                Ok(($(
                    $field::from_value(tokens.next()).map_err(|e| {
                        DecodeError::TupleField {
                            index: $idx,
                            source: Box::new(e),
                        }
                    })?,
                )+))
            }
        }
    };
}

impl_tuple!(0 A);
impl_tuple!(0 A 1 B);
impl_tuple!(0 A 1 B 2 C);
impl_tuple!(0 A 1 B 2 C 3 D);
impl_tuple!(0 A 1 B 2 C 3 D 4 E);
impl_tuple!(0 A 1 B 2 C 3 D 4 E 5 F);
impl_tuple!(0 A 1 B 2 C 3 D 4 E 5 F 6 G);
impl_tuple!(0 A 1 B 2 C 3 D 4 E 5 F 6 G 7 H);
