//! serde integration: deserialize sections into caller structs.
//!
//! A [`Node`] deserializes as a map of its properties and child sections;
//! raw property text deserializes by the requested type, through the same
//! literal grammar as [`FromValue`](crate::FromValue). This lets a caller
//! map one section, or the whole registry, onto a
//! `#[derive(Deserialize)]` struct instead of pulling values out one
//! `get` at a time.
//!
//! ## Example
//!
//! ```
//! use serde::Deserialize;
//! use stanza::Config;
//!
//! #[derive(Deserialize)]
//! struct Server {
//!     host: String,
//!     port: u16,
//! }
//!
//! let mut config = Config::new();
//! config.parse_str("[server]\n    host: localhost\n    port: 8080\n");
//!
//! let server: Server = config.section("server").deserialize().unwrap().unwrap();
//! assert_eq!(server.host, "localhost");
//! assert_eq!(server.port, 8080);
//! ```

use std::collections::btree_map;
use std::fmt;

use serde::de::{
    self, Deserialize, DeserializeSeed, Deserializer, IntoDeserializer, MapAccess, SeqAccess,
    Visitor,
};
use serde::forward_to_deserialize_any;

use crate::config::{Config, Node, NodeRef};
use crate::value::{unquote, DecodeError, FromValue, Tokens};

impl de::Error for DecodeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        DecodeError::Message(msg.to_string())
    }
}

impl<'a> NodeRef<'a> {
    /// Deserializes this section into `T`.
    ///
    /// A missing node yields `Ok(None)`; a present section that cannot be
    /// shaped into `T` is an error.
    pub fn deserialize<T: Deserialize<'a>>(self) -> Result<Option<T>, DecodeError> {
        match self.node() {
            Some(node) => T::deserialize(NodeDeserializer::new(node)).map(Some),
            None => Ok(None),
        }
    }
}

impl Config {
    /// Deserializes the whole registry into `T`, with one field per
    /// top-level section.
    pub fn deserialize<'de, T: Deserialize<'de>>(&'de self) -> Result<T, DecodeError> {
        T::deserialize(RegistryDeserializer { config: self })
    }
}

/// Deserializer over a parsed [`Node`]: behaves as a map of properties
/// followed by child sections.
struct NodeDeserializer<'de> {
    node: &'de Node,
}

impl<'de> NodeDeserializer<'de> {
    fn new(node: &'de Node) -> Self {
        Self { node }
    }
}

impl<'de> Deserializer<'de> for NodeDeserializer<'de> {
    type Error = DecodeError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        self.deserialize_map(visitor)
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        visitor.visit_map(NodeAccess::new(self.node))
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        self.deserialize_map(visitor)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        visitor.visit_some(self)
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct newtype_struct seq tuple tuple_struct
        enum identifier ignored_any
    }
}

enum Pending<'de> {
    Property(&'de str),
    Child(&'de Node),
}

struct NodeAccess<'de> {
    properties: btree_map::Iter<'de, String, String>,
    children: btree_map::Iter<'de, String, Node>,
    pending: Option<Pending<'de>>,
}

impl<'de> NodeAccess<'de> {
    fn new(node: &'de Node) -> Self {
        Self {
            properties: node.properties().iter(),
            children: node.child_map().iter(),
            pending: None,
        }
    }
}

impl<'de> MapAccess<'de> for NodeAccess<'de> {
    type Error = DecodeError;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        seed: K,
    ) -> Result<Option<K::Value>, DecodeError> {
        if let Some((key, raw)) = self.properties.next() {
            self.pending = Some(Pending::Property(raw));
            return seed.deserialize(key.as_str().into_deserializer()).map(Some);
        }
        if let Some((name, child)) = self.children.next() {
            self.pending = Some(Pending::Child(child));
            return seed.deserialize(name.as_str().into_deserializer()).map(Some);
        }
        Ok(None)
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(
        &mut self,
        seed: V,
    ) -> Result<V::Value, DecodeError> {
        match self.pending.take() {
            Some(Pending::Property(raw)) => seed.deserialize(ValueDeserializer::new(raw)),
            Some(Pending::Child(node)) => seed.deserialize(NodeDeserializer::new(node)),
            None => Err(de::Error::custom("value requested before key")),
        }
    }
}

/// Deserializer over the root registry: a map with one entry per
/// top-level section.
struct RegistryDeserializer<'de> {
    config: &'de Config,
}

impl<'de> Deserializer<'de> for RegistryDeserializer<'de> {
    type Error = DecodeError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        visitor.visit_map(RegistryAccess {
            roots: self.config.roots().iter(),
            pending: None,
        })
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        self.deserialize_any(visitor)
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct newtype_struct seq tuple
        tuple_struct map enum identifier ignored_any
    }
}

struct RegistryAccess<'de> {
    roots: btree_map::Iter<'de, String, Node>,
    pending: Option<&'de Node>,
}

impl<'de> MapAccess<'de> for RegistryAccess<'de> {
    type Error = DecodeError;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        seed: K,
    ) -> Result<Option<K::Value>, DecodeError> {
        match self.roots.next() {
            Some((name, node)) => {
                self.pending = Some(node);
                seed.deserialize(name.as_str().into_deserializer()).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(
        &mut self,
        seed: V,
    ) -> Result<V::Value, DecodeError> {
        match self.pending.take() {
            Some(node) => seed.deserialize(NodeDeserializer::new(node)),
            None => Err(de::Error::custom("value requested before key")),
        }
    }
}

/// Deserializer over one property's raw text. The requested type picks
/// the decoding, mirroring the [`FromValue`](crate::FromValue) rules.
struct ValueDeserializer<'de> {
    text: &'de str,
}

impl<'de> ValueDeserializer<'de> {
    fn new(text: &'de str) -> Self {
        Self { text }
    }
}

macro_rules! decode_primitive {
    ($($method:ident => $ty:ty, $visit:ident;)+) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
                visitor.$visit(<$ty>::from_value(self.text)?)
            }
        )+
    };
}

impl<'de> Deserializer<'de> for ValueDeserializer<'de> {
    type Error = DecodeError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        visitor.visit_borrowed_str(unquote(self.text))
    }

    decode_primitive! {
        deserialize_bool => bool, visit_bool;
        deserialize_i8 => i8, visit_i8;
        deserialize_i16 => i16, visit_i16;
        deserialize_i32 => i32, visit_i32;
        deserialize_i64 => i64, visit_i64;
        deserialize_u8 => u8, visit_u8;
        deserialize_u16 => u16, visit_u16;
        deserialize_u32 => u32, visit_u32;
        deserialize_u64 => u64, visit_u64;
        deserialize_f32 => f32, visit_f32;
        deserialize_f64 => f64, visit_f64;
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        let text = unquote(self.text);
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => visitor.visit_char(c),
            _ => Err(de::Error::custom(format!(
                "expected a single character, got '{text}'"
            ))),
        }
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        visitor.visit_borrowed_str(unquote(self.text))
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        self.deserialize_str(visitor)
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        self.deserialize_str(visitor)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        let elements = split_elements(self.text)?;
        visitor.visit_seq(ElementAccess {
            elements: elements.into_iter(),
        })
    }

    fn deserialize_tuple<V: Visitor<'de>>(
        self,
        len: usize,
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        visitor.visit_seq(TokenAccess {
            tokens: Tokens::new(self.text),
            remaining: len,
        })
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        self.deserialize_tuple(len, visitor)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        visitor.visit_enum(unquote(self.text).into_deserializer())
    }

    forward_to_deserialize_any! {
        i128 u128 bytes byte_buf unit unit_struct map struct ignored_any
    }
}

/// Splits a bracket body into elements at depth-0 commas.
///
/// Unlike the `FromValue` sequence decoder, serde cannot see the element
/// type before reading, so the splitter tracks bracket depth to keep
/// nested elements whole.
fn split_elements(text: &str) -> Result<Vec<&str>, DecodeError> {
    let open = text
        .find('[')
        .ok_or_else(|| DecodeError::MissingBracket(text.to_string()))?;

    let bytes = text.as_bytes();
    let mut elements = Vec::new();
    let mut level = 1usize;
    let mut start = open + 1;
    let mut close = None;

    let mut idx = open + 1;
    while idx < bytes.len() {
        match bytes[idx] {
            b'[' => level += 1,
            b']' => {
                level -= 1;
                if level == 0 {
                    close = Some(idx);
                    break;
                }
            }
            b',' if level == 1 => {
                elements.push(text[start..idx].trim());
                start = idx + 1;
            }
            _ => {}
        }
        idx += 1;
    }

    let close = close.ok_or_else(|| DecodeError::UnmatchedBracket(text.to_string()))?;
    let last = text[start..close].trim();
    if !(elements.is_empty() && last.is_empty()) {
        elements.push(last);
    }
    Ok(elements)
}

struct ElementAccess<'de> {
    elements: std::vec::IntoIter<&'de str>,
}

impl<'de> SeqAccess<'de> for ElementAccess<'de> {
    type Error = DecodeError;

    fn next_element_seed<T: DeserializeSeed<'de>>(
        &mut self,
        seed: T,
    ) -> Result<Option<T::Value>, DecodeError> {
        match self.elements.next() {
            Some(element) => seed.deserialize(ValueDeserializer::new(element)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.elements.len())
    }
}

struct TokenAccess<'de> {
    tokens: Tokens<'de>,
    remaining: usize,
}

impl<'de> SeqAccess<'de> for TokenAccess<'de> {
    type Error = DecodeError;

    fn next_element_seed<T: DeserializeSeed<'de>>(
        &mut self,
        seed: T,
    ) -> Result<Option<T::Value>, DecodeError> {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        seed.deserialize(ValueDeserializer::new(self.tokens.next()))
            .map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    const FIXTURE: &str = "\
[system]
    threads: 4
    debug_mode: true
    hex_value: 0xFF

[graphics]
    resolution: [1920, 1080]
    refresh_rate: 60
    vsync: true

[network]
    [server]
    host: localhost
    port: 8080

[coordinates]
    point1: 100 200 300
";

    fn parsed() -> Config {
        let mut config = Config::new();
        config.parse_str(FIXTURE);
        config
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct System {
        threads: u32,
        debug_mode: bool,
        hex_value: u32,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Graphics {
        resolution: Vec<i64>,
        refresh_rate: i64,
        vsync: bool,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Server {
        host: String,
        port: u16,
        timeout: Option<u32>,
    }

    #[derive(Debug, Deserialize)]
    struct Network {
        server: Server,
    }

    #[test]
    fn test_section_to_struct() {
        let config = parsed();
        let system: System = config.section("system").deserialize().unwrap().unwrap();
        assert_eq!(
            system,
            System {
                threads: 4,
                debug_mode: true,
                hex_value: 255,
            }
        );
    }

    #[test]
    fn test_sequence_field() {
        let config = parsed();
        let graphics: Graphics = config.section("graphics").deserialize().unwrap().unwrap();
        assert_eq!(graphics.resolution, vec![1920, 1080]);
        assert!(graphics.vsync);
    }

    #[test]
    fn test_nested_section_struct() {
        let config = parsed();
        let network: Network = config.section("network").deserialize().unwrap().unwrap();
        assert_eq!(network.server.host, "localhost");
        assert_eq!(network.server.port, 8080);
        assert_eq!(network.server.timeout, None);
    }

    #[test]
    fn test_tuple_field() {
        #[derive(Debug, Deserialize)]
        struct Coordinates {
            point1: (i64, i64, i64),
        }

        let config = parsed();
        let coords: Coordinates = config
            .section("coordinates")
            .deserialize()
            .unwrap()
            .unwrap();
        assert_eq!(coords.point1, (100, 200, 300));
    }

    #[test]
    fn test_missing_section_is_none() {
        let config = parsed();
        let absent: Option<System> = config.section("nonexistent").deserialize().unwrap();
        assert!(absent.is_none());
    }

    #[test]
    fn test_malformed_field_is_error() {
        let config = parsed();
        // resolution is a list, not an integer
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Wrong {
            resolution: i64,
        }
        let result: Result<Option<Wrong>, _> = config.section("graphics").deserialize();
        assert!(result.is_err());
    }

    #[test]
    fn test_whole_registry() {
        #[derive(Debug, Deserialize)]
        struct Root {
            system: System,
            graphics: Graphics,
        }

        let config = parsed();
        let root: Root = config.deserialize().unwrap();
        assert_eq!(root.system.threads, 4);
        assert_eq!(root.graphics.refresh_rate, 60);
    }

    #[test]
    fn test_split_elements_nesting_aware() {
        assert_eq!(split_elements("[1, 2]").unwrap(), vec!["1", "2"]);
        assert_eq!(
            split_elements("[[1,2], [3,4]]").unwrap(),
            vec!["[1,2]", "[3,4]"]
        );
        assert!(split_elements("[]").unwrap().is_empty());
        assert!(matches!(
            split_elements("[[1,2,3][1,3]"),
            Err(DecodeError::UnmatchedBracket(_))
        ));
    }
}
