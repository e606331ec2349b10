//! Indentation-delimited section config files with typed value decoding.
//!
//! The format is a plain-text tree: `[name]` lines open sections,
//! `key: value` lines fill the innermost open section, and four-column
//! indentation (tab = 4) nests sections. Values stay raw text until a
//! caller asks for a concrete type.
//!
//! ```text
//! [graphics]
//!     resolution: [1920, 1080]
//!     vsync: true
//!     [shadows]
//!         quality: 2
//! # full-line comment
//! ```
//!
//! ```
//! use stanza::Config;
//!
//! let mut config = Config::new();
//! config.parse_str("[graphics]\n    resolution: [1920, 1080]\n    vsync: true\n");
//!
//! let graphics = config.section("graphics");
//! assert!(graphics.exists());
//! assert_eq!(
//!     graphics.get::<Vec<i64>>("resolution").unwrap(),
//!     Some(vec![1920, 1080]),
//! );
//! ```

pub mod config;
pub mod de;
mod error;
pub mod value;

pub use config::{Config, Node, NodeRef, ParseError};
pub use error::Error;
pub use value::{DecodeError, FromValue};
