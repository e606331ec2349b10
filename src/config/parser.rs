//! Indentation-driven section-tree parser.

use std::collections::BTreeMap;
use std::path::Path;

use super::error::ParseError;
use super::node::{Node, NodeRef};

/// Parsed config registry: top-level section names mapped to their
/// section trees.
///
/// The format is line-oriented. A `[name]` line opens a section, a line
/// containing `:` is a `key: value` property of the innermost open
/// section, and indentation in steps of four columns (a tab counts as
/// four) nests sections. Full-line `#` comments and blank lines are
/// skipped; anything else is ignored.
///
/// ## Example
///
/// ```
/// use stanza::Config;
///
/// let mut config = Config::new();
/// config.parse_str(
///     "[server]\n    host: localhost\n    port: 8080\n    [limits]\n        max_connections: 100\n",
/// );
///
/// let server = config.section("server");
/// assert_eq!(server.get::<String>("host").unwrap(), Some("localhost".to_string()));
/// assert_eq!(server.child("limits").get::<i64>("max_connections").unwrap(), Some(100));
/// ```
#[derive(Debug, Default)]
pub struct Config {
    roots: BTreeMap<String, Node>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a config file, replacing any previously parsed registry.
    ///
    /// The registry is cleared up front, so a file that cannot be read
    /// leaves it empty rather than holding stale sections.
    pub fn parse(&mut self, path: impl AsRef<Path>) -> Result<(), ParseError> {
        let path = path.as_ref();
        self.roots.clear();

        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ParseError::FileNotFound(path.to_path_buf()));
            }
            Err(e) => {
                return Err(ParseError::ReadError {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };

        self.parse_str(&text);
        Ok(())
    }

    /// Parses config text, replacing any previously parsed registry.
    ///
    /// Unrecognized lines are ignored rather than rejected, so building
    /// from in-memory text cannot fail.
    pub fn parse_str(&mut self, text: &str) {
        self.roots.clear();
        // Implicit root for anything before the first section header;
        // stray properties there are dropped, not attached.
        self.roots.insert(String::new(), Node::default());

        let mut stack: Vec<(String, Node)> = Vec::new();

        for raw in text.lines() {
            let indent = leading_indent(raw);
            let line = trim(raw);

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            // A property belongs to the innermost open section no matter
            // its own indentation; only headers move the stack.
            if let Some(colon) = line.find(':') {
                if let Some((_, open)) = stack.last_mut() {
                    open.set_value(trim(&line[..colon]), trim(&line[colon + 1..]));
                    continue;
                }
            }

            // Dedent: close sections deeper than this line's level.
            while stack.len() > indent / 4 {
                close_top(&mut stack, &mut self.roots);
            }

            if line.len() >= 2 && line.starts_with('[') && line.ends_with(']') {
                let name = line[1..line.len() - 1].to_string();
                stack.push((name, Node::default()));
            }
        }

        while !stack.is_empty() {
            close_top(&mut stack, &mut self.roots);
        }
    }

    /// Looks up a top-level section; a missing name yields the missing
    /// sentinel.
    pub fn section(&self, name: &str) -> NodeRef<'_> {
        NodeRef::new(self.roots.get(name))
    }

    /// Iterates over the top-level sections in name order.
    pub fn sections(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.roots.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub(crate) fn roots(&self) -> &BTreeMap<String, Node> {
        &self.roots
    }
}

/// Pops the innermost open section and attaches it to its parent, or to
/// the registry when it was a top-level section.
fn close_top(stack: &mut Vec<(String, Node)>, roots: &mut BTreeMap<String, Node>) {
    if let Some((name, node)) = stack.pop() {
        match stack.last_mut() {
            Some((_, parent)) => parent.insert_child(name, node),
            None => {
                roots.insert(name, node);
            }
        }
    }
}

/// Indentation width up to the first non-blank character: a tab counts
/// as four columns, a space as one.
fn leading_indent(line: &str) -> usize {
    line.chars()
        .take_while(|&c| c == ' ' || c == '\t')
        .map(|c| if c == '\t' { 4 } else { 1 })
        .sum()
}

fn trim(text: &str) -> &str {
    text.trim_matches(|c| c == ' ' || c == '\t')
}
