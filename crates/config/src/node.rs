//! The parsed configuration tree.
//!
//! A [`Node`] is the only output of parsing and the only input to decoding.
//! Each node owns its children outright, so a tree is acyclic and never
//! shares subtrees.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;

use crate::error::{ConfigError, Result};

/// Children of a mapping node, in document order.
pub type Mapping = IndexMap<String, Node>;

/// Discriminant of a [`Node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
	/// A single string value.
	Scalar,
	/// Key to node pairs.
	Mapping,
	/// Ordered items.
	Sequence,
}

impl fmt::Display for NodeKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			NodeKind::Scalar => "scalar",
			NodeKind::Mapping => "mapping",
			NodeKind::Sequence => "sequence",
		})
	}
}

/// A configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
	/// Text with quotes and inline comments already removed.
	Scalar(String),
	/// Unique keys mapped to child nodes.
	Mapping(Mapping),
	/// Ordered child nodes.
	Sequence(Vec<Node>),
}

impl Default for Node {
	fn default() -> Self {
		Node::Mapping(Mapping::new())
	}
}

/// Target that can be populated field by field from a mapping node.
///
/// Implemented by configuration structs that want to be filled through
/// [`Node::decode`].
pub trait Decode {
	/// Populates the field named `key` from `node`.
	fn decode_field(&mut self, key: &str, node: &Node) -> Result<()>;
}

impl Node {
	/// Creates a scalar node.
	pub fn scalar(value: impl Into<String>) -> Self {
		Node::Scalar(value.into())
	}

	pub fn kind(&self) -> NodeKind {
		match self {
			Node::Scalar(_) => NodeKind::Scalar,
			Node::Mapping(_) => NodeKind::Mapping,
			Node::Sequence(_) => NodeKind::Sequence,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Node::Scalar(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_mapping(&self) -> Option<&Mapping> {
		match self {
			Node::Mapping(m) => Some(m),
			_ => None,
		}
	}

	pub fn as_sequence(&self) -> Option<&[Node]> {
		match self {
			Node::Sequence(items) => Some(items),
			_ => None,
		}
	}

	/// Returns the scalar text, failing for mappings and sequences.
	pub fn str_value(&self) -> Result<&str> {
		self.as_str().ok_or(ConfigError::NotScalar)
	}

	/// Parses the scalar text into `T`.
	pub fn parse<T: FromStr>(&self) -> Result<T> {
		let raw = self.str_value()?;
		raw.parse().map_err(|_| ConfigError::InvalidScalar {
			value: raw.to_string(),
			expected: std::any::type_name::<T>(),
		})
	}

	/// Looks up a direct child of a mapping node.
	pub fn get(&self, key: &str) -> Option<&Node> {
		self.as_mapping()?.get(key)
	}

	/// Resolves a dotted path such as `servers.0.host`.
	///
	/// Segments select mapping keys; on sequences a segment must be an index.
	/// An empty path returns `self`.
	pub fn lookup(&self, path: &str) -> Option<&Node> {
		if path.is_empty() {
			return Some(self);
		}
		path.split('.').try_fold(self, |node, segment| match node {
			Node::Mapping(m) => m.get(segment),
			Node::Sequence(items) => items.get(segment.parse::<usize>().ok()?),
			Node::Scalar(_) => None,
		})
	}

	/// Number of children; scalars have none.
	pub fn len(&self) -> usize {
		match self {
			Node::Scalar(_) => 0,
			Node::Mapping(m) => m.len(),
			Node::Sequence(items) => items.len(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Visits every item of a sequence in order.
	///
	/// Stops at the first error returned by `visit`. Fails with
	/// [`ConfigError::NotSequence`] when `self` is not a sequence.
	pub fn for_each_item<E, F>(&self, mut visit: F) -> std::result::Result<(), E>
	where
		E: From<ConfigError>,
		F: FnMut(usize, &Node) -> std::result::Result<(), E>,
	{
		let items = self.as_sequence().ok_or(ConfigError::NotSequence)?;
		for (index, item) in items.iter().enumerate() {
			visit(index, item)?;
		}
		Ok(())
	}

	/// Feeds every child of a mapping into `target`.
	///
	/// Stops at the first error returned by the target.
	pub fn decode<T: Decode + ?Sized>(&self, target: &mut T) -> Result<()> {
		let map = self.as_mapping().ok_or(ConfigError::NotMapping)?;
		for (key, child) in map {
			target.decode_field(key, child)?;
		}
		Ok(())
	}
}

impl From<&str> for Node {
	fn from(value: &str) -> Self {
		Node::Scalar(value.to_string())
	}
}

impl From<String> for Node {
	fn from(value: String) -> Self {
		Node::Scalar(value)
	}
}

impl From<Vec<Node>> for Node {
	fn from(items: Vec<Node>) -> Self {
		Node::Sequence(items)
	}
}

impl From<Mapping> for Node {
	fn from(map: Mapping) -> Self {
		Node::Mapping(map)
	}
}

impl FromIterator<(String, Node)> for Node {
	fn from_iter<I: IntoIterator<Item = (String, Node)>>(iter: I) -> Self {
		Node::Mapping(iter.into_iter().collect())
	}
}

impl Node {
	/// Renders the node in the configuration format with two-space indentation.
	///
	/// Scalars are quoted when their bare form would read back differently. The
	/// format has no escapes, so a scalar that no quoting preserves fails with
	/// [`ConfigError::Unrenderable`]. A top-level scalar renders as its quoted text.
	pub fn render(&self) -> Result<String> {
		let mut out = String::new();
		match self {
			Node::Scalar(s) => {
				out.push_str(&quote_scalar(s)?);
				out.push('\n');
			}
			Node::Mapping(m) => render_mapping(&mut out, m, 0)?,
			Node::Sequence(items) => render_sequence(&mut out, items, 0)?,
		}
		Ok(out)
	}
}

fn render_mapping(out: &mut String, map: &Mapping, depth: usize) -> Result<()> {
	let pad = "  ".repeat(depth);
	for (key, child) in map {
		match child {
			Node::Scalar(s) => out.push_str(&format!("{pad}{key}: {}\n", quote_scalar(s)?)),
			Node::Mapping(m) => {
				out.push_str(&format!("{pad}{key}:\n"));
				render_mapping(out, m, depth + 1)?;
			}
			Node::Sequence(items) => {
				out.push_str(&format!("{pad}{key}:\n"));
				render_sequence(out, items, depth + 1)?;
			}
		}
	}
	Ok(())
}

fn render_sequence(out: &mut String, items: &[Node], depth: usize) -> Result<()> {
	let pad = "  ".repeat(depth);
	for item in items {
		match item {
			Node::Scalar(s) => out.push_str(&format!("{pad}- {}\n", quote_scalar(s)?)),
			Node::Mapping(m) => {
				out.push_str(&format!("{pad}-\n"));
				render_mapping(out, m, depth + 1)?;
			}
			Node::Sequence(nested) => {
				out.push_str(&format!("{pad}-\n"));
				render_sequence(out, nested, depth + 1)?;
			}
		}
	}
	Ok(())
}

/// Returns `s` bare, or wrapped in whichever quote reads back to `s`.
fn quote_scalar(s: &str) -> Result<Cow<'_, str>> {
	let needs_quotes = s.is_empty()
		|| s.trim() != s
		|| s.contains(" #")
		|| s.starts_with('#')
		|| s.starts_with('"')
		|| s.starts_with('\'')
		|| s.starts_with("- ")
		|| s == "-";
	if !needs_quotes {
		return Ok(Cow::Borrowed(s));
	}
	['"', '\'']
		.into_iter()
		.find(|&quote| survives_quoting(s, quote))
		.map(|quote| Cow::Owned(format!("{quote}{s}{quote}")))
		.ok_or_else(|| ConfigError::Unrenderable { value: s.to_string() })
}

/// The reader closes a quoted span at the first matching quote, so anything
/// after an inner `quote` must not look like an inline comment.
fn survives_quoting(s: &str, quote: char) -> bool {
	match s.find(quote) {
		Some(at) => !s[at + quote.len_utf8()..].contains(" #"),
		None => true,
	}
}
