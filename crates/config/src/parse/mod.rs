//! # Parser
//!
//! Recursive-descent parser for the indentation-based configuration format.
//!
//! ## Supported Syntax
//!
//! ```text
//! # full-line comment
//! app:
//!   name: "MyApp"      # inline comment after a space
//!   version: v1
//! list:
//!   - a
//!   -
//!     nested: mapping
//! ```
//!
//! Indentation is counted in leading spaces and is relative to the line that
//! opens a block, so sibling subtrees may use different widths. A block
//! becomes a sequence or a mapping on its first entry and rejects the other
//! form afterwards.

use crate::error::{ConfigError, ParseErrorKind, Result};
use crate::node::{Mapping, Node, NodeKind};


/// Parses UTF-8 bytes into a tree.
pub fn parse_bytes(input: &[u8]) -> Result<Node> {
	parse_str(std::str::from_utf8(input)?)
}

/// Parses a document into a tree.
///
/// The result is a mapping unless the top-level block opens with a `- ` item.
/// Errors carry the 1-based line number and no partial tree is returned.
pub fn parse_str(input: &str) -> Result<Node> {
	let lines = split_lines(input);
	BlockParser { lines: &lines, pos: 0 }.parse_block(None)
}

/// Splits input into lines, accepting both `\n` and `\r\n` endings.
fn split_lines(input: &str) -> Vec<&str> {
	input.lines().collect()
}

/// Cursor over the document's lines.
struct BlockParser<'a> {
	lines: &'a [&'a str],
	/// Index of the next unconsumed line.
	pos: usize,
}

impl BlockParser<'_> {
	/// Parses lines indented deeper than `min_indent` into one node.
	///
	/// `None` means no minimum and is only used for the document root. The
	/// line that ends the block is left unconsumed for the caller.
	fn parse_block(&mut self, min_indent: Option<usize>) -> Result<Node> {
		let mut fixed: Option<NodeKind> = None;
		let mut map = Mapping::new();
		let mut items = Vec::new();

		while let Some(&line) = self.lines.get(self.pos) {
			let content = line.trim();
			if is_ignorable(content) {
				self.pos += 1;
				continue;
			}

			let indent = indentation(line);
			if min_indent.is_some_and(|min| indent <= min) {
				break;
			}
			let line_no = self.pos + 1;

			if let Some(rest) = sequence_item(content) {
				fix_kind(&mut fixed, NodeKind::Sequence, line_no)?;
				self.pos += 1;
				if rest.is_empty() {
					items.push(self.parse_block(Some(indent))?);
				} else {
					items.push(Node::Scalar(clean_scalar(rest)));
				}
				continue;
			}

			let Some((key, raw)) = content.split_once(':') else {
				return Err(ConfigError::Parse {
					line: line_no,
					kind: ParseErrorKind::ExpectedKeyValue,
				});
			};
			fix_kind(&mut fixed, NodeKind::Mapping, line_no)?;
			self.pos += 1;

			let raw = raw.trim();
			let value = if !raw.is_empty() {
				Node::Scalar(clean_scalar(raw))
			} else if self.peek_indent().is_some_and(|next| next > indent) {
				self.parse_block(Some(indent))?
			} else {
				Node::Scalar(String::new())
			};
			map.insert(key.trim().to_string(), value);
		}

		Ok(match fixed {
			Some(NodeKind::Sequence) => Node::Sequence(items),
			_ => Node::Mapping(map),
		})
	}

	/// Indentation of the next line that carries content.
	fn peek_indent(&self) -> Option<usize> {
		self.lines[self.pos..]
			.iter()
			.find(|line| !is_ignorable(line.trim()))
			.map(|line| indentation(line))
	}
}

/// Locks the block to `kind`, failing if it already holds the other form.
fn fix_kind(fixed: &mut Option<NodeKind>, kind: NodeKind, line: usize) -> Result<()> {
	match *fixed {
		None => {
			*fixed = Some(kind);
			Ok(())
		}
		Some(current) if current == kind => Ok(()),
		Some(_) => Err(ConfigError::Parse {
			line,
			kind: ParseErrorKind::MixedKinds,
		}),
	}
}

fn is_ignorable(trimmed: &str) -> bool {
	trimmed.is_empty() || trimmed.starts_with('#')
}

/// Count of leading space characters. Tabs are not indentation.
fn indentation(line: &str) -> usize {
	line.bytes().take_while(|&b| b == b' ').count()
}

/// Returns the text after a `- ` marker, or `None` if the line is not an item.
fn sequence_item(content: &str) -> Option<&str> {
	if content == "-" {
		return Some("");
	}
	content.strip_prefix("- ").map(str::trim)
}

/// Drops an inline comment, then one pair of matching surrounding quotes.
fn clean_scalar(raw: &str) -> String {
	unquote(strip_inline_comment(raw).trim_end()).to_string()
}

/// Cuts the value at the first ` #` that is not inside a leading quoted span.
fn strip_inline_comment(raw: &str) -> &str {
	let search_from = match raw.chars().next() {
		Some(quote @ ('"' | '\'')) => raw[1..].find(quote).map_or(0, |end| end + 2),
		_ => 0,
	};
	match raw[search_from..].find(" #") {
		Some(at) => &raw[..search_from + at],
		None => raw,
	}
}

fn unquote(value: &str) -> &str {
	let bytes = value.as_bytes();
	match bytes {
		[first @ (b'"' | b'\''), .., last] if first == last => &value[1..value.len() - 1],
		_ => value,
	}
}
