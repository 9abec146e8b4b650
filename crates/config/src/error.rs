//! Error types for configuration parsing and dispatch.

use std::path::PathBuf;

use thiserror::Error;

/// Boxed error returned by registered callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Why a line was rejected by the block parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
	/// A `- ` item and a `key:` entry appeared in the same block.
	MixedKinds,
	/// The line is neither a sequence item nor contains a `:` separator.
	ExpectedKeyValue,
}

impl std::fmt::Display for ParseErrorKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ParseErrorKind::MixedKinds => f.write_str("mixed mapping and sequence"),
			ParseErrorKind::ExpectedKeyValue => f.write_str("expected key: value"),
		}
	}
}

/// Errors that can occur when loading, decoding or dispatching configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// Input bytes were not valid UTF-8.
	#[error("config is not valid UTF-8: {0}")]
	Utf8(#[from] std::str::Utf8Error),

	/// Syntax error at a specific line.
	#[error("line {line}: {kind}")]
	Parse {
		/// 1-based line number.
		line: usize,
		/// What went wrong on that line.
		kind: ParseErrorKind,
	},

	/// Dispatch was attempted against a root that is not a mapping.
	#[error("config root must be a mapping")]
	RootNotMapping,

	/// Manual dispatch was requested before any configuration was loaded.
	#[error("no configuration has been loaded")]
	NotLoaded,

	/// [`Node::decode`](crate::Node::decode) was called on a scalar or sequence.
	#[error("cannot decode non-map node to struct")]
	NotMapping,

	/// [`Node::for_each_item`](crate::Node::for_each_item) was called on a scalar or mapping.
	#[error("node is not a list")]
	NotSequence,

	/// A scalar was required but the node is a mapping or sequence.
	#[error("node is not a scalar")]
	NotScalar,

	/// A scalar could not be converted to the requested type.
	#[error("invalid value {value:?}: expected {expected}")]
	InvalidScalar {
		/// The raw scalar text.
		value: String,
		/// Name of the expected type.
		expected: &'static str,
	},

	/// A scalar holds both quote characters in a way no quoting preserves.
	#[error("cannot render scalar {value:?}: no quoting reads it back unchanged")]
	Unrenderable {
		/// The scalar text.
		value: String,
	},

	/// A field name was not recognized by a [`Decode`](crate::Decode) target.
	#[error("unknown field: {0}")]
	UnknownField(String),

	/// A registered callback failed.
	#[error("callback for '{key}'{} failed: {source}", field.as_ref().map(|f| format!(" (field '{f}')")).unwrap_or_default())]
	Callback {
		/// Top-level key being dispatched.
		key: String,
		/// Grandchild key when the section was flattened.
		field: Option<String>,
		/// The error the callback returned.
		source: BoxError,
	},
}

impl ConfigError {
	/// Returns the line number for parse errors.
	pub fn line(&self) -> Option<usize> {
		match self {
			ConfigError::Parse { line, .. } => Some(*line),
			_ => None,
		}
	}
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
