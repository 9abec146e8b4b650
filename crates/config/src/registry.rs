//! Key-routed callback registry and dispatcher.
//!
//! A [`Registry`] maps top-level configuration keys to callbacks and keeps the
//! most recently loaded tree. Loading parses the input, swaps the new tree in,
//! then routes each top-level section to its callback:
//!
//! - a mapping section is flattened: the callback runs once per field, with
//!   the field's own key;
//! - a scalar or sequence section is passed whole, with the section key;
//! - sections without a registered callback go to the unknown-key callback,
//!   unflattened.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::error::{BoxError, ConfigError, Result};
use crate::node::Node;
use crate::parse;

/// Result returned by dispatch callbacks.
pub type CallbackResult = std::result::Result<(), BoxError>;

/// Shared callback handle.
type Callback = Arc<dyn Fn(&str, &Node) -> CallbackResult + Send + Sync>;

#[derive(Default)]
struct Handlers {
	by_key: HashMap<String, Callback>,
	unknown: Option<Callback>,
}

/// Configuration registry: callback table plus the current configuration tree.
///
/// Thread-safe; share it by reference or behind an `Arc`.
pub struct Registry {
	handlers: RwLock<Handlers>,
	current: ArcSwapOption<Node>,
}

impl Default for Registry {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for Registry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let handlers = self.handlers.read();
		let mut keys: Vec<_> = handlers.by_key.keys().collect();
		keys.sort();
		f.debug_struct("Registry")
			.field("keys", &keys)
			.field("unknown", &handlers.unknown.is_some())
			.field("loaded", &self.current.load().is_some())
			.finish()
	}
}

impl Registry {
	/// Creates an empty registry with no configuration loaded.
	pub fn new() -> Self {
		Self {
			handlers: RwLock::new(Handlers::default()),
			current: ArcSwapOption::empty(),
		}
	}

	/// Registers `callback` for a top-level key, replacing any previous one.
	pub fn register<F>(&self, key: impl Into<String>, callback: F)
	where
		F: Fn(&str, &Node) -> CallbackResult + Send + Sync + 'static,
	{
		let key = key.into();
		let mut handlers = self.handlers.write();
		if handlers.by_key.contains_key(&key) {
			debug!(key = %key, "replacing config callback");
		}
		handlers.by_key.insert(key, Arc::new(callback));
	}

	/// Sets the fallback for top-level keys with no registered callback.
	pub fn register_unknown<F>(&self, callback: F)
	where
		F: Fn(&str, &Node) -> CallbackResult + Send + Sync + 'static,
	{
		self.handlers.write().unknown = Some(Arc::new(callback));
	}

	/// Returns `true` if a callback is registered for `key`.
	pub fn is_registered(&self, key: &str) -> bool {
		self.handlers.read().by_key.contains_key(key)
	}

	/// Reads, parses and dispatches a configuration file.
	pub fn load(&self, path: impl AsRef<Path>) -> Result<()> {
		let path = path.as_ref();
		debug!(path = %path.display(), "loading config");
		let content = std::fs::read(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		self.parse_config(content)
	}

	/// Parses and dispatches configuration text.
	///
	/// The parsed tree replaces the current one before any callback runs. A
	/// parse error leaves the current tree untouched; a callback error stops
	/// the remaining dispatch but keeps the new tree.
	pub fn parse_config(&self, input: impl AsRef<[u8]>) -> Result<()> {
		let root = parse::parse_bytes(input.as_ref())?;
		if root.as_mapping().is_none() {
			return Err(ConfigError::RootNotMapping);
		}
		let root = Arc::new(root);
		self.current.store(Some(Arc::clone(&root)));
		debug!(keys = root.len(), "config loaded");
		self.dispatch(&root)
	}

	/// Snapshot of the most recently loaded tree.
	pub fn current(&self) -> Option<Arc<Node>> {
		self.current.load_full()
	}

	/// Re-runs `callback` for one top-level key of the current tree.
	///
	/// Applies the same flattening as a load. The unknown-key callback is not
	/// involved, and a key absent from the tree invokes nothing.
	pub fn callback<F>(&self, key: &str, mut callback: F) -> Result<()>
	where
		F: FnMut(&str, &Node) -> CallbackResult,
	{
		let root = self.current.load_full().ok_or(ConfigError::NotLoaded)?;
		let sections = root.as_mapping().ok_or(ConfigError::RootNotMapping)?;
		match sections.get(key) {
			Some(section) => dispatch_section(key, section, &mut callback),
			None => Ok(()),
		}
	}

	fn dispatch(&self, root: &Node) -> Result<()> {
		let sections = root.as_mapping().ok_or(ConfigError::RootNotMapping)?;

		// Callbacks run outside the lock so they may register or re-dispatch.
		let (matched, unmatched, unknown) = {
			let handlers = self.handlers.read();
			let mut matched = Vec::new();
			let mut unmatched = Vec::new();
			for (key, section) in sections {
				match handlers.by_key.get(key) {
					Some(callback) => matched.push((key, section, Arc::clone(callback))),
					None => unmatched.push((key, section)),
				}
			}
			(matched, unmatched, handlers.unknown.clone())
		};

		for (key, section, callback) in matched {
			dispatch_section(key, section, &mut |k: &str, n: &Node| callback(k, n))?;
		}

		for (key, section) in unmatched {
			let Some(unknown) = &unknown else {
				debug!(key = %key, "no callback for config key");
				continue;
			};
			trace!(key = %key, kind = %section.kind(), "unknown config key");
			unknown(key, section).map_err(|source| ConfigError::Callback {
				key: key.clone(),
				field: None,
				source,
			})?;
		}

		Ok(())
	}
}

/// Invokes `callback` per field of a mapping section, or once with `key` otherwise.
fn dispatch_section<F>(key: &str, section: &Node, callback: &mut F) -> Result<()>
where
	F: FnMut(&str, &Node) -> CallbackResult,
{
	match section {
		Node::Mapping(fields) => {
			for (field, value) in fields {
				trace!(key, field = %field, "config callback");
				callback(field, value).map_err(|source| ConfigError::Callback {
					key: key.to_string(),
					field: Some(field.clone()),
					source,
				})?;
			}
			Ok(())
		}
		_ => {
			trace!(key, kind = %section.kind(), "config callback");
			callback(key, section).map_err(|source| ConfigError::Callback {
				key: key.to_string(),
				field: None,
				source,
			})
		}
	}
}
