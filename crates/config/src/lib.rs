//! Configuration parsing and key-routed dispatch.
//!
//! Configuration is written in a small indentation-based format:
//!
//! ```text
//! # Application settings
//! app:
//!   name: "MyApp"
//!   version: v1   # trailing comments are dropped
//!   port: 8080
//!
//! plugins:
//!   - git
//!   - lsp
//! ```
//!
//! Parsing produces a [`Node`] tree. Consumers register callbacks for the
//! top-level keys they own; loading a file routes each section to its
//! callback. A mapping section is delivered field by field, so one callback
//! can fill a flat settings struct:
//!
//! ```
//! use std::sync::{Arc, Mutex};
//!
//! use cfgtree::{Decode, Node, Registry, Result};
//!
//! #[derive(Default)]
//! struct App {
//! 	name: String,
//! 	port: u16,
//! }
//!
//! impl Decode for App {
//! 	fn decode_field(&mut self, key: &str, node: &Node) -> Result<()> {
//! 		match key {
//! 			"name" => self.name = node.str_value()?.to_string(),
//! 			"port" => self.port = node.parse()?,
//! 			_ => {}
//! 		}
//! 		Ok(())
//! 	}
//! }
//!
//! let app = Arc::new(Mutex::new(App::default()));
//! let registry = Registry::new();
//! let target = Arc::clone(&app);
//! registry.register("app", move |key, node| {
//! 	target.lock().unwrap().decode_field(key, node)?;
//! 	Ok(())
//! });
//!
//! registry.parse_config("app:\n  name: demo\n  port: 8080\n")?;
//! assert_eq!(app.lock().unwrap().port, 8080);
//! # Ok::<(), cfgtree::ConfigError>(())
//! ```
//!
//! Scalar and sequence sections are delivered whole with their own key, and
//! top-level keys nobody registered for go to the
//! [unknown-key callback](Registry::register_unknown).
//!
//! # Format Limits
//!
//! No anchors, multi-document streams, flow collections (`[a, b]`, `{a: b}`)
//! or type tags. Every scalar is a string; use [`Node::parse`] to convert.

pub mod error;
pub mod global;
pub mod node;
pub mod parse;
pub mod registry;

pub use error::{BoxError, ConfigError, ParseErrorKind, Result};
pub use global::{callback, current, global, load, parse_config, register, register_unknown};
pub use node::{Decode, Mapping, Node, NodeKind};
pub use parse::{parse_bytes, parse_str};
pub use registry::{CallbackResult, Registry};
