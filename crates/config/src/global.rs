//! Process-wide default [`Registry`].
//!
//! Convenience wrappers for programs that keep one configuration for their
//! whole lifetime. Tests and libraries should prefer an owned [`Registry`].

use std::path::Path;
use std::sync::{Arc, LazyLock};

use crate::error::Result;
use crate::node::Node;
use crate::registry::{CallbackResult, Registry};

static GLOBAL: LazyLock<Registry> = LazyLock::new(Registry::new);

/// Returns the shared registry.
pub fn global() -> &'static Registry {
	&GLOBAL
}

/// See [`Registry::register`].
pub fn register<F>(key: impl Into<String>, callback: F)
where
	F: Fn(&str, &Node) -> CallbackResult + Send + Sync + 'static,
{
	global().register(key, callback);
}

/// See [`Registry::register_unknown`].
pub fn register_unknown<F>(callback: F)
where
	F: Fn(&str, &Node) -> CallbackResult + Send + Sync + 'static,
{
	global().register_unknown(callback);
}

/// See [`Registry::load`].
pub fn load(path: impl AsRef<Path>) -> Result<()> {
	global().load(path)
}

/// See [`Registry::parse_config`].
pub fn parse_config(input: impl AsRef<[u8]>) -> Result<()> {
	global().parse_config(input)
}

/// See [`Registry::callback`].
pub fn callback<F>(key: &str, callback: F) -> Result<()>
where
	F: FnMut(&str, &Node) -> CallbackResult,
{
	global().callback(key, callback)
}

/// See [`Registry::current`].
pub fn current() -> Option<Arc<Node>> {
	global().current()
}
