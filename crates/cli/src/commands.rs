//! Subcommand implementations. Each returns the text to print on success.

use std::fmt::Write as _;
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, anyhow, bail};
use cfgtree::{Node, Registry};

fn load(path: &Path) -> Result<Arc<Node>> {
	let registry = Registry::new();
	registry
		.load(path)
		.with_context(|| format!("failed to load {}", path.display()))?;
	registry
		.current()
		.ok_or_else(|| anyhow!("no configuration stored after loading {}", path.display()))
}

pub fn check(path: &Path) -> Result<String> {
	let root = load(path)?;
	Ok(format!("ok: {} top-level keys\n", root.len()))
}

pub fn dump(path: &Path, key: Option<&str>) -> Result<String> {
	let root = load(path)?;
	let Some(key) = key else {
		return Ok(root.render()?);
	};
	let section = root.get(key).with_context(|| format!("no top-level key '{key}'"))?;
	let single: Node = [(key.to_string(), section.clone())].into_iter().collect();
	Ok(single.render()?)
}

pub fn get(path: &Path, dotted: &str) -> Result<String> {
	let root = load(path)?;
	match root.lookup(dotted) {
		Some(Node::Scalar(value)) => Ok(format!("{value}\n")),
		Some(node) => Ok(node.render()?),
		None => bail!("path '{dotted}' not found"),
	}
}

/// Lists every top-level key through the unknown-key callback.
pub fn keys(path: &Path) -> Result<String> {
	let registry = Registry::new();
	let listing = Arc::new(Mutex::new(String::new()));
	let sink = Arc::clone(&listing);
	registry.register_unknown(move |key, node| {
		let mut out = sink.lock().map_err(|_| "listing lock poisoned")?;
		match node {
			Node::Scalar(_) => writeln!(out, "{key}\t{}", node.kind())?,
			_ => writeln!(out, "{key}\t{} ({} entries)", node.kind(), node.len())?,
		}
		Ok(())
	});
	registry
		.load(path)
		.with_context(|| format!("failed to load {}", path.display()))?;

	let out = listing.lock().map_err(|_| anyhow!("listing lock poisoned"))?;
	Ok(out.clone())
}
