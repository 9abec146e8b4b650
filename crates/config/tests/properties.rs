//! Property tests for scalar cleanup, flattening and block kinds.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use cfgtree::{ConfigError, Node, ParseErrorKind, Registry, parse_str};
use proptest::prelude::*;

fn bare_value() -> impl Strategy<Value = String> {
	"[A-Za-z0-9]([A-Za-z0-9 ._:/-]{0,14}[A-Za-z0-9])?"
}

fn key() -> impl Strategy<Value = String> {
	"[a-z][a-z0-9_]{0,7}"
}

proptest! {
	#[test]
	fn scalar_lines_strip_quotes_and_comments(
		key in key(),
		value in bare_value(),
		quote in prop::sample::select(vec!["", "\"", "'"]),
		comment in prop::option::of("[ -~]{0,10}"),
	) {
		let mut line = format!("{key}: {quote}{value}{quote}");
		if let Some(comment) = comment {
			line.push_str(" #");
			line.push_str(&comment);
		}

		let root = parse_str(&line).unwrap();
		prop_assert_eq!(root.get(&key), Some(&Node::scalar(value)));
	}

	#[test]
	fn flat_sections_dispatch_once_per_field(
		fields in prop::collection::btree_map("[a-z]{1,6}", bare_value(), 1..8),
	) {
		let mut doc = String::from("section:\n");
		for (k, v) in &fields {
			doc.push_str(&format!("  {k}: {v}\n"));
		}

		let registry = Registry::new();
		let calls = Arc::new(Mutex::new(Vec::new()));
		let sink = Arc::clone(&calls);
		registry.register("section", move |k, n| {
			sink.lock().unwrap().push((k.to_string(), n.str_value()?.to_string()));
			Ok(())
		});
		registry.parse_config(&doc).unwrap();

		let calls = calls.lock().unwrap();
		let expected: Vec<_> = fields.into_iter().collect();
		prop_assert_eq!(&*calls, &expected);
		prop_assert!(calls.iter().all(|(k, _)| k != "section"));
	}

	#[test]
	fn mixing_items_and_keys_in_one_block_fails(
		items in 1usize..4,
		keys in 1usize..4,
		items_first in any::<bool>(),
	) {
		let item_lines: Vec<String> = (0..items).map(|i| format!("  - item{i}\n")).collect();
		let key_lines: Vec<String> = (0..keys).map(|i| format!("  key{i}: v\n")).collect();
		let (head, tail) = if items_first { (&item_lines, &key_lines) } else { (&key_lines, &item_lines) };

		let doc = format!("block:\n{}{}", head.concat(), tail.concat());
		let err = parse_str(&doc).unwrap_err();
		let mixed_at_first_tail_line = matches!(
			err,
			ConfigError::Parse { kind: ParseErrorKind::MixedKinds, line } if line == head.len() + 2
		);
		prop_assert!(mixed_at_first_tail_line, "unexpected error: {:?}", err);
	}

	#[test]
	fn rendered_mappings_parse_back(
		fields in prop::collection::btree_map("[a-z]{1,6}", "[ -~]{0,12}", 0..8),
	) {
		let node: Node = fields
			.into_iter()
			.map(|(k, v)| (k, Node::scalar(v)))
			.collect();
		match node.render() {
			Ok(text) => prop_assert_eq!(parse_str(&text).unwrap(), node),
			Err(ConfigError::Unrenderable { value }) => {
				// Only values carrying both quote kinds, each followed by ` #`, are refused.
				let refused = value.contains('"') && value.contains('\'') && value.contains(" #");
				prop_assert!(refused, "refused {:?}", value);
			}
			Err(other) => prop_assert!(false, "unexpected error: {}", other),
		}
	}
}

#[test]
fn sequence_sections_dispatch_once_with_section_key() {
	let registry = Registry::new();
	let calls: Arc<Mutex<BTreeMap<String, usize>>> = Arc::default();
	let sink = Arc::clone(&calls);
	registry.register("hosts", move |k, n| {
		*sink.lock().unwrap().entry(k.to_string()).or_default() += n.len();
		Ok(())
	});

	registry.parse_config("hosts:\n  - a\n  - b\n  - c\n").unwrap();
	assert_eq!(calls.lock().unwrap().get("hosts"), Some(&3));
	assert_eq!(calls.lock().unwrap().len(), 1);
}
