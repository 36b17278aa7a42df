//! Outline items as returned by the host and their flattened display form.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));
static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|amp|lt|gt|quot|apos|nbsp|#39);").expect("valid regex")
});
static HEADING_SUBTYPE_RE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?i)^h([1-6])$").expect("valid regex"));

/// One node of a document outline.
///
/// Host versions disagree on field names (`subType`/`subtype`,
/// `children`/`blocks`), so both spellings are accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineItem {
	#[serde(default)]
	pub id: String,
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub content: Option<String>,
	#[serde(default, rename = "type")]
	pub kind: Option<String>,
	#[serde(default)]
	pub sub_type: Option<String>,
	#[serde(default, rename = "subtype")]
	pub subtype_legacy: Option<String>,
	#[serde(default)]
	pub depth: Option<u32>,
	#[serde(default)]
	pub count: Option<u32>,
	#[serde(default)]
	pub children: Option<Vec<OutlineItem>>,
	#[serde(default)]
	pub blocks: Option<Vec<OutlineItem>>,
}

impl OutlineItem {
	pub fn subtype(&self) -> Option<&str> {
		self.sub_type
			.as_deref()
			.filter(|s| !s.is_empty())
			.or(self.subtype_legacy.as_deref())
			.filter(|s| !s.is_empty())
	}

	/// Nested items; `children` wins whenever present, even when empty.
	pub fn nested(&self) -> &[OutlineItem] {
		self.children
			.as_deref()
			.or(self.blocks.as_deref())
			.unwrap_or_default()
	}

	fn display_source(&self) -> &str {
		[self.content.as_deref(), self.name.as_deref()]
			.into_iter()
			.flatten()
			.find(|s| !s.is_empty())
			.unwrap_or("Untitled")
	}
}

/// A heading ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
	pub id: String,
	pub content: String,
	pub depth: u32,
	pub sub_type: Option<String>,
}

/// Flattens an outline tree in document order.
///
/// Depth comes from an `hN` subtype when present, then the item's own
/// non-zero depth, then its nesting level (starting at 1).
pub fn flatten_outline(items: &[OutlineItem]) -> Vec<Heading> {
	let mut flat = Vec::new();
	traverse(items, 1, &mut flat);
	flat
}

fn traverse(items: &[OutlineItem], level: u32, out: &mut Vec<Heading>) {
	for item in items {
		let subtype = item.subtype();
		let depth = subtype
			.and_then(|s| HEADING_SUBTYPE_RE.captures(s))
			.and_then(|caps| caps[1].parse().ok())
			.or(item.depth.filter(|&d| d > 0))
			.unwrap_or(level);

		out.push(Heading {
			id: item.id.clone(),
			content: plain_text(item.display_source()),
			depth,
			sub_type: subtype.map(str::to_string),
		});

		let nested = item.nested();
		if !nested.is_empty() {
			traverse(nested, depth + 1, out);
		}
	}
}

/// Strips markup and decodes the common character references.
pub fn plain_text(markup: &str) -> String {
	if markup.is_empty() {
		return String::new();
	}
	let stripped = TAG_RE.replace_all(markup, "");
	ENTITY_RE
		.replace_all(&stripped, |caps: &regex::Captures<'_>| {
			decode_entity(&caps[1]).unwrap_or_else(|| caps[0].to_string())
		})
		.into_owned()
}

fn decode_entity(name: &str) -> Option<String> {
	let ch = match name {
		"amp" => '&',
		"lt" => '<',
		"gt" => '>',
		"quot" => '"',
		"apos" | "#39" => '\'',
		"nbsp" => '\u{a0}',
		_ => {
			let code = match name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
				Some(hex) => u32::from_str_radix(hex, 16).ok()?,
				None => name.strip_prefix('#')?.parse().ok()?,
			};
			char::from_u32(code)?
		}
	};
	Some(ch.to_string())
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use serde_json::json;

	use super::*;

	fn items(value: serde_json::Value) -> Vec<OutlineItem> {
		serde_json::from_value(value).unwrap()
	}

	#[test]
	fn test_depth_prefers_subtype_then_depth_then_level() {
		let outline = items(json!([
			{"id": "a", "content": "A", "subType": "h2", "depth": 5, "children": [
				{"id": "b", "name": "B"},
				{"id": "c", "content": "C", "depth": 7}
			]},
			{"id": "d", "content": "D", "subtype": "H4"}
		]));

		let flat = flatten_outline(&outline);
		let summary: Vec<_> = flat.iter().map(|h| (h.id.as_str(), h.depth)).collect();
		assert_eq!(summary, vec![("a", 2), ("b", 3), ("c", 7), ("d", 4)]);
		assert_eq!(flat[3].sub_type.as_deref(), Some("H4"));
	}

	#[test]
	fn test_blocks_used_only_without_children() {
		let outline = items(json!([
			{"id": "a", "blocks": [{"id": "x"}]},
			{"id": "b", "children": [], "blocks": [{"id": "y"}]}
		]));

		let ids: Vec<_> = flatten_outline(&outline).into_iter().map(|h| h.id).collect();
		assert_eq!(ids, vec!["a", "x", "b"]);
	}

	#[test]
	fn test_display_text_falls_back_to_untitled() {
		let outline = items(json!([{"id": "a", "content": "", "name": ""}]));
		assert_eq!(flatten_outline(&outline)[0].content, "Untitled");
	}

	#[test]
	fn test_plain_text_strips_markup_and_entities() {
		assert_eq!(
			plain_text("<span data-type=\"strong\">Tom &amp; Jerry</span> &#x41;&#66; &bogus;"),
			"Tom & Jerry AB &bogus;"
		);
		assert_eq!(plain_text(""), "");
	}
}
