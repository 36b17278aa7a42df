//! Resolving which document a surface shows, and the change key cached per widget.
//!
//! Resolution is an ordered chain of pure strategies; the first one producing
//! a non-empty identifier wins:
//!
//! 1. live editor state (focused block while zoomed in, document otherwise)
//! 2. the last breadcrumb entry while the exit-focus affordance is visible
//! 3. identifier attributes on well-known structural elements
//! 4. the first breadcrumb entry carrying a node id
//! 5. the focused (or first) search result
//! 6. the active (or first) history entry
//! 7. the `history` sentinel for history surfaces

use std::fmt;
use std::sync::LazyLock;

use margin_dom::{EditorState, NodeId, TreeExt, UiTree};
use regex::Regex;
use tracing::trace;

use crate::selectors::{
	BREADCRUMB, BREADCRUMB_ITEM, CONTENT, DOC_ROOT, EXIT_FOCUS, HEADINGS, HISTORY_ACTIVE_ITEM,
	HISTORY_CONTEXT, HISTORY_LIST, LIST_ITEM, SEARCH_CONTEXT, SEARCH_FOCUSED_ITEM, SEARCH_ITEM,
	TITLE, TITLE_INPUT, WITH_PATH, WYSIWYG,
};
use crate::surface::is_history_host;

/// Identifier used for history surfaces whose document cannot be resolved.
pub const HISTORY_SENTINEL: &str = "history";

const HOST_ID_ATTRS: &[&str] = &["data-node-id", "data-root-id", "data-doc-id", "data-id", "data-oid"];
const ITEM_ID_ATTRS: &[&str] = &["data-root-id", "data-node-id", "data-doc-id", "data-id"];
const TITLE_ID_ATTRS: &[&str] = &["data-node-id", "data-doc-id", "data-id"];
const DOC_ROOT_ID_ATTRS: &[&str] = &["data-node-id", "data-id"];
const NODE_ID_ATTR: &[&str] = &["data-node-id"];
const HEADING_ID_ATTRS: &[&str] = &["data-node-id", "data-id", "data-oid"];

static DOC_FILE_RE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"(?i)(?:^|[\\/])(\d{14}-[a-z0-9]{7})\.(?:syx|sy)$").expect("valid regex")
});
static DOC_ID_RE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?i)\d{14}-[a-z0-9]{7}").expect("valid regex"));

/// Extracts a document identifier from a storage path.
///
/// Prefers a trailing `<id>.sy`/`<id>.syx` file name, then the last
/// identifier-shaped substring anywhere. Returns `""` when nothing matches.
pub fn extract_doc_id_from_path(path: &str) -> &str {
	if let Some(caps) = DOC_FILE_RE.captures(path)
		&& let Some(id) = caps.get(1)
	{
		return id.as_str();
	}
	DOC_ID_RE.find_iter(path).last().map_or("", |m| m.as_str())
}

/// Inputs shared by every strategy.
struct Probe<'a, T: ?Sized> {
	tree: &'a T,
	surface: NodeId,
	editor: Option<EditorState>,
	focus_affordance_visible: bool,
}

#[allow(clippy::type_complexity)]
fn strategies<T: UiTree + ?Sized>() -> [(&'static str, fn(&Probe<'_, T>) -> Option<String>); 7] {
	[
		("editor_state", from_editor_state::<T>),
		("focus_breadcrumb", from_focus_breadcrumb::<T>),
		("structural_attrs", from_structural_attrs::<T>),
		("breadcrumb_trail", from_breadcrumb_trail::<T>),
		("search_context", from_search_context::<T>),
		("history_context", from_history_context::<T>),
		("history_sentinel", history_sentinel::<T>),
	]
}

/// Resolves the document shown by `surface`.
///
/// `editor` overrides the state the tree attaches to `surface`, e.g. the
/// state delivered with a host event.
pub fn resolve<T: UiTree + ?Sized>(
	tree: &T,
	surface: NodeId,
	editor: Option<&EditorState>,
) -> Option<String> {
	if !tree.exists(surface) {
		return None;
	}
	let focus_affordance_visible = tree
		.query(surface, &EXIT_FOCUS)
		.is_some_and(|button| !tree.has_class(button, "fn__none"));
	let probe = Probe {
		tree,
		surface,
		editor: editor.cloned().or_else(|| tree.editor_state(surface)),
		focus_affordance_visible,
	};

	strategies::<T>().into_iter().find_map(|(name, strategy)| {
		let id = strategy(&probe).filter(|id| !id.is_empty())?;
		trace!(strategy = name, doc_id = %id, "identity.resolved");
		Some(id)
	})
}

fn from_editor_state<T: UiTree + ?Sized>(probe: &Probe<'_, T>) -> Option<String> {
	let editor = probe.editor.as_ref()?;
	let focused = editor.show_all == Some(false) || probe.focus_affordance_visible;
	if focused {
		editor.block_id.clone()
	} else {
		editor.root_id.clone()
	}
}

fn from_focus_breadcrumb<T: UiTree + ?Sized>(probe: &Probe<'_, T>) -> Option<String> {
	if !probe.focus_affordance_visible {
		return None;
	}
	let tree = probe.tree;
	let breadcrumb = tree.query(probe.surface, &BREADCRUMB)?;
	let last = tree.query_all(breadcrumb, &BREADCRUMB_ITEM).pop()?;
	owned(tree.attr(last, "data-node-id"))
}

fn from_structural_attrs<T: UiTree + ?Sized>(probe: &Probe<'_, T>) -> Option<String> {
	let tree = probe.tree;
	let surface = probe.surface;
	let lookups: [(Option<NodeId>, &[&str]); 6] = [
		(tree.query(surface, &CONTENT), HOST_ID_ATTRS),
		(tree.query(surface, &WYSIWYG), NODE_ID_ATTR),
		(tree.query(surface, &DOC_ROOT), DOC_ROOT_ID_ATTRS),
		(tree.query(surface, &TITLE_INPUT), TITLE_ID_ATTRS),
		(tree.query(surface, &TITLE), TITLE_ID_ATTRS),
		(Some(surface), HOST_ID_ATTRS),
	];
	lookups
		.into_iter()
		.find_map(|(node, attrs)| owned(tree.attr_any(node?, attrs)))
}

fn from_breadcrumb_trail<T: UiTree + ?Sized>(probe: &Probe<'_, T>) -> Option<String> {
	let tree = probe.tree;
	let breadcrumb = tree.query(probe.surface, &BREADCRUMB)?;
	tree.query_all(breadcrumb, &BREADCRUMB_ITEM)
		.into_iter()
		.find_map(|item| owned(tree.attr(item, "data-node-id")))
}

fn from_search_context<T: UiTree + ?Sized>(probe: &Probe<'_, T>) -> Option<String> {
	let tree = probe.tree;
	let scope = tree
		.closest(probe.surface, &SEARCH_CONTEXT)
		.unwrap_or_else(|| tree.root());
	let item = tree
		.query(scope, &SEARCH_FOCUSED_ITEM)
		.or_else(|| tree.query(scope, &SEARCH_ITEM))?;
	owned(tree.attr_any(item, &["data-root-id", "data-node-id", "data-doc-id"]))
}

/// The history panel around a surface, its entry list and the active entry.
struct HistoryContext {
	panel: NodeId,
	list: NodeId,
	item: Option<NodeId>,
}

impl HistoryContext {
	fn locate<T: UiTree + ?Sized>(tree: &T, surface: NodeId) -> Self {
		let panel = tree
			.closest(surface, &HISTORY_CONTEXT)
			.unwrap_or_else(|| tree.root());
		let list = tree.query(panel, &HISTORY_LIST).unwrap_or(panel);
		let item = tree
			.query(list, &HISTORY_ACTIVE_ITEM)
			.or_else(|| tree.query(list, &LIST_ITEM));
		Self { panel, list, item }
	}
}

fn from_history_context<T: UiTree + ?Sized>(probe: &Probe<'_, T>) -> Option<String> {
	let tree = probe.tree;
	let ctx = HistoryContext::locate(tree, probe.surface);
	let item = ctx.item?;

	if let Some(id) = path_id(tree, item) {
		return Some(id);
	}
	if let Some(id) = owned(tree.attr_any(item, ITEM_ID_ATTRS)) {
		return Some(id);
	}
	let container_path = [ctx.list, ctx.panel, probe.surface]
		.into_iter()
		.find_map(|node| tree.attr(node, "data-path").filter(|p| !p.is_empty()));
	if let Some(id) = container_path.and_then(|path| owned(Some(extract_doc_id_from_path(path)))) {
		return Some(id);
	}
	if let Some(id) = tree
		.query_all(ctx.panel, &WITH_PATH)
		.into_iter()
		.find_map(|node| path_id(tree, node))
	{
		return Some(id);
	}
	let title = tree.query(ctx.panel, &TITLE_INPUT)?;
	owned(tree.attr_any(title, TITLE_ID_ATTRS))
}

fn history_sentinel<T: UiTree + ?Sized>(probe: &Probe<'_, T>) -> Option<String> {
	is_history_host(probe.tree, probe.surface).then(|| HISTORY_SENTINEL.to_string())
}

fn path_id<T: UiTree + ?Sized>(tree: &T, node: NodeId) -> Option<String> {
	owned(tree.attr(node, "data-path").map(extract_doc_id_from_path))
}

fn owned(value: Option<&str>) -> Option<String> {
	value.filter(|v| !v.is_empty()).map(str::to_string)
}

/// The change key cached alongside each widget.
///
/// Equal keys mean the widget is already current. For regular editors the key
/// is the document identifier. History previews extend it with the snapshot
/// path, loading marker and a heading fingerprint, because switching between
/// snapshots of one document keeps the identifier unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DocumentKey(String);

impl DocumentKey {
	pub fn for_surface<T: UiTree + ?Sized>(tree: &T, surface: NodeId, doc_id: &str) -> Self {
		if doc_id.is_empty() {
			return Self::default();
		}
		if !is_history_host(tree, surface) {
			return Self(doc_id.to_string());
		}
		let loading = tree.attr(surface, "data-loading").unwrap_or_default();
		Self(format!(
			"{}|{loading}|{}",
			history_snapshot_key(tree, surface, doc_id),
			heading_fingerprint(tree, surface)
		))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl fmt::Display for DocumentKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// `<doc>|<path>` for the active history entry, or just `<doc>` without one.
pub fn history_snapshot_key<T: UiTree + ?Sized>(tree: &T, surface: NodeId, doc_id: &str) -> String {
	let base = if doc_id.is_empty() { HISTORY_SENTINEL } else { doc_id };
	let path = HistoryContext::locate(tree, surface)
		.item
		.and_then(|item| tree.attr(item, "data-path"))
		.filter(|path| !path.is_empty());
	match path {
		Some(path) => format!("{base}|{path}"),
		None => base.to_string(),
	}
}

/// `c<count>:<first heading id>` over the surface's rendered headings, `c0` without any.
pub fn heading_fingerprint<T: UiTree + ?Sized>(tree: &T, surface: NodeId) -> String {
	let scope = tree.query(surface, &CONTENT).unwrap_or(surface);
	let headings = tree.query_all(scope, &HEADINGS);
	let Some(&first) = headings.first() else {
		return "c0".to_string();
	};
	let first_id = tree.attr_any(first, HEADING_ID_ATTRS).unwrap_or_default();
	format!("c{}:{first_id}", headings.len())
}

/// First node under `scope` whose `data-node-id` is `id`.
pub(crate) fn find_block<T: UiTree + ?Sized>(tree: &T, scope: NodeId, id: &str) -> Option<NodeId> {
	tree.descendants(scope)
		.find(|&node| tree.attr(node, "data-node-id") == Some(id))
}
