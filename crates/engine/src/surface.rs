//! Editor surfaces: which elements host an outline and what kind they are.

use indexmap::IndexSet;
use margin_dom::{NodeId, Selector, TreeExt, UiTree};
use rustc_hash::FxBuildHasher;

use crate::selectors::{
	BACKLINK_AREA, CANDIDATES, CONTENT, CONTENT_REGION, DOC_PANEL, EMBED, HISTORY_DIALOG,
	HISTORY_PANEL, HISTORY_PREVIEW_HOSTS, HISTORY_TEXT, PROTYLE, SEARCH_DIALOG_OPEN,
	SEARCH_PREVIEW, SEARCH_PREVIEW_HOSTS,
};

/// Where an editor surface lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
	/// A regular document tab or split.
	Editor,
	/// The preview pane of the global search dialog.
	SearchPreview,
	/// A read-only rendering of a historical snapshot.
	HistoryPreview,
}

impl SurfaceKind {
	pub fn of<T: UiTree + ?Sized>(tree: &T, host: NodeId) -> Self {
		if is_history_host(tree, host) {
			Self::HistoryPreview
		} else if is_search_preview(tree, host) {
			Self::SearchPreview
		} else {
			Self::Editor
		}
	}

	/// Previews ask the host for read-only outline renderings.
	pub fn is_preview(self) -> bool {
		!matches!(self, Self::Editor)
	}
}

/// Maps a candidate element to the element that owns its outline.
///
/// An editor root is its own host. Otherwise the first nested editor root
/// wins, then a document panel holding a content region, then the candidate
/// itself when it holds a content region.
pub fn host_element<T: UiTree + ?Sized>(tree: &T, candidate: NodeId) -> Option<NodeId> {
	if tree.matches(candidate, &PROTYLE) {
		return Some(candidate);
	}
	if let Some(inner) = tree.query(candidate, &PROTYLE) {
		return Some(inner);
	}
	if let Some(panel) = tree.query(candidate, &DOC_PANEL)
		&& tree.query(panel, &CONTENT).is_some()
	{
		return Some(panel);
	}
	tree.query(candidate, &CONTENT).map(|_| candidate)
}

pub fn is_backlink_area<T: UiTree + ?Sized>(tree: &T, node: NodeId) -> bool {
	tree.closest(node, &BACKLINK_AREA).is_some()
}

/// Backlink panels and embedded-block previews never get an outline.
pub fn is_eligible<T: UiTree + ?Sized>(tree: &T, host: NodeId) -> bool {
	!is_backlink_area(tree, host) && tree.closest(host, &EMBED).is_none()
}

pub fn has_content_region<T: UiTree + ?Sized>(tree: &T, host: NodeId) -> bool {
	tree.query(host, &CONTENT_REGION).is_some()
}

pub fn is_history_host<T: UiTree + ?Sized>(tree: &T, node: NodeId) -> bool {
	tree.closest(node, &HISTORY_TEXT).is_some()
		|| tree.closest(node, &HISTORY_PANEL).is_some()
		|| tree.closest(node, &HISTORY_DIALOG).is_some()
}

pub fn is_search_preview<T: UiTree + ?Sized>(tree: &T, node: NodeId) -> bool {
	tree.closest(node, &SEARCH_PREVIEW).is_some()
		|| tree.closest(node, &SEARCH_PREVIEW_HOSTS).is_some()
		|| tree.closest(node, &SEARCH_DIALOG_OPEN).is_some()
}

/// Every eligible host with a content region, deduplicated, in document order.
pub fn candidate_hosts<T: UiTree + ?Sized>(tree: &T) -> Vec<NodeId> {
	collect_hosts(tree, &CANDIDATES)
		.into_iter()
		.filter(|&host| has_content_region(tree, host))
		.collect()
}

/// Hosts inside the search dialog's preview pane.
pub fn search_preview_hosts<T: UiTree + ?Sized>(tree: &T) -> Vec<NodeId> {
	collect_hosts(tree, &SEARCH_PREVIEW_HOSTS)
}

/// Hosts rendering a history snapshot.
pub fn history_preview_hosts<T: UiTree + ?Sized>(tree: &T) -> Vec<NodeId> {
	collect_hosts(tree, &HISTORY_PREVIEW_HOSTS)
}

fn collect_hosts<T: UiTree + ?Sized>(tree: &T, candidates: &Selector) -> Vec<NodeId> {
	let mut hosts = IndexSet::with_hasher(FxBuildHasher);
	for candidate in tree.query_all(tree.root(), candidates) {
		if let Some(host) = host_element(tree, candidate)
			&& is_eligible(tree, host)
		{
			hosts.insert(host);
		}
	}
	hosts.into_iter().collect()
}
