//! Classifies raw tree mutations into the change signals the engine acts on.

use margin_dom::{Mutation, NodeId, Selector, TreeExt, UiTree};
use smallvec::SmallVec;

use crate::selectors::{
	BREADCRUMB, BREADCRUMB_BAR, BREADCRUMB_PARTS, HISTORY_LIST, HISTORY_MARKERS,
	HISTORY_PANEL_FAMILY, LIST_ITEM, PROTYLE, PROTYLE_OR_DIALOG, SEARCH_LIST, SEARCH_SURFACE_PARTS,
};
use crate::surface::is_backlink_area;

/// Attributes whose changes are worth observing.
pub const OBSERVED_ATTRIBUTES: &[&str] = &["class", "data-loading", "data-node-id", "data-root-id"];

/// What a batch of mutations asks the engine to do.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signals {
	/// Run a debounced full reconciliation.
	pub rescan: bool,
	/// Refresh search preview surfaces.
	pub search_changed: bool,
	/// Refresh history preview surfaces.
	pub history_changed: bool,
	/// Newly added search result lists needing a click listener.
	pub result_lists: SmallVec<[NodeId; 1]>,
}

impl Signals {
	pub fn attach_result_listeners(&self) -> bool {
		!self.result_lists.is_empty()
	}

	pub fn is_quiet(&self) -> bool {
		!self.rescan && !self.search_changed && !self.history_changed && self.result_lists.is_empty()
	}

	pub fn merge(&mut self, other: Signals) {
		self.rescan |= other.rescan;
		self.search_changed |= other.search_changed;
		self.history_changed |= other.history_changed;
		for list in other.result_lists {
			if !self.result_lists.contains(&list) {
				self.result_lists.push(list);
			}
		}
	}
}

/// Classifies a whole observer batch.
pub fn classify_batch<T: UiTree + ?Sized>(tree: &T, records: &[Mutation]) -> Signals {
	let mut signals = Signals::default();
	for record in records {
		signals.merge(classify(tree, record));
	}
	signals
}

pub fn classify<T: UiTree + ?Sized>(tree: &T, record: &Mutation) -> Signals {
	match record {
		Mutation::ChildList {
			target,
			added,
			removed,
		} => classify_child_list(tree, *target, added, removed),
		Mutation::Attributes { target, name } => classify_attribute(tree, *target, name),
	}
}

fn classify_child_list<T: UiTree + ?Sized>(
	tree: &T,
	target: NodeId,
	added: &[NodeId],
	removed: &[NodeId],
) -> Signals {
	let mut signals = Signals {
		rescan: is_breadcrumb(tree, target),
		..Signals::default()
	};

	for &node in added.iter().chain(removed) {
		if is_surface_related(tree, node) {
			signals.rescan = true;
		}
		if tree.matches(node, &SEARCH_LIST) {
			signals.search_changed = true;
		}
		// Removed nodes are already detached, so items are judged by the list they left.
		let item = tree.matches(node, &LIST_ITEM);
		if item && tree.closest(target, &SEARCH_LIST).is_some() {
			signals.search_changed = true;
		}
		if is_history_related(tree, node) || (item && tree.closest(target, &HISTORY_LIST).is_some()) {
			signals.rescan = true;
			signals.history_changed = true;
		}
	}

	for &node in added {
		if tree.matches(node, &SEARCH_LIST) {
			signals.result_lists.push(node);
		}
	}

	signals
}

fn classify_attribute<T: UiTree + ?Sized>(tree: &T, target: NodeId, name: &str) -> Signals {
	let mut signals = Signals::default();
	if !OBSERVED_ATTRIBUTES.contains(&name) {
		return signals;
	}
	let class_change = name == "class";

	let search_attr = (class_change && is_result_item(tree, target))
		|| tree.matches(target, &BREADCRUMB_PARTS)
		|| tree.matches(target, &SEARCH_SURFACE_PARTS);
	let history_attr =
		(class_change && is_history_item(tree, target)) || tree.matches(target, &HISTORY_PANEL_FAMILY);
	let loading = name == "data-loading" && tree.matches(target, &PROTYLE);

	if search_attr || loading {
		signals.search_changed = true;
		signals.rescan = true;
	}
	if history_attr {
		signals.history_changed = true;
		signals.rescan = true;
	}
	signals
}

fn is_breadcrumb<T: UiTree + ?Sized>(tree: &T, node: NodeId) -> bool {
	tree.matches(node, &BREADCRUMB_BAR) || tree.closest(node, &BREADCRUMB).is_some()
}

/// An editor root, something containing one, or a dialog that may host one.
fn is_surface_related<T: UiTree + ?Sized>(tree: &T, node: NodeId) -> bool {
	!is_backlink_area(tree, node)
		&& (tree.matches(node, &PROTYLE_OR_DIALOG) || tree.query(node, &PROTYLE).is_some())
}

fn is_result_item<T: UiTree + ?Sized>(tree: &T, node: NodeId) -> bool {
	is_list_item_within(tree, node, &SEARCH_LIST)
}

fn is_history_item<T: UiTree + ?Sized>(tree: &T, node: NodeId) -> bool {
	is_list_item_within(tree, node, &HISTORY_LIST)
}

fn is_list_item_within<T: UiTree + ?Sized>(tree: &T, node: NodeId, list: &Selector) -> bool {
	tree.matches(node, &LIST_ITEM) && tree.closest(node, list).is_some()
}

fn is_history_related<T: UiTree + ?Sized>(tree: &T, node: NodeId) -> bool {
	tree.matches(node, &HISTORY_PANEL_FAMILY) || tree.query(node, &HISTORY_MARKERS).is_some()
}
