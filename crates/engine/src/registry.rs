//! One widget per live surface, keyed by surface handle.

use indexmap::IndexMap;
use margin_dom::{EditorState, NodeId, TreeExt, UiTree};
use rustc_hash::FxBuildHasher;
use tracing::{debug, trace};

use crate::identity::{self, DocumentKey};
use crate::surface::{self, SurfaceKind};
use crate::widget::{OutlineWidget, RefreshContext, WidgetFactory, WidgetOptions};

struct Entry {
	widget: Box<dyn OutlineWidget>,
	key: DocumentKey,
}

/// Result of [`SurfaceRegistry::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
	Created,
	Refreshed,
	/// The cached key already matched.
	Unchanged,
}

/// Counts from one [`SurfaceRegistry::reconcile`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
	pub created: usize,
	pub refreshed: usize,
	pub destroyed: usize,
	/// Hosts whose identity did not resolve.
	pub unresolved: usize,
}

/// Owns every live widget and the key it last rendered.
pub struct SurfaceRegistry {
	entries: IndexMap<NodeId, Entry, FxBuildHasher>,
	factory: Box<dyn WidgetFactory>,
	options: WidgetOptions,
	visible: bool,
}

impl std::fmt::Debug for SurfaceRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SurfaceRegistry")
			.field("surfaces", &self.entries.keys().collect::<Vec<_>>())
			.field("options", &self.options)
			.field("visible", &self.visible)
			.finish_non_exhaustive()
	}
}

impl SurfaceRegistry {
	pub fn new(factory: Box<dyn WidgetFactory>, options: WidgetOptions) -> Self {
		Self {
			entries: IndexMap::default(),
			factory,
			options,
			visible: true,
		}
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn contains(&self, surface: NodeId) -> bool {
		self.entries.contains_key(&surface)
	}

	/// Surfaces with a widget, in creation order.
	pub fn surfaces(&self) -> Vec<NodeId> {
		self.entries.keys().copied().collect()
	}

	pub fn cached_key(&self, surface: NodeId) -> Option<&DocumentKey> {
		self.entries.get(&surface).map(|entry| &entry.key)
	}

	pub fn widget(&self, surface: NodeId) -> Option<&dyn OutlineWidget> {
		self.entries.get(&surface).map(|entry| &*entry.widget)
	}

	pub fn options(&self) -> &WidgetOptions {
		&self.options
	}

	pub fn is_visible(&self) -> bool {
		self.visible
	}

	/// Brings widgets in line with the surfaces present in `tree`.
	///
	/// Creates widgets for new surfaces, refreshes those whose key changed and
	/// destroys widgets whose surface is gone.
	pub fn reconcile<T: UiTree + ?Sized>(&mut self, tree: &T) -> ReconcileReport {
		let mut report = ReconcileReport::default();

		for host in surface::candidate_hosts(tree) {
			let Some(doc_id) = identity::resolve(tree, host, None) else {
				report.unresolved += 1;
				continue;
			};
			match self.update(tree, host, &doc_id, None, false) {
				UpdateOutcome::Created => report.created += 1,
				UpdateOutcome::Refreshed => report.refreshed += 1,
				UpdateOutcome::Unchanged => {}
			}
		}
		report.destroyed = self.prune(tree);

		if report != ReconcileReport::default() {
			debug!(
				created = report.created,
				refreshed = report.refreshed,
				destroyed = report.destroyed,
				unresolved = report.unresolved,
				live = self.entries.len(),
				"registry.reconciled"
			);
		}
		report
	}

	/// Creates or refreshes the widget of `surface` for `doc_id`.
	///
	/// Without `force`, an existing widget whose cached key equals the current
	/// one is left alone.
	pub fn update<T: UiTree + ?Sized>(
		&mut self,
		tree: &T,
		surface: NodeId,
		doc_id: &str,
		editor: Option<&EditorState>,
		force: bool,
	) -> UpdateOutcome {
		let key = DocumentKey::for_surface(tree, surface, doc_id);
		let ctx = RefreshContext {
			surface,
			kind: SurfaceKind::of(tree, surface),
			editor,
		};

		let Some(entry) = self.entries.get_mut(&surface) else {
			self.create(surface, doc_id, key, &ctx);
			return UpdateOutcome::Created;
		};
		if !force && entry.key == key {
			trace!(?surface, %key, "registry.unchanged");
			return UpdateOutcome::Unchanged;
		}
		entry.widget.refresh(doc_id, &ctx);
		debug!(?surface, doc_id, %key, force, "registry.refreshed");
		entry.key = key;
		UpdateOutcome::Refreshed
	}

	fn create(&mut self, surface: NodeId, doc_id: &str, key: DocumentKey, ctx: &RefreshContext<'_>) {
		let mut widget = self.factory.create(surface, &self.options);
		widget.set_visible(self.visible);
		widget.refresh(doc_id, ctx);
		debug!(?surface, doc_id, kind = ?ctx.kind, "registry.created");
		self.entries.insert(surface, Entry { widget, key });
	}

	/// Destroys widgets whose surface left the tree and returns how many.
	pub fn prune<T: UiTree + ?Sized>(&mut self, tree: &T) -> usize {
		let before = self.entries.len();
		self.entries.retain(|&surface, entry| {
			if tree.is_connected(surface) {
				return true;
			}
			entry.widget.destroy();
			debug!(?surface, "registry.destroyed");
			false
		});
		before - self.entries.len()
	}

	/// Shows or hides every widget, and widgets created later.
	pub fn set_visible(&mut self, visible: bool) {
		self.visible = visible;
		for entry in self.entries.values_mut() {
			entry.widget.set_visible(visible);
		}
	}

	/// Destroys every widget.
	pub fn clear(&mut self) {
		for (surface, mut entry) in self.entries.drain(..) {
			entry.widget.destroy();
			trace!(?surface, "registry.destroyed");
		}
	}
}
