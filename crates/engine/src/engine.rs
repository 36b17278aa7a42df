//! The outline engine: lifecycle, host events and timer dispatch.

use indexmap::IndexSet;
use margin_dom::{EditorState, Mutation, NodeId, TreeExt, UiTree};
use rustc_hash::FxBuildHasher;
use tracing::{debug, info, trace};
use web_time::Instant;

use crate::coalesce::{Coalescer, Due, RetryTarget};
use crate::host::{HostEvent, HostEventKind, HostPort};
use crate::identity::{self, DocumentKey, find_block};
use crate::registry::{ReconcileReport, SurfaceRegistry};
use crate::selectors::{HISTORY_LIST, LIST_ITEM, SEARCH_DIALOG_OPEN, SEARCH_LIST, SEARCH_PREVIEW};
use crate::signal;
use crate::surface::{self, is_search_preview};
use crate::txlog::TransactionMessage;
use crate::widget::{WidgetFactory, WidgetOptions};

/// Keys that move through search results while the search dialog is open.
pub const RESULT_NAVIGATION_KEYS: &[&str] = &["ArrowUp", "ArrowDown", "PageUp", "PageDown"];

/// Keeps one outline widget per editor surface in sync with the host UI.
///
/// The engine is single-threaded and passive: the host feeds it mutation
/// batches, bus events, clicks, keys and clock ticks, always together with
/// a read-only view of the current tree.
#[derive(Debug)]
pub struct Engine {
	registry: SurfaceRegistry,
	timers: Coalescer,
	/// Search result lists with a click listener attached.
	listened_lists: IndexSet<NodeId, FxBuildHasher>,
	running: bool,
}

impl Engine {
	pub fn new(factory: Box<dyn WidgetFactory>, options: WidgetOptions) -> Self {
		Self {
			registry: SurfaceRegistry::new(factory, options),
			timers: Coalescer::new(),
			listened_lists: IndexSet::default(),
			running: false,
		}
	}

	pub fn is_running(&self) -> bool {
		self.running
	}

	pub fn registry(&self) -> &SurfaceRegistry {
		&self.registry
	}

	/// Number of armed timers.
	pub fn live_timers(&self) -> usize {
		self.timers.live_timers()
	}

	/// Number of result lists with an attached click listener.
	pub fn listened_lists(&self) -> usize {
		self.listened_lists.len()
	}

	/// When the host should next call [`Engine::tick`].
	pub fn next_deadline(&self) -> Option<Instant> {
		self.timers.next_deadline()
	}

	/// Subscribes to host events, attaches the document and result-list
	/// listeners, runs an initial reconciliation and starts the periodic
	/// preview check.
	///
	/// Starting a running engine does nothing.
	pub fn start<T: UiTree + ?Sized>(&mut self, tree: &T, port: &mut dyn HostPort, now: Instant) {
		if self.running {
			return;
		}
		self.running = true;
		for kind in HostEventKind::ALL {
			port.subscribe(kind);
		}
		port.listen_document();
		for list in tree.query_all(tree.root(), &SEARCH_LIST) {
			self.listen(port, list);
		}
		let report = self.registry.reconcile(tree);
		self.timers.start_periodic(now);
		info!(widgets = report.created, "engine.started");
	}

	/// Releases every subscription, listener, timer and widget.
	///
	/// Safe to call repeatedly; a stopped engine may be started again.
	pub fn teardown(&mut self, port: &mut dyn HostPort) {
		if !self.running {
			return;
		}
		self.running = false;
		for kind in HostEventKind::ALL {
			port.unsubscribe(kind);
		}
		port.unlisten_document();
		for list in self.listened_lists.drain(..) {
			port.unlisten_clicks(list);
		}
		self.timers.cancel_all();
		let widgets = self.registry.len();
		self.registry.clear();
		info!(widgets, "engine.stopped");
	}

	/// Shows or hides every widget.
	pub fn set_visible(&mut self, visible: bool) {
		self.registry.set_visible(visible);
	}

	/// Runs a full reconciliation now, bypassing the debounce.
	pub fn reconcile<T: UiTree + ?Sized>(&mut self, tree: &T) -> ReconcileReport {
		self.registry.reconcile(tree)
	}

	/// Feeds one batch of observed tree mutations.
	pub fn on_mutations<T: UiTree + ?Sized>(
		&mut self,
		tree: &T,
		port: &mut dyn HostPort,
		records: &[Mutation],
		now: Instant,
	) {
		if !self.running {
			return;
		}
		let signals = signal::classify_batch(tree, records);
		if signals.is_quiet() {
			return;
		}
		trace!(
			records = records.len(),
			rescan = signals.rescan,
			search = signals.search_changed,
			history = signals.history_changed,
			"engine.mutations"
		);
		self.release_detached_lists(tree, port);
		for &list in &signals.result_lists {
			self.listen(port, list);
		}
		if signals.rescan {
			self.timers.request_rescan(now);
		}
		if signals.search_changed {
			self.schedule_search_update(tree, now);
		}
		if signals.history_changed {
			self.schedule_history_update(tree, now);
		}
	}

	/// Handles one host bus event.
	pub fn on_host_event<T: UiTree + ?Sized>(&mut self, tree: &T, event: &HostEvent, now: Instant) {
		if !self.running {
			return;
		}
		trace!(event = event.kind().name(), "engine.host_event");
		match event {
			HostEvent::SurfaceSwitched { surface, editor } => {
				let target = RetryTarget {
					surface: *surface,
					editor: editor.clone(),
				};
				self.switch_update(tree, &target);
				self.timers.schedule_switch_retry(now, target);
			}
			HostEvent::SurfaceLoaded { surface, editor } => {
				self.surface_loaded(tree, *surface, editor.as_ref(), now);
			}
			HostEvent::BlockUpdated { block_id } => self.block_updated(tree, block_id.as_deref()),
			HostEvent::TransactionLog(message) => self.transaction_log(tree, message),
		}
	}

	/// Document-level click delegation.
	pub fn on_click<T: UiTree + ?Sized>(&mut self, tree: &T, target: NodeId, now: Instant) {
		if !self.running {
			return;
		}
		if tree.closest(target, &SEARCH_PREVIEW).is_some() {
			self.schedule_search_update(tree, now);
		}
		if tree.closest(target, &HISTORY_LIST).is_some() {
			self.schedule_history_update(tree, now);
		}
	}

	/// A click inside a search result list with an attached listener.
	pub fn on_result_list_click<T: UiTree + ?Sized>(&mut self, tree: &T, target: NodeId, now: Instant) {
		if self.running && tree.closest(target, &LIST_ITEM).is_some() {
			self.schedule_search_update(tree, now);
		}
	}

	/// Document-level key handling.
	pub fn on_key<T: UiTree + ?Sized>(&mut self, tree: &T, key: &str, now: Instant) {
		if self.running
			&& RESULT_NAVIGATION_KEYS.contains(&key)
			&& tree.query(tree.root(), &SEARCH_DIALOG_OPEN).is_some()
		{
			self.schedule_search_update(tree, now);
		}
	}

	/// Runs every timer due at `now` and returns how many fired.
	pub fn tick<T: UiTree + ?Sized>(&mut self, tree: &T, now: Instant) -> usize {
		if !self.running {
			return 0;
		}
		let due = self.timers.poll(now);
		let fired = due.len();
		for work in due {
			trace!(?work, "engine.timer_fired");
			match work {
				Due::Rescan => {
					self.registry.reconcile(tree);
				}
				Due::SearchUpdate => self.update_search_previews(tree),
				Due::HistoryUpdate => self.update_history_previews(tree),
				Due::PeriodicCheck => {
					self.update_search_previews(tree);
					self.update_history_previews(tree);
				}
				Due::SwitchRetry(target) => self.switch_update(tree, &target),
				Due::LoadRetry(target) => self.load_retry(tree, &target),
			}
		}
		fired
	}

	fn listen(&mut self, port: &mut dyn HostPort, list: NodeId) {
		if self.listened_lists.insert(list) {
			port.listen_clicks(list);
			trace!(?list, "engine.result_list_listening");
		}
	}

	/// Drops listeners on result lists that left the tree with their dialog.
	fn release_detached_lists<T: UiTree + ?Sized>(&mut self, tree: &T, port: &mut dyn HostPort) {
		self.listened_lists.retain(|&list| {
			if tree.is_connected(list) {
				return true;
			}
			port.unlisten_clicks(list);
			trace!(?list, "engine.result_list_released");
			false
		});
	}

	fn schedule_search_update<T: UiTree + ?Sized>(&mut self, tree: &T, now: Instant) {
		self.timers.request_search_update(now);
		self.update_search_previews(tree);
	}

	fn schedule_history_update<T: UiTree + ?Sized>(&mut self, tree: &T, now: Instant) {
		self.timers.request_history_update(now);
		self.update_history_previews(tree);
	}

	fn update_search_previews<T: UiTree + ?Sized>(&mut self, tree: &T) {
		for host in surface::search_preview_hosts(tree) {
			if let Some(doc_id) = identity::resolve(tree, host, None) {
				self.registry.update(tree, host, &doc_id, None, false);
			}
		}
	}

	fn update_history_previews<T: UiTree + ?Sized>(&mut self, tree: &T) {
		for host in surface::history_preview_hosts(tree) {
			if let Some(doc_id) = identity::resolve(tree, host, None) {
				self.registry.update(tree, host, &doc_id, None, false);
			}
		}
	}

	/// Forced refresh for a switched surface; creates the widget if missing.
	fn switch_update<T: UiTree + ?Sized>(&mut self, tree: &T, target: &RetryTarget) {
		let surface = target.surface;
		if !tree.is_connected(surface) || !surface::is_eligible(tree, surface) {
			return;
		}
		let editor = target.editor.as_ref();
		let Some(doc_id) = identity::resolve(tree, surface, editor) else {
			return;
		};
		self.registry.update(tree, surface, &doc_id, editor, true);
	}

	fn surface_loaded<T: UiTree + ?Sized>(
		&mut self,
		tree: &T,
		surface: NodeId,
		editor: Option<&EditorState>,
		now: Instant,
	) {
		if !tree.is_connected(surface) || !surface::is_eligible(tree, surface) {
			return;
		}
		let Some(doc_id) = identity::resolve(tree, surface, editor) else {
			return;
		};
		let Some(previous) = self.registry.cached_key(surface) else {
			self.registry.update(tree, surface, &doc_id, editor, false);
			return;
		};
		if *previous == DocumentKey::for_surface(tree, surface, &doc_id) {
			return;
		}
		self.registry.update(tree, surface, &doc_id, editor, true);
		if is_search_preview(tree, surface) {
			debug!(?surface, "engine.load_retry_scheduled");
			self.timers.schedule_load_retry(
				now,
				RetryTarget {
					surface,
					editor: editor.cloned(),
				},
			);
		}
	}

	fn load_retry<T: UiTree + ?Sized>(&mut self, tree: &T, target: &RetryTarget) {
		if !tree.is_connected(target.surface) {
			return;
		}
		let editor = target.editor.as_ref();
		if let Some(doc_id) = identity::resolve(tree, target.surface, editor) {
			self.registry.update(tree, target.surface, &doc_id, editor, true);
		}
	}

	fn block_updated<T: UiTree + ?Sized>(&mut self, tree: &T, block_id: Option<&str>) {
		for host in self.registry.surfaces() {
			let Some(doc_id) = identity::resolve(tree, host, None) else {
				continue;
			};
			let affected = block_id.is_none_or(|id| find_block(tree, host, id).is_some());
			if affected {
				self.registry.update(tree, host, &doc_id, None, true);
			}
		}
	}

	fn transaction_log<T: UiTree + ?Sized>(&mut self, tree: &T, message: &TransactionMessage) {
		if !message.is_edit() {
			return;
		}
		let parsed = message.interpret();

		for host in self.registry.surfaces() {
			let Some(doc_id) = identity::resolve(tree, host, None) else {
				continue;
			};
			let file_root = tree
				.editor_state(host)
				.and_then(|state| state.root_id)
				.filter(|id| !id.is_empty())
				.unwrap_or_else(|| doc_id.clone());
			if parsed.root_id.as_ref().is_some_and(|root| *root != file_root) {
				continue;
			}

			let reload = parsed.has_heading_change
				|| parsed.dropped_ids().any(|id| {
					self.registry
						.widget(host)
						.is_some_and(|widget| widget.has_heading(id))
						|| find_block(tree, host, id)
							.is_some_and(|block| tree.attr(block, "data-type") == Some("NodeHeading"))
				});
			if reload {
				debug!(?host, doc_id, "engine.headings_changed");
				self.registry.update(tree, host, &doc_id, None, true);
			}
		}
	}
}
