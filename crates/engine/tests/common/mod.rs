#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use margin_dom::{NodeId, NodeTree, UiTree};
use margin_engine::{
	Engine, HostEventKind, HostPort, OutlineWidget, RefreshContext, WidgetFactory, WidgetOptions,
};
use web_time::Instant;

/// What the fake widgets saw, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
	Created(NodeId),
	Refresh(NodeId, String),
	Visible(NodeId, bool),
	Destroyed(NodeId),
}

#[derive(Debug, Default)]
pub struct Journal {
	pub calls: Vec<Call>,
	/// Heading ids each widget reports through `has_heading`.
	pub headings: Vec<(NodeId, String)>,
}

pub type Shared = Rc<RefCell<Journal>>;

struct FakeWidget {
	surface: NodeId,
	journal: Shared,
	destroyed: bool,
}

impl OutlineWidget for FakeWidget {
	fn refresh(&mut self, doc_id: &str, _: &RefreshContext<'_>) {
		assert!(!self.destroyed, "refresh after destroy");
		self.journal
			.borrow_mut()
			.calls
			.push(Call::Refresh(self.surface, doc_id.to_string()));
	}

	fn set_visible(&mut self, visible: bool) {
		self.journal
			.borrow_mut()
			.calls
			.push(Call::Visible(self.surface, visible));
	}

	fn destroy(&mut self) {
		assert!(!self.destroyed, "destroyed twice");
		self.destroyed = true;
		self.journal.borrow_mut().calls.push(Call::Destroyed(self.surface));
	}

	fn has_heading(&self, id: &str) -> bool {
		self.journal
			.borrow()
			.headings
			.iter()
			.any(|(surface, heading)| *surface == self.surface && heading == id)
	}
}

pub struct FakeFactory(pub Shared);

impl WidgetFactory for FakeFactory {
	fn create(&mut self, surface: NodeId, _: &WidgetOptions) -> Box<dyn OutlineWidget> {
		self.0.borrow_mut().calls.push(Call::Created(surface));
		Box::new(FakeWidget {
			surface,
			journal: self.0.clone(),
			destroyed: false,
		})
	}
}

/// Host port tracking live registrations.
#[derive(Debug, Default)]
pub struct FakePort {
	pub subscribed: Vec<HostEventKind>,
	pub document: bool,
	pub listening: Vec<NodeId>,
	pub subscribe_calls: usize,
	pub listen_calls: usize,
}

impl HostPort for FakePort {
	fn subscribe(&mut self, kind: HostEventKind) {
		assert!(!self.subscribed.contains(&kind), "double subscription to {}", kind.name());
		self.subscribed.push(kind);
		self.subscribe_calls += 1;
	}

	fn unsubscribe(&mut self, kind: HostEventKind) {
		self.subscribed.retain(|k| *k != kind);
	}

	fn listen_document(&mut self) {
		assert!(!self.document, "double document listener");
		self.document = true;
	}

	fn unlisten_document(&mut self) {
		self.document = false;
	}

	fn listen_clicks(&mut self, list: NodeId) {
		assert!(!self.listening.contains(&list), "double listener on {list:?}");
		self.listening.push(list);
		self.listen_calls += 1;
	}

	fn unlisten_clicks(&mut self, list: NodeId) {
		self.listening.retain(|l| *l != list);
	}
}

/// An engine over a [`NodeTree`] with a controllable clock.
pub struct Harness {
	pub tree: NodeTree,
	pub engine: Engine,
	pub port: FakePort,
	pub journal: Shared,
	pub now: Instant,
}

impl Harness {
	pub fn new() -> Self {
		let _ = tracing_subscriber::fmt::try_init();
		let journal = Shared::default();
		Self {
			tree: NodeTree::new(),
			engine: Engine::new(Box::new(FakeFactory(journal.clone())), WidgetOptions::default()),
			port: FakePort::default(),
			journal,
			now: Instant::now(),
		}
	}

	pub fn root(&self) -> NodeId {
		self.tree.root()
	}

	pub fn start(&mut self) {
		self.engine.start(&self.tree, &mut self.port, self.now);
		self.tree.take_records();
	}

	/// Delivers the pending mutation records as one observer batch.
	pub fn flush(&mut self) {
		let records = self.tree.take_records();
		self.engine
			.on_mutations(&self.tree, &mut self.port, &records, self.now);
	}

	/// Advances the clock and runs due timers; returns how many fired.
	pub fn advance(&mut self, ms: u64) -> usize {
		self.now += Duration::from_millis(ms);
		self.engine.tick(&self.tree, self.now)
	}

	pub fn calls(&self) -> Vec<Call> {
		self.journal.borrow().calls.clone()
	}

	pub fn take_calls(&self) -> Vec<Call> {
		std::mem::take(&mut self.journal.borrow_mut().calls)
	}

	pub fn refreshes(&self) -> Vec<(NodeId, String)> {
		self.calls()
			.into_iter()
			.filter_map(|call| match call {
				Call::Refresh(surface, doc) => Some((surface, doc)),
				_ => None,
			})
			.collect()
	}

	/// Appends a regular editor showing `doc`.
	pub fn editor(&mut self, doc: &str) -> NodeId {
		let root = self.tree.root();
		let host = self.tree.append(root, ".protyle");
		self.tree
			.append(host, &format!(".protyle-content[data-node-id='{doc}']"));
		host
	}

	/// The content region appended by [`Harness::editor`].
	pub fn content_of(&self, host: NodeId) -> NodeId {
		self.tree.first_child(host).expect("editor has a content region")
	}
}

/// The global search dialog with `items` results and a preview surface.
pub struct SearchDialog {
	pub dialog: NodeId,
	pub list: NodeId,
	pub items: Vec<NodeId>,
	pub preview: NodeId,
}

pub fn search_dialog(tree: &mut NodeTree, items: usize) -> SearchDialog {
	let root = tree.root();
	let dialog = tree.append(root, ".b3-dialog.b3-dialog--open[data-key='dialog-globalsearch']");
	let list = tree.append(dialog, ".search__list");
	let items = (1..=items)
		.map(|n| tree.append(list, &format!(".b3-list-item[data-root-id='doc-{n}']")))
		.collect();
	let pane = tree.append(dialog, "#searchPreview.search__preview");
	let preview = tree.append(pane, ".protyle");
	tree.append(preview, ".protyle-content");
	SearchDialog {
		dialog,
		list,
		items,
		preview,
	}
}

pub const SNAPSHOT_OLD: &str = "/history/2023-01-01/20230101120000-abc1234.sy";
pub const SNAPSHOT_NEW: &str = "/history/2023-02-01/20230101120000-abc1234.sy";

/// A history panel listing two snapshots of one document, the first active,
/// and a preview rendering two headings.
pub struct HistoryPanel {
	pub panel: NodeId,
	pub entries: Vec<NodeId>,
	pub preview: NodeId,
	pub content: NodeId,
}

pub fn history_panel(tree: &mut NodeTree) -> HistoryPanel {
	let root = tree.root();
	let panel = tree.append(root, ".history__panel");
	let side = tree.append(panel, ".history__side");
	let entries = vec![
		tree.append(side, &format!(".b3-list-item.b3-list-item--focus[data-path='{SNAPSHOT_OLD}']")),
		tree.append(side, &format!(".b3-list-item[data-path='{SNAPSHOT_NEW}']")),
	];
	let text = tree.append(panel, ".history__text");
	let preview = tree.append(text, ".protyle[data-loading='finished']");
	let content = tree.append(preview, ".protyle-content");
	tree.append(content, "[data-type='NodeHeading'][data-node-id='h1']");
	tree.append(content, "[data-type='NodeHeading'][data-node-id='h2']");
	HistoryPanel {
		panel,
		entries,
		preview,
		content,
	}
}

/// Widgets currently alive per surface.
pub fn live_widgets(calls: &[Call], surface: NodeId) -> i64 {
	calls.iter().fold(0, |live, call| match call {
		Call::Created(s) if *s == surface => live + 1,
		Call::Destroyed(s) if *s == surface => live - 1,
		_ => live,
	})
}

pub fn is_attached(tree: &NodeTree, node: NodeId) -> bool {
	use margin_dom::TreeExt;
	tree.exists(node) && tree.is_connected(node)
}
