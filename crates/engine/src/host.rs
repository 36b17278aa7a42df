//! Events the host delivers and the subscriptions the engine holds on it.

use margin_dom::{EditorState, NodeId};

use crate::txlog::TransactionMessage;

/// Named host bus events the engine subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostEventKind {
	SurfaceSwitched,
	SurfaceLoaded,
	BlockUpdated,
	TransactionLog,
}

impl HostEventKind {
	pub const ALL: [Self; 4] = [
		Self::SurfaceSwitched,
		Self::SurfaceLoaded,
		Self::BlockUpdated,
		Self::TransactionLog,
	];

	/// Bus name of the event.
	pub fn name(self) -> &'static str {
		match self {
			Self::SurfaceSwitched => "switch-protyle",
			Self::SurfaceLoaded => "loaded-protyle",
			Self::BlockUpdated => "update-block",
			Self::TransactionLog => "ws-main",
		}
	}
}

/// An event delivered on the host bus.
#[derive(Debug, Clone)]
pub enum HostEvent {
	/// The user switched to another editor or document.
	SurfaceSwitched {
		surface: NodeId,
		editor: Option<EditorState>,
	},
	/// An editor finished loading its content.
	SurfaceLoaded {
		surface: NodeId,
		editor: Option<EditorState>,
	},
	/// A block changed; `block_id` is absent for bulk changes.
	BlockUpdated { block_id: Option<String> },
	/// A message on the host's main channel.
	TransactionLog(TransactionMessage),
}

impl HostEvent {
	pub fn kind(&self) -> HostEventKind {
		match self {
			Self::SurfaceSwitched { .. } => HostEventKind::SurfaceSwitched,
			Self::SurfaceLoaded { .. } => HostEventKind::SurfaceLoaded,
			Self::BlockUpdated { .. } => HostEventKind::BlockUpdated,
			Self::TransactionLog(_) => HostEventKind::TransactionLog,
		}
	}
}

/// Registrations the engine holds on the host.
///
/// The engine pairs every call: each `subscribe` is matched by one
/// `unsubscribe`, `listen_document` by `unlisten_document` and each
/// `listen_clicks` by one `unlisten_clicks`.
pub trait HostPort {
	fn subscribe(&mut self, kind: HostEventKind);

	fn unsubscribe(&mut self, kind: HostEventKind);

	/// Starts forwarding document-level clicks and key presses to
	/// [`Engine::on_click`](crate::Engine::on_click) and
	/// [`Engine::on_key`](crate::Engine::on_key).
	fn listen_document(&mut self);

	fn unlisten_document(&mut self);

	/// Starts forwarding clicks inside `list` to
	/// [`Engine::on_result_list_click`](crate::Engine::on_result_list_click).
	fn listen_clicks(&mut self, list: NodeId);

	fn unlisten_clicks(&mut self, list: NodeId);
}
