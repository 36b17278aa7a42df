//! The contract between the engine and the outline widgets it manages.

use margin_config::{DockSide, PluginConfig, ToolbarAction};
use margin_dom::{EditorState, NodeId};

use crate::surface::SurfaceKind;

/// Width used when the configured collapsed width is unset.
pub const DEFAULT_MINI_WIDTH: u32 = 32;

/// Construction options handed to every new widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetOptions {
	pub dock_side: DockSide,
	pub follow_focus: bool,
	pub adaptive_height: bool,
	pub mini_width: u32,
	pub width: u32,
	pub pinned: bool,
	pub toolbar: Vec<ToolbarAction>,
}

impl Default for WidgetOptions {
	fn default() -> Self {
		Self::from(&PluginConfig::default())
	}
}

impl From<&PluginConfig> for WidgetOptions {
	fn from(config: &PluginConfig) -> Self {
		Self {
			dock_side: config.dock_side,
			follow_focus: config.follow_focus,
			adaptive_height: config.adaptive_height,
			mini_width: match config.mini_toc_width {
				0 => DEFAULT_MINI_WIDTH,
				width => width,
			},
			width: config.toc_width,
			pinned: config.is_pinned,
			toolbar: config.toolbar_config.clone(),
		}
	}
}

/// Where a refresh was requested from.
#[derive(Debug, Clone, Copy)]
pub struct RefreshContext<'a> {
	pub surface: NodeId,
	pub kind: SurfaceKind,
	/// Editor state delivered with the triggering event, if any.
	pub editor: Option<&'a EditorState>,
}

/// One outline panel attached to one surface.
///
/// Refreshing is expected to be cheap to request: widgets fetch outlines
/// asynchronously and drop stale responses themselves.
pub trait OutlineWidget {
	/// Reloads the outline of `doc_id`.
	fn refresh(&mut self, doc_id: &str, ctx: &RefreshContext<'_>);

	fn set_visible(&mut self, visible: bool);

	/// Releases everything the widget holds. Called exactly once.
	fn destroy(&mut self);

	/// Whether the currently shown outline contains heading `id`.
	fn has_heading(&self, _id: &str) -> bool {
		false
	}
}

/// Builds widgets for surfaces.
pub trait WidgetFactory {
	/// Creates a widget mounted on `surface`.
	fn create(&mut self, surface: NodeId, options: &WidgetOptions) -> Box<dyn OutlineWidget>;
}
