//! Settings schema.
//!
//! Keys are camelCase to match the persisted `config.json` document.

use serde::{Deserialize, Serialize};

/// Which edge of the editor surface the outline docks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DockSide {
	Left,
	#[default]
	Right,
}

/// Buttons shown in the outline toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ToolbarAction {
	ScrollToTop,
	ScrollToBottom,
	RefreshDoc,
	TogglePin,
	ToggleDockSide,
	CollapseAll,
	ExpandAll,
}

/// Corner used by the fullscreen helper button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ButtonPosition {
	TopRight,
	#[default]
	TopLeft,
}

/// Toggles for the embedded-diagram fullscreen helper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullscreenConfig {
	pub enable_fullscreen_helper: bool,
	pub enable_mermaid: bool,
	#[serde(rename = "enableECharts")]
	pub enable_echarts: bool,
	pub enable_sheet_music: bool,
	pub enable_graphviz: bool,
	pub enable_flowchart: bool,
	#[serde(rename = "enableIFrame")]
	pub enable_iframe: bool,
	pub enable_double_click: bool,
	pub button_position: ButtonPosition,
}

impl Default for FullscreenConfig {
	fn default() -> Self {
		Self {
			enable_fullscreen_helper: true,
			enable_mermaid: true,
			enable_echarts: true,
			enable_sheet_music: true,
			enable_graphviz: true,
			enable_flowchart: true,
			enable_iframe: true,
			enable_double_click: true,
			button_position: ButtonPosition::TopLeft,
		}
	}
}

/// Complete outline settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginConfig {
	pub dock_side: DockSide,
	pub is_pinned: bool,
	pub toc_width: u32,
	pub follow_focus: bool,
	pub mini_toc_width: u32,
	pub adaptive_height: bool,
	pub toolbar_config: Vec<ToolbarAction>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub custom_css: Option<String>,
	pub fullscreen_config: FullscreenConfig,
}

impl Default for PluginConfig {
	fn default() -> Self {
		Self {
			dock_side: DockSide::Right,
			is_pinned: false,
			toc_width: 250,
			follow_focus: true,
			mini_toc_width: 32,
			adaptive_height: true,
			toolbar_config: vec![
				ToolbarAction::ScrollToTop,
				ToolbarAction::ScrollToBottom,
				ToolbarAction::RefreshDoc,
			],
			custom_css: None,
			fullscreen_config: FullscreenConfig::default(),
		}
	}
}

/// Keys of [`PluginConfig`] as persisted, in schema order.
pub(crate) const TOP_LEVEL_KEYS: &[&str] = &[
	"dockSide",
	"isPinned",
	"tocWidth",
	"followFocus",
	"miniTocWidth",
	"adaptiveHeight",
	"toolbarConfig",
	"customCss",
	"fullscreenConfig",
];

/// Key of the nested fullscreen block, merged one level deep.
pub(crate) const FULLSCREEN_KEY: &str = "fullscreenConfig";
