//! Interpreting the host's edit transaction log.
//!
//! Only the first source of a message is examined. A message signals a
//! heading change when any forward operation carries heading markup, or when
//! an undo `update` does.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

/// Markup marking a block as a heading.
pub const HEADING_MARKER: &str = r#"data-type="NodeHeading""#;

static HEADING_SUBTYPE_RE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r#"data-subtype="h[1-6]""#).expect("valid regex"));

/// Commands carrying edit transactions.
const EDIT_COMMANDS: &[&str] = &["savedoc", "transactions"];

/// A message from the host's main channel.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionMessage {
	#[serde(default)]
	pub cmd: String,
	#[serde(default)]
	pub data: Option<TransactionData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionData {
	#[serde(default, rename = "rootID")]
	pub root_id: Option<String>,
	#[serde(default)]
	pub sources: Option<Vec<TransactionSource>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionSource {
	#[serde(default, rename = "doOperations")]
	pub do_operations: Option<Vec<RawOperation>>,
	#[serde(default, rename = "undoOperations")]
	pub undo_operations: Option<Vec<RawOperation>>,
}

/// One operation as sent by the host. `data` is markup for block edits but
/// may be any JSON value for other actions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawOperation {
	#[serde(default)]
	pub action: String,
	#[serde(default)]
	pub id: Option<String>,
	#[serde(default)]
	pub data: Option<Value>,
	#[serde(default, rename = "parentID")]
	pub parent_id: Option<String>,
}

impl RawOperation {
	fn markup(&self) -> Option<&str> {
		self.data.as_ref().and_then(Value::as_str)
	}

	fn touches_heading(&self) -> bool {
		let Some(markup) = self.markup() else {
			return false;
		};
		if markup.contains(HEADING_MARKER) {
			return true;
		}
		matches!(self.action.as_str(), "insert" | "update") && HEADING_SUBTYPE_RE.is_match(markup)
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpAction {
	Insert,
	Update,
	Delete,
	Move,
	Other(String),
}

impl OpAction {
	pub fn from_tag(tag: &str) -> Self {
		match tag {
			"insert" => Self::Insert,
			"update" => Self::Update,
			"delete" => Self::Delete,
			"move" => Self::Move,
			other => Self::Other(other.to_string()),
		}
	}

	/// Deletes and moves may drop a heading without carrying its markup.
	pub fn may_drop_block(&self) -> bool {
		matches!(self, Self::Delete | Self::Move)
	}
}

/// A forward operation reduced to what outline refresh decisions need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
	pub action: OpAction,
	pub id: Option<String>,
	pub data: Option<String>,
	pub parent_id: Option<String>,
}

/// What a transaction message means for outlines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Interpretation {
	/// Document the edit applies to, when the host names one.
	pub root_id: Option<String>,
	pub operations: Vec<Operation>,
	pub has_heading_change: bool,
}

impl TransactionMessage {
	pub fn is_edit(&self) -> bool {
		EDIT_COMMANDS.contains(&self.cmd.as_str())
	}

	pub fn interpret(&self) -> Interpretation {
		let data = self.data.as_ref();
		let mut out = Interpretation {
			root_id: data
				.and_then(|d| d.root_id.clone())
				.filter(|id| !id.is_empty()),
			..Interpretation::default()
		};

		let Some(source) = data
			.and_then(|d| d.sources.as_deref())
			.and_then(<[_]>::first)
		else {
			return out;
		};

		for op in source.do_operations.iter().flatten() {
			out.has_heading_change |= op.touches_heading();
			out.operations.push(Operation {
				action: OpAction::from_tag(&op.action),
				id: op.id.clone(),
				data: op.markup().map(str::to_string),
				parent_id: op.parent_id.clone(),
			});
		}
		out.has_heading_change |= source
			.undo_operations
			.iter()
			.flatten()
			.any(|op| op.action == "update" && op.touches_heading());
		out
	}
}

impl Interpretation {
	/// Identifiers targeted by deletes and moves.
	pub fn dropped_ids(&self) -> impl Iterator<Item = &str> {
		self.operations
			.iter()
			.filter(|op| op.action.may_drop_block())
			.filter_map(|op| op.id.as_deref())
	}
}
