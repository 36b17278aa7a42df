//! Arena-backed UI tree with mutation recording.
//!
//! Removal only detaches: a removed subtree stays inspectable, exactly like a
//! detached DOM node handed to a mutation observer, until
//! [`NodeTree::purge_detached`] frees it. Purged slots bump their generation
//! so stale [`NodeId`]s stop resolving.

use slab::Slab;

use crate::selector::{Selector, SelectorError};
use crate::tree::{EditorState, NodeId, TreeExt, UiTree};

/// One change record, shaped like a host mutation observer entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
	/// Children of `target` were added or removed.
	ChildList {
		target: NodeId,
		added: Vec<NodeId>,
		removed: Vec<NodeId>,
	},
	/// Attribute `name` of `target` changed.
	Attributes { target: NodeId, name: String },
}

#[derive(Debug)]
struct NodeData {
	generation: u32,
	tag: String,
	attrs: Vec<(String, String)>,
	parent: Option<NodeId>,
	children: Vec<NodeId>,
	editor: Option<EditorState>,
}

/// Owned UI tree implementing [`UiTree`].
#[derive(Debug)]
pub struct NodeTree {
	nodes: Slab<NodeData>,
	root: NodeId,
	/// Generation for the next allocation; bumped on every purge.
	generation: u32,
	records: Vec<Mutation>,
}

impl Default for NodeTree {
	fn default() -> Self {
		Self::new()
	}
}

impl NodeTree {
	/// Creates a tree holding a lone `body` root.
	pub fn new() -> Self {
		let mut nodes = Slab::new();
		let index = nodes.insert(NodeData {
			generation: 0,
			tag: "body".into(),
			attrs: Vec::new(),
			parent: None,
			children: Vec::new(),
			editor: None,
		});
		Self {
			nodes,
			root: NodeId::new(index as u32, 0),
			generation: 0,
			records: Vec::new(),
		}
	}

	fn data(&self, node: NodeId) -> Option<&NodeData> {
		self.nodes
			.get(node.index() as usize)
			.filter(|d| d.generation == node.generation())
	}

	fn data_mut(&mut self, node: NodeId) -> Option<&mut NodeData> {
		self.nodes
			.get_mut(node.index() as usize)
			.filter(|d| d.generation == node.generation())
	}

	/// Creates a detached element described by a compound selector, e.g.
	/// `div.protyle[data-node-id='x']`. A missing tag means `div`.
	pub fn try_create(&mut self, spec: &str) -> Result<NodeId, SelectorError> {
		let compound = Selector::parse_compound(spec)?;
		let mut attrs = Vec::new();
		if let Some(id) = compound.id {
			attrs.push(("id".to_string(), id));
		}
		if !compound.classes.is_empty() {
			attrs.push(("class".to_string(), compound.classes.join(" ")));
		}
		for attr in compound.attrs {
			attrs.push((attr.name, attr.value.unwrap_or_default()));
		}
		let index = self.nodes.insert(NodeData {
			generation: self.generation,
			tag: compound.tag.unwrap_or_else(|| "div".into()),
			attrs,
			parent: None,
			children: Vec::new(),
			editor: None,
		});
		Ok(NodeId::new(index as u32, self.generation))
	}

	/// Creates an element from `spec` and appends it under `parent`.
	///
	/// # Panics
	///
	/// Panics if `spec` is not a valid compound selector.
	pub fn append(&mut self, parent: NodeId, spec: &str) -> NodeId {
		match self.try_create(spec) {
			Ok(node) => {
				self.append_child(parent, node);
				node
			}
			Err(err) => panic!("invalid node spec {spec:?}: {err}"),
		}
	}

	/// Moves `child` under `parent`, after its existing children.
	///
	/// Ignored when either handle is stale or `child` contains `parent`.
	pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
		if !self.exists(parent) || !self.exists(child) || self.contains(child, parent) {
			return;
		}
		self.detach(child);
		if let Some(data) = self.data_mut(parent) {
			data.children.push(child);
		}
		if let Some(data) = self.data_mut(child) {
			data.parent = Some(parent);
		}
		self.records.push(Mutation::ChildList {
			target: parent,
			added: vec![child],
			removed: Vec::new(),
		});
	}

	/// Detaches `node` from its parent. The subtree stays inspectable.
	pub fn remove(&mut self, node: NodeId) {
		self.detach(node);
	}

	fn detach(&mut self, node: NodeId) {
		let Some(parent) = self.data(node).and_then(|d| d.parent) else {
			return;
		};
		if let Some(data) = self.data_mut(parent) {
			data.children.retain(|&c| c != node);
		}
		if let Some(data) = self.data_mut(node) {
			data.parent = None;
		}
		self.records.push(Mutation::ChildList {
			target: parent,
			added: Vec::new(),
			removed: vec![node],
		});
	}

	/// Sets an attribute, recording the change.
	pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
		let Some(data) = self.data_mut(node) else {
			return;
		};
		match data.attrs.iter_mut().find(|(n, _)| n == name) {
			Some((_, existing)) => *existing = value.to_string(),
			None => data.attrs.push((name.to_string(), value.to_string())),
		}
		self.records.push(Mutation::Attributes {
			target: node,
			name: name.to_string(),
		});
	}

	/// Removes an attribute, recording the change if it was present.
	pub fn remove_attr(&mut self, node: NodeId, name: &str) {
		let Some(data) = self.data_mut(node) else {
			return;
		};
		let before = data.attrs.len();
		data.attrs.retain(|(n, _)| n != name);
		if data.attrs.len() != before {
			self.records.push(Mutation::Attributes {
				target: node,
				name: name.to_string(),
			});
		}
	}

	pub fn add_class(&mut self, node: NodeId, class: &str) {
		if self.has_class(node, class) || !self.exists(node) {
			return;
		}
		let list = match self.attr(node, "class") {
			Some(existing) if !existing.trim().is_empty() => format!("{existing} {class}"),
			_ => class.to_string(),
		};
		self.set_attr(node, "class", &list);
	}

	pub fn remove_class(&mut self, node: NodeId, class: &str) {
		if !self.has_class(node, class) {
			return;
		}
		let list = self
			.attr(node, "class")
			.unwrap_or_default()
			.split_ascii_whitespace()
			.filter(|c| *c != class)
			.collect::<Vec<_>>()
			.join(" ");
		self.set_attr(node, "class", &list);
	}

	/// Attaches or clears the live editor state of `node`. Not recorded.
	pub fn set_editor_state(&mut self, node: NodeId, state: Option<EditorState>) {
		if let Some(data) = self.data_mut(node) {
			data.editor = state;
		}
	}

	/// Drains the change records accumulated since the last call.
	pub fn take_records(&mut self) -> Vec<Mutation> {
		std::mem::take(&mut self.records)
	}

	/// Frees every node not reachable from the root and returns how many.
	pub fn purge_detached(&mut self) -> usize {
		let dead: Vec<usize> = self
			.nodes
			.iter()
			.map(|(index, data)| NodeId::new(index as u32, data.generation))
			.filter(|&id| !self.is_connected(id))
			.map(|id| id.index() as usize)
			.collect();
		for &index in &dead {
			self.nodes.remove(index);
		}
		if !dead.is_empty() {
			self.generation = self.generation.wrapping_add(1);
		}
		dead.len()
	}

	/// Number of nodes held, attached or not.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

impl UiTree for NodeTree {
	fn root(&self) -> NodeId {
		self.root
	}

	fn exists(&self, node: NodeId) -> bool {
		self.data(node).is_some()
	}

	fn parent(&self, node: NodeId) -> Option<NodeId> {
		self.data(node)?.parent
	}

	fn first_child(&self, node: NodeId) -> Option<NodeId> {
		self.data(node)?.children.first().copied()
	}

	fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
		let parent = self.data(node)?.parent?;
		let siblings = &self.data(parent)?.children;
		let pos = siblings.iter().position(|&c| c == node)?;
		siblings.get(pos + 1).copied()
	}

	fn tag(&self, node: NodeId) -> Option<&str> {
		self.data(node).map(|d| d.tag.as_str())
	}

	fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
		self.data(node)?
			.attrs
			.iter()
			.find(|(n, _)| n == name)
			.map(|(_, v)| v.as_str())
	}

	fn editor_state(&self, node: NodeId) -> Option<EditorState> {
		self.data(node)?.editor.clone()
	}
}

#[cfg(test)]
mod tests;
