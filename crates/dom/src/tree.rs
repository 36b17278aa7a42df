use crate::selector::Selector;

/// Generational handle to a node in a [`UiTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
	index: u32,
	generation: u32,
}

impl NodeId {
	/// Creates a handle from an arena slot and the generation stamped on it.
	pub const fn new(index: u32, generation: u32) -> Self {
		Self { index, generation }
	}

	pub const fn index(self) -> u32 {
		self.index
	}

	pub const fn generation(self) -> u32 {
		self.generation
	}
}

/// Live state of an editor attached to its root node.
///
/// Hosts attach this to editor nodes when the editor object is reachable.
/// Every field is optional because hosts populate it lazily.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorState {
	/// Identifier of the block currently shown, which is the focused block
	/// while zoomed in.
	pub block_id: Option<String>,
	/// Identifier of the document the editor belongs to.
	pub root_id: Option<String>,
	/// `Some(false)` while the editor shows a single focused block.
	pub show_all: Option<bool>,
}

/// Navigation surface over a host-owned UI tree.
///
/// Implementations answer `None`/`false` for handles that no longer resolve;
/// callers never get a panic for a stale [`NodeId`].
pub trait UiTree {
	/// The document root. Nodes not reachable from here are detached.
	fn root(&self) -> NodeId;

	/// Returns true while `node` still resolves, attached or not.
	fn exists(&self, node: NodeId) -> bool;

	fn parent(&self, node: NodeId) -> Option<NodeId>;

	fn first_child(&self, node: NodeId) -> Option<NodeId>;

	fn next_sibling(&self, node: NodeId) -> Option<NodeId>;

	/// Lowercase tag name.
	fn tag(&self, node: NodeId) -> Option<&str>;

	fn attr(&self, node: NodeId, name: &str) -> Option<&str>;

	fn has_class(&self, node: NodeId, class: &str) -> bool {
		self.attr(node, "class")
			.is_some_and(|list| list.split_ascii_whitespace().any(|c| c == class))
	}

	/// Live editor state, when the host exposes one for `node`.
	fn editor_state(&self, _node: NodeId) -> Option<EditorState> {
		None
	}
}

/// Walks parents, nearest first, excluding the start node.
pub struct Ancestors<'a, T: ?Sized> {
	tree: &'a T,
	next: Option<NodeId>,
}

impl<T: UiTree + ?Sized> Iterator for Ancestors<'_, T> {
	type Item = NodeId;

	fn next(&mut self) -> Option<NodeId> {
		let current = self.next?;
		self.next = self.tree.parent(current);
		Some(current)
	}
}

/// Pre-order walk of a subtree, excluding its root.
pub struct Descendants<'a, T: ?Sized> {
	tree: &'a T,
	scope: NodeId,
	next: Option<NodeId>,
}

impl<T: UiTree + ?Sized> Descendants<'_, T> {
	fn advance(&self, current: NodeId) -> Option<NodeId> {
		if let Some(child) = self.tree.first_child(current) {
			return Some(child);
		}
		let mut node = current;
		loop {
			if node == self.scope {
				return None;
			}
			if let Some(sibling) = self.tree.next_sibling(node) {
				return Some(sibling);
			}
			node = self.tree.parent(node)?;
		}
	}
}

impl<T: UiTree + ?Sized> Iterator for Descendants<'_, T> {
	type Item = NodeId;

	fn next(&mut self) -> Option<NodeId> {
		let current = self.next?;
		self.next = self.advance(current);
		Some(current)
	}
}

/// DOM-style queries available on every [`UiTree`].
pub trait TreeExt: UiTree {
	fn ancestors(&self, node: NodeId) -> Ancestors<'_, Self> {
		Ancestors {
			tree: self,
			next: self.parent(node),
		}
	}

	fn descendants(&self, scope: NodeId) -> Descendants<'_, Self> {
		Descendants {
			tree: self,
			scope,
			next: self.first_child(scope),
		}
	}

	/// Returns true if `node` is `ancestor` or lies beneath it.
	fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
		node == ancestor || self.ancestors(node).any(|n| n == ancestor)
	}

	/// Returns true if `node` is reachable from [`UiTree::root`].
	fn is_connected(&self, node: NodeId) -> bool {
		self.exists(node) && self.contains(self.root(), node)
	}

	fn matches(&self, node: NodeId, selector: &Selector) -> bool {
		selector.matches(self, node)
	}

	/// Nearest inclusive ancestor matching `selector`.
	fn closest(&self, node: NodeId, selector: &Selector) -> Option<NodeId> {
		std::iter::once(node)
			.chain(self.ancestors(node))
			.find(|&n| selector.matches(self, n))
	}

	/// First descendant of `scope` matching `selector`, in document order.
	fn query(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
		self.descendants(scope).find(|&n| selector.matches(self, n))
	}

	/// Every descendant of `scope` matching `selector`, in document order.
	fn query_all(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
		self.descendants(scope)
			.filter(|&n| selector.matches(self, n))
			.collect()
	}

	/// First non-empty value among `names`, mirroring `a || b || c` over attributes.
	fn attr_any<'a>(&'a self, node: NodeId, names: &[&str]) -> Option<&'a str> {
		names
			.iter()
			.filter_map(|name| self.attr(node, name))
			.find(|value| !value.is_empty())
	}
}

impl<T: UiTree + ?Sized> TreeExt for T {}
