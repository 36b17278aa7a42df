//! Read-only access to a UI tree owned by somebody else.
//!
//! The outline engine lives inside a host application whose UI tree it can
//! observe but never own. This crate is the seam:
//!
//! - [`UiTree`] is the minimal navigation surface a host exposes: parent,
//!   first child, next sibling, tag, attributes, classes, and the optional
//!   live editor state attached to an editor node.
//! - [`TreeExt`] layers DOM-style queries (`closest`, `query`, `query_all`,
//!   `is_connected`) on top of any [`UiTree`].
//! - [`Selector`] parses the CSS subset the engine needs: tags, `.class`,
//!   `#id`, `[attr]`, `[attr='value']`, compounds, the descendant combinator
//!   and comma-separated lists.
//! - [`NodeTree`] is an arena-backed tree that records [`Mutation`]s in the
//!   shape a host mutation observer delivers them. Embedders that mirror a
//!   foreign tree and tests both use it.
//!
//! Node handles are generational: a [`NodeId`] whose node has been purged
//! never aliases a newer node.

mod node_tree;
mod selector;
mod tree;

pub use node_tree::{Mutation, NodeTree};
pub use selector::{Selector, SelectorError};
pub use tree::{Ancestors, Descendants, EditorState, NodeId, TreeExt, UiTree};
