use pretty_assertions::assert_eq;

use super::*;

#[test]
fn test_append_records_child_list() {
	let mut tree = NodeTree::new();
	let root = tree.root();
	let list = tree.append(root, "div.search__list");

	assert_eq!(
		tree.take_records(),
		vec![Mutation::ChildList {
			target: root,
			added: vec![list],
			removed: vec![],
		}]
	);
	assert!(tree.take_records().is_empty());
}

#[test]
fn test_spec_sets_tag_classes_id_and_attributes() {
	let mut tree = NodeTree::new();
	let root = tree.root();
	let node = tree.append(root, "span#crumb.protyle-breadcrumb__item.b3-tooltips[data-node-id='abc'][hidden]");

	assert_eq!(tree.tag(node), Some("span"));
	assert_eq!(tree.attr(node, "id"), Some("crumb"));
	assert!(tree.has_class(node, "protyle-breadcrumb__item"));
	assert!(tree.has_class(node, "b3-tooltips"));
	assert_eq!(tree.attr(node, "data-node-id"), Some("abc"));
	assert_eq!(tree.attr(node, "hidden"), Some(""));
}

#[test]
fn test_removed_subtree_stays_inspectable_until_purged() {
	let mut tree = NodeTree::new();
	let root = tree.root();
	let panel = tree.append(root, "div.history__panel");
	let text = tree.append(panel, "div.history__text");
	tree.take_records();

	tree.remove(panel);
	assert_eq!(
		tree.take_records(),
		vec![Mutation::ChildList {
			target: root,
			added: vec![],
			removed: vec![panel],
		}]
	);
	assert!(!tree.is_connected(text));
	assert!(tree.has_class(text, "history__text"));
	assert_eq!(tree.parent(text), Some(panel));

	assert_eq!(tree.purge_detached(), 2);
	assert!(!tree.exists(text));

	let fresh = tree.append(root, "div");
	assert_ne!(fresh, text);
	assert_ne!(fresh, panel);
	assert!(!tree.exists(panel));
}

#[test]
fn test_class_edits_record_attribute_changes() {
	let mut tree = NodeTree::new();
	let root = tree.root();
	let item = tree.append(root, "div.b3-list-item");
	tree.take_records();

	tree.add_class(item, "b3-list-item--focus");
	tree.add_class(item, "b3-list-item--focus");
	tree.remove_class(item, "b3-list-item");

	assert_eq!(tree.attr(item, "class"), Some("b3-list-item--focus"));
	assert_eq!(
		tree.take_records(),
		vec![
			Mutation::Attributes {
				target: item,
				name: "class".into()
			},
			Mutation::Attributes {
				target: item,
				name: "class".into()
			},
		]
	);
}

#[test]
fn test_descendants_are_document_ordered() {
	let mut tree = NodeTree::new();
	let root = tree.root();
	let a = tree.append(root, "div.a");
	let a1 = tree.append(a, "div.a1");
	let a2 = tree.append(a, "div.a2");
	let a1x = tree.append(a1, "div.a1x");
	let b = tree.append(root, "div.b");

	assert_eq!(tree.descendants(root).collect::<Vec<_>>(), vec![a, a1, a1x, a2, b]);
	assert_eq!(tree.descendants(a1).collect::<Vec<_>>(), vec![a1x]);
	assert_eq!(tree.descendants(a2).count(), 0);
}

#[test]
fn test_append_child_moves_and_rejects_cycles() {
	let mut tree = NodeTree::new();
	let root = tree.root();
	let a = tree.append(root, "div.a");
	let b = tree.append(a, "div.b");

	tree.append_child(b, a);
	assert_eq!(tree.parent(a), Some(root));

	tree.append_child(root, b);
	assert_eq!(tree.parent(b), Some(root));
	assert_eq!(tree.first_child(a), None);
}

#[test]
fn test_closest_and_attr_any() {
	let mut tree = NodeTree::new();
	let root = tree.root();
	let list = tree.append(root, "div.search__list");
	let item = tree.append(list, "div.b3-list-item[data-root-id=''][data-node-id=n1]");

	let sel = Selector::parse(".search__list").unwrap();
	assert_eq!(tree.closest(item, &sel), Some(list));
	assert_eq!(tree.closest(list, &sel), Some(list));
	assert_eq!(tree.attr_any(item, &["data-root-id", "data-node-id"]), Some("n1"));
}
