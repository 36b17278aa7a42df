use super::*;
use crate::{NodeTree, TreeExt};

fn tree() -> (NodeTree, NodeId, NodeId, NodeId) {
	let mut tree = NodeTree::new();
	let root = tree.root();
	let dialog = tree.append(root, "div.b3-dialog.b3-dialog--open[data-key=dialog-history]");
	let text = tree.append(dialog, "div.history__text[data-type=docPanel]");
	let protyle = tree.append(text, "div.protyle#historyPreview[data-loading=true]");
	(tree, dialog, text, protyle)
}

#[test]
fn test_parse_rejects_malformed_input() {
	assert_eq!(Selector::parse(""), Err(SelectorError::Empty));
	assert_eq!(Selector::parse(".a,"), Err(SelectorError::Empty));
	assert!(matches!(
		Selector::parse(".a > .b"),
		Err(SelectorError::UnexpectedChar { ch: '>', .. })
	));
	assert!(matches!(
		Selector::parse("[data-type='x'"),
		Err(SelectorError::UnterminatedAttribute { .. })
	));
	assert!(matches!(
		Selector::parse("[data-type='x]"),
		Err(SelectorError::UnterminatedString { .. })
	));
	assert!(matches!(Selector::parse("."), Err(SelectorError::ExpectedIdent { pos: 1 })));
}

#[test]
fn test_compound_requires_every_part() {
	let (tree, _, text, protyle) = tree();
	let sel = Selector::parse("[data-type='docPanel'].history__text").unwrap();
	assert!(sel.matches(&tree, text));
	assert!(!sel.matches(&tree, protyle));

	let by_id = Selector::parse("div#historyPreview").unwrap();
	assert!(by_id.matches(&tree, protyle));

	let presence = Selector::parse("[data-loading]").unwrap();
	assert!(presence.matches(&tree, protyle));
	assert!(!presence.matches(&tree, text));
}

#[test]
fn test_descendant_combinator_walks_past_query_scope() {
	let (tree, _, text, protyle) = tree();
	let sel = Selector::parse(".b3-dialog--open[data-key=\"dialog-history\"] .protyle").unwrap();

	assert!(sel.matches(&tree, protyle));
	assert_eq!(tree.query_all(text, &sel), vec![protyle]);
}

#[test]
fn test_descendant_combinator_needs_a_strict_ancestor() {
	let (tree, _, text, _) = tree();
	let sel = Selector::parse(".history__text .history__text").unwrap();
	assert!(!sel.matches(&tree, text));
}

#[test]
fn test_selector_list_matches_any_alternative() {
	let (tree, dialog, text, protyle) = tree();
	let sel: Selector = ".history__panel, .history__text , .protyle".parse().unwrap();

	assert!(!sel.matches(&tree, dialog));
	assert!(sel.matches(&tree, text));
	assert!(sel.matches(&tree, protyle));
}

#[test]
fn test_tag_matching_is_case_insensitive() {
	let mut tree = NodeTree::new();
	let root = tree.root();
	let heading = tree.append(root, "h2");

	let sel = Selector::parse("H1, H2").unwrap();
	assert!(sel.matches(&tree, heading));
}

#[test]
fn test_stale_handle_never_matches() {
	let (mut tree, dialog, _, protyle) = tree();
	tree.remove(dialog);
	tree.purge_detached();

	let sel = Selector::parse("*").unwrap();
	assert!(!sel.matches(&tree, protyle));
}
