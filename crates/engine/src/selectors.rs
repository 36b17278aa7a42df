//! Selectors describing the host's editor, search and history markup.

use std::sync::LazyLock;

use margin_dom::Selector;

macro_rules! selectors {
	($($(#[$meta:meta])* $name:ident = $css:expr;)*) => {
		$(
			$(#[$meta])*
			pub(crate) static $name: LazyLock<Selector> =
				LazyLock::new(|| Selector::parse($css).expect("valid selector"));
		)*
	};
}

selectors! {
	PROTYLE = ".protyle";
	CONTENT = ".protyle-content";
	WYSIWYG = ".protyle-wysiwyg";
	CONTENT_REGION = ".protyle-content, .protyle-wysiwyg";
	DOC_PANEL = "[data-type='docPanel']";
	EMBED = ".protyle-wysiwyg__embed";
	BACKLINK_AREA = ".sy__backlink, .backlinkList, .backlinkMList, [data-defid], [data-ismention], .backlink-panel";

	/// Every element that may carry an outline, before host derivation.
	CANDIDATES = ".protyle, .search__preview, .search__doc, .history__text, .history__text .protyle, [data-type='docPanel'].history__text";

	DOC_ROOT = "[data-type='NodeDocument']";
	TITLE_INPUT = ".protyle-title__input";
	TITLE = ".protyle-title";

	BREADCRUMB = ".protyle-breadcrumb";
	BREADCRUMB_BAR = ".protyle-breadcrumb, .protyle-breadcrumb__bar";
	BREADCRUMB_ITEM = ".protyle-breadcrumb__item";
	EXIT_FOCUS = ".protyle-breadcrumb__icon[data-type='exit-focus']";

	SEARCH_DIALOG_OPEN = ".b3-dialog--open[data-key='dialog-globalsearch']";
	SEARCH_CONTEXT = ".b3-dialog--open[data-key='dialog-globalsearch'], .search";
	SEARCH_LIST = ".search__list";
	SEARCH_FOCUSED_ITEM = ".search__list .b3-list-item--focus";
	SEARCH_ITEM = ".search__list .b3-list-item";
	SEARCH_PREVIEW_HOSTS = "#searchPreview, .search__preview, .search__doc";
	SEARCH_PREVIEW = ".search__preview, .search__doc";

	HISTORY_TEXT = ".history__text";
	HISTORY_PANEL = ".history__panel, .history";
	HISTORY_DIALOG = ".b3-dialog--open[data-key='dialog-history'], .b3-dialog--open[data-key='dialog-historydoc']";
	HISTORY_CONTEXT = ".history__panel, .history, .b3-dialog";
	HISTORY_LIST = ".history__side, .history__list, .history__repo";
	HISTORY_ACTIVE_ITEM = ".b3-list-item--focus, .b3-list-item--selected, .b3-list-item--current";
	HISTORY_PREVIEW_HOSTS = "#historyPreview, .history__text, .history__text.protyle, .history__text .protyle, [data-type='docPanel'].history__text, \
		.b3-dialog--open[data-key='dialog-history'] .protyle, .b3-dialog--open[data-key='dialog-historydoc'] .protyle, \
		.b3-dialog--open[data-key='dialog-history'] [data-type='docPanel'], .b3-dialog--open[data-key='dialog-historydoc'] [data-type='docPanel']";
	HISTORY_MARKERS = ".history__side, .history__text";
	HISTORY_PANEL_FAMILY = ".history__panel, .history__side, .history__list, .history__text";
	BREADCRUMB_PARTS = ".protyle-breadcrumb, .protyle-breadcrumb__item, .protyle-breadcrumb__icon";
	SEARCH_SURFACE_PARTS = ".protyle-content, .search__preview, .search__doc";
	PROTYLE_OR_DIALOG = ".protyle, .dialog-globalsearch, .b3-dialog";

	LIST_ITEM = ".b3-list-item";
	WITH_PATH = "[data-path]";
	HEADINGS = "[data-type='NodeHeading'], h1, h2, h3, h4, h5, h6";
}
