//! Search Overlay
//!
//! Open / closed state is the `active` class on `#siteSearch`.

use std::rc::Rc;

use page_binding::{DomEvent, NodeId, Page, PageEvent};

use crate::context::SiteContext;
use crate::markup;

pub struct SearchOverlay {
    page: Rc<dyn Page>,
    overlay: Option<NodeId>,
    input: Option<NodeId>,
}

impl SearchOverlay {
    pub fn init(ctx: &SiteContext) -> Rc<Self> {
        let page = &ctx.page;
        let overlay = page.query(markup::SEARCH_OVERLAY);
        let input = overlay.and_then(|o| page.query_in(o, markup::SEARCH_INPUT));
        let close = page.query(markup::SEARCH_CLOSE);

        label_if_missing(page.as_ref(), close, &ctx.settings.search_close_label);
        label_if_missing(page.as_ref(), input, &ctx.settings.search_input_label);

        let search = Rc::new(Self {
            page: Rc::clone(page),
            overlay,
            input,
        });

        for trigger in page.query_all(markup::SEARCH_TRIGGER) {
            let search = Rc::clone(&search);
            page.listen(trigger, PageEvent::Click, Box::new(move |_: &dyn DomEvent| search.open()));
        }
        if let Some(close) = close {
            let search = Rc::clone(&search);
            page.listen(close, PageEvent::Click, Box::new(move |_: &dyn DomEvent| search.close()));
        }
        search
    }

    pub fn open(&self) {
        let Some(overlay) = self.overlay else {
            return;
        };
        self.page.add_class(overlay, markup::ACTIVE_CLASS);
        if let Some(input) = self.input {
            self.page.focus(input);
        }
    }

    pub fn close(&self) {
        if let Some(overlay) = self.overlay {
            self.page.remove_class(overlay, markup::ACTIVE_CLASS);
        }
    }

    #[cfg(test)]
    pub fn is_open(&self) -> bool {
        self.overlay
            .is_some_and(|overlay| self.page.has_class(overlay, markup::ACTIVE_CLASS))
    }
}

fn label_if_missing(page: &dyn Page, node: Option<NodeId>, label: &str) {
    if let Some(node) = node {
        if !page.has_attribute(node, markup::ARIA_LABEL) {
            page.set_attribute(node, markup::ARIA_LABEL, label);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::context;
    use page_binding::memory::{MemoryPage, MemoryStore};

    struct Fixture {
        page: Rc<MemoryPage>,
        trigger: NodeId,
        overlay: NodeId,
        input: NodeId,
        close: NodeId,
    }

    fn fixture() -> Fixture {
        let page = Rc::new(MemoryPage::new());
        let body = page.body().unwrap();
        let trigger = page.append(body, "button", &[("data-search-trigger", "")]);
        let overlay = page.append(body, "div", &[("id", "siteSearch")]);
        let input = page.append(overlay, "input", &[("type", "search")]);
        let close = page.append(overlay, "button", &[("data-search-close", ""), ("aria-label", "Dismiss")]);
        Fixture { page, trigger, overlay, input, close }
    }

    #[test]
    fn test_trigger_opens_and_focuses() {
        let f = fixture();
        let store = Rc::new(MemoryStore::new());
        let search = SearchOverlay::init(&context(&f.page, &store));

        f.page.dispatch(f.trigger, PageEvent::Click);
        assert!(search.is_open());
        assert!(f.page.has_class(f.overlay, "active"));
        assert_eq!(f.page.focused(), Some(f.input));

        f.page.dispatch(f.close, PageEvent::Click);
        assert!(!search.is_open());
    }

    #[test]
    fn test_aria_labels_only_fill_gaps() {
        let f = fixture();
        let store = Rc::new(MemoryStore::new());
        SearchOverlay::init(&context(&f.page, &store));

        assert_eq!(f.page.attribute(f.close, "aria-label").as_deref(), Some("Dismiss"));
        assert_eq!(
            f.page.attribute(f.input, "aria-label").as_deref(),
            Some("Search Sustainable Awareness")
        );
    }

    #[test]
    fn test_missing_overlay_is_silent() {
        let page = Rc::new(MemoryPage::new());
        let body = page.body().unwrap();
        let trigger = page.append(body, "button", &[("data-search-trigger", "")]);
        let store = Rc::new(MemoryStore::new());
        let search = SearchOverlay::init(&context(&page, &store));

        page.dispatch(trigger, PageEvent::Click);
        assert!(!search.is_open());
        assert!(page.focused().is_none());
    }
}
