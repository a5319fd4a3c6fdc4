//! Service Filter
//!
//! Category tabs over the service cards, no text query. The first tab is
//! selected when the markup leaves every tab inactive.

use std::rc::Rc;

use page_binding::{DomEvent, NodeId, Page, PageEvent};

use super::{activate_exclusive, set_shown};
use crate::context::SiteContext;
use crate::markup;

pub struct ServiceFilter {
    page: Rc<dyn Page>,
    tabs: Vec<NodeId>,
    cards: Vec<NodeId>,
}

pub fn service_card_visible(card_category: Option<&str>, category: &str) -> bool {
    category == markup::ALL_CATEGORIES || card_category == Some(category)
}

impl ServiceFilter {
    /// `None` when the page has neither service tabs nor cards
    pub fn init(ctx: &SiteContext) -> Option<Rc<Self>> {
        let page = &ctx.page;
        let tabs = page.query_all(markup::SERVICE_TAB);
        let cards = page.query_all(markup::SERVICE_CARD);
        if tabs.is_empty() && cards.is_empty() {
            return None;
        }

        let filter = Rc::new(Self {
            page: Rc::clone(page),
            tabs,
            cards,
        });

        for tab in &filter.tabs {
            let this = Rc::clone(&filter);
            let tab = *tab;
            page.listen(
                tab,
                PageEvent::Click,
                Box::new(move |ev: &dyn DomEvent| {
                    ev.prevent_default();
                    this.select(tab);
                }),
            );
        }

        if !filter.cards.is_empty() {
            if page.query(markup::SERVICE_ACTIVE_TAB).is_none() {
                if let Some(first) = filter.tabs.first() {
                    page.add_class(*first, markup::ACTIVE_CLASS);
                }
            }
            filter.apply();
        }
        Some(filter)
    }

    pub fn select(&self, tab: NodeId) -> usize {
        activate_exclusive(self.page.as_ref(), &self.tabs, tab);
        self.apply()
    }

    pub fn active_category(&self) -> String {
        self.page
            .query(markup::SERVICE_ACTIVE_TAB)
            .and_then(|tab| self.page.attribute(tab, markup::SERVICE_TAB_ATTR))
            .filter(|category| !category.is_empty())
            .unwrap_or_else(|| markup::ALL_CATEGORIES.to_string())
    }

    /// Recompute card visibility; returns the number of visible cards
    pub fn apply(&self) -> usize {
        let page = self.page.as_ref();
        let category = self.active_category();
        let mut visible = 0;
        for card in &self.cards {
            let card_category = page.attribute(*card, markup::SERVICE_CARD_CATEGORY_ATTR);
            let shown = service_card_visible(card_category.as_deref(), &category);
            set_shown(page, *card, shown);
            visible += usize::from(shown);
        }
        log::debug!("[SERVICES] {visible}/{} visible in {category:?}", self.cards.len());
        visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::context;
    use page_binding::memory::{MemoryPage, MemoryStore};

    fn build(first_tab_class: &str) -> (Rc<MemoryPage>, Vec<NodeId>, Vec<NodeId>) {
        let page = Rc::new(MemoryPage::new());
        let body = page.body().unwrap();
        let tabs = vec![
            page.append(body, "button", &[("data-service-filter", "energy"), ("class", first_tab_class)]),
            page.append(body, "button", &[("data-service-filter", "all")]),
        ];
        let cards = vec![
            page.append(body, "div", &[("data-service-card", ""), ("data-service-category", "energy")]),
            page.append(body, "div", &[("data-service-card", ""), ("data-service-category", "water")]),
        ];
        (page, tabs, cards)
    }

    #[test]
    fn test_first_tab_activated_by_default() {
        let (page, tabs, cards) = build("");
        let store = Rc::new(MemoryStore::new());
        let filter = ServiceFilter::init(&context(&page, &store)).unwrap();

        assert!(page.has_class(tabs[0], "active"));
        assert_eq!(filter.active_category(), "energy");
        assert!(!page.is_hidden(cards[0]));
        assert!(page.is_hidden(cards[1]));
    }

    #[test]
    fn test_click_switches_category() {
        let (page, tabs, cards) = build("active");
        let store = Rc::new(MemoryStore::new());
        ServiceFilter::init(&context(&page, &store)).unwrap();

        assert!(page.dispatch(tabs[1], PageEvent::Click));
        assert!(!page.has_class(tabs[0], "active"));
        assert!(!page.is_hidden(cards[0]));
        assert!(!page.is_hidden(cards[1]));
    }

    #[test]
    fn test_visibility_rule() {
        assert!(service_card_visible(Some("water"), "all"));
        assert!(service_card_visible(Some("water"), "water"));
        assert!(!service_card_visible(Some("water"), "energy"));
        assert!(!service_card_visible(None, "energy"));
    }
}
