//! Blog Filter
//!
//! Cards are filtered by a free-text title query and the active category
//! tab. Recomputed on every keystroke and tab click.

use std::rc::Rc;

use page_binding::{DomEvent, NodeId, Page, PageEvent};

use super::{activate_exclusive, set_shown};
use crate::context::SiteContext;
use crate::markup;

pub struct BlogFilter {
    page: Rc<dyn Page>,
    search: Option<NodeId>,
    tabs: Vec<NodeId>,
    cards: Vec<NodeId>,
}

/// `query` is expected lowercased already
pub fn blog_card_visible(title: &str, card_category: Option<&str>, query: &str, category: &str) -> bool {
    let matches_category = category == markup::ALL_CATEGORIES || card_category == Some(category);
    matches_category && title.to_lowercase().contains(query)
}

impl BlogFilter {
    /// `None` when the page has no blog search, tabs or cards
    pub fn init(ctx: &SiteContext) -> Option<Rc<Self>> {
        let page = &ctx.page;
        let search = page.query(markup::BLOG_SEARCH);
        let tabs = page.query_all(markup::BLOG_TAB);
        let cards = page.query_all(markup::BLOG_CARD);
        if search.is_none() && tabs.is_empty() && cards.is_empty() {
            return None;
        }

        let filter = Rc::new(Self {
            page: Rc::clone(page),
            search,
            tabs,
            cards,
        });

        if let Some(search) = filter.search {
            let this = Rc::clone(&filter);
            page.listen(search, PageEvent::Input, Box::new(move |_: &dyn DomEvent| {
                this.apply();
            }));
        }
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
            filter.apply();
        }
        Some(filter)
    }

    /// Make `tab` the only active tab and refilter
    pub fn select(&self, tab: NodeId) -> usize {
        activate_exclusive(self.page.as_ref(), &self.tabs, tab);
        self.apply()
    }

    /// Category of the active tab; "all" when none is active
    pub fn active_category(&self) -> String {
        self.page
            .query(markup::BLOG_ACTIVE_TAB)
            .and_then(|tab| self.page.attribute(tab, markup::BLOG_TAB_ATTR))
            .filter(|category| !category.is_empty())
            .unwrap_or_else(|| markup::ALL_CATEGORIES.to_string())
    }

    /// Recompute card visibility; returns the number of visible cards
    pub fn apply(&self) -> usize {
        let page = self.page.as_ref();
        let query = self
            .search
            .map(|search| page.input_value(search).to_lowercase())
            .unwrap_or_default();
        let category = self.active_category();

        let mut visible = 0;
        for card in &self.cards {
            let title = page
                .query_in(*card, markup::BLOG_CARD_TITLE)
                .map(|h| page.text(h))
                .unwrap_or_default();
            let card_category = page.attribute(*card, markup::BLOG_CARD_CATEGORY_ATTR);
            let shown = blog_card_visible(&title, card_category.as_deref(), &query, &category);
            set_shown(page, *card, shown);
            visible += usize::from(shown);
        }
        log::debug!("[BLOG] {visible}/{} visible for {query:?} in {category:?}", self.cards.len());
        visible
    }
}
