//! Page Interactions
//!
//! Independent behaviors wired once the document is ready. None of them
//! talk to each other; each one that finds no markup to drive is skipped.

mod search;
mod counters;
mod testimonials;
mod blog_filter;
mod service_filter;
mod pricing;
mod newsletter;
mod countdown;

use std::rc::Rc;

use page_binding::{NodeId, Page};

use crate::context::SiteContext;
use crate::markup;

pub use search::SearchOverlay;
pub use counters::{counter_value, CounterAnimator};
pub use testimonials::normalize_testimonials;
pub use blog_filter::{blog_card_visible, BlogFilter};
pub use service_filter::{service_card_visible, ServiceFilter};
pub use pricing::{price_markup, PricingToggle};
pub use newsletter::wire_newsletters;
pub use countdown::Countdown;

/// Handles to the wired behaviors
pub struct Interactions {
    pub search: Rc<SearchOverlay>,
    pub counters: Option<Rc<CounterAnimator>>,
    pub testimonial_cards: usize,
    pub blog: Option<Rc<BlogFilter>>,
    pub services: Option<Rc<ServiceFilter>>,
    pub pricing: Option<Rc<PricingToggle>>,
    pub newsletter_forms: usize,
    pub countdown: Option<Rc<Countdown>>,
}

impl Interactions {
    pub fn init(ctx: &SiteContext) -> Self {
        let interactions = Self {
            search: SearchOverlay::init(ctx),
            counters: CounterAnimator::init(ctx),
            testimonial_cards: normalize_testimonials(ctx),
            blog: BlogFilter::init(ctx),
            services: ServiceFilter::init(ctx),
            pricing: PricingToggle::init(ctx),
            newsletter_forms: wire_newsletters(ctx),
            countdown: Countdown::init(ctx),
        };
        log::info!(
            "[PAGE] interactions ready: counters={} blog={} services={} pricing={} newsletters={} countdown={}",
            interactions.counters.is_some(),
            interactions.blog.is_some(),
            interactions.services.is_some(),
            interactions.pricing.is_some(),
            interactions.newsletter_forms,
            interactions.countdown.is_some(),
        );
        interactions
    }
}

/// Mark `tab` as the only active one in its group
fn activate_exclusive(page: &dyn Page, tabs: &[NodeId], tab: NodeId) {
    for other in tabs {
        page.remove_class(*other, markup::ACTIVE_CLASS);
    }
    page.add_class(tab, markup::ACTIVE_CLASS);
}

/// Show or hide a card through its inline `display`
fn set_shown(page: &dyn Page, card: NodeId, shown: bool) {
    page.set_style(card, "display", if shown { "" } else { "none" });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::context;
    use page_binding::memory::{MemoryPage, MemoryStore};

    #[test]
    fn test_bare_page_wires_nothing_optional() {
        let page = Rc::new(MemoryPage::new());
        let store = Rc::new(MemoryStore::new());
        let interactions = Interactions::init(&context(&page, &store));

        assert!(interactions.counters.is_none());
        assert!(interactions.blog.is_none());
        assert!(interactions.services.is_none());
        assert!(interactions.pricing.is_none());
        assert!(interactions.countdown.is_none());
        assert_eq!(interactions.testimonial_cards, 0);
        assert_eq!(interactions.newsletter_forms, 0);
        assert!(!interactions.search.is_open());
    }

    #[test]
    fn test_activate_exclusive() {
        let page = MemoryPage::new();
        let body = page.body().unwrap();
        let tabs: Vec<_> = (0..3)
            .map(|i| page.append(body, "a", &[("class", if i == 0 { "active" } else { "" })]))
            .collect();

        activate_exclusive(&page, &tabs, tabs[2]);
        assert!(!page.has_class(tabs[0], "active"));
        assert!(!page.has_class(tabs[1], "active"));
        assert!(page.has_class(tabs[2], "active"));
    }
}
