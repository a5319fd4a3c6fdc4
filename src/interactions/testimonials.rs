//! Testimonials
//!
//! The slider is gone; every card is simply shown.

use crate::context::SiteContext;
use crate::markup;

/// Force every testimonial card to full opacity. Returns how many cards
/// were touched.
pub fn normalize_testimonials(ctx: &SiteContext) -> usize {
    let page = &ctx.page;
    let Some(container) = page.query(markup::TESTIMONIAL_CONTAINER) else {
        return 0;
    };
    let cards = page.query_all_in(container, markup::TESTIMONIAL_CARD);
    for card in &cards {
        page.set_style(*card, "opacity", "1");
    }
    cards.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::context;
    use page_binding::memory::{MemoryPage, MemoryStore};
    use page_binding::Page;
    use std::rc::Rc;

    #[test]
    fn test_cards_inside_container_become_opaque() {
        let page = Rc::new(MemoryPage::new());
        let body = page.body().unwrap();
        let slider = page.append(body, "section", &[("data-testimonial-slider", "")]);
        let inside = page.append(slider, "div", &[("class", "testimonial-card")]);
        let outside = page.append(body, "div", &[("class", "testimonial-card")]);
        let store = Rc::new(MemoryStore::new());

        assert_eq!(normalize_testimonials(&context(&page, &store)), 1);
        assert_eq!(page.style(inside, "opacity").as_deref(), Some("1"));
        assert!(page.style(outside, "opacity").is_none());
    }
}
