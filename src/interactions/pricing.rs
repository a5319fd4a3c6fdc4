//! Pricing Toggle
//!
//! One checkbox switches every plan price between its monthly and yearly
//! string.

use std::rc::Rc;

use page_binding::{DomEvent, NodeId, Page, PageEvent};

use crate::context::SiteContext;
use crate::markup;
use crate::models::BillingPeriod;

pub struct PricingToggle {
    page: Rc<dyn Page>,
    toggle: NodeId,
    prices: Vec<NodeId>,
    suffix: String,
}

/// Price followed by the muted per-month annotation
pub fn price_markup(value: &str, suffix: &str) -> String {
    format!("{value}<span class=\"{}\">{suffix}</span>", markup::PRICE_SUFFIX_CLASS)
}

impl PricingToggle {
    /// `None` when the page has no pricing toggle
    pub fn init(ctx: &SiteContext) -> Option<Rc<Self>> {
        let page = &ctx.page;
        let toggle = page.query(markup::PRICING_TOGGLE)?;
        let pricing = Rc::new(Self {
            page: Rc::clone(page),
            toggle,
            prices: page.query_all(markup::PLAN_PRICE),
            suffix: ctx.settings.price_suffix.clone(),
        });

        let this = Rc::clone(&pricing);
        page.listen(toggle, PageEvent::Change, Box::new(move |_: &dyn DomEvent| {
            this.update();
        }));
        pricing.update();
        Some(pricing)
    }

    pub fn period(&self) -> BillingPeriod {
        if self.page.is_checked(self.toggle) {
            BillingPeriod::Yearly
        } else {
            BillingPeriod::Monthly
        }
    }

    /// Re-render every price for the selected period
    pub fn update(&self) -> BillingPeriod {
        let period = self.period();
        for price in &self.prices {
            let value = self.page.attribute(*price, period.price_attribute()).unwrap_or_default();
            // Prices without a value for this period keep what they show
            if !value.is_empty() {
                self.page.set_inner_html(*price, &price_markup(&value, &self.suffix));
            }
        }
        log::debug!("[PRICING] showing {:?} prices", period);
        period
    }
}
