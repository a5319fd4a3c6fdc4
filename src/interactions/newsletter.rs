//! Newsletter Feedback
//!
//! Submissions never leave the page: the form shows a thank-you note and
//! clears itself.

use std::rc::Rc;

use page_binding::{DomEvent, PageEvent};

use crate::context::SiteContext;
use crate::markup;

/// Wire every newsletter form; returns how many were found
pub fn wire_newsletters(ctx: &SiteContext) -> usize {
    let page = &ctx.page;
    let forms = page.query_all(markup::NEWSLETTER_FORM);
    for form in &forms {
        let form = *form;
        let page_for_submit = Rc::clone(page);
        let settings = Rc::clone(&ctx.settings);
        page.listen(
            form,
            PageEvent::Submit,
            Box::new(move |ev: &dyn DomEvent| {
                ev.prevent_default();
                let page = page_for_submit.as_ref();
                if let Some(feedback) = page.query_in(form, markup::NEWSLETTER_FEEDBACK) {
                    page.set_text(feedback, &settings.newsletter_message);
                    page.add_class(feedback, markup::NEWSLETTER_SUCCESS_CLASS);
                }
                page.reset_form(form);
                log::debug!("[NEWSLETTER] submission on {form} acknowledged");
            }),
        );
    }
    forms.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::context;
    use page_binding::memory::{MemoryPage, MemoryStore};
    use page_binding::Page;

    #[test]
    fn test_submit_acknowledges_and_clears() {
        let page = Rc::new(MemoryPage::new());
        let body = page.body().unwrap();
        let form = page.append(body, "form", &[("data-newsletter", "")]);
        let email = page.append(form, "input", &[("type", "email")]);
        let name = page.append(form, "input", &[("type", "text")]);
        let feedback = page.append(form, "small", &[("class", "form-text")]);
        let store = Rc::new(MemoryStore::new());
        assert_eq!(wire_newsletters(&context(&page, &store)), 1);

        for (e, n) in [("a@b.org", "Ada"), ("", ""), ("not an email", "   ")] {
            page.set_value(email, e);
            page.set_value(name, n);
            assert!(page.dispatch(form, PageEvent::Submit));
            assert_eq!(page.text(feedback), "Thanks for subscribing!");
            assert!(page.has_class(feedback, "text-success"));
            assert_eq!(page.input_value(email), "");
            assert_eq!(page.input_value(name), "");
        }
    }

    #[test]
    fn test_submit_without_feedback_region_still_resets() {
        let page = Rc::new(MemoryPage::new());
        let body = page.body().unwrap();
        let form = page.append(body, "form", &[("data-newsletter", "")]);
        let email = page.append(form, "input", &[("type", "email")]);
        let store = Rc::new(MemoryStore::new());
        wire_newsletters(&context(&page, &store));

        page.set_value(email, "a@b.org");
        assert!(page.dispatch(form, PageEvent::Submit));
        assert_eq!(page.input_value(email), "");
    }
}
