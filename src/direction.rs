//! Direction Controller
//!
//! Left-to-right / right-to-left layout on the root element, persisted to
//! the flag store. Toggle buttons are relabelled to the resulting direction.

use std::rc::Rc;

use page_binding::{DomEvent, NodeId, PageEvent};

use crate::context::SiteContext;
use crate::error::SiteResult;
use crate::markup;
use crate::models::Direction;

pub struct DirectionController {
    ctx: SiteContext,
    buttons: Vec<NodeId>,
}

impl DirectionController {
    pub fn init(ctx: &SiteContext) -> SiteResult<Rc<Self>> {
        let buttons = ctx.page.query_all(markup::RTL_TOGGLE);
        let controller = Rc::new(Self { ctx: ctx.clone(), buttons });

        let stored = ctx.store.get(&ctx.settings.direction_key)?;
        let direction = stored.as_deref().map(Direction::from_stored).unwrap_or_default();
        controller.apply(direction)?;

        for button in &controller.buttons {
            let this = Rc::clone(&controller);
            ctx.page.listen(
                *button,
                PageEvent::Click,
                Box::new(move |_: &dyn DomEvent| {
                    if let Err(e) = this.toggle() {
                        log::error!("[DIR] toggle failed: {}", e);
                    }
                }),
            );
        }
        log::debug!("[DIR] applied {}, {} toggle(s)", direction.as_str(), controller.buttons.len());
        Ok(controller)
    }

    /// Direction from the root `dir` attribute
    pub fn current(&self) -> Direction {
        self.ctx
            .page
            .root()
            .and_then(|root| self.ctx.page.attribute(root, markup::DIR_ATTR))
            .map(|dir| Direction::from_stored(&dir))
            .unwrap_or_default()
    }

    pub fn apply(&self, direction: Direction) -> SiteResult<()> {
        let page = &self.ctx.page;
        if let Some(root) = page.root() {
            page.set_attribute(root, markup::DIR_ATTR, direction.as_str());
            match direction {
                Direction::Rtl => page.add_class(root, markup::RTL_CLASS),
                Direction::Ltr => page.remove_class(root, markup::RTL_CLASS),
            }
        }
        self.ctx.store.set(&self.ctx.settings.direction_key, direction.as_str())?;
        for button in &self.buttons {
            page.set_text(*button, direction.label());
        }
        Ok(())
    }

    pub fn toggle(&self) -> SiteResult<Direction> {
        let next = self.current().toggled();
        self.apply(next)?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::context;
    use page_binding::memory::{MemoryPage, MemoryStore};
    use page_binding::Page;

    fn page_with_buttons(count: usize) -> (Rc<MemoryPage>, Vec<NodeId>) {
        let page = Rc::new(MemoryPage::new());
        let body = page.body().unwrap();
        let buttons = (0..count)
            .map(|_| page.append_text(body, "button", &[("data-rtl-toggle", "")], "?"))
            .collect();
        (page, buttons)
    }

    #[test]
    fn test_defaults_to_ltr() {
        let (page, buttons) = page_with_buttons(2);
        let store = Rc::new(MemoryStore::new());
        DirectionController::init(&context(&page, &store)).unwrap();

        let root = page.root().unwrap();
        assert_eq!(page.attribute(root, "dir").as_deref(), Some("ltr"));
        assert!(!page.has_class(root, "rtl"));
        assert_eq!(store.entry("sa-dir").as_deref(), Some("ltr"));
        for button in buttons {
            assert_eq!(page.text(button), "EN");
        }
    }

    #[test]
    fn test_apply_each_direction() {
        let (page, buttons) = page_with_buttons(2);
        let store = Rc::new(MemoryStore::new());
        let controller = DirectionController::init(&context(&page, &store)).unwrap();
        let root = page.root().unwrap();

        for direction in [Direction::Rtl, Direction::Ltr] {
            controller.apply(direction).unwrap();
            assert_eq!(page.attribute(root, "dir").as_deref(), Some(direction.as_str()));
            assert_eq!(page.has_class(root, "rtl"), direction == Direction::Rtl);
            let expected = if direction == Direction::Rtl { "AR" } else { "EN" };
            for button in &buttons {
                assert_eq!(page.text(*button), expected);
            }
        }
    }

    #[test]
    fn test_apply_is_idempotent() {
        let (page, buttons) = page_with_buttons(1);
        let store = Rc::new(MemoryStore::new());
        let controller = DirectionController::init(&context(&page, &store)).unwrap();
        let root = page.root().unwrap();

        controller.apply(Direction::Rtl).unwrap();
        controller.apply(Direction::Rtl).unwrap();
        assert_eq!(page.attribute(root, "class").as_deref(), Some("rtl"));
        assert_eq!(page.text(buttons[0]), "AR");
    }

    #[test]
    fn test_stored_rtl_and_click_flips() {
        let (page, buttons) = page_with_buttons(1);
        let store = Rc::new(MemoryStore::with_entry("sa-dir", "rtl"));
        let controller = DirectionController::init(&context(&page, &store)).unwrap();
        assert_eq!(controller.current(), Direction::Rtl);

        page.dispatch(buttons[0], PageEvent::Click);
        assert_eq!(controller.current(), Direction::Ltr);
        assert_eq!(store.entry("sa-dir").as_deref(), Some("ltr"));
        assert_eq!(page.text(buttons[0]), "EN");
    }

    #[test]
    fn test_toggle_reads_live_attribute() {
        let (page, _) = page_with_buttons(1);
        let store = Rc::new(MemoryStore::new());
        let controller = DirectionController::init(&context(&page, &store)).unwrap();

        // Something else flipped the page to rtl
        let root = page.root().unwrap();
        page.set_attribute(root, "dir", "rtl");
        assert_eq!(controller.toggle().unwrap(), Direction::Ltr);
    }

    #[test]
    fn test_unknown_stored_direction_falls_back_to_ltr() {
        let (page, buttons) = page_with_buttons(1);
        let store = Rc::new(MemoryStore::with_entry("sa-dir", "sideways"));
        let controller = DirectionController::init(&context(&page, &store)).unwrap();

        let root = page.root().unwrap();
        assert_eq!(controller.current(), Direction::Ltr);
        assert_eq!(page.attribute(root, "dir").as_deref(), Some("ltr"));
        assert!(!page.has_class(root, "rtl"));
        assert_eq!(store.entry("sa-dir").as_deref(), Some("ltr"));
        assert_eq!(page.text(buttons[0]), "EN");
    }
}
