//! Theme Controller
//!
//! Light / dark mode on `<body>`, persisted to the flag store.

use std::rc::Rc;

use page_binding::{DomEvent, PageEvent};

use crate::context::SiteContext;
use crate::error::SiteResult;
use crate::markup;
use crate::models::Theme;

pub struct ThemeController {
    ctx: SiteContext,
}

/// Stored flag if there is one, otherwise the system preference
pub fn resolve_initial(stored: Option<&str>, prefers_dark: bool) -> Theme {
    match stored.filter(|s| !s.is_empty()) {
        Some(stored) => Theme::from_stored(stored),
        None if prefers_dark => Theme::Dark,
        None => Theme::Light,
    }
}

impl ThemeController {
    /// Apply the initial theme and wire every toggle button
    pub fn init(ctx: &SiteContext) -> SiteResult<Rc<Self>> {
        let stored = ctx.store.get(&ctx.settings.theme_key)?;
        let theme = resolve_initial(stored.as_deref(), ctx.page.prefers_dark_scheme());

        let controller = Rc::new(Self { ctx: ctx.clone() });
        controller.apply(theme)?;

        let toggles = ctx.page.query_all(markup::THEME_TOGGLE);
        for toggle in &toggles {
            let controller = Rc::clone(&controller);
            ctx.page.listen(
                *toggle,
                PageEvent::Click,
                Box::new(move |_: &dyn DomEvent| {
                    if let Err(e) = controller.toggle() {
                        log::error!("[THEME] toggle failed: {}", e);
                    }
                }),
            );
        }
        log::debug!("[THEME] applied {:?}, {} toggle(s)", theme, toggles.len());
        Ok(controller)
    }

    /// Theme currently shown, read back from the body class
    pub fn current(&self) -> Theme {
        let page = &self.ctx.page;
        match page.body() {
            Some(body) if page.has_class(body, markup::THEME_DARK_CLASS) => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn apply(&self, theme: Theme) -> SiteResult<()> {
        let page = &self.ctx.page;
        if let Some(body) = page.body() {
            match theme {
                Theme::Dark => page.add_class(body, markup::THEME_DARK_CLASS),
                Theme::Light => page.remove_class(body, markup::THEME_DARK_CLASS),
            }
        }
        self.ctx.store.set(&self.ctx.settings.theme_key, theme.as_str())?;
        Ok(())
    }

    pub fn toggle(&self) -> SiteResult<Theme> {
        let next = self.current().toggled();
        self.apply(next)?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::context;
    use crate::error::SiteError;
    use page_binding::memory::{MemoryPage, MemoryStore};
    use page_binding::{Page, StorageError};

    fn page_with_toggle() -> (Rc<MemoryPage>, page_binding::NodeId) {
        let page = Rc::new(MemoryPage::new());
        let body = page.body().unwrap();
        let toggle = page.append(body, "button", &[("data-theme-toggle", "")]);
        (page, toggle)
    }

    #[test]
    fn test_resolve_initial() {
        assert_eq!(resolve_initial(Some("dark"), false), Theme::Dark);
        assert_eq!(resolve_initial(Some("light"), true), Theme::Light);
        assert_eq!(resolve_initial(None, true), Theme::Dark);
        assert_eq!(resolve_initial(Some(""), true), Theme::Dark);
        assert_eq!(resolve_initial(None, false), Theme::Light);
    }

    #[test]
    fn test_apply_sets_class_and_persists() {
        let (page, _) = page_with_toggle();
        let store = Rc::new(MemoryStore::new());
        let controller = ThemeController::init(&context(&page, &store)).unwrap();
        let body = page.body().unwrap();

        for theme in [Theme::Dark, Theme::Light] {
            controller.apply(theme).unwrap();
            assert_eq!(page.has_class(body, "theme-dark"), theme == Theme::Dark);
            assert_eq!(store.entry("sa-theme").as_deref(), Some(theme.as_str()));
        }
    }

    #[test]
    fn test_init_uses_system_preference_and_persists_it() {
        let (page, _) = page_with_toggle();
        page.set_prefers_dark(true);
        let store = Rc::new(MemoryStore::new());
        let controller = ThemeController::init(&context(&page, &store)).unwrap();

        assert_eq!(controller.current(), Theme::Dark);
        assert_eq!(store.entry("sa-theme").as_deref(), Some("dark"));
    }

    #[test]
    fn test_stored_flag_beats_system_preference() {
        let (page, _) = page_with_toggle();
        page.set_prefers_dark(true);
        let store = Rc::new(MemoryStore::with_entry("sa-theme", "light"));
        let controller = ThemeController::init(&context(&page, &store)).unwrap();
        assert_eq!(controller.current(), Theme::Light);
    }

    #[test]
    fn test_click_toggles_and_persists() {
        let (page, toggle) = page_with_toggle();
        let store = Rc::new(MemoryStore::new());
        let controller = ThemeController::init(&context(&page, &store)).unwrap();

        page.dispatch(toggle, PageEvent::Click);
        assert_eq!(controller.current(), Theme::Dark);
        assert_eq!(store.entry("sa-theme").as_deref(), Some("dark"));

        page.dispatch(toggle, PageEvent::Click);
        assert_eq!(controller.current(), Theme::Light);
        assert_eq!(store.entry("sa-theme").as_deref(), Some("light"));
    }

    #[test]
    fn test_unavailable_storage_stops_init() {
        let (page, toggle) = page_with_toggle();
        let store = Rc::new(MemoryStore::unavailable());
        let result = ThemeController::init(&context(&page, &store));

        assert!(matches!(result, Err(SiteError::Storage(StorageError::Unavailable))));
        assert_eq!(page.listener_count(toggle, PageEvent::Click), 0);
    }

    #[test]
    fn test_rejected_write_surfaces_from_toggle() {
        let (page, _) = page_with_toggle();
        let store = Rc::new(MemoryStore::new());
        let controller = ThemeController::init(&context(&page, &store)).unwrap();

        store.reject_writes(true);
        assert!(controller.toggle().is_err());
        // The class flip happens before the write fails
        assert_eq!(controller.current(), Theme::Dark);
    }
}
