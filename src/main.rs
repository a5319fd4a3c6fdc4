//! Sustainable Awareness Site Scripts Entry Point

// Everything below is only reachable from the wasm32 entry point and tests
#![cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]

mod models;
mod markup;
mod error;
mod settings;
mod context;
mod format;
mod theme;
mod direction;
mod interactions;
mod app;

#[cfg(target_arch = "wasm32")]
fn main() {
    use std::rc::Rc;

    use page_binding::web::{LocalStore, WebPage};
    use page_binding::{KeyValueStore, Page};

    use crate::context::SiteContext;
    use crate::settings::SiteSettings;

    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);

    let Some(page) = WebPage::new() else {
        log::error!("[APP] no browser document, nothing to wire");
        return;
    };
    let page = Rc::new(page);
    let settings = SiteSettings::load(page.as_ref());
    let store: Rc<dyn KeyValueStore> = Rc::new(LocalStore::new());
    let dyn_page: Rc<dyn Page> = page.clone();
    let ctx = SiteContext::new(dyn_page, store, settings);

    // Listeners, frames and intervals own their behaviors from here on
    let _preferences = app::init_preferences(&ctx);
    page.when_ready(move || {
        let _interactions = app::init_interactions(&ctx);
    });
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!("sustainable-awareness-ui targets wasm32; build it with trunk or wasm-pack");
}
