//! Site Context
//!
//! What every behavior is initialized with: the page, the flag store and
//! the settings.

use std::rc::Rc;

use page_binding::{KeyValueStore, Page};

use crate::settings::SiteSettings;

#[derive(Clone)]
pub struct SiteContext {
    pub page: Rc<dyn Page>,
    pub store: Rc<dyn KeyValueStore>,
    pub settings: Rc<SiteSettings>,
}

impl SiteContext {
    pub fn new(page: Rc<dyn Page>, store: Rc<dyn KeyValueStore>, settings: SiteSettings) -> Self {
        Self {
            page,
            store,
            settings: Rc::new(settings),
        }
    }
}
