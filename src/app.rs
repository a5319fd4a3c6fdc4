//! Site Boot
//!
//! Three independent units: theme and direction run as soon as the script
//! loads, the interactions bundle once the document is ready. A failing
//! unit is logged and the others carry on.

use std::rc::Rc;

use crate::context::SiteContext;
use crate::direction::DirectionController;
use crate::interactions::Interactions;
use crate::theme::ThemeController;

/// Controllers that survived initialization
pub struct Preferences {
    pub theme: Option<Rc<ThemeController>>,
    pub direction: Option<Rc<DirectionController>>,
}

pub fn init_preferences(ctx: &SiteContext) -> Preferences {
    let theme = ThemeController::init(ctx)
        .map_err(|e| log::error!("[THEME] initialization stopped: {}", e))
        .ok();
    let direction = DirectionController::init(ctx)
        .map_err(|e| log::error!("[DIR] initialization stopped: {}", e))
        .ok();
    Preferences { theme, direction }
}

pub fn init_interactions(ctx: &SiteContext) -> Interactions {
    Interactions::init(ctx)
}
