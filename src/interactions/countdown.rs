//! Countdown Timer
//!
//! Renders days / hours / minutes / seconds left into `[data-countdown]`
//! cells and refreshes them every second for the life of the page.
//!
//! Unless the settings pin `countdownDeadline`, the deadline is taken as
//! "load time + countdownDays" local calendar days, so it moves with every
//! reload and never arrives.

use std::rc::Rc;

use page_binding::{NodeId, Page};

use crate::context::SiteContext;
use crate::markup;
use crate::models::{CountdownUnit, Remaining};

pub struct Countdown {
    page: Rc<dyn Page>,
    deadline_ms: f64,
    cells: Vec<(NodeId, CountdownUnit)>,
}

impl Countdown {
    /// `None` when the page has no countdown cells
    pub fn init(ctx: &SiteContext) -> Option<Rc<Self>> {
        let page = &ctx.page;
        let nodes = page.query_all(markup::COUNTDOWN);
        if nodes.is_empty() {
            return None;
        }

        let deadline_ms = match ctx.settings.countdown_deadline {
            Some(deadline) => deadline,
            None => {
                log::debug!(
                    "[COUNTDOWN] no fixed deadline configured, counting {} days from load",
                    ctx.settings.countdown_days
                );
                page.add_days(page.now(), ctx.settings.countdown_days)
            }
        };
        let cells = nodes
            .into_iter()
            .map(|node| {
                let unit = page.attribute(node, markup::COUNTDOWN_ATTR).unwrap_or_default();
                (node, CountdownUnit::from_attr(&unit))
            })
            .collect();

        let countdown = Rc::new(Self {
            page: Rc::clone(page),
            deadline_ms,
            cells,
        });
        countdown.render();

        let this = Rc::clone(&countdown);
        page.set_interval(ctx.settings.countdown_interval_ms, Box::new(move || {
            this.render();
        }));
        Some(countdown)
    }

    #[cfg(test)]
    pub fn deadline_ms(&self) -> f64 {
        self.deadline_ms
    }

    pub fn remaining(&self) -> Remaining {
        Remaining::from_millis((self.deadline_ms - self.page.now()) as i64)
    }

    pub fn render(&self) -> Remaining {
        let remaining = self.remaining();
        for (node, unit) in &self.cells {
            self.page.set_text(*node, &format!("{:02}", remaining.get(*unit)));
        }
        remaining
    }
}
