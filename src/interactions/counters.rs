//! Counter Animation
//!
//! Each `[data-counter]` ramps from 0 to its target the first time it
//! scrolls into view. Progress is driven by frame timestamps, not frame
//! counts, so slow frames skip values instead of stretching the ramp.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use page_binding::{NodeId, Page, Subscription};

use crate::context::SiteContext;
use crate::format::parse_leading_int;
use crate::markup;

/// Per-element animation record
#[derive(Debug)]
struct CounterState {
    target: i64,
    /// Timestamp of the first frame, once the ramp has started
    started_at: Option<f64>,
    triggered: bool,
    /// Viewport observation; taken and disposed on first trigger
    subscription: Option<Subscription>,
}

pub struct CounterAnimator {
    page: Rc<dyn Page>,
    duration_ms: f64,
    states: RefCell<HashMap<NodeId, CounterState>>,
}

/// Value shown `progress_ms` into a ramp of `duration_ms` towards `target`
pub fn counter_value(progress_ms: f64, duration_ms: f64, target: i64) -> i64 {
    if duration_ms <= 0.0 {
        return target;
    }
    let value = ((progress_ms / duration_ms) * target as f64).floor() as i64;
    value.min(target)
}

impl CounterAnimator {
    /// `None` when the page has no counters
    pub fn init(ctx: &SiteContext) -> Option<Rc<Self>> {
        let page = &ctx.page;
        let nodes = page.query_all(markup::COUNTER);
        if nodes.is_empty() {
            return None;
        }

        let animator = Rc::new(Self {
            page: Rc::clone(page),
            duration_ms: ctx.settings.counter_duration_ms,
            states: RefCell::new(HashMap::new()),
        });

        for node in nodes {
            let raw = page.attribute(node, markup::COUNTER_ATTR).unwrap_or_default();
            let Some(target) = parse_leading_int(&raw) else {
                log::debug!("[COUNTERS] skipping {node}: target {raw:?} is not a number");
                continue;
            };
            animator.states.borrow_mut().insert(
                node,
                CounterState {
                    target,
                    started_at: None,
                    triggered: false,
                    subscription: None,
                },
            );

            let this = Rc::clone(&animator);
            let subscription = page.observe_visibility(
                node,
                ctx.settings.counter_threshold,
                Box::new(move || this.trigger(node)),
            );
            if let Some(state) = animator.states.borrow_mut().get_mut(&node) {
                state.subscription = Some(subscription);
            }
        }
        log::debug!("[COUNTERS] observing {} counter(s)", animator.states.borrow().len());
        Some(animator)
    }

    /// Start the ramp for `node` unless it already ran
    pub fn trigger(self: &Rc<Self>, node: NodeId) {
        let subscription = {
            let mut states = self.states.borrow_mut();
            let Some(state) = states.get_mut(&node) else {
                return;
            };
            if state.triggered {
                return;
            }
            state.triggered = true;
            state.subscription.take()
        };
        if let Some(subscription) = subscription {
            subscription.dispose();
        }
        self.schedule(node);
    }

    #[cfg(test)]
    pub fn is_triggered(&self, node: NodeId) -> bool {
        self.states.borrow().get(&node).is_some_and(|s| s.triggered)
    }

    #[cfg(test)]
    pub fn is_observing(&self, node: NodeId) -> bool {
        self.states
            .borrow()
            .get(&node)
            .is_some_and(|s| s.subscription.is_some())
    }

    fn schedule(self: &Rc<Self>, node: NodeId) {
        let this = Rc::clone(self);
        self.page.request_frame(Box::new(move |timestamp| this.step(node, timestamp)));
    }

    fn step(self: &Rc<Self>, node: NodeId, timestamp: f64) {
        let (target, started_at) = {
            let mut states = self.states.borrow_mut();
            let Some(state) = states.get_mut(&node) else {
                return;
            };
            (state.target, *state.started_at.get_or_insert(timestamp))
        };

        let progress = timestamp - started_at;
        let value = counter_value(progress, self.duration_ms, target);
        self.page.set_text(node, &self.page.format_integer(value));

        if progress < self.duration_ms {
            self.schedule(node);
        }
    }
}
