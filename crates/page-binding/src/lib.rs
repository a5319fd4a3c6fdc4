//! Page Binding
//!
//! A thin seam between page behaviors and the document they drive.
//! Behaviors talk to a [`Page`] (query / set / observe) and a
//! [`KeyValueStore`] instead of reaching for browser globals, so the same
//! code runs against the live DOM (`web`, wasm32 only) or the in-memory
//! document in [`memory`].

mod selector;
pub mod memory;
#[cfg(target_arch = "wasm32")]
pub mod web;

use std::fmt;

/// Length of a day without clock changes, in milliseconds
pub const DAY_MS: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

/// Opaque handle to an element owned by a [`Page`].
///
/// Handles are stable for the life of the page: looking up the same
/// element twice yields the same id, so they can key per-element state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// DOM events the site behaviors listen for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    Click,
    Input,
    Change,
    Submit,
}

impl PageEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageEvent::Click => "click",
            PageEvent::Input => "input",
            PageEvent::Change => "change",
            PageEvent::Submit => "submit",
        }
    }
}

/// Whether an intersection report counts as "visible" for a watcher with
/// the given threshold
pub fn meets_threshold(is_intersecting: bool, ratio: f64, threshold: f64) -> bool {
    is_intersecting && ratio >= threshold
}

/// Group thousands with commas, e.g. `1234567` → `"1,234,567"`
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// The event handed to a listener
pub trait DomEvent {
    fn prevent_default(&self);
}

/// Event listener callback
pub type Handler = Box<dyn Fn(&dyn DomEvent)>;

/// Handle for a live observation. Dropping or disposing it stops the
/// observation.
#[must_use = "dropping a Subscription cancels it"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self { cancel: Some(Box::new(cancel)) }
    }

    /// A subscription with nothing to cancel (the observation never started)
    pub fn noop() -> Self {
        Self { cancel: None }
    }

    /// Stop observing now
    pub fn dispose(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Query, mutate and observe a document.
///
/// Lookups that find nothing return `None` / an empty list and mutations on
/// a stale handle are ignored; callers decide whether a missing element
/// disables a feature.
pub trait Page {
    // ========================
    // Query
    // ========================

    fn query(&self, selector: &str) -> Option<NodeId>;
    fn query_all(&self, selector: &str) -> Vec<NodeId>;
    /// First descendant of `scope` matching `selector`
    fn query_in(&self, scope: NodeId, selector: &str) -> Option<NodeId>;
    fn query_all_in(&self, scope: NodeId, selector: &str) -> Vec<NodeId>;
    /// The document element (`<html>`)
    fn root(&self) -> Option<NodeId>;
    fn body(&self) -> Option<NodeId>;

    // ========================
    // Read / Set
    // ========================

    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;
    fn set_attribute(&self, node: NodeId, name: &str, value: &str);
    fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.attribute(node, name).is_some()
    }
    fn has_class(&self, node: NodeId, class: &str) -> bool;
    fn add_class(&self, node: NodeId, class: &str);
    fn remove_class(&self, node: NodeId, class: &str);
    fn text(&self, node: NodeId) -> String;
    fn set_text(&self, node: NodeId, text: &str);
    fn set_inner_html(&self, node: NodeId, html: &str);
    /// Set an inline style property; an empty value removes it
    fn set_style(&self, node: NodeId, property: &str, value: &str);
    fn input_value(&self, node: NodeId) -> String;
    fn is_checked(&self, node: NodeId) -> bool;
    fn focus(&self, node: NodeId);
    fn reset_form(&self, node: NodeId);

    // ========================
    // Environment
    // ========================

    /// Whether the user agent reports `prefers-color-scheme: dark`
    fn prefers_dark_scheme(&self) -> bool;
    /// Wall clock, milliseconds since the Unix epoch
    fn now(&self) -> f64;
    /// `epoch_ms` moved forward by `days` calendar days
    fn add_days(&self, epoch_ms: f64, days: u32) -> f64 {
        epoch_ms + f64::from(days) * DAY_MS
    }
    /// `value` with the user agent's thousands separators
    fn format_integer(&self, value: i64) -> String {
        group_thousands(value)
    }

    // ========================
    // Observe
    // ========================

    fn listen(&self, node: NodeId, event: PageEvent, handler: Handler);
    /// Run `callback` on the next animation frame with the frame timestamp (ms)
    fn request_frame(&self, callback: Box<dyn FnOnce(f64)>);
    /// Run `callback` every `period_ms` for the life of the page
    fn set_interval(&self, period_ms: u32, callback: Box<dyn FnMut()>);
    /// Call `on_visible` whenever `node` enters the viewport with at least
    /// `threshold` of its area visible, until the subscription is dropped
    fn observe_visibility(
        &self,
        node: NodeId,
        threshold: f64,
        on_visible: Box<dyn FnMut()>,
    ) -> Subscription;
}

/// Errors from a [`KeyValueStore`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("storage is unavailable")]
    Unavailable,
    #[error("storage backend failed: {0}")]
    Backend(String),
}

/// Persistent string key/value flags
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_subscription_dispose_runs_cancel_once() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let sub = Subscription::new(move || counter.set(counter.get() + 1));
        sub.dispose();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_subscription_drop_cancels() {
        let cancelled = Rc::new(Cell::new(false));
        let flag = Rc::clone(&cancelled);
        {
            let _sub = Subscription::new(move || flag.set(true));
        }
        assert!(cancelled.get());
    }

    #[test]
    fn test_visibility_needs_intersection_and_threshold() {
        // Observers report an intersecting entry on first observe, even
        // when only a sliver is in view
        assert!(!meets_threshold(true, 0.1, 0.4));
        assert!(meets_threshold(true, 0.4, 0.4));
        assert!(meets_threshold(true, 1.0, 0.4));
        assert!(!meets_threshold(false, 0.0, 0.0));
        assert!(!meets_threshold(false, 0.5, 0.4));
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(2000), "2,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
        assert_eq!(group_thousands(-12_500), "-12,500");
    }

    #[test]
    fn test_event_names() {
        assert_eq!(PageEvent::Click.as_str(), "click");
        assert_eq!(PageEvent::Submit.as_str(), "submit");
    }
}
