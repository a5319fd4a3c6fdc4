//! In-Memory Page
//!
//! A small element tree implementing [`Page`] without a browser. Tests build
//! markup with [`MemoryPage::append`], then drive it the way a user and the
//! browser would: [`dispatch`](MemoryPage::dispatch) events,
//! [`reveal`](MemoryPage::reveal) elements in the viewport, and
//! [`advance`](MemoryPage::advance) the virtual clock to run frames and
//! intervals.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use crate::selector::{ElementView, Selector};
use crate::{
    group_thousands, meets_threshold, DomEvent, Handler, KeyValueStore, NodeId, Page, PageEvent, StorageError,
    Subscription,
};

/// Clock start for a fresh page (2023-11-14T22:13:20Z)
const DEFAULT_EPOCH_MS: f64 = 1_700_000_000_000.0;

#[derive(Debug, Default)]
struct Element {
    tag: String,
    attrs: BTreeMap<String, String>,
    classes: Vec<String>,
    text: String,
    markup: Option<String>,
    style: BTreeMap<String, String>,
    value: String,
    checked: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Default)]
struct Dom {
    elements: Vec<Element>,
    focused: Option<NodeId>,
}

impl Dom {
    fn get(&self, node: NodeId) -> Option<&Element> {
        self.elements.get(node.index())
    }

    fn get_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        self.elements.get_mut(node.index())
    }

    /// Descendants of `node` in document order (excluding `node`)
    fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self
            .get(node)
            .map(|el| el.children.iter().rev().copied().collect())
            .unwrap_or_default();
        while let Some(next) = stack.pop() {
            out.push(next);
            if let Some(el) = self.get(next) {
                stack.extend(el.children.iter().rev().copied());
            }
        }
        out
    }

    fn text_of(&self, node: NodeId) -> String {
        let Some(el) = self.get(node) else {
            return String::new();
        };
        let mut text = el.text.clone();
        for child in &el.children {
            text.push_str(&self.text_of(*child));
        }
        text
    }

    fn select(&self, scope: NodeId, selector: &str, include_scope: bool) -> Vec<NodeId> {
        let Some(selector) = Selector::parse(selector) else {
            log::debug!("[PAGE] unsupported selector {selector:?}");
            return Vec::new();
        };
        let mut candidates = Vec::new();
        if include_scope {
            candidates.push(scope);
        }
        candidates.extend(self.descendants(scope));
        candidates
            .into_iter()
            .filter(|node| selector.matches(self, *node))
            .collect()
    }
}

impl ElementView for Dom {
    fn tag(&self, node: NodeId) -> &str {
        self.get(node).map(|el| el.tag.as_str()).unwrap_or_default()
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.get(node)?.attrs.get(name).map(String::as_str)
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.get(node).is_some_and(|el| el.classes.iter().any(|c| c == class))
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.get(node)?.parent
    }
}

/// Drop everything between `<` and `>`
fn strip_tags(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    text
}

fn is_form_field(tag: &str) -> bool {
    matches!(tag, "input" | "textarea" | "select")
}

struct Listener {
    node: NodeId,
    event: PageEvent,
    handler: Rc<dyn Fn(&dyn DomEvent)>,
}

struct Watcher {
    node: NodeId,
    threshold: f64,
    active: Rc<Cell<bool>>,
    callback: Rc<RefCell<Box<dyn FnMut()>>>,
}

struct Ticker {
    period: f64,
    next_due: f64,
    callback: Rc<RefCell<Box<dyn FnMut()>>>,
}

/// Event passed to listeners by [`MemoryPage::dispatch`]
#[derive(Debug, Default)]
pub struct RecordedEvent {
    prevented: Cell<bool>,
}

impl RecordedEvent {
    pub fn default_prevented(&self) -> bool {
        self.prevented.get()
    }
}

impl DomEvent for RecordedEvent {
    fn prevent_default(&self) {
        self.prevented.set(true);
    }
}

/// In-memory document: `<html><body></body></html>` to start with
pub struct MemoryPage {
    dom: RefCell<Dom>,
    listeners: RefCell<Vec<Listener>>,
    watchers: RefCell<Vec<Watcher>>,
    frames: RefCell<Vec<Box<dyn FnOnce(f64)>>>,
    tickers: RefCell<Vec<Ticker>>,
    clock: Cell<f64>,
    dark_scheme: Cell<bool>,
    group_separator: Cell<char>,
}

impl Default for MemoryPage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPage {
    pub fn new() -> Self {
        Self::with_clock(DEFAULT_EPOCH_MS)
    }

    /// Fresh page whose clock reads `epoch_ms`
    pub fn with_clock(epoch_ms: f64) -> Self {
        let mut dom = Dom::default();
        dom.elements.push(Element {
            tag: "html".to_string(),
            ..Default::default()
        });
        dom.elements.push(Element {
            tag: "body".to_string(),
            parent: Some(NodeId::from_index(0)),
            ..Default::default()
        });
        dom.elements[0].children.push(NodeId::from_index(1));

        Self {
            dom: RefCell::new(dom),
            listeners: RefCell::new(Vec::new()),
            watchers: RefCell::new(Vec::new()),
            frames: RefCell::new(Vec::new()),
            tickers: RefCell::new(Vec::new()),
            clock: Cell::new(epoch_ms),
            dark_scheme: Cell::new(false),
            group_separator: Cell::new(','),
        }
    }

    // ========================
    // Building markup
    // ========================

    /// Append a `<tag>` child to `parent`. `class`, `value` and `checked`
    /// attributes seed the class list and form state.
    pub fn append(&self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let mut dom = self.dom.borrow_mut();
        let id = NodeId::from_index(dom.elements.len());
        let mut element = Element {
            tag: tag.to_ascii_lowercase(),
            parent: Some(parent),
            ..Default::default()
        };
        for (name, value) in attrs {
            match *name {
                "class" => element.classes = value.split_whitespace().map(str::to_string).collect(),
                _ => {
                    if *name == "value" {
                        element.value = value.to_string();
                    }
                    if *name == "checked" {
                        element.checked = true;
                    }
                    element.attrs.insert(name.to_string(), value.to_string());
                }
            }
        }
        dom.elements.push(element);
        if let Some(parent) = dom.get_mut(parent) {
            parent.children.push(id);
        }
        id
    }

    /// Append a child whose text content is `text`
    pub fn append_text(&self, parent: NodeId, tag: &str, attrs: &[(&str, &str)], text: &str) -> NodeId {
        let node = self.append(parent, tag, attrs);
        self.set_text(node, text);
        node
    }

    pub fn set_prefers_dark(&self, dark: bool) {
        self.dark_scheme.set(dark);
    }

    /// Thousands separator of the simulated locale (`,` by default)
    pub fn set_group_separator(&self, separator: char) {
        self.group_separator.set(separator);
    }

    /// What a user typing into a field would leave behind
    pub fn set_value(&self, node: NodeId, value: &str) {
        if let Some(el) = self.dom.borrow_mut().get_mut(node) {
            el.value = value.to_string();
        }
    }

    pub fn set_checked(&self, node: NodeId, checked: bool) {
        if let Some(el) = self.dom.borrow_mut().get_mut(node) {
            el.checked = checked;
        }
    }

    // ========================
    // Inspection
    // ========================

    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.dom.borrow().get(node)?.style.get(property).cloned()
    }

    /// `display: none` set inline
    pub fn is_hidden(&self, node: NodeId) -> bool {
        self.style(node, "display").as_deref() == Some("none")
    }

    /// Last markup written with `set_inner_html`, if the content came from there
    pub fn markup(&self, node: NodeId) -> Option<String> {
        self.dom.borrow().get(node)?.markup.clone()
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.dom.borrow().focused
    }

    pub fn listener_count(&self, node: NodeId, event: PageEvent) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|l| l.node == node && l.event == event)
            .count()
    }

    /// Observations still waiting on `node`
    pub fn active_watchers(&self, node: NodeId) -> usize {
        self.watchers
            .borrow()
            .iter()
            .filter(|w| w.node == node && w.active.get())
            .count()
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.borrow().len()
    }

    // ========================
    // Driving
    // ========================

    /// Fire `event` at `node`; returns whether a listener prevented the default
    pub fn dispatch(&self, node: NodeId, event: PageEvent) -> bool {
        let handlers: Vec<_> = self
            .listeners
            .borrow()
            .iter()
            .filter(|l| l.node == node && l.event == event)
            .map(|l| Rc::clone(&l.handler))
            .collect();
        let recorded = RecordedEvent::default();
        for handler in handlers {
            handler(&recorded);
        }
        recorded.default_prevented()
    }

    /// Scroll `node` into view with `ratio` of its area visible
    pub fn reveal(&self, node: NodeId, ratio: f64) {
        let due: Vec<_> = self
            .watchers
            .borrow()
            .iter()
            .filter(|w| w.node == node && w.active.get() && meets_threshold(ratio > 0.0, ratio, w.threshold))
            .map(|w| (Rc::clone(&w.active), Rc::clone(&w.callback)))
            .collect();
        for (active, callback) in due {
            if active.get() {
                (&mut *callback.borrow_mut())();
            }
        }
    }

    /// Move the clock forward, fire due intervals, then run the frames that
    /// were pending before this call with the new timestamp
    pub fn advance(&self, ms: f64) {
        let now = self.clock.get() + ms;
        self.clock.set(now);

        let tick_count = self.tickers.borrow().len();
        for index in 0..tick_count {
            loop {
                let callback = {
                    let mut tickers = self.tickers.borrow_mut();
                    let ticker = &mut tickers[index];
                    if ticker.next_due > now {
                        break;
                    }
                    ticker.next_due += ticker.period;
                    Rc::clone(&ticker.callback)
                };
                (&mut *callback.borrow_mut())();
            }
        }

        let frames = std::mem::take(&mut *self.frames.borrow_mut());
        for frame in frames {
            frame(now);
        }
    }

    /// Advance in `step_ms` increments until no frame is pending
    pub fn run_frames(&self, step_ms: f64) {
        let mut guard = 0;
        while self.pending_frames() > 0 && guard < 10_000 {
            self.advance(step_ms);
            guard += 1;
        }
    }
}

impl Page for MemoryPage {
    fn query(&self, selector: &str) -> Option<NodeId> {
        self.query_all(selector).into_iter().next()
    }

    fn query_all(&self, selector: &str) -> Vec<NodeId> {
        self.dom.borrow().select(NodeId::from_index(0), selector, true)
    }

    fn query_in(&self, scope: NodeId, selector: &str) -> Option<NodeId> {
        self.query_all_in(scope, selector).into_iter().next()
    }

    fn query_all_in(&self, scope: NodeId, selector: &str) -> Vec<NodeId> {
        self.dom.borrow().select(scope, selector, false)
    }

    fn root(&self) -> Option<NodeId> {
        Some(NodeId::from_index(0))
    }

    fn body(&self) -> Option<NodeId> {
        Some(NodeId::from_index(1))
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        let dom = self.dom.borrow();
        let el = dom.get(node)?;
        if name == "class" {
            return (!el.classes.is_empty()).then(|| el.classes.join(" "));
        }
        el.attrs.get(name).cloned()
    }

    fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        if let Some(el) = self.dom.borrow_mut().get_mut(node) {
            if name == "class" {
                el.classes = value.split_whitespace().map(str::to_string).collect();
            } else {
                el.attrs.insert(name.to_string(), value.to_string());
            }
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        ElementView::has_class(&*self.dom.borrow(), node, class)
    }

    fn add_class(&self, node: NodeId, class: &str) {
        if let Some(el) = self.dom.borrow_mut().get_mut(node) {
            if !el.classes.iter().any(|c| c == class) {
                el.classes.push(class.to_string());
            }
        }
    }

    fn remove_class(&self, node: NodeId, class: &str) {
        if let Some(el) = self.dom.borrow_mut().get_mut(node) {
            el.classes.retain(|c| c != class);
        }
    }

    fn text(&self, node: NodeId) -> String {
        self.dom.borrow().text_of(node)
    }

    fn set_text(&self, node: NodeId, text: &str) {
        if let Some(el) = self.dom.borrow_mut().get_mut(node) {
            el.children.clear();
            el.text = text.to_string();
            el.markup = None;
        }
    }

    fn set_inner_html(&self, node: NodeId, html: &str) {
        if let Some(el) = self.dom.borrow_mut().get_mut(node) {
            el.children.clear();
            el.text = strip_tags(html);
            el.markup = Some(html.to_string());
        }
    }

    fn set_style(&self, node: NodeId, property: &str, value: &str) {
        if let Some(el) = self.dom.borrow_mut().get_mut(node) {
            if value.is_empty() {
                el.style.remove(property);
            } else {
                el.style.insert(property.to_string(), value.to_string());
            }
        }
    }

    fn input_value(&self, node: NodeId) -> String {
        self.dom
            .borrow()
            .get(node)
            .map(|el| el.value.clone())
            .unwrap_or_default()
    }

    fn is_checked(&self, node: NodeId) -> bool {
        self.dom.borrow().get(node).is_some_and(|el| el.checked)
    }

    fn focus(&self, node: NodeId) {
        let mut dom = self.dom.borrow_mut();
        if dom.get(node).is_some() {
            dom.focused = Some(node);
        }
    }

    fn reset_form(&self, node: NodeId) {
        let mut dom = self.dom.borrow_mut();
        for field in dom.descendants(node) {
            if let Some(el) = dom.get_mut(field) {
                if is_form_field(&el.tag) {
                    el.value = el.attrs.get("value").cloned().unwrap_or_default();
                    el.checked = el.attrs.contains_key("checked");
                }
            }
        }
    }

    fn prefers_dark_scheme(&self) -> bool {
        self.dark_scheme.get()
    }

    fn now(&self) -> f64 {
        self.clock.get()
    }

    fn format_integer(&self, value: i64) -> String {
        let grouped = group_thousands(value);
        match self.group_separator.get() {
            ',' => grouped,
            separator => grouped.replace(',', &separator.to_string()),
        }
    }

    fn listen(&self, node: NodeId, event: PageEvent, handler: Handler) {
        self.listeners.borrow_mut().push(Listener {
            node,
            event,
            handler: Rc::from(handler),
        });
    }

    fn request_frame(&self, callback: Box<dyn FnOnce(f64)>) {
        self.frames.borrow_mut().push(callback);
    }

    fn set_interval(&self, period_ms: u32, callback: Box<dyn FnMut()>) {
        let period = f64::from(period_ms.max(1));
        self.tickers.borrow_mut().push(Ticker {
            period,
            next_due: self.clock.get() + period,
            callback: Rc::new(RefCell::new(callback)),
        });
    }

    fn observe_visibility(&self, node: NodeId, threshold: f64, on_visible: Box<dyn FnMut()>) -> Subscription {
        let active = Rc::new(Cell::new(true));
        self.watchers.borrow_mut().push(Watcher {
            node,
            threshold,
            active: Rc::clone(&active),
            callback: Rc::new(RefCell::new(on_visible)),
        });
        Subscription::new(move || active.set(false))
    }
}

/// [`KeyValueStore`] backed by a map, with switchable failures
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
    unavailable: Cell<bool>,
    reject_writes: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        store.entries.borrow_mut().insert(key.to_string(), value.to_string());
        store
    }

    /// Every read and write fails with [`StorageError::Unavailable`]
    pub fn unavailable() -> Self {
        let store = Self::new();
        store.unavailable.set(true);
        store
    }

    /// Make writes fail the way a full quota does
    pub fn reject_writes(&self, reject: bool) {
        self.reject_writes.set(reject);
    }

    /// Peek without going through the fallible interface
    pub fn entry(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.unavailable.get() {
            return Err(StorageError::Unavailable);
        }
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.unavailable.get() {
            return Err(StorageError::Unavailable);
        }
        if self.reject_writes.get() {
            return Err(StorageError::Backend(format!("quota exceeded writing {key}")));
        }
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}
