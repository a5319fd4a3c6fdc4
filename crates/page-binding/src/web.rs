//! Browser Page
//!
//! [`Page`] and [`KeyValueStore`] over `web-sys`. Elements are interned into
//! a registry so each one keeps a single [`NodeId`] for the life of the page.

use std::cell::RefCell;

use gloo_timers::callback::Interval;
use js_sys::{Array, Date, Function, Object};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, HtmlElement, HtmlFormElement, HtmlInputElement,
    IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, Storage, Window,
};

use crate::{
    group_thousands, meets_threshold, DomEvent, Handler, KeyValueStore, NodeId, Page, PageEvent, StorageError,
    Subscription,
};

struct WebEvent(web_sys::Event);

impl DomEvent for WebEvent {
    fn prevent_default(&self) {
        self.0.prevent_default();
    }
}

/// The live document
pub struct WebPage {
    window: Window,
    document: Document,
    nodes: RefCell<Vec<Element>>,
    /// `Intl.NumberFormat` bound `format` for the user agent's locale
    number_format: Function,
}

impl WebPage {
    /// `None` outside a browser window
    pub fn new() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        let number_format = js_sys::Intl::NumberFormat::new(&Array::new(), &Object::new()).format();
        Some(Self {
            window,
            document,
            nodes: RefCell::new(Vec::new()),
            number_format,
        })
    }

    /// Run `callback` once the document has been parsed
    pub fn when_ready(&self, callback: impl FnOnce() + 'static) {
        if self.document.ready_state() != "loading" {
            callback();
            return;
        }
        let mut callback = Some(callback);
        let on_ready = Closure::<dyn FnMut()>::new(move || {
            if let Some(callback) = callback.take() {
                callback();
            }
        });
        if let Err(err) = self
            .document
            .add_event_listener_with_callback("DOMContentLoaded", on_ready.as_ref().unchecked_ref())
        {
            log::warn!("[PAGE] could not wait for DOMContentLoaded: {err:?}");
        }
        on_ready.forget();
    }

    fn intern(&self, element: Element) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        if let Some(index) = nodes.iter().position(|known| *known == element) {
            return NodeId::from_index(index);
        }
        nodes.push(element);
        NodeId::from_index(nodes.len() - 1)
    }

    fn element(&self, node: NodeId) -> Option<Element> {
        self.nodes.borrow().get(node.index()).cloned()
    }

    fn html_element(&self, node: NodeId) -> Option<HtmlElement> {
        self.element(node)?.dyn_into::<HtmlElement>().ok()
    }

    fn input(&self, node: NodeId) -> Option<HtmlInputElement> {
        self.element(node)?.dyn_into::<HtmlInputElement>().ok()
    }

    fn collect(&self, list: Result<web_sys::NodeList, JsValue>) -> Vec<NodeId> {
        let Ok(list) = list else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|element| self.intern(element))
            .collect()
    }
}

impl Page for WebPage {
    fn query(&self, selector: &str) -> Option<NodeId> {
        let element = self.document.query_selector(selector).ok().flatten()?;
        Some(self.intern(element))
    }

    fn query_all(&self, selector: &str) -> Vec<NodeId> {
        self.collect(self.document.query_selector_all(selector))
    }

    fn query_in(&self, scope: NodeId, selector: &str) -> Option<NodeId> {
        let element = self.element(scope)?.query_selector(selector).ok().flatten()?;
        Some(self.intern(element))
    }

    fn query_all_in(&self, scope: NodeId, selector: &str) -> Vec<NodeId> {
        match self.element(scope) {
            Some(element) => self.collect(element.query_selector_all(selector)),
            None => Vec::new(),
        }
    }

    fn root(&self) -> Option<NodeId> {
        let element = self.document.document_element()?;
        Some(self.intern(element))
    }

    fn body(&self) -> Option<NodeId> {
        let body = self.document.body()?;
        Some(self.intern(body.into()))
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.element(node)?.get_attribute(name)
    }

    fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        if let Some(element) = self.element(node) {
            let _ = element.set_attribute(name, value);
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node)
            .is_some_and(|element| element.class_list().contains(class))
    }

    fn add_class(&self, node: NodeId, class: &str) {
        if let Some(element) = self.element(node) {
            let _ = element.class_list().add_1(class);
        }
    }

    fn remove_class(&self, node: NodeId, class: &str) {
        if let Some(element) = self.element(node) {
            let _ = element.class_list().remove_1(class);
        }
    }

    fn text(&self, node: NodeId) -> String {
        self.element(node)
            .and_then(|element| element.text_content())
            .unwrap_or_default()
    }

    fn set_text(&self, node: NodeId, text: &str) {
        if let Some(element) = self.element(node) {
            element.set_text_content(Some(text));
        }
    }

    fn set_inner_html(&self, node: NodeId, html: &str) {
        if let Some(element) = self.element(node) {
            element.set_inner_html(html);
        }
    }

    fn set_style(&self, node: NodeId, property: &str, value: &str) {
        if let Some(element) = self.html_element(node) {
            let style = element.style();
            let _ = if value.is_empty() {
                style.remove_property(property).map(|_| ())
            } else {
                style.set_property(property, value)
            };
        }
    }

    fn input_value(&self, node: NodeId) -> String {
        self.input(node).map(|input| input.value()).unwrap_or_default()
    }

    fn is_checked(&self, node: NodeId) -> bool {
        self.input(node).is_some_and(|input| input.checked())
    }

    fn focus(&self, node: NodeId) {
        if let Some(element) = self.html_element(node) {
            let _ = element.focus();
        }
    }

    fn reset_form(&self, node: NodeId) {
        if let Some(form) = self.element(node).and_then(|e| e.dyn_into::<HtmlFormElement>().ok()) {
            form.reset();
        }
    }

    fn prefers_dark_scheme(&self) -> bool {
        self.window
            .match_media("(prefers-color-scheme: dark)")
            .ok()
            .flatten()
            .is_some_and(|mq| mq.matches())
    }

    fn now(&self) -> f64 {
        Date::now()
    }

    fn add_days(&self, epoch_ms: f64, days: u32) -> f64 {
        // Local calendar days, so a DST change keeps the wall-clock time
        let date = Date::new(&JsValue::from_f64(epoch_ms));
        date.set_date(date.get_date() + days);
        date.get_time()
    }

    fn format_integer(&self, value: i64) -> String {
        self.number_format
            .call1(&JsValue::UNDEFINED, &JsValue::from_f64(value as f64))
            .ok()
            .and_then(|formatted| formatted.as_string())
            .unwrap_or_else(|| group_thousands(value))
    }

    fn listen(&self, node: NodeId, event: PageEvent, handler: Handler) {
        let Some(element) = self.element(node) else {
            return;
        };
        let callback = Closure::<dyn FnMut(web_sys::Event)>::new(move |ev: web_sys::Event| {
            handler(&WebEvent(ev));
        });
        if let Err(err) = element.add_event_listener_with_callback(event.as_str(), callback.as_ref().unchecked_ref()) {
            log::warn!("[PAGE] could not listen for {} on {node}: {err:?}", event.as_str());
        }
        // Listeners live as long as the page
        callback.forget();
    }

    fn request_frame(&self, callback: Box<dyn FnOnce(f64)>) {
        let on_frame = Closure::once_into_js(move |timestamp: f64| callback(timestamp));
        if let Err(err) = self.window.request_animation_frame(on_frame.unchecked_ref()) {
            log::warn!("[PAGE] requestAnimationFrame failed: {err:?}");
        }
    }

    fn set_interval(&self, period_ms: u32, callback: Box<dyn FnMut()>) {
        Interval::new(period_ms, callback).forget();
    }

    fn observe_visibility(&self, node: NodeId, threshold: f64, mut on_visible: Box<dyn FnMut()>) -> Subscription {
        let Some(element) = self.element(node) else {
            return Subscription::noop();
        };
        let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
            move |entries: Array, _observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let entry: IntersectionObserverEntry = entry.unchecked_into();
                    if meets_threshold(entry.is_intersecting(), entry.intersection_ratio(), threshold) {
                        on_visible();
                    }
                }
            },
        );
        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(threshold));
        let observer = match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options) {
            Ok(observer) => observer,
            Err(err) => {
                log::warn!("[PAGE] IntersectionObserver unavailable: {err:?}");
                return Subscription::noop();
            }
        };
        observer.observe(&element);

        Subscription::new(move || {
            observer.disconnect();
            // The subscription is usually disposed from inside `callback`,
            // which must not be freed while it is still running.
            wasm_bindgen_futures::spawn_local(async move {
                drop(callback);
            });
        })
    }
}

/// `window.localStorage`
pub struct LocalStore {
    storage: Option<Storage>,
}

impl LocalStore {
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            log::warn!("[STORE] localStorage is unavailable");
        }
        Self { storage }
    }

    fn storage(&self) -> Result<&Storage, StorageError> {
        self.storage.as_ref().ok_or(StorageError::Unavailable)
    }
}

impl Default for LocalStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage()?
            .get_item(key)
            .map_err(|e| StorageError::Backend(format!("{e:?}")))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| StorageError::Backend(format!("{e:?}")))
    }
}
