//! Browser surface (wasm32) over `web-sys`.
//!
//! DOM nodes are registered with the surface and referred to by handle;
//! the bridge in `veneer-core` never sees a `web_sys` type. Payload
//! fields are read straight off the live `Event` object by dotted path,
//! so whatever the browser puts there is what the translators see.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use js_sys::Reflect;
use slotmap::{Key, KeyData, SlotMap, new_key_type};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;

use veneer_core::dom_api::{
    DomError, DomSurface, ListenerRef, NativeCallback, NativePayload, NodeRef,
};

new_key_type! { struct WebListenerKey; }

struct WebListener {
    node: u64,
    target: web_sys::EventTarget,
    event: String,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

/// The real browser DOM as a [`DomSurface`].
#[derive(Default)]
pub struct WebSurface {
    nodes: RefCell<HashMap<u64, web_sys::EventTarget>>,
    next_node: Cell<u64>,
    listeners: RefCell<SlotMap<WebListenerKey, WebListener>>,
}

impl WebSurface {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Register a DOM node so elements can refer to it by handle.
    pub fn register_node(&self, target: &web_sys::EventTarget) -> NodeRef {
        let id = self.next_node.get();
        self.next_node.set(id + 1);
        self.nodes.borrow_mut().insert(id, target.clone());
        NodeRef(id)
    }

    /// Forget a node handle; listeners still registered through it are
    /// removed from the DOM as well.
    pub fn forget_node(&self, node: NodeRef) {
        self.nodes.borrow_mut().remove(&node.0);
        let doomed: Vec<WebListenerKey> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(_, l)| l.node == node.0)
            .map(|(k, _)| k)
            .collect();
        for key in doomed {
            if let Some(listener) = self.listeners.borrow_mut().remove(key) {
                let _ = listener.target.remove_event_listener_with_callback(
                    &listener.event,
                    listener.closure.as_ref().unchecked_ref(),
                );
            }
        }
    }
}

impl DomSurface for WebSurface {
    fn add_listener(
        &self,
        node: NodeRef,
        event: &str,
        callback: NativeCallback,
        stop_propagation: bool,
    ) -> Result<ListenerRef, DomError> {
        let target = self
            .nodes
            .borrow()
            .get(&node.0)
            .cloned()
            .ok_or(DomError::NodeGone(node))?;

        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |ev: web_sys::Event| {
            if stop_propagation {
                ev.stop_propagation();
            }
            let payload = WebPayload::new(ev);
            callback(&payload);
        });

        target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .map_err(|_| DomError::NodeGone(node))?;

        let key = self.listeners.borrow_mut().insert(WebListener {
            node: node.0,
            target,
            event: event.to_string(),
            closure,
        });
        Ok(ListenerRef(key.data().as_ffi()))
    }

    fn remove_listener(&self, listener: ListenerRef) -> Result<(), DomError> {
        let key = WebListenerKey::from(KeyData::from_ffi(listener.0));
        let record = self
            .listeners
            .borrow_mut()
            .remove(key)
            .ok_or(DomError::UnknownListener(listener))?;
        let _ = record.target.remove_event_listener_with_callback(
            &record.event,
            record.closure.as_ref().unchecked_ref(),
        );
        Ok(())
    }
}

/// A live `web_sys::Event` as a [`NativePayload`].
pub struct WebPayload {
    event: web_sys::Event,
    name: String,
}

impl WebPayload {
    pub fn new(event: web_sys::Event) -> Self {
        let name = event.type_();
        Self { event, name }
    }
}

impl NativePayload for WebPayload {
    fn event_name(&self) -> &str {
        &self.name
    }

    fn number(&self, path: &str) -> Option<f64> {
        let value = reflect_path(self.event.as_ref(), path)?;
        value
            .as_f64()
            .or_else(|| value.as_string().and_then(|s| s.parse().ok()))
    }

    fn text(&self, path: &str) -> Option<String> {
        reflect_path(self.event.as_ref(), path)?.as_string()
    }

    fn prevent_default(&self) {
        self.event.prevent_default();
    }
}

fn reflect_path(root: &JsValue, path: &str) -> Option<JsValue> {
    let mut value = root.clone();
    for segment in path.split('.') {
        value = Reflect::get(&value, &JsValue::from_str(segment)).ok()?;
        if value.is_undefined() || value.is_null() {
            return None;
        }
    }
    Some(value)
}

/// Install panic and console logging hooks; call once at startup.
pub fn init_logging() {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
    let _ = console_log::init_with_level(log::Level::Info);
}
