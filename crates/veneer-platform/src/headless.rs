//! In-memory DOM surface: synthetic nodes, listeners, and payloads.
//!
//! Synthetic events fired through [`HeadlessSurface`] run the exact
//! translation path the browser surface drives, which makes it the
//! surface of choice for tests and for hosting the element tree outside
//! a browser.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use slotmap::{Key, KeyData, SlotMap, new_key_type};

use veneer_core::dom_api::{
    DomError, DomSurface, ListenerRef, NativeCallback, NativePayload, NodeRef,
};

new_key_type! { struct ListenerKey; }

struct ListenerRecord {
    node: NodeRef,
    event: String,
    callback: NativeCallback,
    stop_propagation: bool,
}

/// A DOM stand-in that lives entirely in memory.
#[derive(Default)]
pub struct HeadlessSurface {
    listeners: RefCell<SlotMap<ListenerKey, ListenerRecord>>,
    next_node: Cell<u64>,
    dead: RefCell<HashSet<NodeRef>>,
}

impl HeadlessSurface {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Mint a fresh node handle.
    pub fn create_node(&self) -> NodeRef {
        let id = self.next_node.get();
        self.next_node.set(id + 1);
        NodeRef(id)
    }

    /// Drop a node: its listeners go away and further registration on it
    /// fails with [`DomError::NodeGone`].
    pub fn destroy_node(&self, node: NodeRef) {
        self.dead.borrow_mut().insert(node);
        let doomed: Vec<ListenerKey> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(_, r)| r.node == node)
            .map(|(k, _)| k)
            .collect();
        let mut listeners = self.listeners.borrow_mut();
        for key in doomed {
            listeners.remove(key);
        }
    }

    pub fn listener_count(&self, node: NodeRef, event: &str) -> usize {
        self.listeners
            .borrow()
            .values()
            .filter(|r| r.node == node && r.event == event)
            .count()
    }

    pub fn total_listeners(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Whether some listener for (node, event) asked for native
    /// propagation to stop.
    pub fn stops_propagation(&self, node: NodeRef, event: &str) -> bool {
        self.listeners
            .borrow()
            .values()
            .any(|r| r.node == node && r.event == event && r.stop_propagation)
    }

    /// Deliver a synthetic event to every listener registered for its
    /// name on `node`; returns how many ran. The listener set is
    /// snapshotted first, so a callback may unregister listeners
    /// (including itself) mid-dispatch.
    pub fn fire(&self, node: NodeRef, payload: &dyn NativePayload) -> usize {
        let snapshot: Vec<(ListenerKey, NativeCallback)> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(_, r)| r.node == node && r.event == payload.event_name())
            .map(|(k, r)| (k, r.callback.clone()))
            .collect();
        let mut fired = 0;
        for (key, callback) in snapshot {
            // skip listeners a previous callback already removed
            if !self.listeners.borrow().contains_key(key) {
                continue;
            }
            callback(payload);
            fired += 1;
        }
        fired
    }
}

impl DomSurface for HeadlessSurface {
    fn add_listener(
        &self,
        node: NodeRef,
        event: &str,
        callback: NativeCallback,
        stop_propagation: bool,
    ) -> Result<ListenerRef, DomError> {
        if self.dead.borrow().contains(&node) {
            return Err(DomError::NodeGone(node));
        }
        let key = self.listeners.borrow_mut().insert(ListenerRecord {
            node,
            event: event.to_string(),
            callback,
            stop_propagation,
        });
        Ok(ListenerRef(key.data().as_ffi()))
    }

    fn remove_listener(&self, listener: ListenerRef) -> Result<(), DomError> {
        let key = ListenerKey::from(KeyData::from_ffi(listener.0));
        self.listeners
            .borrow_mut()
            .remove(key)
            .map(|_| ())
            .ok_or(DomError::UnknownListener(listener))
    }
}

/// Builder-style payload for synthetic events.
pub struct SyntheticPayload {
    name: String,
    numbers: HashMap<String, f64>,
    texts: HashMap<String, String>,
    default_prevented: Cell<bool>,
}

impl SyntheticPayload {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            numbers: HashMap::new(),
            texts: HashMap::new(),
            default_prevented: Cell::new(false),
        }
    }

    pub fn with_number(mut self, path: &str, value: f64) -> Self {
        self.numbers.insert(path.to_string(), value);
        self
    }

    pub fn with_text(mut self, path: &str, value: &str) -> Self {
        self.texts.insert(path.to_string(), value.to_string());
        self
    }

    /// Client coordinates shorthand.
    pub fn at(self, x: f64, y: f64) -> Self {
        self.with_number("clientX", x).with_number("clientY", y)
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

impl NativePayload for SyntheticPayload {
    fn event_name(&self) -> &str {
        &self.name
    }

    fn number(&self, path: &str) -> Option<f64> {
        self.numbers
            .get(path)
            .copied()
            .or_else(|| self.texts.get(path).and_then(|s| s.parse().ok()))
    }

    fn text(&self, path: &str) -> Option<String> {
        self.texts.get(path).cloned()
    }

    fn prevent_default(&self) {
        self.default_prevented.set(true);
    }
}
