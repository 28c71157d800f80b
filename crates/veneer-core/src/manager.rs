//! Native listener ownership for one (element, identity) pair.

use std::cell::RefCell;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::dom_api::{DomSurface, ListenerRef, NativeCallback, NodeRef};

pub type TargetResolver = Box<dyn Fn() -> Option<NodeRef>>;

/// Owns the native listeners that feed one routed event on one element.
///
/// Built once by the registry, cached by the element, and reused across
/// subscribe/unsubscribe cycles. Two states: detached (no registered
/// listeners) and attached; `attach`/`detach` re-entered in the same
/// state are no-ops.
pub struct DomEventManager {
    surface: Rc<dyn DomSurface>,
    target: TargetResolver,
    names: &'static [&'static str],
    callback: NativeCallback,
    stop_propagation: bool,
    listeners: RefCell<SmallVec<[ListenerRef; 2]>>,
}

impl DomEventManager {
    pub fn new(
        surface: Rc<dyn DomSurface>,
        target: TargetResolver,
        names: &'static [&'static str],
        callback: NativeCallback,
    ) -> Self {
        Self {
            surface,
            target,
            names,
            callback,
            stop_propagation: false,
            listeners: RefCell::new(SmallVec::new()),
        }
    }

    /// Ask the surface to stop native propagation after the translation
    /// callback runs.
    pub fn stop_native_propagation(mut self) -> Self {
        self.stop_propagation = true;
        self
    }

    pub fn is_attached(&self) -> bool {
        !self.listeners.borrow().is_empty()
    }

    /// Register the translation callback for every native name on the
    /// current target. No-op when already attached. A target that does
    /// not resolve (element not connected yet) defers the attach; it is
    /// retried on the element's next connect.
    pub fn attach(&self) {
        if self.is_attached() {
            return;
        }
        let Some(node) = (self.target)() else { return };
        let mut listeners = self.listeners.borrow_mut();
        for name in self.names {
            match self
                .surface
                .add_listener(node, name, self.callback.clone(), self.stop_propagation)
            {
                Ok(listener) => listeners.push(listener),
                Err(err) => log::warn!("attaching {name:?} listener failed: {err}"),
            }
        }
    }

    /// Remove every registered listener. Safe no-op when detached,
    /// including when called from inside the translation callback.
    pub fn detach(&self) {
        let drained: SmallVec<[ListenerRef; 2]> = self.listeners.borrow_mut().drain(..).collect();
        for listener in drained {
            if let Err(err) = self.surface.remove_listener(listener) {
                log::warn!("detaching listener failed: {err}");
            }
        }
    }
}
