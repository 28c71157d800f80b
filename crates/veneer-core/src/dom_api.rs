//! The native surface the bridge runs against.
//!
//! `veneer-core` never talks to `web-sys` directly: hosts hand it a
//! [`DomSurface`] for listener registration and deliver raw firings as
//! [`NativePayload`] values. The in-memory surface in `veneer-platform`
//! implements the same pair, so the whole bridge runs headless.

use std::rc::Rc;

use thiserror::Error;

/// Handle to a native node owned by the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef(pub u64);

/// Handle to one registered native listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerRef(pub u64);

#[derive(Debug, Error)]
pub enum DomError {
    #[error("native node {0:?} is no longer alive")]
    NodeGone(NodeRef),
    #[error("listener {0:?} is not registered")]
    UnknownListener(ListenerRef),
}

pub type NativeCallback = Rc<dyn Fn(&dyn NativePayload)>;

/// Raw payload of one native firing.
///
/// Fields are read by dotted path (`"buttons"`, `"touches.0.clientX"`).
/// Absent or malformed fields read as `None`; callers fall back to
/// defaults instead of failing. A numeric read on a text field parses it
/// first, so a host that reports numbers as strings still works.
pub trait NativePayload {
    /// Native event name this firing was delivered for.
    fn event_name(&self) -> &str;

    fn number(&self, path: &str) -> Option<f64>;

    fn text(&self, path: &str) -> Option<String>;

    fn flag(&self, path: &str) -> bool {
        self.number(path).map(|v| v != 0.0).unwrap_or(false)
    }

    fn prevent_default(&self);
}

/// Listener registration on the host's nodes.
///
/// Registration can fail (the node may already be gone); removal of an
/// unknown listener fails likewise. Both are reported as [`DomError`]
/// and treated as non-fatal by the bridge.
pub trait DomSurface {
    fn add_listener(
        &self,
        node: NodeRef,
        event: &str,
        callback: NativeCallback,
        stop_propagation: bool,
    ) -> Result<ListenerRef, DomError>;

    fn remove_listener(&self, listener: ListenerRef) -> Result<(), DomError>;
}
