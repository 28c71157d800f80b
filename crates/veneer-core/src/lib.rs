//! # Elements, routed events, and the DOM bridge
//!
//! Veneer hosts a retained, desktop-style element tree inside a browser
//! page. Application code works with *routed events* — logical
//! identities like [`RoutedEvent::PointerPressed`] — while the browser
//! only knows flat DOM events. This crate is the bridge between the two
//! models:
//!
//! - [`UiElement`] stores logical handlers per identity and, whenever a
//!   registration crosses the zero/nonzero boundary, decides whether
//!   native listeners are needed at all.
//! - [`DomEventManager`] owns the native listeners for one identity on
//!   one element. It attaches lazily (deferring while the element has no
//!   backing node) and detaches idempotently.
//! - The registry maps each identity to the native event names feeding
//!   it and to the translator that turns a raw payload into a semantic
//!   event, including the button-bitmask disambiguation between the
//!   press and right-button identities.
//!
//! Hosts implement [`DomSurface`] (listener registration) and deliver
//! firings as [`NativePayload`] values; the crate never touches
//! `web-sys` itself, so the whole bridge runs unchanged under the
//! in-memory surface `veneer-platform` ships for tests and servers.
//!
//! ```rust
//! use std::rc::Rc;
//! use veneer_core::*;
//!
//! struct NullSurface;
//!
//! impl DomSurface for NullSurface {
//!     fn add_listener(
//!         &self,
//!         _node: NodeRef,
//!         _event: &str,
//!         _callback: NativeCallback,
//!         _stop_propagation: bool,
//!     ) -> Result<ListenerRef, DomError> {
//!         Ok(ListenerRef(0))
//!     }
//!     fn remove_listener(&self, _listener: ListenerRef) -> Result<(), DomError> {
//!         Ok(())
//!     }
//! }
//!
//! let ctx = EventContext::new(Rc::new(NullSurface), EventProfile::Pointer);
//! let button = UiElement::new(ctx);
//!
//! let on_press: RoutedHandler = Rc::new(|_element, args| {
//!     if let EventPayload::Pointer(p) = &args.payload {
//!         log::info!("pressed at {:?} (click {})", p.position, p.click_count);
//!     }
//! });
//! button.add_handler(RoutedEvent::PointerPressed, on_press, false);
//!
//! // listeners attach once the element is backed by a real node
//! button.connect(NodeRef(1));
//! ```

pub mod dom_api;
pub mod element;
pub mod geometry;
pub mod input;
pub mod manager;
pub mod registry;
pub mod routed;

pub use dom_api::*;
pub use element::*;
pub use geometry::*;
pub use input::*;
pub use manager::*;
pub use registry::*;
pub use routed::*;
