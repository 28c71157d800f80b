//! The element model and the subscription lifecycle.
//!
//! A [`UiElement`] keeps two lazily allocated side-tables: registered
//! handlers per routed event, and the cached [`DomEventManager`] per
//! routed event. Native listeners exist only while at least one logical
//! consumer does — a registered handler, or an `on_*` hook overridden by
//! the element's concrete type.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use std::time::Duration;

use web_time::Instant;

use crate::dom_api::{DomSurface, NativePayload, NodeRef};
use crate::geometry::Vec2;
use crate::input::{
    Key, KeyEvent, Modifiers, PointerButton, PointerEvent, PointerKind, TextInputEvent, WheelEvent,
};
use crate::manager::DomEventManager;
use crate::registry::{self, EventProfile};
use crate::routed::{EventPayload, HookMask, RoutedEvent, RoutedEventArgs, RoutedHandler};

/// Presses closer together than this (in time) continue a multi-click.
const MULTI_CLICK_WINDOW: Duration = Duration::from_millis(400);

/// Context shared by every element of one hosted tree: the native
/// surface and the event-name universe picked at startup.
#[derive(Clone)]
pub struct EventContext {
    surface: Rc<dyn DomSurface>,
    profile: EventProfile,
}

impl EventContext {
    pub fn new(surface: Rc<dyn DomSurface>, profile: EventProfile) -> Self {
        Self { surface, profile }
    }

    pub fn profile(&self) -> EventProfile {
        self.profile
    }
}

/// Per-type `on_*` overrides.
///
/// `overridden()` reports which hooks the concrete type implements. It
/// is queried once when the element is built and cached as a bitmask;
/// an element whose type overrides a hook keeps its native listeners
/// attached even with zero registered handlers.
pub trait EventHooks {
    fn overridden(&self) -> HookMask {
        HookMask::empty()
    }

    fn on_pointer_moved(&self, element: &UiElement, args: &mut RoutedEventArgs) {
        let _ = (element, args);
    }
    fn on_pointer_pressed(&self, element: &UiElement, args: &mut RoutedEventArgs) {
        let _ = (element, args);
    }
    fn on_pointer_released(&self, element: &UiElement, args: &mut RoutedEventArgs) {
        let _ = (element, args);
    }
    fn on_pointer_wheel_changed(&self, element: &UiElement, args: &mut RoutedEventArgs) {
        let _ = (element, args);
    }
    fn on_pointer_entered(&self, element: &UiElement, args: &mut RoutedEventArgs) {
        let _ = (element, args);
    }
    fn on_pointer_exited(&self, element: &UiElement, args: &mut RoutedEventArgs) {
        let _ = (element, args);
    }
    fn on_mouse_right_button_down(&self, element: &UiElement, args: &mut RoutedEventArgs) {
        let _ = (element, args);
    }
    fn on_mouse_right_button_up(&self, element: &UiElement, args: &mut RoutedEventArgs) {
        let _ = (element, args);
    }
    fn on_tapped(&self, element: &UiElement, args: &mut RoutedEventArgs) {
        let _ = (element, args);
    }
    fn on_right_tapped(&self, element: &UiElement, args: &mut RoutedEventArgs) {
        let _ = (element, args);
    }
    fn on_key_down(&self, element: &UiElement, args: &mut RoutedEventArgs) {
        let _ = (element, args);
    }
    fn on_key_up(&self, element: &UiElement, args: &mut RoutedEventArgs) {
        let _ = (element, args);
    }
    fn on_got_focus(&self, element: &UiElement, args: &mut RoutedEventArgs) {
        let _ = (element, args);
    }
    fn on_lost_focus(&self, element: &UiElement, args: &mut RoutedEventArgs) {
        let _ = (element, args);
    }
    fn on_text_input(&self, element: &UiElement, args: &mut RoutedEventArgs) {
        let _ = (element, args);
    }
}

struct NoHooks;

impl EventHooks for NoHooks {}

#[derive(Clone)]
struct HandlerEntry {
    handler: RoutedHandler,
    handled_events_too: bool,
}

struct ElementInner {
    ctx: EventContext,
    hooks: Rc<dyn EventHooks>,
    hook_mask: HookMask,
    node: Cell<Option<NodeRef>>,
    handlers: RefCell<Option<HashMap<RoutedEvent, Vec<HandlerEntry>>>>,
    managers: RefCell<Option<HashMap<RoutedEvent, Option<Rc<DomEventManager>>>>>,
    captured: Cell<bool>,
    last_press: Cell<Option<(Instant, Vec2)>>,
    click_count: Cell<u32>,
}

impl Drop for ElementInner {
    fn drop(&mut self) {
        // teardown must not leave native listeners behind
        if let Some(map) = self.managers.get_mut() {
            for manager in map.values().flatten() {
                manager.detach();
            }
        }
    }
}

/// One node of the hosted element tree. Cheap-clone handle; all clones
/// refer to the same element.
#[derive(Clone)]
pub struct UiElement {
    inner: Rc<ElementInner>,
}

/// Non-owning handle; dispatcher closures hold these so the element
/// (which owns the dispatcher cache) is never kept alive by it.
#[derive(Clone)]
pub struct WeakElement {
    inner: Weak<ElementInner>,
}

impl WeakElement {
    pub fn upgrade(&self) -> Option<UiElement> {
        self.inner.upgrade().map(|inner| UiElement { inner })
    }
}

impl UiElement {
    pub fn new(ctx: EventContext) -> Self {
        Self::with_hooks(ctx, Rc::new(NoHooks))
    }

    pub fn with_hooks(ctx: EventContext, hooks: Rc<dyn EventHooks>) -> Self {
        let hook_mask = hooks.overridden();
        UiElement {
            inner: Rc::new(ElementInner {
                ctx,
                hooks,
                hook_mask,
                node: Cell::new(None),
                handlers: RefCell::new(None),
                managers: RefCell::new(None),
                captured: Cell::new(false),
                last_press: Cell::new(None),
                click_count: Cell::new(0),
            }),
        }
    }

    pub fn downgrade(&self) -> WeakElement {
        WeakElement {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn profile(&self) -> EventProfile {
        self.inner.ctx.profile
    }

    pub(crate) fn surface(&self) -> Rc<dyn DomSurface> {
        self.inner.ctx.surface.clone()
    }

    /// The native node currently backing this element, if connected.
    pub fn node(&self) -> Option<NodeRef> {
        self.inner.node.get()
    }

    pub fn is_connected(&self) -> bool {
        self.inner.node.get().is_some()
    }

    /// Back the element with a live native node and re-hook every
    /// identity that still has a consumer; attaches deferred while
    /// disconnected happen now.
    pub fn connect(&self, node: NodeRef) {
        if self.inner.node.get() != Some(node) && self.is_connected() {
            // the backing node was replaced; listeners on the old one
            // must go first
            self.detach_all();
        }
        self.inner.node.set(Some(node));
        for event in RoutedEvent::ALL {
            if self.should_hook_up(event) {
                self.hook_up(event);
            }
        }
    }

    /// Remove the element from the native tree. Every cached dispatcher
    /// detaches; the cache itself survives for a later reconnect.
    pub fn disconnect(&self) {
        self.detach_all();
        self.inner.node.set(None);
    }

    fn detach_all(&self) {
        let managers: Vec<Rc<DomEventManager>> = match &*self.inner.managers.borrow() {
            Some(map) => map.values().flatten().cloned().collect(),
            None => return,
        };
        for manager in managers {
            manager.detach();
        }
    }

    // --- Routed-event subscription surface ---

    /// Register `handler` for `event`. Handlers run in registration
    /// order; the same handler may be registered more than once. With
    /// `handled_events_too` the handler also runs after a previous one
    /// marked the event handled.
    pub fn add_handler(&self, event: RoutedEvent, handler: RoutedHandler, handled_events_too: bool) {
        let first = {
            let mut store = self.inner.handlers.borrow_mut();
            let map = store.get_or_insert_with(HashMap::new);
            let list = map.entry(event).or_default();
            list.push(HandlerEntry {
                handler,
                handled_events_too,
            });
            list.len() == 1
        };
        if first {
            self.hook_up(event);
        }
    }

    /// Unregister one registration of `handler` (matched by identity).
    /// Removing the last handler unhooks the native listeners unless an
    /// overridden hook still needs them.
    pub fn remove_handler(&self, event: RoutedEvent, handler: &RoutedHandler) {
        let emptied = {
            let mut store = self.inner.handlers.borrow_mut();
            let Some(map) = store.as_mut() else { return };
            let Some(list) = map.get_mut(&event) else { return };
            match list.iter().position(|e| Rc::ptr_eq(&e.handler, handler)) {
                Some(i) => {
                    list.remove(i);
                    list.is_empty()
                }
                None => return,
            }
        };
        if emptied && !self.should_hook_up(event) {
            self.unhook(event);
        }
    }

    pub fn handler_count(&self, event: RoutedEvent) -> usize {
        match &*self.inner.handlers.borrow() {
            Some(map) => map.get(&event).map(|l| l.len()).unwrap_or(0),
            None => 0,
        }
    }

    // --- Subscription lifecycle ---

    /// True iff native listeners are wanted: at least one registered
    /// handler, or the element's type overrides the matching hook.
    pub fn should_hook_up(&self, event: RoutedEvent) -> bool {
        if self.handler_count(event) > 0 {
            return true;
        }
        self.inner.hook_mask.contains(event.hook_bit())
    }

    /// Idempotent. Builds the dispatcher on first use (an identity with
    /// no native counterpart caches as absent and stays a no-op), then
    /// attaches if not already attached.
    pub fn hook_up(&self, event: RoutedEvent) {
        let manager = {
            let mut store = self.inner.managers.borrow_mut();
            let map = store.get_or_insert_with(|| HashMap::with_capacity(1));
            map.entry(event)
                .or_insert_with(|| registry::build_manager(self, event))
                .clone()
        };
        if let Some(manager) = manager {
            manager.attach();
        }
    }

    /// Idempotent. Detaches the cached dispatcher if there is one; the
    /// instance stays cached so a later hook-up reuses it.
    pub fn unhook(&self, event: RoutedEvent) {
        let manager = match &*self.inner.managers.borrow() {
            Some(map) => map.get(&event).cloned().flatten(),
            None => return,
        };
        if let Some(manager) = manager {
            manager.detach();
        }
    }

    // --- Pointer capture ---

    /// Route subsequent pointer input to this element until released;
    /// translators flagged for it suppress native text selection while
    /// capture is held.
    pub fn capture_pointer(&self) {
        self.inner.captured.set(true);
    }

    pub fn release_pointer_capture(&self) {
        self.inner.captured.set(false);
    }

    pub fn has_pointer_capture(&self) -> bool {
        self.inner.captured.get()
    }

    // --- Dispatch ---

    /// Raise a routed event on this element: the overridden type hook
    /// first, then the registered handlers in registration order. The
    /// handler list is snapshotted first, so a handler may unregister
    /// itself (or unhook the whole identity) mid-dispatch.
    pub fn raise_event(&self, args: &mut RoutedEventArgs) {
        if self.inner.hook_mask.contains(args.event.hook_bit()) {
            let hooks = self.inner.hooks.clone();
            invoke_hook(&*hooks, self, args);
        }
        let entries: Vec<HandlerEntry> = match &*self.inner.handlers.borrow() {
            Some(map) => map.get(&args.event).cloned().unwrap_or_default(),
            None => Vec::new(),
        };
        for entry in entries {
            if args.handled && !entry.handled_events_too {
                continue;
            }
            (entry.handler)(self, args);
        }
    }

    // --- Translation entry points (called by the registry's factories) ---

    pub(crate) fn process_pointer_event(
        &self,
        event: RoutedEvent,
        button: Option<PointerButton>,
        payload: &dyn NativePayload,
        opts: PointerOptions,
    ) {
        if opts.prevent_text_selection_when_captured && self.has_pointer_capture() {
            payload.prevent_default();
        }
        let mut pointer = pointer_from_payload(payload);
        pointer.button = button;
        if opts.refresh_click_count {
            pointer.click_count = self.refresh_click_count(pointer.position);
        }
        let mut args = RoutedEventArgs::new(event, EventPayload::Pointer(pointer));
        self.raise_event(&mut args);
    }

    pub(crate) fn process_wheel_event(&self, payload: &dyn NativePayload) {
        let wheel = WheelEvent {
            delta: Vec2 {
                x: payload.number("deltaX").unwrap_or(0.0) as f32,
                y: payload.number("deltaY").unwrap_or(0.0) as f32,
            },
            position: pointer_position(payload),
            modifiers: modifiers_from_payload(payload),
        };
        let mut args =
            RoutedEventArgs::new(RoutedEvent::PointerWheelChanged, EventPayload::Wheel(wheel));
        self.raise_event(&mut args);
    }

    pub(crate) fn process_key_event(&self, event: RoutedEvent, payload: &dyn NativePayload) {
        let key_event = KeyEvent {
            key: payload
                .text("key")
                .map(|k| Key::parse(&k))
                .unwrap_or(Key::Unidentified),
            modifiers: modifiers_from_payload(payload),
            is_repeat: payload.flag("repeat"),
        };
        let mut args = RoutedEventArgs::new(event, EventPayload::Key(key_event));
        self.raise_event(&mut args);
    }

    pub(crate) fn process_text_input(&self, payload: &dyn NativePayload) {
        let text = payload.text("data").unwrap_or_default();
        let mut args = RoutedEventArgs::new(
            RoutedEvent::TextInput,
            EventPayload::Text(TextInputEvent { text }),
        );
        self.raise_event(&mut args);
    }

    pub(crate) fn process_focus_event(&self, event: RoutedEvent) {
        let mut args = RoutedEventArgs::new(event, EventPayload::Focus);
        self.raise_event(&mut args);
    }

    /// A press within the multi-click window at (close to) the previous
    /// press position continues the series; anything else restarts it.
    fn refresh_click_count(&self, position: Vec2) -> u32 {
        let now = Instant::now();
        let count = match self.inner.last_press.get() {
            Some((at, last))
                if now.duration_since(at) <= MULTI_CLICK_WINDOW && last.is_close(position) =>
            {
                self.inner.click_count.get() + 1
            }
            _ => 1,
        };
        self.inner.last_press.set(Some((now, position)));
        self.inner.click_count.set(count);
        count
    }
}

/// Options bundle for the pointer translators.
#[derive(Clone, Copy, Default)]
pub(crate) struct PointerOptions {
    pub prevent_text_selection_when_captured: bool,
    pub refresh_click_count: bool,
}

fn invoke_hook(hooks: &dyn EventHooks, element: &UiElement, args: &mut RoutedEventArgs) {
    use RoutedEvent::*;
    match args.event {
        PointerMoved => hooks.on_pointer_moved(element, args),
        PointerPressed => hooks.on_pointer_pressed(element, args),
        PointerReleased => hooks.on_pointer_released(element, args),
        PointerWheelChanged => hooks.on_pointer_wheel_changed(element, args),
        PointerEntered => hooks.on_pointer_entered(element, args),
        PointerExited => hooks.on_pointer_exited(element, args),
        MouseRightButtonDown => hooks.on_mouse_right_button_down(element, args),
        MouseRightButtonUp => hooks.on_mouse_right_button_up(element, args),
        Tapped => hooks.on_tapped(element, args),
        RightTapped => hooks.on_right_tapped(element, args),
        KeyDown => hooks.on_key_down(element, args),
        KeyUp => hooks.on_key_up(element, args),
        GotFocus => hooks.on_got_focus(element, args),
        LostFocus => hooks.on_lost_focus(element, args),
        TextInput => hooks.on_text_input(element, args),
        // never raised; their factories are absent
        TextInputStart | TextInputUpdate => {}
    }
}

fn pointer_position(payload: &dyn NativePayload) -> Vec2 {
    // touch payloads report coordinates on the first touch point
    let x = payload
        .number("clientX")
        .or_else(|| payload.number("touches.0.clientX"))
        .unwrap_or(0.0);
    let y = payload
        .number("clientY")
        .or_else(|| payload.number("touches.0.clientY"))
        .unwrap_or(0.0);
    Vec2 {
        x: x as f32,
        y: y as f32,
    }
}

fn modifiers_from_payload(payload: &dyn NativePayload) -> Modifiers {
    Modifiers {
        shift: payload.flag("shiftKey"),
        ctrl: payload.flag("ctrlKey"),
        alt: payload.flag("altKey"),
        meta: payload.flag("metaKey"),
    }
}

fn pointer_from_payload(payload: &dyn NativePayload) -> PointerEvent {
    let kind = if payload.event_name().starts_with("touch") {
        PointerKind::Touch
    } else {
        PointerKind::Mouse
    };
    PointerEvent {
        kind,
        position: pointer_position(payload),
        buttons: crate::registry::buttons_bitmask(payload).clamp(0, u8::MAX as i64) as u8,
        button: None,
        modifiers: modifiers_from_payload(payload),
        click_count: 0,
    }
}
