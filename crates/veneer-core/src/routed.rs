//! Routed-event identities and the values handlers receive.

use std::rc::Rc;

use crate::element::UiElement;
use crate::input::{KeyEvent, PointerEvent, TextInputEvent, WheelEvent};

/// Identity of one logical routed event.
///
/// The set is fixed at compile time and covers both event-name
/// universes; which identities actually reach the DOM is decided by the
/// active [`EventProfile`](crate::registry::EventProfile).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoutedEvent {
    PointerMoved,
    PointerPressed,
    PointerReleased,
    PointerWheelChanged,
    PointerEntered,
    PointerExited,
    MouseRightButtonDown,
    MouseRightButtonUp,
    Tapped,
    RightTapped,
    KeyDown,
    KeyUp,
    GotFocus,
    LostFocus,
    TextInput,
    TextInputStart,
    TextInputUpdate,
}

impl RoutedEvent {
    pub const ALL: [RoutedEvent; 17] = [
        RoutedEvent::PointerMoved,
        RoutedEvent::PointerPressed,
        RoutedEvent::PointerReleased,
        RoutedEvent::PointerWheelChanged,
        RoutedEvent::PointerEntered,
        RoutedEvent::PointerExited,
        RoutedEvent::MouseRightButtonDown,
        RoutedEvent::MouseRightButtonUp,
        RoutedEvent::Tapped,
        RoutedEvent::RightTapped,
        RoutedEvent::KeyDown,
        RoutedEvent::KeyUp,
        RoutedEvent::GotFocus,
        RoutedEvent::LostFocus,
        RoutedEvent::TextInput,
        RoutedEvent::TextInputStart,
        RoutedEvent::TextInputUpdate,
    ];

    /// The override bit an element type sets when it implements the
    /// matching `on_*` hook.
    pub fn hook_bit(self) -> HookMask {
        match self {
            RoutedEvent::PointerMoved => HookMask::POINTER_MOVED,
            RoutedEvent::PointerPressed => HookMask::POINTER_PRESSED,
            RoutedEvent::PointerReleased => HookMask::POINTER_RELEASED,
            RoutedEvent::PointerWheelChanged => HookMask::POINTER_WHEEL_CHANGED,
            RoutedEvent::PointerEntered => HookMask::POINTER_ENTERED,
            RoutedEvent::PointerExited => HookMask::POINTER_EXITED,
            RoutedEvent::MouseRightButtonDown => HookMask::MOUSE_RIGHT_BUTTON_DOWN,
            RoutedEvent::MouseRightButtonUp => HookMask::MOUSE_RIGHT_BUTTON_UP,
            RoutedEvent::Tapped => HookMask::TAPPED,
            RoutedEvent::RightTapped => HookMask::RIGHT_TAPPED,
            RoutedEvent::KeyDown => HookMask::KEY_DOWN,
            RoutedEvent::KeyUp => HookMask::KEY_UP,
            RoutedEvent::GotFocus => HookMask::GOT_FOCUS,
            RoutedEvent::LostFocus => HookMask::LOST_FOCUS,
            RoutedEvent::TextInput => HookMask::TEXT_INPUT,
            RoutedEvent::TextInputStart => HookMask::TEXT_INPUT_START,
            RoutedEvent::TextInputUpdate => HookMask::TEXT_INPUT_UPDATE,
        }
    }
}

bitflags::bitflags! {
    /// One bit per routed event an element type can override.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct HookMask: u32 {
        const POINTER_MOVED = 1 << 0;
        const POINTER_PRESSED = 1 << 1;
        const POINTER_RELEASED = 1 << 2;
        const POINTER_WHEEL_CHANGED = 1 << 3;
        const POINTER_ENTERED = 1 << 4;
        const POINTER_EXITED = 1 << 5;
        const MOUSE_RIGHT_BUTTON_DOWN = 1 << 6;
        const MOUSE_RIGHT_BUTTON_UP = 1 << 7;
        const TAPPED = 1 << 8;
        const RIGHT_TAPPED = 1 << 9;
        const KEY_DOWN = 1 << 10;
        const KEY_UP = 1 << 11;
        const GOT_FOCUS = 1 << 12;
        const LOST_FOCUS = 1 << 13;
        const TEXT_INPUT = 1 << 14;
        const TEXT_INPUT_START = 1 << 15;
        const TEXT_INPUT_UPDATE = 1 << 16;
    }
}

/// Semantic content of a routed event, one variant per payload family.
#[derive(Clone, Debug)]
pub enum EventPayload {
    Pointer(PointerEvent),
    Wheel(WheelEvent),
    Key(KeyEvent),
    Text(TextInputEvent),
    Focus,
}

#[derive(Clone, Debug)]
pub struct RoutedEventArgs {
    pub event: RoutedEvent,
    pub payload: EventPayload,
    /// Set by a handler to stop the remaining handlers in the chain,
    /// except those registered with `handled_events_too`.
    pub handled: bool,
}

impl RoutedEventArgs {
    pub fn new(event: RoutedEvent, payload: EventPayload) -> Self {
        Self {
            event,
            payload,
            handled: false,
        }
    }
}

pub type RoutedHandler = Rc<dyn Fn(&UiElement, &mut RoutedEventArgs)>;
