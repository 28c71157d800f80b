//! The identity-to-dispatcher factory table.
//!
//! Mirrors of one native event feed several identities (`mousedown`
//! feeds both press identities), and one identity can listen on several
//! native names (`mousemove` + `touchmove`). The table below is fixed at
//! compile time; the [`EventProfile`] chosen at startup selects which of
//! the two event-name universes is live.

use std::rc::Rc;

use crate::dom_api::NativePayload;
use crate::element::{PointerOptions, UiElement};
use crate::input::PointerButton;
use crate::manager::{DomEventManager, TargetResolver};
use crate::routed::RoutedEvent;

/// Which event-name universe the host application runs under. Chosen
/// once at startup and carried by the element's `EventContext`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventProfile {
    /// Pointer-flavored identities; `contextmenu` raises `RightTapped`.
    #[default]
    Pointer,
    /// Legacy mouse identities; the right button is first-class and
    /// `contextmenu` raises `MouseRightButtonUp`.
    Mouse,
}

type ManagerFactory = fn(&UiElement) -> DomEventManager;

/// Fixed, total mapping from identity to dispatcher factory. `None`
/// marks an identity with no native counterpart under the given profile;
/// hooking such an identity up is a silent no-op, not an error.
pub(crate) fn manager_factory(profile: EventProfile, event: RoutedEvent) -> Option<ManagerFactory> {
    use EventProfile::*;
    use RoutedEvent::*;
    match (profile, event) {
        (_, PointerMoved) => Some(pointer_moved),
        (_, PointerPressed) => Some(pointer_pressed),
        (_, PointerReleased) => Some(pointer_released),
        (_, PointerWheelChanged) => Some(pointer_wheel),
        (_, PointerEntered) => Some(pointer_entered),
        (_, PointerExited) => Some(pointer_exited),
        (Mouse, MouseRightButtonDown) => Some(mouse_right_button_down),
        (Mouse, MouseRightButtonUp) => Some(mouse_right_button_up),
        (_, Tapped) => Some(tapped),
        (Pointer, RightTapped) => Some(right_tapped),
        (_, KeyDown) => Some(key_down),
        (_, KeyUp) => Some(key_up),
        (_, GotFocus) => Some(got_focus),
        (_, LostFocus) => Some(lost_focus),
        (_, TextInput) => Some(text_input),
        (_, TextInputStart) | (_, TextInputUpdate) => None,
        (Pointer, MouseRightButtonDown)
        | (Pointer, MouseRightButtonUp)
        | (Mouse, RightTapped) => None,
    }
}

pub(crate) fn build_manager(element: &UiElement, event: RoutedEvent) -> Option<Rc<DomEventManager>> {
    manager_factory(element.profile(), event).map(|build| Rc::new(build(element)))
}

/// `buttons` bitmask off the raw payload; absent or malformed values
/// read as 0 (no button).
pub(crate) fn buttons_bitmask(payload: &dyn NativePayload) -> i64 {
    payload.number("buttons").map(|v| v as i64).unwrap_or(0)
}

fn resolver_for(element: &UiElement) -> TargetResolver {
    let weak = element.downgrade();
    Box::new(move || weak.upgrade().and_then(|el| el.node()))
}

fn pointer_moved(element: &UiElement) -> DomEventManager {
    let weak = element.downgrade();
    DomEventManager::new(
        element.surface(),
        resolver_for(element),
        &["mousemove", "touchmove"],
        Rc::new(move |payload| {
            if let Some(el) = weak.upgrade() {
                el.process_pointer_event(
                    RoutedEvent::PointerMoved,
                    None,
                    payload,
                    PointerOptions {
                        prevent_text_selection_when_captured: true,
                        ..Default::default()
                    },
                );
            }
        }),
    )
}

fn pointer_pressed(element: &UiElement) -> DomEventManager {
    let weak = element.downgrade();
    DomEventManager::new(
        element.surface(),
        resolver_for(element),
        &["mousedown", "touchstart"],
        Rc::new(move |payload| {
            let Some(el) = weak.upgrade() else { return };
            // Press semantics must not fire when only the secondary
            // button is down. The gate is "bitmask != 2", not the
            // primary bit: some hosts omit that bit on real presses.
            if buttons_bitmask(payload) != 2 {
                el.process_pointer_event(
                    RoutedEvent::PointerPressed,
                    Some(PointerButton::Primary),
                    payload,
                    PointerOptions {
                        prevent_text_selection_when_captured: true,
                        refresh_click_count: true,
                    },
                );
            }
        }),
    )
}

fn mouse_right_button_down(element: &UiElement) -> DomEventManager {
    let weak = element.downgrade();
    DomEventManager::new(
        element.surface(),
        resolver_for(element),
        &["mousedown", "touchstart"],
        Rc::new(move |payload| {
            let Some(el) = weak.upgrade() else { return };
            // the exact mirror of the press gate
            if buttons_bitmask(payload) == 2 {
                el.process_pointer_event(
                    RoutedEvent::MouseRightButtonDown,
                    Some(PointerButton::Secondary),
                    payload,
                    PointerOptions {
                        prevent_text_selection_when_captured: true,
                        refresh_click_count: true,
                    },
                );
            }
        }),
    )
}

fn pointer_released(element: &UiElement) -> DomEventManager {
    let weak = element.downgrade();
    DomEventManager::new(
        element.surface(),
        resolver_for(element),
        &["mouseup", "touchend"],
        Rc::new(move |payload| {
            if let Some(el) = weak.upgrade() {
                el.process_pointer_event(
                    RoutedEvent::PointerReleased,
                    Some(PointerButton::Primary),
                    payload,
                    PointerOptions::default(),
                );
            }
        }),
    )
    .stop_native_propagation()
}

fn pointer_wheel(element: &UiElement) -> DomEventManager {
    let weak = element.downgrade();
    DomEventManager::new(
        element.surface(),
        resolver_for(element),
        &["wheel"],
        Rc::new(move |payload| {
            if let Some(el) = weak.upgrade() {
                el.process_wheel_event(payload);
            }
        }),
    )
}

fn pointer_entered(element: &UiElement) -> DomEventManager {
    let weak = element.downgrade();
    DomEventManager::new(
        element.surface(),
        resolver_for(element),
        &["mouseenter"],
        Rc::new(move |payload| {
            if let Some(el) = weak.upgrade() {
                el.process_pointer_event(
                    RoutedEvent::PointerEntered,
                    None,
                    payload,
                    PointerOptions::default(),
                );
            }
        }),
    )
}

fn pointer_exited(element: &UiElement) -> DomEventManager {
    let weak = element.downgrade();
    DomEventManager::new(
        element.surface(),
        resolver_for(element),
        &["mouseleave"],
        Rc::new(move |payload| {
            if let Some(el) = weak.upgrade() {
                el.process_pointer_event(
                    RoutedEvent::PointerExited,
                    None,
                    payload,
                    PointerOptions::default(),
                );
            }
        }),
    )
}

fn tapped(element: &UiElement) -> DomEventManager {
    let weak = element.downgrade();
    DomEventManager::new(
        element.surface(),
        resolver_for(element),
        &["mouseup"],
        Rc::new(move |payload| {
            if let Some(el) = weak.upgrade() {
                el.process_pointer_event(
                    RoutedEvent::Tapped,
                    Some(PointerButton::Primary),
                    payload,
                    PointerOptions::default(),
                );
            }
        }),
    )
}

fn right_tapped(element: &UiElement) -> DomEventManager {
    let weak = element.downgrade();
    DomEventManager::new(
        element.surface(),
        resolver_for(element),
        &["contextmenu"],
        Rc::new(move |payload| {
            if let Some(el) = weak.upgrade() {
                el.process_pointer_event(
                    RoutedEvent::RightTapped,
                    Some(PointerButton::Secondary),
                    payload,
                    PointerOptions::default(),
                );
            }
        }),
    )
}

fn mouse_right_button_up(element: &UiElement) -> DomEventManager {
    let weak = element.downgrade();
    DomEventManager::new(
        element.surface(),
        resolver_for(element),
        &["contextmenu"],
        Rc::new(move |payload| {
            if let Some(el) = weak.upgrade() {
                el.process_pointer_event(
                    RoutedEvent::MouseRightButtonUp,
                    Some(PointerButton::Secondary),
                    payload,
                    PointerOptions::default(),
                );
            }
        }),
    )
}

fn key_down(element: &UiElement) -> DomEventManager {
    let weak = element.downgrade();
    DomEventManager::new(
        element.surface(),
        resolver_for(element),
        &["keydown"],
        Rc::new(move |payload| {
            if let Some(el) = weak.upgrade() {
                el.process_key_event(RoutedEvent::KeyDown, payload);
            }
        }),
    )
    .stop_native_propagation()
}

fn key_up(element: &UiElement) -> DomEventManager {
    let weak = element.downgrade();
    DomEventManager::new(
        element.surface(),
        resolver_for(element),
        &["keyup"],
        Rc::new(move |payload| {
            if let Some(el) = weak.upgrade() {
                el.process_key_event(RoutedEvent::KeyUp, payload);
            }
        }),
    )
}

fn got_focus(element: &UiElement) -> DomEventManager {
    let weak = element.downgrade();
    DomEventManager::new(
        element.surface(),
        resolver_for(element),
        &["focusin"],
        Rc::new(move |payload| {
            let _ = payload;
            if let Some(el) = weak.upgrade() {
                el.process_focus_event(RoutedEvent::GotFocus);
            }
        }),
    )
}

fn lost_focus(element: &UiElement) -> DomEventManager {
    let weak = element.downgrade();
    DomEventManager::new(
        element.surface(),
        resolver_for(element),
        &["focusout"],
        Rc::new(move |payload| {
            let _ = payload;
            if let Some(el) = weak.upgrade() {
                el.process_focus_event(RoutedEvent::LostFocus);
            }
        }),
    )
}

fn text_input(element: &UiElement) -> DomEventManager {
    let weak = element.downgrade();
    DomEventManager::new(
        element.surface(),
        resolver_for(element),
        &["input"],
        Rc::new(move |payload| {
            if let Some(el) = weak.upgrade() {
                el.process_text_input(payload);
            }
        }),
    )
}
