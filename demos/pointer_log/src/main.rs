//! Replays a short pointer script against a headless surface and logs
//! what the routed-event bridge makes of it. Run with
//! `RUST_LOG=info cargo run -p pointer_log`.

use std::rc::Rc;

use veneer_core::{
    EventContext, EventPayload, EventProfile, HookMask, RoutedEvent, RoutedEventArgs,
    RoutedHandler, UiElement,
};
use veneer_core::element::EventHooks;
use veneer_platform::headless::{HeadlessSurface, SyntheticPayload};

struct LoggingPane;

impl EventHooks for LoggingPane {
    fn overridden(&self) -> HookMask {
        HookMask::POINTER_ENTERED | HookMask::POINTER_EXITED
    }

    fn on_pointer_entered(&self, _element: &UiElement, _args: &mut RoutedEventArgs) {
        log::info!("pointer entered the pane");
    }

    fn on_pointer_exited(&self, _element: &UiElement, _args: &mut RoutedEventArgs) {
        log::info!("pointer left the pane");
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let profile = match std::env::var("VENEER_PROFILE").ok().as_deref() {
        Some("mouse") => EventProfile::Mouse,
        _ => EventProfile::Pointer,
    };

    let surface = HeadlessSurface::new();
    let pane = UiElement::with_hooks(
        EventContext::new(surface.clone(), profile),
        Rc::new(LoggingPane),
    );

    let on_press: RoutedHandler = Rc::new(|element, args| {
        if let EventPayload::Pointer(p) = &args.payload {
            log::info!(
                "press #{} at ({}, {})",
                p.click_count,
                p.position.x,
                p.position.y
            );
        }
        element.capture_pointer();
    });
    let on_release: RoutedHandler = Rc::new(|element, _args| {
        element.release_pointer_capture();
        log::info!("released");
    });
    pane.add_handler(RoutedEvent::PointerPressed, on_press, false);
    pane.add_handler(RoutedEvent::PointerReleased, on_release, false);

    let node = surface.create_node();
    pane.connect(node);
    log::info!(
        "pane connected; {} native listeners registered",
        surface.total_listeners()
    );

    surface.fire(node, &SyntheticPayload::new("mouseenter"));
    surface.fire(
        node,
        &SyntheticPayload::new("mousedown")
            .with_number("buttons", 1.0)
            .at(40.0, 12.0),
    );
    surface.fire(node, &SyntheticPayload::new("mousemove").at(48.0, 14.0));
    surface.fire(node, &SyntheticPayload::new("mouseup").at(48.0, 14.0));
    // double press at one spot bumps the click count
    surface.fire(
        node,
        &SyntheticPayload::new("mousedown")
            .with_number("buttons", 1.0)
            .at(48.0, 14.0),
    );
    surface.fire(
        node,
        &SyntheticPayload::new("mousedown")
            .with_number("buttons", 1.0)
            .at(48.0, 14.0),
    );
    surface.fire(node, &SyntheticPayload::new("mouseleave"));

    pane.disconnect();
    log::info!(
        "pane disconnected; {} native listeners remain",
        surface.total_listeners()
    );
    Ok(())
}
