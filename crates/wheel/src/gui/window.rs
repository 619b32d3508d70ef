use drum::tracker::{CaptureGuard, PointerCapture, PointerKind};
use gdk4 as gdk;
use gtk::prelude::*;
use gtk4 as gtk;

/// Grabbing cursor on the drawing area for the length of a mouse drag.
/// GTK's implicit grab already routes motion to the gesture once the
/// pointer leaves the widget.
pub struct CursorCapture(gtk::DrawingArea);

impl CursorCapture {
    pub fn acquire(area: &gtk::DrawingArea) -> CaptureGuard {
        area.set_cursor_from_name(Some("grabbing"));
        CaptureGuard::new(Box::new(Self(area.clone())))
    }
}

impl PointerCapture for CursorCapture {
    fn release(&mut self) {
        self.0.set_cursor(None::<&gdk::Cursor>);
    }
}

pub fn pointer_kind(controller: &impl IsA<gtk::EventController>) -> PointerKind {
    let touch = controller
        .current_event_device()
        .is_some_and(|d| d.source() == gdk::InputSource::Touchscreen);
    if touch {
        PointerKind::Touch
    } else {
        PointerKind::Mouse
    }
}

pub fn event_time_ms(controller: &impl IsA<gtk::EventController>) -> f64 {
    controller.current_event_time() as f64
}

/// Current frame clock time. Animation timestamps must come from here so
/// they share a time base with the tick callback.
pub fn frame_time_ms(widget: &impl IsA<gtk::Widget>) -> f64 {
    widget
        .frame_clock()
        .map(|clock| clock.frame_time() as f64 / 1000.0)
        .unwrap_or_default()
}

/// Offset of a widget-space point from the widget's centre.
pub fn from_center(widget: &impl IsA<gtk::Widget>, x: f64, y: f64) -> (f64, f64) {
    (
        x - widget.width() as f64 / 2.0,
        y - widget.height() as f64 / 2.0,
    )
}
