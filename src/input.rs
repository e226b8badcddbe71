use ar_core::input::coord_from_gamepad_axes;
use glam::Vec2;
use web_sys as web;

#[derive(Default, Clone, Copy)]
pub struct PointerState {
    pub down: bool,
    pub pointer_id: i32,
    pub last_px: Vec2,
}

/// Drag between two pointer positions as a fraction of the canvas width on
/// both axes, so a diagonal drag orbits evenly.
#[inline]
pub fn drag_fraction(prev_px: Vec2, cur_px: Vec2, width: f32) -> Vec2 {
    if width <= 0.0 {
        return Vec2::ZERO;
    }
    (cur_px - prev_px) / width
}

/// Wheel delta in zoom notches for `WheelEvent.deltaMode` 0 (pixels), 1
/// (lines) or 2 (pages).
#[inline]
pub fn wheel_notches(delta_y: f32, delta_mode: u32) -> f32 {
    match delta_mode {
        0 => delta_y / crate::constants::WHEEL_PIXELS_PER_NOTCH,
        1 => delta_y / crate::constants::WHEEL_LINES_PER_NOTCH,
        _ => delta_y,
    }
}

/// Screen coordinate of a transient touch from its gamepad axes.
#[inline]
pub fn touch_coord(axes: &[f64]) -> Option<Vec2> {
    match axes {
        [x, y, ..] => Some(coord_from_gamepad_axes([*x as f32, *y as f32])),
        _ => None,
    }
}

#[inline]
pub fn pointer_css(ev: &web::PointerEvent, canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    Vec2::new(
        ev.client_x() as f32 - rect.left() as f32,
        ev.client_y() as f32 - rect.top() as f32,
    )
}
