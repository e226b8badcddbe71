use crate::input::{self, drag_fraction, wheel_notches, PointerState};
use ar_core::camera::OrbitCamera;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Shared state the orbit handlers read and write.
#[derive(Clone)]
pub struct OrbitWiring {
    pub canvas: web::HtmlCanvasElement,
    pub camera: Rc<RefCell<OrbitCamera>>,
    pub pointer: Rc<RefCell<PointerState>>,
    /// Orbit input is ignored while an AR session owns the view.
    pub presenting: Rc<Cell<bool>>,
}

pub fn wire_orbit_handlers(w: OrbitWiring) {
    wire_pointerdown(&w);
    wire_pointermove(&w);
    wire_pointerup(&w);
    wire_wheel(&w);
    wire_dblclick(&w);
}

fn wire_pointerdown(w: &OrbitWiring) {
    let w = w.clone();
    let canvas_for_listener = w.canvas.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        if w.presenting.get() {
            return;
        }
        {
            let mut p = w.pointer.borrow_mut();
            p.down = true;
            p.pointer_id = ev.pointer_id();
            p.last_px = input::pointer_css(&ev, &w.canvas);
        }
        _ = w.canvas.set_pointer_capture(ev.pointer_id());
        ev.prevent_default();
    }) as Box<dyn FnMut(_)>);
    _ = canvas_for_listener
        .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_pointermove(w: &OrbitWiring) {
    let w = w.clone();
    let canvas_for_listener = w.canvas.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let mut p = w.pointer.borrow_mut();
        if !p.down || p.pointer_id != ev.pointer_id() || w.presenting.get() {
            return;
        }
        let cur = input::pointer_css(&ev, &w.canvas);
        let width = w.canvas.get_bounding_client_rect().width() as f32;
        let d = drag_fraction(p.last_px, cur, width);
        p.last_px = cur;
        drop(p);
        w.camera.borrow_mut().orbit(d.x, d.y);
    }) as Box<dyn FnMut(_)>);
    _ = canvas_for_listener
        .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_pointerup(w: &OrbitWiring) {
    for event in ["pointerup", "pointercancel"] {
        let w = w.clone();
        let canvas_for_listener = w.canvas.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
            let mut p = w.pointer.borrow_mut();
            if p.pointer_id == ev.pointer_id() {
                p.down = false;
            }
            _ = w.canvas.release_pointer_capture(ev.pointer_id());
        }) as Box<dyn FnMut(_)>);
        _ = canvas_for_listener
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

fn wire_wheel(w: &OrbitWiring) {
    let w = w.clone();
    let canvas_for_listener = w.canvas.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::WheelEvent| {
        if w.presenting.get() {
            return;
        }
        let notches = wheel_notches(ev.delta_y() as f32, ev.delta_mode());
        w.camera.borrow_mut().zoom(notches);
        ev.prevent_default();
    }) as Box<dyn FnMut(_)>);
    _ = canvas_for_listener
        .add_event_listener_with_callback("wheel", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_dblclick(w: &OrbitWiring) {
    let w = w.clone();
    let canvas_for_listener = w.canvas.clone();
    let closure = Closure::wrap(Box::new(move |_ev: web::MouseEvent| {
        if !w.presenting.get() {
            log::debug!("[orbit] reset");
            w.camera.borrow_mut().reset();
        }
    }) as Box<dyn FnMut(_)>);
    _ = canvas_for_listener
        .add_event_listener_with_callback("dblclick", closure.as_ref().unchecked_ref());
    closure.forget();
}
