use crate::render::OrbitCamera;
use leptos::{batch, create_signal, ReadSignal, SignalGetUntracked, SignalSet, WriteSignal};
use std::cell::RefCell;
use web_sys::{MouseEvent, WheelEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Rotate,
    Pan,
}

impl DragMode {
    /// Left button orbits; right button or shift+left pans
    #[must_use]
    pub fn for_button(button: i16, shift: bool) -> Option<Self> {
        match (button, shift) {
            (0, false) => Some(DragMode::Rotate),
            (0, true) | (2, _) => Some(DragMode::Pan),
            _ => None,
        }
    }
}

#[derive(Clone, Copy)]
pub struct OrbitSignals {
    pub drag_mode: ReadSignal<Option<DragMode>>,
    pub set_drag_mode: WriteSignal<Option<DragMode>>,
    pub last_mouse_pos: ReadSignal<(f64, f64)>,
    pub set_last_mouse_pos: WriteSignal<(f64, f64)>,
}

#[must_use]
pub fn create_orbit_signals() -> OrbitSignals {
    let (drag_mode, set_drag_mode) = create_signal(None);
    let (last_mouse_pos, set_last_mouse_pos) = create_signal((0.0, 0.0));

    OrbitSignals {
        drag_mode,
        set_drag_mode,
        last_mouse_pos,
        set_last_mouse_pos,
    }
}

pub fn handle_drag_start(ev: &MouseEvent, signals: &OrbitSignals) {
    let Some(mode) = DragMode::for_button(ev.button(), ev.shift_key()) else { return };
    batch(move || {
        signals.set_drag_mode.set(Some(mode));
        signals
            .set_last_mouse_pos
            .set((f64::from(ev.offset_x()), f64::from(ev.offset_y())));
    });
}

pub fn handle_drag_move(
    x: f64,
    y: f64,
    viewport_height: f64,
    signals: &OrbitSignals,
    camera: &RefCell<OrbitCamera>,
) {
    let Some(mode) = signals.drag_mode.get_untracked() else { return };

    let (last_x, last_y) = signals.last_mouse_pos.get_untracked();
    #[allow(clippy::cast_possible_truncation)]
    let (dx, dy) = ((x - last_x) as f32, (y - last_y) as f32);

    let mut camera = camera.borrow_mut();
    match mode {
        DragMode::Rotate => camera.rotate(dx, dy),
        #[allow(clippy::cast_possible_truncation)]
        DragMode::Pan => camera.pan(dx, dy, viewport_height as f32),
    }
    signals.set_last_mouse_pos.set((x, y));
}

pub fn handle_drag_end(signals: &OrbitSignals) {
    signals.set_drag_mode.set(None);
}

pub fn handle_zoom(ev: &WheelEvent, camera: &RefCell<OrbitCamera>) {
    #[allow(clippy::cast_possible_truncation)]
    let delta = ev.delta_y() as f32;
    camera.borrow_mut().zoom(delta);
}
