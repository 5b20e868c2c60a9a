use glam::Vec2;
use web_sys as web;

/// Pointer state shared between the event closures and the frame loop.
#[derive(Default, Clone, Copy)]
pub struct MouseState {
    /// NDC position, y up-positive.
    pub ndc: Vec2,
    pub down: bool,
}

/// Map a pointer event to NDC against the window, x right / y up positive.
#[inline]
pub fn pointer_window_ndc(ev: &web::MouseEvent) -> Vec2 {
    let Some(window) = web::window() else {
        return Vec2::ZERO;
    };
    let w = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(1.0)
        .max(1.0) as f32;
    let h = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(1.0)
        .max(1.0) as f32;
    Vec2::new(
        (ev.client_x() as f32 / w) * 2.0 - 1.0,
        -(ev.client_y() as f32 / h) * 2.0 + 1.0,
    )
}

/// Pointer position in window pixels plus the window size, for normalising
/// drag deltas.
#[inline]
pub fn pointer_window_px(ev: &web::MouseEvent) -> (Vec2, Vec2) {
    let (w, h) = web::window()
        .map(|window| {
            (
                window
                    .inner_width()
                    .ok()
                    .and_then(|v| v.as_f64())
                    .unwrap_or(1.0)
                    .max(1.0) as f32,
                window
                    .inner_height()
                    .ok()
                    .and_then(|v| v.as_f64())
                    .unwrap_or(1.0)
                    .max(1.0) as f32,
            )
        })
        .unwrap_or((1.0, 1.0));
    (
        Vec2::new(ev.client_x() as f32, ev.client_y() as f32),
        Vec2::new(w, h),
    )
}
