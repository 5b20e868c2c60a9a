use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// Wire an `input` listener on a select/range control, handing the handler
/// the control's current string value. Missing elements are ignored.
pub fn add_input_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut(String) + 'static,
) {
    if let Some(el) = document.get_element_by_id(element_id) {
        let closure =
            wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::Event| {
                let Some(target) = ev.target() else { return };
                if let Some(input) = target.dyn_ref::<web::HtmlInputElement>() {
                    handler(input.value());
                } else if let Some(select) = target.dyn_ref::<web::HtmlSelectElement>() {
                    handler(select.value());
                }
            }) as Box<dyn FnMut(_)>);
        let _ = el.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

/// The status line is the only user-visible error channel.
pub fn set_status_text(document: &web::Document, text: &str) {
    if let Some(el) = document.get_element_by_id("sensor-status") {
        el.set_text_content(Some(text));
    }
}

#[inline]
pub fn hide_element(document: &web::Document, element_id: &str) {
    if let Some(el) = document.get_element_by_id(element_id) {
        let _ = el.set_attribute("style", "display:none");
    }
}

pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) {
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio();
        let rect = canvas.get_bounding_client_rect();
        let w_px = (rect.width() * dpr) as u32;
        let h_px = (rect.height() * dpr) as u32;
        canvas.set_width(w_px.max(1));
        canvas.set_height(h_px.max(1));
    }
}
