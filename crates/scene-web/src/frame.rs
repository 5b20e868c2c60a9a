use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use web_sys as web;

/// Drive a frame callback off requestAnimationFrame until it returns false.
pub fn start_loop(mut frame: impl FnMut() -> bool + 'static) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if !frame() {
            // Drop the closure so the loop can be collected
            tick_clone.borrow_mut().take();
            return;
        }
        if let Some(w) = web::window() {
            let _ = w.request_animation_frame(
                tick_clone
                    .borrow()
                    .as_ref()
                    .unwrap()
                    .as_ref()
                    .unchecked_ref(),
            );
        }
    }) as Box<dyn FnMut()>));
    if let Some(w) = web::window() {
        let _ = w.request_animation_frame(tick.borrow().as_ref().unwrap().as_ref().unchecked_ref());
    }
}

/// Await the next display frame. Used by the detection loop so the tracker
/// ticks at most once per refresh without blocking the render loop.
pub async fn next_animation_frame() -> Result<(), JsValue> {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        if let Some(w) = web::window() {
            let _ = w.request_animation_frame(&resolve);
        }
    });
    wasm_bindgen_futures::JsFuture::from(promise).await?;
    Ok(())
}
