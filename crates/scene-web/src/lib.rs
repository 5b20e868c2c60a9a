#![cfg(target_arch = "wasm32")]
//! WASM entry point. Picks the scene from the canvas' `data-scene` attribute
//! (or a `#face` URL hash) and hands off to the scene driver.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod dom;
mod events;
mod face;
mod frame;
mod input;
mod render;
mod tracker;
mod tree;

fn wire_canvas_resize(canvas: &web::HtmlCanvasElement) {
    dom::sync_canvas_backing_size(canvas);
    let canvas_resize = canvas.clone();
    let resize_closure = Closure::wrap(Box::new(move || {
        dom::sync_canvas_backing_size(&canvas_resize);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref());
    }
    resize_closure.forget();
}

fn pick_scene(canvas: &web::HtmlCanvasElement, window: &web::Window) -> String {
    if let Some(scene) = canvas.get_attribute("data-scene") {
        return scene;
    }
    if let Ok(hash) = window.location().hash() {
        if hash == "#face" {
            return "face".into();
        }
    }
    "tree".into()
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("scene-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id("app-canvas")
        .ok_or_else(|| anyhow::anyhow!("missing #app-canvas"))?
        .dyn_into()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    // Keep the backing store in sync with CSS size * devicePixelRatio
    wire_canvas_resize(&canvas);

    match pick_scene(&canvas, &window).as_str() {
        "face" => face::run(canvas, document).await,
        _ => tree::run(canvas, document).await,
    }
}
