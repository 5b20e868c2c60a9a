//! DOM event wiring for both scenes.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys as web;

use scene_core::expression::{Emotion, Palette};
use scene_core::rig::CameraRig;
use scene_core::store::Store;

use crate::face::FaceUi;
use crate::input::{self, MouseState};
use crate::dom;

pub struct TreeWiring {
    pub canvas: web::HtmlCanvasElement,
    pub store: Rc<RefCell<Store>>,
    pub rig: Rc<RefCell<CameraRig>>,
}

pub fn wire_tree_inputs(w: TreeWiring) {
    let drag_origin: Rc<RefCell<Option<Vec2>>> = Rc::new(RefCell::new(None));

    // pointerdown: begin orbit drag
    {
        let origin = drag_origin.clone();
        let rig = w.rig.clone();
        let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
            let (px, _) = input::pointer_window_px(&ev);
            *origin.borrow_mut() = Some(px);
            rig.borrow_mut().begin_drag();
            ev.prevent_default();
        }) as Box<dyn FnMut(_)>);
        let _ = w
            .canvas
            .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // pointermove: drag deltas normalised by the window size
    {
        let origin = drag_origin.clone();
        let rig = w.rig.clone();
        let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
            let Some(start) = *origin.borrow() else { return };
            let (px, window_size) = input::pointer_window_px(&ev);
            let delta = (px - start) / window_size;
            rig.borrow_mut().drag_to(delta.x, delta.y);
        }) as Box<dyn FnMut(_)>);
        let _ = w
            .canvas
            .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // pointerup anywhere and pointerleave both end the drag
    for (target, event) in [
        (
            web::window().map(|win| win.unchecked_into::<web::EventTarget>()),
            "pointerup",
        ),
        (
            Some(w.canvas.clone().unchecked_into::<web::EventTarget>()),
            "pointerleave",
        ),
    ] {
        let Some(target) = target else { continue };
        let origin = drag_origin.clone();
        let rig = w.rig.clone();
        let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |_ev: web::PointerEvent| {
            *origin.borrow_mut() = None;
            rig.borrow_mut().end_drag();
        }) as Box<dyn FnMut(_)>);
        let _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // wheel zoom; passive:false so preventDefault sticks
    {
        let rig = w.rig.clone();
        let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::WheelEvent| {
            rig.borrow_mut().zoom(ev.delta_y() as f32);
            ev.prevent_default();
        }) as Box<dyn FnMut(_)>);
        let options = web::AddEventListenerOptions::new();
        options.set_passive(false);
        let _ = w.canvas.add_event_listener_with_callback_and_add_event_listener_options(
            "wheel",
            closure.as_ref().unchecked_ref(),
            &options,
        );
        closure.forget();
    }

    // Manual-override sliders: live only while no hand is detected
    if let Some(document) = dom::window_document() {
        {
            let store = w.store.clone();
            dom::add_input_listener(&document, "progress-slider", move |value| {
                let Ok(v) = value.parse::<f32>() else { return };
                let mut store = store.borrow_mut();
                if !store.is_hand_detected() {
                    store.set_formation_progress(v);
                }
            });
        }
        {
            let store = w.store.clone();
            dom::add_input_listener(&document, "hand-x", move |value| {
                let Ok(v) = value.parse::<f32>() else { return };
                let mut store = store.borrow_mut();
                if !store.is_hand_detected() {
                    let y = store.hand_position().y;
                    store.set_hand_position(v, y);
                }
            });
        }
        {
            let store = w.store.clone();
            dom::add_input_listener(&document, "hand-y", move |value| {
                let Ok(v) = value.parse::<f32>() else { return };
                let mut store = store.borrow_mut();
                if !store.is_hand_detected() {
                    let x = store.hand_position().x;
                    store.set_hand_position(x, v);
                }
            });
        }
    }
}

pub struct FaceWiring {
    pub ui: Rc<RefCell<FaceUi>>,
    pub mouse: Rc<RefCell<MouseState>>,
}

pub fn wire_face_inputs(w: FaceWiring) {
    let Some(window) = web::window() else { return };

    // Pointer position in NDC drives head pose and expression modulation
    {
        let mouse = w.mouse.clone();
        let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::MouseEvent| {
            mouse.borrow_mut().ndc = input::pointer_window_ndc(&ev);
        }) as Box<dyn FnMut(_)>);
        let _ =
            window.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
        closure.forget();
    }
    for (event, down) in [("pointerdown", true), ("pointerup", false)] {
        let mouse = w.mouse.clone();
        let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |_ev: web::MouseEvent| {
            mouse.borrow_mut().down = down;
        }) as Box<dyn FnMut(_)>);
        let _ = window.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    let Some(document) = dom::window_document() else { return };
    {
        let ui = w.ui.clone();
        dom::add_input_listener(&document, "emotion-select", move |value| {
            // Unknown ids fall back to neutral inside from_id
            ui.borrow_mut().emotion = Emotion::from_id(&value);
        });
    }
    {
        let ui = w.ui.clone();
        dom::add_input_listener(&document, "color-select", move |value| {
            // Unknown palettes leave the current colours alone
            if let Some(palette) = Palette::from_id(&value) {
                ui.borrow_mut().pending_palette = Some(palette);
            }
        });
    }
    {
        let ui = w.ui.clone();
        dom::add_input_listener(&document, "intensity-range", move |value| {
            if let Ok(v) = value.parse::<f32>() {
                ui.borrow_mut().intensity = v.clamp(0.0, 2.0);
            }
        });
    }
    {
        let ui = w.ui.clone();
        dom::add_input_listener(&document, "speed-range", move |value| {
            if let Ok(v) = value.parse::<f32>() {
                ui.borrow_mut().speed = v.clamp(0.0, 2.0);
            }
        });
    }
}
