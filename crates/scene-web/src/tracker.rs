//! Webcam acquisition and the hand-detection loop.
//!
//! The landmark detector itself is an external collaborator: the host page
//! exposes `window.handDetector` with an `estimateHands(video)` method
//! resolving to an array of hands, each carrying 21 `{x, y}` keypoints in
//! video pixels. Everything here treats it as a black box.
//!
//! Failure policy (all paths leave the scene running):
//! - camera denied or absent   -> loop never starts, manual override mode
//! - detector missing          -> same
//! - a single estimate rejects -> swallowed, next frame tries again
//! - teardown mid-await        -> the mounted flag discards the result

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::Vec2;
use js_sys::Reflect;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

use scene_core::constants::{VIDEO_HEIGHT, VIDEO_WIDTH};
use scene_core::gesture::{GestureMapper, HandObservation};
use scene_core::store::Store;

use crate::{dom, frame};

#[derive(Clone)]
pub struct TrackerHandle {
    mounted: Rc<Cell<bool>>,
    stream: Rc<RefCell<Option<web::MediaStream>>>,
}

impl TrackerHandle {
    /// Tear down: no store write may land after this returns, and every
    /// webcam track is stopped.
    pub fn stop(&self) {
        self.mounted.set(false);
        if let Some(stream) = self.stream.borrow_mut().take() {
            stop_tracks(&stream);
        }
    }
}

fn stop_tracks(stream: &web::MediaStream) {
    let tracks = stream.get_tracks();
    for i in 0..tracks.length() {
        if let Ok(track) = tracks.get(i).dyn_into::<web::MediaStreamTrack>() {
            track.stop();
        }
    }
}

pub fn start(document: web::Document, store: Rc<RefCell<Store>>) -> TrackerHandle {
    let handle = TrackerHandle {
        mounted: Rc::new(Cell::new(true)),
        stream: Rc::new(RefCell::new(None)),
    };
    let mounted = handle.mounted.clone();
    let stream_slot = handle.stream.clone();
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(e) = run(document, store, mounted, stream_slot).await {
            log::warn!("[tracker] disabled: {e:?}");
            if let Some(doc) = dom::window_document() {
                dom::hide_element(&doc, "video-preview");
                dom::set_status_text(&doc, "SENSOR STATUS: MANUAL OVERRIDE");
            }
        }
    });
    handle
}

async fn run(
    document: web::Document,
    store: Rc<RefCell<Store>>,
    mounted: Rc<Cell<bool>>,
    stream_slot: Rc<RefCell<Option<web::MediaStream>>>,
) -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let media = window
        .navigator()
        .media_devices()
        .map_err(|e| anyhow::anyhow!("media devices unavailable: {:?}", e))?;

    // Ask for a user-facing 640x480 feed
    let video_constraints = js_sys::Object::new();
    let set = |key: &str, value: &JsValue| {
        let _ = Reflect::set(&video_constraints, &JsValue::from_str(key), value);
    };
    set("width", &JsValue::from_f64(VIDEO_WIDTH as f64));
    set("height", &JsValue::from_f64(VIDEO_HEIGHT as f64));
    set("facingMode", &JsValue::from_str("user"));
    let constraints = web::MediaStreamConstraints::new();
    constraints.set_video(&video_constraints.into());

    let promise = media
        .get_user_media_with_constraints(&constraints)
        .map_err(|e| anyhow::anyhow!("getUserMedia rejected: {:?}", e))?;
    let stream: web::MediaStream = JsFuture::from(promise)
        .await
        .map_err(|e| anyhow::anyhow!("camera denied: {:?}", e))?
        .dyn_into()
        .map_err(|e| anyhow::anyhow!("unexpected stream type: {:?}", e))?;

    if !mounted.get() {
        stop_tracks(&stream);
        return Ok(());
    }
    *stream_slot.borrow_mut() = Some(stream.clone());

    let video: web::HtmlVideoElement = document
        .get_element_by_id("hand-video")
        .ok_or_else(|| anyhow::anyhow!("missing #hand-video"))?
        .dyn_into()
        .map_err(|e| anyhow::anyhow!("#hand-video is not a video element: {:?}", e))?;
    video.set_src_object(Some(&stream));
    await_metadata(&video).await?;
    if !mounted.get() {
        return Ok(());
    }
    let _ = video.play();

    // The detector is created by the page; without it we stay in manual mode
    let detector = Reflect::get(&window, &JsValue::from_str("handDetector"))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    if detector.is_undefined() || detector.is_null() {
        anyhow::bail!("no handDetector on window");
    }
    let estimate: js_sys::Function = Reflect::get(&detector, &JsValue::from_str("estimateHands"))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .dyn_into()
        .map_err(|_| anyhow::anyhow!("handDetector.estimateHands is not a function"))?;

    log::info!("[tracker] detection loop started");
    let mut mapper = GestureMapper::default();
    loop {
        if frame::next_animation_frame().await.is_err() {
            break;
        }
        if !mounted.get() {
            break;
        }
        // HAVE_CURRENT_DATA: a frame is ready for inference
        if video.ready_state() < 2 {
            continue;
        }
        let hands = match estimate_hands(&estimate, &detector, &video).await {
            Ok(hands) => hands,
            // Transient detector errors: try again next frame
            Err(_) => continue,
        };
        // Teardown guard: a late resolution must not touch the store
        if !mounted.get() {
            break;
        }
        mapper.process(
            &mut store.borrow_mut(),
            &hands,
            video.video_width() as f32,
            video.video_height() as f32,
        );
    }
    Ok(())
}

async fn await_metadata(video: &web::HtmlVideoElement) -> anyhow::Result<()> {
    // HAVE_METADATA or later: dimensions are known
    if video.ready_state() >= 1 {
        return Ok(());
    }
    let video = video.clone();
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        video.set_onloadedmetadata(Some(&resolve));
    });
    JsFuture::from(promise)
        .await
        .map_err(|e| anyhow::anyhow!("loadedmetadata failed: {:?}", e))?;
    Ok(())
}

async fn estimate_hands(
    estimate: &js_sys::Function,
    detector: &JsValue,
    video: &web::HtmlVideoElement,
) -> Result<Vec<HandObservation>, JsValue> {
    let promise: js_sys::Promise = estimate.call1(detector, video)?.dyn_into()?;
    let result = JsFuture::from(promise).await?;
    Ok(parse_hands(&result))
}

/// Pull `{keypoints: [{x, y}, ...]}` hands out of the detector result.
/// Anything malformed becomes an empty or short observation, which the
/// mapper treats as "no hand".
fn parse_hands(value: &JsValue) -> Vec<HandObservation> {
    if !js_sys::Array::is_array(value) {
        return Vec::new();
    }
    let hands_array = js_sys::Array::from(value);
    let mut hands = Vec::with_capacity(hands_array.length() as usize);
    for hand in hands_array.iter() {
        let Ok(keypoints_value) = Reflect::get(&hand, &JsValue::from_str("keypoints")) else {
            continue;
        };
        if !js_sys::Array::is_array(&keypoints_value) {
            continue;
        }
        let keypoints_array = js_sys::Array::from(&keypoints_value);
        let mut keypoints = Vec::with_capacity(keypoints_array.length() as usize);
        for kp in keypoints_array.iter() {
            let coord = |key: &str| {
                Reflect::get(&kp, &JsValue::from_str(key))
                    .ok()
                    .and_then(|v| v.as_f64())
                    .unwrap_or(0.0) as f32
            };
            keypoints.push(Vec2::new(coord("x"), coord("y")));
        }
        hands.push(HandObservation { keypoints });
    }
    hands
}
