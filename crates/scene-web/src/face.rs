//! The expressive face scene: emotion/palette UI, pointer-driven head pose,
//! per-frame parametric mouth and brow rebuilds over the aurora sphere.

use std::cell::RefCell;
use std::rc::Rc;

use glam::{Mat4, Vec3};
use instant::Instant;
use rand::prelude::*;
use web_sys as web;

use scene_core::constants::{DUST_COUNT, DUST_EXTENT};
use scene_core::expression::{Emotion, ExpressionState, FaceInput, Palette, TearFrame};
use scene_core::face_geometry::{
    brow_curve, mouth_curve, nose_curves, sweep_tube, BrowSide, TUBE_RADIUS, TUBE_RING_SEGMENTS,
};
use scene_core::mesh::uv_sphere;
use scene_core::sampling::scatter_box;

use crate::input::MouseState;
use crate::render::aurora::AuroraPass;
use crate::render::dust::DustPass;
use crate::render::post::BloomStack;
use crate::render::targets::SceneTargets;
use crate::render::tubes::{upload_mesh, DynamicMesh, FeaturePipeline, FeatureSlot, MeshBuffers};
use crate::render::{init_gpu, CameraBinding, GpuContext};
use crate::{events, frame};

const CAMERA_EYE: Vec3 = Vec3::new(0.0, 0.0, 5.0);
const EYE_X: f32 = 0.25;
const EYE_Y: f32 = 0.15;
const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const TEAR_TINT: [f32; 3] = [0.667, 0.8, 1.0];

/// UI-driven controls, written by the event closures and read per frame.
pub struct FaceUi {
    pub emotion: Emotion,
    pub intensity: f32,
    pub speed: f32,
    pub pending_palette: Option<Palette>,
}

impl Default for FaceUi {
    fn default() -> Self {
        Self {
            emotion: Emotion::Happy,
            intensity: 1.0,
            speed: 1.0,
            pending_palette: None,
        }
    }
}

struct FaceRenderer {
    gpu: GpuContext<'static>,
    targets: SceneTargets,
    bloom: BloomStack,
    camera: CameraBinding,
    aurora: AuroraPass,
    features: FeaturePipeline,
    dust: DustPass,

    mouth: DynamicMesh,
    brow_left: DynamicMesh,
    brow_right: DynamicMesh,
    nose: Vec<MeshBuffers>,
    eye_mesh: MeshBuffers,
    tear_mesh: MeshBuffers,

    face_slot: FeatureSlot,
    eye_slots: [FeatureSlot; 2],
    tear_slots: [FeatureSlot; 2],
}

struct FaceScene {
    ui: Rc<RefCell<FaceUi>>,
    mouse: Rc<RefCell<MouseState>>,
    state: ExpressionState,
    rng: StdRng,
    renderer: Option<FaceRenderer>,
    canvas: web::HtmlCanvasElement,
    last_instant: Instant,
    clock: f32,
    tears: Option<TearFrame>,
}

impl FaceScene {
    fn frame(&mut self) -> bool {
        let now = Instant::now();
        let dt = (now - self.last_instant).as_secs_f32();
        self.last_instant = now;

        let (emotion, intensity, speed, palette) = {
            let mut ui = self.ui.borrow_mut();
            (
                ui.emotion,
                ui.intensity,
                ui.speed,
                ui.pending_palette.take(),
            )
        };
        // The user speed control stretches the scene clock itself
        self.clock += dt * speed;

        let input = {
            let mouse = self.mouse.borrow();
            FaceInput {
                mouse: mouse.ndc,
                pressed: mouse.down,
            }
        };

        let face = self
            .state
            .advance(emotion, input, intensity, self.clock, &mut self.rng);
        self.tears = face.tears;

        let Some(renderer) = &mut self.renderer else {
            return true;
        };

        if let Some(palette) = palette {
            renderer.aurora.set_palette(palette.colors());
        }

        let width = self.canvas.width();
        let height = self.canvas.height();
        if renderer.gpu.resize_if_needed(width, height) {
            renderer.targets = SceneTargets::new(&renderer.gpu.device, width, height);
            renderer.bloom.rebuild(&renderer.gpu.device, &renderer.targets);
        }

        // Rebuild the dynamic features into their inactive buffer slots
        let mouth = mouth_curve(face.openness, face.smile);
        match sweep_tube(&mouth, TUBE_RADIUS, TUBE_RING_SEGMENTS) {
            Ok(mesh) => renderer.mouth.upload(&renderer.gpu.device, "mouth", &mesh),
            Err(e) => log::error!("mouth rebuild failed: {e}"),
        }
        for (side, slot) in [
            (BrowSide::Left, &mut renderer.brow_left),
            (BrowSide::Right, &mut renderer.brow_right),
        ] {
            let curve = brow_curve(side, face.brow_tilt, face.brow_lift);
            match sweep_tube(&curve, TUBE_RADIUS, TUBE_RING_SEGMENTS) {
                Ok(mesh) => slot.upload(&renderer.gpu.device, "brow", &mesh),
                Err(e) => log::error!("brow rebuild failed: {e}"),
            }
        }

        // Head group: bob + pointer-tracked rotation; features ride inside
        let group = Mat4::from_translation(Vec3::new(0.0, face.body_y, 0.0))
            * Mat4::from_rotation_x(face.head_rotation.x)
            * Mat4::from_rotation_y(face.head_rotation.y);
        let face_model = group * Mat4::from_scale(Vec3::splat(1.3));
        let sphere_model = group * Mat4::from_scale(Vec3::splat(1.2));

        let aspect = renderer.gpu.width as f32 / renderer.gpu.height.max(1) as f32;
        let proj = Mat4::perspective_rh(45f32.to_radians(), aspect, 0.1, 100.0);
        let view = Mat4::look_at_rh(CAMERA_EYE, Vec3::ZERO, Vec3::Y);
        let view_proj = proj * view;

        renderer.camera.update(&renderer.gpu.queue, view_proj, CAMERA_EYE);
        renderer.aurora.update(
            &renderer.gpu.queue,
            view_proj,
            sphere_model,
            CAMERA_EYE,
            self.clock,
        );
        renderer.dust.update(&renderer.gpu.queue, view, proj, self.clock);

        renderer.face_slot.update(&renderer.gpu.queue, face_model, WHITE);
        for (i, slot) in renderer.eye_slots.iter().enumerate() {
            let x = if i == 0 { -EYE_X } else { EYE_X };
            let model = face_model
                * Mat4::from_translation(Vec3::new(x, EYE_Y, 0.95))
                * Mat4::from_scale(Vec3::new(0.035, 0.035 * face.eye_scale_y, 0.035));
            slot.update(&renderer.gpu.queue, model, WHITE);
        }
        if let Some(tears) = self.tears {
            for (i, slot) in renderer.tear_slots.iter().enumerate() {
                let x = if i == 0 { -EYE_X } else { EYE_X };
                let model = face_model
                    * Mat4::from_translation(Vec3::new(x, EYE_Y + tears.y, 0.98))
                    * Mat4::from_scale(Vec3::splat(0.02));
                let tint = [TEAR_TINT[0], TEAR_TINT[1], TEAR_TINT[2], tears.opacity * 0.8];
                slot.update(&renderer.gpu.queue, model, tint);
            }
        }

        let frame = match renderer.gpu.surface.get_current_texture() {
            Ok(f) => f,
            Err(e) => {
                log::error!("surface error: {:?}", e);
                return true;
            }
        };
        let swap_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = renderer
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("face_encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("face_scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &renderer.targets.hdr_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        // Pale mist backdrop
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.55,
                            g: 0.55,
                            b: 0.53,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &renderer.targets.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            renderer.aurora.draw(&mut rpass);
            renderer.features.draw_dynamic(
                &mut rpass,
                &renderer.camera,
                &renderer.mouth,
                &renderer.face_slot,
            );
            renderer.features.draw_dynamic(
                &mut rpass,
                &renderer.camera,
                &renderer.brow_left,
                &renderer.face_slot,
            );
            renderer.features.draw_dynamic(
                &mut rpass,
                &renderer.camera,
                &renderer.brow_right,
                &renderer.face_slot,
            );
            for segment in &renderer.nose {
                renderer.features.draw_static(
                    &mut rpass,
                    &renderer.camera,
                    segment,
                    &renderer.face_slot,
                );
            }
            for slot in &renderer.eye_slots {
                renderer
                    .features
                    .draw_static(&mut rpass, &renderer.camera, &renderer.eye_mesh, slot);
            }
            if self.tears.is_some() {
                for slot in &renderer.tear_slots {
                    renderer.features.draw_static(
                        &mut rpass,
                        &renderer.camera,
                        &renderer.tear_mesh,
                        slot,
                    );
                }
            }
            renderer.dust.draw(&mut rpass);
        }
        renderer.bloom.run(
            &mut encoder,
            &renderer.gpu.queue,
            &renderer.targets,
            &swap_view,
        );
        renderer.gpu.queue.submit(Some(encoder.finish()));
        frame.present();
        true
    }
}

pub async fn run(
    canvas: web::HtmlCanvasElement,
    _document: web::Document,
) -> anyhow::Result<()> {
    let ui = Rc::new(RefCell::new(FaceUi::default()));
    let mouse = Rc::new(RefCell::new(MouseState::default()));
    events::wire_face_inputs(events::FaceWiring {
        ui: ui.clone(),
        mouse: mouse.clone(),
    });

    let renderer = match init_gpu(&canvas).await {
        Some(gpu) => {
            let targets = SceneTargets::new(&gpu.device, gpu.width, gpu.height);
            let mut bloom = BloomStack::new(&gpu.device, gpu.config.format, &targets);
            // The face leans harder on bloom than the tree does
            bloom.threshold = 0.5;
            bloom.strength = 0.4;
            let camera = CameraBinding::new(&gpu.device);
            let aurora = AuroraPass::new(&gpu.device, Palette::Aurora.colors());
            let features = FeaturePipeline::new(&gpu.device, &camera);

            let mut dust_rng = StdRng::seed_from_u64(0xD057);
            let dust_points: Vec<[f32; 3]> = (0..DUST_COUNT)
                .map(|_| scatter_box(&mut dust_rng, DUST_EXTENT).to_array())
                .collect();
            let dust = DustPass::new(&gpu.device, &dust_points);

            let nose = nose_curves()
                .iter()
                .filter_map(|curve| match sweep_tube(curve, TUBE_RADIUS, TUBE_RING_SEGMENTS) {
                    Ok(mesh) => Some(upload_mesh(&gpu.device, "nose", &mesh)),
                    Err(e) => {
                        log::error!("nose build failed: {e}");
                        None
                    }
                })
                .collect();
            let eye_mesh = upload_mesh(&gpu.device, "eye", &uv_sphere(16, 12));
            let tear_mesh = upload_mesh(&gpu.device, "tear", &uv_sphere(8, 6));

            let face_slot = features.make_slot(&gpu.device, "face_features");
            let eye_slots = [
                features.make_slot(&gpu.device, "eye_left"),
                features.make_slot(&gpu.device, "eye_right"),
            ];
            let tear_slots = [
                features.make_slot(&gpu.device, "tear_left"),
                features.make_slot(&gpu.device, "tear_right"),
            ];

            Some(FaceRenderer {
                gpu,
                targets,
                bloom,
                camera,
                aurora,
                features,
                dust,
                mouth: DynamicMesh::default(),
                brow_left: DynamicMesh::default(),
                brow_right: DynamicMesh::default(),
                nose,
                eye_mesh,
                tear_mesh,
                face_slot,
                eye_slots,
                tear_slots,
            })
        }
        None => None,
    };

    let scene = Rc::new(RefCell::new(FaceScene {
        ui,
        mouse,
        state: ExpressionState::new(),
        rng: StdRng::seed_from_u64(js_sys::Date::now() as u64),
        renderer,
        canvas,
        last_instant: Instant::now(),
        clock: 0.0,
        tears: None,
    }));

    log::info!("[face] scene up");
    frame::start_loop(move || scene.borrow_mut().frame());
    Ok(())
}
