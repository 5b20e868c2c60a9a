//! The holiday tree scene: store-driven formation morph, hand-tracked
//! camera orbit, webcam tracker with manual-override fallback.

use std::cell::RefCell;
use std::rc::Rc;

use glam::{Mat4, Vec3};
use instant::Instant;
use wasm_bindgen::JsCast;
use web_sys as web;

use scene_core::constants::CAMERA_BASE_HEIGHT;
use scene_core::formation::{
    standard_inventory, FoliageField, GeometryKind, InstanceRaw, Population,
};
use scene_core::mesh::{plane, unit_cube, uv_sphere, MeshData};
use scene_core::rig::CameraRig;
use scene_core::sampling::mix_seed;
use scene_core::store::{Store, StoreEvent};

use crate::render::foliage::FoliagePass;
use crate::render::ornaments::{InstancedMesh, OrnamentPipeline};
use crate::render::post::BloomStack;
use crate::render::targets::SceneTargets;
use crate::render::{init_gpu, CameraBinding, GpuContext};
use crate::{dom, events, frame, tracker};

const BASE_SEED: u64 = 0x5EED_7EE5;

struct TreeRenderer {
    gpu: GpuContext<'static>,
    targets: SceneTargets,
    bloom: BloomStack,
    camera: CameraBinding,
    foliage_pass: FoliagePass,
    ornament_pipeline: OrnamentPipeline,
    meshes: Vec<InstancedMesh>,
}

struct TreeScene {
    store: Rc<RefCell<Store>>,
    rig: Rc<RefCell<CameraRig>>,
    populations: Vec<Population>,
    foliage: FoliageField,
    renderer: Option<TreeRenderer>,
    canvas: web::HtmlCanvasElement,
    last_instant: Instant,
    clock: f32,
    scratch: Vec<InstanceRaw>,
}

fn mesh_for(kind: GeometryKind) -> MeshData {
    match kind {
        GeometryKind::Cube => unit_cube(),
        GeometryKind::Sphere => uv_sphere(16, 12),
        GeometryKind::Plane => plane(1.0, 1.2),
    }
}

impl TreeScene {
    fn frame(&mut self) -> bool {
        let now = Instant::now();
        let dt = (now - self.last_instant).as_secs_f32();
        self.last_instant = now;
        self.clock += dt;

        // Read the store once; everything below works off this snapshot
        let (progress, hand) = {
            let store = self.store.borrow();
            (store.formation_progress(), store.hand_position())
        };

        self.foliage.advance(progress, dt);
        let pose = self.rig.borrow_mut().advance(hand, dt);

        let Some(renderer) = &mut self.renderer else {
            return true;
        };

        let width = self.canvas.width();
        let height = self.canvas.height();
        if renderer.gpu.resize_if_needed(width, height) {
            renderer.targets = SceneTargets::new(&renderer.gpu.device, width, height);
            renderer.bloom.rebuild(&renderer.gpu.device, &renderer.targets);
        }

        let aspect = renderer.gpu.width as f32 / renderer.gpu.height.max(1) as f32;
        let proj = Mat4::perspective_rh(std::f32::consts::FRAC_PI_4, aspect, 0.1, 200.0);
        let view = Mat4::look_at_rh(pose.eye, pose.target, Vec3::Y);

        renderer
            .camera
            .update(&renderer.gpu.queue, proj * view, pose.eye);
        renderer.foliage_pass.update(
            &renderer.gpu.queue,
            view,
            proj,
            self.clock,
            self.foliage.progress(),
        );
        for (population, mesh) in self.populations.iter_mut().zip(&mut renderer.meshes) {
            population.advance(progress, dt, self.clock, &mut self.scratch);
            mesh.update(&renderer.gpu.queue, &self.scratch);
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
                label: Some("tree_encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("tree_scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &renderer.targets.hdr_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        // Deep forest-night backdrop
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.004,
                            g: 0.064,
                            b: 0.008,
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
            for mesh in &renderer.meshes {
                renderer
                    .ornament_pipeline
                    .draw(&mut rpass, &renderer.camera, mesh);
            }
            // Additive sprites last so they see the solid depth buffer
            renderer.foliage_pass.draw(&mut rpass);
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
    document: web::Document,
) -> anyhow::Result<()> {
    let store = Rc::new(RefCell::new(Store::new()));

    // The status line follows hand detection; it is the only error channel
    {
        let doc = document.clone();
        dom::set_status_text(&doc, "SENSOR STATUS: MANUAL OVERRIDE");
        store.borrow_mut().subscribe(move |ev| {
            if let StoreEvent::HandDetected(detected) = ev {
                let text = if *detected {
                    "SENSOR STATUS: HAND LOCK"
                } else {
                    "SENSOR STATUS: MANUAL OVERRIDE"
                };
                dom::set_status_text(&doc, text);
            }
        });
    }

    let initial_progress = store.borrow().formation_progress();
    let populations: Vec<Population> = standard_inventory()
        .iter()
        .enumerate()
        .map(|(i, (config, _))| Population::new(*config, mix_seed(BASE_SEED, i as u64), initial_progress))
        .collect();
    let foliage = FoliageField::new(BASE_SEED, initial_progress);

    let rig = Rc::new(RefCell::new(CameraRig::new()));
    events::wire_tree_inputs(events::TreeWiring {
        canvas: canvas.clone(),
        store: store.clone(),
        rig: rig.clone(),
    });

    // Webcam + detector; on denial the manual sliders keep working
    let tracker_handle = tracker::start(document.clone(), store.clone());
    {
        let handle = tracker_handle.clone();
        let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move || {
            handle.stop();
        }) as Box<dyn FnMut()>);
        if let Some(w) = web::window() {
            let _ =
                w.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        }
        closure.forget();
    }

    let renderer = match init_gpu(&canvas).await {
        Some(gpu) => {
            let targets = SceneTargets::new(&gpu.device, gpu.width, gpu.height);
            let bloom = BloomStack::new(&gpu.device, gpu.config.format, &targets);
            let camera = CameraBinding::new(&gpu.device);
            let foliage_pass = FoliagePass::new(&gpu.device, foliage.points());
            let ornament_pipeline = OrnamentPipeline::new(&gpu.device, &camera);
            let meshes = standard_inventory()
                .iter()
                .map(|(config, kind)| {
                    InstancedMesh::new(&gpu.device, config.name, &mesh_for(*kind), config.count)
                })
                .collect();
            Some(TreeRenderer {
                gpu,
                targets,
                bloom,
                camera,
                foliage_pass,
                ornament_pipeline,
                meshes,
            })
        }
        None => None,
    };

    let max_count = populations.iter().map(|p| p.count()).max().unwrap_or(0);
    let scene = Rc::new(RefCell::new(TreeScene {
        store,
        rig,
        populations,
        foliage,
        renderer,
        canvas,
        last_instant: Instant::now(),
        clock: 0.0,
        scratch: Vec::with_capacity(max_count),
    }));

    log::info!(
        "[tree] scene up: eye starts at (0, {}, 20)",
        CAMERA_BASE_HEIGHT
    );
    frame::start_loop(move || scene.borrow_mut().frame());
    Ok(())
}
