//! Face feature meshes: the per-frame mouth/brow tubes and the static
//! spheres for eyes and tears.
//!
//! Rebuilding geometry every frame demands discipline about GPU resources:
//! each dynamic feature keeps two buffer slots, builds into the inactive one
//! and swaps, so the buffer the previous frame submitted is only dropped
//! after the swap.

use glam::Mat4;
use wgpu::util::DeviceExt;

use scene_core::mesh::MeshData;

use super::targets::{DEPTH_FORMAT, HDR_FORMAT};
use crate::render::{pack_mesh_vertices, CameraBinding};

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct FeatureUniforms {
    model: [[f32; 4]; 4],
    tint: [f32; 4],
}

pub struct MeshBuffers {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

pub fn upload_mesh(device: &wgpu::Device, label: &str, mesh: &MeshData) -> MeshBuffers {
    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(&pack_mesh_vertices(mesh)),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(&mesh.indices),
        usage: wgpu::BufferUsages::INDEX,
    });
    MeshBuffers {
        vertex_buffer,
        index_buffer,
        index_count: mesh.indices.len() as u32,
    }
}

/// Double-buffered geometry slot for a feature that is rebuilt every frame.
#[derive(Default)]
pub struct DynamicMesh {
    slots: [Option<MeshBuffers>; 2],
    active: usize,
}

impl DynamicMesh {
    /// Build the new geometry into the inactive slot, then swap.
    pub fn upload(&mut self, device: &wgpu::Device, label: &str, mesh: &MeshData) {
        let inactive = 1 - self.active;
        self.slots[inactive] = Some(upload_mesh(device, label, mesh));
        self.active = inactive;
    }

    fn current(&self) -> Option<&MeshBuffers> {
        self.slots[self.active].as_ref()
    }
}

/// Per-feature transform + tint binding.
pub struct FeatureSlot {
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl FeatureSlot {
    pub fn update(&self, queue: &wgpu::Queue, model: Mat4, tint: [f32; 4]) {
        let uniforms = FeatureUniforms {
            model: model.to_cols_array_2d(),
            tint,
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
    }
}

pub struct FeaturePipeline {
    pipeline: wgpu::RenderPipeline,
    model_bgl: wgpu::BindGroupLayout,
}

impl FeaturePipeline {
    pub fn new(device: &wgpu::Device, camera: &CameraBinding) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("tube_shader"),
            source: wgpu::ShaderSource::Wgsl(scene_core::TUBE_WGSL.into()),
        });

        let model_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("feature_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("feature_pl"),
            bind_group_layouts: &[&camera.layout, &model_bgl],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("feature_pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: 24,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32x3,
                    ],
                }],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: HDR_FORMAT,
                    // Premultiplied alpha so tears can fade out
                    blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        Self {
            pipeline,
            model_bgl,
        }
    }

    pub fn make_slot(&self, device: &wgpu::Device, label: &str) -> FeatureSlot {
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: std::mem::size_of::<FeatureUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &self.model_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        FeatureSlot {
            uniform_buffer,
            bind_group,
        }
    }

    pub fn draw_static<'a>(
        &'a self,
        rpass: &mut wgpu::RenderPass<'a>,
        camera: &'a CameraBinding,
        mesh: &'a MeshBuffers,
        slot: &'a FeatureSlot,
    ) {
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &camera.bind_group, &[]);
        rpass.set_bind_group(1, &slot.bind_group, &[]);
        rpass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        rpass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(0..mesh.index_count, 0, 0..1);
    }

    pub fn draw_dynamic<'a>(
        &'a self,
        rpass: &mut wgpu::RenderPass<'a>,
        camera: &'a CameraBinding,
        mesh: &'a DynamicMesh,
        slot: &'a FeatureSlot,
    ) {
        // Skipping a frame is fine when the mesh is not built yet
        if let Some(buffers) = mesh.current() {
            self.draw_static(rpass, camera, buffers, slot);
        }
    }
}
