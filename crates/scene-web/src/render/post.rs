//! Bloom post stack: bright extraction into the half-res ping-pong pair,
//! separable blur, composite onto the swapchain.
//!
//! Each pass owns its uniform buffer; queue writes land before command
//! execution, so sharing one buffer across passes would make the last write
//! win for all of them.

use super::targets::{SceneTargets, HDR_FORMAT};

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct PostUniforms {
    resolution: [f32; 2],
    blur_dir: [f32; 2],
    bloom_strength: f32,
    threshold: f32,
    _pad0: f32,
    _pad1: f32,
}

pub struct BloomStack {
    bgl0: wgpu::BindGroupLayout,
    bgl1: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,

    ub_bright: wgpu::Buffer,
    ub_blur_h: wgpu::Buffer,
    ub_blur_v: wgpu::Buffer,
    ub_composite: wgpu::Buffer,

    bg_bright: wgpu::BindGroup,
    bg_blur_h: wgpu::BindGroup,
    bg_blur_v: wgpu::BindGroup,
    bg_composite: wgpu::BindGroup,
    bg_bloom_a_only: wgpu::BindGroup,

    bright_pipeline: wgpu::RenderPipeline,
    blur_pipeline: wgpu::RenderPipeline,
    composite_pipeline: wgpu::RenderPipeline,

    pub strength: f32,
    pub threshold: f32,
}

impl BloomStack {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        targets: &SceneTargets,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("post_shader"),
            source: wgpu::ShaderSource::Wgsl(scene_core::POST_WGSL.into()),
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("post_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let bgl0 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("post_bgl0"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });
        let bgl1 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("post_bgl1"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let make_ub = |label: &str| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: std::mem::size_of::<PostUniforms>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        };
        let ub_bright = make_ub("post_ub_bright");
        let ub_blur_h = make_ub("post_ub_blur_h");
        let ub_blur_v = make_ub("post_ub_blur_v");
        let ub_composite = make_ub("post_ub_composite");

        let pl_single = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("post_pl_single"),
            bind_group_layouts: &[&bgl0],
            push_constant_ranges: &[],
        });
        let pl_composite = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("post_pl_composite"),
            bind_group_layouts: &[&bgl0, &bgl1],
            push_constant_ranges: &[],
        });

        let make_pipeline = |label: &str,
                             layout: &wgpu::PipelineLayout,
                             entry: &str,
                             format: wgpu::TextureFormat| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_fullscreen"),
                    buffers: &[],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                primitive: wgpu::PrimitiveState::default(),
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some(entry),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                cache: None,
                multiview: None,
            })
        };

        let bright_pipeline = make_pipeline("bright_pipeline", &pl_single, "fs_bright", HDR_FORMAT);
        let blur_pipeline = make_pipeline("blur_pipeline", &pl_single, "fs_blur", HDR_FORMAT);
        let composite_pipeline = make_pipeline(
            "composite_pipeline",
            &pl_composite,
            "fs_composite",
            surface_format,
        );

        let (bg_bright, bg_blur_h, bg_blur_v, bg_composite, bg_bloom_a_only) =
            Self::build_bind_groups(
                device,
                &bgl0,
                &bgl1,
                &sampler,
                targets,
                &ub_bright,
                &ub_blur_h,
                &ub_blur_v,
                &ub_composite,
            );

        Self {
            bgl0,
            bgl1,
            sampler,
            ub_bright,
            ub_blur_h,
            ub_blur_v,
            ub_composite,
            bg_bright,
            bg_blur_h,
            bg_blur_v,
            bg_composite,
            bg_bloom_a_only,
            bright_pipeline,
            blur_pipeline,
            composite_pipeline,
            strength: 0.9,
            threshold: 0.6,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn build_bind_groups(
        device: &wgpu::Device,
        bgl0: &wgpu::BindGroupLayout,
        bgl1: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        targets: &SceneTargets,
        ub_bright: &wgpu::Buffer,
        ub_blur_h: &wgpu::Buffer,
        ub_blur_v: &wgpu::Buffer,
        ub_composite: &wgpu::Buffer,
    ) -> (
        wgpu::BindGroup,
        wgpu::BindGroup,
        wgpu::BindGroup,
        wgpu::BindGroup,
        wgpu::BindGroup,
    ) {
        let make_bg0 = |label: &str, view: &wgpu::TextureView, ub: &wgpu::Buffer| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: bgl0,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(sampler),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: ub.as_entire_binding(),
                    },
                ],
            })
        };

        let bg_bright = make_bg0("bg_bright", &targets.hdr_view, ub_bright);
        let bg_blur_h = make_bg0("bg_blur_h", &targets.bloom_a_view, ub_blur_h);
        let bg_blur_v = make_bg0("bg_blur_v", &targets.bloom_b_view, ub_blur_v);
        let bg_composite = make_bg0("bg_composite", &targets.hdr_view, ub_composite);

        let bg_bloom_a_only = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bg_bloom_a_only"),
            layout: bgl1,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&targets.bloom_a_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        (bg_bright, bg_blur_h, bg_blur_v, bg_composite, bg_bloom_a_only)
    }

    /// Rebind after the offscreen targets were recreated on resize.
    pub fn rebuild(&mut self, device: &wgpu::Device, targets: &SceneTargets) {
        let (bg_bright, bg_blur_h, bg_blur_v, bg_composite, bg_bloom_a_only) =
            Self::build_bind_groups(
                device,
                &self.bgl0,
                &self.bgl1,
                &self.sampler,
                targets,
                &self.ub_bright,
                &self.ub_blur_h,
                &self.ub_blur_v,
                &self.ub_composite,
            );
        self.bg_bright = bg_bright;
        self.bg_blur_h = bg_blur_h;
        self.bg_blur_v = bg_blur_v;
        self.bg_composite = bg_composite;
        self.bg_bloom_a_only = bg_bloom_a_only;
    }

    /// Encode the four post passes. The scene must already be in the HDR target.
    pub fn run(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        queue: &wgpu::Queue,
        targets: &SceneTargets,
        swap_view: &wgpu::TextureView,
    ) {
        let bloom_res = targets.bloom_resolution();
        let write = |ub: &wgpu::Buffer, blur_dir: [f32; 2]| {
            let uniforms = PostUniforms {
                resolution: bloom_res,
                blur_dir,
                bloom_strength: self.strength,
                threshold: self.threshold,
                _pad0: 0.0,
                _pad1: 0.0,
            };
            queue.write_buffer(ub, 0, bytemuck::bytes_of(&uniforms));
        };
        write(&self.ub_bright, [0.0, 0.0]);
        write(&self.ub_blur_h, [1.0, 0.0]);
        write(&self.ub_blur_v, [0.0, 1.0]);
        write(&self.ub_composite, [0.0, 0.0]);

        self.blit(
            encoder,
            "bright_pass",
            &targets.bloom_a_view,
            &self.bright_pipeline,
            &self.bg_bright,
            None,
        );
        self.blit(
            encoder,
            "blur_h",
            &targets.bloom_b_view,
            &self.blur_pipeline,
            &self.bg_blur_h,
            None,
        );
        self.blit(
            encoder,
            "blur_v",
            &targets.bloom_a_view,
            &self.blur_pipeline,
            &self.bg_blur_v,
            None,
        );
        self.blit(
            encoder,
            "composite",
            swap_view,
            &self.composite_pipeline,
            &self.bg_composite,
            Some(&self.bg_bloom_a_only),
        );
    }

    fn blit(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        label: &str,
        target: &wgpu::TextureView,
        pipeline: &wgpu::RenderPipeline,
        bg0: &wgpu::BindGroup,
        bg1: Option<&wgpu::BindGroup>,
    ) {
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bg0, &[]);
        if let Some(g1) = bg1 {
            rpass.set_bind_group(1, g1, &[]);
        }
        rpass.draw(0..3, 0..1);
    }
}
