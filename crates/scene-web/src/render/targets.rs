//! Offscreen render targets: full-resolution HDR scene colour + depth and
//! the half-resolution bloom ping-pong pair.

pub const HDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

pub struct SceneTargets {
    pub hdr_tex: wgpu::Texture,
    pub hdr_view: wgpu::TextureView,
    pub depth_tex: wgpu::Texture,
    pub depth_view: wgpu::TextureView,
    pub bloom_a: wgpu::Texture,
    pub bloom_a_view: wgpu::TextureView,
    pub bloom_b: wgpu::Texture,
    pub bloom_b_view: wgpu::TextureView,
    pub width: u32,
    pub height: u32,
}

fn color_target(
    device: &wgpu::Device,
    label: &str,
    width: u32,
    height: u32,
    format: wgpu::TextureFormat,
) -> (wgpu::Texture, wgpu::TextureView) {
    let tex = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    let view = tex.create_view(&wgpu::TextureViewDescriptor::default());
    (tex, view)
}

impl SceneTargets {
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let (hdr_tex, hdr_view) = color_target(device, "hdr_tex", width, height, HDR_FORMAT);

        let depth_tex = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_tex"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let depth_view = depth_tex.create_view(&wgpu::TextureViewDescriptor::default());

        let bloom_w = (width / 2).max(1);
        let bloom_h = (height / 2).max(1);
        let (bloom_a, bloom_a_view) = color_target(device, "bloom_a", bloom_w, bloom_h, HDR_FORMAT);
        let (bloom_b, bloom_b_view) = color_target(device, "bloom_b", bloom_w, bloom_h, HDR_FORMAT);

        Self {
            hdr_tex,
            hdr_view,
            depth_tex,
            depth_view,
            bloom_a,
            bloom_a_view,
            bloom_b,
            bloom_b_view,
            width,
            height,
        }
    }

    pub fn bloom_resolution(&self) -> [f32; 2] {
        [(self.width / 2).max(1) as f32, (self.height / 2).max(1) as f32]
    }
}
