use crate::texture::WebTextureLoader;
use fnv::FnvHashMap;
use glam::{Mat4, Quat, Vec3};
use tour_core::{
    uv_sphere, Camera, Mesh, MeshId, MeshKind, SceneGraph, TextureHandle, MARKER_SEGMENTS,
    PANORAMA_HEIGHT_SEGMENTS, PANORAMA_WIDTH_SEGMENTS, PANORAMA_WGSL,
};
use web_sys as web;

mod helpers;
use helpers::MeshBuffers;

const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct DrawUniforms {
    view_proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    color: [f32; 4],
    // x: opacity, y: mirror u, z: textured
    params: [f32; 4],
}

struct DrawSlot {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

struct GpuTexture {
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

/// Draws a [`SceneGraph`] with one alpha-blended pipeline.
///
/// GPU resources follow the graph: per-mesh uniform slots and panorama
/// textures are created on first sight and dropped once their mesh or
/// texture handle leaves the graph.
pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    uniform_layout: wgpu::BindGroupLayout,
    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    sphere: MeshBuffers,
    marker: MeshBuffers,
    // 1x1 white, bound for markers and panoramas still loading
    fallback: GpuTexture,
    textures: FnvHashMap<TextureHandle, GpuTexture>,
    slots: FnvHashMap<MeshId, DrawSlot>,
    width: u32,
    height: u32,
    clear_color: wgpu::Color,
}

impl<'a> GpuState<'a> {
    pub async fn new(canvas: web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("panorama_shader"),
            source: wgpu::ShaderSource::Wgsl(PANORAMA_WGSL.into()),
        });
        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("draw_uniforms_bgl"),
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
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("panorama_texture_bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
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
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("tour_pipeline_layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            push_constant_ranges: &[],
        });
        let pipeline = helpers::make_draw_pipeline(&device, &pipeline_layout, &shader, format);

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("panorama_sampler"),
            // longitude wraps, latitude stops at the poles
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let sphere = helpers::create_mesh_buffers(
            &device,
            "panorama_sphere",
            uv_sphere(PANORAMA_WIDTH_SEGMENTS, PANORAMA_HEIGHT_SEGMENTS),
        );
        let marker = helpers::create_mesh_buffers(
            &device,
            "marker_sphere",
            uv_sphere(MARKER_SEGMENTS, MARKER_SEGMENTS),
        );

        let (white, white_view) = helpers::create_color_texture(
            &device,
            "fallback_white",
            1,
            1,
            TEXTURE_FORMAT,
            wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        );
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &white,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &[255, 255, 255, 255],
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4),
                rows_per_image: Some(1),
            },
            wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
        );
        let fallback = GpuTexture {
            bind_group: helpers::texture_bind_group(&device, &texture_layout, &white_view, &sampler),
            _texture: white,
        };

        log::info!("[gpu] ready {}x{} {:?}", width, height, format);
        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            uniform_layout,
            texture_layout,
            sampler,
            sphere,
            marker,
            fallback,
            textures: FnvHashMap::default(),
            slots: FnvHashMap::default(),
            width,
            height,
            clear_color: wgpu::Color::BLACK,
        })
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Upload images the loader finished decoding since the last frame.
    fn upload_decoded(&mut self, loader: &WebTextureLoader) {
        let max_dim = self.device.limits().max_texture_dimension_2d;
        for (handle, img) in loader.take_decoded() {
            let (w, h) = (img.natural_width(), img.natural_height());
            if w == 0 || h == 0 || w > max_dim || h > max_dim {
                log::warn!(
                    "[gpu] {:?} is {}x{}, limit {}; rendering blank",
                    handle,
                    w,
                    h,
                    max_dim
                );
                continue;
            }
            let (texture, view) = helpers::create_color_texture(
                &self.device,
                "panorama_texture",
                w,
                h,
                TEXTURE_FORMAT,
                wgpu::TextureUsages::TEXTURE_BINDING
                    | wgpu::TextureUsages::COPY_DST
                    | wgpu::TextureUsages::RENDER_ATTACHMENT,
            );
            self.queue.copy_external_image_to_texture(
                &wgpu::CopyExternalImageSourceInfo {
                    source: wgpu::ExternalImageSource::HTMLImageElement(img),
                    origin: wgpu::Origin2d::ZERO,
                    flip_y: false,
                },
                wgpu::CopyExternalImageDestInfo {
                    texture: &texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                    color_space: wgpu::PredefinedColorSpace::Srgb,
                    premultiplied_alpha: false,
                },
                wgpu::Extent3d {
                    width: w,
                    height: h,
                    depth_or_array_layers: 1,
                },
            );
            let bind_group =
                helpers::texture_bind_group(&self.device, &self.texture_layout, &view, &self.sampler);
            log::debug!("[gpu] uploaded {:?} ({}x{})", handle, w, h);
            self.textures.insert(
                handle,
                GpuTexture {
                    _texture: texture,
                    bind_group,
                },
            );
        }
    }

    /// Drop GPU objects whose mesh or texture is no longer in the graph.
    fn prune(&mut self, graph: &SceneGraph) {
        self.slots.retain(|id, _| graph.mesh(*id).is_some());
        self.textures
            .retain(|handle, _| graph.panoramas().any(|m| m.texture() == Some(*handle)));
    }

    fn uniforms_for(&self, mesh: &Mesh, alpha: f32, view_proj: Mat4) -> DrawUniforms {
        let model = Mat4::from_scale_rotation_translation(
            Vec3::splat(mesh.radius),
            Quat::IDENTITY,
            mesh.position,
        );
        let [r, g, b] = mesh.color;
        let (color, mirror, textured) = match mesh.kind {
            MeshKind::Panorama { texture, .. } if self.textures.contains_key(&texture) => {
                ([r, g, b, 1.0], 1.0, 1.0)
            }
            // loading or failed: the sphere stays dark
            MeshKind::Panorama { .. } => ([0.0, 0.0, 0.0, 1.0], 1.0, 0.0),
            MeshKind::Marker { .. } => ([r, g, b, 1.0], 0.0, 0.0),
        };
        DrawUniforms {
            view_proj: view_proj.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            color,
            params: [alpha, mirror, textured, 0.0],
        }
    }

    fn write_slot(&mut self, id: MeshId, uniforms: &DrawUniforms) {
        if let Some(slot) = self.slots.get(&id) {
            self.queue
                .write_buffer(&slot.buffer, 0, bytemuck::bytes_of(uniforms));
            return;
        }
        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("draw_uniforms"),
            size: std::mem::size_of::<DrawUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        self.queue
            .write_buffer(&buffer, 0, bytemuck::bytes_of(uniforms));
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("draw_uniforms_bg"),
            layout: &self.uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        self.slots.insert(id, DrawSlot { buffer, bind_group });
    }

    pub fn render(
        &mut self,
        graph: &SceneGraph,
        camera: &Camera,
        loader: &WebTextureLoader,
    ) -> Result<(), wgpu::SurfaceError> {
        self.upload_decoded(loader);
        self.prune(graph);

        let view_proj = camera.view_proj();
        for (mesh, alpha) in graph.draw_list() {
            let u = self.uniforms_for(mesh, alpha, view_proj);
            self.write_slot(mesh.id, &u);
        }

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("tour_encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("tour_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_pipeline(&self.pipeline);
            // graph order already puts panoramas under markers
            for mesh in graph.meshes() {
                let Some(slot) = self.slots.get(&mesh.id) else {
                    continue;
                };
                let (buffers, texture) = match mesh.kind {
                    MeshKind::Panorama { texture, .. } => (
                        &self.sphere,
                        self.textures.get(&texture).unwrap_or(&self.fallback),
                    ),
                    MeshKind::Marker { .. } => (&self.marker, &self.fallback),
                };
                rpass.set_bind_group(0, &slot.bind_group, &[]);
                rpass.set_bind_group(1, &texture.bind_group, &[]);
                rpass.set_vertex_buffer(0, buffers.vertex.slice(..));
                rpass.set_index_buffer(buffers.index.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..buffers.index_count, 0, 0..1);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}
