/// wgpu renderer for the world's objects
use fpsdbg_core::{DrawObject, Mesh, Topology, World};
use wgpu::util::DeviceExt;

use crate::context::Context;
use crate::error::AppError;
use crate::input::FillMode;
use crate::shaders::{validated, ShaderPair, FRAGMENT_ENTRY, VERTEX_ENTRY};
use crate::vertex::{pack, GpuVertex, Uniforms};

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.4,
    g: 0.4,
    b: 0.4,
    a: 1.0,
};

/// Buffers of one uploaded object. Each object owns its uniform block so
/// several objects can be drawn in one pass.
pub struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: Option<wgpu::Buffer>,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// Highest usable sample count not above `requested` for both the color and
/// depth targets.
pub fn supported_sample_count(
    adapter: &wgpu::Adapter,
    format: wgpu::TextureFormat,
    requested: u32,
) -> u32 {
    let color = adapter.get_texture_format_features(format).flags;
    let depth = adapter.get_texture_format_features(DEPTH_FORMAT).flags;

    let count = [8, 4, 2, 1]
        .into_iter()
        .filter(|&n| n <= requested)
        .find(|&n| color.sample_count_supported(n) && depth.sample_count_supported(n))
        .unwrap_or(1);

    if count != requested {
        tracing::warn!(requested, using = count, "sample count not supported");
    }
    count
}

struct Pipelines {
    triangles: wgpu::RenderPipeline,
    wireframe: Option<wgpu::RenderPipeline>,
}

impl Pipelines {
    fn select(&self, topology: Topology, fill_mode: FillMode) -> &wgpu::RenderPipeline {
        match (topology, fill_mode, &self.wireframe) {
            (Topology::TriangleList, FillMode::Wireframe, Some(wireframe)) => wireframe,
            (Topology::TriangleList, _, _) => &self.triangles,
        }
    }
}

/// Pipelines and render targets for one surface
pub struct Renderer {
    bind_group_layout: wgpu::BindGroupLayout,
    pipelines: Pipelines,
    depth_view: wgpu::TextureView,
    msaa_view: Option<wgpu::TextureView>,
    format: wgpu::TextureFormat,
    sample_count: u32,
}

impl Renderer {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        (width, height): (u32, u32),
        sample_count: u32,
        shaders: &ShaderPair,
        wireframe_supported: bool,
    ) -> Result<Self, AppError> {
        shaders.vertex.require_entry_point(VERTEX_ENTRY)?;
        shaders.fragment.require_entry_point(FRAGMENT_ENTRY)?;
        let vertex_module = shaders.vertex.compile(device)?;
        let fragment_module = shaders.fragment.compile(device)?;

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let build = |label: &str, topology: wgpu::PrimitiveTopology, polygon_mode: wgpu::PolygonMode| {
            validated(device, label, || device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: &vertex_module,
                    entry_point: VERTEX_ENTRY,
                    buffers: &[GpuVertex::layout()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &fragment_module,
                    entry_point: FRAGMENT_ENTRY,
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: Default::default(),
                    bias: Default::default(),
                }),
                multisample: wgpu::MultisampleState {
                    count: sample_count,
                    mask: !0,
                    alpha_to_coverage_enabled: false,
                },
                multiview: None,
            }))
        };

        let pipelines = Pipelines {
            triangles: build(
                "triangles_pipeline",
                wgpu::PrimitiveTopology::TriangleList,
                wgpu::PolygonMode::Fill,
            )?,
            wireframe: if wireframe_supported {
                Some(build(
                    "wireframe_pipeline",
                    wgpu::PrimitiveTopology::TriangleList,
                    wgpu::PolygonMode::Line,
                )?)
            } else {
                None
            },
        };

        let (depth_view, msaa_view) =
            Self::create_targets(device, format, sample_count, width, height);

        Ok(Self {
            bind_group_layout,
            pipelines,
            depth_view,
            msaa_view,
            format,
            sample_count,
        })
    }

    /// Upload a triangle mesh. Indexed when flat shading lets neighbours
    /// share vertices, plain otherwise.
    pub fn upload(&self, device: &wgpu::Device, mesh: &Mesh) -> DrawObject<GpuMesh> {
        let packed = pack(mesh);
        let indexed = packed.vertices.len() < packed.indices.len();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("vertex_buffer"),
            contents: bytemuck::cast_slice(&packed.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = indexed.then(|| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("index_buffer"),
                contents: bytemuck::cast_slice(&packed.indices),
                usage: wgpu::BufferUsages::INDEX,
            })
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("uniform_buffer"),
            size: std::mem::size_of::<Uniforms>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform_bind_group"),
            layout: &self.bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let handle = GpuMesh {
            vertex_buffer,
            index_buffer,
            uniform_buffer,
            bind_group,
        };
        let vertex_count = packed.vertices.len() as u32;

        tracing::info!(
            triangles = mesh.triangle_count(),
            vertices = vertex_count,
            indexed,
            "uploaded mesh"
        );

        if indexed {
            DrawObject::indexed(
                handle,
                vertex_count,
                packed.indices.len() as u32,
                Topology::TriangleList,
            )
        } else {
            DrawObject::new(handle, vertex_count, Topology::TriangleList)
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        let (depth_view, msaa_view) =
            Self::create_targets(device, self.format, self.sample_count, width, height);
        self.depth_view = depth_view;
        self.msaa_view = msaa_view;
    }

    /// Draw every object with the model spun `angle` radians about Y.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target: &wgpu::TextureView,
        world: &World<GpuMesh>,
        context: &Context,
        angle: f32,
    ) {
        let camera = &context.camera;
        let uniforms = Uniforms::new(&camera.frame_modelview(angle), camera.projection());
        for object in world {
            queue.write_buffer(&object.handle.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let (view, resolve_target, store) = match &self.msaa_view {
                Some(msaa) => (msaa, Some(target), wgpu::StoreOp::Discard),
                None => (target, None, wgpu::StoreOp::Store),
            };

            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            for object in world {
                if object.element_count() == 0 {
                    continue;
                }
                let mesh = &object.handle;

                pass.set_pipeline(self.pipelines.select(object.topology, context.fill_mode()));
                pass.set_bind_group(0, &mesh.bind_group, &[]);
                pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));

                match &mesh.index_buffer {
                    Some(indices) if object.is_indexed() => {
                        pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
                        pass.draw_indexed(0..object.index_count, 0, 0..1);
                    }
                    _ => pass.draw(0..object.vertex_count, 0..1),
                }
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn create_targets(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        sample_count: u32,
        width: u32,
        height: u32,
    ) -> (wgpu::TextureView, Option<wgpu::TextureView>) {
        let depth = Self::create_target(device, "depth_texture", DEPTH_FORMAT, sample_count, width, height);
        let msaa = (sample_count > 1)
            .then(|| Self::create_target(device, "msaa_texture", format, sample_count, width, height));
        (depth, msaa)
    }

    fn create_target(
        device: &wgpu::Device,
        label: &str,
        format: wgpu::TextureFormat,
        sample_count: u32,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}
