//! Forward renderer for meshes and point clouds
//!
//! Meshes are expanded to one vertex per triangle corner and grouped by
//! material, so each textured material is a single draw. Point clouds are
//! drawn as a point list. Every geometry gets its own buffers keyed by the
//! caller's id, which keeps a frame swap down to one upload.

use crate::camera::Camera;
use crate::device::GpuContext;
use crate::frame::Frame;
use crate::shaders::{MESH_SHADER, POINT_SHADER};
use bytemuck::{Pod, Zeroable};
use meshseq_core::{Geometry, PointCloud, Result, Texture, TriangleMesh, Vector3f};
use std::collections::BTreeMap;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const DEFAULT_MESH_COLOR: [f32; 3] = [0.7, 0.7, 0.7];
const DEFAULT_POINT_COLOR: [f32; 3] = [0.1, 0.1, 0.1];

/// Vertex data for mesh rendering
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 4] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x3, 3 => Float32x2];

    /// Vertex buffer layout descriptor
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Vertex data for point rendering
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct PointVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl PointVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PointVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Camera uniform data
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    /// Direction towards the light, w unused
    pub light_dir: [f32; 4],
}

impl CameraUniform {
    pub fn from_camera(camera: &Camera) -> Self {
        let towards_eye = (camera.position() - camera.target).normalize();
        Self {
            view_proj: camera.view_projection().into(),
            light_dir: [towards_eye.x, towards_eye.y, towards_eye.z, 0.0],
        }
    }
}

/// Triangles sharing one material, ready for upload
#[derive(Debug, Clone, PartialEq)]
pub struct MeshBatch {
    /// Index into the mesh's textures, `None` for untextured triangles
    pub material: Option<usize>,
    pub vertices: Vec<MeshVertex>,
}

/// Expand a mesh into per-corner vertices grouped by material
pub fn mesh_batches(mesh: &TriangleMesh) -> Vec<MeshBatch> {
    let has_normals = mesh.has_vertex_normals();
    let has_colors = mesh.has_vertex_colors();
    let has_uvs = mesh.has_triangle_uvs();
    let has_ids = mesh.has_triangle_material_ids();

    let mut batches: BTreeMap<Option<usize>, Vec<MeshVertex>> = BTreeMap::new();
    for (t, tri) in mesh.triangles.iter().enumerate() {
        let material = if has_ids {
            usize::try_from(mesh.triangle_material_ids[t])
                .ok()
                .filter(|&id| id < mesh.textures.len())
        } else {
            None
        };

        let corners = tri.map(|i| mesh.vertices[i as usize]);
        let face_normal = (corners[1] - corners[0])
            .cross(&(corners[2] - corners[0]))
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3f::z);

        let vertices = batches.entry(material).or_default();
        for (c, &index) in tri.iter().enumerate() {
            let i = index as usize;
            let normal = if has_normals { mesh.vertex_normals[i] } else { face_normal };
            let color = match (has_colors, material) {
                (true, _) => mesh.vertex_colors[i],
                (false, Some(_)) => [1.0; 3],
                (false, None) => DEFAULT_MESH_COLOR,
            };
            // Image rows start at the top, OBJ texture coordinates at the bottom
            let uv = if has_uvs {
                let [u, v] = mesh.triangle_uvs[3 * t + c];
                [u, 1.0 - v]
            } else {
                [0.0, 0.0]
            };

            vertices.push(MeshVertex {
                position: corners[c].into(),
                normal: normal.into(),
                color,
                uv,
            });
        }
    }

    batches
        .into_iter()
        .map(|(material, vertices)| MeshBatch { material, vertices })
        .collect()
}

/// Point vertices with per-point colors when every point has one
pub fn point_vertices(cloud: &PointCloud) -> Vec<PointVertex> {
    let has_colors = cloud.has_colors();
    cloud
        .points
        .iter()
        .enumerate()
        .map(|(i, p)| PointVertex {
            position: (*p).into(),
            color: if has_colors { cloud.colors[i] } else { DEFAULT_POINT_COLOR },
        })
        .collect()
}

enum DrawCall {
    Mesh {
        buffer: wgpu::Buffer,
        count: u32,
        /// Texture bind group, the shared white texture when `None`
        texture: Option<wgpu::BindGroup>,
    },
    Points {
        buffer: wgpu::Buffer,
        count: u32,
    },
}

/// Renders the current scene into a surface view or an off-screen target
pub struct SceneRenderer {
    gpu: GpuContext,
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
    background: wgpu::Color,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    white_texture: wgpu::BindGroup,
    mesh_pipeline: wgpu::RenderPipeline,
    point_pipeline: wgpu::RenderPipeline,
    depth_view: wgpu::TextureView,
    capture_texture: wgpu::Texture,
    geometries: BTreeMap<usize, Vec<DrawCall>>,
}

impl SceneRenderer {
    /// Create a renderer drawing `width` x `height` images in `format`
    pub fn new(gpu: GpuContext, format: wgpu::TextureFormat, width: u32, height: u32) -> Self {
        let camera_uniform = CameraUniform::from_camera(&Camera::default());
        let camera_buffer = gpu.create_buffer_init(
            "Camera Buffer",
            &[camera_uniform],
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        );

        let camera_layout = gpu.create_bind_group_layout(
            "camera_bind_group_layout",
            &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        );
        let camera_bind_group = gpu.create_bind_group(
            "camera_bind_group",
            &camera_layout,
            &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        );

        let texture_layout = gpu.create_bind_group_layout(
            "texture_bind_group_layout",
            &[
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
        );

        let sampler = gpu.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Diffuse Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let mesh_shader = gpu.create_shader_module("Mesh Shader", MESH_SHADER);
        let mesh_pipeline = Self::create_render_pipeline(
            &gpu.device,
            &[&camera_layout, &texture_layout],
            &mesh_shader,
            MeshVertex::desc(),
            wgpu::PrimitiveTopology::TriangleList,
            format,
            "Mesh",
        );

        let point_shader = gpu.create_shader_module("Point Shader", POINT_SHADER);
        let point_pipeline = Self::create_render_pipeline(
            &gpu.device,
            &[&camera_layout],
            &point_shader,
            PointVertex::desc(),
            wgpu::PrimitiveTopology::PointList,
            format,
            "Point",
        );

        let white_texture = upload_texture(&gpu, &texture_layout, &sampler, &Texture::white());
        let depth_view = create_depth_view(&gpu.device, width, height);
        let capture_texture = create_capture_texture(&gpu.device, format, width, height);

        Self {
            gpu,
            format,
            width,
            height,
            background: wgpu::Color::WHITE,
            camera_buffer,
            camera_bind_group,
            texture_layout,
            sampler,
            white_texture,
            mesh_pipeline,
            point_pipeline,
            depth_view,
            capture_texture,
            geometries: BTreeMap::new(),
        }
    }

    fn create_render_pipeline(
        device: &wgpu::Device,
        bind_group_layouts: &[&wgpu::BindGroupLayout],
        shader: &wgpu::ShaderModule,
        vertex_layout: wgpu::VertexBufferLayout<'static>,
        topology: wgpu::PrimitiveTopology,
        format: wgpu::TextureFormat,
        label: &str,
    ) -> wgpu::RenderPipeline {
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{} Render Pipeline Layout", label)),
            bind_group_layouts,
            push_constant_ranges: &[],
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&format!("{} Render Pipeline", label)),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: "vs_main",
                buffers: &[vertex_layout],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Sequences are often open surfaces
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        })
    }

    pub fn gpu(&self) -> &GpuContext {
        &self.gpu
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn set_background(&mut self, color: [f32; 3]) {
        self.background = wgpu::Color {
            r: color[0] as f64,
            g: color[1] as f64,
            b: color[2] as f64,
            a: 1.0,
        };
    }

    /// Update camera matrices
    pub fn update_camera(&self, camera: &Camera) {
        let uniform = CameraUniform::from_camera(camera);
        self.gpu.queue.write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(&uniform));
    }

    /// Upload a geometry, replacing any geometry with the same id
    pub fn add_geometry(&mut self, id: usize, geometry: &Geometry) {
        let draws = match geometry {
            Geometry::Mesh(mesh) => mesh_batches(mesh)
                .into_iter()
                .map(|batch| DrawCall::Mesh {
                    buffer: self.gpu.create_buffer_init(
                        "Mesh Vertex Buffer",
                        &batch.vertices,
                        wgpu::BufferUsages::VERTEX,
                    ),
                    count: batch.vertices.len() as u32,
                    texture: batch
                        .material
                        .map(|m| upload_texture(&self.gpu, &self.texture_layout, &self.sampler, &mesh.textures[m])),
                })
                .collect(),
            Geometry::PointCloud(cloud) if cloud.is_empty() => Vec::new(),
            Geometry::PointCloud(cloud) => {
                let vertices = point_vertices(cloud);
                vec![DrawCall::Points {
                    buffer: self
                        .gpu
                        .create_buffer_init("Point Vertex Buffer", &vertices, wgpu::BufferUsages::VERTEX),
                    count: vertices.len() as u32,
                }]
            }
        };
        self.geometries.insert(id, draws);
    }

    /// Drop a geometry's buffers. Returns false when the id was unknown.
    pub fn remove_geometry(&mut self, id: usize) -> bool {
        self.geometries.remove(&id).is_some()
    }

    pub fn geometry_count(&self) -> usize {
        self.geometries.len()
    }

    /// Draw the scene into `view`
    pub fn render(&self, view: &wgpu::TextureView) {
        let mut encoder = self.gpu.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Scene Render Encoder"),
        });
        self.encode_pass(&mut encoder, view);
        self.gpu.queue.submit(std::iter::once(encoder.finish()));
    }

    fn encode_pass(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.background),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
        for draw in self.geometries.values().flatten() {
            match draw {
                DrawCall::Mesh { buffer, count, texture } => {
                    render_pass.set_pipeline(&self.mesh_pipeline);
                    render_pass.set_bind_group(1, texture.as_ref().unwrap_or(&self.white_texture), &[]);
                    render_pass.set_vertex_buffer(0, buffer.slice(..));
                    render_pass.draw(0..*count, 0..1);
                }
                DrawCall::Points { buffer, count } => {
                    render_pass.set_pipeline(&self.point_pipeline);
                    render_pass.set_vertex_buffer(0, buffer.slice(..));
                    render_pass.draw(0..*count, 0..1);
                }
            }
        }
    }

    /// Render off-screen and read the image back as RGB
    pub fn capture(&self) -> Result<Frame> {
        let padded_row_bytes = padded_bytes_per_row(self.width);
        let buffer = self.gpu.create_buffer(
            "Capture Readback Buffer",
            padded_row_bytes as u64 * self.height as u64,
            wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        );

        let view = self.capture_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.gpu.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Capture Encoder"),
        });
        self.encode_pass(&mut encoder, &view);
        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture: &self.capture_texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &buffer,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_row_bytes),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
        self.gpu.queue.submit(std::iter::once(encoder.finish()));

        let data = self.gpu.read_buffer(&buffer)?;
        let bgra = matches!(
            self.format,
            wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb
        );
        Frame::from_padded_rows(self.width, self.height, padded_row_bytes as usize, &data, bgra)
    }
}

/// Row pitch of a readback buffer for an RGBA8 image `width` pixels wide
pub fn padded_bytes_per_row(width: u32) -> u32 {
    let unpadded = width * 4;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}

fn upload_texture(
    gpu: &GpuContext,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    texture: &Texture,
) -> wgpu::BindGroup {
    let size = wgpu::Extent3d {
        width: texture.width.max(1),
        height: texture.height.max(1),
        depth_or_array_layers: 1,
    };
    let gpu_texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Diffuse Texture"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    let expected = size.width as usize * size.height as usize * 4;
    let white;
    let data = if texture.rgba.len() == expected {
        &texture.rgba[..]
    } else {
        log::warn!("texture data does not match its {}x{} size, using white", texture.width, texture.height);
        white = vec![255u8; expected];
        &white[..]
    };

    gpu.queue.write_texture(
        wgpu::ImageCopyTexture {
            texture: &gpu_texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        data,
        wgpu::ImageDataLayout {
            offset: 0,
            bytes_per_row: Some(4 * size.width),
            rows_per_image: Some(size.height),
        },
        size,
    );

    let view = gpu_texture.create_view(&wgpu::TextureViewDescriptor::default());
    gpu.create_bind_group(
        "texture_bind_group",
        layout,
        &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    )
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    device
        .create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
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
        })
        .create_view(&wgpu::TextureViewDescriptor::default())
}

fn create_capture_texture(device: &wgpu::Device, format: wgpu::TextureFormat, width: u32, height: u32) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Capture Texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    })
}
