use bytemuck::{cast_slice, Pod, Zeroable};
use wgpu::util::{BufferInitDescriptor, DeviceExt};
use wgpu::{
    BindGroup, BindGroupDescriptor, BindGroupEntry, BindGroupLayoutDescriptor,
    BindGroupLayoutEntry, BindingType, BlendState, Buffer, BufferAddress, BufferBindingType,
    BufferDescriptor, BufferUsages, ColorTargetState, ColorWrites, Device, FragmentState,
    FrontFace, IndexFormat, MultisampleState, PipelineLayoutDescriptor, PolygonMode,
    PrimitiveState, PrimitiveTopology, Queue, RenderPass, RenderPipeline,
    RenderPipelineDescriptor, ShaderStages, TextureFormat, VertexAttribute, VertexBufferLayout,
    VertexFormat, VertexState, VertexStepMode,
};

use crate::ember::frame::{Frame, FrameUniforms, GpuSphere, MAX_SPHERES};

pub mod frame;
pub mod params;
pub mod scene;

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Zeroable, Pod)]
struct Vertex {
    position: [f32; 2],
}

impl Vertex {
    const ATTRIBUTES: [VertexAttribute; 1] = [VertexAttribute {
        format: VertexFormat::Float32x2,
        offset: 0,
        shader_location: 0,
    }];

    fn layout() -> VertexBufferLayout<'static> {
        VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as BufferAddress,
            step_mode: VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

// 화면 전체를 덮는 사각형
const VERTICES: [Vertex; 4] = [
    Vertex { position: [-1.0, 1.0] },  // 왼쪽 위
    Vertex { position: [1.0, 1.0] },   // 오른쪽 위
    Vertex { position: [1.0, -1.0] },  // 오른쪽 아래
    Vertex { position: [-1.0, -1.0] }, // 왼쪽 아래
];
const INDICES: [u16; 6] = [0, 1, 2, 2, 3, 0];

/// GPU 쪽 레이 트레이싱 커널을 돌리는 데 필요한 것들
pub struct Ember {
    pipeline: RenderPipeline,
    vertex_buffer: Buffer,
    index_buffer: Buffer,
    frame_buffer: Buffer,
    sphere_buffer: Buffer,
    bind_group: BindGroup,
}

impl Ember {
    pub fn new(device: &Device, format: TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::include_wgsl!("shader.wgsl"));

        let vertex_buffer = device.create_buffer_init(&BufferInitDescriptor {
            label: Some("Ember Quad Vertices"),
            contents: cast_slice(&VERTICES),
            usage: BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&BufferInitDescriptor {
            label: Some("Ember Quad Indices"),
            contents: cast_slice(&INDICES),
            usage: BufferUsages::INDEX,
        });

        // 매 프레임 queue.write_buffer로 덮어씀
        let frame_buffer = device.create_buffer(&BufferDescriptor {
            label: Some("Ember Frame Uniforms"),
            size: std::mem::size_of::<FrameUniforms>() as BufferAddress,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let sphere_buffer = device.create_buffer(&BufferDescriptor {
            label: Some("Ember Spheres"),
            size: (std::mem::size_of::<GpuSphere>() * MAX_SPHERES) as BufferAddress,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_entry = |binding| BindGroupLayoutEntry {
            binding,
            visibility: ShaderStages::FRAGMENT,
            ty: BindingType::Buffer {
                ty: BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };
        let bind_group_layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("Ember Bind Group Layout"),
            entries: &[uniform_entry(0), uniform_entry(1)],
        });

        let bind_group = device.create_bind_group(&BindGroupDescriptor {
            label: Some("Ember Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                BindGroupEntry {
                    binding: 0,
                    resource: frame_buffer.as_entire_binding(),
                },
                BindGroupEntry {
                    binding: 1,
                    resource: sphere_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("Ember Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some("Ember Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[Vertex::layout()],
            },
            fragment: Some(FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(ColorTargetState {
                    format,
                    blend: Some(BlendState::ALPHA_BLENDING),
                    write_mask: ColorWrites::ALL,
                })],
            }),
            primitive: PrimitiveState {
                topology: PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: FrontFace::Ccw,
                cull_mode: None, // 사각형 감는 방향이 시계방향이라 컬링 안 함
                unclipped_depth: false,
                polygon_mode: PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: None,
            multisample: MultisampleState::default(),
            multiview: None,
        });

        Self {
            pipeline,
            vertex_buffer,
            index_buffer,
            frame_buffer,
            sphere_buffer,
            bind_group,
        }
    }

    /// 이번 프레임 값들을 GPU로 올림. 결과는 기다리지 않음.
    pub fn upload(&self, queue: &Queue, frame: &Frame) {
        queue.write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&frame.uniforms));

        let spheres = &frame.spheres[..frame.spheres.len().min(MAX_SPHERES)];
        if !spheres.is_empty() {
            queue.write_buffer(&self.sphere_buffer, 0, cast_slice(spheres));
        }
    }

    pub fn draw<'a>(&'a self, render_pass: &mut RenderPass<'a>) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), IndexFormat::Uint16);
        render_pass.draw_indexed(0..INDICES.len() as u32, 0, 0..1);
    }
}
