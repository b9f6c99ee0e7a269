use bytemuck::{Pod, Zeroable};
use winit::dpi::PhysicalSize;

use crate::camera::Camera;
use crate::ember::params::RenderParameters;
use crate::ember::scene::{Material, Scene, Sphere};

/// 커널의 구 배열 크기. 넘치는 구는 조용히 잘라냄.
pub const MAX_SPHERES: usize = 512;
/// 세로 시야각 (도)
pub const VERTICAL_FOV: f32 = 20.0;

/// shader.wgsl의 `Sphere`와 같은 배치 (48 bytes)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Zeroable, Pod)]
pub struct GpuSphere {
    pub center: [f32; 3],
    pub radius: f32,
    pub albedo: [f32; 3],
    pub fuzz: f32,
    pub kind: u32,
    pub refractive_index: f32,
    pub _padding: [f32; 2],
}

impl From<&Sphere> for GpuSphere {
    fn from(sphere: &Sphere) -> Self {
        let (albedo, fuzz, refractive_index): ([f32; 3], f32, f32) = match sphere.material {
            Material::Diffuse { albedo } => (albedo.into(), 0.0, 1.0),
            Material::Reflective { albedo, fuzz } => (albedo.into(), fuzz, 1.0),
            Material::Refractive { refractive_index } => ([1.0; 3], 0.0, refractive_index),
        };

        Self {
            center: sphere.center.coords.into(),
            radius: sphere.radius,
            albedo,
            fuzz,
            kind: sphere.material.kind(),
            refractive_index,
            _padding: [0.0; 2],
        }
    }
}

/// shader.wgsl의 `Frame` 유니폼과 같은 배치 (80 bytes)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Zeroable, Pod)]
pub struct FrameUniforms {
    pub origin: [f32; 3],
    pub vfov: f32,
    pub look_at: [f32; 3],
    pub focus_distance: f32,
    pub up: [f32; 3],
    pub defocus_angle: f32,
    pub resolution: [f32; 2],
    pub max_depth: u32,
    pub frame_index: u32,
    pub sphere_count: u32,
    pub _padding: [u32; 3],
}

/// 한 프레임 동안 커널로 넘길 값 묶음
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub uniforms: FrameUniforms,
    pub spheres: &'a [GpuSphere],
}

/// 씬은 변하지 않으니 처음에 한 번만 펼쳐두고, 매 프레임 카메라와 파라미터만 새로 채움
pub struct FramePublisher {
    spheres: Vec<GpuSphere>,
    frame_index: u32,
}

impl FramePublisher {
    pub fn new(scene: &Scene) -> Self {
        if scene.len() > MAX_SPHERES {
            log::warn!(
                "scene has {} spheres, only the first {} are sent to the GPU",
                scene.len(),
                MAX_SPHERES
            );
        }

        let spheres = scene
            .spheres
            .iter()
            .take(MAX_SPHERES)
            .map(GpuSphere::from)
            .collect();

        Self {
            spheres,
            frame_index: 0,
        }
    }

    pub fn sphere_count(&self) -> usize {
        self.spheres.len()
    }

    pub fn frame_index(&self) -> u32 {
        self.frame_index
    }

    pub fn publish(
        &mut self,
        camera: &Camera,
        params: &RenderParameters,
        size: PhysicalSize<u32>,
    ) -> Frame<'_> {
        let uniforms = FrameUniforms {
            origin: camera.position.coords.into(),
            vfov: VERTICAL_FOV,
            look_at: camera.target().coords.into(),
            focus_distance: params.focus_distance(),
            up: camera.up().into_inner().into(),
            defocus_angle: params.defocus_angle(),
            resolution: [size.width as f32, size.height as f32],
            max_depth: params.max_depth(),
            frame_index: self.frame_index,
            sphere_count: self.spheres.len() as u32,
            _padding: [0; 3],
        };
        self.frame_index = self.frame_index.wrapping_add(1);

        Frame {
            uniforms,
            spheres: &self.spheres,
        }
    }
}
