use std::iter;

use anyhow::{Context, Result};
use eframe::egui::{self, ClippedPrimitive, TextureId};
use nalgebra::Point3;
use wgpu::{
    Backends, Color, CommandBuffer, CommandEncoder, CommandEncoderDescriptor, CompositeAlphaMode,
    Device, DeviceDescriptor, Dx12Compiler, Features, Instance, InstanceDescriptor, Limits, LoadOp,
    Operations, PowerPreference, PresentMode, Queue, RenderPassColorAttachment,
    RenderPassDescriptor, RequestAdapterOptions, Surface, SurfaceConfiguration, SurfaceError,
    TextureUsages, TextureViewDescriptor,
};
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::EventLoop;
use winit::window::Window;

use crate::ember::frame::Frame;
use crate::ember::Ember;

/// 오른쪽 패널에 보여줄 값들. 패널은 보여주기만 하고 아무것도 바꾸지 않음.
#[derive(Debug, Clone, Copy)]
pub struct Hud {
    pub fps: f32,
    pub position: Point3<f32>,
    pub yaw: f32,
    pub pitch: f32,
    pub focus_distance: f32,
    pub defocus_angle: f32,
    pub max_depth: u32,
    pub sphere_count: usize,
    pub grabbing: bool,
}

struct EguiFrame {
    primitives: Vec<ClippedPrimitive>,
    commands: Vec<CommandBuffer>,
    freed: Vec<TextureId>,
}

pub struct Application {
    surface: Surface,
    device: Device,
    queue: Queue,
    config: SurfaceConfiguration,
    pub size: PhysicalSize<u32>,
    // surface보다 오래 살아야 하므로 여기서 소유
    pub window: Window,
    ember: Ember,
    egui_state: egui_winit::State,
    egui_context: egui::Context,
    egui_renderer: egui_wgpu::Renderer,
    egui_screen: egui_wgpu::renderer::ScreenDescriptor,
}

impl Application {
    pub async fn new(window: Window, event_loop: &EventLoop<()>) -> Result<Self> {
        let size = window.inner_size();
        let size = PhysicalSize::new(size.width.max(1), size.height.max(1));

        // 가능한 모든 백엔드 중에서 고름
        let instance = Instance::new(InstanceDescriptor {
            backends: Backends::all(),
            dx12_shader_compiler: Dx12Compiler::default(),
        });

        // SAFETY: window는 Application 안에서 surface와 같이 살고 같이 죽음
        let surface = unsafe { instance.create_surface(&window) }
            .context("Could not create a surface for the window")?;

        let adapter = instance
            .request_adapter(&RequestAdapterOptions {
                power_preference: PowerPreference::HighPerformance,
                force_fallback_adapter: false,
                compatible_surface: Some(&surface),
            })
            .await
            .context("Could not find a GPU adapter compatible with the window")?;

        let info = adapter.get_info();
        log::info!("Using adapter {} ({:?}, {:?})", info.name, info.device_type, info.backend);

        // 구 배열 유니폼이 24 KiB라 기본 limits(64 KiB)로 충분함
        let (device, queue) = adapter
            .request_device(
                &DeviceDescriptor {
                    features: Features::empty(),
                    limits: Limits::default(),
                    label: Some("Ember GPU"),
                },
                None,
            )
            .await
            .context("Could not open the GPU device")?;

        let capabilities = surface.get_capabilities(&adapter);

        // sRGB 포맷이 있으면 그걸로. 셰이더는 선형 색을 내보냄.
        let surface_format = capabilities
            .formats
            .iter()
            .find(|format| format.is_srgb())
            .or_else(|| capabilities.formats.first())
            .copied()
            .context("Surface reports no supported formats")?;
        let config = SurfaceConfiguration {
            usage: TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: PresentMode::AutoVsync,
            alpha_mode: CompositeAlphaMode::Auto,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let ember = Ember::new(&device, surface_format);

        // egui는 같은 surface 위에 패널만 덧그림
        let egui_state = egui_winit::State::new(event_loop);
        let egui_context = egui::Context::default();
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1);
        let egui_screen = egui_wgpu::renderer::ScreenDescriptor {
            size_in_pixels: [config.width, config.height],
            pixels_per_point: window.scale_factor() as f32,
        };

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            window,
            ember,
            egui_state,
            egui_context,
            egui_renderer,
            egui_screen,
        })
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        // 최소화하면 0이 들어옴
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }

        self.size = new_size;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);

        self.egui_screen.pixels_per_point = self.window.scale_factor() as f32;
        self.egui_screen.size_in_pixels = [self.config.width, self.config.height];
    }

    /// surface를 잃어버렸을 때 현재 크기로 다시 설정
    pub fn reconfigure(&mut self) {
        self.resize(self.size);
    }

    pub fn render(&mut self, frame: &Frame, hud: &Hud) -> Result<(), SurfaceError> {
        // 커널에 넘길 값부터 올리고
        self.ember.upload(&self.queue, frame);

        let output = self.surface.get_current_texture()?;
        let view = output.texture.create_view(&TextureViewDescriptor::default());
        let mut encoder = self.device.create_command_encoder(&CommandEncoderDescriptor {
            label: Some("Encoder"),
        });

        let egui_frame = self.update_egui(&mut encoder, hud);
        {
            let mut render_pass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(Color::BLACK),
                        store: true,
                    },
                })],
                depth_stencil_attachment: None,
            });

            // 레이 트레이싱 사각형 먼저, 그 위에 패널
            self.ember.draw(&mut render_pass);
            self.egui_renderer
                .render(&mut render_pass, &egui_frame.primitives, &self.egui_screen);
        }

        // egui 버퍼 업데이트가 렌더 패스보다 먼저 실행돼야 함
        self.queue.submit(
            egui_frame
                .commands
                .into_iter()
                .chain(iter::once(encoder.finish())),
        );
        output.present();

        // 다 그린 뒤에 텍스처 해제
        for id in &egui_frame.freed {
            self.egui_renderer.free_texture(id);
        }

        Ok(())
    }

    // true면 egui가 입력을 가져감
    pub fn input(&mut self, event: &WindowEvent) -> bool {
        self.egui_state.on_event(&self.egui_context, event).consumed
    }

    fn update_egui(&mut self, encoder: &mut CommandEncoder, hud: &Hud) -> EguiFrame {
        let egui_input = self.egui_state.take_egui_input(&self.window);
        let egui_output = self.egui_context.run(egui_input, |ctx| {
            egui::SidePanel::right("Side Menu")
                .resizable(false)
                .default_width(180.0)
                .show(ctx, |ui| {
                    ui.heading("Ember");
                    ui.label(format!("{:.1} fps", hud.fps));
                    ui.label(format!("{} spheres", hud.sphere_count));
                    ui.separator();

                    ui.label(format!(
                        "pos ({:.2}, {:.2}, {:.2})",
                        hud.position.x, hud.position.y, hud.position.z
                    ));
                    ui.label(format!("yaw {:.1}  pitch {:.1}", hud.yaw, hud.pitch));
                    ui.separator();

                    ui.label(format!("focus {:.2}  [Up/Down]", hud.focus_distance));
                    ui.label(format!("defocus {:.2}  [Left/Right]", hud.defocus_angle));
                    ui.label(format!("depth {}  [ [ / ] ]", hud.max_depth));
                    ui.separator();

                    ui.label("WASD move, mouse look");
                    ui.label(if hud.grabbing {
                        "C release mouse"
                    } else {
                        "C capture mouse"
                    });
                    ui.label("Esc quit");
                });
        });

        self.egui_state.handle_platform_output(
            &self.window,
            &self.egui_context,
            egui_output.platform_output,
        );
        let primitives = self.egui_context.tessellate(egui_output.shapes);
        for (id, delta) in &egui_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, delta);
        }

        let commands = self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            encoder,
            &primitives,
            &self.egui_screen,
        );

        EguiFrame {
            primitives,
            commands,
            freed: egui_output.textures_delta.free,
        }
    }
}
