//! Application handler
//!
//! Owns the window, GPU context, simulation world, and egui overlay, and
//! drives the redraw-synchronous frame loop: input events mutate the world,
//! each redraw ticks the clock, steps the simulation once, and renders the
//! scene followed by the overlay.

use crate::config::AppConfig;
use crate::input::{self, Command};
use crate::scene;
use crate::ui::{self, FpsCounter};
use anyhow::{Context as _, Result};
use liftoff_core::{Mat44, Vec3};
use liftoff_render::{RenderContext, SceneRenderer};
use liftoff_sim::{ExhaustPlume, FrameClock, World, PLUME_CAPACITY};
use std::path::Path;
use std::sync::Arc;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

const FOV_Y_DEGREES: f32 = 60.0;
const NEAR_PLANE: f32 = 0.1;
const FAR_PLANE: f32 = 600.0;

/// Free camera spawn point, looking at the pad from the south
const CAMERA_START: Vec3 = Vec3::new(0.0, 6.0, 26.0);

const SKY_COLOR: wgpu::Color = wgpu::Color {
    r: 0.05,
    g: 0.07,
    b: 0.12,
    a: 1.0,
};

pub struct LiftoffApp {
    config: AppConfig,

    world: World,
    clock: FrameClock,
    fps: FpsCounter,

    window: Option<Arc<Window>>,
    render_context: Option<RenderContext>,
    scene_renderer: Option<SceneRenderer>,
    vehicle_object: usize,

    egui_ctx: egui::Context,
    egui_winit: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
}

impl LiftoffApp {
    pub fn new(config: AppConfig) -> Self {
        let mut world = World::new(Vec3::ZERO, CAMERA_START);
        world.plume = ExhaustPlume::new(config.emission_rate);

        Self {
            config,
            world,
            clock: FrameClock::new(),
            fps: FpsCounter::new(),
            window: None,
            render_context: None,
            scene_renderer: None,
            vehicle_object: 0,
            egui_ctx: egui::Context::default(),
            egui_winit: None,
            egui_renderer: None,
        }
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_attrs = Window::default_attributes()
            .with_title("Liftoff")
            .with_inner_size(PhysicalSize::new(
                self.config.window_width,
                self.config.window_height,
            ));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .context("Failed to create window")?,
        );

        let render_context = pollster::block_on(RenderContext::new(window.clone()))
            .context("Failed to create render context")?;

        let mut scene_renderer = SceneRenderer::new(&render_context, PLUME_CAPACITY);
        let handles = scene::populate(
            &mut scene_renderer,
            &render_context,
            Path::new(&self.config.asset_dir),
        )?;
        self.vehicle_object = handles.vehicle;

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            &render_context.device,
            render_context.config.format,
            None,
            1,
            false,
        );

        self.window = Some(window);
        self.render_context = Some(render_context);
        self.scene_renderer = Some(scene_renderer);
        self.egui_winit = Some(egui_winit);
        self.egui_renderer = Some(egui_renderer);

        log::info!("Initialized, scene ready");
        Ok(())
    }

    fn set_mouse_captured(&mut self, captured: bool) {
        self.world.camera.set_mouse_captured(captured);
        if let Some(window) = &self.window {
            window.set_cursor_visible(!captured);
        }
    }

    fn run_command(&mut self, command: Command) {
        match command {
            Command::Launch => self.world.animation.launch(),
            Command::TogglePause => self.world.animation.toggle_pause(),
            Command::Reset => self.world.animation.reset(),
            Command::SetMode(mode) => self.world.camera.mode = mode,
        }
    }

    /// One frame: advance the clock, step the world, render
    fn frame(&mut self) {
        self.clock.tick();
        let dt = self.clock.delta_seconds();
        self.fps.update(dt);
        self.world.step(dt);
        self.render();
    }

    fn render(&mut self) {
        let output = {
            let Some(context) = &self.render_context else {
                return;
            };
            match context.surface.get_current_texture() {
                Ok(output) => output,
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    return;
                }
                Err(e) => {
                    log::error!("Surface error: {e:?}");
                    return;
                }
            }
        };
        let target_view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.render_scene(&target_view);
        self.render_egui(&target_view);

        output.present();
    }

    fn render_scene(&mut self, target_view: &wgpu::TextureView) {
        let (Some(context), Some(renderer)) = (&self.render_context, &mut self.scene_renderer)
        else {
            return;
        };

        let model = self.world.vehicle_transform();
        renderer.set_transform(self.vehicle_object, model);
        renderer.lights.set_points(&scene::bulb_lights(&model));

        let (view, camera_pos) = self.world.view();
        let proj = Mat44::perspective(
            FOV_Y_DEGREES.to_radians(),
            context.aspect_ratio(),
            NEAR_PLANE,
            FAR_PLANE,
        );
        let view_proj = proj.mul(&view);

        renderer.prepare_frame(
            &context.queue,
            &view,
            &view_proj,
            camera_pos,
            self.world.plume.gathered(),
        );

        let mut encoder = context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(SKY_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &context.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            renderer.draw(&mut pass);
        }

        context.queue.submit(std::iter::once(encoder.finish()));
    }

    fn render_egui(&mut self, target_view: &wgpu::TextureView) {
        let (Some(window), Some(context), Some(egui_winit)) = (
            &self.window,
            &self.render_context,
            &mut self.egui_winit,
        ) else {
            return;
        };

        let raw_input = egui_winit.take_egui_input(window);
        let fps = self.fps.fps();
        let world = &mut self.world;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            ui::draw(ctx, world, fps);
        });

        egui_winit.handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [context.config.width, context.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        let Some(egui_renderer) = &mut self.egui_renderer else {
            return;
        };

        let mut encoder = context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui Encoder"),
            });

        for (id, image_delta) in &full_output.textures_delta.set {
            egui_renderer.update_texture(&context.device, &context.queue, *id, image_delta);
        }

        egui_renderer.update_buffers(
            &context.device,
            &context.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        {
            let pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let mut pass = pass.forget_lifetime();
            egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
        }

        context.queue.submit(std::iter::once(encoder.finish()));

        for id in &full_output.textures_delta.free {
            egui_renderer.free_texture(id);
        }
    }
}

impl ApplicationHandler for LiftoffApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.initialize(event_loop) {
                log::error!("Failed to initialize: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // egui sees events first, except while the camera holds the mouse
        if !self.world.camera.mouse_captured() {
            if let (Some(egui_winit), Some(window)) = (&mut self.egui_winit, &self.window) {
                let response = egui_winit.on_window_event(window, &event);
                if response.consumed {
                    return;
                }
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                if let Some(context) = &mut self.render_context {
                    context.resize(new_size);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    let pressed = event.state == ElementState::Pressed;

                    if input::update_intents(&mut self.world.camera.intents, code, pressed) {
                        return;
                    }

                    if pressed && !event.repeat {
                        if code == KeyCode::Escape {
                            if self.world.camera.mouse_captured() {
                                self.set_mouse_captured(false);
                            } else {
                                event_loop.exit();
                            }
                            return;
                        }
                        if let Some(command) = input::command_for(code) {
                            self.run_command(command);
                        }
                    }
                }
            }

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Right,
                ..
            } => {
                self.set_mouse_captured(state == ElementState::Pressed);
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.world
                    .camera
                    .apply_mouse_look(position.x as f32, position.y as f32);
            }

            WindowEvent::RedrawRequested => {
                self.frame();
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
