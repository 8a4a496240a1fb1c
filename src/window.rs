//! Window and event loop plumbing.
//!
//! Drives the scene from winit's event loop: one update-and-render per
//! redraw, with continuous redraw requests. The scene itself stays
//! renderer-agnostic; this layer only shuttles time, zoom, and buffers.

use crate::gpu::GpuState;
use crate::scene::TreeScene;
use crate::signal::SignalStatus;
use crate::time::Time;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::{MouseScrollDelta, WindowEvent},
    event_loop::ActiveEventLoop,
    window::{Window, WindowId},
};

pub struct App {
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    scene: TreeScene,
    time: Time,
    last_status: SignalStatus,
}

impl App {
    pub fn new(scene: TreeScene) -> Self {
        Self {
            window: None,
            gpu: None,
            scene,
            time: Time::new(),
            last_status: SignalStatus::Idle,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title("treeform")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                eprintln!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());

        match pollster::block_on(GpuState::new(window, self.scene.populations())) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(e) => {
                eprintln!("{}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(physical_size);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.1,
                };
                self.scene.zoom_by(scroll * 0.3);
            }
            WindowEvent::RedrawRequested => {
                let (elapsed, delta) = self.time.update();
                self.scene.update(elapsed, delta);

                let status = self.scene.status();
                if status != self.last_status {
                    println!("Signal: {}", status.as_str());
                    self.last_status = status;
                }

                if let Some(gpu) = &mut self.gpu {
                    let view_proj = self.scene.view_proj(gpu.aspect());
                    match gpu.render(view_proj, elapsed, self.scene.populations()) {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost) => {
                            gpu.resize(winit::dpi::PhysicalSize {
                                width: gpu.config.width,
                                height: gpu.config.height,
                            })
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => event_loop.exit(),
                        Err(e) => eprintln!("Render error: {:?}", e),
                    }
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}
