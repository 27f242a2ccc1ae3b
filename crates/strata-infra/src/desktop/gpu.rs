// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Presenting software frames through a `wgpu` surface.

use crate::software::FramePresenter;
use anyhow::{anyhow, Result};
use std::sync::Arc;
use strata_core::platform::{AccelerationContext, PlatformError};
use wgpu::{Instance, TextureFormat};
use winit::window::Window;

/// Uploads each finished software frame into the window's swapchain.
///
/// When the surface cannot be written directly, the frame's top-left pixel is
/// used as a clear color so the window still reflects the clear.
pub struct WgpuPresenter {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    can_copy: bool,
    swizzle: bool,
    adapter_name: String,
}

impl WgpuPresenter {
    /// Creates a surface, device and queue for `window`.
    ///
    /// ## Arguments
    /// * `instance` - The shared `wgpu::Instance`.
    /// * `window` - The window to present into.
    ///
    /// ## Returns
    /// * `Result<Self>` - The presenter, or an error if no adapter or device is available.
    pub fn new(instance: &Instance, window: Arc<Window>) -> Result<Self> {
        log::info!("Initializing WGPU presenter for window {:?}...", window.id());

        let surface = instance
            .create_surface(Arc::clone(&window))
            .map_err(|e| anyhow!("Failed to create surface: {}", e))?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .map_err(|e| anyhow!("No suitable graphics adapter: {}", e))?;
        let adapter_info = adapter.get_info();
        log::info!(
            "Using graphics adapter: \"{}\" (Backend: {:?})",
            adapter_info.name,
            adapter_info.backend
        );

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("Strata Presenter Device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_defaults(),
            memory_hints: wgpu::MemoryHints::default(),
            trace: wgpu::Trace::default(),
        }))
        .map_err(|e| anyhow!("Failed to create logical device: {}", e))?;

        device.on_uncaptured_error(Box::new(|e| {
            log::error!("WGPU Uncaptured Error: {e:?}");
        }));

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| is_rgba8(*f) || is_bgra8(*f))
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow!("Surface reports no formats"))?;
        let can_copy =
            caps.usages.contains(wgpu::TextureUsages::COPY_DST) && (is_rgba8(format) || is_bgra8(format));
        if !can_copy {
            log::warn!("Surface format {format:?} cannot be written directly; frames will show their clear color only.");
        }

        let mut usage = wgpu::TextureUsages::RENDER_ATTACHMENT;
        if can_copy {
            usage |= wgpu::TextureUsages::COPY_DST;
        }
        let size = window.inner_size();
        let config = wgpu::SurfaceConfiguration {
            usage,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            can_copy,
            swizzle: is_bgra8(format),
            adapter_name: adapter_info.name,
        })
    }

    /// Name of the adapter backing this presenter.
    pub fn adapter_name(&self) -> &str {
        &self.adapter_name
    }

    fn reconfigure_to_window(&mut self) {
        let size = self.window.inner_size();
        if size.width == 0 || size.height == 0 {
            return;
        }
        if (size.width, size.height) != (self.config.width, self.config.height) {
            self.config.width = size.width;
            self.config.height = size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    fn acquire(&mut self) -> Option<wgpu::SurfaceTexture> {
        match self.surface.get_current_texture() {
            Ok(texture) => Some(texture),
            Err(e @ wgpu::SurfaceError::Lost) | Err(e @ wgpu::SurfaceError::Outdated) => {
                log::warn!("Swapchain surface lost or outdated ({e:?}). Reconfiguring.");
                self.surface.configure(&self.device, &self.config);
                self.surface.get_current_texture().ok()
            }
            Err(e) => {
                log::error!("Failed to acquire swapchain frame: {e:?}");
                None
            }
        }
    }

    fn upload(&self, target: &wgpu::Texture, width: u32, height: u32, rgba: &[u8]) {
        let copy_width = width.min(self.config.width);
        let copy_height = height.min(self.config.height);
        if copy_width == 0 || copy_height == 0 {
            return;
        }
        let data = if self.swizzle {
            swap_red_blue(rgba)
        } else {
            rgba.to_vec()
        };
        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: target,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width: copy_width,
                height: copy_height,
                depth_or_array_layers: 1,
            },
        );
    }

    fn clear(&self, target: &wgpu::Texture, rgba: &[u8]) {
        let channel = |i: usize| f64::from(rgba.get(i).copied().unwrap_or(0)) / 255.0;
        let color = wgpu::Color {
            r: channel(0),
            g: channel(1),
            b: channel(2),
            a: 1.0,
        };
        let view = target.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Strata Clear Encoder"),
            });
        {
            let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Strata Clear Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                ..Default::default()
            });
        }
        self.queue.submit(std::iter::once(encoder.finish()));
    }
}

impl FramePresenter for WgpuPresenter {
    fn present(&mut self, width: u32, height: u32, rgba: &[u8]) {
        self.reconfigure_to_window();
        let Some(frame) = self.acquire() else {
            return;
        };
        if self.can_copy {
            self.upload(&frame.texture, width, height, rgba);
            self.queue.submit(std::iter::empty());
        } else {
            self.clear(&frame.texture, rgba);
        }
        self.window.pre_present_notify();
        frame.present();
    }

    fn resize(&mut self, _width: u32, _height: u32) {
        self.reconfigure_to_window();
    }
}

/// The acceleration context of a `wgpu`-presented window.
#[derive(Debug)]
pub struct GpuAcceleration {
    adapter_name: String,
}

impl GpuAcceleration {
    /// Describes the adapter a presenter runs on.
    pub fn new(adapter_name: impl Into<String>) -> Self {
        Self {
            adapter_name: adapter_name.into(),
        }
    }
}

impl AccelerationContext for GpuAcceleration {
    fn make_current(&mut self) -> Result<(), PlatformError> {
        // wgpu devices are not bound to threads.
        Ok(())
    }

    fn label(&self) -> String {
        format!("wgpu ({})", self.adapter_name)
    }
}

fn is_rgba8(format: TextureFormat) -> bool {
    matches!(format, TextureFormat::Rgba8Unorm | TextureFormat::Rgba8UnormSrgb)
}

fn is_bgra8(format: TextureFormat) -> bool {
    matches!(format, TextureFormat::Bgra8Unorm | TextureFormat::Bgra8UnormSrgb)
}

fn swap_red_blue(rgba: &[u8]) -> Vec<u8> {
    rgba.chunks_exact(4)
        .flat_map(|p| [p[2], p[1], p[0], p[3]])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swizzle_swaps_red_and_blue() {
        assert_eq!(swap_red_blue(&[1, 2, 3, 4, 5, 6, 7, 8]), vec![3, 2, 1, 4, 7, 6, 5, 8]);
    }

    #[test]
    fn format_families() {
        assert!(is_rgba8(TextureFormat::Rgba8UnormSrgb));
        assert!(is_bgra8(TextureFormat::Bgra8Unorm));
        assert!(!is_rgba8(TextureFormat::Rgba16Float));
    }

    #[test]
    fn acceleration_label_names_the_adapter() {
        let mut ctx = GpuAcceleration::new("Test GPU");
        assert!(ctx.make_current().is_ok());
        assert_eq!(ctx.label(), "wgpu (Test GPU)");
    }
}
