use std::time::{Duration, Instant};

use anyhow::Result;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use tracing::debug;
use winit::dpi::{PhysicalPosition, PhysicalSize};

use crate::pointer::PointerTracker;
use crate::runtime::TimeSample;
use crate::types::{FieldOptions, RendererConfig};

use super::context::GpuContext;
use super::pipeline::ShaderPipeline;
use super::uniforms::FieldUniforms;

struct MultisampleTarget {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl MultisampleTarget {
    fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        size: PhysicalSize<u32>,
        sample_count: u32,
    ) -> Self {
        let extent = wgpu::Extent3d {
            width: size.width.max(1),
            height: size.height.max(1),
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("msaa color target"),
            size: extent,
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }
}

/// Aggregates every GPU resource needed to present a frame, plus the
/// per-frame state the uniforms are derived from.
///
/// All of it is torn down together when the instance drops; nothing
/// persists across mounts.
pub(crate) struct GpuState {
    context: GpuContext,
    pipeline: ShaderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    uniforms: FieldUniforms,
    options: FieldOptions,
    pointer: PointerTracker,
    multisample_target: Option<MultisampleTarget>,
    last_frame_time: Instant,
    frame_count: u32,
    last_fps_update: Instant,
    frames_since_last_update: u32,
}

impl GpuState {
    pub(crate) fn new<T>(
        target: &T,
        initial_size: PhysicalSize<u32>,
        config: &RendererConfig,
    ) -> Result<Self>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        let context = GpuContext::new(target, initial_size, config.antialiasing)?;
        let pipeline = ShaderPipeline::new(
            &context.device,
            context.surface_format,
            context.sample_count,
        )?;

        let uniform_buffer = context.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("field uniform buffer"),
            size: std::mem::size_of::<FieldUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_bind_group = context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("field uniform bind group"),
                layout: &pipeline.uniform_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                }],
            });

        let uniforms = FieldUniforms::new(
            context.size.width,
            context.size.height,
            &config.palette,
            &config.options,
        );
        context
            .queue
            .write_buffer(&uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        let multisample_target = if context.sample_count > 1 {
            Some(MultisampleTarget::new(
                &context.device,
                context.surface_format,
                context.size,
                context.sample_count,
            ))
        } else {
            None
        };

        let now = Instant::now();
        Ok(Self {
            context,
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            uniforms,
            options: config.options,
            pointer: PointerTracker::default(),
            multisample_target,
            last_frame_time: now,
            frame_count: 0,
            last_fps_update: now,
            frames_since_last_update: 0,
        })
    }

    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.context.size
    }

    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.context.resize(new_size);
        self.uniforms
            .set_canvas(new_size.width as f32, new_size.height as f32);
        self.multisample_target = if self.context.sample_count > 1 {
            Some(MultisampleTarget::new(
                &self.context.device,
                self.context.surface_format,
                self.context.size,
                self.context.sample_count,
            ))
        } else {
            None
        };
    }

    /// Feeds a cursor position (window coordinates) into the pointer
    /// smoothing target. The render itself is not touched; the next frame
    /// picks the change up.
    pub(crate) fn handle_cursor_moved(&mut self, position: PhysicalPosition<f64>) {
        self.pointer.handle_cursor_moved(position, self.context.size);
    }

    /// Renders one frame: advances time and the smoothed pointer, derives
    /// the rotation vector, uploads uniforms, and draws the full-surface
    /// triangle.
    pub(crate) fn render(&mut self, time_sample: TimeSample) -> Result<(), wgpu::SurfaceError> {
        let frame = self.context.surface.get_current_texture()?;

        let now = Instant::now();
        if self.frame_count == 0 {
            self.last_frame_time = now;
        }
        let dt = now.duration_since(self.last_frame_time).as_secs_f32();
        self.last_frame_time = now;
        self.frame_count = self.frame_count.saturating_add(1);

        // A Still policy freezes the field time; the pointer keeps easing
        // on wall-clock dt either way.
        let seconds = time_sample.seconds;

        self.pointer.advance(dt);
        self.uniforms.set_pointer(self.pointer.as_uniform());
        self.uniforms.set_time(seconds);
        self.uniforms
            .set_rotation_degrees(self.options.rotation_at(seconds));

        self.frames_since_last_update += 1;
        let since_fps_update = now.saturating_duration_since(self.last_fps_update);
        if since_fps_update >= Duration::from_secs(1) {
            debug!(
                fps = (self.frames_since_last_update as f32 / since_fps_update.as_secs_f32())
                    .round(),
                frame_count = self.frame_count,
                time = seconds,
                "render stats"
            );
            self.frames_since_last_update = 0;
            self.last_fps_update = now;
        }

        self.context.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&self.uniforms),
        );

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("field encoder"),
                });

        let (attachment_view, resolve_target) = if let Some(msaa) = self.multisample_target.as_ref()
        {
            (&msaa.view, Some(&view))
        } else {
            (&view, None)
        };
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("field pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: attachment_view,
                    depth_slice: None,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_pipeline(&self.pipeline.pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            render_pass.draw(0..3, 0..1);
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}
