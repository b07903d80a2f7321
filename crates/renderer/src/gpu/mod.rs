//! GPU plumbing for the color-field renderer.
//!
//! - `context` owns wgpu instance/device/surface wiring and knows how to
//!   rebuild swapchain state when the window resizes.
//! - `pipeline` compiles the embedded GLSL pair into a single render
//!   pipeline with one uniform bind group.
//! - `uniforms` mirrors the shader's std140 uniform block and is rewritten
//!   through the queue each frame.
//! - `state` glues everything together and exposes the `GpuState` API used
//!   by `window`.

mod context;
mod pipeline;
mod state;
mod uniforms;

pub(crate) use state::GpuState;
