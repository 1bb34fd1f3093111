//! GPU compute dispatch.
//!
//! One compiled kernel per viewer session, one invocation per pixel into an
//! `rgba32float` storage texture. Pan/zoom never recompiles, it only
//! rewrites the uniform block on the next dispatch.

use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use tracing::{debug, info};

use crate::error::RenderError;
use crate::template::{KernelLayout, KernelSource};

/// Shared GPU device and queue for one process.
pub struct GpuContext {
    device: wgpu::Device,
    queue: wgpu::Queue,
    supports_f64: bool,
}

impl GpuContext {
    /// Acquire an adapter and device, requesting `SHADER_F64` when the
    /// adapter offers it so double-precision kernels can compile.
    pub fn new() -> Result<Self, RenderError> {
        pollster::block_on(async {
            let instance = wgpu::Instance::default();
            let adapter = instance
                .request_adapter(&wgpu::RequestAdapterOptions {
                    power_preference: wgpu::PowerPreference::HighPerformance,
                    compatible_surface: None,
                    force_fallback_adapter: false,
                })
                .await
                .ok_or(RenderError::AdapterNotFound)?;

            let supports_f64 = adapter.features().contains(wgpu::Features::SHADER_F64);
            let required_features = if supports_f64 {
                wgpu::Features::SHADER_F64
            } else {
                wgpu::Features::empty()
            };

            let (device, queue) = adapter
                .request_device(
                    &wgpu::DeviceDescriptor {
                        label: Some("fraxel-device"),
                        required_features,
                        required_limits: wgpu::Limits::default(),
                    },
                    None,
                )
                .await?;

            info!(adapter = %adapter.get_info().name, supports_f64, "GPU device ready");
            Ok(Self {
                device,
                queue,
                supports_f64,
            })
        })
    }

    /// Whether double-precision kernels can run on this device.
    pub fn supports_f64(&self) -> bool {
        self.supports_f64
    }

    /// Set uniforms and run one invocation per target pixel.
    ///
    /// The queue submission acts as the execution/memory barrier: any
    /// subsequent submission that reads the target (readback, blit) is
    /// ordered after this dispatch has fully written the image.
    pub fn dispatch(
        &self,
        kernel: &CompiledKernel,
        target: &RenderTarget,
        uniforms: &KernelUniforms,
    ) -> Result<(), RenderError> {
        if uniforms.layout() != kernel.layout {
            return Err(RenderError::UniformMismatch);
        }

        let uniform_buffer = {
            use wgpu::util::DeviceExt;
            self.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("fraxel-uniforms"),
                    contents: &uniforms.to_bytes(),
                    usage: wgpu::BufferUsages::UNIFORM,
                })
        };

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("fraxel-bind-group"),
            layout: &kernel.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&target.view),
                },
            ],
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("fraxel-dispatch"),
            });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("fraxel-pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&kernel.pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.dispatch_workgroups(target.width, target.height, 1);
        }
        self.queue.submit(Some(encoder.finish()));

        debug!(
            width = target.width,
            height = target.height,
            "dispatched {} invocations",
            target.width as u64 * target.height as u64
        );
        Ok(())
    }

    /// Copy the render target back to the CPU as packed RGBA `f32`s.
    ///
    /// Blocks until the copy (and therefore every dispatch submitted before
    /// it) has completed.
    pub fn read_back(&self, target: &RenderTarget) -> Result<Vec<f32>, RenderError> {
        const BYTES_PER_PIXEL: u32 = 16; // rgba32float

        let unpadded_row = target.width * BYTES_PER_PIXEL;
        let padded_row = unpadded_row.div_ceil(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT)
            * wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let buffer_size = padded_row as u64 * target.height as u64;

        let readback = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("fraxel-readback"),
            size: buffer_size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("fraxel-readback-copy"),
            });
        encoder.copy_texture_to_buffer(
            target.texture.as_image_copy(),
            wgpu::ImageCopyBuffer {
                buffer: &readback,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_row),
                    rows_per_image: Some(target.height),
                },
            },
            wgpu::Extent3d {
                width: target.width,
                height: target.height,
                depth_or_array_layers: 1,
            },
        );
        self.queue.submit(Some(encoder.finish()));

        let slice = readback.slice(..);
        let (sender, receiver) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
        self.device.poll(wgpu::Maintain::Wait);
        receiver
            .recv()
            .map_err(|e| RenderError::Readback(e.to_string()))?
            .map_err(|e| RenderError::Readback(e.to_string()))?;

        let data = slice.get_mapped_range();
        let mut pixels =
            Vec::with_capacity(target.width as usize * target.height as usize * 4);
        for row in 0..target.height {
            let start = (row * padded_row) as usize;
            let end = start + unpadded_row as usize;
            pixels.extend_from_slice(bytemuck::cast_slice(&data[start..end]));
        }
        drop(data);
        readback.unmap();

        Ok(pixels)
    }
}

/// A compiled compute pipeline plus its binding contract.
pub struct CompiledKernel {
    pipeline: wgpu::ComputePipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    layout: KernelLayout,
}

impl CompiledKernel {
    /// Compile and link an assembled kernel source.
    ///
    /// Module and pipeline creation run inside a validation error scope so
    /// a rejected kernel surfaces as [`RenderError::ShaderCompile`] with
    /// the compiler diagnostic, instead of a device loss later. Compile
    /// failure is fatal to the viewer session and indicates a template bug.
    pub fn compile(ctx: &GpuContext, source: &KernelSource) -> Result<Self, RenderError> {
        let device = &ctx.device;
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("fraxel-kernel"),
            source: wgpu::ShaderSource::Wgsl(source.source.as_str().into()),
        });

        let min_uniform_size = match source.layout {
            KernelLayout::Escape => std::mem::size_of::<EscapeUniforms>(),
            KernelLayout::Carpet => std::mem::size_of::<CarpetUniforms>(),
        };

        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("fraxel-bind-group-layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::COMPUTE,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: NonZeroU64::new(min_uniform_size as u64),
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::COMPUTE,
                        ty: wgpu::BindingType::StorageTexture {
                            access: wgpu::StorageTextureAccess::WriteOnly,
                            format: wgpu::TextureFormat::Rgba32Float,
                            view_dimension: wgpu::TextureViewDimension::D2,
                        },
                        count: None,
                    },
                ],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("fraxel-pipeline-layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("fraxel-pipeline"),
            layout: Some(&pipeline_layout),
            module: &module,
            entry_point: "main",
        });

        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(RenderError::ShaderCompile {
                log: err.to_string(),
            });
        }

        Ok(Self {
            pipeline,
            bind_group_layout,
            layout: source.layout,
        })
    }
}

/// The GPU-resident output image, sized to the window resolution.
///
/// Written exclusively by [`GpuContext::dispatch`]; reallocated on window
/// resize, destroyed with the viewer session.
pub struct RenderTarget {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    pub width: u32,
    pub height: u32,
}

impl RenderTarget {
    pub fn new(ctx: &GpuContext, width: u32, height: u32) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions { width, height });
        }
        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("fraxel-target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba32Float,
            usage: wgpu::TextureUsages::STORAGE_BINDING | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Ok(Self {
            texture,
            view,
            width,
            height,
        })
    }
}

// ---------------------------------------------------------------------------
// Uniform blocks
// ---------------------------------------------------------------------------

/// Escape-time uniform block, matching the WGSL `Uniforms` struct layout
/// (`vec2<f32>` members are 8-byte aligned, hence the explicit pad).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct EscapeUniforms {
    max_iter: i32,
    _pad: u32,
    resolution: [f32; 2],
    real_range: [f32; 2],
    imag_range: [f32; 2],
}

/// Sierpinski carpet uniform block.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct CarpetUniforms {
    depth: i32,
    zoom: i32,
    center: [f32; 2],
}

/// Typed uniform values for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KernelUniforms {
    Escape {
        max_iter: u32,
        resolution: (u32, u32),
        real_range: (f64, f64),
        imag_range: (f64, f64),
    },
    Carpet {
        depth: u32,
        zoom: u32,
        center: (f32, f32),
    },
}

impl KernelUniforms {
    pub fn layout(&self) -> KernelLayout {
        match self {
            KernelUniforms::Escape { .. } => KernelLayout::Escape,
            KernelUniforms::Carpet { .. } => KernelLayout::Carpet,
        }
    }

    fn to_bytes(&self) -> Vec<u8> {
        match *self {
            KernelUniforms::Escape {
                max_iter,
                resolution,
                real_range,
                imag_range,
            } => bytemuck::bytes_of(&EscapeUniforms {
                max_iter: max_iter as i32,
                _pad: 0,
                resolution: [resolution.0 as f32, resolution.1 as f32],
                real_range: [real_range.0 as f32, real_range.1 as f32],
                imag_range: [imag_range.0 as f32, imag_range.1 as f32],
            })
            .to_vec(),
            KernelUniforms::Carpet {
                depth,
                zoom,
                center,
            } => bytemuck::bytes_of(&CarpetUniforms {
                depth: depth as i32,
                zoom: zoom as i32,
                center: [center.0, center.1],
            })
            .to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_blocks_match_wgsl_layout() {
        // i32 + pad + three vec2<f32>s.
        assert_eq!(std::mem::size_of::<EscapeUniforms>(), 32);
        // two i32s + one vec2<f32>.
        assert_eq!(std::mem::size_of::<CarpetUniforms>(), 16);
    }

    #[test]
    fn uniform_variant_reports_its_layout() {
        let escape = KernelUniforms::Escape {
            max_iter: 200,
            resolution: (800, 600),
            real_range: (-2.0, 1.0),
            imag_range: (-1.0, 1.0),
        };
        assert_eq!(escape.layout(), KernelLayout::Escape);

        let carpet = KernelUniforms::Carpet {
            depth: 10,
            zoom: 1,
            center: (400.0, 300.0),
        };
        assert_eq!(carpet.layout(), KernelLayout::Carpet);
    }

    #[test]
    fn escape_uniforms_serialize_in_declaration_order() {
        let bytes = KernelUniforms::Escape {
            max_iter: 200,
            resolution: (800, 600),
            real_range: (-2.0, 1.0),
            imag_range: (-1.0, 1.0),
        }
        .to_bytes();
        assert_eq!(bytes.len(), 32);
        assert_eq!(i32::from_le_bytes(bytes[0..4].try_into().unwrap()), 200);
        assert_eq!(
            f32::from_le_bytes(bytes[8..12].try_into().unwrap()),
            800.0
        );
        assert_eq!(
            f32::from_le_bytes(bytes[16..20].try_into().unwrap()),
            -2.0
        );
    }
}
