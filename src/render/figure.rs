use glam::{Mat4, Vec4};

use super::context::GpuContext;
use super::mesh::Mesh;
use super::pipeline::{ScenePipeline, Uniforms};
use crate::camera::Camera;
use crate::lighting::Lighting;
use crate::scene::{MeshData, RenderSink, SceneGraph};

const MAX_INSTANCES: usize = 64;

/// Draws the scene graph: one uniform slot and one indexed draw per visible
/// node, batched into a single render pass.
pub struct FigureRenderer {
    pipeline: ScenePipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    uniform_alignment: u32,
}

struct GpuSink<'a> {
    device: &'a wgpu::Device,
    draws: Vec<(Mat4, Mesh, Vec4)>,
}

impl RenderSink for GpuSink<'_> {
    fn draw(&mut self, world: Mat4, mesh: &MeshData, color: Vec4) {
        if self.draws.len() >= MAX_INSTANCES {
            log::warn!("draw call limit reached, skipping node");
            return;
        }
        self.draws
            .push((world, Mesh::from_data(self.device, mesh), color));
    }
}

impl FigureRenderer {
    pub fn new(context: &GpuContext) -> Self {
        let pipeline = ScenePipeline::new(context);

        let uniform_alignment = context.device.limits().min_uniform_buffer_offset_alignment;
        let aligned_size = Self::align_to(std::mem::size_of::<Uniforms>() as u32, uniform_alignment);
        let buffer_size = (aligned_size as usize * MAX_INSTANCES) as u64;

        let uniform_buffer = context.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Dynamic Uniform Buffer"),
            size: buffer_size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = pipeline.create_dynamic_bind_group(&context.device, &uniform_buffer);

        Self {
            pipeline,
            uniform_buffer,
            bind_group,
            uniform_alignment,
        }
    }

    fn align_to(size: u32, alignment: u32) -> u32 {
        (size + alignment - 1) & !(alignment - 1)
    }

    fn aligned_uniform_size(&self) -> u32 {
        Self::align_to(std::mem::size_of::<Uniforms>() as u32, self.uniform_alignment)
    }

    pub fn render(
        &self,
        context: &GpuContext,
        view: &wgpu::TextureView,
        graph: &SceneGraph,
        camera: &Camera,
        lighting: &Lighting,
    ) {
        let mut sink = GpuSink {
            device: &context.device,
            draws: Vec::new(),
        };
        graph.render(Mat4::IDENTITY, &mut sink);

        let aligned_size = self.aligned_uniform_size() as usize;
        let mut uniform_data = vec![0u8; aligned_size * MAX_INSTANCES];
        for (i, (world, _, color)) in sink.draws.iter().enumerate() {
            let uniforms = Uniforms::new(*world, *color, camera, lighting);
            let offset = i * aligned_size;
            let bytes = bytemuck::bytes_of(&uniforms);
            uniform_data[offset..offset + bytes.len()].copy_from_slice(bytes);
        }

        context
            .queue
            .write_buffer(&self.uniform_buffer, 0, &uniform_data);

        let mut encoder = context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.1,
                            g: 0.1,
                            b: 0.15,
                            a: 1.0,
                        }),
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

            render_pass.set_pipeline(&self.pipeline.pipeline);
            for (i, (_, mesh, _)) in sink.draws.iter().enumerate() {
                let offset = (i * aligned_size) as u32;
                render_pass.set_bind_group(0, &self.bind_group, &[offset]);
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        context.queue.submit(std::iter::once(encoder.finish()));
    }
}
