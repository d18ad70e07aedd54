//! A drawable unit: vertex and index buffers plus the layout and draw parameters

use crate::backend::{BufferUsage, DrawCall, GpuBackend};
use crate::buffer::{AttributeLayout, DrawDescriptor, IndexData, VertexData};
use crate::error::RenderError;

/// Owns one vertex buffer and one index buffer on backend `B`.
///
/// Both buffers are released when the renderable is dropped. Layout and
/// index range are checked at upload, so `draw` cannot fail.
pub struct Renderable<B: GpuBackend> {
    label: String,
    vertex_buffer: B::Buffer,
    index_buffer: B::Buffer,
    layout: AttributeLayout,
    descriptor: DrawDescriptor,
}

impl<B: GpuBackend> Renderable<B> {
    /// Upload vertex and index data and check the draw stays inside them.
    ///
    /// Per-vertex attributes are checked against the highest referenced
    /// index, per-instance ones against `descriptor.instance_count`.
    pub fn upload(
        gpu: &mut B,
        label: &str,
        vertices: &VertexData,
        indices: &IndexData,
        layout: AttributeLayout,
        descriptor: DrawDescriptor,
    ) -> Result<Self, RenderError> {
        if indices.index_type() != descriptor.index_type {
            return Err(RenderError::InvalidLayout {
                label: label.to_string(),
                reason: format!(
                    "index data is {:?} but the draw expects {:?}",
                    indices.index_type(),
                    descriptor.index_type
                ),
            });
        }
        if descriptor.index_count as usize > indices.len() {
            return Err(RenderError::InvalidLayout {
                label: label.to_string(),
                reason: format!(
                    "draw reads {} indices but only {} were supplied",
                    descriptor.index_count,
                    indices.len()
                ),
            });
        }
        layout.validate(
            label,
            vertices.len(),
            indices.referenced_vertex_count(),
            descriptor.instance_count as usize,
        )?;

        let vertex_buffer = gpu.create_buffer(
            BufferUsage::Vertex,
            vertices.len(),
            &format!("{label} vertices"),
        );
        gpu.write_buffer(&vertex_buffer, 0, vertices.as_bytes());

        let index_bytes = indices.as_bytes();
        let index_buffer = gpu.create_buffer(
            BufferUsage::Index,
            index_bytes.len(),
            &format!("{label} indices"),
        );
        gpu.write_buffer(&index_buffer, 0, index_bytes);

        Ok(Self {
            label: label.to_string(),
            vertex_buffer,
            index_buffer,
            layout,
            descriptor,
        })
    }

    /// Issue the draw, instanced when more than one instance is configured
    pub fn draw(&self, gpu: &mut B) {
        let call = DrawCall {
            vertex_buffer: &self.vertex_buffer,
            index_buffer: &self.index_buffer,
            layout: &self.layout,
            descriptor: &self.descriptor,
        };
        if self.descriptor.is_instanced() {
            gpu.draw_elements_instanced(&call);
        } else {
            gpu.draw_elements(&call);
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn layout(&self) -> &AttributeLayout {
        &self.layout
    }

    pub fn descriptor(&self) -> &DrawDescriptor {
        &self.descriptor
    }

    pub fn vertex_buffer(&self) -> &B::Buffer {
        &self.vertex_buffer
    }

    pub fn index_buffer(&self) -> &B::Buffer {
        &self.index_buffer
    }
}
