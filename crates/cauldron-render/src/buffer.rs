//! Vertex/index data and the attribute layout contract between them and the shader

use crate::error::RenderError;
use std::collections::BTreeMap;

/// Scalar type of one attribute component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    F32,
}

impl ComponentType {
    pub const fn size_bytes(self) -> usize {
        4
    }
}

/// Component type and count (1..=4) of a vertex attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttributeFormat {
    pub component: ComponentType,
    pub components: u8,
}

impl AttributeFormat {
    pub const fn float(components: u8) -> Self {
        Self {
            component: ComponentType::F32,
            components,
        }
    }

    pub const fn size_bytes(&self) -> usize {
        self.component.size_bytes() * self.components as usize
    }
}

/// How often an attribute advances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StepRate {
    /// Once per vertex
    #[default]
    PerVertex,
    /// Once per instance
    PerInstance,
}

/// Where one shader input reads from inside the vertex buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttributePointer {
    pub format: AttributeFormat,
    /// Start of the attribute's region in bytes
    pub byte_offset: usize,
    /// Distance between consecutive elements; 0 means tightly packed
    pub byte_stride: usize,
    pub rate: StepRate,
}

impl AttributePointer {
    /// A tightly packed per-vertex float attribute at offset 0
    pub const fn float(components: u8) -> Self {
        Self {
            format: AttributeFormat::float(components),
            byte_offset: 0,
            byte_stride: 0,
            rate: StepRate::PerVertex,
        }
    }

    pub const fn with_offset(mut self, byte_offset: usize) -> Self {
        self.byte_offset = byte_offset;
        self
    }

    pub const fn with_stride(mut self, byte_stride: usize) -> Self {
        self.byte_stride = byte_stride;
        self
    }

    pub const fn per_instance(mut self) -> Self {
        self.rate = StepRate::PerInstance;
        self
    }

    /// Stride actually used between elements
    pub const fn effective_stride(&self) -> usize {
        if self.byte_stride == 0 {
            self.format.size_bytes()
        } else {
            self.byte_stride
        }
    }

    /// One past the last byte read when `count` elements are fetched
    pub const fn end_offset(&self, count: usize) -> usize {
        if count == 0 {
            self.byte_offset
        } else {
            self.byte_offset + self.effective_stride() * (count - 1) + self.format.size_bytes()
        }
    }
}

/// Mapping from shader input slot to attribute pointer.
///
/// Each slot carries exactly one step rate, so the per-vertex and per-instance
/// slot sets never overlap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct AttributeLayout {
    slots: BTreeMap<u32, AttributePointer>,
}

impl AttributeLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of `set_pointer`
    pub fn with(mut self, slot: u32, pointer: AttributePointer) -> Self {
        self.set_pointer(slot, pointer);
        self
    }

    pub fn set_pointer(&mut self, slot: u32, pointer: AttributePointer) {
        self.slots.insert(slot, pointer);
    }

    /// Switch the given slots to per-instance advance
    pub fn set_instanced(&mut self, slots: &[u32]) {
        for slot in slots {
            if let Some(pointer) = self.slots.get_mut(slot) {
                pointer.rate = StepRate::PerInstance;
            }
        }
    }

    pub fn pointer(&self, slot: u32) -> Option<&AttributePointer> {
        self.slots.get(&slot)
    }

    /// Slots in ascending order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &AttributePointer)> {
        self.slots.iter().map(|(slot, pointer)| (*slot, pointer))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn instanced_slots(&self) -> Vec<u32> {
        self.iter()
            .filter(|(_, p)| p.rate == StepRate::PerInstance)
            .map(|(slot, _)| slot)
            .collect()
    }

    /// Check every pointer stays inside a `buffer_len`-byte buffer when reading
    /// `vertex_count` vertices and `instance_count` instances.
    pub fn validate(
        &self,
        label: &str,
        buffer_len: usize,
        vertex_count: usize,
        instance_count: usize,
    ) -> Result<(), RenderError> {
        for (slot, pointer) in self.iter() {
            if pointer.format.components == 0 || pointer.format.components > 4 {
                return Err(RenderError::InvalidLayout {
                    label: label.to_string(),
                    reason: format!(
                        "slot {slot} has {} components, expected 1 to 4",
                        pointer.format.components
                    ),
                });
            }
            if pointer.byte_offset % 4 != 0 || pointer.effective_stride() % 4 != 0 {
                return Err(RenderError::InvalidLayout {
                    label: label.to_string(),
                    reason: format!("slot {slot} is not 4-byte aligned"),
                });
            }
            let count = match pointer.rate {
                StepRate::PerVertex => vertex_count,
                StepRate::PerInstance => instance_count,
            };
            let end = pointer.end_offset(count);
            if end > buffer_len {
                return Err(RenderError::InvalidLayout {
                    label: label.to_string(),
                    reason: format!(
                        "slot {slot} reads up to byte {end} but the buffer holds {buffer_len}"
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Width of the indices in an index buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexType {
    U16,
    U32,
}

impl IndexType {
    pub const fn size_bytes(self) -> usize {
        match self {
            IndexType::U16 => 2,
            IndexType::U32 => 4,
        }
    }
}

/// Primitive assembly mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Topology {
    #[default]
    Triangles,
}

/// How a renderable is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DrawDescriptor {
    pub topology: Topology,
    pub index_count: u32,
    pub index_type: IndexType,
    pub instance_count: u32,
}

impl DrawDescriptor {
    /// A plain, non-instanced indexed draw
    pub const fn elements(topology: Topology, index_count: u32, index_type: IndexType) -> Self {
        Self {
            topology,
            index_count,
            index_type,
            instance_count: 1,
        }
    }

    /// An instanced indexed draw
    pub const fn instanced(
        topology: Topology,
        index_count: u32,
        index_type: IndexType,
        instance_count: u32,
    ) -> Self {
        Self {
            topology,
            index_count,
            index_type,
            instance_count,
        }
    }

    pub const fn is_instanced(&self) -> bool {
        self.instance_count != 1
    }
}

/// CPU-side vertex bytes, assembled region by region before upload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexData {
    bytes: Vec<u8>,
}

impl VertexData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_f32(data: &[f32]) -> Self {
        let mut vertices = Self::new();
        vertices.push_f32(data);
        vertices
    }

    /// Append a float region, returning its starting byte offset
    pub fn push_f32(&mut self, data: &[f32]) -> usize {
        let offset = self.bytes.len();
        self.bytes.extend_from_slice(bytemuck::cast_slice(data));
        offset
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// CPU-side index data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexData {
    U16(Vec<u16>),
    U32(Vec<u32>),
}

impl IndexData {
    pub fn index_type(&self) -> IndexType {
        match self {
            IndexData::U16(_) => IndexType::U16,
            IndexData::U32(_) => IndexType::U32,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            IndexData::U16(indices) => indices.len(),
            IndexData::U32(indices) => indices.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of vertices the indices address (highest index + 1)
    pub fn referenced_vertex_count(&self) -> usize {
        let max = match self {
            IndexData::U16(indices) => indices.iter().map(|&i| i as usize).max(),
            IndexData::U32(indices) => indices.iter().map(|&i| i as usize).max(),
        };
        max.map_or(0, |m| m + 1)
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            IndexData::U16(indices) => bytemuck::cast_slice(indices),
            IndexData::U32(indices) => bytemuck::cast_slice(indices),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_end_offset_uses_stride() {
        let p = AttributePointer::float(2).with_offset(12).with_stride(20);
        assert_eq!(p.effective_stride(), 20);
        assert_eq!(p.end_offset(3), 12 + 40 + 8);
        assert_eq!(p.end_offset(0), 12);

        let packed = AttributePointer::float(3);
        assert_eq!(packed.effective_stride(), 12);
    }

    #[test]
    fn instanced_slots_are_disjoint_from_vertex_slots() {
        let mut layout = AttributeLayout::new()
            .with(0, AttributePointer::float(3))
            .with(1, AttributePointer::float(2).with_offset(48))
            .with(2, AttributePointer::float(1).with_offset(56));
        layout.set_instanced(&[1, 2, 9]);

        assert_eq!(layout.instanced_slots(), vec![1, 2]);
        assert_eq!(layout.pointer(0).unwrap().rate, StepRate::PerVertex);
        assert_eq!(layout.len(), 3);
    }

    #[test]
    fn validate_catches_overrun() {
        let layout = AttributeLayout::new()
            .with(0, AttributePointer::float(3))
            .with(1, AttributePointer::float(2).with_offset(48).per_instance());

        // 4 vertices * 12 bytes = 48, then 2 instances * 8 bytes = 16
        assert!(layout.validate("quad", 64, 4, 2).is_ok());
        let err = layout.validate("quad", 60, 4, 2).unwrap_err();
        assert!(matches!(err, RenderError::InvalidLayout { .. }));
    }

    #[test]
    fn validate_rejects_bad_component_count() {
        let layout = AttributeLayout::new().with(0, AttributePointer::float(5));
        assert!(layout.validate("bad", 1024, 1, 1).is_err());
    }

    #[test]
    fn zero_instances_need_no_storage() {
        let layout = AttributeLayout::new()
            .with(0, AttributePointer::float(3))
            .with(1, AttributePointer::float(2).with_offset(48).per_instance());
        assert!(layout.validate("empty swarm", 48, 4, 0).is_ok());
    }

    #[test]
    fn vertex_data_regions() {
        let mut data = VertexData::new();
        assert_eq!(data.push_f32(&[1.0, 2.0, 3.0]), 0);
        assert_eq!(data.push_f32(&[4.0]), 12);
        assert_eq!(data.len(), 16);
        assert_eq!(&data.as_bytes()[12..16], &4.0f32.to_le_bytes());
    }

    #[test]
    fn index_data_referenced_vertices() {
        let indices = IndexData::U16(vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(indices.referenced_vertex_count(), 4);
        assert_eq!(indices.as_bytes().len(), 12);
        assert_eq!(IndexData::U32(vec![]).referenced_vertex_count(), 0);
    }

    #[test]
    fn draw_descriptor_instancing() {
        let plain = DrawDescriptor::elements(Topology::Triangles, 6, IndexType::U16);
        assert!(!plain.is_instanced());
        let swarm = DrawDescriptor::instanced(Topology::Triangles, 6, IndexType::U16, 500);
        assert!(swarm.is_instanced());
    }
}
