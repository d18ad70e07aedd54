//! Mesh primitives (quad, circle) as interleaved position/uv data

use crate::buffer::{AttributeLayout, AttributePointer, IndexData, VertexData};

/// Interleaved vertices plus triangle indices.
///
/// Each vertex is `stride` floats: position xyz when present, then uv when present.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryData {
    pub vertices: Vec<f32>,
    pub indices: Vec<u16>,
    has_positions: bool,
    has_uvs: bool,
}

impl GeometryData {
    /// Floats per vertex
    pub fn stride(&self) -> usize {
        stride(self.has_positions, self.has_uvs)
    }

    pub fn vertex_count(&self) -> usize {
        match self.stride() {
            0 => 0,
            s => self.vertices.len() / s,
        }
    }

    pub fn has_positions(&self) -> bool {
        self.has_positions
    }

    pub fn has_uvs(&self) -> bool {
        self.has_uvs
    }

    /// Vertex `i` as a slice of `stride` floats
    pub fn vertex(&self, i: usize) -> &[f32] {
        let s = self.stride();
        &self.vertices[i * s..(i + 1) * s]
    }

    /// Layout reading positions from slot 0 and uvs from slot 1 of the interleaved data
    pub fn interleaved_layout(&self) -> AttributeLayout {
        let stride_bytes = self.stride() * 4;
        let mut layout = AttributeLayout::new();
        let mut offset = 0;
        if self.has_positions {
            layout.set_pointer(0, AttributePointer::float(3).with_stride(stride_bytes));
            offset += 3 * 4;
        }
        if self.has_uvs {
            layout.set_pointer(
                1,
                AttributePointer::float(2)
                    .with_offset(offset)
                    .with_stride(stride_bytes),
            );
        }
        layout
    }

    pub fn vertex_data(&self) -> VertexData {
        VertexData::from_f32(&self.vertices)
    }

    pub fn index_data(&self) -> IndexData {
        IndexData::U16(self.indices.clone())
    }
}

/// Floats per interleaved vertex for the requested attributes
pub fn stride(positions: bool, uvs: bool) -> usize {
    let mut stride = 0;
    if positions {
        stride += 3;
    }
    if uvs {
        stride += 2;
    }
    stride
}

/// Pack positions (xyz) and uvs (uv) into one buffer, vertex by vertex.
///
/// Omitted attributes take neither space nor stride. The vertex count comes
/// from whichever attribute is present.
pub fn interleave(positions: Option<&[f32]>, uvs: Option<&[f32]>) -> Vec<f32> {
    let stride = stride(positions.is_some(), uvs.is_some());
    let count = match (positions, uvs) {
        (Some(p), _) => p.len() / 3,
        (None, Some(u)) => u.len() / 2,
        (None, None) => 0,
    };
    let uv_base = if positions.is_some() { 3 } else { 0 };

    let mut buffer = vec![0.0; count * stride];
    for i in 0..count {
        let v = &mut buffer[i * stride..(i + 1) * stride];
        if let Some(p) = positions {
            v[..3].copy_from_slice(&p[i * 3..i * 3 + 3]);
        }
        if let Some(u) = uvs {
            v[uv_base..uv_base + 2].copy_from_slice(&u[i * 2..i * 2 + 2]);
        }
    }
    buffer
}

/// Axis-aligned quad of side `size` centered at the origin, CCW winding.
///
/// Requesting neither positions nor uvs yields an empty, zero-stride buffer.
pub fn quad(size: f32, positions: bool, uvs: bool) -> GeometryData {
    let p = positions.then(|| quad_positions(size));
    let u = uvs.then(quad_uvs);
    GeometryData {
        vertices: interleave(p.as_deref(), u.as_deref()),
        indices: vec![0, 1, 2, 0, 2, 3],
        has_positions: positions,
        has_uvs: uvs,
    }
}

fn quad_positions(size: f32) -> Vec<f32> {
    let half = size / 2.0;
    vec![
        -half, -half, 0.0, //
        half, -half, 0.0, //
        half, half, 0.0, //
        -half, half, 0.0,
    ]
}

fn quad_uvs() -> Vec<f32> {
    vec![
        0.0, 0.0, //
        1.0, 0.0, //
        1.0, 1.0, //
        0.0, 1.0,
    ]
}

/// Largest `circle` segment count whose indices fit in `u16`
pub const MAX_CIRCLE_SEGMENTS: usize = u16::MAX as usize - 2;

/// Triangle-fan disc of `segments` slices.
///
/// Vertex 0 is the center; vertices `1..=segments` walk the rim starting at
/// angle 0, and vertex `segments + 1` repeats vertex 1 so the uv wrap has no
/// seam.
///
/// # Panics
///
/// If `segments` exceeds [`MAX_CIRCLE_SEGMENTS`].
pub fn circle(radius: f32, segments: usize, positions: bool, uvs: bool) -> GeometryData {
    assert!(
        segments <= MAX_CIRCLE_SEGMENTS,
        "circle: {segments} segments exceed the u16 index range"
    );
    let p = positions.then(|| circle_positions(radius, segments));
    let u = uvs.then(|| circle_uvs(segments));
    GeometryData {
        vertices: interleave(p.as_deref(), u.as_deref()),
        indices: circle_indices(segments),
        has_positions: positions,
        has_uvs: uvs,
    }
}

/// Points on a circle of `radius`, generated by repeated rotation.
/// Returns `segments + 2` points: center, rim, closing duplicate.
fn rim_points(radius: f32, segments: usize) -> Vec<[f32; 2]> {
    let theta = std::f32::consts::TAU / segments as f32;
    let (s, c) = theta.sin_cos();

    let mut points = Vec::with_capacity(segments + 2);
    points.push([0.0, 0.0]);
    let (mut x, mut y) = (radius, 0.0f32);
    for _ in 0..segments {
        points.push([x, y]);
        let t = x;
        x = c * x - s * y;
        y = s * t + c * y;
    }
    points.push([radius, 0.0]);
    points
}

fn circle_positions(radius: f32, segments: usize) -> Vec<f32> {
    rim_points(radius, segments)
        .into_iter()
        .flat_map(|[x, y]| [x, y, 0.0])
        .collect()
}

fn circle_uvs(segments: usize) -> Vec<f32> {
    rim_points(1.0, segments).into_iter().flatten().collect()
}

fn circle_indices(segments: usize) -> Vec<u16> {
    (0..segments)
        .flat_map(|i| [0, (i + 1) as u16, (i + 2) as u16])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn largest_circle_indices_stay_in_range() {
        let disc = circle(1.0, MAX_CIRCLE_SEGMENTS, true, false);
        assert_eq!(disc.vertex_count(), u16::MAX as usize);
        assert_eq!(disc.indices.iter().copied().max(), Some(u16::MAX - 1));
    }

    #[test]
    #[should_panic(expected = "exceed the u16 index range")]
    fn circle_rejects_segments_past_u16() {
        circle(1.0, MAX_CIRCLE_SEGMENTS + 1, true, false);
    }

    #[test]
    fn quad_with_uvs() {
        let quad = quad(4.0, true, true);
        assert_eq!(quad.stride(), 5);
        assert_eq!(quad.vertex_count(), 4);
        assert_eq!(quad.indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(quad.vertex(0), &[-2.0, -2.0, 0.0, 0.0, 0.0]);
        assert_eq!(quad.vertex(2), &[2.0, 2.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn circle_fan_positions_only() {
        let n = 64;
        let circle = circle(10.0, n, true, false);
        assert_eq!(circle.stride(), 3);
        assert_eq!(circle.vertex_count(), n + 2);
        assert_eq!(circle.indices.len(), 3 * n);

        for (k, tri) in circle.indices.chunks(3).enumerate() {
            assert_eq!(tri, &[0, (k + 1) as u16, (k + 2) as u16]);
        }
        assert_eq!(circle.vertex(0), &[0.0, 0.0, 0.0]);
        assert_eq!(circle.vertex(n + 1), circle.vertex(1));
    }

    #[test]
    fn circle_rim_stays_on_radius() {
        let circle = circle(10.0, 64, true, false);
        for i in 1..=64 {
            let v = circle.vertex(i);
            let r = (v[0] * v[0] + v[1] * v[1]).sqrt();
            assert!((r - 10.0).abs() < 1e-3, "vertex {i} at radius {r}");
        }
        // quarter turn lands on +Y
        let q = circle.vertex(17);
        assert!(q[0].abs() < 1e-3 && (q[1] - 10.0).abs() < 1e-3);
    }

    #[test]
    fn circle_uvs_center_and_closing() {
        let circle = circle(5.0, 8, true, true);
        assert_eq!(circle.stride(), 5);
        assert_eq!(&circle.vertex(0)[3..], &[0.0, 0.0]);
        assert_eq!(&circle.vertex(9)[3..], &[1.0, 0.0]);
        assert_eq!(circle.vertex(9), circle.vertex(1));
    }

    #[test]
    fn omitted_uvs_change_stride_by_two() {
        let with = quad(1.0, true, true);
        let without = quad(1.0, true, false);
        assert_eq!(with.stride() - without.stride(), 2);
        assert_eq!(without.vertices.len(), 4 * 3);
        assert_eq!(with.vertices.len(), 4 * 5);
        // positions-only buffer holds exactly the positions
        let positions: Vec<f32> = (0..4).flat_map(|i| with.vertex(i)[..3].to_vec()).collect();
        assert_eq!(without.vertices, positions);
    }

    #[test]
    fn uvs_only_interleave() {
        let uv = quad(1.0, false, true);
        assert_eq!(uv.stride(), 2);
        assert_eq!(uv.vertices, vec![0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn nothing_requested_is_degenerate() {
        let empty = quad(1.0, false, false);
        assert_eq!(empty.stride(), 0);
        assert!(empty.vertices.is_empty());
        assert_eq!(empty.vertex_count(), 0);
    }

    #[test]
    fn interleaved_layout_offsets() {
        let layout = quad(1.0, true, true).interleaved_layout();
        let pos = layout.pointer(0).unwrap();
        let uv = layout.pointer(1).unwrap();
        assert_eq!((pos.byte_offset, pos.byte_stride), (0, 20));
        assert_eq!((uv.byte_offset, uv.byte_stride), (12, 20));

        let positions_only = quad(1.0, true, false).interleaved_layout();
        assert!(positions_only.pointer(1).is_none());
    }
}
