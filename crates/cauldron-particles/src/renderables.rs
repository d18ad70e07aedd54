//! Renderable builders for swarms and plain meshes

use crate::config::{ExplosionConfig, ShockwaveConfig, SmokeConfig};
use crate::generator::{generate, ParticleAttributeSet};
use cauldron_render::primitives::{circle, quad, MAX_CIRCLE_SEGMENTS};
use cauldron_render::{
    AttributeLayout, AttributePointer, DrawDescriptor, GeometryData, GpuBackend, IndexType,
    Renderable, RenderError, Topology, VertexData,
};
use rand::Rng;

/// Shader slots read by the particle programs
pub mod slots {
    pub const POSITION: u32 = 0;
    pub const OFFSET: u32 = 1;
    pub const VELOCITY: u32 = 2;
    pub const SIZE: u32 = 3;
}

/// Instance `geometry` once per particle.
///
/// The vertex buffer holds the positions followed by the offset, velocity and
/// size regions; slot 0 advances per vertex, slots 1-3 per instance.
pub fn particle_renderable<B: GpuBackend>(
    gpu: &mut B,
    label: &str,
    geometry: &GeometryData,
    particles: &ParticleAttributeSet,
) -> Result<Renderable<B>, RenderError> {
    if !geometry.has_positions() {
        return Err(RenderError::InvalidLayout {
            label: label.to_string(),
            reason: "particle geometry has no positions".to_string(),
        });
    }
    let positions: Vec<f32> = (0..geometry.vertex_count())
        .flat_map(|i| geometry.vertex(i)[..3].to_vec())
        .collect();

    let mut data = VertexData::new();
    data.push_f32(&positions);
    let offsets_at = data.push_f32(&flatten(particles.offsets()));
    let velocities_at = data.push_f32(&flatten(particles.velocities()));
    let sizes_at = data.push_f32(particles.sizes());

    let mut layout = AttributeLayout::new()
        .with(slots::POSITION, AttributePointer::float(3))
        .with(slots::OFFSET, AttributePointer::float(2).with_offset(offsets_at))
        .with(slots::VELOCITY, AttributePointer::float(2).with_offset(velocities_at))
        .with(slots::SIZE, AttributePointer::float(1).with_offset(sizes_at));
    layout.set_instanced(&[slots::OFFSET, slots::VELOCITY, slots::SIZE]);

    let indices = geometry.index_data();
    let descriptor = DrawDescriptor::instanced(
        Topology::Triangles,
        indices.len() as u32,
        IndexType::U16,
        particles.len() as u32,
    );
    Renderable::upload(gpu, label, &data, &indices, layout, descriptor)
}

/// Draw `geometry` once using its interleaved layout
pub fn mesh_renderable<B: GpuBackend>(
    gpu: &mut B,
    label: &str,
    geometry: &GeometryData,
) -> Result<Renderable<B>, RenderError> {
    let indices = geometry.index_data();
    let descriptor =
        DrawDescriptor::elements(Topology::Triangles, indices.len() as u32, IndexType::U16);
    Renderable::upload(
        gpu,
        label,
        &geometry.vertex_data(),
        &indices,
        geometry.interleaved_layout(),
        descriptor,
    )
}

pub fn explosion_renderable<B: GpuBackend, R: Rng + ?Sized>(
    gpu: &mut B,
    rng: &mut R,
    config: &ExplosionConfig,
) -> Result<Renderable<B>, RenderError> {
    let particles = generate(rng, &config.swarm());
    particle_renderable(gpu, "explosion", &quad(config.size, true, false), &particles)
}

pub fn smoke_renderable<B: GpuBackend, R: Rng + ?Sized>(
    gpu: &mut B,
    rng: &mut R,
    config: &SmokeConfig,
) -> Result<Renderable<B>, RenderError> {
    let particles = generate(rng, &config.swarm());
    let disc = checked_circle("smoke", config.size, config.segments, true, false)?;
    particle_renderable(gpu, "smoke", &disc, &particles)
}

pub fn shockwave_renderable<B: GpuBackend>(
    gpu: &mut B,
    config: &ShockwaveConfig,
) -> Result<Renderable<B>, RenderError> {
    let ring = checked_circle("shockwave", config.radius, config.segments, true, true)?;
    mesh_renderable(gpu, "shockwave", &ring)
}

/// Textured quad for flat drawing
pub fn quad_renderable<B: GpuBackend>(gpu: &mut B, size: f32) -> Result<Renderable<B>, RenderError> {
    mesh_renderable(gpu, "quad", &quad(size, true, true))
}

/// Textured disc for flat drawing
pub fn circle_renderable<B: GpuBackend>(
    gpu: &mut B,
    radius: f32,
    segments: usize,
) -> Result<Renderable<B>, RenderError> {
    let disc = checked_circle("circle", radius, segments, true, true)?;
    mesh_renderable(gpu, "circle", &disc)
}

fn checked_circle(
    label: &str,
    radius: f32,
    segments: usize,
    positions: bool,
    uvs: bool,
) -> Result<GeometryData, RenderError> {
    if segments > MAX_CIRCLE_SEGMENTS {
        return Err(RenderError::InvalidLayout {
            label: label.to_string(),
            reason: format!("{segments} segments exceed the u16 index range"),
        });
    }
    Ok(circle(radius, segments, positions, uvs))
}

fn flatten(v: &[glam::Vec2]) -> Vec<f32> {
    v.iter().flat_map(|v| v.to_array()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::SwarmParams;
    use crate::rand::particle_rng;
    use cauldron_render::{GpuCall, RecordingBackend, StepRate};

    #[test]
    fn particle_layout_regions() {
        let mut gpu = RecordingBackend::new();
        let mut rng = particle_rng(Some(1));
        let config = ExplosionConfig {
            count: 10,
            ..ExplosionConfig::default()
        };
        let explosion = explosion_renderable(&mut gpu, &mut rng, &config).unwrap();

        let layout = explosion.layout();
        assert_eq!(layout.pointer(slots::POSITION).unwrap().rate, StepRate::PerVertex);
        assert_eq!(layout.instanced_slots(), vec![1, 2, 3]);
        // 4 quad vertices * 3 floats, then 10 offsets, 10 velocities, 10 sizes
        assert_eq!(layout.pointer(slots::OFFSET).unwrap().byte_offset, 48);
        assert_eq!(layout.pointer(slots::VELOCITY).unwrap().byte_offset, 48 + 80);
        assert_eq!(layout.pointer(slots::SIZE).unwrap().byte_offset, 48 + 160);
        assert_eq!(gpu.buffer_size(explosion.vertex_buffer()), 48 + 160 + 40);

        let descriptor = explosion.descriptor();
        assert_eq!(descriptor.instance_count, 10);
        assert_eq!(descriptor.index_count, 6);
    }

    #[test]
    fn uv_only_geometry_is_rejected() {
        let mut gpu = RecordingBackend::new();
        let mut rng = particle_rng(Some(3));
        let particles = generate(
            &mut rng,
            &SwarmParams {
                count: 4,
                ..ExplosionConfig::default().swarm()
            },
        );
        let result = particle_renderable(&mut gpu, "p", &quad(1.0, false, true), &particles);
        assert!(matches!(result, Err(RenderError::InvalidLayout { .. })));
        assert_eq!(gpu.live_buffers(), 0);
    }

    #[test]
    fn oversized_shockwave_is_an_error() {
        let mut gpu = RecordingBackend::new();
        let config = ShockwaveConfig {
            segments: MAX_CIRCLE_SEGMENTS + 1,
            ..ShockwaveConfig::default()
        };
        let result = shockwave_renderable(&mut gpu, &config);
        assert!(matches!(result, Err(RenderError::InvalidLayout { .. })));
        assert_eq!(gpu.live_buffers(), 0);
    }

    #[test]
    fn uploaded_bytes_match_swarm() {
        let mut gpu = RecordingBackend::new();
        let mut rng = particle_rng(Some(2));
        let particles = generate(&mut rng, &SmokeConfig::default().swarm());
        let disc = circle(10.0, 64, true, false);
        let smoke = particle_renderable(&mut gpu, "smoke", &disc, &particles).unwrap();

        let bytes = gpu.buffer_contents(smoke.vertex_buffer());
        let start = 66 * 3 * 4;
        assert_eq!(&bytes[start..], particles.to_instance_bytes().as_slice());
    }

    #[test]
    fn empty_swarm_still_uploads() {
        let mut gpu = RecordingBackend::new();
        let mut rng = particle_rng(Some(3));
        let config = SmokeConfig {
            count: 0,
            ..SmokeConfig::default()
        };
        let smoke = smoke_renderable(&mut gpu, &mut rng, &config).unwrap();
        assert_eq!(smoke.descriptor().instance_count, 0);
        gpu.clear_calls();
        smoke.draw(&mut gpu);
        assert!(matches!(
            gpu.calls().as_slice(),
            [GpuCall::DrawElements { instance_count: 0, instanced: true, .. }]
        ));
    }

    #[test]
    fn shockwave_is_a_single_draw() {
        let mut gpu = RecordingBackend::new();
        let ring = shockwave_renderable(&mut gpu, &ShockwaveConfig::default()).unwrap();
        assert!(!ring.descriptor().is_instanced());
        assert_eq!(ring.descriptor().index_count, 64 * 3);
        assert_eq!(ring.layout().pointer(1).unwrap().byte_offset, 12);
    }
}
