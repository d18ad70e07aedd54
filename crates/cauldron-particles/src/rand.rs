//! Random sampling helpers on top of `rand`

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Generator used for particle swarms
pub type ParticleRng = ChaCha8Rng;

/// Deterministic generator for a fixed seed, or an entropy-seeded one
pub fn particle_rng(seed: Option<u64>) -> ParticleRng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Unit vector from normalizing a uniform draw in [-1, 1)²; +X if the draw is zero
pub fn random_unit_vec2<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    let v = Vec2::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
    v.try_normalize().unwrap_or(Vec2::X)
}

/// Uniform float in [0, max); 0 when `max` is not positive
pub fn unit_scaled<R: Rng + ?Sized>(rng: &mut R, max: f32) -> f32 {
    if max > 0.0 {
        rng.gen::<f32>() * max
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_vectors_have_unit_length() {
        let mut rng = particle_rng(Some(42));
        for _ in 0..1000 {
            let v = random_unit_vec2(&mut rng);
            assert!((v.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn seeded_generators_repeat() {
        let mut a = particle_rng(Some(7));
        let mut b = particle_rng(Some(7));
        for _ in 0..16 {
            assert_eq!(random_unit_vec2(&mut a), random_unit_vec2(&mut b));
        }
    }

    #[test]
    fn unit_scaled_bounds() {
        let mut rng = particle_rng(Some(1));
        for _ in 0..1000 {
            let v = unit_scaled(&mut rng, 20.0);
            assert!((0.0..20.0).contains(&v));
        }
        assert_eq!(unit_scaled(&mut rng, 0.0), 0.0);
    }
}
