//! Effect tuning, loadable from TOML

use crate::generator::{SizeDistribution, SwarmParams};
use cauldron_core::{CauldronError, Color, Result};
use cauldron_render::primitives::MAX_CIRCLE_SEGMENTS;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Everything that shapes a spawned effect. Every field has a default, so
/// partial TOML tables are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectConfig {
    /// Seconds an effect stays alive
    pub lifetime: f32,
    pub explosion: ExplosionConfig,
    pub smoke: SmokeConfig,
    pub shockwave: ShockwaveConfig,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            lifetime: 3.0,
            explosion: ExplosionConfig::default(),
            smoke: SmokeConfig::default(),
            shockwave: ShockwaveConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplosionConfig {
    pub count: usize,
    pub spread: f32,
    pub force: f32,
    /// Quad side length and upper bound of particle sizes
    pub size: f32,
    /// Upward velocity bias as a multiple of `force`
    pub lift: f32,
    pub sizes: SizeDistribution,
    pub color: Color,
    pub gravity: Vec2,
}

impl Default for ExplosionConfig {
    fn default() -> Self {
        Self {
            count: 500,
            spread: 20.0,
            force: 200.0,
            size: 4.0,
            lift: 2.0,
            sizes: SizeDistribution::Uniform,
            color: Color::new(0.8, 0.4, 0.2, 0.8),
            gravity: Vec2::new(0.0, -200.0),
        }
    }
}

impl ExplosionConfig {
    pub fn swarm(&self) -> SwarmParams {
        SwarmParams {
            count: self.count,
            spread_radius: self.spread,
            force: self.force,
            max_size: self.size,
            size_distribution: self.sizes,
            directional_bias: Vec2::new(0.0, self.lift * self.force),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmokeConfig {
    pub count: usize,
    pub spread: f32,
    pub force: f32,
    /// Puff radius and upper bound of particle sizes
    pub size: f32,
    pub segments: usize,
    /// Upward velocity bias as a multiple of `force`
    pub lift: f32,
    pub sizes: SizeDistribution,
    pub color: Color,
    pub rise: Vec2,
}

impl Default for SmokeConfig {
    fn default() -> Self {
        Self {
            count: 1000,
            spread: 20.0,
            force: 140.0,
            size: 10.0,
            segments: 64,
            lift: 1.5,
            sizes: SizeDistribution::UpperHalf,
            color: Color::new(0.41, 0.4, 0.39, 0.2),
            rise: Vec2::new(0.0, 10.0),
        }
    }
}

impl SmokeConfig {
    pub fn swarm(&self) -> SwarmParams {
        SwarmParams {
            count: self.count,
            spread_radius: self.spread,
            force: self.force,
            max_size: self.size,
            size_distribution: self.sizes,
            directional_bias: Vec2::new(0.0, self.lift * self.force),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShockwaveConfig {
    pub radius: f32,
    pub segments: usize,
    pub color: Color,
    /// Ring expansion rate
    pub force: f32,
}

impl Default for ShockwaveConfig {
    fn default() -> Self {
        Self {
            radius: 10.0,
            segments: 64,
            color: Color::new(1.0, 0.98, 0.96, 0.4),
            force: 15.0,
        }
    }
}

/// Circle fans index with u16, two vertices go to center and closing duplicate

impl EffectConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.lifetime.is_nan() || self.lifetime <= 0.0 {
            return Err(out_of_range("lifetime", "> 0", self.lifetime));
        }
        non_negative("explosion.spread", self.explosion.spread)?;
        non_negative("explosion.force", self.explosion.force)?;
        non_negative("explosion.size", self.explosion.size)?;
        non_negative("smoke.spread", self.smoke.spread)?;
        non_negative("smoke.force", self.smoke.force)?;
        non_negative("smoke.size", self.smoke.size)?;
        non_negative("shockwave.radius", self.shockwave.radius)?;
        segments("smoke.segments", self.smoke.segments)?;
        segments("shockwave.segments", self.shockwave.segments)?;
        Ok(())
    }
}

fn out_of_range(field: &str, expected: &str, value: f32) -> CauldronError {
    CauldronError::ValueOutOfRange {
        field: field.to_string(),
        expected: expected.to_string(),
        value: value as f64,
    }
}

fn non_negative(field: &str, value: f32) -> Result<()> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(out_of_range(field, ">= 0", value))
    }
}

fn segments(field: &str, value: usize) -> Result<()> {
    if value == 0 || value > MAX_CIRCLE_SEGMENTS {
        return Err(CauldronError::Config(format!(
            "{field} must be between 1 and {MAX_CIRCLE_SEGMENTS}, got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = EffectConfig::default();
        config.validate().unwrap();
        assert_eq!(config.lifetime, 3.0);
        assert_eq!(config.explosion.swarm().directional_bias, Vec2::new(0.0, 400.0));
        assert_eq!(config.smoke.swarm().directional_bias, Vec2::new(0.0, 210.0));
        assert_eq!(config.smoke.swarm().size_distribution, SizeDistribution::UpperHalf);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = EffectConfig::from_toml_str(
            r#"
lifetime = 5.0

[smoke]
count = 10
sizes = "uniform"
rise = [0.0, 25.0]
"#,
        )
        .unwrap();
        assert_eq!(config.lifetime, 5.0);
        assert_eq!(config.smoke.count, 10);
        assert_eq!(config.smoke.sizes, SizeDistribution::Uniform);
        assert_eq!(config.smoke.rise, Vec2::new(0.0, 25.0));
        assert_eq!(config.smoke.segments, 64);
        assert_eq!(config.explosion, ExplosionConfig::default());
    }

    #[test]
    fn toml_round_trip() {
        let config = EffectConfig::default();
        let text = config.to_toml_string().unwrap();
        assert_eq!(EffectConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn rejects_bad_values() {
        let mut config = EffectConfig::default();
        config.lifetime = 0.0;
        assert!(matches!(
            config.validate(),
            Err(CauldronError::ValueOutOfRange { .. })
        ));

        let mut config = EffectConfig::default();
        config.shockwave.segments = 0;
        assert!(matches!(config.validate(), Err(CauldronError::Config(_))));

        let mut config = EffectConfig::default();
        config.explosion.size = -1.0;
        assert!(config.validate().is_err());

        assert!(matches!(
            EffectConfig::from_toml_str("lifetime = \"long\""),
            Err(CauldronError::TomlParse(_))
        ));
    }
}
