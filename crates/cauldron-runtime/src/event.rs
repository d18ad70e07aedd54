//! Decoded input events consumed by the effect system

use glam::Vec2;
use std::time::Instant;

/// A request to spawn an effect at `position` (window pixels, bottom-left origin)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnEvent {
    pub position: Vec2,
    pub timestamp: Instant,
}
