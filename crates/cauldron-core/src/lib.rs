//! Cauldron Core - Foundational types for the Cauldron effects demo
//!
//! This crate provides the types every other Cauldron crate depends on:
//! - `EffectId` - Stable handles for live effects
//! - `Transform` - 2D transform producing model and view matrices
//! - `Color` - Linear RGBA color
//! - Error types and Result alias

mod error;
mod id;
mod transform;
mod types;

pub use error::{CauldronError, Result};
pub use id::EffectId;
pub use transform::Transform;
pub use types::Color;
