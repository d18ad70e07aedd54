//! Cauldron demo - click-to-spawn particle effects
//!
//! A windowed winit application plus a headless snapshot path sharing the
//! same configuration.

mod app;
mod config;
mod snapshot;

pub use app::CauldronApp;
pub use config::{DemoConfig, WindowConfig};
pub use snapshot::render_snapshot;
