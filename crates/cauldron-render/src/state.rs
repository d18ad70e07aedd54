//! Fixed-function pipeline state: capabilities, blend/cull/depth settings, viewport

/// A capability that can be switched on or off globally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Blend,
    DepthTest,
    CullFace,
}

/// Blend factor applied to source or destination color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    Zero,
    One,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
    SrcColor,
    OneMinusSrcColor,
}

/// Which faces are discarded when face culling is enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CullFace {
    Front,
    #[default]
    Back,
}

/// Depth comparison function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DepthFunc {
    Never,
    #[default]
    Less,
    Equal,
    LessEqual,
    Greater,
    NotEqual,
    GreaterEqual,
    Always,
}

/// Viewport rectangle in framebuffer pixels, bottom-left origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Viewport covering a whole `width` x `height` target
    pub const fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }
}

/// Engine-wide defaults restored when a technique unbinds
pub mod defaults {
    use super::{BlendFactor, CullFace, DepthFunc};

    pub const BLEND_SRC: BlendFactor = BlendFactor::One;
    pub const BLEND_DST: BlendFactor = BlendFactor::Zero;
    pub const CULL_FACE: CullFace = CullFace::Back;
    pub const DEPTH_MASK: bool = true;
    pub const DEPTH_FUNC: DepthFunc = DepthFunc::Less;
}

/// Snapshot of the global fixed-function state, as a backend tracks it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PipelineState {
    pub blend_enabled: bool,
    pub depth_test_enabled: bool,
    pub cull_enabled: bool,
    pub blend_src: BlendFactor,
    pub blend_dst: BlendFactor,
    pub cull_face: CullFace,
    pub depth_mask: bool,
    pub depth_func: DepthFunc,
    pub viewport: Option<Viewport>,
}

impl Default for PipelineState {
    fn default() -> Self {
        Self {
            blend_enabled: false,
            depth_test_enabled: false,
            cull_enabled: false,
            blend_src: defaults::BLEND_SRC,
            blend_dst: defaults::BLEND_DST,
            cull_face: defaults::CULL_FACE,
            depth_mask: defaults::DEPTH_MASK,
            depth_func: defaults::DEPTH_FUNC,
            viewport: None,
        }
    }
}

impl PipelineState {
    pub fn set_capability(&mut self, cap: Capability, enabled: bool) {
        match cap {
            Capability::Blend => self.blend_enabled = enabled,
            Capability::DepthTest => self.depth_test_enabled = enabled,
            Capability::CullFace => self.cull_enabled = enabled,
        }
    }

    pub fn is_enabled(&self, cap: Capability) -> bool {
        match cap {
            Capability::Blend => self.blend_enabled,
            Capability::DepthTest => self.depth_test_enabled,
            Capability::CullFace => self.cull_enabled,
        }
    }
}
