//! Cauldron Runtime - Frame loop plumbing
//!
//! Provides the pieces the frame loop injects into the effect system:
//! - `Clock` - monotonic time source (`SystemClock`, `ManualClock`)
//! - `InputState` - cursor and button tracking that decodes clicks into spawn events
//! - `SpawnEvent` - a decoded request to spawn an effect

mod clock;
mod event;
mod input;

pub use clock::{Clock, ManualClock, SystemClock};
pub use event::SpawnEvent;
pub use input::InputState;
