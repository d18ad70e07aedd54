//! Input state management

use crate::event::SpawnEvent;
use glam::Vec2;
use std::collections::HashSet;
use std::time::Instant;
use winit::event::{ElementState, MouseButton};
use winit::keyboard::KeyCode;

/// Tracks cursor and button state and turns clicks into spawn events
pub struct InputState {
    /// Current cursor position in window pixels (top-left origin, as winit reports it)
    pub cursor_position: (f64, f64),
    /// Window height in pixels, used to flip cursor y into bottom-left origin
    window_height: f64,
    /// Mouse buttons currently held
    buttons_down: HashSet<MouseButton>,
    /// Button that spawns an effect when pressed
    spawn_button: MouseButton,
    /// Spawn events decoded since the last drain
    pending_spawns: Vec<SpawnEvent>,
    exit_requested: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

impl InputState {
    pub fn new() -> Self {
        Self {
            cursor_position: (0.0, 0.0),
            window_height: 0.0,
            buttons_down: HashSet::new(),
            spawn_button: MouseButton::Left,
            pending_spawns: Vec::new(),
            exit_requested: false,
        }
    }

    /// Change which mouse button spawns effects
    pub fn set_spawn_button(&mut self, button: MouseButton) {
        self.spawn_button = button;
    }

    /// Record the window's height in physical pixels, matching cursor events
    pub fn set_window_height(&mut self, height: f64) {
        self.window_height = height;
    }

    /// Process cursor movement
    pub fn process_cursor_moved(&mut self, x: f64, y: f64) {
        self.cursor_position = (x, y);
    }

    /// Cursor position with the y axis flipped to bottom-left origin
    pub fn cursor_world_position(&self) -> Vec2 {
        let (x, y) = self.cursor_position;
        Vec2::new(x as f32, (self.window_height - y) as f32)
    }

    /// Process a mouse button transition.
    ///
    /// A fresh press of the spawn button queues a `SpawnEvent` at the cursor.
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState, now: Instant) {
        match state {
            ElementState::Pressed => {
                let fresh = self.buttons_down.insert(button);
                if fresh && button == self.spawn_button {
                    let event = SpawnEvent {
                        position: self.cursor_world_position(),
                        timestamp: now,
                    };
                    tracing::debug!(x = event.position.x, y = event.position.y, "spawn requested");
                    self.pending_spawns.push(event);
                }
            }
            ElementState::Released => {
                self.buttons_down.remove(&button);
            }
        }
    }

    /// Process a key press
    pub fn process_key_down(&mut self, key: KeyCode) {
        if key == KeyCode::Escape {
            self.exit_requested = true;
        }
    }

    /// Whether the user asked to close the demo
    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    /// Take all spawn events decoded since the last call
    pub fn drain_spawn_events(&mut self) -> Vec<SpawnEvent> {
        std::mem::take(&mut self.pending_spawns)
    }
}
