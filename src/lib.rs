//! ZipZap - A side-scrolling zig-zag arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (motion, spawning, collisions, game state)
//! - `session`: Frame-loop driver owning one play session
//! - `submit`: One-shot hand-off of the final score
//! - `persistence`: Player records and leaderboard storage
//! - `renderer`: Projection of the simulation model into draw commands
//! - `platform`: Browser/native platform helpers
//! - `audio`: Sound cues (Web Audio playback on wasm)
//! - `settings`: Player preferences
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod submit;
pub mod tuning;

pub use session::{FrameOutcome, Session};
pub use settings::Settings;
pub use tuning::{Tuning, TuningError, Variant};

/// Game configuration constants
pub mod consts {
    /// Default playfield dimensions (canvas CSS pixels)
    pub const PLAYFIELD_WIDTH: f32 = 800.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;

    /// Actor is pinned horizontally; the world scrolls under it
    pub const ACTOR_X: f32 = 160.0;

    /// Below this angular distance the actor snaps to its target angle
    pub const ANGLE_EPSILON: f32 = 0.5;

    /// Motion never evaluates sin() outside this range
    pub const MAX_MOTION_ANGLE: f32 = 90.0;

    /// Leaderboard rows fetched when no limit is given
    pub const DEFAULT_LEADERBOARD_LIMIT: usize = 10;
}

/// Clamp an angle (degrees) to the symmetric bound `[-bound, bound]`
#[inline]
pub fn clamp_angle(angle: f32, bound: f32) -> f32 {
    let bound = bound.abs();
    angle.clamp(-bound, bound)
}

/// Sign of a value with zero mapped to zero (`f32::signum` maps 0.0 to 1.0)
#[inline]
pub fn sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}
