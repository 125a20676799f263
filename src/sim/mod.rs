//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One step per displayed frame
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod difficulty;
pub mod motion;
pub mod rect;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{GateContact, gate_contact, resolve_collectibles, resolve_gates};
pub use rect::Rect;
pub use state::{
    Actor, Collectible, CollectibleKind, GameEvent, GamePhase, GameState, Gate, HazardSurface,
    Playfield, TurnParity,
};
pub use tick::{TickOutcome, tick};
