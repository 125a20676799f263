//! Game state and core simulation types
//!
//! Everything one play session owns lives here, including the id counters
//! and the RNG, so a restart is a plain re-initialization.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Run ended; only an explicit restart leaves this phase
    GameOver,
}

/// Direction the next flip will steer toward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnParity {
    Up,
    Down,
}

impl TurnParity {
    pub fn flipped(self) -> Self {
        match self {
            TurnParity::Up => TurnParity::Down,
            TurnParity::Down => TurnParity::Up,
        }
    }

    /// Sign applied to the turn step (negative angles climb)
    pub fn turn_sign(self) -> f32 {
        match self {
            TurnParity::Up => -1.0,
            TurnParity::Down => 1.0,
        }
    }
}

/// Playfield geometry, kept in sync with the canvas by the front-end
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            width: PLAYFIELD_WIDTH,
            height: PLAYFIELD_HEIGHT,
        }
    }
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Geometry usable for generation (a canvas that has not been laid out
    /// yet reports zero or NaN)
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// The player-controlled object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    /// Center of the hitbox; x stays put while the world scrolls
    pub pos: Vec2,
    /// Degrees, positive descends
    pub current_angle: f32,
    pub target_angle: f32,
    pub parity: TurnParity,
    /// Side of the square hitbox
    pub size: f32,
}

impl Actor {
    pub fn new(playfield: &Playfield, tuning: &Tuning) -> Self {
        let height = if playfield.is_valid() { playfield.height } else { 0.0 };
        Self {
            pos: Vec2::new(ACTOR_X, height / 2.0),
            current_angle: tuning.max_angle,
            target_angle: tuning.max_angle,
            parity: TurnParity::Up,
            size: tuning.actor_size,
        }
    }

    #[inline]
    pub fn hitbox(&self) -> Rect {
        Rect::centered(self.pos, self.size)
    }
}

/// A gated obstacle: top hazard, passable gap, bottom hazard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gate {
    pub id: u32,
    /// Left edge in world space
    pub x: f32,
    pub width: f32,
    pub top_span: f32,
    pub bottom_span: f32,
    pub gap_height: f32,
    /// One-way latch: set once when the gate awards its point
    pub scored: bool,
}

impl Gate {
    /// Zero-sized gate produced when playfield geometry is missing
    pub fn degenerate(id: u32, x: f32) -> Self {
        Self {
            id,
            x,
            width: 0.0,
            top_span: 0.0,
            bottom_span: 0.0,
            gap_height: 0.0,
            scored: false,
        }
    }

    pub fn top_rect(&self) -> Rect {
        Rect::new(self.x, 0.0, self.width, self.top_span)
    }

    pub fn gap_rect(&self) -> Rect {
        Rect::new(self.x, self.top_span, self.width, self.gap_height)
    }

    pub fn bottom_rect(&self) -> Rect {
        Rect::new(
            self.x,
            self.top_span + self.gap_height,
            self.width,
            self.bottom_span,
        )
    }

    #[inline]
    pub fn trailing_edge(&self) -> f32 {
        self.x + self.width
    }

    /// Vertical center of the gap
    #[inline]
    pub fn gap_center(&self) -> f32 {
        self.top_span + self.gap_height / 2.0
    }

    #[inline]
    pub fn total_height(&self) -> f32 {
        self.top_span + self.gap_height + self.bottom_span
    }

    /// Fully scrolled past the left edge
    #[inline]
    pub fn is_off_screen(&self) -> bool {
        self.trailing_edge() < 0.0
    }
}

/// Pickup types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectibleKind {
    /// Common, low value
    Coin,
    /// Rare, high value
    Gem,
}

/// An optional pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    pub id: u32,
    /// Center of the hitbox
    pub pos: Vec2,
    pub size: f32,
    pub kind: CollectibleKind,
    pub points: u32,
    /// One-way latch: set once when the actor picks it up
    pub collected: bool,
}

impl Collectible {
    #[inline]
    pub fn hitbox(&self) -> Rect {
        Rect::centered(self.pos, self.size)
    }

    #[inline]
    pub fn is_off_screen(&self) -> bool {
        self.pos.x + self.size / 2.0 < 0.0
    }

    /// Still in play (neither picked up nor culled)
    #[inline]
    pub fn is_active(&self) -> bool {
        !self.collected
    }
}

/// Which hazard surface of a gate was hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardSurface {
    Top,
    Bottom,
}

/// Things that happened during a tick, drained by the front-end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Flipped { parity: TurnParity },
    GateSpawned { id: u32 },
    GatePassed { id: u32 },
    Collected { id: u32, kind: CollectibleKind, points: u32 },
    Crashed { gate_id: u32, surface: HazardSurface },
    GameOver { score: u64 },
    Restarted,
}

/// Complete state of one play session (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Session RNG (all generation draws from here)
    pub rng: Pcg32,
    /// Balance in force for this session
    pub tuning: Tuning,
    pub playfield: Playfield,
    pub phase: GamePhase,
    pub score: u64,
    /// World scroll per frame
    pub speed: f32,
    /// Frames ticked while playing
    pub frame: u64,
    pub actor: Actor,
    /// Active gates (ascending id == ascending x)
    pub gates: Vec<Gate>,
    /// Active collectibles (ascending id)
    pub collectibles: Vec<Collectible>,
    pub gates_passed: u32,
    pub pickups_collected: u32,
    /// World distance scrolled since the last collectible spawned
    pub scroll_since_pickup: f32,
    /// Events produced since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_gate_id: u32,
    next_collectible_id: u32,
}

impl GameState {
    /// Create a new session with the default playfield
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self::with_playfield(seed, tuning, Playfield::default())
    }

    pub fn with_playfield(seed: u64, tuning: Tuning, playfield: Playfield) -> Self {
        let actor = Actor::new(&playfield, &tuning);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            speed: tuning.base_speed,
            // Start eligible so the first pickup shows up early
            scroll_since_pickup: tuning.pickup_spawn_distance,
            tuning,
            playfield,
            phase: GamePhase::Playing,
            score: 0,
            frame: 0,
            actor,
            gates: Vec::new(),
            collectibles: Vec::new(),
            gates_passed: 0,
            pickups_collected: 0,
            events: Vec::new(),
            next_gate_id: 1,
            next_collectible_id: 1,
        }
    }

    /// Allocate a gate id
    pub fn next_gate_id(&mut self) -> u32 {
        let id = self.next_gate_id;
        self.next_gate_id += 1;
        id
    }

    /// Allocate a collectible id (separate namespace from gates)
    pub fn next_collectible_id(&mut self) -> u32 {
        let id = self.next_collectible_id;
        self.next_collectible_id += 1;
        id
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Apply the discrete flip input. Ignored unless playing.
    pub fn flip(&mut self) -> bool {
        if !self.is_playing() {
            return false;
        }
        super::motion::flip(&mut self.actor, &self.tuning);
        self.events.push(GameEvent::Flipped {
            parity: self.actor.parity,
        });
        true
    }

    /// Start over from GameOver. Ignored in any other phase.
    ///
    /// Score, speed, entities, id counters and latches all reset; the next
    /// seed is drawn from the current RNG so replays stay deterministic.
    pub fn restart(&mut self) -> bool {
        if self.phase != GamePhase::GameOver {
            return false;
        }
        let seed = self.rng.random::<u64>();
        *self = Self::with_playfield(seed, self.tuning.clone(), self.playfield);
        self.events.push(GameEvent::Restarted);
        log::info!("Session restarted with seed: {}", seed);
        true
    }

    /// Resize the playfield (canvas resize). Entities keep their positions;
    /// the actor is clamped back inside.
    pub fn set_playfield(&mut self, playfield: Playfield) {
        self.playfield = playfield;
        if playfield.is_valid() {
            super::motion::clamp_to_playfield(&mut self.actor, &playfield);
        }
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ensure entities are sorted by id for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.gates.sort_by_key(|g| g.id);
        self.collectibles.sort_by_key(|c| c.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_defaults() {
        let state = GameState::new(7, Tuning::default());
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.speed, 5.0);
        assert_eq!(state.actor.pos, Vec2::new(ACTOR_X, PLAYFIELD_HEIGHT / 2.0));
        assert_eq!(state.actor.current_angle, 60.0);
        assert_eq!(state.actor.parity, TurnParity::Up);
        assert!(state.gates.is_empty());
    }

    #[test]
    fn test_id_namespaces_are_separate() {
        let mut state = GameState::new(7, Tuning::default());
        assert_eq!(state.next_gate_id(), 1);
        assert_eq!(state.next_gate_id(), 2);
        assert_eq!(state.next_collectible_id(), 1);
        assert_eq!(state.next_gate_id(), 3);
    }

    #[test]
    fn test_gate_rects_stack_to_height() {
        let gate = Gate {
            id: 1,
            x: 100.0,
            width: 70.0,
            top_span: 200.0,
            bottom_span: 250.0,
            gap_height: 150.0,
            scored: false,
        };
        assert_eq!(gate.top_rect(), Rect::new(100.0, 0.0, 70.0, 200.0));
        assert_eq!(gate.gap_rect(), Rect::new(100.0, 200.0, 70.0, 150.0));
        assert_eq!(gate.bottom_rect(), Rect::new(100.0, 350.0, 70.0, 250.0));
        assert_eq!(gate.total_height(), 600.0);
        assert_eq!(gate.gap_center(), 275.0);
    }

    #[test]
    fn test_flip_ignored_after_game_over() {
        let mut state = GameState::new(7, Tuning::default());
        state.phase = GamePhase::GameOver;
        let before = (state.actor.target_angle, state.actor.parity);
        assert!(!state.flip());
        assert_eq!((state.actor.target_angle, state.actor.parity), before);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_restart_only_from_game_over() {
        let mut state = GameState::new(7, Tuning::default());
        state.score = 3;
        assert!(!state.restart());
        assert_eq!(state.score, 3);

        state.phase = GamePhase::GameOver;
        state.playfield = Playfield::new(1024.0, 768.0);
        assert!(state.restart());
        assert_eq!(state.score, 0);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.playfield, Playfield::new(1024.0, 768.0));
        assert_eq!(state.next_gate_id(), 1);
        assert_eq!(state.events, vec![GameEvent::Restarted]);
    }

    #[test]
    fn test_invalid_playfield_detected() {
        assert!(Playfield::default().is_valid());
        assert!(!Playfield::new(0.0, 600.0).is_valid());
        assert!(!Playfield::new(800.0, f32::NAN).is_valid());
    }
}
