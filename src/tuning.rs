//! Data-driven game balance
//!
//! Every variant of the game is a `Tuning` value rather than branched code.
//! Loaded from JSON (missing fields fall back to the Classic defaults) and
//! validated before a session may use it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::state::CollectibleKind;

/// How a gate awards its point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringRule {
    /// Actor hitbox overlaps the gap rectangle
    #[default]
    GapOverlap,
    /// Actor's x has passed the gate's trailing edge
    TrailingEdge,
}

/// Named presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    #[default]
    Classic,
    Steady,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Classic => "classic",
            Variant::Steady => "steady",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(Variant::Classic),
            "steady" => Some(Variant::Steady),
            _ => None,
        }
    }

    pub fn tuning(&self) -> Tuning {
        match self {
            Variant::Classic => Tuning::default(),
            Variant::Steady => Tuning::steady(),
        }
    }
}

/// A value per collectible kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerKind<T> {
    pub coin: T,
    pub gem: T,
}

impl<T: Copy> PerKind<T> {
    pub fn get(&self, kind: CollectibleKind) -> T {
        match kind {
            CollectibleKind::Coin => self.coin,
            CollectibleKind::Gem => self.gem,
        }
    }
}

/// Rejected tuning values
#[derive(Debug, Error, PartialEq)]
pub enum TuningError {
    #[error("`{field}` must be a finite positive number (got {value})")]
    NotPositive { field: &'static str, value: f32 },
    #[error("`{field}` must be finite (got {value})")]
    NotFinite { field: &'static str, value: f32 },
    #[error("min_speed ({min}) exceeds max_speed ({max})")]
    SpeedBounds { min: f32, max: f32 },
    #[error("base_speed ({base}) lies outside [{min}, {max}]")]
    BaseSpeedOutOfBounds { base: f32, min: f32, max: f32 },
    #[error("pickup weights must not both be zero")]
    NoPickupWeight,
    #[error("max_angle must be within (0, 90] degrees (got {0})")]
    MaxAngle(f32),
    #[error("invalid tuning JSON: {0}")]
    Parse(String),
}

/// Complete balance sheet for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Actor ===
    /// Angle bound in degrees; the actor oscillates within ±max_angle
    pub max_angle: f32,
    /// Degrees the current angle moves toward the target per frame
    pub angle_step: f32,
    /// Vertical displacement per frame is |sin(angle)| * vertical_scale * speed
    pub vertical_scale: f32,
    /// Side of the actor's square hitbox
    pub actor_size: f32,

    // === Difficulty ===
    pub base_speed: f32,
    /// Multiplier applied to speed when a gate is passed
    pub up_factor: f32,
    /// Speed multiplier applied per pickup kind
    pub pickup_multipliers: PerKind<f32>,
    /// Lower speed bound (0 disables)
    pub min_speed: f32,
    /// Upper speed bound (infinity disables)
    pub max_speed: f32,

    // === Gates ===
    pub gap_height: f32,
    pub gate_width: f32,
    /// Left-edge distance between consecutive gates, measured from the
    /// spawn edge so it holds for any canvas width
    pub gate_spacing: f32,
    /// Score at which gap drift kicks in
    pub perturbation_threshold: u64,
    /// Drift is drawn from [-range, +range]
    pub perturbation_range: f32,
    /// Minimum span of either hazard after drift
    pub span_margin: f32,
    pub scoring_rule: ScoringRule,

    // === Collectibles ===
    pub pickup_weights: PerKind<f32>,
    pub pickup_points: PerKind<u32>,
    pub pickup_size: f32,
    /// Top/bottom band excluded from pickup placement
    pub pickup_margin: f32,
    /// World distance scrolled between pickup spawns
    pub pickup_spawn_distance: f32,
    /// Minimum vertical distance between active pickups
    pub pickup_min_separation: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_angle: 60.0,
            angle_step: 8.0,
            vertical_scale: 1.0,
            actor_size: 28.0,

            base_speed: 5.0,
            up_factor: 1.05,
            pickup_multipliers: PerKind {
                coin: 0.95,
                gem: 0.95,
            },
            min_speed: 2.0,
            max_speed: 15.0,

            gap_height: 150.0,
            gate_width: 70.0,
            gate_spacing: 400.0,
            perturbation_threshold: 4,
            perturbation_range: 50.0,
            span_margin: 20.0,
            scoring_rule: ScoringRule::GapOverlap,

            pickup_weights: PerKind { coin: 0.8, gem: 0.2 },
            pickup_points: PerKind { coin: 1, gem: 5 },
            pickup_size: 24.0,
            pickup_margin: 60.0,
            pickup_spawn_distance: 1000.0,
            pickup_min_separation: 150.0,
        }
    }
}

impl Tuning {
    /// Narrower swing, uniform pickups that leave speed alone
    pub fn steady() -> Self {
        Self {
            max_angle: 45.0,
            angle_step: 6.0,
            pickup_multipliers: PerKind { coin: 1.0, gem: 1.0 },
            pickup_points: PerKind { coin: 1, gem: 1 },
            scoring_rule: ScoringRule::TrailingEdge,
            ..Self::default()
        }
    }

    /// Angle added to the current angle on each flip (sign set by parity)
    #[inline]
    pub fn turn_step(&self) -> f32 {
        2.0 * self.max_angle
    }

    /// Gate pitch actually used by the spawner. Never tighter than one gate
    /// plus room for the actor to pass between two gates.
    #[inline]
    pub fn effective_gate_spacing(&self) -> f32 {
        self.gate_spacing.max(self.gate_width + self.actor_size)
    }

    /// Clamp a speed into the configured bounds
    #[inline]
    pub fn clamp_speed(&self, speed: f32) -> f32 {
        speed.clamp(self.min_speed, self.max_speed)
    }

    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning =
            serde_json::from_str(json).map_err(|e| TuningError::Parse(e.to_string()))?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("angle_step", self.angle_step),
            ("vertical_scale", self.vertical_scale),
            ("actor_size", self.actor_size),
            ("base_speed", self.base_speed),
            ("up_factor", self.up_factor),
            ("pickup_multipliers.coin", self.pickup_multipliers.coin),
            ("pickup_multipliers.gem", self.pickup_multipliers.gem),
            ("gap_height", self.gap_height),
            ("gate_width", self.gate_width),
            ("gate_spacing", self.gate_spacing),
            ("pickup_size", self.pickup_size),
            ("pickup_spawn_distance", self.pickup_spawn_distance),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(TuningError::NotPositive { field, value });
            }
        }

        let finite = [
            ("min_speed", self.min_speed),
            ("perturbation_range", self.perturbation_range),
            ("span_margin", self.span_margin),
            ("pickup_margin", self.pickup_margin),
            ("pickup_min_separation", self.pickup_min_separation),
            ("pickup_weights.coin", self.pickup_weights.coin),
            ("pickup_weights.gem", self.pickup_weights.gem),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(TuningError::NotFinite { field, value });
            }
        }

        // max_speed may be +inf to disable the ceiling
        if self.max_speed.is_nan() {
            return Err(TuningError::NotFinite {
                field: "max_speed",
                value: self.max_speed,
            });
        }

        if self.max_angle <= 0.0 || self.max_angle > crate::consts::MAX_MOTION_ANGLE {
            return Err(TuningError::MaxAngle(self.max_angle));
        }
        if self.min_speed > self.max_speed {
            return Err(TuningError::SpeedBounds {
                min: self.min_speed,
                max: self.max_speed,
            });
        }
        if self.base_speed < self.min_speed || self.base_speed > self.max_speed {
            return Err(TuningError::BaseSpeedOutOfBounds {
                base: self.base_speed,
                min: self.min_speed,
                max: self.max_speed,
            });
        }
        if self.pickup_weights.coin < 0.0
            || self.pickup_weights.gem < 0.0
            || self.pickup_weights.coin + self.pickup_weights.gem <= 0.0
        {
            return Err(TuningError::NoPickupWeight);
        }
        Ok(())
    }
}
