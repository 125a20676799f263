//! Scene projection: simulation model -> draw commands
//!
//! Reads only simulated coordinates, so everything drawn matches what the
//! collision pass tested against.

use glam::Vec2;

use crate::sim::rect::Rect;
use crate::sim::state::{CollectibleKind, GamePhase, GameState};

pub type Color = [f32; 4];

pub const BACKGROUND: Color = [0.06, 0.07, 0.12, 1.0];
pub const HAZARD: Color = [0.85, 0.25, 0.3, 1.0];
pub const HAZARD_SCORED: Color = [0.45, 0.2, 0.28, 1.0];
pub const COIN: Color = [1.0, 0.82, 0.2, 1.0];
pub const GEM: Color = [0.4, 0.9, 1.0, 1.0];
pub const TEXT: Color = [0.95, 0.95, 0.95, 1.0];
pub const SHADE: Color = [0.0, 0.0, 0.0, 0.55];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

/// One primitive for a painter
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Clear {
        color: Color,
    },
    Rect {
        rect: Rect,
        color: Color,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    /// Square rotated 45 degrees, `size` is the bounding box side
    Diamond {
        center: Vec2,
        size: f32,
        color: Color,
    },
    /// Actor arrow pointing along its heading (degrees, positive descends)
    Arrow {
        center: Vec2,
        size: f32,
        angle: f32,
        color: Color,
    },
    Text {
        pos: Vec2,
        text: String,
        size: f32,
        align: TextAlign,
        color: Color,
    },
}

/// Values shown on top of the playfield that the simulation does not own
#[derive(Debug, Clone, Default)]
pub struct Hud {
    pub best: Option<u64>,
    pub fps: Option<f32>,
    pub notice: Option<String>,
    pub autopilot: bool,
}

/// Actor color by speed (slow=blue, fast=orange)
fn speed_color(speed: f32, min: f32, max: f32) -> Color {
    let t = if max > min {
        ((speed - min) / (max - min)).clamp(0.0, 1.0)
    } else {
        0.0
    };
    [0.3 + 0.7 * t, 0.6 + 0.1 * t, 1.0 - 0.8 * t, 1.0]
}

/// World layer: gates, pickups and the actor
pub fn build(state: &GameState) -> Vec<DrawCmd> {
    let mut cmds = Vec::with_capacity(2 + state.gates.len() * 2 + state.collectibles.len());
    cmds.push(DrawCmd::Clear { color: BACKGROUND });

    for gate in &state.gates {
        let color = if gate.scored { HAZARD_SCORED } else { HAZARD };
        for rect in [gate.top_rect(), gate.bottom_rect()] {
            if !rect.is_empty() {
                cmds.push(DrawCmd::Rect { rect, color });
            }
        }
    }

    for pickup in state.collectibles.iter().filter(|c| c.is_active()) {
        if pickup.size <= 0.0 {
            continue;
        }
        cmds.push(match pickup.kind {
            CollectibleKind::Coin => DrawCmd::Circle {
                center: pickup.pos,
                radius: pickup.size / 2.0,
                color: COIN,
            },
            CollectibleKind::Gem => DrawCmd::Diamond {
                center: pickup.pos,
                size: pickup.size,
                color: GEM,
            },
        });
    }

    cmds.push(DrawCmd::Arrow {
        center: state.actor.pos,
        size: state.actor.size,
        angle: state.actor.current_angle,
        color: speed_color(state.speed, state.tuning.min_speed, state.tuning.max_speed),
    });

    cmds
}

/// HUD layer: score, best, notices and the game-over panel
pub fn overlay(state: &GameState, hud: &Hud) -> Vec<DrawCmd> {
    let w = state.playfield.width;
    let h = state.playfield.height;
    let mut cmds = Vec::new();

    cmds.push(DrawCmd::Text {
        pos: Vec2::new(16.0, 32.0),
        text: format!("Score {}", state.score),
        size: 24.0,
        align: TextAlign::Left,
        color: TEXT,
    });
    if let Some(best) = hud.best {
        cmds.push(DrawCmd::Text {
            pos: Vec2::new(w - 16.0, 32.0),
            text: format!("Best {}", best.max(state.score)),
            size: 18.0,
            align: TextAlign::Right,
            color: TEXT,
        });
    }
    if let Some(fps) = hud.fps {
        cmds.push(DrawCmd::Text {
            pos: Vec2::new(16.0, h - 16.0),
            text: format!("{:.0} fps", fps),
            size: 14.0,
            align: TextAlign::Left,
            color: TEXT,
        });
    }
    if hud.autopilot {
        cmds.push(DrawCmd::Text {
            pos: Vec2::new(w - 16.0, h - 16.0),
            text: "AUTOPILOT".to_string(),
            size: 14.0,
            align: TextAlign::Right,
            color: GEM,
        });
    }

    if state.phase == GamePhase::GameOver {
        cmds.push(DrawCmd::Rect {
            rect: Rect::new(0.0, 0.0, w, h),
            color: SHADE,
        });
        cmds.push(DrawCmd::Text {
            pos: Vec2::new(w / 2.0, h / 2.0 - 20.0),
            text: "GAME OVER".to_string(),
            size: 48.0,
            align: TextAlign::Center,
            color: HAZARD,
        });
        cmds.push(DrawCmd::Text {
            pos: Vec2::new(w / 2.0, h / 2.0 + 24.0),
            text: format!("Final score {}", state.score),
            size: 24.0,
            align: TextAlign::Center,
            color: TEXT,
        });
    }

    if let Some(notice) = &hud.notice {
        cmds.push(DrawCmd::Text {
            pos: Vec2::new(w / 2.0, h - 40.0),
            text: notice.clone(),
            size: 16.0,
            align: TextAlign::Center,
            color: COIN,
        });
    }

    cmds
}
