//! Idle/demo mode - AI plays the game
//!
//! Steers toward the middle of the next gap by flipping whenever the actor
//! is heading away from it.

use super::state::GameState;

/// Half-height of the band around the aim point where no flip is issued
const DEAD_BAND: f32 = 18.0;

/// Vertical point the autopilot is steering for
pub fn aim_y(state: &GameState) -> f32 {
    let actor_left = state.actor.pos.x - state.actor.size / 2.0;
    state
        .gates
        .iter()
        .filter(|g| g.width > 0.0 && g.trailing_edge() > actor_left)
        .min_by(|a, b| a.x.total_cmp(&b.x))
        .map(|g| g.gap_center())
        .unwrap_or(state.playfield.height / 2.0)
}

/// Whether the autopilot would flip this frame
pub fn should_flip(state: &GameState) -> bool {
    if !state.is_playing() {
        return false;
    }
    let aim = aim_y(state);
    let y = state.actor.pos.y;
    let heading_down = state.actor.target_angle > 0.0;
    let heading_up = state.actor.target_angle < 0.0;

    (heading_down && y > aim + DEAD_BAND) || (heading_up && y < aim - DEAD_BAND)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Gate;
    use crate::sim::tick::{TickOutcome, tick};
    use crate::tuning::{Tuning, Variant};

    #[test]
    fn test_aims_for_next_gap() {
        let mut state = GameState::new(3, Tuning::default());
        assert_eq!(aim_y(&state), 300.0);
        state.gates.push(Gate {
            id: 1,
            x: 500.0,
            width: 70.0,
            top_span: 100.0,
            bottom_span: 350.0,
            gap_height: 150.0,
            scored: false,
        });
        assert_eq!(aim_y(&state), 175.0);

        // Descending while below the aim point -> flip
        state.actor.pos.y = 300.0;
        assert!(should_flip(&state));
        state.flip();
        assert!(!should_flip(&state));
    }

    #[test]
    fn test_autopilot_survives_a_while() {
        for variant in [Variant::Classic, Variant::Steady] {
            let mut state = GameState::new(42, variant.tuning());
            for _ in 0..3000 {
                if should_flip(&state) {
                    state.flip();
                }
                if tick(&mut state) != TickOutcome::Continue {
                    break;
                }
            }
            assert!(state.score >= 2, "{:?} scored only {}", variant, state.score);
        }
    }
}
