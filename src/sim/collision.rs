//! Collision detection and scoring
//!
//! Every surface is an axis-aligned rectangle in playfield space. Gates are
//! evaluated in id order; the first hazard touched ends the run. Scoring is
//! guarded by one-way latches, so re-testing an entity that already paid out
//! is a no-op.

use super::difficulty;
use super::rect::Rect;
use super::state::{GameEvent, GamePhase, GameState, Gate, HazardSurface};
use crate::tuning::ScoringRule;

/// What the actor is touching on a single gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateContact {
    Clear,
    Hazard(HazardSurface),
    Gap,
}

/// Classify the actor against one gate. Hazards take priority over the gap.
pub fn gate_contact(actor: &Rect, gate: &Gate) -> GateContact {
    if actor.intersects(&gate.top_rect()) {
        GateContact::Hazard(HazardSurface::Top)
    } else if actor.intersects(&gate.bottom_rect()) {
        GateContact::Hazard(HazardSurface::Bottom)
    } else if actor.intersects(&gate.gap_rect()) {
        GateContact::Gap
    } else {
        GateContact::Clear
    }
}

/// Whether the gate has earned its point this frame (latch not consulted)
pub fn gate_cleared(actor: &Rect, contact: GateContact, gate: &Gate, rule: ScoringRule) -> bool {
    match rule {
        ScoringRule::GapOverlap => contact == GateContact::Gap,
        ScoringRule::TrailingEdge => gate.width > 0.0 && actor.center().x > gate.trailing_edge(),
    }
}

/// Hazard and gate-scoring pass
///
/// Returns the id of the gate that ended the run, if any.
pub fn resolve_gates(state: &mut GameState) -> Option<u32> {
    if state.phase != GamePhase::Playing {
        return None;
    }

    let actor = state.actor.hitbox();
    let rule = state.tuning.scoring_rule;

    for gate in state.gates.iter_mut() {
        let contact = gate_contact(&actor, gate);

        if let GateContact::Hazard(surface) = contact {
            state.phase = GamePhase::GameOver;
            state.events.push(GameEvent::Crashed {
                gate_id: gate.id,
                surface,
            });
            state.events.push(GameEvent::GameOver { score: state.score });
            log::info!(
                "Crashed into gate {} ({:?}) at frame {} with score {}",
                gate.id,
                surface,
                state.frame,
                state.score
            );
            return Some(gate.id);
        }

        if !gate.scored && gate_cleared(&actor, contact, gate, rule) {
            gate.scored = true;
            state.score += 1;
            state.gates_passed += 1;
            state.speed = difficulty::on_gate_passed(state.speed, &state.tuning);
            state.events.push(GameEvent::GatePassed { id: gate.id });
        }
    }

    None
}

/// Collectible pass. Skipped once the run is over so the score stays frozen.
pub fn resolve_collectibles(state: &mut GameState) {
    if state.phase != GamePhase::Playing {
        return;
    }

    let actor = state.actor.hitbox();
    for pickup in state.collectibles.iter_mut() {
        if pickup.collected || !actor.intersects(&pickup.hitbox()) {
            continue;
        }
        pickup.collected = true;
        state.score += u64::from(pickup.points);
        state.pickups_collected += 1;
        state.speed = difficulty::on_pickup(state.speed, pickup.kind, &state.tuning);
        state.events.push(GameEvent::Collected {
            id: pickup.id,
            kind: pickup.kind,
            points: pickup.points,
        });
    }
}
