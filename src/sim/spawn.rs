//! Procedural gate and collectible generation
//!
//! Generators draw only from the session RNG and never fail: missing
//! playfield geometry produces a degenerate zero-sized entity instead.

use glam::Vec2;
use rand::Rng;
use rand::distr::{Distribution, weighted::WeightedIndex};

use super::state::{Collectible, CollectibleKind, GameEvent, GameState, Gate};
use crate::tuning::Tuning;

/// Lower/upper fraction of the free height the top span is drawn from
const TOP_SPAN_MIN_FRACTION: f32 = 0.2;
const TOP_SPAN_MAX_FRACTION: f32 = 0.6;

/// Build a gate whose left edge sits at `x`
pub fn generate_gate<R: Rng + ?Sized>(
    rng: &mut R,
    id: u32,
    x: f32,
    playfield_height: f32,
    current_score: u64,
    tuning: &Tuning,
) -> Gate {
    let gap = tuning.gap_height;
    let free = playfield_height - gap;
    if !playfield_height.is_finite() || free <= 0.0 {
        return Gate::degenerate(id, x);
    }

    let mut top_span =
        rng.random_range(free * TOP_SPAN_MIN_FRACTION..=free * TOP_SPAN_MAX_FRACTION);

    if current_score >= tuning.perturbation_threshold && tuning.perturbation_range > 0.0 {
        let range = tuning.perturbation_range;
        top_span += rng.random_range(-range..=range);
        top_span = clamp_span(top_span, free, tuning.span_margin);
    }

    Gate {
        id,
        x,
        width: tuning.gate_width,
        top_span,
        bottom_span: free - top_span,
        gap_height: gap,
        scored: false,
    }
}

/// Keep both spans at least `margin` tall
fn clamp_span(top_span: f32, free: f32, margin: f32) -> f32 {
    let hi = free - margin;
    if hi < margin {
        // Not enough room for both margins; split evenly
        return free / 2.0;
    }
    top_span.clamp(margin, hi)
}

/// Weighted kind draw
pub fn pick_kind<R: Rng + ?Sized>(rng: &mut R, tuning: &Tuning) -> CollectibleKind {
    const KINDS: [CollectibleKind; 2] = [CollectibleKind::Coin, CollectibleKind::Gem];
    match WeightedIndex::new([tuning.pickup_weights.coin, tuning.pickup_weights.gem]) {
        Ok(dist) => KINDS[dist.sample(rng)],
        Err(e) => {
            log::warn!("Invalid pickup weights ({e}), defaulting to coin");
            CollectibleKind::Coin
        }
    }
}

/// Build a collectible centered at `x`, at a random height in the safe band
pub fn generate_collectible<R: Rng + ?Sized>(
    rng: &mut R,
    id: u32,
    x: f32,
    playfield_height: f32,
    tuning: &Tuning,
) -> Collectible {
    let kind = pick_kind(rng, tuning);
    let points = tuning.pickup_points.get(kind);

    if !playfield_height.is_finite() || playfield_height <= 0.0 {
        return Collectible {
            id,
            pos: Vec2::new(x, 0.0),
            size: 0.0,
            kind,
            points,
            collected: false,
        };
    }

    let lo = tuning.pickup_margin.max(tuning.pickup_size / 2.0);
    let hi = playfield_height - lo;
    let y = if hi > lo {
        rng.random_range(lo..=hi)
    } else {
        playfield_height / 2.0
    };

    Collectible {
        id,
        pos: Vec2::new(x, y),
        size: tuning.pickup_size,
        kind,
        points,
        collected: false,
    }
}

/// Why a collectible candidate was turned away
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rejection {
    /// Vertical center within the minimum separation of an active pickup
    TooClose { other_id: u32, distance: f32 },
    /// Hitbox shares columns with a gate
    OverlapsGate { gate_id: u32 },
}

/// Check a candidate against the active pickups and gates
pub fn admit(
    candidate: &Collectible,
    active: &[Collectible],
    gates: &[Gate],
    min_separation: f32,
) -> Result<(), Rejection> {
    for other in active.iter().filter(|c| c.is_active()) {
        let distance = (other.pos.y - candidate.pos.y).abs();
        if distance < min_separation {
            return Err(Rejection::TooClose {
                other_id: other.id,
                distance,
            });
        }
    }

    let hitbox = candidate.hitbox();
    for gate in gates {
        if gate.width > 0.0 && hitbox.overlaps_columns(&gate.top_rect()) {
            return Err(Rejection::OverlapsGate { gate_id: gate.id });
        }
    }

    Ok(())
}

/// Spawn x for new entities (right edge, or 0 when geometry is missing)
fn spawn_edge(state: &GameState) -> f32 {
    if state.playfield.is_valid() {
        state.playfield.width
    } else {
        0.0
    }
}

/// Append a gate once the rightmost one has moved a full gate spacing in
/// from the spawn edge. At most one gate spawns per call.
pub fn maybe_spawn_gate(state: &mut GameState) -> Option<u32> {
    let edge = spawn_edge(state);
    let spacing = state.tuning.effective_gate_spacing();
    let rightmost = state.gates.iter().map(|g| g.x).reduce(f32::max);
    let due = match rightmost {
        None => true,
        Some(x) => x < edge - spacing,
    };
    if !due {
        return None;
    }

    let id = state.next_gate_id();
    let gate = if state.playfield.is_valid() {
        generate_gate(
            &mut state.rng,
            id,
            edge,
            state.playfield.height,
            state.score,
            &state.tuning,
        )
    } else {
        Gate::degenerate(id, edge)
    };
    log::debug!(
        "Gate {} spawned: top={:.1} gap={:.1} bottom={:.1}",
        id,
        gate.top_span,
        gate.gap_height,
        gate.bottom_span
    );
    state.gates.push(gate);
    state.events.push(GameEvent::GateSpawned { id });
    Some(id)
}

/// Try to place a collectible in the corridor behind the newest gate
///
/// The corridor runs from the gate's trailing edge to where the next gate
/// will appear. A rejected candidate leaves the distance counter alone so
/// the next gate spawn retries.
pub fn maybe_spawn_collectible(state: &mut GameState) -> Option<u32> {
    if state.scroll_since_pickup < state.tuning.pickup_spawn_distance {
        return None;
    }
    let newest = state.gates.last()?;
    if newest.width <= 0.0 {
        return None;
    }

    let next_gate_x = newest.x + state.tuning.effective_gate_spacing();
    let x = (newest.trailing_edge() + next_gate_x) / 2.0;

    let mut candidate =
        generate_collectible(&mut state.rng, 0, x, state.playfield.height, &state.tuning);
    if let Err(rejection) = admit(
        &candidate,
        &state.collectibles,
        &state.gates,
        state.tuning.pickup_min_separation,
    ) {
        log::debug!("Collectible candidate rejected: {:?}", rejection);
        return None;
    }

    candidate.id = state.next_collectible_id();
    let id = candidate.id;
    log::debug!("{:?} {} spawned at y={:.1}", candidate.kind, id, candidate.pos.y);
    state.collectibles.push(candidate);
    state.scroll_since_pickup = 0.0;
    Some(id)
}

/// Spawn step of the frame: a gate when due, and a pickup riding behind it
pub fn spawn_entities(state: &mut GameState) {
    if maybe_spawn_gate(state).is_some() {
        maybe_spawn_collectible(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Playfield;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn no_drift() -> Tuning {
        Tuning {
            perturbation_threshold: u64::MAX,
            ..Tuning::default()
        }
    }

    #[test]
    fn test_top_span_range_before_drift() {
        let tuning = no_drift();
        let mut rng = Pcg32::seed_from_u64(1);
        for id in 0..500 {
            let gate = generate_gate(&mut rng, id, 800.0, 600.0, 0, &tuning);
            assert!(gate.top_span >= 90.0 && gate.top_span <= 270.0, "{}", gate.top_span);
            assert!((gate.total_height() - 600.0).abs() < 1e-3);
            assert_eq!(gate.gap_height, 150.0);
        }
    }

    #[test]
    fn test_drift_stays_within_margins() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(2);
        for id in 0..500 {
            let gate = generate_gate(&mut rng, id, 800.0, 600.0, 10, &tuning);
            assert!(gate.top_span >= 20.0 && gate.top_span <= 430.0);
            assert!(gate.bottom_span >= 20.0);
            assert!((gate.total_height() - 600.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_drift_can_leave_base_range() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let outside = (0..500)
            .map(|id| generate_gate(&mut rng, id, 800.0, 600.0, 4, &tuning))
            .any(|g| g.top_span < 90.0 || g.top_span > 270.0);
        assert!(outside, "score >= threshold should perturb the gap");
    }

    #[test]
    fn test_missing_geometry_gives_degenerate_gate() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(4);
        let gate = generate_gate(&mut rng, 9, 0.0, 0.0, 0, &tuning);
        assert_eq!(gate.id, 9);
        assert_eq!(gate.total_height(), 0.0);
        assert!(gate.top_rect().is_empty() && gate.gap_rect().is_empty());

        let pickup = generate_collectible(&mut rng, 1, 0.0, f32::NAN, &tuning);
        assert_eq!(pickup.size, 0.0);
        assert!(pickup.hitbox().is_empty());
    }

    #[test]
    fn test_collectible_in_safe_band_with_points() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut gems = 0;
        for id in 0..1000 {
            let c = generate_collectible(&mut rng, id, 900.0, 600.0, &tuning);
            assert!(c.pos.y >= 60.0 && c.pos.y <= 540.0);
            match c.kind {
                CollectibleKind::Coin => assert_eq!(c.points, 1),
                CollectibleKind::Gem => {
                    assert_eq!(c.points, 5);
                    gems += 1;
                }
            }
        }
        // ~20% gems
        assert!((120..=280).contains(&gems), "gems = {gems}");
    }

    #[test]
    fn test_close_candidate_rejected() {
        let tuning = Tuning::default();
        let first = Collectible {
            id: 1,
            pos: Vec2::new(1000.0, 200.0),
            size: 24.0,
            kind: CollectibleKind::Coin,
            points: 1,
            collected: false,
        };
        let mut second = first.clone();
        second.id = 2;
        second.pos.y = 280.0;
        assert_eq!(
            admit(&second, &[first.clone()], &[], tuning.pickup_min_separation),
            Err(Rejection::TooClose {
                other_id: 1,
                distance: 80.0
            })
        );

        // A collected pickup no longer blocks
        let mut taken = first;
        taken.collected = true;
        assert_eq!(admit(&second, &[taken], &[], tuning.pickup_min_separation), Ok(()));
    }

    #[test]
    fn test_candidate_over_gate_column_rejected() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(6);
        let gate = generate_gate(&mut rng, 4, 800.0, 600.0, 0, &tuning);
        let candidate = generate_collectible(&mut rng, 1, 830.0, 600.0, &tuning);
        assert_eq!(
            admit(&candidate, &[], &[gate], tuning.pickup_min_separation),
            Err(Rejection::OverlapsGate { gate_id: 4 })
        );
    }

    #[test]
    fn test_gate_spawns_only_past_spacing() {
        let mut state = GameState::new(11, Tuning::default());
        assert_eq!(maybe_spawn_gate(&mut state), Some(1));
        assert_eq!(state.gates[0].x, 800.0);
        assert_eq!(maybe_spawn_gate(&mut state), None);

        state.gates[0].x = 399.0;
        assert_eq!(maybe_spawn_gate(&mut state), Some(2));
        assert_eq!(state.gates.len(), 2);
        assert_eq!(maybe_spawn_gate(&mut state), None);
    }

    #[test]
    fn test_collectible_rides_between_gates() {
        let mut state = GameState::new(12, Tuning::default());
        spawn_entities(&mut state);
        assert_eq!(state.gates.len(), 1);
        assert_eq!(state.collectibles.len(), 1);
        let pickup = &state.collectibles[0];
        // Midway between trailing edge (870) and the next gate (1200)
        assert!((pickup.pos.x - 1035.0).abs() < 1e-3);
        assert_eq!(state.scroll_since_pickup, 0.0);

        // Not eligible again until enough world has scrolled
        state.gates[0].x = 300.0;
        spawn_entities(&mut state);
        assert_eq!(state.gates.len(), 2);
        assert_eq!(state.collectibles.len(), 1);
    }

    #[test]
    fn test_spawn_with_missing_geometry_keeps_going() {
        let mut state =
            GameState::with_playfield(13, Tuning::default(), Playfield::new(0.0, 0.0));
        spawn_entities(&mut state);
        assert_eq!(state.gates.len(), 1);
        assert_eq!(state.gates[0].width, 0.0);
        assert!(state.collectibles.is_empty());
    }

    #[test]
    fn test_missing_width_gives_degenerate_gate() {
        let mut state =
            GameState::with_playfield(14, Tuning::default(), Playfield::new(0.0, 600.0));
        spawn_entities(&mut state);
        assert_eq!(state.gates.len(), 1);
        let gate = &state.gates[0];
        assert_eq!(gate.x, 0.0);
        assert_eq!(gate.total_height(), 0.0);
        assert!(gate.top_rect().is_empty() && gate.bottom_rect().is_empty());
        assert!(state.collectibles.is_empty());
    }

    #[test]
    fn test_narrow_playfield_keeps_gate_spacing() {
        let mut state =
            GameState::with_playfield(15, Tuning::default(), Playfield::new(375.0, 667.0));
        let spacing = state.tuning.effective_gate_spacing();
        let mut newest_id = 0;
        for _ in 0..300 {
            let speed = state.speed;
            for gate in &mut state.gates {
                gate.x -= speed;
            }
            state.gates.retain(|g| g.trailing_edge() >= 0.0);
            spawn_entities(&mut state);
            newest_id = newest_id.max(state.gates.last().map_or(0, |g| g.id));

            assert!(state.gates.len() <= 2, "{} gates on a 375px canvas", state.gates.len());
            for pair in state.gates.windows(2) {
                let gap = pair[1].x - pair[0].x;
                assert!(gap >= spacing, "gates {gap} apart");
                assert!(pair[0].trailing_edge() + state.tuning.actor_size <= pair[1].x);
            }
        }
        assert!(newest_id > 2, "gates should keep coming");
    }
}
