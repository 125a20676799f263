//! Speed scalar adjustments
//!
//! Passing a gate speeds the world up; grabbing a pickup slows it down.
//! Results are clamped into `[min_speed, max_speed]`.

use super::state::CollectibleKind;
use crate::tuning::Tuning;

pub fn on_gate_passed(speed: f32, tuning: &Tuning) -> f32 {
    tuning.clamp_speed(speed * tuning.up_factor)
}

pub fn on_pickup(speed: f32, kind: CollectibleKind, tuning: &Tuning) -> f32 {
    tuning.clamp_speed(speed * tuning.pickup_multipliers.get(kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_gates_compound() {
        let tuning = Tuning::default();
        let mut speed = tuning.base_speed;
        for _ in 0..3 {
            speed = on_gate_passed(speed, &tuning);
        }
        assert!((speed - 5.0 * 1.05f32.powi(3)).abs() < 1e-4);
        assert!((speed - 5.788).abs() < 1e-3);
    }

    #[test]
    fn test_pickup_slows_down() {
        let tuning = Tuning::default();
        assert!((on_pickup(10.0, CollectibleKind::Coin, &tuning) - 9.5).abs() < 1e-5);
        assert!((on_pickup(10.0, CollectibleKind::Gem, &tuning) - 9.5).abs() < 1e-5);
    }

    #[test]
    fn test_steady_pickups_keep_speed() {
        let tuning = Tuning::steady();
        assert_eq!(on_pickup(7.0, CollectibleKind::Gem, &tuning), 7.0);
    }

    #[test]
    fn test_bounds_hold() {
        let tuning = Tuning::default();
        let mut speed = tuning.base_speed;
        for _ in 0..200 {
            speed = on_gate_passed(speed, &tuning);
        }
        assert_eq!(speed, tuning.max_speed);
        for _ in 0..200 {
            speed = on_pickup(speed, CollectibleKind::Coin, &tuning);
        }
        assert_eq!(speed, tuning.min_speed);
    }
}
