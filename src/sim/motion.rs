//! Actor motion: turn interpolation and vertical drift
//!
//! The actor never moves horizontally. Its vertical speed is a smooth
//! function of the current angle, scaled by the world speed.

use super::state::{Actor, Playfield};
use crate::consts::{ANGLE_EPSILON, MAX_MOTION_ANGLE};
use crate::tuning::Tuning;
use crate::{clamp_angle, sign};

/// Vertical displacement for one frame at the given angle and speed
///
/// Symmetric in the angle: `+a` and `-a` move the same distance in opposite
/// directions.
#[inline]
pub fn vertical_offset(angle: f32, speed: f32, vertical_scale: f32) -> f32 {
    let clamped = angle.clamp(-MAX_MOTION_ANGLE, MAX_MOTION_ANGLE);
    sign(clamped) * clamped.to_radians().sin().abs() * vertical_scale * speed
}

/// Move the current angle toward the target by at most `max_step`
#[inline]
pub fn interpolate_angle(current: f32, target: f32, max_step: f32) -> f32 {
    let delta = target - current;
    if delta.abs() > ANGLE_EPSILON {
        current + delta.clamp(-max_step, max_step)
    } else {
        target
    }
}

/// Advance the actor by one frame
pub fn step(actor: &mut Actor, speed: f32, tuning: &Tuning, playfield: &Playfield) {
    actor.current_angle = clamp_angle(
        interpolate_angle(actor.current_angle, actor.target_angle, tuning.angle_step),
        tuning.max_angle,
    );

    actor.pos.y += vertical_offset(actor.current_angle, speed, tuning.vertical_scale);

    if playfield.is_valid() {
        clamp_to_playfield(actor, playfield);
    }
}

/// Aim the actor the other way. A new flip always overrides a turn that is
/// still interpolating.
pub fn flip(actor: &mut Actor, tuning: &Tuning) {
    let turn = actor.parity.turn_sign() * tuning.turn_step();
    actor.target_angle = clamp_angle(actor.current_angle + turn, tuning.max_angle);
    actor.parity = actor.parity.flipped();
}

/// Keep the actor's hitbox inside the playfield (walls clamp, never kill)
pub fn clamp_to_playfield(actor: &mut Actor, playfield: &Playfield) {
    let half = actor.size / 2.0;
    let max_x = (playfield.width - half).max(half);
    let max_y = (playfield.height - half).max(half);
    actor.pos.x = actor.pos.x.clamp(half, max_x);
    actor.pos.y = actor.pos.y.clamp(half, max_y);
}
