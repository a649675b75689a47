//! Demo bot
//!
//! Plays the game without a human: aims at the nearest ball the next shot
//! can merge with and fires whenever the launcher has stamina for it.

use glam::Vec2;

use crate::sim::SimState;

/// Board point the bot wants to aim at
pub fn plan_aim(state: &SimState) -> Vec2 {
    let launcher = &state.launcher;

    // Closest ball of the tier we are about to launch
    let target = state
        .balls
        .iter()
        .filter(|b| !b.dead && b.tier == launcher.next_tier)
        .min_by(|a, b| {
            a.pos
                .distance_squared(launcher.pos)
                .partial_cmp(&b.pos.distance_squared(launcher.pos))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    match target {
        Some(ball) => ball.pos,
        None => Vec2::new(launcher.pos.x, 0.0),
    }
}

/// Fire when a shot would be accepted and the round is still running
pub fn should_fire(state: &SimState) -> bool {
    state.launcher.can_fire() && !state.outcome.finish
}
