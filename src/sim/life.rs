//! Life and round outcome
//!
//! Life is derived each tick from the total ball cost on the board. Going
//! below zero starts a sudden-death window; surviving it requires getting
//! life back to zero or above before the window runs out.

use super::events::StepEvents;
use super::state::Outcome;
use crate::audio::MusicTrack;
use crate::consts::SUDDEN_DEATH_TICKS;

/// Life for a given ball cost and budget: 100 at zero cost, 0 at exactly
/// the budget, falling off cubically past it
pub fn life_for_cost(life_cost: f32, max_allowed: f32) -> f32 {
    100.0 - 100.0 * (life_cost / max_allowed).powi(3)
}

/// Advance the outcome state machine by one tick. Skipped entirely for an
/// unbounded budget or once the round is won or lost.
pub fn update_outcome(
    outcome: &mut Outcome,
    life_cost: f32,
    max_allowed: f32,
    events: &mut StepEvents,
) {
    if max_allowed <= 0.0 || outcome.is_terminal() {
        return;
    }

    outcome.life = life_for_cost(life_cost, max_allowed);

    if outcome.life < 0.0 {
        if !outcome.sudden_death {
            events.music(MusicTrack::SuddenDeath);
            log::info!("Sudden death! Life {:.1}", outcome.life);
        }
        outcome.sudden_death = true;
        outcome.finish = true;
        if outcome.finish_timer >= SUDDEN_DEATH_TICKS {
            events.music(MusicTrack::Recovery);
            outcome.sudden_death = false;
            outcome.finish_timer = 0;
            outcome.death = true;
            log::info!("Game over: life ran out");
        }
    } else if outcome.finish_timer < SUDDEN_DEATH_TICKS {
        if outcome.sudden_death {
            events.stop_music();
            log::info!("Recovered from sudden death");
        }
        outcome.sudden_death = false;
        outcome.finish = false;
        outcome.finish_timer = 0;
    } else {
        // Recovered on the very tick the window closed: still a loss
        outcome.death = true;
        outcome.finish = true;
        log::info!("Game over: recovered too late");
    }
}

/// Move the displayed life toward the real value by at most 1 per tick
pub fn ease_life(outcome: &mut Outcome) {
    outcome.life_smoothed += (outcome.life - outcome.life_smoothed).clamp(-1.0, 1.0);
}
