//! Fixed timestep simulation tick
//!
//! Advances the board by one `SIM_DT` step: effects, sub-stepped ball
//! physics with wall bounces and ball-ball collisions, drag, scoring maxima,
//! stamina and the life/outcome state machine.

use glam::Vec2;
use rand::Rng;

use super::collision::resolve_collisions;
use super::events::{PersistRequest, StepEvents};
use super::geom::reflect;
use super::life::{ease_life, update_outcome};
use super::state::{Ball, SimState};
use crate::audio::SoundCue;
use crate::consts::*;

/// Advance the simulation state by one fixed timestep
pub fn tick<R: Rng>(state: &mut SimState, rng: &mut R, events: &mut StepEvents) {
    age_effects(state);

    let inv = 1.0 / PHYSICS_SUBSTEPS as f32;
    for _ in 0..PHYSICS_SUBSTEPS {
        for i in 0..state.balls.len() {
            let ball = &mut state.balls[i];
            ball.pos += ball.vel * inv;

            if bounce_off_walls(ball) && ball.try_boost_mult() {
                let pos = ball.pos;
                state.spawn_spark(pos, Vec2::ZERO, 0.25, 2);
                events.sfx(SoundCue::ComboBounce);
            }

            let ball = &mut state.balls[i];
            ball.lastmult = ball.lastmult.saturating_sub(1);
        }
        resolve_collisions(state, rng, events);
    }

    for ball in &mut state.balls {
        ball.vel *= DRAG;
    }
    let life_cost = state.life_cost();

    update_records(state, events);

    state.launcher.regen();

    let max_allowed = state.max_allowed();
    update_outcome(&mut state.outcome, life_cost, max_allowed, events);
    ease_life(&mut state.outcome);

    let outcome = &mut state.outcome;
    if outcome.finish {
        outcome.finish_timer += 1;
        if outcome.victory && outcome.finish_timer == VICTORY_FANFARE_TICK {
            events.sfx(SoundCue::VictoryFanfare);
        }
    }

    state.time_ticks += 1;
}

/// Move, damp and expire visual effects
fn age_effects(state: &mut SimState) {
    for effect in &mut state.effects {
        effect.pos += effect.vel;
        effect.vel *= PARTICLE_DAMPING;
        effect.ttl -= SIM_DT;
    }
    state.effects.retain(|e| e.ttl > 0.0);
}

/// Reflect a ball off the board edges. The floor only catches balls that
/// are actually moving down, so a ball resting on it stays quiet.
/// Returns true if any wall was hit.
fn bounce_off_walls(ball: &mut Ball) -> bool {
    let mut hurt = false;

    if ball.pos.x > WALL_MAX_X || ball.pos.x < WALL_MIN {
        hurt = true;
        ball.vel = reflect(ball.vel, Vec2::Y);
        ball.pos.x += ball.vel.x;
        ball.pos.x = ball.pos.x.clamp(WALL_MIN, WALL_MAX_X);
    }

    let hits_floor = ball.pos.y > FLOOR_Y && ball.vel.y > FLOOR_MIN_SPEED;
    if hits_floor || ball.pos.y < WALL_MIN {
        hurt = true;
        ball.vel = reflect(ball.vel, Vec2::X);
        ball.pos.y += ball.vel.y;
        ball.pos.y = ball.pos.y.clamp(WALL_MIN, FLOOR_Y);
    }

    hurt
}

/// Running maxima and persisted high-water marks
fn update_records(state: &mut SimState, events: &mut StepEvents) {
    let session = &mut state.session;
    session.max_ball_score = session.max_ball_score.max(session.ball_score);

    if session.score > session.high_score {
        session.high_score = session.score;
        events.persist(PersistRequest::HighScore(session.high_score));
    }
    if session.max_ball_score > session.best_max_ball {
        session.best_max_ball = session.max_ball_score;
        events.persist(PersistRequest::BestMaxBall(session.best_max_ball));
    }

    session.max_mult = session.max_mult.max(session.ball_mult);
}
