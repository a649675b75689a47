//! Ball-ball collision detection and response
//!
//! One pass visits every unordered pair in index order. Equal tiers merge
//! into the next tier; different tiers exchange velocity across the contact
//! and get pushed apart. Consumed balls are tombstoned during the pass and
//! dropped at the end of it.

use glam::Vec2;
use rand::Rng;

use super::events::StepEvents;
use super::geom::{contact_axis, decompose, len_sq};
use super::state::{Ball, SimState};
use crate::audio::SoundCue;
use crate::consts::*;

/// Resolve every interacting pair once, then drop dead balls
pub fn resolve_collisions<R: Rng>(state: &mut SimState, rng: &mut R, events: &mut StepEvents) {
    let n = state.balls.len();
    for i in 0..n {
        if state.balls[i].dead {
            continue;
        }
        for j in (i + 1)..n {
            if state.balls[j].dead {
                continue;
            }
            resolve_pair(state, i, j, rng, events);
        }
    }
    state.balls.retain(|b| !b.dead);
}

/// Resolve a single pair (`i < j`). Does nothing if either ball is dead or
/// they are out of reach.
pub fn resolve_pair<R: Rng>(
    state: &mut SimState,
    i: usize,
    j: usize,
    rng: &mut R,
    events: &mut StepEvents,
) {
    let (b1, b2) = (&state.balls[i], &state.balls[j]);
    if b1.dead || b2.dead {
        return;
    }
    let d = b1.pos - b2.pos;
    let sqrdist = len_sq(d);
    if sqrdist >= INTERACTION_DIST_SQ {
        return;
    }

    if b1.tier == b2.tier {
        merge(state, i, j, d, sqrdist, rng, events);
    } else if sqrdist > 0.0 {
        bounce(state, i, j, d, sqrdist, events);
    }
}

/// Radial impulse on every live ball within `radius` of `center`
pub fn bomb(balls: &mut [Ball], center: Vec2, radius: f32, strength: f32) {
    for ball in balls.iter_mut().filter(|b| !b.dead) {
        let d = ball.pos - center;
        let dist = (len_sq(d) + DIST_EPSILON).sqrt();
        if dist < radius {
            ball.vel += d * strength / dist;
        }
    }
}

/// Borrow two distinct balls mutably (`i < j`)
fn pair_mut(balls: &mut [Ball], i: usize, j: usize) -> (&mut Ball, &mut Ball) {
    debug_assert!(i < j);
    let (lo, hi) = balls.split_at_mut(j);
    (&mut lo[i], &mut hi[0])
}

/// Same tier: `i` absorbs `j`
fn merge<R: Rng>(
    state: &mut SimState,
    i: usize,
    j: usize,
    d: Vec2,
    sqrdist: f32,
    rng: &mut R,
    events: &mut StepEvents,
) {
    let dist = (sqrdist + DIST_EPSILON).sqrt();
    let n = contact_axis(d, dist);

    let (b1, b2) = pair_mut(&mut state.balls, i, j);
    b1.pos = (b1.pos + b2.pos) * 0.5;
    b1.vel += b2.vel;
    let combo = b1.mult as u64 * b2.mult as u64;
    let exploded = if b1.tier < MAX_TIER {
        b1.tier += 1;
        events.sfx(SoundCue::for_merge_tier(b1.tier));
        false
    } else {
        true
    };
    let (pos, vel, tier) = (b1.pos, b1.vel, b1.tier);

    if exploded {
        explode(state, i, pos, vel, rng, events);
    }

    state.balls[j].dead = true;

    let session = &mut state.session;
    session.ball_mult = (session.ball_mult + combo).min(MAX_COMBO_MULT);
    let delta = session.ball_mult * BALL_VALUE[tier.min(MAX_TIER) as usize];
    session.ball_score += delta;
    session.score += delta;

    let label_vel = if n.y > 0.0 { -n } else { n };
    state.spawn_label(pos, label_vel, tier, format!("+{}", delta));

    let b1 = &mut state.balls[i];
    b1.mult = (b1.mult * 2).min(MAX_BALL_MULT);

    log::debug!("Merge into tier {} (+{}, combo x{})", tier, delta, state.session.ball_mult);
}

/// Two top-tier balls met: blast the board, remove the survivor and, on a
/// bounded difficulty, win the round
fn explode<R: Rng>(
    state: &mut SimState,
    i: usize,
    pos: Vec2,
    vel: Vec2,
    rng: &mut R,
    events: &mut StepEvents,
) {
    bomb(&mut state.balls, pos, BOMB_RADIUS, BOMB_STRENGTH);
    state.balls[i].dead = true;

    for _ in 0..EXPLOSION_PARTICLES {
        let jitter = Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5) * 3.0;
        state.spawn_spark(pos, vel * 0.5 + jitter, 0.5, 3);
    }

    let max_allowed = state.max_allowed();
    let outcome = &mut state.outcome;
    if !outcome.death && max_allowed > 0.0 {
        if !outcome.victory {
            outcome.finish_timer = 0;
            events.stop_music();
            log::info!("Victory! Top tier reached");
        }
        outcome.victory = true;
        outcome.finish = true;
    }

    events.sfx(SoundCue::Explosion);
}

/// Different tiers: swap the velocity components along the line of
/// centers, push apart, and try to trigger both multipliers
fn bounce(
    state: &mut SimState,
    i: usize,
    j: usize,
    d: Vec2,
    sqrdist: f32,
    events: &mut StepEvents,
) {
    let dist = sqrdist.sqrt();
    let n = contact_axis(d, dist);

    let (b1, b2) = pair_mut(&mut state.balls, i, j);
    let (along1, across1) = decompose(b1.vel, n);
    let (along2, across2) = decompose(b2.vel, n);

    let push = (PUSH_APART_DIST - dist).max(0.0) * 0.5 / dist;
    b1.pos += d * push;
    b2.pos -= d * push;

    b1.vel = along1 + across2;
    b2.vel = along2 + across1;

    let hit1 = b1.try_boost_mult();
    let hit2 = b2.try_boost_mult();
    if !(hit1 || hit2) {
        return;
    }

    let best = b1.mult.max(b2.mult);
    b1.mult = best;
    b2.mult = best;

    let mid = (b1.pos + b2.pos) * 0.5;
    let avg_vel = (b1.vel + b2.vel) * 0.5;
    let speed = b1.vel.abs().element_sum() + b2.vel.abs().element_sum();

    state.spawn_spark(mid, avg_vel, 0.25, 2);
    if speed > 1.0 {
        events.sfx(SoundCue::ComboBounce);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioEvent;
    use crate::sim::state::{Difficulty, EffectKind};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn board(difficulty: Difficulty, balls: &[(Vec2, Vec2, u8)]) -> SimState {
        let mut state = SimState::new(difficulty);
        for &(pos, vel, tier) in balls {
            state.spawn_ball(pos, tier).vel = vel;
        }
        state
    }

    fn run(state: &mut SimState) -> StepEvents {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut events = StepEvents::new();
        resolve_collisions(state, &mut rng, &mut events);
        events
    }

    #[test]
    fn test_head_on_merge_at_zero_distance() {
        let p = Vec2::new(50.0, 50.0);
        let mut state = board(
            Difficulty::Normal,
            &[(p, Vec2::new(1.0, 0.0), 1), (p, Vec2::new(-1.0, 0.0), 1)],
        );

        let events = run(&mut state);

        assert_eq!(state.balls.len(), 1);
        let ball = &state.balls[0];
        assert_eq!(ball.tier, 2);
        assert_eq!(ball.idx, 0);
        assert_eq!(ball.pos, p);
        assert_eq!(ball.vel, Vec2::ZERO);
        assert_eq!(ball.mult, 2);
        // Combo multiplier goes 1 -> 2 before scoring
        assert_eq!(state.session.ball_mult, 2);
        assert_eq!(state.session.score, 2 * BALL_VALUE[2]);
        assert_eq!(state.session.ball_score, state.session.score);
        assert_eq!(state.effects.len(), 1);
        assert_eq!(state.effects[0].text(), Some("+4"));
        assert!(events.has_sfx(SoundCue::MergeLow));
    }

    #[test]
    fn test_merge_momentum_and_midpoint() {
        let mut state = board(
            Difficulty::Normal,
            &[
                (Vec2::new(40.0, 40.0), Vec2::new(2.0, 1.0), 4),
                (Vec2::new(44.0, 40.0), Vec2::new(-1.0, 0.5), 4),
            ],
        );
        state.balls[0].mult = 2;
        state.balls[1].mult = 4;

        let events = run(&mut state);

        let ball = &state.balls[0];
        assert_eq!(ball.tier, 5);
        assert_eq!(ball.pos, Vec2::new(42.0, 40.0));
        assert_eq!(ball.vel, Vec2::new(1.0, 1.5));
        assert_eq!(ball.mult, 4);
        assert_eq!(state.session.ball_mult, 1 + 8);
        assert_eq!(state.session.score, 9 * BALL_VALUE[5]);
        assert!(events.has_sfx(SoundCue::MergeMid));
    }

    #[test]
    fn test_top_tier_merge_explodes_and_wins() {
        let mut state = board(
            Difficulty::Normal,
            &[
                (Vec2::new(64.0, 64.0), Vec2::ZERO, MAX_TIER),
                (Vec2::new(66.0, 64.0), Vec2::ZERO, MAX_TIER),
                (Vec2::new(100.0, 64.0), Vec2::ZERO, 1),
            ],
        );

        let events = run(&mut state);

        assert_eq!(state.balls.len(), 1);
        let survivor = &state.balls[0];
        assert_eq!(survivor.tier, 1);
        assert!(survivor.vel.x > 4.9 && survivor.vel.y.abs() < 1e-4);

        let sparks = state
            .effects
            .iter()
            .filter(|e| e.kind == EffectKind::Spark)
            .count();
        assert_eq!(sparks, EXPLOSION_PARTICLES);
        assert!(state.outcome.victory);
        assert!(state.outcome.finish);
        assert_eq!(state.session.score, 2 * BALL_VALUE[7]);
        assert!(events.audio.contains(&AudioEvent::StopMusic));
        assert!(events.has_sfx(SoundCue::Explosion));
    }

    #[test]
    fn test_top_tier_merge_in_endless_is_not_victory() {
        let mut state = board(
            Difficulty::Endless,
            &[
                (Vec2::new(64.0, 64.0), Vec2::ZERO, MAX_TIER),
                (Vec2::new(64.0, 68.0), Vec2::ZERO, MAX_TIER),
            ],
        );

        run(&mut state);

        assert!(state.balls.is_empty());
        assert!(!state.outcome.victory);
        assert!(!state.outcome.finish);
    }

    #[test]
    fn test_top_tier_merge_after_death_is_not_victory() {
        let mut state = board(
            Difficulty::Normal,
            &[
                (Vec2::new(64.0, 64.0), Vec2::ZERO, MAX_TIER),
                (Vec2::new(64.0, 68.0), Vec2::ZERO, MAX_TIER),
            ],
        );
        state.outcome.death = true;

        run(&mut state);

        assert!(!state.outcome.victory);
    }

    #[test]
    fn test_out_of_range_tier_merges_as_top_tier() {
        let mut state = board(
            Difficulty::Normal,
            &[
                (Vec2::new(64.0, 64.0), Vec2::ZERO, 9),
                (Vec2::new(64.0, 66.0), Vec2::ZERO, 9),
            ],
        );

        let events = run(&mut state);

        assert!(state.balls.is_empty());
        assert_eq!(state.session.score, 2 * BALL_VALUE[MAX_TIER as usize]);
        assert!(events.has_sfx(SoundCue::Explosion));
    }

    #[test]
    fn test_bounce_swaps_and_pushes_apart() {
        let mut state = board(
            Difficulty::Normal,
            &[
                (Vec2::new(60.0, 60.0), Vec2::new(1.0, 0.0), 1),
                (Vec2::new(65.0, 60.0), Vec2::new(-1.0, 0.0), 2),
            ],
        );

        let events = run(&mut state);

        assert_eq!(state.balls.len(), 2);
        let (a, b) = (&state.balls[0], &state.balls[1]);
        assert!((a.vel - Vec2::new(-1.0, 0.0)).length() < 1e-5);
        assert!((b.vel - Vec2::new(1.0, 0.0)).length() < 1e-5);
        assert!(((a.pos - b.pos).length() - PUSH_APART_DIST).abs() < 1e-4);
        assert_eq!((a.mult, b.mult), (2, 2));
        assert_eq!((a.lastmult, b.lastmult), (MULT_COOLDOWN, MULT_COOLDOWN));
        assert_eq!(state.effects.len(), 1);
        assert!(events.has_sfx(SoundCue::ComboBounce));
    }

    #[test]
    fn test_bounce_syncs_multiplier_to_higher() {
        let mut state = board(
            Difficulty::Normal,
            &[
                (Vec2::new(60.0, 60.0), Vec2::ZERO, 1),
                (Vec2::new(60.0, 66.0), Vec2::ZERO, 3),
            ],
        );
        state.balls[0].mult = 8;
        state.balls[0].lastmult = MULT_COOLDOWN;

        let events = run(&mut state);

        assert_eq!(state.balls[0].mult, 8);
        assert_eq!(state.balls[1].mult, 8);
        // Resting balls: combo without sound
        assert!(!events.has_sfx(SoundCue::ComboBounce));
    }

    #[test]
    fn test_coincident_different_tiers_are_skipped() {
        let p = Vec2::new(30.0, 30.0);
        let mut state = board(
            Difficulty::Normal,
            &[(p, Vec2::new(1.0, 0.0), 1), (p, Vec2::new(0.0, 1.0), 2)],
        );
        let before = state.balls.clone();

        let events = run(&mut state);

        assert_eq!(state.balls, before);
        assert!(events.is_empty());
    }

    #[test]
    fn test_out_of_reach_pairs_untouched() {
        let mut state = board(
            Difficulty::Normal,
            &[
                (Vec2::new(10.0, 10.0), Vec2::ZERO, 1),
                (Vec2::new(18.0, 10.0), Vec2::ZERO, 1),
            ],
        );
        run(&mut state);
        assert_eq!(state.balls.len(), 2);
    }

    #[test]
    fn test_merge_chain_in_one_pass() {
        // 0 and 1 merge to tier 2, which then merges with 2
        let mut state = board(
            Difficulty::Normal,
            &[
                (Vec2::new(50.0, 50.0), Vec2::ZERO, 1),
                (Vec2::new(52.0, 50.0), Vec2::ZERO, 1),
                (Vec2::new(54.0, 50.0), Vec2::ZERO, 2),
            ],
        );

        run(&mut state);

        assert_eq!(state.balls.len(), 1);
        assert_eq!(state.balls[0].tier, 3);
    }

    #[test]
    fn test_bomb_skips_dead_and_far_balls() {
        let mut balls = vec![
            Ball::new(0, Vec2::new(10.0, 0.0), 1),
            Ball::new(1, Vec2::new(200.0, 0.0), 1),
            Ball::new(2, Vec2::new(0.0, 10.0), 1),
        ];
        balls[2].dead = true;

        bomb(&mut balls, Vec2::ZERO, BOMB_RADIUS, BOMB_STRENGTH);

        assert!((balls[0].vel.x - 5.0).abs() < 1e-3);
        assert_eq!(balls[1].vel, Vec2::ZERO);
        assert_eq!(balls[2].vel, Vec2::ZERO);
    }

    proptest! {
        #[test]
        fn prop_bounce_conserves_energy(
            x in -7.0f32..7.0, y in -7.0f32..7.0,
            v1x in -5.0f32..5.0, v1y in -5.0f32..5.0,
            v2x in -5.0f32..5.0, v2y in -5.0f32..5.0,
        ) {
            prop_assume!(x * x + y * y > 0.01 && x * x + y * y < INTERACTION_DIST_SQ);
            let mut state = board(
                Difficulty::Normal,
                &[
                    (Vec2::new(64.0, 64.0), Vec2::new(v1x, v1y), 2),
                    (Vec2::new(64.0 + x, 64.0 + y), Vec2::new(v2x, v2y), 5),
                ],
            );
            let energy = |s: &SimState| s.balls.iter().map(|b| len_sq(b.vel)).sum::<f32>();
            let before = energy(&state);

            run(&mut state);

            prop_assert!((energy(&state) - before).abs() < 1e-3 * (1.0 + before));
            let gap = (state.balls[0].pos - state.balls[1].pos).length();
            prop_assert!(gap >= PUSH_APART_DIST - 1e-3);
        }

        #[test]
        fn prop_mult_stays_in_range(
            mults in proptest::collection::vec(1u32..=8, 6),
            cooldowns in proptest::collection::vec(0u32..=60, 6),
            tiers in proptest::collection::vec(1u8..=6, 6),
        ) {
            let mut state = SimState::new(Difficulty::Normal);
            for k in 0..6 {
                let ball = state.spawn_ball(Vec2::new(50.0 + k as f32 * 3.0, 50.0), tiers[k]);
                ball.mult = mults[k];
                ball.lastmult = cooldowns[k];
            }

            run(&mut state);

            for ball in &state.balls {
                prop_assert!((1..=MAX_BALL_MULT).contains(&ball.mult));
                prop_assert!(ball.lastmult <= MULT_COOLDOWN);
            }
        }
    }
}
