//! The launcher at the bottom of the board

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use super::events::StepEvents;
use super::state::SimState;
use crate::audio::SoundCue;
use crate::consts::*;

/// The player's launcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Launcher {
    pub pos: Vec2,
    /// Unit aim direction
    pub dir: Vec2,
    /// Aim as a fraction of a full turn
    pub rot: f32,
    pub power: f32,
    /// 0..=STAMINA_MAX; firing costs LAUNCH_STAMINA_COST
    pub stamina: f32,
    /// Regeneration per tick, grows every tick until the next shot
    pub stamina_accel: f32,
    pub can_launch: bool,
    /// Tier of the next launched ball
    pub next_tier: u8,
}

impl Default for Launcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Launcher {
    pub fn new() -> Self {
        let mut launcher = Self {
            pos: Vec2::new(LAUNCHER_X, LAUNCHER_Y),
            dir: Vec2::NEG_Y,
            rot: LAUNCHER_START_ROT,
            power: LAUNCH_POWER,
            stamina: STAMINA_MAX,
            stamina_accel: STAMINA_ACCEL_START,
            can_launch: true,
            next_tier: 1,
        };
        launcher.set_dir_from_rot();
        launcher
    }

    /// Recompute `dir` from `rot`
    pub fn set_dir_from_rot(&mut self) {
        let angle = self.rot * TAU;
        self.dir = Vec2::new(angle.cos(), angle.sin());
        if self.dir.y == -1.0 {
            self.dir += Vec2::splat(0.01);
        }
    }

    /// Point the launcher at a board position (already clamped to the
    /// board). Aim points below the launcher map the horizontal position
    /// onto a fixed arc instead.
    pub fn aim_at(&mut self, aim: Vec2) {
        let d = aim - self.pos;
        let len = d.length().max(0.01);
        self.dir = d / len;

        if aim.y > AIM_REMAP_Y {
            let lang = 0.5 - ((aim.x - 15.0) / 196.0).clamp(0.005, 0.495);
            let angle = lang * TAU;
            self.dir = Vec2::new(angle.cos(), angle.sin());
        }
    }

    /// One tick of stamina regeneration
    pub fn regen(&mut self) {
        if self.stamina < STAMINA_MAX {
            self.stamina = (self.stamina + self.stamina_accel).min(STAMINA_MAX);
            self.stamina_accel *= STAMINA_ACCEL_GROWTH;
        }
    }

    pub fn can_fire(&self) -> bool {
        self.can_launch && self.stamina >= LAUNCH_STAMINA_COST
    }

    /// Stamina as a 0..=100 percentage
    pub fn stamina_percent(&self) -> f32 {
        (self.stamina / STAMINA_MAX * 100.0).clamp(0.0, 100.0)
    }
}

/// Launch a ball along the aim direction. Starts a new shot: per-shot
/// score and combo multiplier go back to their defaults. When the
/// launcher cannot fire nothing changes except the "empty" cue.
pub fn fire(state: &mut SimState, events: &mut StepEvents) -> bool {
    if !state.launcher.can_fire() {
        events.sfx(SoundCue::LauncherEmpty);
        return false;
    }

    let pos = state.launcher.pos;
    let vel = state.launcher.dir * state.launcher.power;
    let tier = state.launcher.next_tier;
    state.spawn_ball(pos, tier).vel = vel;

    let launcher = &mut state.launcher;
    launcher.next_tier = 1;
    launcher.stamina -= LAUNCH_STAMINA_COST;
    launcher.stamina_accel = STAMINA_ACCEL_START;
    state.session.ball_score = 0;
    state.session.ball_mult = 1;

    events.sfx(SoundCue::LauncherFire);
    log::debug!("Launched tier {} ball, vel {:?}", tier, vel);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fire_spawns_ball_and_starts_shot() {
        let mut state = SimState::default();
        state.session.ball_score = 30;
        state.session.ball_mult = 12;
        state.launcher.aim_at(Vec2::new(64.0, 20.0));
        let mut events = StepEvents::new();

        assert!(fire(&mut state, &mut events));

        let ball = &state.balls[0];
        assert_eq!(ball.pos, Vec2::new(LAUNCHER_X, LAUNCHER_Y));
        assert!((ball.vel - Vec2::new(0.0, -LAUNCH_POWER)).length() < 1e-4);
        assert_eq!(ball.tier, 1);
        assert_eq!(state.launcher.stamina, STAMINA_MAX - LAUNCH_STAMINA_COST);
        assert_eq!(state.launcher.stamina_accel, STAMINA_ACCEL_START);
        assert_eq!(state.session.ball_score, 0);
        assert_eq!(state.session.ball_mult, 1);
        assert!(events.has_sfx(SoundCue::LauncherFire));
    }

    #[test]
    fn test_fire_rejected_without_stamina() {
        let mut state = SimState::default();
        state.launcher.stamina = 35.0;
        let mut events = StepEvents::new();

        assert!(!fire(&mut state, &mut events));

        assert!(state.balls.is_empty());
        assert_eq!(state.launcher.stamina, 35.0);
        assert!(events.has_sfx(SoundCue::LauncherEmpty));
        assert!(!events.has_sfx(SoundCue::LauncherFire));
    }

    #[test]
    fn test_aim_below_launcher_uses_arc() {
        let mut launcher = Launcher::new();
        launcher.aim_at(Vec2::new(15.0, 128.0));
        // Far left maps to the clamped end of the arc
        let angle = (0.5 - 0.005) * TAU;
        assert!((launcher.dir - Vec2::new(angle.cos(), angle.sin())).length() < 1e-5);

        launcher.aim_at(Vec2::new(64.0, 60.0));
        assert!((launcher.dir - Vec2::NEG_Y).length() < 1e-5);

        // Right at the launcher's height the raw vector is still used
        launcher.aim_at(Vec2::new(100.0, AIM_REMAP_Y));
        assert!((launcher.dir - Vec2::X).length() < 1e-5);

        // Just below it the arc takes over
        launcher.aim_at(Vec2::new(113.0, AIM_REMAP_Y + 1.0));
        let angle = 0.005 * TAU;
        assert!((launcher.dir - Vec2::new(angle.cos(), angle.sin())).length() < 1e-5);
    }

    #[test]
    fn test_regen_accelerates_until_full() {
        let mut launcher = Launcher::new();
        launcher.stamina = 20.0;
        launcher.regen();
        assert!((launcher.stamina - 20.5).abs() < 1e-5);
        assert!((launcher.stamina_accel - 0.55).abs() < 1e-5);

        for _ in 0..200 {
            launcher.regen();
        }
        assert_eq!(launcher.stamina, STAMINA_MAX);
    }
}
