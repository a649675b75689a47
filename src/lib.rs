//! Connect Ball - a merge-the-balls arcade physics game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, merges, life/outcome state)
//! - `game`: Fixed-timestep driver, input queue and phase transitions
//! - `view`: Read-only presentation snapshot
//! - `audio`: Cue identifiers and the audio collaborator
//! - `persistence`: Key/value storage for high scores and settings

pub mod audio;
pub mod autopilot;
pub mod console;
pub mod error;
pub mod game;
pub mod highscores;
pub mod persistence;
pub mod settings;
pub mod sim;
pub mod view;

pub use error::{StorageError, UnknownDifficulty};
pub use game::{Game, GamePhase, InputEvent};
pub use highscores::HighScores;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (30 Hz)
    pub const SIM_DT: f32 = 1.0 / 30.0;
    /// Maximum ticks drained per frame to prevent spiral of death
    pub const MAX_TICKS_PER_FRAME: u32 = 8;
    /// Largest frame delta accepted by the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Physics sub-steps per tick
    pub const PHYSICS_SUBSTEPS: u32 = 5;

    /// Board dimensions
    pub const BOARD_WIDTH: f32 = 128.0;
    pub const BOARD_HEIGHT: f32 = 128.0;

    /// Ball centers are kept inside these bounds
    pub const WALL_MIN: f32 = 4.0;
    pub const WALL_MAX_X: f32 = 124.0;
    pub const FLOOR_Y: f32 = 112.0;
    /// Floor only bounces balls moving down faster than this
    pub const FLOOR_MIN_SPEED: f32 = 0.1;

    /// Velocity drag applied once per tick
    pub const DRAG: f32 = 0.98;
    /// Particle velocity damping per tick
    pub const PARTICLE_DAMPING: f32 = 0.95;

    /// Highest color tier; merging two of these explodes
    pub const MAX_TIER: u8 = 7;
    /// Per-ball multiplier cap
    pub const MAX_BALL_MULT: u32 = 8;
    /// Cooldown written on a multiplier trigger (sub-steps)
    pub const MULT_COOLDOWN: u32 = 60;
    /// A ball may re-trigger its multiplier once its cooldown is at or below this
    pub const MULT_READY: u32 = 55;
    /// Cap on the per-shot combo multiplier
    pub const MAX_COMBO_MULT: u64 = 999_999;

    /// Balls interact below this squared center distance (radius 8)
    pub const INTERACTION_DIST_SQ: f32 = 64.0;
    /// Different-color balls are pushed apart toward this distance
    pub const PUSH_APART_DIST: f32 = 9.0;
    /// Padding added to squared distances before division
    pub const DIST_EPSILON: f32 = 0.01;

    /// Top-tier explosion
    pub const BOMB_RADIUS: f32 = 80.0;
    pub const BOMB_STRENGTH: f32 = 5.0;
    pub const EXPLOSION_PARTICLES: usize = 20;

    /// Score per merge, indexed by resulting tier
    pub const BALL_VALUE: [u64; 8] = [0, 1, 2, 3, 5, 10, 20, 100];
    /// Life upkeep per ball, indexed by tier
    pub const BALL_COST: [f32; 8] = [0.0, 4.0, 3.5, 3.0, 2.0, 1.5, 1.0, 0.0];

    /// Ticks of grace after life first drops below zero
    pub const SUDDEN_DEATH_TICKS: u32 = 120;
    /// Finish timer value that plays the victory fanfare
    pub const VICTORY_FANFARE_TICK: u32 = 30;
    /// Finish timer must exceed this before a restart is accepted
    pub const RESTART_DELAY_TICKS: u32 = 60;

    /// Launcher defaults
    pub const LAUNCHER_X: f32 = 64.0;
    pub const LAUNCHER_Y: f32 = 120.0;
    pub const LAUNCHER_START_ROT: f32 = 0.25;
    pub const LAUNCH_POWER: f32 = 6.0;
    pub const LAUNCH_STAMINA_COST: f32 = 40.0;
    pub const STAMINA_MAX: f32 = 100.0;
    pub const STAMINA_ACCEL_START: f32 = 0.5;
    pub const STAMINA_ACCEL_GROWTH: f32 = 1.1;
    /// Aim points below this line switch to the angular remap
    pub const AIM_REMAP_Y: f32 = LAUNCHER_Y;

    /// Blink animation half-period (ticks)
    pub const BLINK_PERIOD: u64 = 8;
}
