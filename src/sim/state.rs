//! Game state and core simulation types
//!
//! Everything a step reads or writes lives in `SimState`. The driver owns
//! the single instance; presentation only reads it between steps.

use std::str::FromStr;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::events::StepEvents;
use super::launcher::Launcher;
use crate::audio::MusicTrack;
use crate::consts::*;
use crate::error::UnknownDifficulty;

/// Difficulty, which sets the life budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Difficulty {
    /// No life budget, no victory or death
    Endless,
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Endless,
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Endless => "endless",
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }

    /// Parse a name, falling back to `Normal` for anything unknown
    pub fn from_name_or_default(s: &str) -> Self {
        s.parse().unwrap_or_else(|e: UnknownDifficulty| {
            log::warn!("{}, using normal", e);
            Difficulty::Normal
        })
    }

    /// Total ball cost tolerated before life runs out (0 = unbounded)
    pub fn life_budget(&self) -> f32 {
        match self {
            Difficulty::Endless => 0.0,
            Difficulty::Easy => 50.0,
            Difficulty::Normal => 40.0,
            Difficulty::Hard => 34.0,
        }
    }
}

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    /// Case-insensitive, surrounding whitespace ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "endless" => Ok(Difficulty::Endless),
            "easy" => Ok(Difficulty::Easy),
            "normal" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(UnknownDifficulty(s.to_string())),
        }
    }
}

/// A ball entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    /// Creation order id
    pub idx: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Color tier, 1..=MAX_TIER
    pub tier: u8,
    /// Consumed during the current collision pass
    pub dead: bool,
    /// Combo multiplier, 1..=MAX_BALL_MULT
    pub mult: u32,
    /// Multiplier cooldown, counted down every sub-step
    pub lastmult: u32,
}

impl Ball {
    pub fn new(idx: u32, pos: Vec2, tier: u8) -> Self {
        Self {
            idx,
            pos,
            vel: Vec2::ZERO,
            tier,
            dead: false,
            mult: 1,
            lastmult: 0,
        }
    }

    /// Double the multiplier if the cooldown allows it.
    /// Returns true when it triggered.
    pub fn try_boost_mult(&mut self) -> bool {
        if self.lastmult > MULT_READY {
            return false;
        }
        self.mult = (self.mult * 2).min(MAX_BALL_MULT);
        self.lastmult = MULT_COOLDOWN;
        true
    }

    /// Life upkeep of this ball
    pub fn cost(&self) -> f32 {
        BALL_COST[self.tier.min(MAX_TIER) as usize]
    }

    /// Highlight flash: top tier, or capped multiplier early in its cooldown
    pub fn blinks(&self, time_ticks: u64) -> bool {
        let flagged = self.tier == MAX_TIER || (self.mult >= MAX_BALL_MULT && self.lastmult > 30);
        flagged && (time_ticks / BLINK_PERIOD) % 2 == 0
    }
}

/// What a visual effect shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EffectKind {
    Spark,
    ScoreLabel { text: String },
}

/// A short-lived visual effect (not gameplay-affecting)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining lifetime in seconds
    pub ttl: f32,
    /// Palette index
    pub color: u8,
    pub kind: EffectKind,
}

impl Effect {
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            EffectKind::ScoreLabel { text } => Some(text),
            EffectKind::Spark => None,
        }
    }
}

/// Score bookkeeping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub score: u64,
    /// Score since the last shot
    pub ball_score: u64,
    pub max_ball_score: u64,
    /// Combo multiplier applied to merge score, reset each shot
    pub ball_mult: u64,
    pub max_mult: u64,
    /// Persisted best total score
    pub high_score: u64,
    /// Persisted best `max_ball_score`
    pub best_max_ball: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            score: 0,
            ball_score: 0,
            max_ball_score: 0,
            ball_mult: 1,
            max_mult: 1,
            high_score: 0,
            best_max_ball: 0,
        }
    }
}

/// Life and round outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// Raw life, may go negative
    pub life: f32,
    /// Eased copy of `life` for display
    pub life_smoothed: f32,
    pub victory: bool,
    pub death: bool,
    /// Set during sudden death and after victory/death
    pub finish: bool,
    /// Ticks since `finish` became true
    pub finish_timer: u32,
    pub sudden_death: bool,
}

impl Default for Outcome {
    fn default() -> Self {
        Self {
            life: 100.0,
            life_smoothed: 100.0,
            victory: false,
            death: false,
            finish: false,
            finish_timer: 0,
            sudden_death: false,
        }
    }
}

/// Coarse outcome state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    Normal,
    SuddenDeath,
    Victory,
    Death,
}

impl Outcome {
    pub fn status(&self) -> OutcomeStatus {
        if self.victory {
            OutcomeStatus::Victory
        } else if self.death {
            OutcomeStatus::Death
        } else if self.sudden_death {
            OutcomeStatus::SuddenDeath
        } else {
            OutcomeStatus::Normal
        }
    }

    /// Victory or death reached; sticky until reset
    pub fn is_terminal(&self) -> bool {
        self.victory || self.death
    }
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimState {
    pub difficulty: Difficulty,
    /// Active balls in creation order
    pub balls: Vec<Ball>,
    /// Visual effects
    #[serde(skip)]
    pub effects: Vec<Effect>,
    pub launcher: Launcher,
    pub session: Session,
    pub outcome: Outcome,
    /// Ticks since reset
    pub time_ticks: u64,
    next_idx: u32,
}

impl Default for SimState {
    fn default() -> Self {
        Self::new(Difficulty::Normal)
    }
}

impl SimState {
    /// Empty board with the given difficulty. Call `reset` to seed a round.
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            balls: Vec::new(),
            effects: Vec::new(),
            launcher: Launcher::new(),
            session: Session::default(),
            outcome: Outcome::default(),
            time_ticks: 0,
            next_idx: 0,
        }
    }

    /// Life budget for the current difficulty
    pub fn max_allowed(&self) -> f32 {
        self.difficulty.life_budget()
    }

    /// Switch difficulty mid-round. An unbounded budget has no sudden
    /// death, so a running one is called off.
    pub fn set_difficulty(&mut self, difficulty: Difficulty, events: &mut StepEvents) {
        if difficulty != self.difficulty {
            log::info!("Difficulty set to {}", difficulty.as_str());
        }
        self.difficulty = difficulty;

        let outcome = &mut self.outcome;
        if self.difficulty.life_budget() <= 0.0 && !outcome.is_terminal() {
            if outcome.sudden_death {
                events.stop_music();
                log::info!("Sudden death called off");
            }
            outcome.sudden_death = false;
            outcome.finish = false;
            outcome.finish_timer = 0;
            outcome.life = 100.0;
        }
    }

    /// Start a new round: clear everything except the persisted marks and
    /// seed six low-tier balls on a 3x2 grid.
    pub fn reset<R: Rng>(&mut self, difficulty: Difficulty, rng: &mut R, events: &mut StepEvents) {
        events.stop_music();

        let high_score = self.session.high_score;
        let best_max_ball = self.session.best_max_ball;

        self.difficulty = difficulty;
        self.balls.clear();
        self.effects.clear();
        self.next_idx = 0;
        self.time_ticks = 0;
        self.launcher = Launcher::new();
        self.session = Session {
            high_score,
            best_max_ball,
            ..Session::default()
        };
        self.outcome = Outcome::default();

        let mut idx_budget = 0;
        for i in 0..3 {
            for j in 0..2 {
                let kind: u32 = rng.random_range(0..3);
                idx_budget += 1 << kind;
                let x = 16.0 + j as f32 * 64.0 + rng.random::<f32>() * 32.0;
                let y = 8.0 + i as f32 * 32.0 + rng.random::<f32>() * 16.0;
                self.spawn_ball(Vec2::new(x, y), kind as u8 + 1);
            }
        }
        self.next_idx = idx_budget;

        events.music(MusicTrack::Normal);
        log::info!(
            "Round reset ({} balls, {})",
            self.balls.len(),
            self.difficulty.as_str()
        );
    }

    /// Allocate the next creation-order id
    pub fn next_ball_idx(&mut self) -> u32 {
        let idx = self.next_idx;
        self.next_idx += 1;
        idx
    }

    /// Add a resting ball and return it
    pub fn spawn_ball(&mut self, pos: Vec2, tier: u8) -> &mut Ball {
        let idx = self.next_ball_idx();
        self.balls.push(Ball::new(idx, pos, tier));
        let last = self.balls.len() - 1;
        &mut self.balls[last]
    }

    pub fn spawn_spark(&mut self, pos: Vec2, vel: Vec2, ttl: f32, color: u8) {
        self.effects.push(Effect {
            pos,
            vel,
            ttl,
            color,
            kind: EffectKind::Spark,
        });
    }

    pub fn spawn_label(&mut self, pos: Vec2, vel: Vec2, color: u8, text: String) {
        self.effects.push(Effect {
            pos,
            vel,
            ttl: 1.0,
            color,
            kind: EffectKind::ScoreLabel { text },
        });
    }

    /// Sum of per-tier upkeep over active balls
    pub fn life_cost(&self) -> f32 {
        self.balls.iter().map(Ball::cost).sum()
    }
}
