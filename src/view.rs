//! Read-only presentation snapshot
//!
//! Everything a renderer or HUD needs for one frame, captured between ticks.

use glam::Vec2;

use crate::console::{Console, Message};
use crate::consts::*;
use crate::game::GamePhase;
use crate::sim::SimState;

/// Ball fill colors by tier (1..=7)
const BALL_PALETTE: [u32; 7] = [
    0x000000, 0xf72585, 0xff9e00, 0xffd166, 0x80ed99, 0x22d3ee, 0xc084fc,
];
/// Small highlight dot colors by tier
const BALL_HIGHLIGHT: [u32; 7] = [
    0x111111, 0xc026d3, 0xff6d00, 0xffbd2e, 0x3ada7a, 0x0ea5e9, 0xa855f7,
];
/// Length of the drawn aim line
const AIM_LINE_LENGTH: f32 = 128.0;
/// Console lines shown under the menu
pub const MENU_CONSOLE_LINES: usize = 6;

fn rgb(hex: u32) -> [f32; 4] {
    let r = ((hex >> 16) & 0xff) as f32 / 255.0;
    let g = ((hex >> 8) & 0xff) as f32 / 255.0;
    let b = (hex & 0xff) as f32 / 255.0;
    [r, g, b, 1.0]
}

fn lookup(table: &[u32; 7], tier: u8) -> [f32; 4] {
    match (tier as usize).checked_sub(1).and_then(|i| table.get(i)) {
        Some(&hex) => rgb(hex),
        None => [1.0, 1.0, 1.0, 1.0],
    }
}

/// Fill color for a ball, white while blinking
pub fn ball_color(tier: u8, blink: bool) -> [f32; 4] {
    if blink {
        [1.0, 1.0, 1.0, 1.0]
    } else {
        lookup(&BALL_PALETTE, tier)
    }
}

pub fn ball_highlight(tier: u8) -> [f32; 4] {
    lookup(&BALL_HIGHLIGHT, tier)
}

#[derive(Debug, Clone, PartialEq)]
pub struct BallView {
    pub pos: Vec2,
    pub tier: u8,
    pub blink: bool,
    pub color: [f32; 4],
}

#[derive(Debug, Clone, PartialEq)]
pub struct EffectView {
    pub pos: Vec2,
    /// Floating score text; `None` for a plain spark
    pub text: Option<String>,
}

/// HUD values, percentages clamped to 0..=100
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hud {
    pub score: u64,
    pub max_ball_score: u64,
    pub life_percent: f32,
    pub stamina_percent: f32,
}

/// End-of-round card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinishSummary {
    pub victory: bool,
    pub score: u64,
    pub max_ball_score: u64,
    pub max_mult: u64,
    /// Restart is accepted once the finish delay has passed
    pub show_restart: bool,
}

/// Full-screen overlay to draw on top of the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    None,
    /// Menu card with the latest console output, oldest first
    Menu { console: Vec<Message> },
    Intro,
    Paused,
    Finish(FinishSummary),
}

/// One frame worth of presentation data
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub balls: Vec<BallView>,
    pub effects: Vec<EffectView>,
    /// Launcher position to line end; only while aiming is possible
    pub aim_line: Option<(Vec2, Vec2)>,
    pub hud: Hud,
    pub overlay: Overlay,
    /// Board background switches during sudden death
    pub sudden_death: bool,
}

impl Frame {
    pub fn capture(state: &SimState, phase: GamePhase, console: &Console) -> Self {
        let balls = state
            .balls
            .iter()
            .map(|b| {
                let blink = b.blinks(state.time_ticks);
                BallView {
                    pos: b.pos,
                    tier: b.tier,
                    blink,
                    color: ball_color(b.tier, blink),
                }
            })
            .collect();

        let effects = state
            .effects
            .iter()
            .map(|e| EffectView {
                pos: e.pos,
                text: e.text().map(str::to_string),
            })
            .collect();

        let launcher = &state.launcher;
        let aim_line = (phase == GamePhase::Play && !state.outcome.finish)
            .then(|| (launcher.pos, launcher.pos + launcher.dir * AIM_LINE_LENGTH));

        let session = &state.session;
        let hud = Hud {
            score: session.score,
            max_ball_score: session.max_ball_score,
            life_percent: state.outcome.life_smoothed.clamp(0.0, 100.0),
            stamina_percent: launcher.stamina_percent(),
        };

        let overlay = match phase {
            GamePhase::Menu => Overlay::Menu {
                console: console.recent(MENU_CONSOLE_LINES).cloned().collect(),
            },
            GamePhase::Intro => Overlay::Intro,
            GamePhase::Paused => Overlay::Paused,
            GamePhase::Play => Overlay::None,
            GamePhase::Finish => Overlay::Finish(FinishSummary {
                victory: state.outcome.victory,
                score: session.score,
                max_ball_score: session.max_ball_score,
                max_mult: session.max_mult,
                show_restart: state.outcome.finish_timer > RESTART_DELAY_TICKS,
            }),
        };

        Self {
            balls,
            effects,
            aim_line,
            hud,
            overlay,
            sudden_death: state.outcome.sudden_death,
        }
    }
}
