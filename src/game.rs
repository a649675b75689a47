//! Game loop driver
//!
//! Owns the single `SimState`, turns wall-clock time into fixed ticks and
//! routes input and step output:
//! - Inputs are queued and drained at the start of the next tick
//! - Pointer moves only update the aim and apply immediately
//! - Audio and persist requests are handed to their collaborators after
//!   every tick

use std::collections::VecDeque;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::audio::{AudioManager, MusicTrack, SoundCue};
use crate::console::{COMMANDS, Command, Console, MessageKind};
use crate::consts::*;
use crate::highscores::HighScores;
use crate::persistence::Storage;
use crate::settings::Settings;
use crate::sim::{Difficulty, SimState, StepEvents, fire, tick};
use crate::view::Frame;

/// Screen the game is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    /// Title screen, waiting for a click or `/play`
    #[default]
    Menu,
    /// Instructions, waiting for a click
    Intro,
    /// Round in progress
    Play,
    /// Round frozen
    Paused,
    /// Won or lost; the world keeps animating until restart
    Finish,
}

/// Discrete input, consumed at the start of the next tick
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Advance menu/intro, or restart once the finish delay has passed
    PointerDown,
    /// Fire the launcher
    PointerUp,
    SetDifficulty(Difficulty),
    Reset,
    ToggleSound,
    TogglePause,
    /// A console line such as `/mode easy`
    Command(String),
}

/// Complete game instance
pub struct Game {
    state: SimState,
    phase: GamePhase,
    rng: Pcg32,
    seed: u64,
    accumulator: f32,
    inputs: VecDeque<InputEvent>,
    /// Last pointer position, clamped to the board
    aim: Vec2,
    audio: AudioManager,
    settings: Settings,
    highscores: HighScores,
    storage: Box<dyn Storage>,
    console: Console,
    /// Output collected since the last flush
    events: StepEvents,
}

impl Game {
    /// New game with the default (logging) audio backend
    pub fn new(settings: Settings, storage: Box<dyn Storage>, seed: u64) -> Self {
        Self::with_audio(settings, storage, AudioManager::default(), seed)
    }

    pub fn with_audio(
        settings: Settings,
        storage: Box<dyn Storage>,
        mut audio: AudioManager,
        seed: u64,
    ) -> Self {
        let highscores = HighScores::load(storage.as_ref());

        audio.set_enabled(settings.sound_enabled);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_music_volume(settings.music_volume);

        let mut state = SimState::new(settings.difficulty);
        state.session.high_score = highscores.best_score;
        state.session.best_max_ball = highscores.best_max_ball;

        let mut game = Self {
            state,
            phase: GamePhase::Menu,
            rng: Pcg32::seed_from_u64(seed),
            seed,
            accumulator: 0.0,
            inputs: VecDeque::new(),
            aim: Vec2::new(LAUNCHER_X, 0.0),
            audio,
            settings,
            highscores,
            storage,
            console: Console::new(),
            events: StepEvents::new(),
        };
        game.reset();
        game.console.success("ConnectBall loaded! Type /help for help");
        game.flush();
        game
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    /// Direct state access for tools and tests
    pub fn state_mut(&mut self) -> &mut SimState {
        &mut self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn aim(&self) -> Vec2 {
        self.aim
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn highscores(&self) -> &HighScores {
        &self.highscores
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    pub fn audio(&self) -> &AudioManager {
        &self.audio
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut Console {
        &mut self.console
    }

    /// Presentation snapshot of the current state
    pub fn frame(&self) -> Frame {
        Frame::capture(&self.state, self.phase, &self.console)
    }

    /// Queue an input for the next tick
    pub fn push_input(&mut self, input: InputEvent) {
        self.inputs.push_back(input);
    }

    /// Track the pointer. Clamped to the board; the launcher only follows
    /// it while a round is being played.
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.aim = Vec2::new(x.clamp(0.0, BOARD_WIDTH), y.clamp(0.0, BOARD_HEIGHT));
        if self.phase == GamePhase::Play {
            self.state.launcher.aim_at(self.aim);
        }
    }

    /// Run as many fixed ticks as the elapsed time covers. Returns the
    /// number of ticks run.
    pub fn update(&mut self, dt: f32) -> u32 {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut ticks = 0;
        while self.accumulator >= SIM_DT && ticks < MAX_TICKS_PER_FRAME {
            self.tick_once();
            self.accumulator -= SIM_DT;
            ticks += 1;
        }
        ticks
    }

    /// One fixed tick: drain inputs, step the world if a round is on
    /// screen, then hand the output to audio and storage.
    pub fn tick_once(&mut self) -> StepEvents {
        while let Some(input) = self.inputs.pop_front() {
            self.handle_input(input);
        }

        if matches!(self.phase, GamePhase::Play | GamePhase::Finish) {
            tick(&mut self.state, &mut self.rng, &mut self.events);

            let outcome = &self.state.outcome;
            if self.phase == GamePhase::Play && (outcome.death || outcome.victory) {
                self.phase = GamePhase::Finish;
                log::info!(
                    "Round over ({}): score {}, best ball {}",
                    if outcome.victory { "victory" } else { "death" },
                    self.state.session.score,
                    self.state.session.max_ball_score
                );
            }
        }

        self.flush()
    }

    /// Start a fresh round on the menu screen
    pub fn reset(&mut self) {
        self.state.reset(self.settings.difficulty, &mut self.rng, &mut self.events);
        self.phase = GamePhase::Menu;
        self.accumulator = 0.0;
    }

    /// Reseed the generator and reset
    pub fn restart(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
        self.inputs.clear();
        self.reset();
        self.flush();
    }

    /// Change difficulty now and remember it for later resets
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.state.set_difficulty(difficulty, &mut self.events);
        self.settings.difficulty = difficulty;
        self.settings.save(self.storage.as_mut());
    }

    pub fn toggle_sound(&mut self) {
        let enabled = !self.settings.sound_enabled;
        self.settings.sound_enabled = enabled;
        self.audio.set_enabled(enabled);
        if enabled {
            self.events.sfx(SoundCue::SoundToggle);
        }
        self.settings.save(self.storage.as_mut());
        log::info!("Sound {}", if enabled { "on" } else { "off" });
    }

    /// Run a console line immediately
    pub fn execute_command(&mut self, line: &str) {
        let Some(command) = Command::parse(line) else {
            return;
        };
        let line = line.trim();
        self.console.push(MessageKind::Command, format!("> {}", line));

        match command {
            Command::Help => {
                self.console.success("=== COMMANDS ===");
                for (name, desc) in COMMANDS {
                    self.console.info(format!("/{} - {}", name, desc));
                }
                self.console.info("Example: /mode easy, /play, /sound");
            }
            Command::Mode(None) => {
                self.console.info(format!("Current mode: {}", self.state.difficulty.as_str()));
                let names: Vec<_> = Difficulty::ALL.iter().map(|d| d.as_str()).collect();
                self.console.info(format!("Available modes: {}", names.join(", ")));
            }
            Command::Mode(Some(name)) => match name.parse::<Difficulty>() {
                Ok(difficulty) => {
                    self.set_difficulty(difficulty);
                    self.console.success(format!("Mode set to: {}", difficulty.as_str()));
                    self.events.sfx(SoundCue::ModeChange);
                }
                Err(e) => self.console.error(format!("{}! Use: endless/easy/normal/hard", e)),
            },
            Command::Play => {
                if self.phase == GamePhase::Menu {
                    self.enter_intro();
                    self.console.success("Game started!");
                } else {
                    self.console.warn("A round is already running!");
                }
            }
            Command::Reset => {
                self.reset();
                self.console.success("Game reset!");
            }
            Command::Sound => {
                self.toggle_sound();
                let label = if self.settings.sound_enabled { "ON" } else { "OFF" };
                self.console.success(format!("Sound: {}", label));
            }
            Command::Score => {
                self.console.info(format!("Best score: {}", self.highscores.best_score));
                self.console.info(format!("Best max ball: {}", self.highscores.best_max_ball));
                self.console.info(format!("Current score: {}", self.state.session.score));
            }
            Command::Info => {
                self.console.success("=== CONNECTBALL INFO ===");
                self.console.info("A puzzle game about merging colored balls");
                self.console.info("Merge two equal balls to go up a color");
                self.console.info("Reach the top color to win!");
            }
            Command::Clear => {
                self.console.clear();
                self.console.success("Console cleared");
            }
            Command::Unknown(name) => {
                self.console.error(format!(
                    "Unknown command '{}'. Type /help for help",
                    name
                ));
            }
        }

        self.console.record(line);
    }

    fn handle_input(&mut self, input: InputEvent) {
        match input {
            InputEvent::PointerDown => self.pointer_down(),
            InputEvent::PointerUp => {
                if self.phase == GamePhase::Play && !self.state.outcome.finish {
                    fire(&mut self.state, &mut self.events);
                }
            }
            InputEvent::SetDifficulty(difficulty) => self.set_difficulty(difficulty),
            InputEvent::Reset => self.reset(),
            InputEvent::ToggleSound => self.toggle_sound(),
            InputEvent::TogglePause => match self.phase {
                GamePhase::Play => {
                    self.phase = GamePhase::Paused;
                    log::info!("Paused");
                }
                GamePhase::Paused => {
                    self.phase = GamePhase::Play;
                    log::info!("Resumed");
                }
                _ => {}
            },
            InputEvent::Command(line) => self.execute_command(&line),
        }
    }

    fn pointer_down(&mut self) {
        match self.phase {
            GamePhase::Menu => self.enter_intro(),
            GamePhase::Intro => {
                self.phase = GamePhase::Play;
                self.state.launcher.aim_at(self.aim);
                self.events.sfx(SoundCue::RoundStart);
                self.events.stop_music();
                self.events.music(MusicTrack::Normal);
                log::info!("Round started ({})", self.state.difficulty.as_str());
            }
            GamePhase::Finish => {
                if self.state.outcome.finish_timer > RESTART_DELAY_TICKS {
                    self.reset();
                }
            }
            GamePhase::Play | GamePhase::Paused => {}
        }
    }

    fn enter_intro(&mut self) {
        self.phase = GamePhase::Intro;
        self.events.sfx(SoundCue::ModeChange);
        self.events.stop_music();
        log::info!("Showing intro");
    }

    /// Hand collected output to the collaborators
    fn flush(&mut self) -> StepEvents {
        let events = self.events.take();

        for event in &events.audio {
            self.audio.dispatch(*event);
        }

        let mut raised = false;
        for request in &events.persist {
            raised |= self.highscores.apply(*request);
        }
        if raised {
            self.highscores.save(self.storage.as_mut());
        }

        events
    }
}
