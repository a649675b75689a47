//! Connect Ball headless runner
//!
//! Plays one round with the demo bot at the fixed tick rate, as fast as
//! possible, then prints a summary. High scores and settings are kept in
//! the data directory between runs.

use std::path::PathBuf;

use connect_ball::autopilot;
use connect_ball::consts::RESTART_DELAY_TICKS;
use connect_ball::persistence::FileStorage;
use connect_ball::sim::Difficulty;
use connect_ball::{Game, GamePhase, InputEvent, Settings};

const USAGE: &str =
    "usage: connect-ball [--seed N] [--mode endless|easy|normal|hard] [--ticks N] [--data DIR]";

struct Args {
    seed: u64,
    mode: Option<String>,
    ticks: u32,
    data: PathBuf,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            seed: 0x00c0_ffee,
            mode: None,
            ticks: 30 * 60 * 3,
            data: PathBuf::from("connect_ball_data"),
        }
    }
}

fn parse_args(mut argv: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut args = Args::default();
    while let Some(flag) = argv.next() {
        let mut value = || argv.next().ok_or_else(|| format!("{} needs a value", flag));
        match flag.as_str() {
            "--seed" => {
                let v = value()?;
                args.seed = v.parse().map_err(|_| format!("bad seed '{}'", v))?;
            }
            "--mode" => args.mode = Some(value()?),
            "--ticks" => {
                let v = value()?;
                args.ticks = v.parse().map_err(|_| format!("bad tick count '{}'", v))?;
            }
            "--data" => args.data = PathBuf::from(value()?),
            "-h" | "--help" => return Err(String::new()),
            other => return Err(format!("unknown argument '{}'", other)),
        }
    }
    Ok(args)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(msg) => {
            if !msg.is_empty() {
                eprintln!("error: {}", msg);
            }
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    };

    log::info!("Connect Ball (headless) starting, seed {}", args.seed);

    let storage = FileStorage::new(&args.data);
    let settings = Settings::load(&storage);
    let mut game = Game::new(settings, Box::new(storage), args.seed);

    if let Some(mode) = &args.mode {
        game.set_difficulty(Difficulty::from_name_or_default(mode));
    }

    // Menu -> Intro -> Play
    game.execute_command("/play");
    game.push_input(InputEvent::PointerDown);

    let mut ticks = 0;
    while ticks < args.ticks {
        if game.phase() == GamePhase::Play {
            let aim = autopilot::plan_aim(game.state());
            game.pointer_move(aim.x, aim.y);
            if autopilot::should_fire(game.state()) {
                game.push_input(InputEvent::PointerUp);
            }
        }

        game.tick_once();
        ticks += 1;

        if game.phase() == GamePhase::Finish
            && game.state().outcome.finish_timer > RESTART_DELAY_TICKS
        {
            break;
        }
    }

    for msg in game.console().messages() {
        log::debug!("console [{:?}] {}", msg.kind, msg.text);
    }

    let state = game.state();
    let session = &state.session;
    log::info!("Stopped after {} ticks", ticks);
    println!("mode:           {}", state.difficulty.as_str());
    println!("outcome:        {:?}", state.outcome.status());
    println!("score:          {}", session.score);
    println!("best ball:      {}", session.max_ball_score);
    println!("max multiplier: {}x", session.max_mult);
    println!("balls left:     {}", state.balls.len());
    println!("high score:     {}", game.highscores().best_score);
}
