//! Ball physics and round state
//!
//! Pure and deterministic given the caller's RNG. Balls are processed in
//! creation order, one fixed tick at a time. Sound cues and score writes are
//! collected in `StepEvents` for the driver to carry out.

pub mod collision;
pub mod events;
pub mod geom;
pub mod launcher;
pub mod life;
pub mod state;
pub mod tick;

pub use collision::{bomb, resolve_collisions, resolve_pair};
pub use events::{PersistRequest, StepEvents};
pub use launcher::{Launcher, fire};
pub use life::{ease_life, life_for_cost, update_outcome};
pub use state::{
    Ball, Difficulty, Effect, EffectKind, Outcome, OutcomeStatus, Session, SimState,
};
pub use tick::tick;
