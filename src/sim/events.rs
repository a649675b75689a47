//! Side effects requested by a simulation step
//!
//! The step never talks to audio or storage directly. It appends requests
//! here and the driver drains them after the step returns.

use serde::{Deserialize, Serialize};

use crate::audio::{AudioEvent, MusicTrack, SoundCue};

/// Persisted high-water mark that was exceeded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PersistRequest {
    HighScore(u64),
    BestMaxBall(u64),
}

/// Output of one or more steps, in emission order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepEvents {
    pub audio: Vec<AudioEvent>,
    pub persist: Vec<PersistRequest>,
}

impl StepEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sfx(&mut self, cue: SoundCue) {
        self.audio.push(AudioEvent::Sfx(cue));
    }

    pub fn music(&mut self, track: MusicTrack) {
        self.audio.push(AudioEvent::Music(track));
    }

    pub fn stop_music(&mut self) {
        self.audio.push(AudioEvent::StopMusic);
    }

    pub fn persist(&mut self, request: PersistRequest) {
        self.persist.push(request);
    }

    pub fn is_empty(&self) -> bool {
        self.audio.is_empty() && self.persist.is_empty()
    }

    /// Whether a given cue was requested
    pub fn has_sfx(&self, cue: SoundCue) -> bool {
        self.audio.contains(&AudioEvent::Sfx(cue))
    }

    /// Move everything out, leaving this list empty
    pub fn take(&mut self) -> StepEvents {
        std::mem::take(self)
    }
}
