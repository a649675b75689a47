//! Audio cues and the audio collaborator
//!
//! The simulation only names cues; playing them is the backend's job. Cue
//! and track codes match the asset numbering (`sfxNN`, `musicNN`).

use serde::{Deserialize, Serialize};

/// Sound effect cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    /// Fire rejected, not enough stamina
    LauncherEmpty,
    /// Ball launched
    LauncherFire,
    /// Multiplier triggered by a wall or ball bounce
    ComboBounce,
    /// Merge into tier 2 or 3
    MergeLow,
    /// Merge into tier 4 or 5
    MergeMid,
    /// Merge into tier 6 or 7
    MergeHigh,
    /// Two top-tier balls exploded
    Explosion,
    /// Menu/mode change
    ModeChange,
    /// Sound switched back on
    SoundToggle,
    /// Round started from the intro screen
    RoundStart,
    /// Victory jingle
    VictoryFanfare,
}

impl SoundCue {
    /// Asset code for this cue
    pub fn code(self) -> u8 {
        match self {
            SoundCue::LauncherEmpty => 9,
            SoundCue::LauncherFire => 10,
            SoundCue::ComboBounce => 11,
            SoundCue::MergeMid | SoundCue::ModeChange => 12,
            SoundCue::MergeLow | SoundCue::SoundToggle => 13,
            SoundCue::MergeHigh | SoundCue::RoundStart => 14,
            SoundCue::Explosion => 15,
            SoundCue::VictoryFanfare => 17,
        }
    }

    /// Cue for a merge that produced `tier`
    pub fn for_merge_tier(tier: u8) -> Self {
        if tier > 5 {
            SoundCue::MergeHigh
        } else if tier > 3 {
            SoundCue::MergeMid
        } else {
            SoundCue::MergeLow
        }
    }
}

/// Background music tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MusicTrack {
    Normal,
    Recovery,
    SuddenDeath,
}

impl MusicTrack {
    pub fn id(self) -> u8 {
        match self {
            MusicTrack::Normal => 0,
            MusicTrack::Recovery => 5,
            MusicTrack::SuddenDeath => 10,
        }
    }
}

/// A fire-and-forget request for the audio collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioEvent {
    Sfx(SoundCue),
    Music(MusicTrack),
    StopMusic,
}

/// Output device for audio events. Implementations swallow their own
/// playback failures.
pub trait AudioBackend {
    fn play_sfx(&mut self, cue: SoundCue, volume: f32);
    /// Start `track` and stop every other track
    fn play_music(&mut self, track: MusicTrack, volume: f32);
    fn stop_music(&mut self);
}

/// Backend that only logs; used by the headless runner
#[derive(Debug, Default)]
pub struct LogBackend;

impl AudioBackend for LogBackend {
    fn play_sfx(&mut self, cue: SoundCue, volume: f32) {
        log::debug!("sfx{:02} {:?} @ {:.2}", cue.code(), cue, volume);
    }

    fn play_music(&mut self, track: MusicTrack, volume: f32) {
        log::debug!("music{:02} {:?} @ {:.2}", track.id(), track, volume);
    }

    fn stop_music(&mut self) {
        log::debug!("music stopped");
    }
}

/// Audio manager for the game
pub struct AudioManager {
    backend: Box<dyn AudioBackend>,
    sfx_volume: f32,
    music_volume: f32,
    enabled: bool,
    current_track: Option<MusicTrack>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(Box::new(LogBackend))
    }
}

impl AudioManager {
    pub fn new(backend: Box<dyn AudioBackend>) -> Self {
        Self {
            backend,
            sfx_volume: 0.8,
            music_volume: 0.6,
            enabled: true,
            current_track: None,
        }
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turn sound on or off. Disabling stops the music immediately.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.stop_music();
        }
    }

    pub fn current_track(&self) -> Option<MusicTrack> {
        self.current_track
    }

    /// Route one event to the backend. Cues and track changes are dropped
    /// while sound is disabled; stopping always goes through.
    pub fn dispatch(&mut self, event: AudioEvent) {
        match event {
            AudioEvent::Sfx(cue) => {
                if self.enabled {
                    self.backend.play_sfx(cue, self.sfx_volume);
                }
            }
            AudioEvent::Music(track) => {
                if self.enabled {
                    self.backend.play_music(track, self.music_volume);
                    self.current_track = Some(track);
                }
            }
            AudioEvent::StopMusic => self.stop_music(),
        }
    }

    fn stop_music(&mut self) {
        self.backend.stop_music();
        self.current_track = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default, Clone)]
    struct Recorder(Rc<RefCell<Vec<String>>>);

    impl AudioBackend for Recorder {
        fn play_sfx(&mut self, cue: SoundCue, _volume: f32) {
            self.0.borrow_mut().push(format!("sfx{}", cue.code()));
        }
        fn play_music(&mut self, track: MusicTrack, _volume: f32) {
            self.0.borrow_mut().push(format!("music{}", track.id()));
        }
        fn stop_music(&mut self) {
            self.0.borrow_mut().push("stop".to_string());
        }
    }

    #[test]
    fn test_merge_cue_by_tier() {
        assert_eq!(SoundCue::for_merge_tier(2), SoundCue::MergeLow);
        assert_eq!(SoundCue::for_merge_tier(3), SoundCue::MergeLow);
        assert_eq!(SoundCue::for_merge_tier(4), SoundCue::MergeMid);
        assert_eq!(SoundCue::for_merge_tier(6), SoundCue::MergeHigh);
        assert_eq!(SoundCue::for_merge_tier(7).code(), 14);
    }

    #[test]
    fn test_disabled_manager_drops_cues() {
        let rec = Recorder::default();
        let mut audio = AudioManager::new(Box::new(rec.clone()));

        audio.dispatch(AudioEvent::Music(MusicTrack::Normal));
        assert_eq!(audio.current_track(), Some(MusicTrack::Normal));

        audio.set_enabled(false);
        audio.dispatch(AudioEvent::Sfx(SoundCue::LauncherFire));
        audio.dispatch(AudioEvent::Music(MusicTrack::SuddenDeath));

        assert_eq!(*rec.0.borrow(), vec!["music0", "stop"]);
        assert_eq!(audio.current_track(), None);
    }
}
