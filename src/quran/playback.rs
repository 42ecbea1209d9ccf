use log::warn;

use crate::models::SurahDetail;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Playing(usize),
    Stopped,
}

/// How the clip that was playing ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipOutcome {
    Finished,
    Failed,
}

/// Sequential verse playback.
///
/// `start` plays every clip in order, skipping verses without audio and
/// clips that fail. `toggle` plays a single verse and returns to idle when
/// it ends. Only one clip is ever current.
#[derive(Debug, Clone)]
pub struct Playback {
    clips: Vec<Option<String>>,
    state: PlaybackState,
    continuous: bool,
}

impl Playback {
    pub fn new(clips: Vec<Option<String>>) -> Self {
        Self {
            clips,
            state: PlaybackState::Idle,
            continuous: false,
        }
    }

    pub fn for_surah(detail: &SurahDetail) -> Self {
        Self::new(detail.ayahs.iter().map(|a| a.audio.clone()).collect())
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.state, PlaybackState::Playing(_))
    }

    pub fn current_clip(&self) -> Option<&str> {
        match self.state {
            PlaybackState::Playing(i) => self.clips.get(i)?.as_deref(),
            _ => None,
        }
    }

    fn seek_from(&mut self, index: usize) -> PlaybackState {
        let next = (index..self.clips.len()).find(|&i| self.clips[i].is_some());
        self.state = match next {
            Some(i) => PlaybackState::Playing(i),
            None => {
                self.continuous = false;
                PlaybackState::Idle
            }
        };
        self.state
    }

    /// Play all from the first verse that has audio.
    pub fn start(&mut self) -> PlaybackState {
        self.continuous = true;
        self.seek_from(0)
    }

    /// The current clip ended; move on.
    pub fn advance(&mut self, outcome: ClipOutcome) -> PlaybackState {
        let PlaybackState::Playing(index) = self.state else {
            return self.state;
        };
        if outcome == ClipOutcome::Failed {
            warn!("clip {} failed to play, skipping", index + 1);
        }
        if !self.continuous {
            self.state = PlaybackState::Idle;
            return self.state;
        }
        self.seek_from(index + 1)
    }

    pub fn stop(&mut self) -> PlaybackState {
        self.continuous = false;
        self.state = PlaybackState::Stopped;
        self.state
    }

    /// Single-verse play. Toggling the verse that is playing stops it;
    /// toggling another one cancels any play-all run.
    pub fn toggle(&mut self, index: usize) -> PlaybackState {
        self.continuous = false;
        self.state = match self.state {
            PlaybackState::Playing(i) if i == index => PlaybackState::Idle,
            _ if self.clips.get(index).is_some_and(|c| c.is_some()) => {
                PlaybackState::Playing(index)
            }
            current => current,
        };
        self.state
    }
}
