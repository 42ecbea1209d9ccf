pub mod client;
pub mod playback;

pub use client::{load_surah, AlQuranCloud, ContentSource};
pub use playback::{ClipOutcome, Playback, PlaybackState};
