pub mod header;
pub mod heatmap;
pub mod next_prayer;
pub mod quran;
pub mod schedule;
pub mod statusbar;
pub mod streak;
pub mod tracker;
