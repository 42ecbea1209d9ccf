pub mod settings;

pub use settings::{AppConfig, Privacy, RamadhanConfig, Theme};
