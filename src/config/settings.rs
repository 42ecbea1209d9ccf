use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_location_label() -> String {
    "Jakarta".to_string()
}
fn default_locate_timeout() -> u64 {
    5
}
fn default_quran_target_pages() -> u32 {
    20
}
fn default_reciter() -> String {
    "ar.husary".to_string()
}
fn default_translation() -> String {
    "id.indonesian".to_string()
}
fn default_reminder_minutes() -> i64 {
    10
}
fn default_true() -> bool {
    true
}
fn default_ramadhan_start() -> String {
    "2026-03-17".to_string()
}
fn default_ramadhan_days() -> u32 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    #[serde(default = "default_location_label")]
    pub label: String,
    /// When latitude/longitude are unset the position is resolved each run.
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default = "default_locate_timeout")]
    pub locate_timeout_secs: u64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            label: default_location_label(),
            latitude: None,
            longitude: None,
            locate_timeout_secs: default_locate_timeout(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Privacy {
    #[default]
    Private,
    Public,
}

impl Privacy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "private" | "privat" => Some(Privacy::Private),
            "public" | "publik" => Some(Privacy::Public),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Privacy::Private => "Privat 🔒",
            Privacy::Public => "Publik",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default = "default_quran_target_pages")]
    pub quran_target_pages: u32,
    /// Monthly target, in rupiah
    #[serde(default)]
    pub charity_target: i64,
    #[serde(default)]
    pub privacy: Privacy,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            city: None,
            quran_target_pages: default_quran_target_pages(),
            charity_target: 0,
            privacy: Privacy::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuranConfig {
    #[serde(default = "default_reciter")]
    pub reciter: String,
    #[serde(default = "default_translation")]
    pub translation: String,
    /// Command used to play one clip, e.g. "mpv --no-video". The URL is appended.
    #[serde(default)]
    pub audio_player: Option<String>,
}

impl Default for QuranConfig {
    fn default() -> Self {
        Self {
            reciter: default_reciter(),
            translation: default_translation(),
            audio_player: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub imsak: bool,
    #[serde(default = "default_true")]
    pub iftar: bool,
    #[serde(default = "default_reminder_minutes")]
    pub reminder_minutes: i64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            imsak: true,
            iftar: true,
            reminder_minutes: default_reminder_minutes(),
        }
    }
}

/// The month shown by the heatmap and the day counter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RamadhanConfig {
    /// YYYY-MM-DD
    #[serde(default = "default_ramadhan_start")]
    pub start: String,
    #[serde(default = "default_ramadhan_days")]
    pub days: u32,
}

impl Default for RamadhanConfig {
    fn default() -> Self {
        Self {
            start: default_ramadhan_start(),
            days: default_ramadhan_days(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub theme: Theme,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub profile: ProfileConfig,
    #[serde(default)]
    pub quran: QuranConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
    #[serde(default)]
    pub ramadhan: RamadhanConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

impl AppConfig {
    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "imsakiyah")
            .context("Could not determine project directories")
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.data_dir().to_path_buf())
    }

    pub fn db_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("imsakiyah.db"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Reading {:?}", path))?;
        let config: AppConfig = toml::from_str(&content).context("Parsing config.toml")?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).context("Serializing config")?;
        std::fs::write(path, content).with_context(|| format!("Writing {:?}", path))?;
        Ok(())
    }

    pub fn ensure_data_dir() -> Result<PathBuf> {
        let dir = Self::data_dir()?;
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}
