use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "imsakiyah", version, author, about = "Ramadhan prayer schedule and worship tracker for the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// First-run setup (location, targets, Qur'an preferences)
    Setup {
        /// Reset existing configuration
        #[arg(long)]
        reset: bool,
    },
    /// Resolve the current position and show which coordinates would be used
    Locate {
        /// Store the located position in config.toml
        #[arg(long)]
        save: bool,
    },
    /// Show today's imsakiyah schedule and the countdown to the next moment
    Times {
        /// Show the whole month instead of today
        #[arg(long)]
        month: bool,
        /// Ignore the cached schedule and fetch again
        #[arg(long)]
        refresh: bool,
    },
    /// Record a prayer for today (or --date)
    Mark {
        /// Prayer name (fajr, dhuhr, asr, maghrib, isha, tarawih, witir, dhuha, qiyam)
        prayer: String,
        /// Performed late (qadha)
        #[arg(long, conflicts_with_all = ["skipped", "clear"])]
        late: bool,
        /// Not performed
        #[arg(long, conflicts_with = "clear")]
        skipped: bool,
        /// Remove the record
        #[arg(long)]
        clear: bool,
        /// Date as YYYY-MM-DD, defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    /// Record today's fast: full, partial, skip or unset
    Fast {
        status: String,
        /// Free-text note for the day
        #[arg(long)]
        note: Option<String>,
        #[arg(long)]
        date: Option<String>,
    },
    /// Qur'an reading log and reader
    Quran {
        #[command(subcommand)]
        action: QuranCommands,
    },
    /// Record a charity gift, in rupiah
    Charity {
        amount: i64,
        /// Where it went (masjid, online, ...)
        #[arg(long, default_value = "lainnya")]
        channel: String,
        #[arg(long)]
        note: Option<String>,
    },
    /// Show XP, streaks and progress
    Stats {
        /// Show the last 7 days
        #[arg(long)]
        week: bool,
        /// Show the Ramadhan heatmap
        #[arg(long)]
        heatmap: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum QuranCommands {
    /// Log pages read today
    Log {
        pages: u32,
        /// Replace today's total instead of adding to it
        #[arg(long)]
        total: bool,
        /// Where you stopped, e.g. "2:255"
        #[arg(long)]
        position: Option<String>,
    },
    /// List all 114 surahs
    Surahs,
    /// Print a surah with its translation
    Read {
        number: u32,
    },
    /// Play a surah's recitation verse by verse
    Play {
        number: u32,
        /// Play only this verse (1-based, within the surah)
        #[arg(long)]
        verse: Option<usize>,
    },
}
