use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    pub current: u32,
    pub best: u32,
}

/// Stored streak counter for one habit ("daily", "fasting", "quran").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitStreak {
    pub habit_key: String,
    pub current_streak: u32,
    pub best_streak: u32,
    pub last_logged_date: Option<String>,
}

/// 0 = nothing, 1 = low, 2 = mid, 3 = good, 4 = all fard prayers plus a full fast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HeatLevel {
    None,
    Low,
    Mid,
    Good,
    Perfect,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatDay {
    pub date: String,
    /// 1..=30
    pub day: u32,
    pub level: HeatLevel,
    pub prayers: u32,
    pub fasting: bool,
    pub is_future: bool,
}

/// One day's totals, as shown in the weekly view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: String,
    pub prayers_done: u32,
    pub fasting: bool,
    pub pages_read: u32,
    pub charity_amount: i64,
    pub xp_earned: u32,
}
