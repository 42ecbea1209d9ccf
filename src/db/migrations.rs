use anyhow::Result;
use rusqlite::Connection;

pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch("
        CREATE TABLE IF NOT EXISTS prayer_logs (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            date         TEXT NOT NULL,
            prayer_name  TEXT NOT NULL CHECK(prayer_name IN
                         ('fajr','dhuhr','asr','maghrib','isha','tarawih','witir','dhuha','qiyam')),
            status       TEXT NOT NULL CHECK(status IN ('ontime','qadha','skipped')),
            created_at   TEXT DEFAULT (datetime('now')),
            UNIQUE(date, prayer_name)
        );

        CREATE TABLE IF NOT EXISTS daily_logs (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            date           TEXT NOT NULL UNIQUE,
            fasting_status TEXT CHECK(fasting_status IN ('full','partial','skip')),
            note           TEXT,
            created_at     TEXT DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS quran_logs (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            date           TEXT NOT NULL UNIQUE,
            pages_read     INTEGER NOT NULL DEFAULT 0,
            last_position  TEXT,
            created_at     TEXT DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS charity_logs (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            date       TEXT NOT NULL,
            amount     INTEGER NOT NULL CHECK(amount >= 0),
            channel    TEXT NOT NULL DEFAULT '',
            note       TEXT,
            created_at TEXT DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS habit_streaks (
            habit_key        TEXT PRIMARY KEY,
            current_streak   INTEGER NOT NULL DEFAULT 0,
            best_streak      INTEGER NOT NULL DEFAULT 0,
            last_logged_date TEXT
        );

        CREATE TABLE IF NOT EXISTS schedule_cache (
            cache_key  TEXT PRIMARY KEY,
            payload    TEXT NOT NULL,
            fetched_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS app_meta (
            key   TEXT PRIMARY KEY,
            value TEXT
        );
    ")?;

    seed_habits(conn)?;
    Ok(())
}

fn seed_habits(conn: &Connection) -> Result<()> {
    for key in crate::insights::streak::HABIT_KEYS {
        conn.execute(
            "INSERT OR IGNORE INTO habit_streaks (habit_key, current_streak, best_streak)
             VALUES (?1, 0, 0)",
            rusqlite::params![key],
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
        let habits: i64 = conn
            .query_row("SELECT COUNT(*) FROM habit_streaks", [], |row| row.get(0))
            .unwrap();
        assert_eq!(habits, 3);
    }

    #[test]
    fn prayer_log_rejects_unknown_status() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let res = conn.execute(
            "INSERT INTO prayer_logs (date, prayer_name, status) VALUES ('2026-03-17', 'fajr', 'unset')",
            [],
        );
        assert!(res.is_err());
    }
}
