use anyhow::{anyhow, bail, Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use log::{info, warn};
use rusqlite::Connection;
use std::io::{self, BufRead, Write};
use std::process::Command;
use std::str::FromStr;
use std::time::Duration;

use crate::cli::args::QuranCommands;
use crate::config::{AppConfig, Privacy};
use crate::db::repository::{
    CacheRepo, CharityRepo, DailyLogRepo, MetaRepo, PrayerLogRepo, QuranLogRepo,
};
use crate::insights::xp::xp_for;
use crate::insights::{self, heatmap, refresh_streaks, total_xp, Ramadhan};
use crate::models::{
    Coordinates, FastingStatus, HeatLevel, Moment, MonthSchedule, PrayerName, PrayerStatus,
};
use crate::prayer_times::location::Locator;
use crate::prayer_times::{
    coordinates_for, next_prayer, resolve_coordinates, upcoming_reminder, AladhanClient,
    IpLocator, ScheduleService,
};
use crate::quran::{load_surah, AlQuranCloud, ClipOutcome, ContentSource, Playback, PlaybackState};
use crate::utils::dates;
use crate::utils::format::{format_minutes, format_rupiah, pad, progress_bar};

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const GOLD: &str = "\x1b[38;2;196;160;68m";

// ─── Setup ───────────────────────────────────────────────────────────────────

pub fn handle_setup(conn: &Connection, config: &mut AppConfig, reset: bool) -> Result<()> {
    if !reset && MetaRepo::get(conn, "setup_done")?.as_deref() == Some("1") {
        println!("Imsakiyah is already configured. Use --reset to reconfigure.");
        return Ok(());
    }

    println!();
    println_colored!(GOLD, "  Imsakiyah setup");
    println_colored!(DIM, "  Press Enter to keep the value in brackets.");
    println!();

    let label = prompt(&format!("  City name [{}]: ", config.location.label))?;
    if !label.is_empty() {
        config.location.label = label;
    }

    println_colored!(DIM, "  Leave coordinates empty to locate automatically on each run.");
    let lat = prompt("  Latitude: ")?;
    let lon = prompt("  Longitude: ")?;
    match (lat.trim(), lon.trim()) {
        ("", "") => {
            config.location.latitude = None;
            config.location.longitude = None;
        }
        (lat, lon) => {
            let lat: f64 = lat.parse().with_context(|| format!("Bad latitude '{}'", lat))?;
            let lon: f64 = lon.parse().with_context(|| format!("Bad longitude '{}'", lon))?;
            if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
                bail!("Coordinates ({}, {}) are out of range", lat, lon);
            }
            config.location.latitude = Some(lat);
            config.location.longitude = Some(lon);
        }
    }

    let pages = prompt(&format!(
        "  Daily Qur'an target in pages [{}]: ",
        config.profile.quran_target_pages
    ))?;
    if !pages.is_empty() {
        config.profile.quran_target_pages = pages.parse().context("Pages must be a number")?;
    }

    let charity = prompt(&format!(
        "  Monthly charity target in rupiah [{}]: ",
        config.profile.charity_target
    ))?;
    if !charity.is_empty() {
        config.profile.charity_target = charity.parse().context("Amount must be a number")?;
    }

    let privacy = prompt(&format!(
        "  Profile privacy, private or public [{}]: ",
        config.profile.privacy.label()
    ))?;
    if !privacy.is_empty() {
        config.profile.privacy = Privacy::parse(&privacy)
            .ok_or_else(|| anyhow!("Privacy must be 'private' or 'public'"))?;
    }

    let player = prompt("  Audio player command, e.g. \"mpv --no-video\" (optional): ")?;
    if !player.is_empty() {
        config.quran.audio_player = Some(player);
    }

    let notify = prompt("  Show Imsak and Iftar reminders in the dashboard? [y/N]: ")?;
    config.notifications.enabled = matches!(notify.trim(), "y" | "Y" | "yes");

    config.profile.city = Some(config.location.label.clone());
    config.save()?;
    // Cached months are keyed by the old coordinates.
    CacheRepo::clear_all(conn)?;
    MetaRepo::set(conn, "setup_done", "1")?;
    info!("configuration saved to {:?}", AppConfig::config_path()?);

    println!();
    println_colored!(GREEN, "  ✓ Saved. Run `imsakiyah times` to see today's schedule.");
    println!();
    Ok(())
}

// ─── Locate ──────────────────────────────────────────────────────────────────

pub fn handle_locate(config: &mut AppConfig, save: bool) -> Result<()> {
    let locator = IpLocator::new();
    let timeout = Duration::from_secs(config.location.locate_timeout_secs);
    let coords = resolve_coordinates(Some(&locator as &dyn Locator), timeout);

    println!();
    println_colored!(BOLD, "  {}  ({:.4}, {:.4})", coords.label, coords.latitude, coords.longitude);

    if save {
        config.location.latitude = Some(coords.latitude);
        config.location.longitude = Some(coords.longitude);
        config.location.label = coords.label.clone();
        config.save()?;
        println_colored!(GREEN, "  ✓ Stored in config.toml");
    }
    println!();
    Ok(())
}

// ─── Times ───────────────────────────────────────────────────────────────────

fn current_coordinates(config: &AppConfig) -> Coordinates {
    let locator = IpLocator::new();
    coordinates_for(config, Some(&locator as &dyn Locator))
}

fn fetch_context(coords: &Coordinates, date: NaiveDate) -> String {
    format!(
        "Fetching the imsakiyah schedule for {}-{:02} at {}",
        date.year(),
        date.month(),
        coords.label
    )
}

pub fn handle_times(conn: &Connection, config: &AppConfig, month: bool, refresh: bool) -> Result<()> {
    let now = Local::now().naive_local();
    let today = now.date();
    let coords = current_coordinates(config);
    let service = ScheduleService::new(AladhanClient::new()?);

    if month {
        let schedule = if refresh {
            service.refresh(conn, &coords, today.year(), today.month())
        } else {
            service.month_schedule(conn, &coords, today.year(), today.month())
        }
        .with_context(|| fetch_context(&coords, today))?;
        if schedule.is_empty() {
            bail!("The prayer-times service returned no days for {}-{:02}", today.year(), today.month());
        }
        print_month(&schedule, &coords, &dates::iso(today));
        return Ok(());
    }

    if refresh {
        service
            .refresh(conn, &coords, today.year(), today.month())
            .with_context(|| fetch_context(&coords, today))?;
    }
    let day = service
        .day(conn, &coords, today)
        .with_context(|| fetch_context(&coords, today))?
        .ok_or_else(|| anyhow!("No timings for {} at {}", dates::iso(today), coords.label))?;

    let ramadhan = Ramadhan::from_config(&config.ramadhan)?;
    println!();
    println_colored!(GOLD, "  Imsakiyah · {}", coords.label);
    print!("  {}  ·  {}", day.readable_date, day.hijri_label);
    match ramadhan.day_of_ramadhan(today) {
        0 => println!(),
        n => println!("  ·  Ramadhan hari ke-{}", n),
    }
    println!();

    let current_time = now.time();
    for moment in Moment::ALL {
        let time = day.times.get(moment);
        let line = format!("  {}  {}", pad(moment.label(), 16), time);
        match day.times.parsed(moment) {
            Some(t) if t <= current_time => println_colored!(DIM, "{}", line),
            _ => println_colored!(BOLD, "{}", line),
        }
    }

    let next = next_prayer(&day.times, now);
    println!();
    if next.is_next_day {
        println_colored!(AMBER, "  Next: {} ({})", next.label, next.time);
    } else {
        println_colored!(
            AMBER,
            "  Next: {} at {} in {}",
            next.label,
            next.time,
            format_minutes(next.minutes_remaining)
        );
    }
    if let Some(reminder) = upcoming_reminder(&day.times, now, &config.notifications) {
        println_colored!(RED, "  {}", reminder.message());
    }
    println!();
    Ok(())
}

fn print_month(schedule: &MonthSchedule, coords: &Coordinates, today_iso: &str) {
    println!();
    println_colored!(GOLD, "  Jadwal Imsakiyah · {}", coords.label);
    println!();
    let mut header = format!("  {}{}", pad("Tanggal", 12), pad("Hijriah", 22));
    for moment in Moment::ALL {
        header.push_str(&pad(moment.label(), 9));
    }
    println_colored!(DIM, "{}", header);

    for day in &schedule.days {
        let mut line = format!("  {}{}", pad(&day.iso_date, 12), pad(&day.hijri_label, 22));
        for (_, time) in day.times.iter() {
            line.push_str(&pad(time, 9));
        }
        if day.iso_date == today_iso {
            println_colored!(BOLD, "{}", line);
        } else {
            println!("{}", line);
        }
    }
    println!();
}

// ─── Tracker ─────────────────────────────────────────────────────────────────

fn resolve_date(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(d) => dates::parse_iso(d),
        None => Ok(Local::now().date_naive()),
    }
}

pub fn status_from_flags(late: bool, skipped: bool, clear: bool) -> PrayerStatus {
    if clear {
        PrayerStatus::Unset
    } else if late {
        PrayerStatus::Qadha
    } else if skipped {
        PrayerStatus::Skipped
    } else {
        PrayerStatus::OnTime
    }
}

pub fn handle_mark(conn: &Connection, prayer: &str, status: PrayerStatus, date: Option<&str>) -> Result<()> {
    let prayer = PrayerName::from_str(prayer).map_err(|_| {
        anyhow!(
            "Unknown prayer '{}'. Use: fajr, dhuhr, asr, maghrib, isha, tarawih, witir, dhuha, qiyam",
            prayer
        )
    })?;
    let date = resolve_date(date)?;
    PrayerLogRepo::set_status(conn, &dates::iso(date), prayer, status)?;
    refresh_streaks(conn, Local::now().date_naive())?;

    let xp = insights::xp::prayer_xp(prayer, status);
    match status {
        PrayerStatus::OnTime => println_colored!(GREEN, "  ✓ {} on time  +{} XP", prayer.display_name(), xp),
        PrayerStatus::Qadha => println_colored!(AMBER, "  ◑ {} qadha  +{} XP", prayer.display_name(), xp),
        PrayerStatus::Skipped => println_colored!(RED, "  ✗ {} skipped", prayer.display_name()),
        PrayerStatus::Unset => println_colored!(DIM, "  ○ {} cleared", prayer.display_name()),
    }

    let marked = PrayerLogRepo::get_by_date(conn, &dates::iso(date))?;
    if !marked.is_empty() {
        let strip: Vec<String> = marked
            .iter()
            .map(|log| format!("{} {}", status_glyph(log.status), log.prayer_name.display_name()))
            .collect();
        println_colored!(DIM, "  {}: {}", dates::readable_date(date), strip.join("  "));
    }
    Ok(())
}

fn status_glyph(status: PrayerStatus) -> &'static str {
    match status {
        PrayerStatus::OnTime => "✓",
        PrayerStatus::Qadha => "◑",
        PrayerStatus::Skipped => "✗",
        PrayerStatus::Unset => "○",
    }
}

pub fn handle_fast(conn: &Connection, status: &str, note: Option<&str>, date: Option<&str>) -> Result<()> {
    let status = FastingStatus::from_str(status)
        .map_err(|_| anyhow!("Unknown fasting status '{}'. Use: full, partial, skip, unset", status))?;
    let date = resolve_date(date)?;
    DailyLogRepo::upsert(conn, &dates::iso(date), status, note)?;
    refresh_streaks(conn, Local::now().date_naive())?;

    let color = match status {
        FastingStatus::Full => GREEN,
        FastingStatus::Partial => AMBER,
        FastingStatus::Skip => RED,
        FastingStatus::Unset => DIM,
    };
    println_colored!(color, "  {} · {}", dates::readable_date(date), status.display_name());
    Ok(())
}

pub fn handle_charity(
    conn: &Connection,
    config: &AppConfig,
    amount: i64,
    channel: &str,
    note: Option<&str>,
) -> Result<()> {
    if amount <= 0 {
        bail!("Amount must be positive");
    }
    let today = dates::iso(Local::now().date_naive());
    // Charity scores once per day however many entries it has.
    let first_today = CharityRepo::get_date_range(conn, &today, &today)?.is_empty();
    CharityRepo::add(conn, &today, amount, channel, note)?;
    let total = CharityRepo::total(conn)?;

    let xp = if first_today { xp_for("charity") } else { 0 };
    println_colored!(GREEN, "  ✓ {} via {}  +{} XP", format_rupiah(amount), channel, xp);
    if config.profile.charity_target > 0 {
        let bar = progress_bar(
            total.clamp(0, u32::MAX as i64) as u32,
            config.profile.charity_target.clamp(0, u32::MAX as i64) as u32,
            20,
        );
        println!(
            "  {}  {} / {}",
            bar,
            format_rupiah(total),
            format_rupiah(config.profile.charity_target)
        );
    } else {
        println!("  Total: {}", format_rupiah(total));
    }
    Ok(())
}

// ─── Qur'an ──────────────────────────────────────────────────────────────────

pub fn handle_quran(conn: &Connection, config: &AppConfig, action: &QuranCommands) -> Result<()> {
    match action {
        QuranCommands::Log {
            pages,
            total,
            position,
        } => {
            let today = dates::iso(Local::now().date_naive());
            if *total {
                QuranLogRepo::set_pages(conn, &today, *pages, position.as_deref())?;
            } else {
                QuranLogRepo::add_pages(conn, &today, *pages, position.as_deref())?;
            }
            refresh_streaks(conn, Local::now().date_naive())?;
            let read = QuranLogRepo::get(conn, &today)?.map(|l| l.pages_read).unwrap_or(0);
            let target = config.profile.quran_target_pages;
            println_colored!(GREEN, "  ✓ Today's reading: {} pages", read);
            println!("  {}  {}/{}", progress_bar(read, target, 20), read, target);
        }
        QuranCommands::Surahs => {
            let client = AlQuranCloud::new()?;
            let surahs = client.surah_list().context("Fetching the surah list")?;
            println!();
            for s in &surahs {
                println!(
                    "  {:>3}  {}{}{:>4} ayat  {}",
                    s.number,
                    pad(&s.english_name, 18),
                    pad(&s.english_name_translation, 28),
                    s.number_of_ayahs,
                    s.name
                );
            }
            println!();
        }
        QuranCommands::Read { number } => {
            let client = AlQuranCloud::new()?;
            let detail = load_surah(&client, *number, &config.quran.translation, &config.quran.reciter)
                .context("Fetching surah")?;
            println!();
            println_colored!(
                GOLD,
                "  {}. {} · {} ({} ayat, {})",
                detail.surah.number,
                detail.surah.english_name,
                detail.surah.name,
                detail.surah.number_of_ayahs,
                detail.surah.revelation_type
            );
            println!();
            for ayah in &detail.ayahs {
                println_colored!(BOLD, "  [{}] {}", ayah.number_in_surah, ayah.text);
                if let Some(t) = &ayah.translation {
                    println_colored!(DIM, "      {}", t);
                }
            }
            if let Some(last) = detail.ayahs.last() {
                let position = format!("{}:{}", detail.surah.number, last.number_in_surah);
                println!();
                println_colored!(
                    DIM,
                    "  Log it with: imsakiyah quran log {} --position {}",
                    detail.page_span(),
                    position
                );
            }
            println!();
        }
        QuranCommands::Play { number, verse } => {
            let client = AlQuranCloud::new()?;
            let detail = load_surah(&client, *number, &config.quran.translation, &config.quran.reciter)
                .context("Fetching surah")?;
            play(&detail, *verse, config.quran.audio_player.as_deref())?;
        }
    }
    Ok(())
}

/// "mpv --no-video" + url → ("mpv", ["--no-video", url])
pub fn player_command(player: &str, url: &str) -> Option<(String, Vec<String>)> {
    let mut parts = player.split_whitespace().map(str::to_string);
    let program = parts.next()?;
    let mut args: Vec<String> = parts.collect();
    args.push(url.to_string());
    Some((program, args))
}

fn play(detail: &crate::models::SurahDetail, verse: Option<usize>, player: Option<&str>) -> Result<()> {
    let mut playback = Playback::for_surah(detail);
    let state = match verse {
        Some(0) => bail!("Verses are numbered from 1"),
        Some(v) => playback.toggle(v - 1),
        None => playback.start(),
    };
    if state == PlaybackState::Idle {
        println_colored!(DIM, "  Nothing to play.");
        return Ok(());
    }

    let player = player.and_then(|p| player_command(p, "").map(|_| p));
    if player.is_none() {
        println_colored!(DIM, "  No audio_player configured; listing clips instead.");
    }

    while playback.is_playing() {
        let PlaybackState::Playing(index) = playback.state() else {
            break;
        };
        let Some(url) = playback.current_clip().map(str::to_string) else {
            break;
        };
        let ayah = &detail.ayahs[index];
        println_colored!(AMBER, "  ▶ {}:{}  {}", detail.surah.number, ayah.number_in_surah, url);

        let outcome = match player.and_then(|p| player_command(p, &url)) {
            None => ClipOutcome::Finished,
            Some((program, args)) => match Command::new(&program).args(&args).status() {
                Ok(s) if s.success() => ClipOutcome::Finished,
                Ok(s) if interrupted(s.code()) => {
                    info!("{} was interrupted, stopping playback", program);
                    playback.stop();
                    println_colored!(DIM, "  ■ Stopped at {}:{}", detail.surah.number, ayah.number_in_surah);
                    break;
                }
                Ok(s) => {
                    warn!("{} exited with {}", program, s);
                    ClipOutcome::Failed
                }
                Err(e) => {
                    warn!("could not start {}: {}", program, e);
                    ClipOutcome::Failed
                }
            },
        };
        playback.advance(outcome);
    }
    Ok(())
}

/// A player killed by a signal has no exit code; 130 is the shell's Ctrl+C status.
pub fn interrupted(code: Option<i32>) -> bool {
    matches!(code, None | Some(130))
}

// ─── Stats ───────────────────────────────────────────────────────────────────

fn heat_glyph(level: HeatLevel, is_future: bool) -> String {
    if is_future {
        return format!("{}·\x1b[0m", DIM);
    }
    match level {
        HeatLevel::Perfect => format!("{}●\x1b[0m", GREEN),
        HeatLevel::Good => format!("{}◕\x1b[0m", GREEN),
        HeatLevel::Mid => format!("{}◑\x1b[0m", AMBER),
        HeatLevel::Low => format!("{}◔\x1b[0m", AMBER),
        HeatLevel::None => format!("{}○\x1b[0m", DIM),
    }
}

pub fn handle_stats(conn: &Connection, config: &AppConfig, week: bool, show_heatmap: bool) -> Result<()> {
    let today = Local::now().date_naive();
    let streaks = refresh_streaks(conn, today)?;

    let first = match MetaRepo::earliest_log_date(conn)? {
        Some(d) => dates::parse_iso(&d)?.min(today),
        None => today,
    };
    let history = insights::load_range(conn, first, today)?;
    let xp = total_xp(&history);
    let today_logs = history.last().map(|d| d.summary());

    println!();
    println_colored!(GOLD, "  Statistik");
    let city = config.profile.city.as_deref().unwrap_or(config.location.label.as_str());
    println_colored!(DIM, "  Profil: {} · {}", city, config.profile.privacy.label());
    println!();
    println_colored!(BOLD, "  Total XP:    {}", xp);
    if let Some(s) = &today_logs {
        println!(
            "  Hari ini:    {}/5 fardhu · {} halaman · +{} XP",
            s.prayers_done, s.pages_read, s.xp_earned
        );
    }
    for streak in &streaks {
        println!(
            "  {}{} hari (terbaik {})",
            pad(&format!("Streak {}:", streak.habit_key), 18),
            streak.current_streak,
            streak.best_streak
        );
    }
    println!("  Sedekah:     {}", format_rupiah(CharityRepo::total(conn)?));

    if week {
        println!();
        println_colored!(DIM, "  7 hari terakhir");
        for day in insights::load_week(conn, today)? {
            let s = day.summary();
            let date = dates::parse_iso(&s.date)?;
            println!(
                "  {}  {}  {}/5  {}  +{} XP",
                pad(dates::weekday_name(date.weekday()), 7),
                s.date,
                s.prayers_done,
                if s.fasting { "puasa" } else { "     " },
                s.xp_earned
            );
        }
    }

    if show_heatmap {
        let month = Ramadhan::from_config(&config.ramadhan)?;
        let logs = insights::load_range(conn, month.start, month.end())?;
        let cells = heatmap(&month, &logs, today);
        println!();
        println_colored!(DIM, "  Ramadhan  (● 5/5 + puasa, ◕ ≥4, ◑ ≥2, ◔ ≥1, ○ 0)");
        for row in cells.chunks(7) {
            let line: Vec<String> = row.iter().map(|c| heat_glyph(c.level, c.is_future)).collect();
            println!("  {}", line.join(" "));
        }
    }

    println!();
    Ok(())
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    io::stdout().flush()?;
    let mut buf = String::new();
    io::stdin().lock().read_line(&mut buf)?;
    Ok(buf.trim_end_matches('\n').trim_end_matches('\r').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_map_to_status() {
        assert_eq!(status_from_flags(false, false, false), PrayerStatus::OnTime);
        assert_eq!(status_from_flags(true, false, false), PrayerStatus::Qadha);
        assert_eq!(status_from_flags(false, true, false), PrayerStatus::Skipped);
        assert_eq!(status_from_flags(false, false, true), PrayerStatus::Unset);
    }

    #[test]
    fn player_command_appends_url() {
        let (program, args) = player_command("mpv --no-video", "https://x/1.mp3").unwrap();
        assert_eq!(program, "mpv");
        assert_eq!(args, vec!["--no-video", "https://x/1.mp3"]);
        assert!(player_command("   ", "u").is_none());
    }

    #[test]
    fn interrupted_player_stops_the_sequence() {
        assert!(interrupted(None));
        assert!(interrupted(Some(130)));
        assert!(!interrupted(Some(1)));
        assert!(!interrupted(Some(0)));
    }

    #[test]
    fn explicit_date_is_parsed() {
        let date = resolve_date(Some("2026-03-20")).unwrap();
        assert_eq!(dates::iso(date), "2026-03-20");
        assert!(resolve_date(Some("20/03/2026")).is_err());
    }
}
