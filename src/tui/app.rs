use anyhow::Result;
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use log::warn;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    DefaultTerminal, Frame,
};
use rusqlite::Connection;
use std::time::Duration;

use crate::config::AppConfig;
use crate::db::repository::{DailyLogRepo, MetaRepo, PrayerLogRepo, QuranLogRepo};
use crate::insights::{self, heatmap, refresh_streaks, total_xp, DayLogs, Ramadhan};
use crate::models::{
    Coordinates, DailySummary, DailyTimings, FastingStatus, HabitStreak, HeatDay, MonthSchedule,
    NextPrayer, PrayerName, PrayerStatus,
};
use crate::prayer_times::aladhan::CalendarSource;
use crate::prayer_times::location::Locator;
use crate::prayer_times::reminder::Reminder;
use crate::prayer_times::{
    coordinates_for, next_prayer, upcoming_reminder, AladhanClient, IpLocator, ScheduleService,
    Ticker,
};
use crate::tui::events::{Event, EventHandler};
use crate::tui::theme;
use crate::tui::widgets::{
    header, heatmap as heat_widget, next_prayer as next_widget, quran, schedule, statusbar,
    streak, tracker,
};
use crate::utils::dates;

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Dashboard,
    Heatmap,
    Help,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    QuranInput,
}

/// Unset → full → partial → skip → unset.
pub fn next_fasting(status: FastingStatus) -> FastingStatus {
    match status {
        FastingStatus::Unset => FastingStatus::Full,
        FastingStatus::Full => FastingStatus::Partial,
        FastingStatus::Partial => FastingStatus::Skip,
        FastingStatus::Skip => FastingStatus::Unset,
    }
}

pub struct App {
    pub view: View,
    pub config: AppConfig,
    pub coords: Coordinates,
    pub ramadhan: Ramadhan,
    pub today: NaiveDate,
    pub focus_idx: usize,
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub input_error: Option<String>,
    pub message: Option<String>,
    /// Set by [R]; the event loop performs the fetch.
    pub refresh_requested: bool,

    pub schedule: MonthSchedule,
    pub schedule_error: Option<String>,
    pub next: Option<NextPrayer>,
    pub reminder: Option<Reminder>,
    ticker: Ticker,
    last_now: Option<NaiveDateTime>,

    pub day: DayLogs,
    pub week: Vec<DailySummary>,
    pub streaks: Vec<HabitStreak>,
    pub total_xp: u32,
    pub heat: Vec<HeatDay>,
    pub quran_weekly: u32,
    pub last_position: Option<String>,
}

impl App {
    pub fn new(config: AppConfig, coords: Coordinates, ramadhan: Ramadhan, today: NaiveDate) -> Self {
        App {
            view: View::Dashboard,
            config,
            coords,
            ramadhan,
            today,
            focus_idx: 0,
            should_quit: false,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            input_error: None,
            message: None,
            refresh_requested: false,
            schedule: MonthSchedule::default(),
            schedule_error: None,
            next: None,
            reminder: None,
            ticker: Ticker::every_minute(),
            last_now: None,
            day: DayLogs::empty(&dates::iso(today)),
            week: Vec::new(),
            streaks: Vec::new(),
            total_xp: 0,
            heat: Vec::new(),
            quran_weekly: 0,
            last_position: None,
        }
    }

    fn today_iso(&self) -> String {
        dates::iso(self.today)
    }

    pub fn today_timings(&self) -> Option<&DailyTimings> {
        self.schedule.day(&self.today_iso())
    }

    /// Re-read everything the tracker panels show.
    pub fn load_tracker(&mut self, conn: &Connection) -> Result<()> {
        let week = insights::load_week(conn, self.today)?;
        self.quran_weekly = week.iter().map(|d| d.pages_read).fold(0, u32::saturating_add);
        self.week = week.iter().map(DayLogs::summary).collect();
        self.day = week
            .last()
            .cloned()
            .unwrap_or_else(|| DayLogs::empty(&self.today_iso()));

        self.streaks = refresh_streaks(conn, self.today)?;

        let first = match MetaRepo::earliest_log_date(conn)? {
            Some(d) => dates::parse_iso(&d)?.min(self.today),
            None => self.today,
        };
        self.total_xp = total_xp(&insights::load_range(conn, first, self.today)?);

        let month = insights::load_range(conn, self.ramadhan.start, self.ramadhan.end())?;
        self.heat = heatmap(&self.ramadhan, &month, self.today);
        self.last_position = QuranLogRepo::last_position(conn)?;
        Ok(())
    }

    /// Fetch (or read from cache) the month containing today. Failures are
    /// shown in the schedule panel and never end the session.
    pub fn load_schedule<S: CalendarSource>(
        &mut self,
        conn: &Connection,
        service: &ScheduleService<S>,
        refresh: bool,
    ) {
        let (year, month) = (self.today.year(), self.today.month());
        let result = if refresh {
            service.refresh(conn, &self.coords, year, month)
        } else {
            service.month_schedule(conn, &self.coords, year, month)
        };
        match result {
            Ok(schedule) => {
                self.schedule = schedule;
                self.schedule_error = None;
            }
            Err(e) => {
                warn!("schedule unavailable: {}", e);
                self.schedule_error = Some(e.to_string());
            }
        }
        self.ticker.reset();
        if let Some(now) = self.last_now {
            self.recompute_countdown(now);
        }
    }

    fn recompute_countdown(&mut self, now: NaiveDateTime) {
        let (next, reminder) = match self.today_timings() {
            Some(day) => (
                Some(next_prayer(&day.times, now)),
                upcoming_reminder(&day.times, now, &self.config.notifications),
            ),
            None => (None, None),
        };
        self.next = next;
        self.reminder = reminder;
    }

    /// Called on every timer tick. The countdown is re-evaluated once a
    /// minute; a date change reloads the tracker.
    pub fn tick(&mut self, conn: &Connection, now: NaiveDateTime) {
        self.last_now = Some(now);
        if now.date() != self.today {
            self.today = now.date();
            if let Err(e) = self.load_tracker(conn) {
                warn!("reloading tracker failed: {:#}", e);
            }
            if self.today_timings().is_none() {
                self.refresh_requested = true;
            }
            self.ticker.reset();
        }
        if self.ticker.due(now) {
            self.recompute_countdown(now);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, conn: &Connection) {
        // Ignore release/repeat events some terminals send
        if key.kind != KeyEventKind::Press {
            return;
        }
        match self.input_mode {
            InputMode::QuranInput => self.handle_quran_input(key, conn),
            InputMode::Normal => match self.view {
                View::Dashboard => self.handle_dashboard_key(key, conn),
                View::Heatmap => {
                    if matches!(key.code, KeyCode::Esc | KeyCode::Char('h')) {
                        self.view = View::Dashboard;
                    }
                }
                View::Help => {
                    if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
                        self.view = View::Dashboard;
                    }
                }
            },
        }
    }

    fn fasting_row(&self) -> usize {
        PrayerName::all().len()
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent, conn: &Connection) {
        self.message = None;
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.view = View::Help,
            KeyCode::Char('h') => self.view = View::Heatmap,
            KeyCode::Char('R') => {
                self.refresh_requested = true;
                self.message = Some("Memuat ulang jadwal…".to_string());
            }
            KeyCode::Char('r') => {
                self.input_mode = InputMode::QuranInput;
                self.input_buffer.clear();
                self.input_error = None;
            }
            KeyCode::Up => self.focus_idx = self.focus_idx.saturating_sub(1),
            KeyCode::Down => {
                if self.focus_idx < self.fasting_row() {
                    self.focus_idx += 1;
                }
            }
            KeyCode::Char('m') | KeyCode::Enter => self.mark_focused(conn, PrayerStatus::OnTime),
            KeyCode::Char('l') => self.mark_focused(conn, PrayerStatus::Qadha),
            KeyCode::Char('x') => self.mark_focused(conn, PrayerStatus::Skipped),
            KeyCode::Char('c') | KeyCode::Backspace => self.mark_focused(conn, PrayerStatus::Unset),
            KeyCode::Char('f') => self.set_fasting(conn, next_fasting(self.day.fasting)),
            _ => {}
        }
    }

    fn mark_focused(&mut self, conn: &Connection, status: PrayerStatus) {
        if self.focus_idx == self.fasting_row() {
            let fasting = match status {
                PrayerStatus::Unset => FastingStatus::Unset,
                _ => next_fasting(self.day.fasting),
            };
            self.set_fasting(conn, fasting);
            return;
        }
        let Some(prayer) = PrayerName::all().get(self.focus_idx).copied() else {
            return;
        };
        let date = self.today_iso();
        let result = PrayerLogRepo::set_status(conn, &date, prayer, status)
            .and_then(|_| self.load_tracker(conn));
        self.report(result);
    }

    fn set_fasting(&mut self, conn: &Connection, status: FastingStatus) {
        let date = self.today_iso();
        let result = DailyLogRepo::upsert(conn, &date, status, None)
            .and_then(|_| self.load_tracker(conn));
        self.report(result);
    }

    fn report(&mut self, result: Result<()>) {
        if let Err(e) = result {
            warn!("saving failed: {:#}", e);
            self.message = Some(format!("Gagal menyimpan: {}", e));
        }
    }

    fn handle_quran_input(&mut self, key: KeyEvent, conn: &Connection) {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.input_buffer.clear();
                self.input_error = None;
            }
            KeyCode::Enter => {
                let trimmed = self.input_buffer.trim().to_string();
                match trimmed.parse::<u32>() {
                    Ok(pages) if pages > 0 => {
                        let date = self.today_iso();
                        let result = QuranLogRepo::add_pages(conn, &date, pages, None)
                            .and_then(|_| self.load_tracker(conn));
                        self.report(result);
                        self.input_mode = InputMode::Normal;
                        self.input_buffer.clear();
                        self.input_error = None;
                    }
                    Ok(_) => self.input_error = Some("Jumlah halaman harus lebih dari 0".to_string()),
                    Err(_) if trimmed.is_empty() => {
                        self.input_error = Some("Ketik angka dulu, misalnya 2".to_string())
                    }
                    Err(_) => self.input_error = Some(format!("'{}' bukan angka", trimmed)),
                }
            }
            KeyCode::Backspace => {
                self.input_buffer.pop();
                self.input_error = None;
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                self.input_buffer.push(c);
                self.input_error = None;
            }
            _ => {}
        }
    }

    pub fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(theme::base()), area);

        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5), // header
                Constraint::Min(0),    // body
                Constraint::Length(1), // status bar
            ])
            .split(area);

        let today = self.today_timings();
        let readable = dates::readable_date(self.today);
        header::render(
            frame,
            outer[0],
            &header::HeaderInfo {
                location: &self.coords.label,
                readable_date: today.map(|d| d.readable_date.as_str()).unwrap_or(readable.as_str()),
                hijri_label: today.map(|d| d.hijri_label.as_str()),
                ramadhan_day: self.ramadhan.day_of_ramadhan(self.today),
            },
        );
        statusbar::render(frame, outer[2], self.message.as_deref());

        match self.view {
            View::Heatmap => heat_widget::render(
                frame,
                outer[1],
                &self.heat,
                self.ramadhan.day_of_ramadhan(self.today),
            ),
            View::Dashboard | View::Help => self.draw_dashboard(frame, outer[1]),
        }

        if self.view == View::Help {
            self.draw_help_overlay(frame);
        }
        if self.input_mode == InputMode::QuranInput {
            self.draw_quran_input(frame);
        }
    }

    fn draw_dashboard(&self, frame: &mut Frame, body: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(body);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(9),  // schedule
                Constraint::Length(12), // tracker
                Constraint::Length(4),  // quran
            ])
            .split(columns[0]);

        let now = self.last_now.unwrap_or_else(|| Local::now().naive_local());
        let highlighted = self.next.as_ref().filter(|n| !n.is_next_day).map(|n| n.moment);
        schedule::render(
            frame,
            left[0],
            self.today_timings(),
            highlighted,
            now.time(),
            self.schedule_error.as_deref(),
        );
        tracker::render(frame, left[1], &self.day, self.focus_idx, true);
        quran::render(
            frame,
            left[2],
            self.day.pages_read,
            self.quran_weekly,
            self.config.profile.quran_target_pages,
            self.last_position.as_deref(),
        );

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(9), // next prayer
                Constraint::Min(0),    // xp + streak
            ])
            .split(columns[1]);

        next_widget::render(frame, right[0], self.next.as_ref(), self.reminder.as_ref());
        streak::render(frame, right[1], self.total_xp, &self.streaks, &self.week);
    }

    fn draw_help_overlay(&self, frame: &mut Frame) {
        let area = frame.area();
        let popup_area = Rect {
            x: area.width / 4,
            y: area.height / 6,
            width: area.width / 2,
            height: (area.height * 2 / 3).min(18),
        };
        frame.render_widget(Clear, popup_area);

        let keys = [
            ("[↑ ↓]", "Pilih sholat / puasa"),
            ("[m] Enter", "Tandai tepat waktu"),
            ("[l]", "Tandai qadha (terlambat)"),
            ("[x]", "Tandai terlewat"),
            ("[c]", "Hapus tanda"),
            ("[f]", "Ganti status puasa"),
            ("[r]", "Catat halaman tilawah"),
            ("[h]", "Heatmap Ramadhan"),
            ("[R]", "Muat ulang jadwal"),
            ("[?]", "Bantuan"),
            ("[q] Esc", "Keluar"),
        ];

        let mut help_text = vec![
            Line::from(Span::styled("  Tombol", theme::gold().add_modifier(Modifier::BOLD))),
            Line::from(""),
        ];
        for (key, what) in keys {
            help_text.push(Line::from(vec![
                Span::styled(format!("  {:<12}", key), theme::gold()),
                Span::styled(what, theme::dim()),
            ]));
        }

        let block = Block::default()
            .title(Span::styled(" Bantuan ", theme::gold()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::gold())
            .style(theme::surface());

        frame.render_widget(Paragraph::new(help_text).block(block), popup_area);
    }

    fn draw_quran_input(&self, frame: &mut Frame) {
        let area = frame.area();
        let height = if self.input_error.is_some() { 7 } else { 5 };

        let popup_area = Rect {
            x: area.width / 4,
            y: (area.height / 2).saturating_sub(3),
            width: area.width / 2,
            height,
        };
        frame.render_widget(Clear, popup_area);

        let mut text = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("  Halaman dibaca: ", theme::dim()),
                Span::styled(self.input_buffer.as_str(), theme::gold().add_modifier(Modifier::BOLD)),
                Span::styled("█", theme::amber()),
            ]),
            Line::from(""),
            Line::from(Span::styled("  [Enter] simpan  ·  [Esc] batal", theme::dim())),
        ];

        if let Some(err) = &self.input_error {
            text.push(Line::from(""));
            text.push(Line::from(Span::styled(format!("  ✗ {}", err), theme::red())));
        }

        let border_style = if self.input_error.is_some() {
            theme::red()
        } else {
            theme::amber()
        };

        let block = Block::default()
            .title(Span::styled(" Tilawah ", theme::gold()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .style(theme::surface());

        frame.render_widget(Paragraph::new(text).block(block), popup_area);
    }
}

fn event_loop<S: CalendarSource>(
    terminal: &mut DefaultTerminal,
    app: &mut App,
    conn: &Connection,
    service: &ScheduleService<S>,
) -> Result<()> {
    let events = EventHandler::new(Duration::from_secs(1));

    loop {
        terminal.draw(|frame| app.draw(frame))?;

        match events.next()? {
            Event::Key(key) => {
                app.handle_key(key, conn);
                if app.should_quit {
                    return Ok(());
                }
            }
            Event::Resize => {}
            Event::Tick => app.tick(conn, Local::now().naive_local()),
        }

        if app.refresh_requested {
            app.refresh_requested = false;
            app.load_schedule(conn, service, true);
            app.message = app.schedule_error.as_ref().map(|e| format!("Gagal memuat: {}", e));
        }
    }
}

/// Run the dashboard until the user quits.
pub fn run(conn: Connection, config: AppConfig) -> Result<()> {
    theme::init(config.ui.theme);
    let ramadhan = Ramadhan::from_config(&config.ramadhan)?;
    let locator = IpLocator::new();
    let coords = coordinates_for(&config, Some(&locator as &dyn Locator));
    let service = ScheduleService::new(AladhanClient::new()?);

    let now = Local::now().naive_local();
    let mut app = App::new(config, coords, ramadhan, now.date());
    app.load_tracker(&conn)?;
    app.load_schedule(&conn, &service, false);
    app.tick(&conn, now);

    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, &mut app, &conn, &service);
    ratatui::restore();
    result
}
