use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::models::{DailySummary, HabitStreak};
use crate::tui::theme;
use crate::utils::format::{pad, progress_bar};

fn habit_label(key: &str) -> &str {
    match key {
        "daily" => "Sholat 5 waktu",
        "fasting" => "Puasa",
        "quran" => "Tilawah",
        other => other,
    }
}

pub fn render(
    frame: &mut Frame,
    area: Rect,
    total_xp: u32,
    streaks: &[HabitStreak],
    week: &[DailySummary],
) {
    let block = Block::default()
        .title(Span::styled(" XP & Streak ", theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::surface());

    let today_xp = week.last().map(|d| d.xp_earned).unwrap_or(0);
    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("  {} XP", total_xp), theme::gold().add_modifier(Modifier::BOLD)),
            Span::styled(format!("  ·  +{} hari ini", today_xp), theme::dim()),
        ]),
        Line::from(""),
    ];

    // Streak bar fills over a 30-day month.
    for s in streaks {
        lines.push(Line::from(vec![
            Span::styled(format!("  {}", pad(habit_label(&s.habit_key), 16)), theme::dim()),
            Span::styled(progress_bar(s.current_streak, 30, 10), theme::green()),
            Span::styled(
                format!("  {}", s.current_streak),
                theme::green().add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" / {}", s.best_streak), theme::dim()),
        ]));
    }

    let mut dots = vec![Span::styled("  ", theme::dim())];
    for day in week {
        let (dot, style) = match day.prayers_done {
            5 => ("●", theme::green().add_modifier(Modifier::BOLD)),
            3 | 4 => ("●", theme::amber()),
            1 | 2 => ("◑", theme::amber()),
            _ => ("○", theme::dim()),
        };
        dots.push(Span::styled(dot, style));
        dots.push(Span::styled("  ", theme::dim()));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(dots));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
