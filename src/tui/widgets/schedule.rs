use chrono::NaiveTime;
use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::models::{DailyTimings, Moment};
use crate::tui::theme;
use crate::utils::format::pad;

/// Today's timings. Past moments are dimmed and the next one is marked.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    today: Option<&DailyTimings>,
    next: Option<Moment>,
    now: NaiveTime,
    error: Option<&str>,
) {
    let block = Block::default()
        .title(Span::styled(" Jadwal Hari Ini ", theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::surface());

    let Some(day) = today else {
        let message = match error {
            Some(e) => vec![
                Line::from(Span::styled(format!("  {}", e), theme::red())),
                Line::from(""),
                Line::from(Span::styled("  [R] coba lagi", theme::dim())),
            ],
            None => vec![Line::from(Span::styled("  Memuat jadwal…", theme::dim()))],
        };
        let paragraph = Paragraph::new(message).block(block).wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
        return;
    };

    let items: Vec<ListItem> = Moment::ALL
        .iter()
        .map(|&moment| {
            let time = day.times.get(moment);
            let is_next = next == Some(moment);
            let is_past = day.times.parsed(moment).is_some_and(|t| t <= now);

            let (marker, style) = if is_next {
                ("▶ ", theme::gold().add_modifier(Modifier::BOLD))
            } else if is_past {
                ("  ", theme::dim())
            } else {
                ("  ", theme::bold())
            };

            let label_style = match moment {
                Moment::Imsak | Moment::Maghrib if !is_past && !is_next => style.fg(theme::palette().amber),
                _ => style,
            };

            ListItem::new(Line::from(vec![
                Span::styled(format!("  {}", marker), style),
                Span::styled(pad(moment.label(), 17), label_style),
                Span::styled(time.to_string(), style),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
