use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem},
    Frame,
};

use crate::insights::xp::prayer_xp;
use crate::insights::DayLogs;
use crate::models::{FastingStatus, PrayerName, PrayerStatus};
use crate::tui::theme;
use crate::utils::format::pad;

/// Fard then sunnah prayers, followed by the fasting row.
pub fn render(frame: &mut Frame, area: Rect, day: &DayLogs, focused_idx: usize, focused: bool) {
    let block = Block::default()
        .title(Span::styled(" Ibadah Hari Ini ", theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused { theme::gold() } else { theme::border() })
        .style(theme::surface());

    let mut items: Vec<ListItem> = PrayerName::all()
        .into_iter()
        .enumerate()
        .map(|(i, prayer)| {
            let status = day.status_of(prayer);
            let (icon, status_style, status_label) = match status {
                PrayerStatus::OnTime => ("●", theme::green(), "tepat waktu"),
                PrayerStatus::Qadha => ("◑", theme::amber(), "qadha"),
                PrayerStatus::Skipped => ("✗", theme::red(), "terlewat"),
                PrayerStatus::Unset => ("○", theme::dim(), ""),
            };
            let name_style = if focused && i == focused_idx {
                theme::gold().add_modifier(Modifier::BOLD)
            } else if prayer.is_fard() {
                theme::bold()
            } else {
                theme::dim()
            };
            let xp = prayer_xp(prayer, status);

            let mut spans = vec![
                Span::styled(format!("  {}", pad(prayer.display_name(), 10)), name_style),
                Span::styled(icon, status_style),
                Span::styled(format!("  {}", pad(status_label, 12)), theme::dim()),
            ];
            if xp > 0 {
                spans.push(Span::styled(format!("+{}", xp), theme::gold()));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let fasting_idx = PrayerName::all().len();
    let fasting_style = match day.fasting {
        FastingStatus::Full => theme::green(),
        FastingStatus::Partial => theme::amber(),
        FastingStatus::Skip => theme::red(),
        FastingStatus::Unset => theme::dim(),
    };
    let name_style = if focused && focused_idx == fasting_idx {
        theme::gold().add_modifier(Modifier::BOLD)
    } else {
        theme::bold()
    };
    items.push(ListItem::new(Line::from(vec![
        Span::styled(format!("  {}", pad("Puasa", 10)), name_style),
        Span::styled(day.fasting.display_name(), fasting_style),
    ])));

    frame.render_widget(List::new(items).block(block), area);
}
