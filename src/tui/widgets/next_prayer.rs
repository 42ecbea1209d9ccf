use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::models::NextPrayer;
use crate::prayer_times::reminder::Reminder;
use crate::tui::theme;
use crate::utils::format::format_minutes;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    next_prayer: Option<&NextPrayer>,
    reminder: Option<&Reminder>,
) {
    let block = Block::default()
        .title(Span::styled(" Berikutnya ", theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if reminder.is_some() { theme::amber() } else { theme::border() })
        .style(theme::surface());

    let mut content: Vec<Line> = match next_prayer {
        None => vec![
            Line::from(""),
            Line::from(Span::styled("  Tidak ada data", theme::dim())),
        ],
        Some(next) if next.is_next_day => vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("  {}", next.label.to_uppercase()),
                theme::gold().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(format!("  sekitar {}", next.time), theme::dim())),
        ],
        Some(next) => vec![
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    format!("  {}", next.label.to_uppercase()),
                    theme::gold().add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("  {}", next.time), theme::dim()),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("  dalam  ", theme::dim()),
                Span::styled(
                    format_minutes(next.minutes_remaining),
                    theme::amber().add_modifier(Modifier::BOLD),
                ),
            ]),
        ],
    };

    if let Some(r) = reminder {
        content.push(Line::from(""));
        content.push(Line::from(Span::styled(
            format!("  🔔 {}", r.message()),
            theme::amber().add_modifier(Modifier::BOLD),
        )));
    }

    let paragraph = Paragraph::new(content)
        .block(block)
        .alignment(Alignment::Left);

    frame.render_widget(paragraph, area);
}
