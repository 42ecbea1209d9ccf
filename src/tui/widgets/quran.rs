use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::tui::theme;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    today_pages: u32,
    weekly_pages: u32,
    daily_target: u32,
    last_position: Option<&str>,
) {
    let block = Block::default()
        .title(Span::styled(" Tilawah ", theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::surface());

    let inner_width = area.width.saturating_sub(4) as usize;
    let bar_width = inner_width.min(24);

    let ratio = if daily_target > 0 {
        (today_pages as f64 / daily_target as f64).min(1.0)
    } else {
        0.0
    };
    let filled = (ratio * bar_width as f64).round() as usize;
    let bar = format!("{}{}", "▓".repeat(filled), "░".repeat(bar_width.saturating_sub(filled)));

    let progress_style = if daily_target > 0 && today_pages >= daily_target {
        theme::green()
    } else {
        theme::amber()
    };

    let mut detail = format!(
        "  {} / {} hal  ·  Pekan: {}",
        today_pages, daily_target, weekly_pages
    );
    if let Some(pos) = last_position {
        detail.push_str(&format!("  ·  terakhir {}", pos));
    }

    let line = Line::from(vec![
        Span::styled("  ", theme::dim()),
        Span::styled(bar, progress_style),
        Span::styled(detail, theme::dim()),
    ]);

    let paragraph = Paragraph::new(vec![Line::from(""), line]).block(block);
    frame.render_widget(paragraph, area);
}
