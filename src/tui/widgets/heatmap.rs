use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::models::{HeatDay, HeatLevel};
use crate::tui::theme;

const COLUMNS: usize = 7;

fn level_index(level: HeatLevel) -> usize {
    match level {
        HeatLevel::None => 0,
        HeatLevel::Low => 1,
        HeatLevel::Mid => 2,
        HeatLevel::Good => 3,
        HeatLevel::Perfect => 4,
    }
}

/// Ramadhan grid, one cell per day, a week per row.
pub fn render(frame: &mut Frame, area: Rect, cells: &[HeatDay], today_day: u32) {
    let block = Block::default()
        .title(Span::styled(" Heatmap Ramadhan ", theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::surface());

    let mut lines = vec![Line::from("")];
    for row in cells.chunks(COLUMNS) {
        let mut spans = vec![Span::raw("  ")];
        for cell in row {
            let mut style = if cell.is_future {
                theme::dim()
            } else {
                theme::heat(level_index(cell.level)).fg(theme::palette().text)
            };
            if cell.day == today_day {
                style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
            }
            spans.push(Span::styled(format!(" {:>2} ", cell.day), style));
            spans.push(Span::raw(" "));
        }
        lines.push(Line::from(spans));
        lines.push(Line::from(""));
    }

    let perfect = cells.iter().filter(|c| c.level == HeatLevel::Perfect).count();
    let fasted = cells.iter().filter(|c| c.fasting).count();
    lines.push(Line::from(Span::styled(
        format!("  Sempurna: {}  ·  Puasa penuh: {}/{}", perfect, fasted, cells.len()),
        theme::dim(),
    )));

    let mut legend = vec![Span::styled("  Sedikit ", theme::dim())];
    for level in 0..5 {
        legend.push(Span::styled("  ", theme::heat(level)));
        legend.push(Span::raw(" "));
    }
    legend.push(Span::styled("Banyak   [h/Esc] kembali", theme::dim()));
    lines.push(Line::from(""));
    lines.push(Line::from(legend));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
