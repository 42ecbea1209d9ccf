use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::tui::theme;

pub struct HeaderInfo<'a> {
    pub location: &'a str,
    pub readable_date: &'a str,
    pub hijri_label: Option<&'a str>,
    /// 0 outside the month
    pub ramadhan_day: u32,
}

pub fn render(frame: &mut Frame, area: Rect, info: &HeaderInfo) {
    let mut title = vec![
        Span::styled("  إمساكية  ", theme::gold().add_modifier(Modifier::BOLD)),
        Span::styled("imsakiyah", theme::gold()),
    ];
    if info.ramadhan_day > 0 {
        title.push(Span::styled("  ·  ", theme::dim()));
        title.push(Span::styled(
            format!("Ramadhan hari ke-{}", info.ramadhan_day),
            theme::amber().add_modifier(Modifier::BOLD),
        ));
    }

    let mut date_spans = Vec::new();
    if let Some(hijri) = info.hijri_label {
        date_spans.push(Span::styled(hijri, theme::amber()));
        date_spans.push(Span::styled("  ·  ", theme::dim()));
    }
    date_spans.push(Span::styled(info.readable_date, theme::dim()));
    date_spans.push(Span::styled("  ·  ", theme::dim()));
    date_spans.push(Span::styled(info.location, theme::dim()));

    let text = vec![Line::from(title), Line::from(""), Line::from(date_spans)];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::gold().add_modifier(Modifier::BOLD))
        .style(theme::base());

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
