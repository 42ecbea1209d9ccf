use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::theme;

const HINTS: [(&str, &str); 9] = [
    ("[m]", " tepat  "),
    ("[l]", " qadha  "),
    ("[x]", " lewat  "),
    ("[f]", " puasa  "),
    ("[r]", " tilawah  "),
    ("[h]", " heatmap  "),
    ("[R]", " muat ulang  "),
    ("[?]", " bantuan  "),
    ("[q]", " keluar"),
];

/// Key hints, or a transient message in their place.
pub fn render(frame: &mut Frame, area: Rect, message: Option<&str>) {
    let line = match message {
        Some(msg) => Line::from(Span::styled(msg, theme::amber())),
        None => {
            let mut spans = Vec::new();
            for (key, label) in HINTS {
                spans.push(Span::styled(key, theme::gold()));
                spans.push(Span::styled(label, theme::dim()));
            }
            Line::from(spans)
        }
    };

    let paragraph = Paragraph::new(line).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}
