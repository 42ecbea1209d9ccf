use ratatui::style::{Color, Modifier, Style};
use std::sync::OnceLock;

use crate::config::Theme;

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg: Color,
    pub surface: Color,
    pub border: Color,
    pub text: Color,
    pub text_dim: Color,
    pub gold: Color,
    pub green: Color,
    pub amber: Color,
    pub red: Color,
    pub heat: [Color; 5],
}

pub const DARK: Palette = Palette {
    bg: Color::Rgb(14, 18, 22),
    surface: Color::Rgb(22, 28, 34),
    border: Color::Rgb(44, 58, 66),
    text: Color::Rgb(226, 232, 224),
    text_dim: Color::Rgb(120, 136, 132),
    gold: Color::Rgb(212, 175, 82),
    green: Color::Rgb(74, 160, 112),
    amber: Color::Rgb(214, 140, 64),
    red: Color::Rgb(190, 84, 70),
    heat: [
        Color::Rgb(32, 40, 46),
        Color::Rgb(30, 74, 56),
        Color::Rgb(38, 110, 76),
        Color::Rgb(52, 148, 98),
        Color::Rgb(212, 175, 82),
    ],
};

pub const LIGHT: Palette = Palette {
    bg: Color::Rgb(248, 245, 236),
    surface: Color::Rgb(240, 236, 224),
    border: Color::Rgb(196, 188, 166),
    text: Color::Rgb(34, 40, 38),
    text_dim: Color::Rgb(112, 116, 106),
    gold: Color::Rgb(150, 112, 24),
    green: Color::Rgb(30, 120, 72),
    amber: Color::Rgb(176, 96, 20),
    red: Color::Rgb(170, 52, 40),
    heat: [
        Color::Rgb(226, 222, 208),
        Color::Rgb(190, 222, 196),
        Color::Rgb(130, 196, 150),
        Color::Rgb(62, 156, 100),
        Color::Rgb(150, 112, 24),
    ],
};

static ACTIVE: OnceLock<Palette> = OnceLock::new();

/// Pick the palette once, before the first frame. Later calls are ignored.
pub fn init(theme: Theme) {
    let _ = ACTIVE.set(match theme {
        Theme::Dark => DARK,
        Theme::Light => LIGHT,
    });
}

pub fn palette() -> &'static Palette {
    ACTIVE.get().unwrap_or(&DARK)
}

pub fn base() -> Style {
    Style::default().fg(palette().text).bg(palette().bg)
}

pub fn surface() -> Style {
    Style::default().fg(palette().text).bg(palette().surface)
}

pub fn border() -> Style {
    Style::default().fg(palette().border)
}

pub fn dim() -> Style {
    Style::default().fg(palette().text_dim)
}

pub fn gold() -> Style {
    Style::default().fg(palette().gold)
}

pub fn green() -> Style {
    Style::default().fg(palette().green)
}

pub fn amber() -> Style {
    Style::default().fg(palette().amber)
}

pub fn red() -> Style {
    Style::default().fg(palette().red)
}

pub fn bold() -> Style {
    Style::default().fg(palette().text).add_modifier(Modifier::BOLD)
}

/// Background for a heatmap cell of the given level (0..=4).
pub fn heat(level: usize) -> Style {
    let colors = palette().heat;
    Style::default().bg(colors[level.min(colors.len() - 1)])
}
