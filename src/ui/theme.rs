use ratatui::style::{Color, Modifier, Style};

use crate::config::Theme;

/// Colors a screen is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub bg: Color,
    pub fg: Color,
    pub dim: Color,
    pub correct: Color,
    pub incorrect: Color,
    pub highlight: Color,
    pub accent: Color,
}

impl Palette {
    pub fn base(&self) -> Style {
        Style::default().bg(self.bg).fg(self.fg)
    }

    pub fn dim(&self) -> Style {
        Style::default().fg(self.dim)
    }

    pub fn bold(&self) -> Style {
        Style::default().fg(self.fg).add_modifier(Modifier::BOLD)
    }

    pub fn accent(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }
}

const EMERALD: Color = Color::Rgb(16, 185, 129);
const RED: Color = Color::Rgb(239, 68, 68);

pub fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Light => Palette {
            bg: Color::Rgb(255, 255, 255),
            fg: Color::Rgb(0, 0, 0),
            dim: Color::Rgb(161, 161, 170),
            correct: EMERALD,
            incorrect: RED,
            highlight: Color::Rgb(228, 228, 231),
            accent: Color::Rgb(24, 24, 27),
        },
        Theme::Dark => Palette {
            bg: Color::Rgb(24, 24, 27),
            fg: Color::Rgb(212, 212, 216),
            dim: Color::Rgb(113, 113, 122),
            correct: EMERALD,
            incorrect: RED,
            highlight: Color::Rgb(63, 63, 70),
            accent: Color::Rgb(250, 250, 250),
        },
        Theme::Sepia => Palette {
            bg: Color::Rgb(244, 236, 216),
            fg: Color::Rgb(67, 52, 34),
            dim: Color::Rgb(160, 140, 110),
            correct: Color::Rgb(34, 120, 70),
            incorrect: Color::Rgb(180, 40, 30),
            highlight: Color::Rgb(230, 218, 190),
            accent: Color::Rgb(67, 52, 34),
        },
    }
}
