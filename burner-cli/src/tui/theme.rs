use ratatui::style::{Color, Style};

use crate::tui::input::InputMode;

/// Amber-on-black palette
pub struct BurnerTheme {
    pub primary: Color,
    pub text_primary: Color,
    pub text_dim: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub mode_normal: Color,
    pub mode_insert: Color,
}

impl Default for BurnerTheme {
    fn default() -> Self {
        Self {
            primary: Color::Rgb(251, 191, 36),       // #FBBF24 - amber
            text_primary: Color::Rgb(255, 255, 255), // #FFFFFF
            text_dim: Color::Rgb(140, 140, 140),     // #8C8C8C
            success: Color::Rgb(16, 185, 129),       // #10B981
            warning: Color::Rgb(245, 158, 11),       // #F59E0B
            error: Color::Rgb(239, 68, 68),          // #EF4444
            info: Color::Cyan,
            mode_normal: Color::Rgb(251, 191, 36),
            mode_insert: Color::Green,
        }
    }
}

impl BurnerTheme {
    /// Get the primary style for titles and active elements
    pub fn primary_style(&self) -> Style {
        Style::default().fg(self.primary)
    }

    /// Get the primary text style
    pub fn text_primary_style(&self) -> Style {
        Style::default().fg(self.text_primary)
    }

    /// Get the dim text style
    pub fn text_dim_style(&self) -> Style {
        Style::default().fg(self.text_dim)
    }

    /// Get style for a specific mode indicator
    pub fn mode_style(&self, mode: InputMode) -> Style {
        let color = match mode {
            InputMode::Normal => self.mode_normal,
            InputMode::Insert => self.mode_insert,
        };
        Style::default().fg(color)
    }
}
