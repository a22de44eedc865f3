use crate::tui::app::App;
use crate::tui::theme::BurnerTheme;
use ratatui::prelude::*;

mod activity;
mod export;
mod wallet;

pub fn render_wallet(frame: &mut Frame, theme: &BurnerTheme, app: &App, area: Rect) {
    wallet::render(frame, theme, app, area);
}

pub fn render_activity(frame: &mut Frame, theme: &BurnerTheme, app: &App, area: Rect) {
    activity::render(frame, theme, app, area);
}

pub fn render_export(frame: &mut Frame, theme: &BurnerTheme, app: &App, area: Rect) {
    export::render(frame, theme, app, area);
}

/// Private key as shown on screen: masked unless the user asked to see it
pub(crate) fn key_display(secret: &str, visible: bool) -> String {
    if visible {
        secret.to_string()
    } else {
        "•".repeat(secret.chars().count().min(64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_masked_by_default() {
        let secret = format!("0x{}", "ab".repeat(32));
        let masked = key_display(&secret, false);
        assert_eq!(masked.chars().count(), 64);
        assert!(!masked.contains("ab"));
        assert_eq!(key_display(&secret, true), secret);
    }
}
