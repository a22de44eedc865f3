use crate::tui::app::App;
use crate::tui::theme::BurnerTheme;
use ratatui::prelude::*;
use ratatui::widgets::*;

use super::key_display;

pub fn render(frame: &mut Frame, theme: &BurnerTheme, app: &App, area: Rect) {
    let mut lines = vec![
        Line::from(Span::styled(
            "Anyone holding this key controls the funds. Never share it.",
            Style::default().fg(theme.error).bold(),
        )),
        Line::from(""),
    ];

    if let Some(wallet) = app.lifecycle.wallet() {
        lines.extend([
            Line::from(Span::styled("Address", theme.text_primary_style().bold())),
            Line::from(Span::styled(wallet.address_checksum(), theme.primary_style())),
            Line::from(""),
            Line::from(Span::styled("Private key", theme.text_primary_style().bold())),
            Line::from(Span::styled(
                key_display(wallet.private_key().expose(), app.wallet_state.show_private_key),
                Style::default().fg(theme.warning),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Import the key into a regular wallet to keep this account after the burner is gone.",
                theme.text_dim_style(),
            )),
        ]);
    }

    let panel = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(Span::styled(" Export Private Key ", Style::default().fg(theme.warning)))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.warning)),
    );

    frame.render_widget(panel, area);
}
