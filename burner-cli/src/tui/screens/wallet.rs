use crate::tui::app::{format_minutes, App};
use crate::tui::input::InputMode;
use crate::tui::theme::BurnerTheme;
use ratatui::prelude::*;
use ratatui::widgets::*;
use usethrow::wallet::{format_countdown, remaining_secs};

use super::key_display;

pub fn render(frame: &mut Frame, theme: &BurnerTheme, app: &App, area: Rect) {
    let content_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    render_burner(frame, theme, app, content_layout[0]);
    render_funding(frame, theme, app, content_layout[1]);
}

fn heading<'a>(theme: &BurnerTheme, text: &'a str) -> Line<'a> {
    Line::from(Span::styled(text, theme.text_primary_style().bold()))
}

fn render_burner(frame: &mut Frame, theme: &BurnerTheme, app: &App, area: Rect) {
    let chain = app.lifecycle.chain();
    let mut lines = Vec::new();

    match app.lifecycle.wallet() {
        None => {
            lines.extend([
                Line::from(Span::styled("No burner wallet", theme.text_dim_style())),
                Line::from(""),
                Line::from(Span::styled(
                    "  n  Create a fresh, throw-away wallet",
                    theme.text_primary_style(),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    format!("Network: {}", chain.name()),
                    theme.text_dim_style(),
                )),
            ]);
        }
        Some(wallet) => {
            let address = wallet.address_checksum();

            lines.push(heading(theme, "Address"));
            lines.push(Line::from(Span::styled(address.clone(), theme.primary_style())));
            lines.push(Line::from(Span::styled(
                chain.address_url(&address),
                theme.text_dim_style(),
            )));
            lines.push(Line::from(""));

            lines.push(heading(theme, "Private key"));
            lines.push(Line::from(Span::styled(
                key_display(wallet.private_key().expose(), app.wallet_state.show_private_key),
                Style::default().fg(theme.warning),
            )));
            lines.push(Line::from(""));

            lines.push(heading(theme, "Balance"));
            let balance_line = if app.wallet_state.loading {
                Span::styled("Loading...", Style::default().fg(theme.info))
            } else if let Some(ref err) = app.wallet_state.balance_error {
                Span::styled(err.as_str(), Style::default().fg(theme.error))
            } else if let Some(ref balance) = app.wallet_state.balance {
                Span::styled(format!("{} ETH", balance), theme.text_primary_style())
            } else {
                Span::styled("Press b to check", theme.text_dim_style())
            };
            lines.push(Line::from(balance_line));
            lines.push(Line::from(""));

            lines.push(heading(theme, "Expiry"));
            match (wallet.expires_at(), app.wallet_state.remaining_ms) {
                (Some(_), Some(ms)) => lines.push(Line::from(Span::styled(
                    format_countdown(remaining_secs(ms)),
                    theme.primary_style().bold(),
                ))),
                (Some(_), None) => lines.push(Line::from(Span::styled(
                    "Timer initializing…",
                    theme.text_dim_style(),
                ))),
                (None, _) => lines.push(Line::from(Span::styled(
                    "No timer (lives until forgotten)",
                    theme.text_dim_style(),
                ))),
            }
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Timer length: ", theme.text_dim_style()),
        Span::styled(
            format_minutes(app.wallet_state.expiry_minutes),
            theme.text_primary_style(),
        ),
        Span::styled("  (+/- 1m, </> 1h)", theme.text_dim_style()),
    ]));

    let panel = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(Span::styled(" Burner Wallet ", theme.primary_style()))
            .borders(Borders::ALL)
            .border_style(theme.primary_style()),
    );

    frame.render_widget(panel, area);
}

fn render_funding(frame: &mut Frame, theme: &BurnerTheme, app: &App, area: Rect) {
    let funding = &app.funding_state;
    let mut lines = vec![heading(theme, "Funding wallet")];

    match funding.account {
        Some(account) => {
            lines.push(Line::from(Span::styled(
                "Connected",
                Style::default().fg(theme.success),
            )));
            lines.push(Line::from(Span::styled(
                account.to_checksum(None),
                theme.text_primary_style(),
            )));
        }
        None if funding.connecting => {
            lines.push(Line::from(Span::styled(
                "Connecting...",
                Style::default().fg(theme.info),
            )));
        }
        None => {
            lines.push(Line::from(Span::styled("Not connected", theme.text_dim_style())));
            lines.push(Line::from(Span::styled(
                "  m  Connect",
                theme.text_primary_style(),
            )));
        }
    }
    lines.push(Line::from(""));

    lines.push(heading(theme, "Amount"));
    if app.input_mode == InputMode::Insert {
        lines.push(Line::from(Span::styled(
            format!("{}▏ ETH", funding.editing_amount),
            Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            format!("{} ETH", funding.amount),
            theme.text_primary_style(),
        )));
    }
    lines.push(Line::from(""));

    if funding.in_progress {
        lines.push(Line::from(Span::styled(
            "Funding in progress...",
            Style::default().fg(theme.info),
        )));
    }
    if let Some(ref hash) = funding.last_hash {
        lines.push(heading(theme, "Last transaction"));
        lines.push(Line::from(Span::styled(hash.as_str(), theme.text_dim_style())));
    }

    let panel = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(Span::styled(" Fund ", theme.primary_style()))
            .borders(Borders::ALL)
            .border_style(theme.primary_style()),
    );

    frame.render_widget(panel, area);
}
