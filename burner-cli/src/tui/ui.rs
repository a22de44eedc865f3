use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::tui::app::{App, Screen};
use crate::tui::input::InputMode;
use crate::tui::screens;
use crate::tui::theme::BurnerTheme;
use crate::tui::widgets::PopupType;

/// Render the current application state
pub fn render(frame: &mut Frame, app: &App) {
    let theme = BurnerTheme::default();

    // Main layout: header, tab bar, content, footer
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(1), // Tab bar
            Constraint::Min(1),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    render_header(frame, &theme, app, main_layout[0]);
    render_tab_bar(frame, &theme, app, main_layout[1]);
    render_screen(frame, &theme, app, main_layout[2]);
    render_footer(frame, &theme, app, main_layout[3]);

    if app.spinner.spinning {
        render_spinner(frame, &theme, app);
    }

    if app.popup.is_some() {
        render_popup(frame, &theme, app);
    }
}

fn render_header(frame: &mut Frame, theme: &BurnerTheme, app: &App, area: Rect) {
    let status = if let Some((ref msg, is_error)) = app.status_message {
        let style = if is_error {
            Style::default().fg(theme.error)
        } else {
            Style::default().fg(theme.success)
        };
        Span::styled(format!(" │ {}", msg), style)
    } else {
        Span::raw("")
    };

    let title_line = Line::from(vec![
        Span::styled("Use & Throw", theme.primary_style().bold()),
        Span::styled(
            format!(" │ {}", app.lifecycle.chain().name()),
            theme.text_dim_style(),
        ),
        status,
    ]);

    let header = Paragraph::new(title_line)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.primary_style()),
        );

    frame.render_widget(header, area);
}

fn render_tab_bar(frame: &mut Frame, theme: &BurnerTheme, app: &App, area: Rect) {
    let tabs = [
        ("1:Wallet", Screen::Wallet),
        ("2:Activity", Screen::Activity),
    ];

    let mut spans = vec![Span::styled(" ", theme.text_dim_style())];
    for (i, (label, screen)) in tabs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" │ ", theme.text_dim_style()));
        }
        let style = if *screen == app.current_screen {
            Style::default().fg(theme.primary).bold()
        } else {
            theme.text_dim_style()
        };
        spans.push(Span::styled(*label, style));
    }

    if app.current_screen == Screen::Export {
        spans.push(Span::styled("  → Export", Style::default().fg(theme.warning)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_screen(frame: &mut Frame, theme: &BurnerTheme, app: &App, area: Rect) {
    match app.current_screen {
        Screen::Wallet => screens::render_wallet(frame, theme, app, area),
        Screen::Activity => screens::render_activity(frame, theme, app, area),
        Screen::Export => screens::render_export(frame, theme, app, area),
    }
}

fn render_footer(frame: &mut Frame, theme: &BurnerTheme, app: &App, area: Rect) {
    let mode_text = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Insert => "INSERT",
    };

    let screen_text = match app.current_screen {
        Screen::Wallet => "WALLET",
        Screen::Activity => "ACTIVITY",
        Screen::Export => "EXPORT",
    };

    let help_text = match (app.input_mode, app.current_screen) {
        (InputMode::Insert, _) => "Amount in ETH | Enter: Send | Esc: Cancel",
        (_, Screen::Wallet) => {
            "n: New | x: Forget | c: Chain | b: Balance | y: Copy | e: Export | t/T: Timer | +/-: Min | m/d: Funder | f: Fund"
        }
        (_, Screen::Activity) => "a: Refresh | j/k: Navigate | c: Chain | 1: Wallet",
        (_, Screen::Export) => "p: Copy key | s: Show/Hide | Esc: Back",
    };

    let footer_line = Line::from(vec![
        Span::styled(format!(" {} ", mode_text), theme.mode_style(app.input_mode).bold()),
        Span::styled(" │ ", theme.text_dim_style()),
        Span::styled(screen_text, theme.text_primary_style()),
        Span::styled(" │ ", theme.text_dim_style()),
        Span::styled(help_text, theme.text_dim_style()),
    ]);

    let footer = Paragraph::new(footer_line)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.primary_style()),
        );

    frame.render_widget(footer, area);
}

fn render_spinner(frame: &mut Frame, theme: &BurnerTheme, app: &App) {
    let popup_area = centered_rect(40, 3, frame.area());
    frame.render_widget(Clear, popup_area);

    let text = format!("{} {}", app.spinner.glyph(), app.spinner.message);
    let widget = Paragraph::new(text)
        .style(theme.text_primary_style())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.info)),
        );

    frame.render_widget(widget, popup_area);
}

fn render_popup(frame: &mut Frame, theme: &BurnerTheme, app: &App) {
    let Some(popup) = &app.popup else {
        return;
    };
    let popup_area = centered_rect(60, 40, frame.area());
    frame.render_widget(Clear, popup_area);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(popup.content.as_str(), theme.text_primary_style())),
        Line::from(""),
    ];
    for detail in &popup.details {
        lines.push(Line::from(Span::styled(detail.as_str(), theme.text_dim_style())));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press any key to dismiss",
        theme.text_dim_style(),
    )));

    let border_color = match popup.popup_type {
        PopupType::Error => theme.error,
        PopupType::Expired => theme.warning,
        PopupType::Info => theme.primary,
    };

    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(Span::styled(popup.title.as_str(), Style::default().fg(border_color).bold()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color)),
        );

    frame.render_widget(widget, popup_area);
}

/// Helper to create a centered rect of given percentage width/height
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
