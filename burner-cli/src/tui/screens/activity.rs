use crate::tui::app::App;
use crate::tui::theme::BurnerTheme;
use ratatui::prelude::*;
use ratatui::widgets::*;

pub fn render(frame: &mut Frame, theme: &BurnerTheme, app: &App, area: Rect) {
    let state = &app.activity_state;
    let chain = app.lifecycle.chain();
    let block = Block::default()
        .title(Span::styled(
            format!(" Recent Transactions ({}) ", chain.name()),
            theme.primary_style(),
        ))
        .borders(Borders::ALL)
        .border_style(theme.primary_style());

    let Some(address) = app.burner_address() else {
        let empty = Paragraph::new("No burner wallet. Press n to create one.")
            .style(theme.text_dim_style())
            .block(block);
        frame.render_widget(empty, area);
        return;
    };

    let message = if state.loading {
        Some(Span::styled("Loading...", Style::default().fg(theme.info)))
    } else if let Some(ref err) = state.error {
        Some(Span::styled(err.as_str(), Style::default().fg(theme.error)))
    } else {
        match state.records {
            None => Some(Span::styled("Press a to load activity", theme.text_dim_style())),
            Some(ref records) if records.is_empty() => {
                Some(Span::styled("No transactions yet", theme.text_dim_style()))
            }
            Some(_) => None,
        }
    };

    if let Some(message) = message {
        frame.render_widget(Paragraph::new(Line::from(message)).block(block), area);
        return;
    }

    let records = state.records.as_deref().unwrap_or_default();
    let header = Row::new(vec!["", "Hash", "Counterparty", "Value (ETH)", "Time (UTC)"])
        .style(theme.text_primary_style().bold());

    let rows: Vec<Row> = records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let outgoing = record.is_outgoing(address);
            let (arrow, counterparty) = if outgoing {
                ("OUT", record.to.as_str())
            } else {
                ("IN", record.from.as_str())
            };
            let time = record
                .time()
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default();
            let style = if i == state.selected_index {
                Style::default().fg(theme.primary).add_modifier(Modifier::BOLD)
            } else {
                theme.text_primary_style()
            };
            Row::new(vec![
                arrow.to_string(),
                record.short_hash(),
                counterparty.to_string(),
                record.value_ether(),
                time,
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Length(18),
            Constraint::Length(44),
            Constraint::Length(22),
            Constraint::Min(16),
        ],
    )
    .header(header)
    .block(block);

    frame.render_widget(table, area);

    if let Some(selected) = records.get(state.selected_index) {
        let link_area = Rect {
            y: area.bottom().saturating_sub(2),
            height: 1,
            x: area.x + 2,
            width: area.width.saturating_sub(4),
        };
        frame.render_widget(
            Paragraph::new(Span::styled(chain.tx_url(&selected.hash), theme.text_dim_style())),
            link_area,
        );
    }
}
