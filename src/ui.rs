use crate::app::App;
use crate::constants::{FOOTER_HEIGHT, STATUS_BAR_HEIGHT};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

pub fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(STATUS_BAR_HEIGHT), // Status
                Constraint::Min(0),                    // Visited links
                Constraint::Length(FOOTER_HEIGHT),     // Key help
            ]
            .as_ref(),
        )
        .split(f.area());

    // 1. STATUS BAR
    let (state_text, state_style) = if app.running {
        (
            " RUNNING ",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )
    } else {
        (
            " STOPPED ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )
    };
    let status = Paragraph::new(Line::from(vec![
        Span::styled(state_text, state_style),
        Span::raw(" "),
        Span::raw(app.status_message.as_str()),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Roam - {} ", app.seed_url)),
    );
    f.render_widget(status, chunks[0]);

    // 2. VISITED LINKS
    let viewport_height = chunks[1].height.saturating_sub(2) as usize;
    let start_index = app.scroll.min(app.links.len());
    let end_index = (start_index + viewport_height).min(app.links.len());
    let visible: Vec<Line> = app.links[start_index..end_index]
        .iter()
        .map(|link| Line::from(link.as_str()))
        .collect();

    let links = Paragraph::new(visible).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Visited Links ({}) ", app.links.len())),
    );
    f.render_widget(links, chunks[1]);

    // 3. KEY HELP
    let help = Paragraph::new(" s start | x stop | e save links | v refresh list | Up/Down scroll | q quit ")
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}
