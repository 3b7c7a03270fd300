use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};

use crate::app::App;
use crate::ui::constants::{PORT_PICKER_HEIGHT, PORT_PICKER_WIDTH};
use crate::ui::helpers::{centered_rect_by_height, draw_popup_frame, key_hint, list_state};

pub(crate) fn draw_port_picker_modal(frame: &mut Frame<'_>, app: &App) {
    let Some(picker) = &app.port_picker else {
        return;
    };
    let height = frame.area().height.saturating_mul(PORT_PICKER_HEIGHT) / 100;
    let area = centered_rect_by_height(PORT_PICKER_WIDTH, height, frame.area());
    let inner = draw_popup_frame(
        frame,
        area,
        "Pick serial port",
        Style::default().fg(Color::Yellow),
    );

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(2)].as_ref())
        .split(inner);

    let items: Vec<ListItem> = picker
        .ports
        .iter()
        .map(|port| ListItem::new(port.as_str()))
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .highlight_symbol(Span::styled("> ", Style::default().fg(Color::White)));
    frame.render_stateful_widget(
        list,
        layout[0],
        &mut list_state(Some(picker.selected), picker.ports.len()),
    );

    let footer = Paragraph::new(key_hint(&[("Enter", " to use, "), ("Esc", " to close")]))
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, layout[1]);
}
