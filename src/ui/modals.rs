use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::App;
use crate::model::SettingsField;
use crate::ui::constants::{LABEL_WIDTH, MODAL_MIN_WIDTH, MODAL_WIDTH_PERCENT};
use crate::ui::helpers::{
    action_line, centered_rect_by_height, draw_popup_frame, field_line, key_hint, modal_height,
    render_text_cursor,
};

pub(crate) fn draw_notice_modal(frame: &mut Frame<'_>, app: &App) {
    let Some(notice) = &app.notice else {
        return;
    };
    let message_lines = notice.message.lines().count().max(1);
    let height = modal_height(message_lines + 2, 1);
    let area = centered_rect_by_height(50, height, frame.area());
    let inner = draw_popup_frame(
        frame,
        area,
        notice.title.as_str(),
        Style::default().fg(Color::Yellow),
    );

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(2), Constraint::Length(2)].as_ref())
        .split(inner);

    let message = Paragraph::new(notice.message.as_str()).wrap(Wrap { trim: true });
    frame.render_widget(message, layout[0]);

    let footer = Paragraph::new(key_hint(&[("Enter", " or "), ("Esc", " to close")]))
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, layout[1]);
}

pub(crate) fn draw_confirm_removal_modal(frame: &mut Frame<'_>, app: &App) {
    let Some(pending) = &app.pending_removal else {
        return;
    };
    let height = modal_height(2, 2);
    let area = centered_rect_by_height(50, height, frame.area());
    let inner = draw_popup_frame(
        frame,
        area,
        "Delete from device?",
        Style::default().fg(Color::Yellow),
    );

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(2)].as_ref())
        .split(inner);

    let message = Paragraph::new(pending.question()).wrap(Wrap { trim: true });
    frame.render_widget(message, layout[0]);

    let footer = Paragraph::new(key_hint(&[
        ("Enter", " or "),
        ("Y", " to confirm, "),
        ("Esc", " or "),
        ("N", " to cancel"),
    ]))
    .style(Style::default().fg(Color::Gray))
    .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, layout[1]);
}

pub(crate) fn draw_make_directory_modal(frame: &mut Frame<'_>, app: &App) {
    let height = modal_height(1, 2);
    let area = centered_rect_by_height(MODAL_WIDTH_PERCENT, height, frame.area());
    let inner = draw_popup_frame(
        frame,
        area,
        "New directory",
        Style::default().fg(Color::Cyan),
    );

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(2)].as_ref())
        .split(inner);

    let value_width = layout[0].width.saturating_sub(2 + LABEL_WIDTH as u16 + 2) as usize;
    let line = field_line("Name", &app.directory_name, true, LABEL_WIDTH, value_width);
    frame.render_widget(Paragraph::new(line), layout[0]);
    render_text_cursor(frame, layout[0], 0, app.directory_name.chars().count());

    let footer = Paragraph::new(key_hint(&[("Enter", " to create, "), ("Esc", " to cancel")]))
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, layout[1]);
}

pub(crate) fn draw_settings_modal(frame: &mut Frame<'_>, app: &App) {
    let form = &app.settings;
    let area_width = (frame.area().width.saturating_mul(MODAL_WIDTH_PERCENT) / 100)
        .min(frame.area().width.saturating_sub(2))
        .max(MODAL_MIN_WIDTH);
    let content_width = area_width.saturating_sub(2 + 2);
    let value_width = content_width.saturating_sub(2 + LABEL_WIDTH as u16 + 2) as usize;

    let lines = vec![
        field_line(
            "Port",
            &form.port,
            form.active_field == SettingsField::Port,
            LABEL_WIDTH,
            value_width,
        ),
        field_line(
            "Baud",
            &format!("< {} >", form.baud),
            form.active_field == SettingsField::Baud,
            LABEL_WIDTH,
            value_width,
        ),
        field_line(
            "Delay",
            &format!("< {:.1} s >", form.delay),
            form.active_field == SettingsField::Delay,
            LABEL_WIDTH,
            value_width,
        ),
        ratatui::text::Line::from(""),
        action_line("[Save]", form.active_field == SettingsField::ActionSave),
    ];
    let footer_lines = vec![
        key_hint(&[
            ("Tab", " or "),
            ("Up/Down", " to move, "),
            ("Left/Right", " to change, "),
            ("Esc", " to cancel"),
        ]),
        key_hint(&[("F2", " to pick a detected serial port")]),
    ];

    let height = modal_height(lines.len(), footer_lines.len() + 1);
    let area = centered_rect_by_height(MODAL_WIDTH_PERCENT, height, frame.area());
    let inner = draw_popup_frame(frame, area, "Settings", Style::default().fg(Color::Cyan));

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Min(1),
                Constraint::Length(footer_lines.len() as u16 + 1),
            ]
            .as_ref(),
        )
        .split(inner);

    frame.render_widget(Paragraph::new(lines), layout[0]);
    if form.active_field == SettingsField::Port && app.port_picker.is_none() {
        render_text_cursor(frame, layout[0], 0, form.port.chars().count());
    }

    let footer = Paragraph::new(footer_lines)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, layout[1]);
}
