use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};

use crate::app::App;
use crate::model::{DirectoryListing, Pane};
use crate::session::remote::display_remote_path;
use crate::ui::constants::HELP_TEXT;
use crate::ui::helpers::{connection_label, entry_label, list_state, truncate_path};

fn title_style(focused: bool) -> Style {
    let style = Style::default().add_modifier(Modifier::BOLD);
    if focused {
        style.fg(Color::Cyan)
    } else {
        style.fg(Color::Gray)
    }
}

pub(crate) fn draw_settings_bar(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let profile = app.session.profile();
    let (state, color) = connection_label(app.session.state());
    let line = Line::from(vec![
        Span::styled("Port ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(profile.port.clone()),
        Span::raw("  "),
        Span::styled("Baud ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(profile.baud.to_string()),
        Span::raw("  "),
        Span::styled("Delay ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!("{:.1}s", profile.delay)),
        Span::raw("  "),
        Span::styled(state, Style::default().fg(color).add_modifier(Modifier::BOLD)),
    ]);
    let bar = Paragraph::new(line).block(
        Block::default()
            .title(Line::from(Span::styled(
                "MicroPython device",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )))
            .borders(Borders::ALL),
    );
    frame.render_widget(bar, area);
}

fn draw_listing(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    listing: &DirectoryListing,
    selected: Option<usize>,
    focused: bool,
) {
    let items: Vec<ListItem> = listing
        .entries()
        .iter()
        .map(|entry| {
            let style = if entry.is_dir() {
                Style::default().fg(Color::Blue)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(Span::styled(entry_label(entry), style)))
        })
        .collect();
    let title_width = area.width.saturating_sub(4) as usize;
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let list = List::new(items)
        .block(
            Block::default()
                .title(Line::from(Span::styled(
                    truncate_path(title, title_width),
                    title_style(focused),
                )))
                .borders(Borders::ALL)
                .border_style(border_style),
        )
        .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED))
        .highlight_symbol(Span::styled(
            ">",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ));
    frame.render_stateful_widget(list, area, &mut list_state(selected, listing.len()));
}

pub(crate) fn draw_local_pane(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let local = app.session.local();
    let title = local.current_path().to_string_lossy().into_owned();
    draw_listing(
        frame,
        area,
        &title,
        local.listing(),
        local.selected_index(),
        app.focus == Pane::Local,
    );
}

pub(crate) fn draw_remote_pane(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let remote = app.session.remote();
    let title = format!("device:{}", display_remote_path(remote.current_path()));
    draw_listing(
        frame,
        area,
        &title,
        remote.listing(),
        remote.selected_index(),
        app.focus == Pane::Remote,
    );
}

fn action_span(key: &str, label: &str, enabled: bool) -> Vec<Span<'static>> {
    let style = if enabled {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    vec![
        Span::styled(key.to_string(), style.add_modifier(Modifier::BOLD)),
        Span::styled(format!(" {label}"), style),
    ]
}

pub(crate) fn draw_transfer_column(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let actions = app.session.actions();
    let mut lines = vec![Line::from(""), Line::from("")];
    lines.push(Line::from(action_span("p", ">>", actions.put)));
    lines.push(Line::from(""));
    lines.push(Line::from(action_span("g", "<<", actions.get)));
    let column = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(column, area);
}

pub(crate) fn draw_action_bar(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let actions = app.session.actions();
    let groups = [
        ("m", "mkdir", actions.make_directory),
        ("x", "rmdir", actions.remove_directory),
        ("d", "delete", actions.delete),
        ("R", "reset", actions.reset),
        ("e", "run", actions.run),
        ("r", "refresh", actions.refresh),
    ];
    let mut spans = Vec::new();
    for (index, (key, label, enabled)) in groups.into_iter().enumerate() {
        if index > 0 {
            spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
        }
        spans.extend(action_span(key, label, enabled));
    }
    let bar = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .title(Line::from(Span::styled("Device", title_style(false))))
                .borders(Borders::ALL),
        );
    frame.render_widget(bar, area);
}

pub(crate) fn draw_transcript(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let height = area.height.saturating_sub(2) as usize;
    let start = app.transcript.len().saturating_sub(height);
    let lines: Vec<Line> = app
        .transcript
        .iter()
        .skip(start)
        .map(|line| Line::from(line.as_str()))
        .collect();
    let transcript = Paragraph::new(lines)
        .block(
            Block::default()
                .title(Line::from(Span::styled("Output", title_style(false))))
                .borders(Borders::ALL),
        )
        .style(Style::default().fg(Color::Gray));
    frame.render_widget(transcript, area);
}

pub(crate) fn draw_footer(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let footer = Paragraph::new(vec![
        Line::from(Span::styled(
            app.status.clone(),
            Style::default().fg(Color::Yellow),
        )),
        Line::from(HELP_TEXT),
    ])
    .style(Style::default().fg(Color::Gray))
    .wrap(Wrap { trim: true });
    frame.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::device::fake::FakeDevice;

    fn rendered(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn remote_pane_lists_entries() {
        let dir = tempfile::tempdir().unwrap();
        let device = Arc::new(FakeDevice::reachable());
        device.add_file("/main.py", b"");
        device.add_dir("/lib");
        let mut app = App::for_test(device, dir.path());
        app.session.refresh_remote().unwrap();
        let mut terminal = Terminal::new(TestBackend::new(40, 8)).unwrap();
        terminal
            .draw(|frame| draw_remote_pane(frame, &app, frame.area()))
            .unwrap();
        let content = rendered(&terminal);
        assert!(content.contains("device:/"));
        assert!(content.contains("lib/"));
        assert!(content.contains("main.py"));
    }

    #[test]
    fn settings_bar_shows_profile_and_state() {
        let dir = tempfile::tempdir().unwrap();
        let app = App::for_test(Arc::new(FakeDevice::reachable()), dir.path());
        let mut terminal = Terminal::new(TestBackend::new(80, 3)).unwrap();
        terminal
            .draw(|frame| draw_settings_bar(frame, &app, frame.area()))
            .unwrap();
        let content = rendered(&terminal);
        assert!(content.contains("/dev/ttyUSB0"));
        assert!(content.contains("115200"));
        assert!(content.contains("disconnected"));
    }

    #[test]
    fn transcript_shows_newest_lines() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::for_test(Arc::new(FakeDevice::reachable()), dir.path());
        for index in 0..10 {
            app.print(&format!("message {index}"));
        }
        let mut terminal = Terminal::new(TestBackend::new(40, 5)).unwrap();
        terminal
            .draw(|frame| draw_transcript(frame, &app, frame.area()))
            .unwrap();
        let content = rendered(&terminal);
        assert!(content.contains(">>> message 9"));
        assert!(!content.contains("message 0"));
    }
}
