use ratatui::Frame;
use ratatui::layout::{Direction, Layout};

use crate::app::App;
use crate::model::Mode;
use crate::ui::constants::{main_rows, pane_columns};
use crate::ui::modals::{
    draw_confirm_removal_modal, draw_make_directory_modal, draw_notice_modal, draw_settings_modal,
};
use crate::ui::panels::{
    draw_action_bar, draw_footer, draw_local_pane, draw_remote_pane, draw_settings_bar,
    draw_transcript, draw_transfer_column,
};
use crate::ui::pickers::draw_port_picker_modal;

pub(crate) mod constants;
mod helpers;
mod modals;
mod panels;
mod pickers;

pub(crate) fn draw_ui(frame: &mut Frame<'_>, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(main_rows().as_ref())
        .split(frame.area());
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(pane_columns().as_ref())
        .split(rows[1]);

    draw_settings_bar(frame, app, rows[0]);
    draw_local_pane(frame, app, panes[0]);
    draw_transfer_column(frame, app, panes[1]);
    draw_remote_pane(frame, app, panes[2]);
    draw_action_bar(frame, app, rows[2]);
    draw_transcript(frame, app, rows[3]);
    draw_footer(frame, app, rows[4]);

    match app.mode {
        Mode::Normal => {}
        Mode::Settings => {
            draw_settings_modal(frame, app);
            if app.port_picker.is_some() {
                draw_port_picker_modal(frame, app);
            }
        }
        Mode::MakeDirectory => draw_make_directory_modal(frame, app),
        Mode::ConfirmRemoval => draw_confirm_removal_modal(frame, app),
    }
    if app.notice.is_some() {
        draw_notice_modal(frame, app);
    }
}
