use ratatui::layout::Constraint;

pub(crate) const HELP_TEXT: &str = "Tab pane | Enter open | (c)onnect | (r)efresh | (g)et | (p)ut | (m)kdir | rmdir (x) | (d)elete | (R)eset | (e)xecute | (s)ettings | (C)lear | (q)uit";

pub(crate) const LABEL_WIDTH: usize = 7;

pub(crate) const SETTINGS_BAR_HEIGHT: u16 = 3;
pub(crate) const ACTION_BAR_HEIGHT: u16 = 3;
pub(crate) const TRANSCRIPT_HEIGHT: u16 = 10;
pub(crate) const FOOTER_HEIGHT: u16 = 2;
pub(crate) const TRANSFER_COLUMN_WIDTH: u16 = 9;

pub(crate) const MODAL_WIDTH_PERCENT: u16 = 60;
pub(crate) const MODAL_MIN_WIDTH: u16 = 30;

pub(crate) const PORT_PICKER_WIDTH: u16 = 50;
pub(crate) const PORT_PICKER_HEIGHT: u16 = 50;

pub(crate) const POPUP_MIN_WIDTH: u16 = 10;
pub(crate) const POPUP_MIN_HEIGHT: u16 = 5;

pub(crate) fn main_rows() -> [Constraint; 5] {
    [
        Constraint::Length(SETTINGS_BAR_HEIGHT),
        Constraint::Min(5),
        Constraint::Length(ACTION_BAR_HEIGHT),
        Constraint::Length(TRANSCRIPT_HEIGHT),
        Constraint::Length(FOOTER_HEIGHT),
    ]
}

pub(crate) fn pane_columns() -> [Constraint; 3] {
    [
        Constraint::Min(10),
        Constraint::Length(TRANSFER_COLUMN_WIDTH),
        Constraint::Min(10),
    ]
}
