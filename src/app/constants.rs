pub(crate) const STATUS_READY: &str = "Ready";
pub(crate) const STATUS_CANCELLED: &str = "Cancelled";
pub(crate) const STATUS_WORKING: &str = "Working...";

pub(crate) const LOG_TIMESTAMP_FORMAT: &str = "%m-%d %H:%M:%S";
pub(crate) const LOG_PARSE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub(crate) const LOG_SEPARATOR: &str = " | ";

pub(crate) const LOG_RETENTION_DAYS: i64 = 7;
pub(crate) const LOG_MAX_ENTRIES: usize = 10_000;
pub(crate) const TRANSCRIPT_MAX_LINES: usize = 500;
pub(crate) const TRANSCRIPT_PREFIX: &str = ">>> ";

pub(crate) const DELAY_STEP: f64 = 0.1;
pub(crate) const DELAY_MAX: f64 = 10.0;

pub(crate) const NO_FILE_SELECTED: &str = "No file selected";

pub(crate) const NOTICE_UNREACHABLE_TITLE: &str = "Device not found";
pub(crate) const NOTICE_PORT_PICKER_TITLE: &str = "No serial ports";
pub(crate) const NOTICE_PORT_PICKER_MESSAGE: &str =
    "No serial ports were detected. Type the port path instead.";
pub(crate) const NOT_CONNECTED_MESSAGE: &str = "Device not connected, press c to connect";
pub(crate) const NO_DIRECTORY_SELECTED: &str = "No directory selected";
