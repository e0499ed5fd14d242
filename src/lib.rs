/*!
Access-controlled viewer pages for the MO-100 (Microsoft Word) certification
prep course materials.
*/
use time::{Date, format_description::FormatItem, macros::format_description};

pub mod access;
pub mod config;
pub mod inter;
pub mod material;
pub mod pdf;
pub mod store;
pub mod user;

/// Long-form date as printed on the materials, e.g. "October 19, 2026".
pub const LONG_DATE_FMT: &[FormatItem] = format_description!(
    "[month repr:long] [day padding:none], [year]"
);
/// Date format used in PDF file names.
pub const ISO_DATE_FMT: &[FormatItem] = format_description!("[year]-[month]-[day]");

/// Today's date, according to the server.
pub fn now() -> Date {
    time::OffsetDateTime::now_utc().date()
}

pub fn log_level_from_env() -> simplelog::LevelFilter {
    use simplelog::LevelFilter;

    let mut level_string = match std::env::var("LOG_LEVEL") {
        Err(_) => { return LevelFilter::Warn; },
        Ok(s) => s,
    };

    level_string.make_ascii_lowercase();
    match level_string.as_str() {
        "max" => LevelFilter::max(),
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Warn,
    }
}
