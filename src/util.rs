//! Extra utilities for use elsewhere in the app.

use axum::body::{boxed, Empty};
use axum::http::{header, StatusCode};
use axum::response::Response;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime, Time};

pub const DATE_FORMAT: &[FormatItem] =
    format_description!("[weekday repr:long] [day padding:none] [month repr:long] [year]");
pub const DATE_INPUT_FORMAT: &[FormatItem] = format_description!("[year]-[month]-[day]");
pub const TIME_FORMAT: &[FormatItem] = format_description!("[hour]:[minute]");

pub fn current_time() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

pub fn today() -> Date {
    current_time().date()
}

/// "Saturday 5 September 2026", falling back to ISO if formatting fails.
pub fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT).unwrap_or_else(|_| date.to_string())
}

/// "2026-09-05", the value an HTML date input expects.
pub fn format_date_input(date: Date) -> String {
    date.format(DATE_INPUT_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

/// "18:30", seconds dropped.
pub fn format_time(time: Time) -> String {
    time.format(TIME_FORMAT).unwrap_or_else(|_| time.to_string())
}

/// A 302 redirect, the response every mutating handler ends with.
pub fn redirect(to: &str) -> Response {
    Response::builder()
        .status(StatusCode::FOUND)
        .header(header::LOCATION, to)
        .body(boxed(Empty::new()))
        .unwrap()
}

/// Same as [`redirect`], with a `Set-Cookie` header attached.
pub fn redirect_with_cookie(to: &str, cookie: &str) -> Response {
    Response::builder()
        .status(StatusCode::FOUND)
        .header(header::LOCATION, to)
        .header(header::SET_COOKIE, cookie)
        .body(boxed(Empty::new()))
        .unwrap()
}

#[cfg(test)]
mod tests {
    use time::macros::{date, time};

    use super::*;

    #[test]
    fn dates_format_for_display_and_inputs() {
        let date = date!(2026 - 09 - 05);
        assert_eq!(format_date(date), "Saturday 5 September 2026");
        assert_eq!(format_date_input(date), "2026-09-05");
        assert_eq!(format_time(time!(18:30:00)), "18:30");
    }
}
