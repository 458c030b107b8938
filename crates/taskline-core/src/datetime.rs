use thiserror::Error;
use time::PrimitiveDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

/// The external date/time shape: 4-digit year, 2-digit month, 2-digit
/// day, then a 4-digit 24-hour time, all space-separated. The same
/// description drives user input, display, and the persisted records.
const EXTERNAL_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year] [month] [day] [hour][minute]");

/// Failure to interpret text as an external-format date/time.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct DateTimeError {
    /// The rejected input.
    pub input: String,
    /// Human-readable cause reported by the parser.
    pub reason: String,
}

/// Parse `yyyy MM dd HHmm` text into a calendar-checked date/time.
///
/// # Errors
/// Returns a [`DateTimeError`] carrying the underlying reason when the
/// tokens do not form a valid calendar date/time (month 13, hour 25,
/// day 32, and so on) or do not match the shape at all.
pub fn parse(text: &str) -> Result<PrimitiveDateTime, DateTimeError> {
    PrimitiveDateTime::parse(text, EXTERNAL_FORMAT).map_err(|err| DateTimeError {
        input: text.to_owned(),
        reason: err.to_string(),
    })
}

/// Render a date/time back into the external `yyyy MM dd HHmm` form.
#[must_use]
pub fn format(value: PrimitiveDateTime) -> String {
    // The description only emits numeric components, so formatting a
    // value that round-tripped through `parse` cannot fail.
    value.format(EXTERNAL_FORMAT).unwrap_or_default()
}

/// Whether `text` has the exact 4-token numeric shape of the external
/// format. Shape violations get usage guidance; calendar violations
/// are left to [`parse`] so the reason can be reported.
#[must_use]
pub fn matches_shape(text: &str) -> bool {
    let widths = [4usize, 2, 2, 4];
    let mut tokens = text.split(' ');
    let shaped = widths.into_iter().all(|width| {
        tokens
            .next()
            .is_some_and(|tok| tok.len() == width && tok.bytes().all(|b| b.is_ascii_digit()))
    });
    shaped && tokens.next().is_none()
}
