//! Booking manifest parser.
//!
//! Manifests are loosely formatted tables:
//!
//! ```text
//! Booking_ID    Seats
//! 101   A1,B1
//! 120   A20,C2
//! ```
//!
//! Every line goes through the same ordered rules:
//!
//! 1. trim, drop blank lines
//! 2. the first remaining line is a header when it mentions "booking"
//! 3. split fields on tabs if the line has one, otherwise on whitespace
//! 4. field 0 is the booking ID, the rest hold the seats
//! 5. seats split on commas if there are any, otherwise one seat per field
//!
//! Rows that do not produce an ID and at least one seat are skipped
//! silently. An empty result is how callers learn the file held no bookings.

use crate::domain::model::Booking;

const HEADER_MARKER: &str = "booking";

/// How a row is cut into fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldDelimiter {
    Tab,
    Whitespace,
}

impl FieldDelimiter {
    fn detect(line: &str) -> Self {
        if line.contains('\t') {
            Self::Tab
        } else {
            Self::Whitespace
        }
    }

    fn split(self, line: &str) -> Vec<&str> {
        match self {
            Self::Tab => line
                .split('\t')
                .map(trim_line)
                .filter(|field| !field.is_empty())
                .collect(),
            Self::Whitespace => line
                .split(is_blank)
                .filter(|field| !field.is_empty())
                .collect(),
        }
    }
}

/// How the seats portion of a row is cut into seat labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SeatDelimiter {
    Comma,
    Field,
}

impl SeatDelimiter {
    fn detect(joined_seats: &str) -> Self {
        if joined_seats.contains(',') {
            Self::Comma
        } else {
            Self::Field
        }
    }

    fn split(self, joined_seats: &str, seat_fields: &[&str]) -> Vec<String> {
        match self {
            Self::Comma => joined_seats
                .split(',')
                .map(trim_line)
                .filter(|seat| !seat.is_empty())
                .map(str::to_string)
                .collect(),
            Self::Field => seat_fields
                .iter()
                .map(|seat| trim_line(seat))
                .filter(|seat| !seat.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

/// Whitespace plus the BOM, which Windows exports sometimes leave mid-line.
fn is_blank(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

fn trim_line(line: &str) -> &str {
    line.trim_matches(is_blank)
}

fn significant_lines(content: &str) -> Vec<&str> {
    content
        .split('\n')
        .map(trim_line)
        .filter(|line| !line.is_empty())
        .collect()
}

fn is_header(line: &str) -> bool {
    line.to_lowercase().contains(HEADER_MARKER)
}

/// Parse one trimmed, non-empty row. `None` for rows without an ID and seats.
fn parse_row(line: &str) -> Option<Booking> {
    let fields = FieldDelimiter::detect(line).split(line);
    let (booking_id, seat_fields) = fields.split_first()?;
    if seat_fields.is_empty() {
        return None;
    }

    let booking_id = booking_id.trim();
    let joined_seats = seat_fields.join(" ");
    let seats = SeatDelimiter::detect(&joined_seats).split(&joined_seats, seat_fields);

    if booking_id.is_empty() || seats.is_empty() {
        return None;
    }

    Some(Booking::new(booking_id, seats))
}

/// Parse a whole manifest into bookings, in file order.
///
/// Never fails: malformed rows are dropped and an empty or unreadable
/// manifest gives an empty list.
pub fn parse(content: &str) -> Vec<Booking> {
    let lines = significant_lines(content);

    let rows = match lines.first() {
        Some(first) if is_header(first) => &lines[1..],
        _ => &lines[..],
    };

    let bookings: Vec<Booking> = rows.iter().filter_map(|line| parse_row(line)).collect();

    let skipped = rows.len() - bookings.len();
    if skipped > 0 {
        tracing::debug!("Skipped {} malformed row(s) while parsing manifest", skipped);
    }
    tracing::debug!("Parsed {} booking(s) from {} row(s)", bookings.len(), rows.len());

    bookings
}
