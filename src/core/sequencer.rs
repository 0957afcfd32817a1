//! Boarding order for a single-entry, single-aisle bus.
//!
//! Bookings whose furthest seat is furthest from the front door board first,
//! so nobody already seated has to let a later passenger past in the aisle.
//! Ties on distance go to the lower numeric booking ID; anything still tied
//! keeps manifest order.

use crate::domain::model::{BoardingSequenceEntry, Booking, BookingKey, SeatDistance};
use regex::Regex;
use std::sync::LazyLock;

// ASCII only: `\d` would also accept non-ASCII digits
static SEAT_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]([0-9]+)$").expect("seat label pattern is valid"));

/// Distance of a seat from the entry, taken from the label's position number.
///
/// `A20` and `C20` are the same distance away; the row letter only picks the
/// side of the aisle. Labels that are not `<Letter><Digits>` are `Unparseable`.
pub fn seat_distance(label: &str) -> SeatDistance {
    SEAT_LABEL
        .captures(label)
        .and_then(|caps| caps.get(1))
        .map(|digits| SeatDistance::Position(digits.as_str().parse().unwrap_or(u64::MAX)))
        .unwrap_or(SeatDistance::Unparseable)
}

/// A booking boards together, so it is ranked by its furthest seat.
/// A booking with no seats has distance 0.
pub fn max_distance(seats: &[String]) -> u64 {
    seats
        .iter()
        .map(|seat| seat_distance(seat).value())
        .max()
        .unwrap_or(0)
}

/// Tie-break key from the leading integer of a booking ID (`"12abc"` gives 12).
pub fn booking_key(booking_id: &str) -> BookingKey {
    let trimmed = booking_id.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: i64 = 0;
    let mut seen_digit = false;
    for byte in digits.bytes().take_while(u8::is_ascii_digit) {
        let digit = i64::from(byte - b'0');
        // 超出 i64 範圍時飽和
        value = if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        };
        seen_digit = true;
    }

    if seen_digit {
        BookingKey::Numeric(value)
    } else {
        BookingKey::Unparseable
    }
}

/// Rank bookings into the final boarding order, `seq` counting from 1.
pub fn sequence(bookings: &[Booking]) -> Vec<BoardingSequenceEntry> {
    let mut ranked: Vec<(u64, BookingKey, &Booking)> = bookings
        .iter()
        .map(|booking| {
            (
                max_distance(&booking.seats),
                booking_key(&booking.booking_id),
                booking,
            )
        })
        .collect();

    // sort_by 是穩定排序，完全相同的鍵保留輸入順序
    ranked.sort_by(|(dist_a, key_a, _), (dist_b, key_b, _)| {
        dist_b.cmp(dist_a).then_with(|| key_a.cmp(key_b))
    });

    let entries: Vec<BoardingSequenceEntry> = ranked
        .into_iter()
        .enumerate()
        .map(|(index, (max_distance, _, booking))| BoardingSequenceEntry {
            seq: index + 1,
            booking_id: booking.booking_id.clone(),
            seats: booking.seats.clone(),
            max_distance,
        })
        .collect();

    tracing::debug!("Sequenced {} booking(s)", entries.len());
    entries
}
