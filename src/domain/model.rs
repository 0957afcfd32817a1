use serde::{Deserialize, Serialize};

/// Distance assigned to seat labels that do not look like `<Letter><Digits>`.
/// Such seats count as the furthest back, so their booking boards early.
pub const UNPARSEABLE_SEAT_DISTANCE: u64 = 999;

/// 一筆訂位：訂位編號 + 座位清單 (順序依輸入)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub booking_id: String,
    pub seats: Vec<String>,
}

impl Booking {
    pub fn new(booking_id: impl Into<String>, seats: Vec<String>) -> Self {
        Self {
            booking_id: booking_id.into(),
            seats,
        }
    }
}

/// Distance of one seat from the front entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatDistance {
    /// Trailing position number of a well-formed label; the row letter is ignored.
    Position(u64),
    Unparseable,
}

impl SeatDistance {
    pub fn value(self) -> u64 {
        match self {
            Self::Position(position) => position,
            Self::Unparseable => UNPARSEABLE_SEAT_DISTANCE,
        }
    }
}

/// Tie-break key derived from a booking ID.
///
/// Variant order matters: every numeric ID sorts before any ID without a
/// leading integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BookingKey {
    Numeric(i64),
    Unparseable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardingSequenceEntry {
    pub seq: usize,
    pub booking_id: String,
    pub seats: Vec<String>,
    pub max_distance: u64,
}

impl BoardingSequenceEntry {
    pub fn to_booking(&self) -> Booking {
        Booking::new(self.booking_id.clone(), self.seats.clone())
    }
}

/// 轉換階段的產出，交給 load 階段寫檔
#[derive(Debug, Clone)]
pub struct SequenceResult {
    pub source_name: String,
    pub bookings_parsed: usize,
    pub entries: Vec<BoardingSequenceEntry>,
}
