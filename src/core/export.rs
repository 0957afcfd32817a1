use crate::core::sequencer::seat_distance;
use crate::domain::model::{BoardingSequenceEntry, SeatDistance};
use crate::utils::error::{BoardingError, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

const TSV_HEADER: &str = "Seq\tBooking_ID";
const LEFT_ROWS: [char; 2] = ['A', 'B'];
const RIGHT_ROWS: [char; 2] = ['C', 'D'];
/// The seat map only draws the "Back of Bus" banner past this many positions.
const BACK_BANNER_THRESHOLD: u64 = 5;
/// Seats further back than this are left off the seat map.
const MAX_MAP_POSITION: u64 = 500;

/// 一個要寫出的檔案
#[derive(Debug, Clone)]
pub struct OutputFile {
    pub name: String,
    pub contents: Vec<u8>,
}

/// The downloadable two-column table. No trailing newline after the last row.
pub fn render_tsv(entries: &[BoardingSequenceEntry]) -> String {
    let rows: Vec<String> = entries
        .iter()
        .map(|entry| format!("{}\t{}", entry.seq, entry.booking_id))
        .collect();
    format!("{}\n{}", TSV_HEADER, rows.join("\n"))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SequenceRow<'a> {
    seq: usize,
    booking_id: &'a str,
}

#[derive(Serialize)]
struct SequenceResponse<'a> {
    success: bool,
    sequence: Vec<SequenceRow<'a>>,
    details: &'a [BoardingSequenceEntry],
}

pub fn render_json(entries: &[BoardingSequenceEntry]) -> Result<String> {
    let response = SequenceResponse {
        success: true,
        sequence: entries
            .iter()
            .map(|entry| SequenceRow {
                seq: entry.seq,
                booking_id: &entry.booking_id,
            })
            .collect(),
        details: entries,
    };
    Ok(serde_json::to_string_pretty(&response)?)
}

pub fn render_csv(entries: &[BoardingSequenceEntry]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["seq", "booking_id", "seats", "max_distance"])?;

    for entry in entries {
        writer.write_record([
            entry.seq.to_string(),
            entry.booking_id.clone(),
            entry.seats.join(","),
            entry.max_distance.to_string(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| BoardingError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| BoardingError::ProcessingError {
        message: format!("CSV output is not valid UTF-8: {}", e),
    })
}

/// Text picture of the bus: back row on top, front entry at the bottom.
///
/// ```text
/// Back of Bus
///    A B | C D
/// 20 1 . | . .
/// ...
///  1 . . | . .
/// Front Entry
/// ```
///
/// Occupied seats show the booking's boarding `seq`.
pub fn render_seat_map(entries: &[BoardingSequenceEntry]) -> String {
    let mut occupied: HashMap<&str, usize> = HashMap::new();
    let mut max_position = 1;

    for entry in entries {
        for seat in &entry.seats {
            let SeatDistance::Position(position) = seat_distance(seat) else {
                continue;
            };
            if position > MAX_MAP_POSITION {
                tracing::warn!("Seat {} is beyond the seat map, leaving it out", seat);
                continue;
            }
            // 同一座位重複出現時以後者為準
            occupied.insert(seat.as_str(), entry.seq);
            max_position = max_position.max(position);
        }
    }

    let position_width = max_position.to_string().len();
    let cell_width = occupied
        .values()
        .map(|seq| seq.to_string().len())
        .max()
        .unwrap_or(1);

    let cell = |row: char, position: u64| -> String {
        let label = format!("{}{}", row, position);
        let text = occupied
            .get(label.as_str())
            .map_or_else(|| ".".to_string(), ToString::to_string);
        format!("{:>width$}", text, width = cell_width)
    };

    let mut lines = Vec::new();
    if max_position > BACK_BANNER_THRESHOLD {
        lines.push("Back of Bus".to_string());
    }

    let heading = |row: char| format!("{:>width$}", row, width = cell_width);
    lines.push(format!(
        "{:>pw$} {} {} | {} {}",
        "",
        heading(LEFT_ROWS[0]),
        heading(LEFT_ROWS[1]),
        heading(RIGHT_ROWS[0]),
        heading(RIGHT_ROWS[1]),
        pw = position_width
    ));

    for position in (1..=max_position).rev() {
        lines.push(format!(
            "{:>pw$} {} {} | {} {}",
            position,
            cell(LEFT_ROWS[0], position),
            cell(LEFT_ROWS[1], position),
            cell(RIGHT_ROWS[0], position),
            cell(RIGHT_ROWS[1], position),
            pw = position_width
        ));
    }

    lines.push("Front Entry".to_string());
    lines.join("\n") + "\n"
}

/// Render one output format. `format` must be one of `tsv`, `csv`, `json`, `map`.
pub fn render(format: &str, entries: &[BoardingSequenceEntry]) -> Result<Vec<u8>> {
    let text = match format {
        "tsv" => render_tsv(entries),
        "csv" => render_csv(entries)?,
        "json" => render_json(entries)?,
        "map" => render_seat_map(entries),
        other => {
            return Err(BoardingError::InvalidConfigValueError {
                field: "output_formats".to_string(),
                value: other.to_string(),
                reason: "Unsupported output format".to_string(),
            })
        }
    };
    Ok(text.into_bytes())
}

/// 把多個輸出打包成一個 ZIP
pub fn bundle(files: &[OutputFile]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

    for file in files {
        zip.start_file::<_, ()>(file.name.as_str(), FileOptions::default())?;
        zip.write_all(&file.contents)?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}
