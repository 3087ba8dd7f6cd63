//! Storm track files.
//!
//! The first line carries the area code, case id and year in fixed columns
//! (`NATL0292002 ...`). Each following line is one record:
//! `date, <x> hour, lat, lon, mslp, lci, radius`.

use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{IngestionError, Result};
use crate::steps::parse_date_code;

/// Fixed-column header of a track file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackHeader {
    pub area: String,
    pub ec_id: String,
    pub year: String,
}

/// One position of the storm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackRecord {
    /// Date and hour concatenated, e.g. `2002020812`.
    pub date_code: String,
    /// `date_code` as a timestamp when it has the `YYYYMMDDHH` shape.
    pub time: Option<NaiveDateTime>,
    pub lat: f64,
    pub lon: f64,
    /// Mean sea-level pressure (hPa).
    pub mslp: f64,
    /// Last closed isobar (hPa).
    pub lci: f64,
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackData {
    pub header: TrackHeader,
    pub records: Vec<TrackRecord>,
}

impl TrackData {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record whose date code matches `code`.
    pub fn at(&self, code: &str) -> Option<&TrackRecord> {
        self.records.iter().find(|r| r.date_code == code)
    }
}

/// Read and parse a track file.
pub fn read_track_data(path: &Path) -> Result<TrackData> {
    let text = std::fs::read_to_string(path)?;
    let track = parse_track(&text, &path.display().to_string())?;
    info!(
        path = %path.display(),
        area = %track.header.area,
        ec_id = %track.header.ec_id,
        year = %track.header.year,
        records = track.len(),
        "Read storm track"
    );
    Ok(track)
}

/// Parse track text; `source` names the input in errors.
pub fn parse_track(text: &str, source: &str) -> Result<TrackData> {
    let parse_error = |line: usize, message: String| IngestionError::TrackParse {
        path: source.to_string(),
        line,
        message,
    };

    let mut lines = text.lines();
    let first = lines
        .next()
        .ok_or_else(|| parse_error(1, "missing header line".to_string()))?;
    let column = |range: std::ops::Range<usize>| {
        first
            .get(range.clone())
            .map(str::to_string)
            .ok_or_else(|| parse_error(1, format!("header too short for columns {range:?}")))
    };
    let header = TrackHeader {
        area: column(0..4)?,
        ec_id: column(4..7)?,
        year: column(7..11)?,
    };

    let mut records = Vec::new();
    for (i, line) in lines.enumerate() {
        let line_no = i + 2;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() < 7 {
            return Err(parse_error(
                line_no,
                format!("expected 7 fields, found {}", fields.len()),
            ));
        }
        let number = |index: usize, name: &str| {
            fields[index]
                .trim()
                .parse::<f64>()
                .map_err(|e| parse_error(line_no, format!("{name} '{}': {e}", fields[index].trim())))
        };

        // Last blank-separated token of the hour column; padding on either
        // side of the hour is ignored.
        let hour = fields[1].split_whitespace().last().unwrap_or("");
        let date_code = format!("{}{}", fields[0].trim(), hour);
        records.push(TrackRecord {
            time: parse_date_code(&date_code),
            date_code,
            lat: number(2, "latitude")?,
            lon: number(3, "longitude")?,
            mslp: number(4, "mslp")?,
            lci: number(5, "lci")?,
            radius: number(6, "radius")?,
        });
    }

    Ok(TrackData { header, records })
}
