//! Timestamps of case steps.
//!
//! Step files and track records name their time as `YYYYMMDDHH`
//! (e.g. `2002020812.nc` for 12 UTC on 8 February 2002).

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::path::Path;

/// Parse a `YYYYMMDDHH` code.
pub fn parse_date_code(code: &str) -> Option<NaiveDateTime> {
    if code.len() != 10 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = code[0..4].parse().ok()?;
    let month: u32 = code[4..6].parse().ok()?;
    let day: u32 = code[6..8].parse().ok()?;
    let hour: u32 = code[8..10].parse().ok()?;

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = NaiveTime::from_hms_opt(hour, 0, 0)?;
    Some(NaiveDateTime::new(date, time))
}

/// Valid time of a step file named `YYYYMMDDHH.<ext>`.
pub fn step_time(file_path: &str) -> Option<NaiveDateTime> {
    let stem = Path::new(file_path).file_stem().and_then(|s| s.to_str())?;
    parse_date_code(stem)
}
