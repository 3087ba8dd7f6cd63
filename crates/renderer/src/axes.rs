//! Axis scaling, tick placement and tick label formatting.

use crate::figure::PxRect;

/// A data rectangle drawn into a pixel rectangle, y growing upward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Axes {
    pub rect: PxRect,
    pub xlim: (f64, f64),
    pub ylim: (f64, f64),
}

impl Axes {
    pub fn new(rect: PxRect, xlim: (f64, f64), ylim: (f64, f64)) -> Self {
        Self { rect, xlim, ylim }
    }

    pub fn x_to_px(&self, x: f64) -> f32 {
        let t = (x - self.xlim.0) / (self.xlim.1 - self.xlim.0);
        self.rect.x + (t as f32) * self.rect.w
    }

    pub fn y_to_px(&self, y: f64) -> f32 {
        let t = (y - self.ylim.0) / (self.ylim.1 - self.ylim.0);
        self.rect.bottom() - (t as f32) * self.rect.h
    }

    /// Data coordinates of the centre of pixel column `col` and row `row`,
    /// counted from the top-left of the axes.
    pub fn pixel_to_data(&self, col: u32, row: u32, width: u32, height: u32) -> (f64, f64) {
        let tx = (col as f64 + 0.5) / width as f64;
        let ty = (row as f64 + 0.5) / height as f64;
        (
            self.xlim.0 + tx * (self.xlim.1 - self.xlim.0),
            self.ylim.1 - ty * (self.ylim.1 - self.ylim.0),
        )
    }
}

/// A "nice" tick spacing (1, 2, 2.5 or 5 times a power of ten) giving
/// roughly `target` intervals over `range`.
pub fn nice_step(range: f64, target: usize) -> f64 {
    if !(range.is_finite() && range > 0.0) || target == 0 {
        return 1.0;
    }
    let raw = range / target as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let fraction = raw / magnitude;
    let nice = if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 2.5 {
        2.5
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Multiples of a nice step inside `[min, max]`.
pub fn nice_ticks(min: f64, max: f64, target: usize) -> Vec<f64> {
    let (lo, hi) = (min.min(max), min.max(max));
    let step = nice_step(hi - lo, target);
    let first = (lo / step - 1e-9).ceil() as i64;
    let last = (hi / step + 1e-9).floor() as i64;
    (first..=last)
        .map(|i| {
            let v = i as f64 * step;
            // Avoid "-0".
            if v == 0.0 {
                0.0
            } else {
                v
            }
        })
        .collect()
}

/// Number of decimals needed to print multiples of `step`.
fn decimals_for(step: f64) -> usize {
    let mut decimals = 0;
    let mut scaled = step.abs();
    while decimals < 6 && (scaled - scaled.round()).abs() > 1e-6 {
        scaled *= 10.0;
        decimals += 1;
    }
    decimals
}

/// Plain numeric tick label for a value on a grid of `step`.
pub fn format_tick(value: f64, step: f64) -> String {
    let text = format!("{:.*}", decimals_for(step), value);
    if text.starts_with('-') && text[1..].chars().all(|c| c == '0' || c == '.') {
        text[1..].to_string()
    } else {
        text
    }
}

fn format_degrees(value: f64) -> String {
    let v = value.abs();
    if (v - v.round()).abs() < 1e-9 {
        format!("{}", v.round() as i64)
    } else {
        format!("{:.1}", v)
    }
}

/// Longitude label: `60°W`, `0°`, `30°E`, `180°`.
pub fn format_longitude(lon: f64) -> String {
    let mut lon = lon % 360.0;
    if lon > 180.0 {
        lon -= 360.0;
    } else if lon < -180.0 {
        lon += 360.0;
    }
    let hemisphere = if lon.abs() < 1e-9 || (lon.abs() - 180.0).abs() < 1e-9 {
        ""
    } else if lon < 0.0 {
        "W"
    } else {
        "E"
    };
    format!("{}°{}", format_degrees(lon), hemisphere)
}

/// Latitude label: `30°N`, `0°`, `10°S`.
pub fn format_latitude(lat: f64) -> String {
    let hemisphere = if lat.abs() < 1e-9 {
        ""
    } else if lat < 0.0 {
        "S"
    } else {
        "N"
    };
    format!("{}°{}", format_degrees(lat), hemisphere)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nice_ticks_case_extent() {
        assert_eq!(
            nice_ticks(-100.0, 10.0, 6),
            vec![-100.0, -80.0, -60.0, -40.0, -20.0, 0.0]
        );
        assert_eq!(nice_ticks(10.0, 45.0, 4), vec![10.0, 20.0, 30.0, 40.0]);
    }

    #[test]
    fn test_nice_step_fractional() {
        assert!((nice_step(29.5, 6) - 5.0).abs() < 1e-12);
        assert!((nice_step(1.2, 6) - 0.2).abs() < 1e-12);
        assert!((nice_step(3.0, 6) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(-74.0, 2.0), "-74");
        assert_eq!(format_tick(0.6, 0.2), "0.6");
        assert_eq!(format_tick(-0.0, 0.5), "0.0");
        assert_eq!(format_tick(1.25, 0.25), "1.25");
    }

    #[test]
    fn test_geographic_labels() {
        assert_eq!(format_longitude(-60.0), "60°W");
        assert_eq!(format_longitude(0.0), "0°");
        assert_eq!(format_longitude(30.0), "30°E");
        assert_eq!(format_longitude(180.0), "180°");
        assert_eq!(format_longitude(200.0), "160°W");
        assert_eq!(format_latitude(30.0), "30°N");
        assert_eq!(format_latitude(-10.5), "10.5°S");
        assert_eq!(format_latitude(0.0), "0°");
    }

    #[test]
    fn test_axes_mapping() {
        let axes = Axes::new(PxRect::new(10.0, 20.0, 100.0, 50.0), (0.0, 10.0), (0.0, 5.0));
        assert_eq!(axes.x_to_px(5.0), 60.0);
        assert_eq!(axes.y_to_px(0.0), 70.0);
        assert_eq!(axes.y_to_px(5.0), 20.0);
        let (x, y) = axes.pixel_to_data(0, 0, 100, 50);
        assert!((x - 0.05).abs() < 1e-12);
        assert!((y - 4.95).abs() < 1e-12);
    }
}
