//! Synthetic data generators.
//!
//! Predictable patterns that tests can verify without real model output.
//! All grids are row-major with rows along latitude.

/// Creates a test grid with predictable values.
///
/// Each cell value is calculated as: `col * 1000 + row`
///
/// ```
/// use test_utils::create_test_grid;
///
/// let grid = create_test_grid(10, 5);
/// assert_eq!(grid.len(), 50);
/// assert_eq!(grid[1], 1000.0); // col=1, row=0
/// assert_eq!(grid[10], 1.0);   // col=0, row=1
/// ```
pub fn create_test_grid(width: usize, height: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push((col * 1000 + row) as f32);
        }
    }
    data
}

/// Evenly spaced coordinate axis: `start, start + step, ...` with `count` values.
pub fn create_axis(start: f64, step: f64, count: usize) -> Vec<f64> {
    (0..count).map(|i| start + step * i as f64).collect()
}

/// Latitude axis of the synthetic case: 10N to 45N every degree.
pub fn case_latitudes() -> Vec<f64> {
    create_axis(10.0, 1.0, 36)
}

/// Longitude axis of the synthetic case: 100W to 10E every degree.
pub fn case_longitudes() -> Vec<f64> {
    create_axis(-100.0, 1.0, 111)
}

/// Peak of the synthetic uptake blob, in mm/day.
pub const MOISTURE_PEAK: f32 = 20.0;

/// Centre of the synthetic uptake blob as (lat, lon).
pub const MOISTURE_CENTRE: (f64, f64) = (35.0, -70.0);

/// Integrated moisture uptake shaped like a Gaussian blob off the US east
/// coast, zero far from the centre.
pub fn create_moisture_grid(lat: &[f64], lon: &[f64]) -> Vec<f32> {
    let (lat0, lon0) = MOISTURE_CENTRE;
    let mut data = Vec::with_capacity(lat.len() * lon.len());
    for &y in lat {
        for &x in lon {
            let d2 = ((y - lat0) / 4.0).powi(2) + ((x - lon0) / 6.0).powi(2);
            data.push(MOISTURE_PEAK * (-d2).exp() as f32);
        }
    }
    data
}

/// Per-layer moisture uptake, `[layer][lat][lon]`.
///
/// Layer `k` holds the integrated blob scaled by `(k + 1) / layers`, so the
/// top layer equals [`create_moisture_grid`].
pub fn create_layered_moisture(layers: usize, lat: &[f64], lon: &[f64]) -> Vec<f32> {
    let base = create_moisture_grid(lat, lon);
    let mut data = Vec::with_capacity(layers * base.len());
    for k in 0..layers {
        let scale = (k + 1) as f32 / layers as f32;
        data.extend(base.iter().map(|v| v * scale));
    }
    data
}

/// Field that is linear in latitude and longitude: `a + b * lat + c * lon`.
///
/// Bilinear interpolation reproduces such a field exactly.
pub fn create_linear_field(lat: &[f64], lon: &[f64], a: f64, b: f64, c: f64) -> Vec<f32> {
    let mut data = Vec::with_capacity(lat.len() * lon.len());
    for &y in lat {
        for &x in lon {
            data.push((a + b * y + c * x) as f32);
        }
    }
    data
}

/// Creates a grid filled with a constant value.
pub fn create_constant_grid(width: usize, height: usize, value: f32) -> Vec<f32> {
    vec![value; width * height]
}

/// Creates a grid with NaN values at specific (row, col) positions.
pub fn create_grid_with_nans(
    width: usize,
    height: usize,
    nan_positions: &[(usize, usize)],
) -> Vec<f32> {
    let mut data = create_test_grid(width, height);
    for &(row, col) in nan_positions {
        if row < height && col < width {
            data[row * width + col] = f32::NAN;
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_grid_values() {
        let grid = create_test_grid(10, 5);
        for row in 0..5 {
            for col in 0..10 {
                assert_eq!(grid[row * 10 + col], (col * 1000 + row) as f32);
            }
        }
    }

    #[test]
    fn test_case_axes() {
        let lat = case_latitudes();
        let lon = case_longitudes();
        assert_eq!(lat.first(), Some(&10.0));
        assert_eq!(lat.last(), Some(&45.0));
        assert_eq!(lon.first(), Some(&-100.0));
        assert_eq!(lon.last(), Some(&10.0));
    }

    #[test]
    fn test_moisture_grid_peaks_at_centre() {
        let lat = case_latitudes();
        let lon = case_longitudes();
        let grid = create_moisture_grid(&lat, &lon);
        let row = lat.iter().position(|&v| v == MOISTURE_CENTRE.0).unwrap();
        let col = lon.iter().position(|&v| v == MOISTURE_CENTRE.1).unwrap();
        let peak = grid[row * lon.len() + col];
        assert_eq!(peak, MOISTURE_PEAK);
        assert!(grid.iter().all(|&v| (0.0..=MOISTURE_PEAK).contains(&v)));
    }

    #[test]
    fn test_layered_moisture_scales_by_layer() {
        let lat = create_axis(30.0, 1.0, 3);
        let lon = create_axis(-72.0, 1.0, 4);
        let data = create_layered_moisture(4, &lat, &lon);
        assert_eq!(data.len(), 4 * 12);
        let base = create_moisture_grid(&lat, &lon);
        assert_eq!(&data[36..48], base.as_slice());
        assert!((data[0] - base[0] * 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_grid_with_nans() {
        let grid = create_grid_with_nans(4, 4, &[(0, 0), (3, 3), (9, 9)]);
        assert!(grid[0].is_nan());
        assert!(grid[15].is_nan());
        assert_eq!(grid.iter().filter(|v| v.is_nan()).count(), 2);
    }
}
