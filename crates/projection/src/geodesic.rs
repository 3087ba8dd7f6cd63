//! Great-circle paths on a spherical Earth.
//!
//! Points are interpolated with spherical linear interpolation (slerp) of the
//! endpoints' unit vectors, which spaces them evenly in arc length.

use std::f64::consts::PI;

use case_common::GeoPoint;

use crate::error::{ProjectionError, ProjectionResult};

/// Mean Earth radius in meters.
pub const EARTH_RADIUS: f64 = 6371229.0;

const TO_RAD: f64 = PI / 180.0;
const TO_DEG: f64 = 180.0 / PI;

fn to_unit_vector(p: GeoPoint) -> [f64; 3] {
    let (lat, lon) = (p.lat * TO_RAD, p.lon * TO_RAD);
    [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
}

fn from_unit_vector(v: [f64; 3]) -> GeoPoint {
    let [x, y, z] = v;
    let lat = z.clamp(-1.0, 1.0).asin() * TO_DEG;
    let lon = y.atan2(x) * TO_DEG;
    GeoPoint::new(lat, lon)
}

/// Central angle between two points, in radians (haversine form).
fn central_angle(a: GeoPoint, b: GeoPoint) -> f64 {
    let (lat1, lat2) = (a.lat * TO_RAD, b.lat * TO_RAD);
    let dlat = lat2 - lat1;
    let dlon = (b.lon - a.lon) * TO_RAD;
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * h.sqrt().min(1.0).asin()
}

/// Great-circle distance between two points, in meters.
pub fn great_circle_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    EARTH_RADIUS * central_angle(a, b)
}

/// `steps` points along the great circle from `start` to `end`, both included.
///
/// Coincident endpoints give `steps` copies of the point.
///
/// # Errors
/// [`ProjectionError::TooFewSteps`] when `steps < 2`, and
/// [`ProjectionError::AntipodalEndpoints`] when no unique great circle exists.
pub fn geodesic_path(start: GeoPoint, end: GeoPoint, steps: usize) -> ProjectionResult<Vec<GeoPoint>> {
    if steps < 2 {
        return Err(ProjectionError::TooFewSteps(steps));
    }
    let start = GeoPoint::checked(start.lat, start.lon)?;
    let end = GeoPoint::checked(end.lat, end.lon)?;

    let omega = central_angle(start, end);
    if omega < 1e-12 {
        return Ok(vec![start; steps]);
    }
    if (PI - omega).abs() < 1e-9 {
        return Err(ProjectionError::AntipodalEndpoints);
    }

    let a = to_unit_vector(start);
    let b = to_unit_vector(end);
    let sin_omega = omega.sin();

    let mut path = Vec::with_capacity(steps);
    path.push(start);
    for i in 1..steps - 1 {
        let f = i as f64 / (steps - 1) as f64;
        let wa = ((1.0 - f) * omega).sin() / sin_omega;
        let wb = (f * omega).sin() / sin_omega;
        path.push(from_unit_vector([
            wa * a[0] + wb * b[0],
            wa * a[1] + wb * b[1],
            wa * a[2] + wb * b[2],
        ]));
    }
    // Exact endpoints rather than round-tripped through vectors.
    path.push(end);

    Ok(path)
}
