//! Coordinates, great-circle distance and the display helpers built on it.

use serde::{Deserialize, Serialize};

const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Haversine distance to `other`, in metres.
    pub fn distance_m(&self, other: &GeoPoint) -> f64 {
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + self.latitude.to_radians().cos()
                * other.latitude.to_radians().cos()
                * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_KM * c * 1000.0
    }
}

/// `850m` below one kilometre, `1.2km` above.
pub fn format_distance(distance_m: f64) -> String {
    if distance_m < 1000.0 {
        format!("{}m", distance_m.round() as i64)
    } else {
        format!("{:.1}km", distance_m / 1000.0)
    }
}

/// `999`, `1.2k`, `3.4M`.
pub fn format_member_count(count: u32) -> String {
    if count < 1_000 {
        count.to_string()
    } else if count < 1_000_000 {
        format!("{:.1}k", f64::from(count) / 1_000.0)
    } else {
        format!("{:.1}M", f64::from(count) / 1_000_000.0)
    }
}
