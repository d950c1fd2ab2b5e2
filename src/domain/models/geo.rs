//! Geographic coordinate model.

use serde::{Deserialize, Serialize};

/// A point on the globe in decimal degrees.
///
/// No range validation is applied; only finiteness matters to the
/// distance computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns true if both components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Parse a free-text `"lat, lng"` string as typed by a field worker.
    ///
    /// Splits on commas and parses the first two parts. Returns `None` when
    /// the comma is missing, either half fails to parse, or the result is
    /// not finite.
    pub fn parse_lat_lng(input: &str) -> Option<Self> {
        let mut parts = input.split(',');
        let lat = parts.next()?.trim().parse::<f64>().ok()?;
        let lng = parts.next()?.trim().parse::<f64>().ok()?;
        let coords = Self::new(lat, lng);
        coords.is_finite().then_some(coords)
    }

    /// Arithmetic mean of latitudes and longitudes, computed separately.
    ///
    /// This is a planar average, not a spherical centroid. Returns `None`
    /// for an empty slice.
    pub fn mean(points: &[Self]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let n = points.len() as f64;
        let (lat_sum, lng_sum) = points
            .iter()
            .fold((0.0, 0.0), |(lat, lng), p| (lat + p.lat, lng + p.lng));
        Some(Self::new(lat_sum / n, lng_sum / n))
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lng)
    }
}
