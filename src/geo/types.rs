//! Core types for the geo subsystem.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5},{:.5}", self.lat, self.lng)
    }
}

/// Axis-aligned bounding box: southwest and northeast corners.
/// Fetched per resolution request, never cached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CountryBounds {
    pub southwest: LatLng,
    pub northeast: LatLng,
}

impl CountryBounds {
    pub fn new(southwest: LatLng, northeast: LatLng) -> Self {
        Self { southwest, northeast }
    }

    /// Arithmetic midpoint of the two corners.
    pub fn centroid(&self) -> LatLng {
        LatLng {
            lat: (self.southwest.lat + self.northeast.lat) / 2.0,
            lng: (self.southwest.lng + self.northeast.lng) / 2.0,
        }
    }

    /// Draw a point uniformly inside the box. A reversed span (bounds
    /// crossing the antimeridian) still interpolates between the corners
    /// rather than panicking.
    pub fn sample(&self, rng: &mut impl Rng) -> LatLng {
        let lat = self.southwest.lat + rng.gen::<f64>() * (self.northeast.lat - self.southwest.lat);
        let lng = self.southwest.lng + rng.gen::<f64>() * (self.northeast.lng - self.southwest.lng);
        LatLng { lat, lng }
    }

    /// Inclusive containment check.
    pub fn contains(&self, p: LatLng) -> bool {
        let (lat_lo, lat_hi) = ordered(self.southwest.lat, self.northeast.lat);
        let (lng_lo, lng_hi) = ordered(self.southwest.lng, self.northeast.lng);
        (lat_lo..=lat_hi).contains(&p.lat) && (lng_lo..=lng_hi).contains(&p.lng)
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

/// How a spot was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpotSource {
    /// Sampled candidate with imagery present and country membership confirmed.
    Sampled,
    /// Bounding-box centroid after all attempts were rejected. Imagery unverified.
    Centroid,
}

impl fmt::Display for SpotSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sampled => write!(f, "sampled"),
            Self::Centroid => write!(f, "centroid"),
        }
    }
}

/// A resolved street-imagery spot inside a country.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedSpot {
    pub country: String,
    pub point: LatLng,
    pub source: SpotSource,
    /// Candidate cycles spent before this result was produced.
    pub attempts: u32,
}

/// Resolver tuning. Defaults match the production quiz flow.
#[derive(Debug, Clone, Copy)]
pub struct ResolveOptions {
    /// Maximum candidate-generation cycles per resolution.
    pub attempts: u32,
    /// Imagery metadata search radius in meters.
    pub radius_m: u32,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self { attempts: 10, radius_m: 5000 }
    }
}

/// Geo provider errors. These never escape the resolver; callers of
/// `resolve` observe only presence or absence.
#[derive(Debug)]
pub enum GeoError {
    Network(String),
    InvalidResponse(String),
}

impl fmt::Display for GeoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "Network error: {}", msg),
            Self::InvalidResponse(msg) => write!(f, "Invalid API response: {}", msg),
        }
    }
}

impl std::error::Error for GeoError {}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn unit_box() -> CountryBounds {
        CountryBounds::new(LatLng::new(0.0, 0.0), LatLng::new(10.0, 10.0))
    }

    #[test]
    fn test_centroid_is_midpoint() {
        let b = CountryBounds::new(LatLng::new(-10.0, 20.0), LatLng::new(30.0, 40.0));
        let c = b.centroid();
        assert_relative_eq!(c.lat, 10.0);
        assert_relative_eq!(c.lng, 30.0);
    }

    #[test]
    fn test_sample_stays_inside() {
        let b = unit_box();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let p = b.sample(&mut rng);
            assert!(b.contains(p), "sampled point {} escaped the box", p);
        }
    }

    #[test]
    fn test_sample_reversed_span_does_not_panic() {
        // Fiji-style box where west > east across the antimeridian.
        let b = CountryBounds::new(LatLng::new(-21.0, 177.0), LatLng::new(-12.0, -178.0));
        let mut rng = StdRng::seed_from_u64(7);
        let p = b.sample(&mut rng);
        assert!(b.contains(p));
    }

    #[test]
    fn test_contains_is_inclusive() {
        let b = unit_box();
        assert!(b.contains(LatLng::new(0.0, 0.0)));
        assert!(b.contains(LatLng::new(10.0, 10.0)));
        assert!(!b.contains(LatLng::new(10.0001, 5.0)));
    }

    #[test]
    fn test_display_precision() {
        let p = LatLng::new(59.32930001, 18.0686);
        assert_eq!(format!("{}", p), "59.32930,18.06860");
    }
}
