//! Spot resolver — bounded random sampling inside a country's bounding box.
//!
//! Flow: bounds lookup → up to N sampled candidates (imagery check, then
//! reverse-geocode confirmation) → centroid fallback. No usable geometry
//! yields an absent result; per-attempt failures discard the candidate and
//! advance the counter.

use super::providers::{GeocodingApi, ImageryApi};
use super::types::{ResolveOptions, ResolvedSpot, SpotSource};
use rand::Rng;

/// The resolver. Stateless per call; safe to share behind a reference.
pub struct SpotResolver<G, I> {
    geocoder: G,
    imagery: I,
    opts: ResolveOptions,
}

impl<G: GeocodingApi, I: ImageryApi> SpotResolver<G, I> {
    pub fn new(geocoder: G, imagery: I) -> Self {
        Self { geocoder, imagery, opts: ResolveOptions::default() }
    }

    pub fn with_options(geocoder: G, imagery: I, opts: ResolveOptions) -> Self {
        Self { geocoder, imagery, opts }
    }

    pub fn options(&self) -> ResolveOptions {
        self.opts
    }

    /// Resolve with a thread-local random source.
    pub fn resolve(&self, country: &str) -> Option<ResolvedSpot> {
        self.resolve_with_rng(country, &mut rand::thread_rng())
    }

    /// Resolve with an explicit random source (seeded for reproducibility).
    pub fn resolve_with_rng(&self, country: &str, rng: &mut impl Rng) -> Option<ResolvedSpot> {
        let bounds = match self.geocoder.country_bounds(country) {
            Ok(Some(b)) => b,
            // No usable geometry or a failed lookup: absent, no imagery calls.
            Ok(None) | Err(_) => return None,
        };

        for attempt in 1..=self.opts.attempts {
            let candidate = bounds.sample(rng);

            match self.imagery.has_panorama(candidate, self.opts.radius_m) {
                Ok(true) => {}
                Ok(false) | Err(_) => continue,
            }

            match self.geocoder.country_at(candidate) {
                Ok(Some(found)) if found.to_lowercase() == country.to_lowercase() => {
                    return Some(ResolvedSpot {
                        country: country.to_string(),
                        point: candidate,
                        source: SpotSource::Sampled,
                        attempts: attempt,
                    });
                }
                // Wrong country, outside any country, or a failed lookup:
                // discard the candidate.
                Ok(_) | Err(_) => continue,
            }
        }

        // Exhausted. The centroid is returned without re-checking imagery.
        Some(ResolvedSpot {
            country: country.to_string(),
            point: bounds.centroid(),
            source: SpotSource::Centroid,
            attempts: self.opts.attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::types::{CountryBounds, GeoError, LatLng};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::cell::Cell;

    // ─── Provider doubles ───────────────────────────────────────

    enum BoundsReply {
        Found(CountryBounds),
        NoGeometry,
        Fail,
    }

    struct FakeGeocoder {
        bounds: BoundsReply,
        reverse: Result<Option<String>, ()>,
        reverse_calls: Cell<u32>,
    }

    impl FakeGeocoder {
        fn with_bounds(reverse: Result<Option<String>, ()>) -> Self {
            Self {
                bounds: BoundsReply::Found(ten_by_ten()),
                reverse,
                reverse_calls: Cell::new(0),
            }
        }
    }

    impl GeocodingApi for FakeGeocoder {
        fn country_bounds(&self, _country: &str) -> Result<Option<CountryBounds>, GeoError> {
            match &self.bounds {
                BoundsReply::Found(b) => Ok(Some(*b)),
                BoundsReply::NoGeometry => Ok(None),
                BoundsReply::Fail => Err(GeoError::Network("dns failure".into())),
            }
        }

        fn country_at(&self, _point: LatLng) -> Result<Option<String>, GeoError> {
            self.reverse_calls.set(self.reverse_calls.get() + 1);
            match &self.reverse {
                Ok(name) => Ok(name.clone()),
                Err(()) => Err(GeoError::InvalidResponse("truncated body".into())),
            }
        }
    }

    enum ImageryReply {
        Always,
        Never,
        Fail,
    }

    struct FakeImagery {
        reply: ImageryReply,
        calls: Cell<u32>,
    }

    impl FakeImagery {
        fn new(reply: ImageryReply) -> Self {
            Self { reply, calls: Cell::new(0) }
        }
    }

    impl ImageryApi for FakeImagery {
        fn has_panorama(&self, _point: LatLng, _radius_m: u32) -> Result<bool, GeoError> {
            self.calls.set(self.calls.get() + 1);
            match self.reply {
                ImageryReply::Always => Ok(true),
                ImageryReply::Never => Ok(false),
                ImageryReply::Fail => Err(GeoError::Network("timeout".into())),
            }
        }
    }

    fn ten_by_ten() -> CountryBounds {
        CountryBounds::new(LatLng::new(0.0, 0.0), LatLng::new(10.0, 10.0))
    }

    // ─── Tests ──────────────────────────────────────────────────

    #[test]
    fn test_first_attempt_acceptance() {
        let geo = FakeGeocoder::with_bounds(Ok(Some("Testland".into())));
        let imagery = FakeImagery::new(ImageryReply::Always);
        let resolver = SpotResolver::new(geo, imagery);

        let mut rng = StdRng::seed_from_u64(1);
        let spot = resolver.resolve_with_rng("Testland", &mut rng).unwrap();

        assert_eq!(spot.source, SpotSource::Sampled);
        assert_eq!(spot.attempts, 1);
        assert!((0.0..=10.0).contains(&spot.point.lat));
        assert!((0.0..=10.0).contains(&spot.point.lng));
        assert_eq!(resolver.imagery.calls.get(), 1);
    }

    #[test]
    fn test_accepted_point_within_bounds_across_seeds() {
        let bounds = ten_by_ten();
        for seed in 0..25 {
            let geo = FakeGeocoder::with_bounds(Ok(Some("Testland".into())));
            let imagery = FakeImagery::new(ImageryReply::Always);
            let resolver = SpotResolver::new(geo, imagery);

            let mut rng = StdRng::seed_from_u64(seed);
            let spot = resolver.resolve_with_rng("Testland", &mut rng).unwrap();
            assert!(bounds.contains(spot.point), "seed {} escaped bounds", seed);
        }
    }

    #[test]
    fn test_no_geometry_is_absent_without_imagery_calls() {
        let geo = FakeGeocoder {
            bounds: BoundsReply::NoGeometry,
            reverse: Ok(None),
            reverse_calls: Cell::new(0),
        };
        let imagery = FakeImagery::new(ImageryReply::Always);
        let resolver = SpotResolver::new(geo, imagery);

        assert!(resolver.resolve_with_rng("Atlantis", &mut StdRng::seed_from_u64(3)).is_none());
        assert_eq!(resolver.imagery.calls.get(), 0);
        assert_eq!(resolver.geocoder.reverse_calls.get(), 0);
    }

    #[test]
    fn test_bounds_lookup_error_is_absent() {
        let geo = FakeGeocoder {
            bounds: BoundsReply::Fail,
            reverse: Ok(None),
            reverse_calls: Cell::new(0),
        };
        let imagery = FakeImagery::new(ImageryReply::Always);
        let resolver = SpotResolver::new(geo, imagery);

        assert!(resolver.resolve_with_rng("Testland", &mut StdRng::seed_from_u64(3)).is_none());
        assert_eq!(resolver.imagery.calls.get(), 0);
    }

    #[test]
    fn test_no_imagery_falls_back_to_centroid() {
        let geo = FakeGeocoder::with_bounds(Ok(Some("Testland".into())));
        let imagery = FakeImagery::new(ImageryReply::Never);
        let resolver = SpotResolver::new(geo, imagery);

        let spot = resolver.resolve_with_rng("Testland", &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(spot.source, SpotSource::Centroid);
        assert_eq!(spot.point, LatLng::new(5.0, 5.0));
        assert_eq!(spot.attempts, 10);
        assert_eq!(resolver.imagery.calls.get(), 10);
        // Rejected candidates never reach the reverse-geocode step.
        assert_eq!(resolver.geocoder.reverse_calls.get(), 0);
    }

    #[test]
    fn test_imagery_error_skips_attempt_and_terminates() {
        let geo = FakeGeocoder::with_bounds(Ok(Some("Testland".into())));
        let imagery = FakeImagery::new(ImageryReply::Fail);
        let resolver = SpotResolver::new(geo, imagery);

        let spot = resolver.resolve_with_rng("Testland", &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(spot.source, SpotSource::Centroid);
        assert_eq!(resolver.imagery.calls.get(), 10);
    }

    #[test]
    fn test_country_mismatch_discards_all_candidates() {
        let geo = FakeGeocoder::with_bounds(Ok(Some("Otherland".into())));
        let imagery = FakeImagery::new(ImageryReply::Always);
        let resolver = SpotResolver::new(geo, imagery);

        let spot = resolver.resolve_with_rng("Testland", &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(spot.source, SpotSource::Centroid);
        assert_eq!(resolver.geocoder.reverse_calls.get(), 10);
    }

    #[test]
    fn test_reverse_geocode_error_discards_candidate() {
        let geo = FakeGeocoder::with_bounds(Err(()));
        let imagery = FakeImagery::new(ImageryReply::Always);
        let resolver = SpotResolver::new(geo, imagery);

        let spot = resolver.resolve_with_rng("Testland", &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(spot.source, SpotSource::Centroid);
        assert_eq!(resolver.geocoder.reverse_calls.get(), 10);
    }

    #[test]
    fn test_country_match_is_case_insensitive() {
        let geo = FakeGeocoder::with_bounds(Ok(Some("KENYA".into())));
        let imagery = FakeImagery::new(ImageryReply::Always);
        let resolver = SpotResolver::new(geo, imagery);

        let spot = resolver.resolve_with_rng("kenya", &mut StdRng::seed_from_u64(2)).unwrap();
        assert_eq!(spot.source, SpotSource::Sampled);
    }

    #[test]
    fn test_reverse_none_discards_candidate() {
        // Point confirmed in no country at all (e.g. open water).
        let geo = FakeGeocoder::with_bounds(Ok(None));
        let imagery = FakeImagery::new(ImageryReply::Always);
        let resolver = SpotResolver::new(geo, imagery);

        let spot = resolver.resolve_with_rng("Testland", &mut StdRng::seed_from_u64(2)).unwrap();
        assert_eq!(spot.source, SpotSource::Centroid);
    }

    #[test]
    fn test_attempt_cap_is_configurable() {
        let geo = FakeGeocoder::with_bounds(Ok(Some("Otherland".into())));
        let imagery = FakeImagery::new(ImageryReply::Always);
        let opts = ResolveOptions { attempts: 3, radius_m: 5000 };
        let resolver = SpotResolver::with_options(geo, imagery, opts);

        let spot = resolver.resolve_with_rng("Testland", &mut StdRng::seed_from_u64(11)).unwrap();
        assert_eq!(spot.attempts, 3);
        assert_eq!(resolver.imagery.calls.get(), 3);
    }
}
