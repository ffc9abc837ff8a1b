//! Geo subsystem for CultureQuest.
//!
//! Resolves a country name to a coordinate with panoramic street imagery,
//! using bounded random sampling inside the country's bounding box.

pub mod providers;
pub mod resolver;
pub mod types;

pub use providers::{pano_url, GeocodingApi, GeocodingClient, ImageryApi, ImageryClient};
pub use resolver::SpotResolver;
pub use types::{CountryBounds, GeoError, LatLng, ResolveOptions, ResolvedSpot, SpotSource};
