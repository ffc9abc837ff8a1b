//! Geo providers: geocoding (forward and reverse) and street-imagery
//! metadata, plus the trait seams the resolver is written against.

use super::types::{CountryBounds, GeoError, LatLng};
use serde::Deserialize;
use std::time::Duration;

const GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";
const METADATA_URL: &str = "https://maps.googleapis.com/maps/api/streetview/metadata";
const USER_AGENT: &str = "CultureQuest/0.3 (geography-quiz)";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ─── Trait seams ────────────────────────────────────────────────

/// Country-boundary lookup and reverse geocoding.
pub trait GeocodingApi {
    /// Bounding box for a country name. `Ok(None)` means the service
    /// returned no usable geometry.
    fn country_bounds(&self, country: &str) -> Result<Option<CountryBounds>, GeoError>;

    /// Long-form name of the country containing a point, if any.
    fn country_at(&self, point: LatLng) -> Result<Option<String>, GeoError>;
}

/// Panoramic street-imagery availability.
pub trait ImageryApi {
    fn has_panorama(&self, point: LatLng, radius_m: u32) -> Result<bool, GeoError>;
}

// ─── Geocoding payload ──────────────────────────────────────────

#[derive(Deserialize, Debug)]
pub struct GeocodeResponse {
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
}

#[derive(Deserialize, Debug)]
pub struct GeocodeResult {
    #[serde(default)]
    pub address_components: Vec<AddressComponent>,
    pub geometry: Option<Geometry>,
}

#[derive(Deserialize, Debug)]
pub struct AddressComponent {
    pub long_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Deserialize, Debug)]
pub struct Geometry {
    pub bounds: Option<CornerPair>,
    pub viewport: Option<CornerPair>,
}

#[derive(Deserialize, Debug)]
pub struct CornerPair {
    pub northeast: Corner,
    pub southwest: Corner,
}

#[derive(Deserialize, Debug)]
pub struct Corner {
    pub lat: f64,
    pub lng: f64,
}

/// First result's bounds, falling back to its viewport.
pub fn decode_bounds(payload: &GeocodeResponse) -> Option<CountryBounds> {
    let geometry = payload.results.first()?.geometry.as_ref()?;
    let corners = geometry.bounds.as_ref().or(geometry.viewport.as_ref())?;
    Some(CountryBounds::new(
        LatLng::new(corners.southwest.lat, corners.southwest.lng),
        LatLng::new(corners.northeast.lat, corners.northeast.lng),
    ))
}

/// Long name of the first result's component typed "country".
pub fn decode_country(payload: &GeocodeResponse) -> Option<String> {
    payload
        .results
        .first()?
        .address_components
        .iter()
        .find(|c| c.types.iter().any(|t| t == "country"))
        .map(|c| c.long_name.clone())
}

// ─── Geocoding client ───────────────────────────────────────────

/// HTTP geocoding client. The API key comes from the composition root.
pub struct GeocodingClient {
    api_key: String,
}

impl GeocodingClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self { api_key: api_key.into() }
    }

    fn fetch(&self, url: &str) -> Result<GeocodeResponse, GeoError> {
        let response = ureq::get(url)
            .set("User-Agent", USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .call()
            .map_err(|e| GeoError::Network(e.to_string()))?;

        response
            .into_json()
            .map_err(|e| GeoError::InvalidResponse(e.to_string()))
    }
}

impl GeocodingApi for GeocodingClient {
    fn country_bounds(&self, country: &str) -> Result<Option<CountryBounds>, GeoError> {
        let url = format!(
            "{}?address={}&key={}",
            GEOCODE_URL,
            urlencod(country),
            urlencod(&self.api_key),
        );
        let payload = self.fetch(&url)?;
        Ok(decode_bounds(&payload))
    }

    fn country_at(&self, point: LatLng) -> Result<Option<String>, GeoError> {
        let url = format!(
            "{}?latlng={},{}&result_type=country&key={}",
            GEOCODE_URL,
            point.lat,
            point.lng,
            urlencod(&self.api_key),
        );
        let payload = self.fetch(&url)?;
        Ok(decode_country(&payload))
    }
}

// ─── Imagery metadata client ────────────────────────────────────

#[derive(Deserialize, Debug)]
pub struct MetadataResponse {
    pub status: String,
}

/// Status "OK" means a navigable panorama exists near the point.
pub fn decode_availability(payload: &MetadataResponse) -> bool {
    payload.status == "OK"
}

pub struct ImageryClient {
    api_key: String,
}

impl ImageryClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self { api_key: api_key.into() }
    }
}

impl ImageryApi for ImageryClient {
    fn has_panorama(&self, point: LatLng, radius_m: u32) -> Result<bool, GeoError> {
        let url = format!(
            "{}?location={},{}&radius={}&key={}",
            METADATA_URL,
            point.lat,
            point.lng,
            radius_m,
            urlencod(&self.api_key),
        );

        let response = ureq::get(&url)
            .set("User-Agent", USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .call()
            .map_err(|e| GeoError::Network(e.to_string()))?;

        let payload: MetadataResponse = response
            .into_json()
            .map_err(|e| GeoError::InvalidResponse(e.to_string()))?;

        Ok(decode_availability(&payload))
    }
}

// ─── Viewer URL ─────────────────────────────────────────────────

/// Panorama viewer link for a resolved spot.
pub fn pano_url(point: LatLng) -> String {
    format!(
        "https://www.google.com/maps/@?api=1&map_action=pano&viewpoint={},{}",
        point.lat, point.lng,
    )
}

// ─── URL encoding (minimal, no extra dep) ───────────────────────

fn urlencod(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            ' ' => "%20".to_string(),
            '&' => "%26".to_string(),
            '=' => "%3D".to_string(),
            '+' => "%2B".to_string(),
            ',' => "%2C".to_string(),
            _ if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' || c == '~' => {
                c.to_string()
            }
            _ => format!("%{:02X}", c as u32),
        })
        .collect()
}
