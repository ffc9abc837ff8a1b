use crate::countries::CountryCatalog;
use crate::geo::{GeocodingClient, ImageryClient, SpotResolver};

/// Shared server state. The resolver is stateless per call, so no lock
/// guards it; each request resolves independently.
pub struct AppState {
    pub resolver: SpotResolver<GeocodingClient, ImageryClient>,
    pub catalog: CountryCatalog,
}
