use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::countries::Country;
use crate::geo::{pano_url, ResolvedSpot};
use crate::quiz::{build_rounds, QuizRound};

use super::state::AppState;

const MAX_QUIZ_ROUNDS: usize = 20;
const CHOICES_PER_ROUND: usize = 4;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

pub(super) struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

// ─── GET /api/spot ───────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SpotQuery {
    pub country: Option<String>,
    pub seed: Option<u64>,
}

#[derive(Serialize)]
pub struct SpotResponse {
    pub country: String,
    pub lat: f64,
    pub lng: f64,
    pub source: String,
    pub attempts: u32,
    pub pano_url: String,
}

impl From<ResolvedSpot> for SpotResponse {
    fn from(spot: ResolvedSpot) -> Self {
        Self {
            country: spot.country,
            lat: spot.point.lat,
            lng: spot.point.lng,
            source: spot.source.to_string(),
            attempts: spot.attempts,
            pano_url: pano_url(spot.point),
        }
    }
}

pub async fn spot(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SpotQuery>,
) -> Result<Json<SpotResponse>, Response> {
    let start = Instant::now();

    let country = params.country.as_deref().unwrap_or("").trim().to_string();
    if country.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Missing 'country' parameter").into_response());
    }

    let resolved = match params.seed {
        Some(seed) => state
            .resolver
            .resolve_with_rng(&country, &mut StdRng::seed_from_u64(seed)),
        None => state.resolver.resolve(&country),
    };

    let spot = match resolved {
        Some(s) => s,
        None => {
            return Err(api_error(
                StatusCode::NOT_FOUND,
                format!("No usable geometry for '{}'", country),
            )
            .into_response());
        }
    };

    let elapsed = start.elapsed();
    eprintln!(
        "[{}] GET /api/spot?country={} -> {} after {} attempts ({:.1}ms)",
        Utc::now().format("%H:%M:%S"),
        country,
        spot.source,
        spot.attempts,
        elapsed.as_secs_f64() * 1000.0,
    );

    Ok(Json(SpotResponse::from(spot)))
}

// ─── GET /api/countries ──────────────────────────────────────────

pub async fn country_list(State(state): State<Arc<AppState>>) -> Json<Vec<Country>> {
    Json(state.catalog.all().to_vec())
}

// ─── GET /api/quiz ───────────────────────────────────────────────

#[derive(Deserialize)]
pub struct QuizQuery {
    pub rounds: Option<usize>,
    pub seed: Option<u64>,
}

pub async fn quiz_rounds(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QuizQuery>,
) -> Result<Json<Vec<QuizRound>>, Response> {
    let start = Instant::now();

    if state.catalog.is_empty() {
        return Err(api_error(StatusCode::SERVICE_UNAVAILABLE, "Country catalog is empty").into_response());
    }

    let rounds = params.rounds.unwrap_or(5).clamp(1, MAX_QUIZ_ROUNDS);
    let mut rng = match params.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let built = build_rounds(&state.catalog, rounds, CHOICES_PER_ROUND, &mut rng);

    let elapsed = start.elapsed();
    eprintln!(
        "[{}] GET /api/quiz?rounds={} -> {} rounds ({:.1}ms)",
        Utc::now().format("%H:%M:%S"),
        rounds,
        built.len(),
        elapsed.as_secs_f64() * 1000.0,
    );

    Ok(Json(built))
}
