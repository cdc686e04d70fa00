use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::dto::{
    AnalysisResponse, HistoryQuery, MealDetails, MealListItem, SaveMealRequest, SavedMealResponse,
};
use super::{repo, services};
use crate::{
    auth::AuthUser,
    nutrition::{parse_response, sanitize_title, NutrientReading},
    state::AppState,
    vision::{normalize_image_mime, VisionError},
};

const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(list_meals))
        .route("/meals/:id", get(get_meal))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", post(save_meal))
        .route("/meals/analyze", post(analyze_meal))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

/// POST /meals/analyze (multipart, field `image`)
#[instrument(skip(state, mp))]
pub async fn analyze_meal(
    State(state): State<AppState>,
    mut mp: Multipart,
) -> Result<Json<AnalysisResponse>, (StatusCode, String)> {
    let mut upload = None;
    while let Some(field) = mp.next_field().await.map_err(bad_request)? {
        if field.name() != Some("image") {
            continue;
        }
        let content_type = field.content_type().unwrap_or_default().to_string();
        let data = field.bytes().await.map_err(bad_request)?;
        upload = Some((content_type, data));
        break;
    }

    let Some((content_type, data)) = upload else {
        return Err((StatusCode::BAD_REQUEST, "image is required".into()));
    };
    if data.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "image is empty".into()));
    }
    let Some(mime) = normalize_image_mime(&content_type) else {
        warn!(%content_type, "unsupported image type");
        return Err((
            StatusCode::BAD_REQUEST,
            "Supported image types are jpeg, png, webp and heic".into(),
        ));
    };

    match services::analyze_image(&state, data, mime).await {
        Ok(analysis) => Ok(Json(analysis.into())),
        Err(e) => {
            error!(error = %e, "vision call failed");
            Err(vision_failure(&e))
        }
    }
}

/// POST /meals { full_text }
#[instrument(skip(state, body))]
pub async fn save_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<SaveMealRequest>,
) -> Result<(StatusCode, HeaderMap, Json<SavedMealResponse>), (StatusCode, String)> {
    if body.full_text.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "full_text is required".into()));
    }

    let analysis = parse_response(&body.full_text);
    let (id, created_at) = services::save_analysis(&state, user_id, &analysis)
        .await
        .map_err(|e| {
            error!(error = %e, %user_id, "save meal failed");
            internal(e)
        })?;

    let mut headers = HeaderMap::new();
    if let Ok(location) = HeaderValue::from_str(&format!("/api/v1/meals/{}", id)) {
        headers.insert(header::LOCATION, location);
    }

    Ok((
        StatusCode::CREATED,
        headers,
        Json(saved_response(id, &analysis.title, analysis.nutrients.len(), created_at)),
    ))
}

/// GET /meals?range=last_7_days
#[instrument(skip(state))]
pub async fn list_meals(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<HistoryQuery>,
) -> Result<Json<Vec<MealListItem>>, (StatusCode, String)> {
    let offset = state.config.reporting_offset;
    let since = q.range.start(OffsetDateTime::now_utc(), offset);
    let meals = repo::list_since(&state.db, user_id, since)
        .await
        .map_err(|e| {
            error!(error = %e, %user_id, "list meals failed");
            internal(e)
        })?;
    info!(%user_id, count = meals.len(), "meals listed");
    Ok(Json(
        meals
            .into_iter()
            .map(|m| MealListItem::from_meal(m, offset))
            .collect(),
    ))
}

/// GET /meals/:id
#[instrument(skip(state))]
pub async fn get_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MealDetails>, (StatusCode, String)> {
    match repo::get_with_nutrients(&state.db, user_id, id).await {
        Ok(Some((meal, rows))) => Ok(Json(MealDetails {
            id: meal.id,
            title: sanitize_title(&meal.title),
            raw_title: meal.title,
            analysis_text: meal.analysis_text,
            created_at: meal.created_at,
            nutrients: rows.into_iter().map(NutrientReading::from).collect(),
        })),
        Ok(None) => Err((StatusCode::NOT_FOUND, "Meal not found".into())),
        Err(e) => {
            error!(error = %e, %user_id, %id, "get_meal failed");
            Err(internal(e))
        }
    }
}

fn saved_response(
    id: Uuid,
    raw_title: &str,
    nutrient_count: usize,
    created_at: OffsetDateTime,
) -> SavedMealResponse {
    SavedMealResponse {
        id,
        title: sanitize_title(raw_title),
        nutrient_count,
        created_at,
    }
}

fn vision_failure(e: &VisionError) -> (StatusCode, String) {
    (
        StatusCode::BAD_GATEWAY,
        format!("Could not analyze the image: {}", e),
    )
}

fn bad_request<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, e.to_string())
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
