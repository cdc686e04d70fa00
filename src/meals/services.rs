use anyhow::Context;
use bytes::Bytes;
use time::OffsetDateTime;
use tracing::{info, instrument};
use uuid::Uuid;

use super::repo;
use crate::nutrition::{analysis_prompt, parse_response, MealAnalysis, NutrientReading};
use crate::state::AppState;
use crate::vision::VisionError;

/// One model call, then a local parse. Only the model call can fail.
#[instrument(skip(st, image), fields(bytes = image.len()))]
pub async fn analyze_image(
    st: &AppState,
    image: Bytes,
    mime_type: &str,
) -> Result<MealAnalysis, VisionError> {
    let raw = st
        .vision
        .describe_image(image, mime_type, analysis_prompt())
        .await?;
    let analysis = parse_response(&raw);
    info!(
        title = %analysis.title,
        nutrients = analysis.nutrients.len(),
        "meal analysed"
    );
    Ok(analysis)
}

/// Readings as they are written to the store: catalog spelling for names the
/// catalog knows, so the dashboard's exact-name sums find them.
fn stored_readings(analysis: &MealAnalysis) -> Vec<NutrientReading> {
    analysis.nutrients.iter().map(NutrientReading::canonical).collect()
}

/// Persist the meal row and all of its readings as one unit of work.
pub async fn save_analysis(
    st: &AppState,
    user_id: Uuid,
    analysis: &MealAnalysis,
) -> anyhow::Result<(Uuid, OffsetDateTime)> {
    let mut tx = st.db.begin().await.context("begin tx")?;
    let (meal_id, created_at) =
        repo::insert_meal_tx(&mut tx, user_id, &analysis.title, &analysis.full_text).await?;
    let readings = stored_readings(analysis);
    for reading in &readings {
        repo::insert_nutrient_tx(&mut tx, meal_id, reading).await?;
    }
    tx.commit().await.context("commit tx")?;

    info!(%user_id, %meal_id, nutrients = readings.len(), "meal saved");
    Ok((meal_id, created_at))
}
