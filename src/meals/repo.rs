use anyhow::Context;
use sqlx::{PgPool, Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{Meal, MealNutrientRow, NutrientHistoryRow};
use crate::nutrition::NutrientReading;

/// Insert the meal header within a transaction.
pub async fn insert_meal_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    title: &str,
    analysis_text: &str,
) -> anyhow::Result<(Uuid, OffsetDateTime)> {
    let row: (Uuid, OffsetDateTime) = sqlx::query_as(
        r#"
        INSERT INTO meals (user_id, title, analysis_text)
        VALUES ($1, $2, $3)
        RETURNING id, created_at
        "#,
    )
    .bind(user_id)
    .bind(title)
    .bind(analysis_text)
    .fetch_one(&mut **tx)
    .await
    .context("insert meal")?;
    Ok(row)
}

/// Insert one nutrient reading for a meal within a transaction.
pub async fn insert_nutrient_tx(
    tx: &mut Transaction<'_, Postgres>,
    meal_id: Uuid,
    reading: &NutrientReading,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO meal_nutrients (meal_id, nutrient_name, amount, unit, percent_dv)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(meal_id)
    .bind(reading.nutrient_name.trim())
    .bind(reading.amount)
    .bind(&reading.unit)
    .bind(reading.percent_dv)
    .execute(&mut **tx)
    .await
    .context("insert meal nutrient")?;
    Ok(())
}

/// Meals created at or after `since`, most recent first.
pub async fn list_since(
    db: &PgPool,
    user_id: Uuid,
    since: OffsetDateTime,
) -> anyhow::Result<Vec<Meal>> {
    let rows = sqlx::query_as::<_, Meal>(
        r#"
        SELECT id, title, analysis_text, created_at
          FROM meals
         WHERE user_id = $1 AND created_at >= $2
         ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .bind(since)
    .fetch_all(db)
    .await
    .context("list meals")?;
    Ok(rows)
}

pub async fn get_with_nutrients(
    db: &PgPool,
    user_id: Uuid,
    meal_id: Uuid,
) -> anyhow::Result<Option<(Meal, Vec<MealNutrientRow>)>> {
    let meal = sqlx::query_as::<_, Meal>(
        r#"
        SELECT id, title, analysis_text, created_at
          FROM meals
         WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(meal_id)
    .bind(user_id)
    .fetch_optional(db)
    .await
    .context("get meal")?;

    let Some(meal) = meal else {
        return Ok(None);
    };

    let nutrients = sqlx::query_as::<_, MealNutrientRow>(
        r#"
        SELECT nutrient_name, amount, unit, percent_dv
          FROM meal_nutrients
         WHERE meal_id = $1
         ORDER BY id ASC
        "#,
    )
    .bind(meal_id)
    .fetch_all(db)
    .await
    .context("list meal nutrients")?;

    Ok(Some((meal, nutrients)))
}

/// Every stored reading for the user's meals since `since`, most recent
/// meal first.
pub async fn nutrient_history(
    db: &PgPool,
    user_id: Uuid,
    since: OffsetDateTime,
) -> anyhow::Result<Vec<NutrientHistoryRow>> {
    let rows = sqlx::query_as::<_, NutrientHistoryRow>(
        r#"
        SELECT m.id AS meal_id, n.nutrient_name, n.amount, n.unit, m.created_at
          FROM meals m
          JOIN meal_nutrients n ON n.meal_id = m.id
         WHERE m.user_id = $1 AND m.created_at >= $2
         ORDER BY m.created_at DESC, n.id ASC
        "#,
    )
    .bind(user_id)
    .bind(since)
    .fetch_all(db)
    .await
    .context("load nutrient history")?;
    Ok(rows)
}
