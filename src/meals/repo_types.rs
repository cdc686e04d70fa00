use sqlx::FromRow;
use time::{OffsetDateTime, UtcOffset};
use uuid::Uuid;

use crate::nutrition::{aggregate::NutrientRow, NutrientReading};
use crate::time_range::to_local;

#[derive(Debug, Clone, FromRow)]
pub struct Meal {
    pub id: Uuid,
    pub title: String,
    pub analysis_text: Option<String>,
    pub created_at: OffsetDateTime,
}

/// Stored reading for one meal.
#[derive(Debug, Clone, FromRow)]
pub struct MealNutrientRow {
    pub nutrient_name: String,
    pub amount: Option<f64>,
    pub unit: Option<String>,
    pub percent_dv: Option<f64>,
}

impl From<MealNutrientRow> for NutrientReading {
    fn from(r: MealNutrientRow) -> Self {
        Self {
            nutrient_name: r.nutrient_name,
            amount: r.amount.unwrap_or(0.0),
            unit: r.unit.unwrap_or_default(),
            percent_dv: r.percent_dv,
        }
    }
}

/// Meal + nutrient join row feeding the dashboard.
#[derive(Debug, Clone, FromRow)]
pub struct NutrientHistoryRow {
    pub meal_id: Uuid,
    pub nutrient_name: String,
    pub amount: Option<f64>,
    pub unit: Option<String>,
    pub created_at: OffsetDateTime,
}

impl NutrientHistoryRow {
    pub fn into_local(self, offset: UtcOffset) -> NutrientRow {
        NutrientRow {
            nutrient_name: self.nutrient_name,
            amount: self.amount.unwrap_or(0.0),
            unit: self.unit.unwrap_or_default(),
            recorded_at: to_local(self.created_at, offset),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{datetime, offset};

    #[test]
    fn null_amount_reads_as_zero() {
        let row = NutrientHistoryRow {
            meal_id: Uuid::new_v4(),
            nutrient_name: "Iron".into(),
            amount: None,
            unit: None,
            created_at: datetime!(2024-03-01 03:00 UTC),
        };
        let local = row.into_local(offset!(+9));
        assert_eq!(local.amount, 0.0);
        assert_eq!(local.unit, "");
        assert_eq!(local.recorded_at, datetime!(2024-03-01 12:00));
    }

    #[test]
    fn stored_row_becomes_reading() {
        let reading: NutrientReading = MealNutrientRow {
            nutrient_name: "Protein".into(),
            amount: Some(21.0),
            unit: Some("g".into()),
            percent_dv: Some(42.0),
        }
        .into();
        assert_eq!(reading, NutrientReading::new("Protein", 21.0, "g").with_percent_dv(42.0));
    }
}
