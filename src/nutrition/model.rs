use serde::{de::IgnoredAny, Deserialize, Deserializer, Serialize};
use tracing::debug;

use super::catalog::{self, CATALOG};

/// One nutrient line as reported by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutrientReading {
    #[serde(rename = "nutrient", alias = "nutrient_name", alias = "name")]
    pub nutrient_name: String,
    #[serde(default, deserialize_with = "amount_or_zero")]
    pub amount: f64,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub unit: String,
    #[serde(
        default,
        deserialize_with = "optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub percent_dv: Option<f64>,
}

impl NutrientReading {
    pub fn new(name: impl Into<String>, amount: f64, unit: impl Into<String>) -> Self {
        Self {
            nutrient_name: name.into(),
            amount,
            unit: unit.into(),
            percent_dv: None,
        }
    }

    /// The same reading under its catalog spelling, so stored names match
    /// the aggregator's exact lookups. Names outside the catalog are kept
    /// as written, trimmed. An empty unit takes the catalog unit.
    pub fn canonical(&self) -> Self {
        let name = self.nutrient_name.trim();
        let entry = catalog::lookup(name);
        let unit = match (self.unit.trim(), entry) {
            ("", Some(e)) => e.unit.to_string(),
            (unit, _) => unit.to_string(),
        };
        Self {
            nutrient_name: entry.map_or(name, |e| e.name).to_string(),
            amount: self.amount,
            unit,
            percent_dv: self.percent_dv,
        }
    }

    #[cfg(test)]
    pub fn with_percent_dv(mut self, percent_dv: f64) -> Self {
        self.percent_dv = Some(percent_dv);
        self
    }
}

/// Result of parsing one model response. Never mutated after parsing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealAnalysis {
    /// Title as extracted, before display sanitization.
    pub title: String,
    /// The raw model response, verbatim.
    pub full_text: String,
    pub nutrients: Vec<NutrientReading>,
    #[serde(skip)]
    pub(crate) title_line: Option<String>,
}

impl MealAnalysis {
    /// Prose between the title and the nutrient block, with the labelled
    /// title line removed. May be empty.
    pub fn advisory_text(&self) -> String {
        let before_fence = self
            .full_text
            .split("```json")
            .next()
            .unwrap_or_default();
        let without_title = match &self.title_line {
            Some(line) => before_fence.replacen(line.as_str(), "", 1),
            None => before_fence.to_string(),
        };
        without_title.trim().to_string()
    }

    pub fn has_nutrients(&self) -> bool {
        !self.nutrients.is_empty()
    }
}

/// Project arbitrary readings onto the catalog: one entry per catalog nutrient,
/// in catalog order, zero-filled where the model left a nutrient out.
pub fn normalize_readings(readings: &[NutrientReading]) -> Vec<NutrientReading> {
    let table: Vec<NutrientReading> = CATALOG
        .iter()
        .map(|entry| {
            let found = readings
                .iter()
                .find(|r| r.nutrient_name.trim().eq_ignore_ascii_case(entry.name));
            match found {
                Some(r) => NutrientReading {
                    nutrient_name: entry.name.to_string(),
                    amount: r.amount,
                    unit: if r.unit.trim().is_empty() {
                        entry.unit.to_string()
                    } else {
                        r.unit.trim().to_string()
                    },
                    percent_dv: if entry.has_percent_dv { r.percent_dv } else { None },
                },
                None => NutrientReading::new(entry.name, 0.0, entry.unit),
            }
        })
        .collect();

    let dropped = readings
        .iter()
        .filter(|r| catalog::lookup(&r.nutrient_name).is_none())
        .count();
    if dropped > 0 {
        debug!(dropped, "readings outside the nutrient catalog ignored");
    }
    table
}

/// Any JSON scalar or structure the model might put in a numeric or text
/// slot. Anything that is not a number or a string is treated as absent.
#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

impl Lenient {
    /// Finite numbers only; `"NaN"`, `"inf"` and overflowing literals are
    /// absent.
    fn as_number(&self) -> Option<f64> {
        let n = match self {
            Lenient::Number(n) => Some(*n),
            Lenient::Text(s) => s.trim().parse::<f64>().ok(),
            Lenient::Other(_) => None,
        };
        n.filter(|n| n.is_finite())
    }

    fn into_text(self) -> String {
        match self {
            Lenient::Text(s) => s,
            Lenient::Number(n) => n.to_string(),
            Lenient::Other(_) => String::new(),
        }
    }
}

fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Lenient>::deserialize(deserializer)?;
    Ok(raw.and_then(|v| v.as_number()))
}

fn amount_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_number(deserializer)?.unwrap_or(0.0))
}

fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Lenient>::deserialize(deserializer)?
        .map(Lenient::into_text)
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reading_accepts_null_and_string_numbers() {
        let json = r#"[
            {"nutrient": "Protein", "amount": "12.5", "unit": "g", "percent_dv": null},
            {"nutrient": "Calories", "amount": null, "unit": null},
            {"nutrient": "Sodium", "amount": 200}
        ]"#;
        let readings: Vec<NutrientReading> = serde_json::from_str(json).unwrap();
        assert_eq!(readings[0].amount, 12.5);
        assert_eq!(readings[0].percent_dv, None);
        assert_eq!(readings[1].amount, 0.0);
        assert_eq!(readings[1].unit, "");
        assert_eq!(readings[2].unit, "");
    }

    #[test]
    fn non_finite_numbers_are_absent() {
        let json = r#"[
            {"nutrient": "Calories", "amount": "NaN", "percent_dv": "inf"},
            {"nutrient": "Protein", "amount": "-inf"},
            {"nutrient": "Sodium", "amount": "1e400"}
        ]"#;
        let readings: Vec<NutrientReading> = serde_json::from_str(json).unwrap();
        assert!(readings.iter().all(|r| r.amount == 0.0));
        assert_eq!(readings[0].percent_dv, None);
    }

    #[test]
    fn odd_field_types_fall_back_per_field() {
        let json = r#"{"nutrient": "Iron", "amount": true, "unit": 5, "percent_dv": {"x": 1}}"#;
        let r: NutrientReading = serde_json::from_str(json).unwrap();
        assert_eq!(r.amount, 0.0);
        assert_eq!(r.unit, "5");
        assert_eq!(r.percent_dv, None);
    }

    #[test]
    fn canonical_uses_catalog_spelling() {
        let r = NutrientReading::new("  VITAMIN c ", 60.0, "").canonical();
        assert_eq!(r.nutrient_name, "Vitamin C");
        assert_eq!(r.unit, "mg");

        let r = NutrientReading::new(" Caffeine ", 80.0, "milligrams per serving").canonical();
        assert_eq!(r.nutrient_name, "Caffeine");
        assert_eq!(r.unit, "milligrams per serving");
    }

    #[test]
    fn reading_without_name_is_rejected() {
        let res = serde_json::from_str::<Vec<NutrientReading>>(r#"[{"amount": 1}]"#);
        assert!(res.is_err());
    }

    #[test]
    fn serializes_with_nutrient_key() {
        let json = serde_json::to_string(&NutrientReading::new("Iron", 2.0, "mg")).unwrap();
        assert!(json.contains(r#""nutrient":"Iron""#));
        assert!(!json.contains("percent_dv"));
    }

    #[test]
    fn normalize_fills_whole_catalog() {
        let readings = vec![
            NutrientReading::new("calories", 420.0, "").with_percent_dv(21.0),
            NutrientReading::new("Protein", 30.0, "g").with_percent_dv(60.0),
            NutrientReading::new("Protein", 99.0, "g"),
            NutrientReading::new("Caffeine", 80.0, "mg"),
        ];
        let table = normalize_readings(&readings);

        assert_eq!(table.len(), CATALOG.len());
        for (row, entry) in table.iter().zip(CATALOG.iter()) {
            assert_eq!(row.nutrient_name, entry.name);
        }

        let calories = &table[0];
        assert_eq!(calories.amount, 420.0);
        assert_eq!(calories.unit, "kcal");
        assert_eq!(calories.percent_dv, None);

        let protein = &table[1];
        assert_eq!(protein.amount, 30.0);
        assert_eq!(protein.percent_dv, Some(60.0));

        let b12 = table.last().unwrap();
        assert_eq!(b12.amount, 0.0);
        assert_eq!(b12.unit, "mcg");
    }
}
