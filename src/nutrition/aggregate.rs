//! Dashboard aggregations over persisted nutrient rows.
//!
//! All functions are pure. An empty row set always produces an empty result
//! (or `None`), never an error.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Serialize;
use time::{Date, PrimitiveDateTime};

use super::catalog::{self, CALORIES, CARBOHYDRATES, PROTEIN, TOTAL_FAT};

/// One stored nutrient reading joined with its meal's timestamp. The
/// timestamp is already expressed in the reporting time zone.
#[derive(Debug, Clone, PartialEq)]
pub struct NutrientRow {
    pub nutrient_name: String,
    pub amount: f64,
    pub unit: String,
    pub recorded_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Macro {
    Protein,
    Carbohydrates,
    Fat,
}

impl Macro {
    pub fn nutrient_name(self) -> &'static str {
        match self {
            Macro::Protein => PROTEIN,
            Macro::Carbohydrates => CARBOHYDRATES,
            Macro::Fat => TOTAL_FAT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacroSlice {
    #[serde(rename = "macro")]
    pub macro_kind: Macro,
    pub grams: f64,
    pub calories: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacroDistribution {
    pub total_calories: f64,
    pub total_grams: f64,
    pub slices: Vec<MacroSlice>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VitaminTotal {
    pub nutrient_name: String,
    pub short_name: String,
    pub amount: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutrientTotal {
    pub nutrient_name: String,
    pub amount: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyTotal {
    pub date: Date,
    pub nutrient_name: String,
    pub amount: f64,
}

fn sum_for(rows: &[NutrientRow], name: &str) -> Option<f64> {
    let mut matched = rows.iter().filter(|r| r.nutrient_name == name).peekable();
    matched.peek()?;
    Some(matched.map(|r| r.amount).sum())
}

/// Apportion the reported calorie total across protein, carbohydrates and
/// fat by their gram shares. The stored calorie total is taken as ground
/// truth; no kcal-per-gram factors are applied.
///
/// Returns `None` unless both the macro gram total and the calorie total are
/// positive.
pub fn macro_distribution(rows: &[NutrientRow]) -> Option<MacroDistribution> {
    let total_calories = sum_for(rows, CALORIES).unwrap_or(0.0);

    let grams: Vec<(Macro, f64)> = [Macro::Protein, Macro::Carbohydrates, Macro::Fat]
        .into_iter()
        .map(|m| (m, sum_for(rows, m.nutrient_name()).unwrap_or(0.0)))
        .collect();
    let total_grams: f64 = grams.iter().map(|(_, g)| g).sum();

    if total_grams <= 0.0 || total_calories <= 0.0 {
        return None;
    }

    let slices = grams
        .into_iter()
        .map(|(macro_kind, g)| MacroSlice {
            macro_kind,
            grams: g,
            calories: total_calories * (g / total_grams),
        })
        .collect();

    Some(MacroDistribution {
        total_calories,
        total_grams,
        slices,
    })
}

/// Summed amount per vitamin, in catalog order, skipping vitamins with no
/// rows or a non-positive total.
pub fn vitamin_distribution(rows: &[NutrientRow]) -> Vec<VitaminTotal> {
    catalog::vitamins()
        .filter_map(|v| {
            let amount = sum_for(rows, v.name)?;
            if amount <= 0.0 {
                return None;
            }
            Some(VitaminTotal {
                nutrient_name: v.name.to_string(),
                short_name: short_name(v.name).to_string(),
                amount,
                unit: v.unit.to_string(),
            })
        })
        .collect()
}

/// `"Thiamin (B1)"` -> `"Thiamin"`.
fn short_name(name: &str) -> &str {
    match name.find(" (") {
        Some(idx) => &name[..idx],
        None => name,
    }
}

/// Totals for the requested names, in the caller's order. Names with no rows
/// are left out rather than reported as zero.
pub fn keyed_totals<S: AsRef<str>>(rows: &[NutrientRow], names: &[S]) -> Vec<NutrientTotal> {
    let mut seen = HashSet::new();
    names
        .iter()
        .map(|n| n.as_ref())
        .filter(|n| seen.insert(*n))
        .filter_map(|name| {
            let amount = sum_for(rows, name)?;
            let unit = catalog::unit_for(name)
                .map(str::to_string)
                .or_else(|| {
                    rows.iter()
                        .find(|r| r.nutrient_name == name)
                        .map(|r| r.unit.clone())
                })
                .unwrap_or_default();
            Some(NutrientTotal {
                nutrient_name: name.to_string(),
                amount,
                unit,
            })
        })
        .collect()
}

/// Per-day sums for the requested nutrients, ordered by date then name.
pub fn daily_totals<S: AsRef<str>>(rows: &[NutrientRow], names: &[S]) -> Vec<DailyTotal> {
    let wanted: HashSet<&str> = names.iter().map(|n| n.as_ref()).collect();
    let mut buckets: BTreeMap<(Date, &str), f64> = BTreeMap::new();
    for r in rows.iter().filter(|r| wanted.contains(r.nutrient_name.as_str())) {
        *buckets
            .entry((r.recorded_at.date(), r.nutrient_name.as_str()))
            .or_insert(0.0) += r.amount;
    }
    buckets
        .into_iter()
        .map(|((date, name), amount)| DailyTotal {
            date,
            nutrient_name: name.to_string(),
            amount,
        })
        .collect()
}

/// Distinct nutrient names present in the rows, sorted.
pub fn available_nutrients(rows: &[NutrientRow]) -> Vec<String> {
    rows.iter()
        .map(|r| r.nutrient_name.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
