use self::NutrientKind::{Component, Energy, Macronutrient, Mineral, Vitamin};

/// Broad grouping of a catalog entry, used by the dashboard aggregations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NutrientKind {
    Energy,
    Macronutrient,
    Component,
    Mineral,
    Vitamin,
}

/// One row of the canonical nutrient catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub unit: &'static str,
    pub has_percent_dv: bool,
    pub kind: NutrientKind,
}

const fn entry(
    name: &'static str,
    unit: &'static str,
    has_percent_dv: bool,
    kind: NutrientKind,
) -> CatalogEntry {
    CatalogEntry {
        name,
        unit,
        has_percent_dv,
        kind,
    }
}

/// Fixed, ordered nutrient catalog. The prompt, the parser's normalization and
/// the aggregator's unit lookups all read from this table; changing it is a
/// breaking schema change.
pub const CATALOG: [CatalogEntry; 33] = [
    entry("Calories", "kcal", false, Energy),
    entry("Protein", "g", true, Macronutrient),
    entry("Total Fat", "g", true, Macronutrient),
    entry("Saturated Fat", "g", true, Component),
    entry("Trans Fat", "g", false, Component),
    entry("Polyunsaturated Fat", "g", false, Component),
    entry("Monounsaturated Fat", "g", false, Component),
    entry("Cholesterol", "mg", true, Component),
    entry("Carbohydrates", "g", true, Macronutrient),
    entry("Dietary Fiber", "g", true, Component),
    entry("Total Sugars", "g", false, Component),
    entry("Added Sugars", "g", true, Component),
    entry("Sodium", "mg", true, Mineral),
    entry("Potassium", "mg", true, Mineral),
    entry("Calcium", "mg", true, Mineral),
    entry("Iron", "mg", true, Mineral),
    entry("Magnesium", "mg", true, Mineral),
    entry("Phosphorus", "mg", true, Mineral),
    entry("Zinc", "mg", true, Mineral),
    entry("Copper", "mg", true, Mineral),
    entry("Manganese", "mg", true, Mineral),
    entry("Selenium", "mcg", true, Mineral),
    entry("Vitamin A", "mcg", true, Vitamin),
    entry("Vitamin C", "mg", true, Vitamin),
    entry("Vitamin D", "mcg", true, Vitamin),
    entry("Vitamin E", "mg", true, Vitamin),
    entry("Vitamin K", "mcg", true, Vitamin),
    entry("Thiamin (B1)", "mg", true, Vitamin),
    entry("Riboflavin (B2)", "mg", true, Vitamin),
    entry("Niacin (B3)", "mg", true, Vitamin),
    entry("Vitamin B6", "mg", true, Vitamin),
    entry("Folate (B9)", "mcg", true, Vitamin),
    entry("Vitamin B12", "mcg", true, Vitamin),
];

pub const CALORIES: &str = "Calories";
pub const PROTEIN: &str = "Protein";
pub const TOTAL_FAT: &str = "Total Fat";
pub const CARBOHYDRATES: &str = "Carbohydrates";

/// Nutrients summarised as headline totals on the dashboard.
pub const KEY_NUTRIENTS: [&str; 6] = [
    CALORIES,
    PROTEIN,
    TOTAL_FAT,
    CARBOHYDRATES,
    "Dietary Fiber",
    "Sodium",
];

/// Case-insensitive lookup, ignoring surrounding whitespace.
pub fn lookup(name: &str) -> Option<&'static CatalogEntry> {
    let name = name.trim();
    CATALOG.iter().find(|e| e.name.eq_ignore_ascii_case(name))
}

pub fn unit_for(name: &str) -> Option<&'static str> {
    lookup(name).map(|e| e.unit)
}

pub fn of_kind(kind: NutrientKind) -> impl Iterator<Item = &'static CatalogEntry> {
    CATALOG.iter().filter(move |e| e.kind == kind)
}

pub fn vitamins() -> impl Iterator<Item = &'static CatalogEntry> {
    of_kind(Vitamin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique() {
        let names: HashSet<_> = CATALOG.iter().map(|e| e.name).collect();
        assert_eq!(names.len(), CATALOG.len());
    }

    #[test]
    fn eleven_vitamins_with_expected_units() {
        let vits: Vec<_> = vitamins().collect();
        assert_eq!(vits.len(), 11);
        for v in vits {
            let expected = match v.name {
                "Vitamin A" | "Vitamin D" | "Vitamin K" | "Folate (B9)" | "Vitamin B12" => "mcg",
                _ => "mg",
            };
            assert_eq!(v.unit, expected, "{}", v.name);
        }
    }

    #[test]
    fn macros_are_protein_fat_carbs() {
        let names: Vec<_> = of_kind(NutrientKind::Macronutrient).map(|e| e.name).collect();
        assert_eq!(names, vec![PROTEIN, TOTAL_FAT, CARBOHYDRATES]);
    }

    #[test]
    fn lookup_ignores_case_and_padding() {
        assert_eq!(lookup("  sodium ").map(|e| e.name), Some("Sodium"));
        assert_eq!(unit_for("VITAMIN b12"), Some("mcg"));
        assert!(lookup("Unobtainium").is_none());
    }

    #[test]
    fn calories_and_trans_fat_carry_no_percent_dv() {
        assert!(!lookup(CALORIES).unwrap().has_percent_dv);
        assert!(!lookup("Trans Fat").unwrap().has_percent_dv);
        assert!(lookup(PROTEIN).unwrap().has_percent_dv);
    }
}
