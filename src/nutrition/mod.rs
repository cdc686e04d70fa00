//! Model-output parsing, the canonical nutrient catalog and dashboard
//! aggregations. Nothing in here touches the network or the database.

pub mod aggregate;
pub mod catalog;
pub mod model;
pub mod parser;
pub mod prompt;
pub mod title;

pub use model::{normalize_readings, MealAnalysis, NutrientReading};
pub use parser::parse_response;
pub use prompt::analysis_prompt;
pub use title::sanitize_title;
