use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, warn};

use super::model::{MealAnalysis, NutrientReading};

pub const UNTITLED_MEAL: &str = "Untitled Meal";

lazy_static! {
    static ref TITLE_LINE_RE: Regex = Regex::new(r"(?im)^.*?Meal Title:(.*)$").unwrap();
    static ref JSON_FENCE_RE: Regex =
        Regex::new(r"(?is)```json[ \t]*\r?\n(.*?)\r?\n[ \t]*```").unwrap();
}

#[derive(Debug, thiserror::Error)]
pub enum NutrientBlockError {
    #[error("no fenced json block in response")]
    Missing,
    #[error("fenced json block is not a nutrient array: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Turn a raw model response into a [`MealAnalysis`]. Never fails: every
/// field has a fallback.
pub fn parse_response(raw: &str) -> MealAnalysis {
    let (title, title_line) = match labelled_title(raw) {
        Some((title, line)) => (title, Some(line)),
        None => {
            debug!("no `Meal Title:` label, falling back to first line");
            (first_line_title(raw), None)
        }
    };

    let nutrients = match extract_nutrients(raw) {
        Ok(nutrients) => nutrients,
        Err(NutrientBlockError::Missing) => {
            debug!("response has no nutrient block");
            Vec::new()
        }
        Err(e @ NutrientBlockError::Malformed(_)) => {
            warn!(error = %e, "discarding malformed nutrient block");
            Vec::new()
        }
    };

    MealAnalysis {
        title,
        full_text: raw.to_string(),
        nutrients,
        title_line,
    }
}

/// First `Meal Title:` label in the text: (trimmed remainder, whole line).
fn labelled_title(raw: &str) -> Option<(String, String)> {
    let caps = TITLE_LINE_RE.captures(raw)?;
    let line = caps.get(0)?.as_str().to_string();
    let title = caps.get(1)?.as_str().trim().to_string();
    Some((title, line))
}

fn first_line_title(raw: &str) -> String {
    raw.lines()
        .find(|l| !l.trim().is_empty())
        .map(|l| l.trim().replace("**", ""))
        .unwrap_or_else(|| UNTITLED_MEAL.to_string())
}

/// Deserialize the first fenced json block. Later blocks are ignored, which
/// tolerates the model echoing the nutrient template back a second time.
///
/// Only invalid JSON or a non-array is an error. Elements that cannot be read
/// as a reading (no name, not an object) are skipped one by one.
pub fn extract_nutrients(raw: &str) -> Result<Vec<NutrientReading>, NutrientBlockError> {
    let body = JSON_FENCE_RE
        .captures(raw)
        .and_then(|c| c.get(1))
        .ok_or(NutrientBlockError::Missing)?;
    let elements: Vec<serde_json::Value> = serde_json::from_str(body.as_str())?;
    let readings = elements
        .into_iter()
        .enumerate()
        .filter_map(|(idx, element)| {
            serde_json::from_value::<NutrientReading>(element)
                .map_err(|e| debug!(idx, error = %e, "skipping unreadable nutrient element"))
                .ok()
        })
        .collect();
    Ok(readings)
}
