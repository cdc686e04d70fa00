use lazy_static::lazy_static;
use regex::Regex;

use super::parser::UNTITLED_MEAL;

lazy_static! {
    static ref NUMBERED_LABEL_RE: Regex = Regex::new(r"(?i)^\d+\.\s*Meal Title:\s*").unwrap();
    static ref LABEL_RE: Regex = Regex::new(r"(?i)^Meal Title:\s*").unwrap();
}

/// Clean a stored or freshly parsed title for display.
///
/// Emphasis markers go first so that `**1. Meal Title:** X` is recognised,
/// and label prefixes are stripped until none remain. Both steps make the
/// function idempotent.
pub fn sanitize_title(raw: &str) -> String {
    let mut cleaned = raw.replace('*', "");
    cleaned = cleaned.trim().to_string();

    loop {
        let stripped = NUMBERED_LABEL_RE
            .find(&cleaned)
            .or_else(|| LABEL_RE.find(&cleaned))
            .map(|m| cleaned[m.end()..].trim_start().to_string());
        match stripped {
            Some(rest) => cleaned = rest,
            None => break,
        }
    }

    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        UNTITLED_MEAL.to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_numbered_and_plain_labels() {
        assert_eq!(sanitize_title("1. Meal Title: Greek Salad"), "Greek Salad");
        assert_eq!(sanitize_title("12.Meal Title:Burrito"), "Burrito");
        assert_eq!(sanitize_title("meal title: Sushi Platter"), "Sushi Platter");
        assert_eq!(sanitize_title("  MEAL TITLE:   Oatmeal "), "Oatmeal");
    }

    #[test]
    fn removes_emphasis_anywhere() {
        assert_eq!(sanitize_title("**Spicy** *Tofu* Stir-fry"), "Spicy Tofu Stir-fry");
        assert_eq!(sanitize_title("**1. Meal Title:** Lentil Soup"), "Lentil Soup");
    }

    #[test]
    fn empty_results_become_untitled() {
        assert_eq!(sanitize_title(""), UNTITLED_MEAL);
        assert_eq!(sanitize_title("   "), UNTITLED_MEAL);
        assert_eq!(sanitize_title("Meal Title:"), UNTITLED_MEAL);
        assert_eq!(sanitize_title("****"), UNTITLED_MEAL);
    }

    #[test]
    fn leaves_plain_titles_alone() {
        assert_eq!(sanitize_title("Chicken Tikka Masala"), "Chicken Tikka Masala");
        assert_eq!(sanitize_title("2 Eggs. Meal Title: not a prefix"), "2 Eggs. Meal Title: not a prefix");
    }

    #[test]
    fn idempotent() {
        let samples = [
            "",
            "Untitled Meal",
            "1. Meal Title: Grilled Chicken Salad",
            "Meal Title: Meal Title: Meal Title: Nested",
            "*Meal Title: Starred",
            "3. meal title: 4. Meal Title: Double",
            " ** ",
            "Fish & Chips *with* peas",
            "Meal Title:    ",
        ];
        for s in samples {
            let once = sanitize_title(s);
            assert_eq!(sanitize_title(&once), once, "input {:?}", s);
        }
    }
}
