use lazy_static::lazy_static;

use super::catalog::CATALOG;

const PROMPT_HEAD: &str = r#"You are a world-class food scientist AI. Your task is to perform a comprehensive nutritional analysis of the meal in the image. Your response MUST strictly follow this structure:

1.  **Meal Title:** A descriptive title. Format: `Meal Title: [Your Title]`

2.  Provide a brief analysis with the following content (do not include section headers):
    - **Advantages:** 2-3 health benefits of this food
    - **Disadvantages:** 1-2 potential concerns or limitations

    ***Fun Fact:*** One interesting fact about this food (format this exactly as shown with triple asterisks for bold italic)

3.  Provide the nutritional data as a valid JSON array of objects, enclosed in triple backticks (do not include any text before the JSON).
    **CRITICAL RULE:** You MUST provide a value for EVERY nutrient in the list below. If the meal does not contain a nutrient or if data is unavailable, you MUST include it with an `amount` of 0. Do not omit any nutrient from this list.
"#;

fn render_prompt() -> String {
    let rows: Vec<String> = CATALOG
        .iter()
        .map(|e| {
            if e.has_percent_dv {
                format!(
                    r#"      {{"nutrient": "{}", "amount": ..., "unit": "{}", "percent_dv": ...}}"#,
                    e.name, e.unit
                )
            } else {
                format!(
                    r#"      {{"nutrient": "{}", "amount": ..., "unit": "{}"}}"#,
                    e.name, e.unit
                )
            }
        })
        .collect();

    format!(
        "{head}\n    ```json\n    [\n{rows}\n    ]\n    ```\n",
        head = PROMPT_HEAD,
        rows = rows.join(",\n")
    )
}

lazy_static! {
    static ref ANALYSIS_PROMPT: String = render_prompt();
}

/// Instruction text sent alongside every meal image.
pub fn analysis_prompt() -> &'static str {
    ANALYSIS_PROMPT.as_str()
}
