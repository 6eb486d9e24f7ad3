//! Weight Tracker WASM Module
//!
//! Browser bindings for the display derivation engine. Structured values
//! cross the boundary as JSON strings.

use chrono::NaiveDate;
use wasm_bindgen::prelude::*;
use weight_tracker_shared::bmi::{self, BMI_GRADIENT};
use weight_tracker_shared::dashboard::{decode_entries, decode_profile, derive_view};
use weight_tracker_shared::progress;
use weight_tracker_shared::validation::parse_weight_input;
use weight_tracker_shared::PeriodSelector;

fn parse_today(today: &str) -> Result<NaiveDate, JsValue> {
    NaiveDate::parse_from_str(today.trim(), "%Y-%m-%d")
        .map_err(|_| JsValue::from_str("today must be YYYY-MM-DD"))
}

/// Read a period either as a name (`"month"`) or as a tagged JSON object
fn parse_period(period: &str) -> PeriodSelector {
    serde_json::from_str(period).unwrap_or_else(|_| period.parse().unwrap_or_default())
}

/// Calculate BMI from weight (kg) and height (cm)
#[wasm_bindgen]
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    bmi::calculate_bmi(weight_kg, height_cm)
}

/// Marker position on the BMI scale (0..100)
#[wasm_bindgen]
pub fn bmi_position(bmi: f64) -> f64 {
    bmi::scale_position(bmi)
}

/// Hex colour of the BMI gradient at a scale position
#[wasm_bindgen]
pub fn bmi_color(position: f64) -> String {
    bmi::gradient_color(&BMI_GRADIENT, position).to_hex()
}

/// Full BMI report as JSON, `"null"` when it cannot be computed
#[wasm_bindgen]
pub fn classify_bmi(weight_kg: f64, height_cm: f64) -> Result<String, JsValue> {
    serde_json::to_string(&bmi::classify(weight_kg, height_cm))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen]
pub fn weeks_to_target(current_kg: f64, target_kg: f64) -> u32 {
    progress::weeks_to_target(current_kg, target_kg)
}

/// Parse a weight typed into a form, accepting a decimal comma
#[wasm_bindgen]
pub fn parse_weight(input: &str) -> Result<f64, JsValue> {
    parse_weight_input(input).map_err(|e| JsValue::from_str(&e))
}

/// Derive the whole dashboard view
///
/// `entries` and `history` are entry arrays, `profile` a profile object.
/// Unreadable payloads degrade to empty data like the HTTP client does.
#[wasm_bindgen]
pub fn derive_dashboard(
    entries: &str,
    history: &str,
    profile: &str,
    period: &str,
    today: &str,
) -> Result<String, JsValue> {
    let today = parse_today(today)?;
    let view = derive_view(
        &decode_entries(entries),
        &decode_entries(history),
        &decode_profile(profile),
        &parse_period(period),
        today,
    );
    serde_json::to_string(&view).map_err(|e| JsValue::from_str(&e.to_string()))
}
