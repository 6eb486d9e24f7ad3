//! Input validation functions
//!
//! This module provides validation utilities for user input.
//! Request bodies additionally use the `validator` crate's derive macros.

use chrono::NaiveDate;
use std::sync::OnceLock;

/// Largest accepted body weight (kg)
pub const MAX_WEIGHT_KG: f64 = 500.0;

/// Largest accepted clothes weight (kg)
pub const MAX_CLOTHES_WEIGHT_KG: f64 = 20.0;

/// Largest accepted avatar upload
pub const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;

/// Validate weight value (in kg)
pub fn validate_weight(weight_kg: f64) -> Result<(), String> {
    if weight_kg.is_nan() || weight_kg.is_infinite() {
        return Err("Weight must be a valid number".to_string());
    }
    if weight_kg <= 0.0 {
        return Err("Weight must be positive".to_string());
    }
    if weight_kg > MAX_WEIGHT_KG {
        return Err(format!("Weight must be at most {} kg", MAX_WEIGHT_KG));
    }
    Ok(())
}

/// Parse a weight typed into the entry form
///
/// Accepts either a dot or a comma as the decimal separator.
pub fn parse_weight_input(input: &str) -> Result<f64, String> {
    let normalized = input.trim().replace(',', ".");
    if normalized.is_empty() {
        return Err("Weight is required".to_string());
    }
    let weight: f64 = normalized
        .parse()
        .map_err(|_| "Weight must be a number".to_string())?;
    validate_weight(weight)?;
    Ok(weight)
}

/// Parse a date typed into the entry form (`YYYY-MM-DD`)
pub fn parse_date_input(input: &str) -> Result<NaiveDate, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("Date is required".to_string());
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| "Invalid date".to_string())
}

/// Validate height value (in cm)
/// Valid range: 50-300 cm (covers infants to tallest recorded humans)
pub fn validate_height_cm(height_cm: f64) -> Result<(), String> {
    if height_cm.is_nan() || height_cm.is_infinite() {
        return Err("Height must be a valid number".to_string());
    }
    if height_cm < 50.0 {
        return Err("Height must be at least 50 cm".to_string());
    }
    if height_cm > 300.0 {
        return Err("Height must be at most 300 cm".to_string());
    }
    Ok(())
}

/// Validate clothes weight (in kg), zero disables the adjustment
pub fn validate_clothes_weight(weight_kg: f64) -> Result<(), String> {
    if weight_kg.is_nan() || weight_kg.is_infinite() {
        return Err("Clothes weight must be a valid number".to_string());
    }
    if weight_kg < 0.0 {
        return Err("Clothes weight cannot be negative".to_string());
    }
    if weight_kg > MAX_CLOTHES_WEIGHT_KG {
        return Err(format!("Clothes weight must be at most {} kg", MAX_CLOTHES_WEIGHT_KG));
    }
    Ok(())
}

/// Validate birth date
/// Must not be in the future, and age must be between 1 and 150 years
pub fn validate_birth_date(birth_date: NaiveDate, today: NaiveDate) -> Result<(), String> {
    if birth_date > today {
        return Err("Birth date cannot be in the future".to_string());
    }

    match today.years_since(birth_date) {
        Some(age) if age < 1 => Err("Age must be at least 1 year".to_string()),
        Some(age) if age > 150 => Err("Age cannot exceed 150 years".to_string()),
        None => Err("Invalid birth date".to_string()),
        _ => Ok(()),
    }
}

fn image_type_pattern() -> &'static regex_lite::Regex {
    static PATTERN: OnceLock<regex_lite::Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        regex_lite::Regex::new(r"^image/(jpeg|jpg|png|gif)$").expect("image type pattern is valid")
    })
}

fn image_extension_pattern() -> &'static regex_lite::Regex {
    static PATTERN: OnceLock<regex_lite::Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        regex_lite::Regex::new(r"^(jpeg|jpg|png|gif)$").expect("image extension pattern is valid")
    })
}

/// Validate an avatar upload by content type and file name
///
/// Raster images need both a matching MIME type and extension; SVG is
/// accepted by MIME type alone.
pub fn validate_avatar_file(file_name: &str, content_type: &str, size: usize) -> Result<(), String> {
    if size == 0 {
        return Err("Please upload a file".to_string());
    }
    if size > MAX_AVATAR_BYTES {
        return Err("File is larger than 5 MB".to_string());
    }
    if content_type == "image/svg+xml" {
        return Ok(());
    }

    let extension = std::path::Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    if image_type_pattern().is_match(content_type) && image_extension_pattern().is_match(&extension) {
        Ok(())
    } else {
        Err("File upload only supports the following filetypes - jpeg, jpg, png, gif, svg".to_string())
    }
}

// ============================================================================
// User-Friendly Field Labels
// ============================================================================

/// Map technical field names to user-friendly display labels
pub fn get_field_display_label(field_name: &str) -> &str {
    match field_name {
        "date" => "Date",
        "weight" => "Weight",
        "height" | "height_cm" => "Height",
        "birth_date" => "Birth Date",
        "gender" => "Gender",
        "muscle_category" => "Muscle",
        "target_weight_kg" => "Target Weight",
        "clothes_weight_kg" => "Clothes Weight",
        "avatar" => "Avatar",
        _ => field_name,
    }
}

/// Validation error with field context
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub display_label: String,
}

impl ValidationError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
            display_label: get_field_display_label(field).to_string(),
        }
    }

    /// Format as user-friendly error message
    pub fn user_message(&self) -> String {
        format!("{}: {}", self.display_label, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_validate_weight() {
        assert!(validate_weight(70.0).is_ok());
        assert!(validate_weight(500.0).is_ok());
        assert!(validate_weight(0.0).is_err());
        assert!(validate_weight(-1.0).is_err());
        assert!(validate_weight(600.0).is_err());
        assert!(validate_weight(f64::NAN).is_err());
        assert!(validate_weight(f64::INFINITY).is_err());
    }

    #[test]
    fn test_parse_weight_input() {
        assert_eq!(parse_weight_input("80.5"), Ok(80.5));
        assert_eq!(parse_weight_input(" 80,5 "), Ok(80.5));
        assert!(parse_weight_input("").is_err());
        assert!(parse_weight_input("heavy").is_err());
        assert!(parse_weight_input("-3").is_err());
    }

    #[test]
    fn test_parse_date_input() {
        assert_eq!(parse_date_input("2024-03-15"), Ok(date(2024, 3, 15)));
        assert!(parse_date_input("").is_err());
        assert!(parse_date_input("15.03.2024").is_err());
        assert!(parse_date_input("2024-02-30").is_err());
    }

    #[test]
    fn test_validate_height_cm() {
        assert!(validate_height_cm(170.0).is_ok());
        assert!(validate_height_cm(50.0).is_ok());
        assert!(validate_height_cm(300.0).is_ok());
        assert!(validate_height_cm(49.9).is_err());
        assert!(validate_height_cm(300.1).is_err());
        assert!(validate_height_cm(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_clothes_weight() {
        assert!(validate_clothes_weight(0.0).is_ok());
        assert!(validate_clothes_weight(1.2).is_ok());
        assert!(validate_clothes_weight(-0.5).is_err());
        assert!(validate_clothes_weight(25.0).is_err());
    }

    #[test]
    fn test_validate_birth_date() {
        let today = date(2024, 6, 1);
        assert!(validate_birth_date(date(1990, 5, 20), today).is_ok());
        assert!(validate_birth_date(date(2024, 6, 2), today).is_err());
        assert!(validate_birth_date(date(2024, 1, 1), today).is_err());
        assert!(validate_birth_date(date(1800, 1, 1), today).is_err());
    }

    #[test]
    fn test_validate_avatar_file() {
        assert!(validate_avatar_file("me.png", "image/png", 1024).is_ok());
        assert!(validate_avatar_file("me.JPG", "image/jpeg", 1024).is_ok());
        assert!(validate_avatar_file("me.svg", "image/svg+xml", 1024).is_ok());
        assert!(validate_avatar_file("me.exe", "application/octet-stream", 1024).is_err());
        assert!(validate_avatar_file("me.png", "text/plain", 1024).is_err());
        assert!(validate_avatar_file("me.png", "image/png", 0).is_err());
        assert!(validate_avatar_file("me.png", "image/png", MAX_AVATAR_BYTES + 1).is_err());
    }

    #[test]
    fn test_avatar_extension_must_match_exactly() {
        assert!(validate_avatar_file("me.pngx", "image/png", 1024).is_err());
        assert!(validate_avatar_file("me.notjpg", "image/jpeg", 1024).is_err());
        assert!(validate_avatar_file("me", "image/png", 1024).is_err());
        assert!(validate_avatar_file("me.gif", "image/gifx", 1024).is_err());
        assert!(validate_avatar_file("me.jpeg", "image/jpeg", 1024).is_ok());
    }

    #[test]
    fn test_validation_error() {
        let err = ValidationError::new("height_cm", "must be at least 50 cm");
        assert_eq!(err.display_label, "Height");
        assert_eq!(err.user_message(), "Height: must be at least 50 cm");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_valid_weight_range(weight in 0.1f64..=500.0) {
            prop_assert!(validate_weight(weight).is_ok());
        }

        #[test]
        fn prop_invalid_weight_above_max(weight in 500.1f64..1000.0) {
            prop_assert!(validate_weight(weight).is_err());
        }

        #[test]
        fn prop_valid_height_range(height in 50.0f64..=300.0) {
            prop_assert!(validate_height_cm(height).is_ok());
        }
    }
}
