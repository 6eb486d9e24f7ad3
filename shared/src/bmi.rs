//! BMI calculations and the BMI scale indicator
//!
//! Computes BMI from the latest weight and the profile height, classifies
//! it, and places a marker on a four-band scale whose colour is taken from
//! a continuous gradient.
//!
//! # Scale
//!
//! Each category owns a 25-point band of the 0..100 scale and the marker is
//! interpolated linearly inside the band. The obese band assumes a ceiling
//! of BMI 40.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Classification
// ============================================================================

/// BMI category classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    /// Get the BMI range for this category
    pub fn range(&self) -> (f64, f64) {
        match self {
            BmiCategory::Underweight => (0.0, 18.5),
            BmiCategory::Normal => (18.5, 25.0),
            BmiCategory::Overweight => (25.0, 30.0),
            BmiCategory::Obese => (30.0, OBESE_SCALE_CEILING),
        }
    }

    /// Start of this category's band on the 0..100 scale
    fn band_start(&self) -> f64 {
        match self {
            BmiCategory::Underweight => 0.0,
            BmiCategory::Normal => 25.0,
            BmiCategory::Overweight => 50.0,
            BmiCategory::Obese => 75.0,
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }

    /// Label shown under the BMI scale
    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Недостаточный вес",
            BmiCategory::Normal => "Норма",
            BmiCategory::Overweight => "Избыточный вес",
            BmiCategory::Obese => "Ожирение",
        }
    }
}

/// Upper end of the scale used to position obese values
pub const OBESE_SCALE_CEILING: f64 = 40.0;

/// Width of one category band on the scale
const BAND_WIDTH: f64 = 25.0;

/// Calculate BMI from weight and height
///
/// Formula: BMI = weight(kg) / height(m)²
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

/// Classify BMI into category
pub fn classify_bmi(bmi: f64) -> BmiCategory {
    if bmi < 18.5 {
        BmiCategory::Underweight
    } else if bmi < 25.0 {
        BmiCategory::Normal
    } else if bmi < 30.0 {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    }
}

/// Marker position on the 0..100 scale
pub fn scale_position(bmi: f64) -> f64 {
    let category = classify_bmi(bmi);
    let (low, high) = category.range();
    let position = category.band_start() + (bmi - low) / (high - low) * BAND_WIDTH;
    position.clamp(0.0, 100.0)
}

// ============================================================================
// Gradient
// ============================================================================

/// An sRGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#RRGGBB`, upper case
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// A colour stop on the scale gradient
#[derive(Debug, Clone, Copy)]
pub struct GradientStop {
    pub position: f64,
    pub color: Rgb,
}

/// Stops of the BMI scale gradient, ascending by position
pub const BMI_GRADIENT: [GradientStop; 4] = [
    GradientStop { position: 0.0, color: Rgb::new(0x3D, 0x85, 0xD8) },
    GradientStop { position: 45.0, color: Rgb::new(0x17, 0xE2, 0x2E) },
    GradientStop { position: 57.0, color: Rgb::new(0xFF, 0xE1, 0x00) },
    GradientStop { position: 100.0, color: Rgb::new(0xE7, 0x55, 0x50) },
];

/// Colour of the gradient at a percentage
///
/// The first pair of stops that brackets the percentage is used, so a value
/// sitting exactly on a stop resolves to that stop's colour. Values outside
/// every bracket fall back to the first stop.
pub fn gradient_color(stops: &[GradientStop], percentage: f64) -> Rgb {
    let fallback = stops.first().map(|s| s.color).unwrap_or(Rgb::new(0, 0, 0));

    stops
        .windows(2)
        .find(|pair| pair[0].position <= percentage && percentage <= pair[1].position)
        .map(|pair| {
            let (p1, p2) = (pair[0], pair[1]);
            let span = p2.position - p1.position;
            let t = if span > 0.0 { (percentage - p1.position) / span } else { 0.0 };
            let channel = |a: u8, b: u8| (a as f64 * (1.0 - t) + b as f64 * t).round() as u8;
            Rgb::new(
                channel(p1.color.r, p2.color.r),
                channel(p1.color.g, p2.color.g),
                channel(p1.color.b, p2.color.b),
            )
        })
        .unwrap_or(fallback)
}

// ============================================================================
// Report
// ============================================================================

/// Everything the BMI widget displays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BmiReport {
    pub bmi: f64,
    /// BMI with one decimal
    pub bmi_display: String,
    pub category: BmiCategory,
    pub label: String,
    /// Marker position, 0..100
    pub position: f64,
    pub color: Rgb,
    pub color_hex: String,
}

/// Classify the latest weight against the profile height
///
/// Returns `None` unless both values are positive, leaving the widget in
/// its previous state.
pub fn classify(latest_weight_kg: f64, height_cm: f64) -> Option<BmiReport> {
    if !(height_cm > 0.0 && latest_weight_kg > 0.0) {
        return None;
    }

    let bmi = calculate_bmi(latest_weight_kg, height_cm);
    let category = classify_bmi(bmi);
    let position = scale_position(bmi);
    let color = gradient_color(&BMI_GRADIENT, position);

    Some(BmiReport {
        bmi,
        bmi_display: format!("{:.1}", bmi),
        category,
        label: category.label().to_string(),
        position,
        color,
        color_hex: color.to_hex(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[test]
    fn test_bmi_calculation() {
        // 70kg, 175cm -> BMI ~22.86
        let bmi = calculate_bmi(70.0, 175.0);
        assert!((bmi - 22.86).abs() < 0.1);
    }

    #[test]
    fn test_report_for_80kg_180cm() {
        let report = classify(80.0, 180.0).unwrap();
        assert!((report.bmi - 24.691).abs() < 0.001);
        assert_eq!(report.bmi_display, "24.7");
        assert_eq!(report.category, BmiCategory::Normal);
        assert_eq!(report.label, "Норма");
        // 25 + (24.69 - 18.5) / 6.5 * 25
        assert!((report.position - 48.81).abs() < 0.01);
    }

    #[rstest]
    #[case(17.0, BmiCategory::Underweight)]
    #[case(18.5, BmiCategory::Normal)]
    #[case(24.99, BmiCategory::Normal)]
    #[case(25.0, BmiCategory::Overweight)]
    #[case(30.0, BmiCategory::Obese)]
    #[case(55.0, BmiCategory::Obese)]
    fn test_bmi_categories(#[case] bmi: f64, #[case] expected: BmiCategory) {
        assert_eq!(classify_bmi(bmi), expected);
    }

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(18.5, 25.0)]
    #[case(25.0, 50.0)]
    #[case(30.0, 75.0)]
    #[case(35.0, 87.5)]
    #[case(40.0, 100.0)]
    #[case(48.0, 100.0)]
    fn test_scale_positions(#[case] bmi: f64, #[case] expected: f64) {
        assert!((scale_position(bmi) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_guard_rejects_missing_inputs() {
        assert!(classify(0.0, 180.0).is_none());
        assert!(classify(80.0, 0.0).is_none());
        assert!(classify(80.0, -5.0).is_none());
        assert!(classify(f64::NAN, 180.0).is_none());
    }

    #[test]
    fn test_gradient_at_stops() {
        assert_eq!(gradient_color(&BMI_GRADIENT, 0.0).to_hex(), "#3D85D8");
        assert_eq!(gradient_color(&BMI_GRADIENT, 45.0).to_hex(), "#17E22E");
        assert_eq!(gradient_color(&BMI_GRADIENT, 57.0).to_hex(), "#FFE100");
        assert_eq!(gradient_color(&BMI_GRADIENT, 100.0).to_hex(), "#E75550");
    }

    #[test]
    fn test_gradient_midpoint() {
        // Halfway between #17E22E and #FFE100
        let color = gradient_color(&BMI_GRADIENT, 51.0);
        assert_eq!(color, Rgb::new(0x8B, 0xE2, 0x17));
    }

    #[test]
    fn test_gradient_outside_range_falls_back_to_first_stop() {
        assert_eq!(gradient_color(&BMI_GRADIENT, -3.0), BMI_GRADIENT[0].color);
        assert_eq!(gradient_color(&BMI_GRADIENT, 120.0), BMI_GRADIENT[0].color);
        assert_eq!(gradient_color(&BMI_GRADIENT, f64::NAN), BMI_GRADIENT[0].color);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: BMI is always positive for valid inputs
        #[test]
        fn prop_bmi_positive(weight in 20.0f64..500.0, height in 100.0f64..250.0) {
            let bmi = calculate_bmi(weight, height);
            prop_assert!(bmi > 0.0);
        }

        /// Property: the marker never leaves the scale
        #[test]
        fn prop_position_clamped(weight in 1.0f64..400.0, height in 50.0f64..250.0) {
            let report = classify(weight, height).unwrap();
            prop_assert!((0.0..=100.0).contains(&report.position));
        }

        /// Property: the marker moves right as BMI grows
        #[test]
        fn prop_position_monotonic(a in 5.0f64..45.0, b in 5.0f64..45.0) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(scale_position(low) <= scale_position(high) + 1e-9);
        }

        /// Property: identical inputs give identical reports
        #[test]
        fn prop_classify_is_pure(weight in 30.0f64..200.0, height in 120.0f64..220.0) {
            prop_assert_eq!(classify(weight, height), classify(weight, height));
        }
    }
}
