//! Data models for the Weight Tracker application

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Default avatar shown until the user uploads one
pub const DEFAULT_AVATAR_URL: &str = "images/default.jpg";

/// One dated weight observation
///
/// `weight` is always the stored, post-adjustment value. When the user's
/// clothes weight was subtracted at creation time `clothes_applied` is set,
/// and the value is never re-derived afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub id: Uuid,
    pub date: NaiveDate,
    pub weight: f64,
    #[serde(default)]
    pub clothes_applied: bool,
}

impl WeightEntry {
    pub fn new(date: NaiveDate, weight: f64) -> Self {
        Self {
            id: Uuid::nil(),
            date,
            weight,
            clothes_applied: false,
        }
    }
}

/// Gender as chosen on the profile form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            other => Err(format!("Unknown gender: {}", other)),
        }
    }
}

/// Muscle build category from the profile form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MuscleCategory {
    Low,
    Normal,
    High,
}

impl MuscleCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MuscleCategory::Low => "low",
            MuscleCategory::Normal => "normal",
            MuscleCategory::High => "high",
        }
    }
}

impl FromStr for MuscleCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(MuscleCategory::Low),
            "normal" => Ok(MuscleCategory::Normal),
            "high" => Ok(MuscleCategory::High),
            other => Err(format!("Unknown muscle category: {}", other)),
        }
    }
}

/// Per-user profile
///
/// Every field is optional on the wire: a freshly created user has an
/// empty profile until the settings and profile forms are submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub height_cm: Option<f64>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub muscle_category: Option<MuscleCategory>,
    #[serde(default)]
    pub target_weight_kg: Option<f64>,
    #[serde(default)]
    pub clothes_weight_kg: f64,
    #[serde(default)]
    pub ignore_clothes_weight: bool,
    #[serde(default = "default_avatar_url")]
    pub avatar_url: String,
}

fn default_avatar_url() -> String {
    DEFAULT_AVATAR_URL.to_string()
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            gender: None,
            height_cm: None,
            birth_date: None,
            muscle_category: None,
            target_weight_kg: None,
            clothes_weight_kg: 0.0,
            ignore_clothes_weight: false,
            avatar_url: default_avatar_url(),
        }
    }
}

impl Profile {
    /// Whether new entries get the clothes weight subtracted
    pub fn clothes_adjustment_active(&self) -> bool {
        self.clothes_weight_kg > 0.0 && !self.ignore_clothes_weight
    }

    /// Subtract the clothes weight from a freshly entered weight
    ///
    /// Returns the weight to store and whether the adjustment was applied.
    pub fn apply_clothes_weight(&self, weight: f64) -> (f64, bool) {
        if self.clothes_adjustment_active() {
            (weight - self.clothes_weight_kg, true)
        } else {
            (weight, false)
        }
    }
}

/// Sort entries oldest first
pub fn sort_ascending(entries: &mut [WeightEntry]) {
    entries.sort_by(|a, b| a.date.cmp(&b.date));
}

/// Sort entries newest first
pub fn sort_descending(entries: &mut [WeightEntry]) {
    entries.sort_by(|a, b| b.date.cmp(&a.date));
}
