// ABOUTME: Keyword rules mapping free-text exercise names to movement categories
// ABOUTME: Produces push/pull/legs and upper/lower bitmasks used by variety tracking
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Movement categories an exercise trains
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct MovementCategory: u8 {
        /// Pressing movements (bench, overhead press, dips)
        const PUSH = 0b0001;
        /// Pulling movements (rows, pull-ups, curls)
        const PULL = 0b0010;
        /// Lower-body movements (squats, lunges, deadlifts)
        const LEGS = 0b0100;
        /// The three categories variety balance counts
        const BALANCED = Self::PUSH.bits() | Self::PULL.bits() | Self::LEGS.bits();
    }
}

bitflags! {
    /// Body regions an exercise loads
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct BodyRegion: u8 {
        /// Upper body
        const UPPER = 0b01;
        /// Lower body
        const LOWER = 0b10;
    }
}

const LEG_KEYWORDS: &[&str] = &[
    "squat",
    "lunge",
    "leg",
    "calf",
    "calves",
    "deadlift",
    "rdl",
    "hip thrust",
    "glute",
    "hamstring",
    "quad",
    "step up",
    "step-up",
];

const PUSH_KEYWORDS: &[&str] = &[
    "bench",
    "press",
    "push",
    "dip",
    "fly",
    "flye",
    "tricep",
    "chest",
    "lateral raise",
];

const PULL_KEYWORDS: &[&str] = &[
    "row", "pull", "chin", "curl", "shrug", "bicep", "deadlift", "lat ",
];

/// Lower-body machine movements whose names reuse upper-body verbs
const LEG_MACHINE_PREFIXES: &[&str] = &["leg press", "leg curl", "leg extension", "hamstring curl"];

/// Lowercase, trimmed form used as a stable exercise key
#[must_use]
pub fn normalize_exercise_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Classify an exercise name into movement categories
#[must_use]
pub fn classify_movement(name: &str) -> MovementCategory {
    let normalized = normalize_exercise_name(name);
    let mut categories = MovementCategory::empty();

    if contains_any(&normalized, LEG_KEYWORDS) {
        categories |= MovementCategory::LEGS;
    }

    if LEG_MACHINE_PREFIXES
        .iter()
        .any(|prefix| normalized.contains(prefix))
    {
        return categories;
    }

    if contains_any(&normalized, PUSH_KEYWORDS) {
        categories |= MovementCategory::PUSH;
    }
    // "lat " needs a trailing space so "lateral raise" stays a push movement
    let padded = format!("{normalized} ");
    if contains_any(&padded, PULL_KEYWORDS) {
        categories |= MovementCategory::PULL;
    }
    categories
}

/// Body regions loaded by a set of movement categories
#[must_use]
pub fn body_region(categories: MovementCategory) -> BodyRegion {
    let mut region = BodyRegion::empty();
    if categories.intersects(MovementCategory::PUSH | MovementCategory::PULL) {
        region |= BodyRegion::UPPER;
    }
    if categories.contains(MovementCategory::LEGS) {
        region |= BodyRegion::LOWER;
    }
    region
}

/// Movement categories and body regions of an exercise name
#[must_use]
pub fn classify(name: &str) -> (MovementCategory, BodyRegion) {
    let categories = classify_movement(name);
    (categories, body_region(categories))
}

fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| haystack.contains(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization_trims_and_folds_case() {
        assert_eq!(normalize_exercise_name("  Bench Press "), "bench press");
    }

    #[test]
    fn test_common_lifts() {
        assert_eq!(classify_movement("Bench Press"), MovementCategory::PUSH);
        assert_eq!(classify_movement("Barbell Row"), MovementCategory::PULL);
        assert_eq!(classify_movement("Back Squat"), MovementCategory::LEGS);
        assert_eq!(classify_movement("Pull-Up"), MovementCategory::PULL);
        assert_eq!(classify_movement("Lat Pulldown"), MovementCategory::PULL);
        assert_eq!(classify_movement("Lateral Raise"), MovementCategory::PUSH);
    }

    #[test]
    fn test_leg_machines_are_not_upper_body() {
        assert_eq!(classify_movement("Leg Press"), MovementCategory::LEGS);
        assert_eq!(classify_movement("Seated Leg Curl"), MovementCategory::LEGS);
        assert_eq!(body_region(classify_movement("Leg Press")), BodyRegion::LOWER);
    }

    #[test]
    fn test_deadlift_is_legs_and_pull() {
        let (categories, region) = classify("Romanian Deadlift");
        assert!(categories.contains(MovementCategory::LEGS | MovementCategory::PULL));
        assert_eq!(region, BodyRegion::UPPER | BodyRegion::LOWER);
    }

    #[test]
    fn test_unknown_exercise_has_no_category() {
        let (categories, region) = classify("Plank");
        assert!(categories.is_empty());
        assert!(region.is_empty());
    }
}
