//! Field parsers, one per intake step.
//!
//! Parsing is total: every answer maps to some [`FieldUpdate`], falling back
//! to a default or to [`FieldUpdate::Keep`]. Answers arrive trimmed.

use std::sync::LazyLock;

use regex::Regex;

use super::model::{
    AccessibilityFlags, AccessibilityNeed, DEFAULT_BUDGET, FieldUpdate, Gender, IntakeRecord,
    Style,
};
use super::sizes::extract_sizes;

/// Signature shared by every step parser.
pub type FieldParser = fn(&str, &IntakeRecord) -> FieldUpdate;

/// The word that declines an optional question.
pub const SKIP_KEYWORD: &str = "skip";

/// First letter of an affirmative answer ("ja").
pub const YES_PREFIX: char = 'j';

const MAX_STYLES: usize = 2;
const MAX_COLORS: usize = 3;

/// Phrase → flag table, checked in this order.
const ACCESSIBILITY_PHRASES: [(&str, AccessibilityNeed); 5] = [
    ("elastic waist", AccessibilityNeed::ElasticWaist),
    ("easy closures", AccessibilityNeed::EasyClosures),
    ("soft fabrics", AccessibilityNeed::SoftFabrics),
    ("pull-on", AccessibilityNeed::PullOn),
    ("pull on", AccessibilityNeed::PullOn),
];

static LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?")
        .expect("leading number pattern is valid")
});

static STYLE_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,\s]+").expect("separator pattern is valid"));

fn is_skip(text: &str) -> bool {
    text.trim().eq_ignore_ascii_case(SKIP_KEYWORD)
}

pub fn parse_purpose(text: &str, _prior: &IntakeRecord) -> FieldUpdate {
    FieldUpdate::Purpose(text.trim().to_lowercase())
}

pub fn parse_styles(text: &str, _prior: &IntakeRecord) -> FieldUpdate {
    let lowered = text.to_lowercase();
    let mut styles: Vec<Style> = STYLE_SEPARATORS
        .split(&lowered)
        .filter(|t| !t.is_empty())
        .filter_map(Style::from_keyword)
        .take(MAX_STYLES)
        .collect();
    if styles.is_empty() {
        styles.push(Style::Casual);
    }
    FieldUpdate::Styles(styles)
}

pub fn parse_gender_fit(text: &str, _prior: &IntakeRecord) -> FieldUpdate {
    if is_skip(text) {
        return FieldUpdate::Keep;
    }
    let lowered = text.to_lowercase();
    let mut parts = lowered.split_whitespace();
    let gender = parts
        .next()
        .and_then(Gender::from_keyword)
        .unwrap_or_default();
    let fit = parts.next().unwrap_or_default().to_string();
    FieldUpdate::GenderFit { gender, fit }
}

/// Stored as typed, without lower-casing.
pub fn parse_age_range(text: &str, _prior: &IntakeRecord) -> FieldUpdate {
    FieldUpdate::AgeRange(text.trim().to_string())
}

pub fn parse_country(text: &str, _prior: &IntakeRecord) -> FieldUpdate {
    FieldUpdate::Country(text.trim().to_uppercase())
}

/// Accepts a decimal comma and trailing words (`"250,5 euro"`).
pub fn parse_budget(text: &str, _prior: &IntakeRecord) -> FieldUpdate {
    let normalized = text.trim().replacen(',', ".", 1);
    let budget = LEADING_NUMBER
        .find(&normalized)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(DEFAULT_BUDGET);
    FieldUpdate::Budget(budget)
}

/// Replaces the whole sizes map; see [`extract_sizes`].
pub fn parse_sizes(text: &str, _prior: &IntakeRecord) -> FieldUpdate {
    if is_skip(text) {
        return FieldUpdate::Keep;
    }
    FieldUpdate::Sizes(extract_sizes(&text.to_lowercase()))
}

pub fn parse_colors(text: &str, _prior: &IntakeRecord) -> FieldUpdate {
    if is_skip(text) {
        return FieldUpdate::Keep;
    }
    let colors = text
        .split(',')
        .map(|c| c.trim().to_lowercase())
        .filter(|c| !c.is_empty())
        .take(MAX_COLORS)
        .collect();
    FieldUpdate::Colors(colors)
}

pub fn parse_accessibility(text: &str, _prior: &IntakeRecord) -> FieldUpdate {
    if is_skip(text) {
        return FieldUpdate::Keep;
    }
    let lowered = text.to_lowercase();
    let mut flags = AccessibilityFlags::default();
    for (phrase, need) in ACCESSIBILITY_PHRASES {
        if lowered.contains(phrase) {
            flags.set(need);
        }
    }
    FieldUpdate::Accessibility(flags)
}

pub fn parse_confirm(text: &str, _prior: &IntakeRecord) -> FieldUpdate {
    FieldUpdate::Confirm(text.trim().to_lowercase().starts_with(YES_PREFIX))
}
