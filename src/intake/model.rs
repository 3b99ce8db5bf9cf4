//! Intake record and its field types.

use serde::{Deserialize, Serialize};

/// Clothing style, named by the Dutch keyword the wizard accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Style {
    #[serde(rename = "minimalistisch")]
    Minimalist,
    #[serde(rename = "casual")]
    Casual,
    #[serde(rename = "klassiek")]
    Classic,
    #[serde(rename = "sportief")]
    Sporty,
    #[serde(rename = "creatief")]
    Creative,
}

impl Style {
    /// Every style, in the order the prompt lists them.
    pub const ALL: [Style; 5] = [
        Self::Minimalist,
        Self::Casual,
        Self::Classic,
        Self::Sporty,
        Self::Creative,
    ];

    /// The keyword used in answers and on the wire.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Minimalist => "minimalistisch",
            Self::Casual => "casual",
            Self::Classic => "klassiek",
            Self::Sporty => "sportief",
            Self::Creative => "creatief",
        }
    }

    /// Look up a lower-cased token in the vocabulary.
    pub fn from_keyword(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.keyword() == token)
    }
}

impl std::fmt::Display for Style {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unisex,
    NonBinary,
}

impl Gender {
    pub fn from_keyword(token: &str) -> Option<Self> {
        match token {
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            "unisex" => Some(Self::Unisex),
            "non-binary" => Some(Self::NonBinary),
            _ => None,
        }
    }
}

/// Letter size for tops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TopSize {
    Xs,
    S,
    M,
    L,
    Xl,
    Xxl,
}

impl std::str::FromStr for TopSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "xs" => Ok(Self::Xs),
            "s" => Ok(Self::S),
            "m" => Ok(Self::M),
            "l" => Ok(Self::L),
            "xl" => Ok(Self::Xl),
            "xxl" => Ok(Self::Xxl),
            other => Err(format!("unknown top size `{other}`")),
        }
    }
}

impl std::fmt::Display for TopSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Xs => "XS",
            Self::S => "S",
            Self::M => "M",
            Self::L => "L",
            Self::Xl => "XL",
            Self::Xxl => "XXL",
        };
        f.write_str(s)
    }
}

/// Sizes per garment category. Only matched keys are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sizes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<TopSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shoes: Option<String>,
}

impl Sizes {
    pub fn is_empty(&self) -> bool {
        self.bottom.is_none() && self.top.is_none() && self.shoes.is_none()
    }
}

/// A single accessibility need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessibilityNeed {
    ElasticWaist,
    EasyClosures,
    SoftFabrics,
    PullOn,
}

/// Accessibility needs as flags.
///
/// Serialized as a map holding only the set flags, e.g. `{"elastic_waist": true}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessibilityFlags {
    #[serde(default, skip_serializing_if = "is_false")]
    pub elastic_waist: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub easy_closures: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub soft_fabrics: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub pull_on: bool,
}

impl AccessibilityFlags {
    pub fn set(&mut self, need: AccessibilityNeed) {
        match need {
            AccessibilityNeed::ElasticWaist => self.elastic_waist = true,
            AccessibilityNeed::EasyClosures => self.easy_closures = true,
            AccessibilityNeed::SoftFabrics => self.soft_fabrics = true,
            AccessibilityNeed::PullOn => self.pull_on = true,
        }
    }

    pub fn contains(&self, need: AccessibilityNeed) -> bool {
        match need {
            AccessibilityNeed::ElasticWaist => self.elastic_waist,
            AccessibilityNeed::EasyClosures => self.easy_closures,
            AccessibilityNeed::SoftFabrics => self.soft_fabrics,
            AccessibilityNeed::PullOn => self.pull_on,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn is_false(v: &bool) -> bool {
    !*v
}

/// Preference profile accumulated over the intake steps.
///
/// Sent whole as `intake` in the generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeRecord {
    pub purpose: String,
    pub styles: Vec<Style>,
    pub gender: Gender,
    pub fit: String,
    pub age_range: String,
    pub country: String,
    pub budget_total: f64,
    pub budget_per_item: Option<f64>,
    pub sizes: Sizes,
    pub favorite_colors: Vec<String>,
    pub materials_avoid: Vec<String>,
    pub accessibility: AccessibilityFlags,
    pub sustainability_preference: bool,
    pub currency: String,
}

/// Budget used when the answer holds no number.
pub const DEFAULT_BUDGET: f64 = 250.0;

impl Default for IntakeRecord {
    fn default() -> Self {
        Self {
            purpose: String::new(),
            styles: Vec::new(),
            gender: Gender::default(),
            fit: String::new(),
            age_range: String::new(),
            country: "NL".to_string(),
            budget_total: DEFAULT_BUDGET,
            budget_per_item: None,
            sizes: Sizes::default(),
            favorite_colors: Vec::new(),
            materials_avoid: Vec::new(),
            accessibility: AccessibilityFlags::default(),
            sustainability_preference: false,
            currency: "EUR".to_string(),
        }
    }
}

/// The outcome of parsing one answer: at most one field group to overwrite.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    /// Leave the record untouched (skip keyword, or a step with nothing to store).
    Keep,
    Purpose(String),
    Styles(Vec<Style>),
    GenderFit { gender: Gender, fit: String },
    AgeRange(String),
    Country(String),
    Budget(f64),
    Sizes(Sizes),
    Colors(Vec<String>),
    Accessibility(AccessibilityFlags),
    /// Answer to the final confirmation; never stored.
    Confirm(bool),
}

impl IntakeRecord {
    /// Overwrite the field group carried by `update`.
    pub fn apply(&mut self, update: FieldUpdate) {
        match update {
            FieldUpdate::Keep | FieldUpdate::Confirm(_) => {}
            FieldUpdate::Purpose(p) => self.purpose = p,
            FieldUpdate::Styles(s) => self.styles = s,
            FieldUpdate::GenderFit { gender, fit } => {
                self.gender = gender;
                self.fit = fit;
            }
            FieldUpdate::AgeRange(a) => self.age_range = a,
            FieldUpdate::Country(c) => self.country = c,
            FieldUpdate::Budget(b) => self.budget_total = b,
            FieldUpdate::Sizes(s) => self.sizes = s,
            FieldUpdate::Colors(c) => self.favorite_colors = c,
            FieldUpdate::Accessibility(a) => self.accessibility = a,
        }
    }
}
