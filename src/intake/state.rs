//! Intake steps and the step table that drives dispatch.

use serde::{Deserialize, Serialize};

use super::parsers::{self, FieldParser};
use super::prompts;

/// The intake steps, in question order.
///
/// Progresses linearly: Purpose → Styles → GenderFit → AgeRange → Country →
/// Budget → Sizes → Colors → Accessibility → Confirm. Confirm is the
/// terminal step; a negative answer stays there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    #[default]
    Purpose,
    Styles,
    GenderFit,
    AgeRange,
    Country,
    Budget,
    Sizes,
    Colors,
    Accessibility,
    Confirm,
}

impl Step {
    pub const COUNT: usize = 10;

    /// Position in the step table (0–9).
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Step> {
        STEP_TABLE.get(index).map(|entry| entry.step)
    }

    /// Whether this step gates the external generation call.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Confirm)
    }

    /// The following step, if any.
    pub fn next(self) -> Option<Step> {
        Self::from_index(self.index() + 1)
    }

    /// The table entry for this step.
    pub fn entry(self) -> &'static StepEntry {
        &STEP_TABLE[self.index()]
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Purpose => "purpose",
            Self::Styles => "styles",
            Self::GenderFit => "gender_fit",
            Self::AgeRange => "age_range",
            Self::Country => "country",
            Self::Budget => "budget",
            Self::Sizes => "sizes",
            Self::Colors => "colors",
            Self::Accessibility => "accessibility",
            Self::Confirm => "confirm",
        };
        write!(f, "{s}")
    }
}

/// What happens at one step: the prompt that introduces it and the parser
/// for its answer.
pub struct StepEntry {
    pub step: Step,
    /// Empty when the step is entered without a question.
    pub prompt: &'static str,
    pub parse: FieldParser,
}

impl StepEntry {
    pub fn prompt(&self) -> Option<&'static str> {
        (!self.prompt.is_empty()).then_some(self.prompt)
    }
}

pub static STEP_TABLE: [StepEntry; Step::COUNT] = [
    StepEntry {
        step: Step::Purpose,
        prompt: prompts::PURPOSE,
        parse: parsers::parse_purpose,
    },
    StepEntry {
        step: Step::Styles,
        prompt: prompts::STYLES,
        parse: parsers::parse_styles,
    },
    StepEntry {
        step: Step::GenderFit,
        prompt: prompts::GENDER_FIT,
        parse: parsers::parse_gender_fit,
    },
    StepEntry {
        step: Step::AgeRange,
        prompt: prompts::AGE_RANGE,
        parse: parsers::parse_age_range,
    },
    StepEntry {
        step: Step::Country,
        prompt: prompts::COUNTRY,
        parse: parsers::parse_country,
    },
    StepEntry {
        step: Step::Budget,
        prompt: prompts::BUDGET,
        parse: parsers::parse_budget,
    },
    StepEntry {
        step: Step::Sizes,
        prompt: prompts::SIZES,
        parse: parsers::parse_sizes,
    },
    StepEntry {
        step: Step::Colors,
        prompt: prompts::COLORS,
        parse: parsers::parse_colors,
    },
    StepEntry {
        step: Step::Accessibility,
        prompt: prompts::ACCESSIBILITY,
        parse: parsers::parse_accessibility,
    },
    StepEntry {
        step: Step::Confirm,
        prompt: prompts::CONFIRM,
        parse: parsers::parse_confirm,
    },
];
