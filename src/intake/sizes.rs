//! Size grammar for the sizes step.
//!
//! Each rule pairs a Dutch trigger word with the shape of the value that must
//! follow it after some non-digit filler, e.g. `broekmaat 32/34` or
//! `bovenmaat L`. Rules run independently against the lower-cased answer.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::model::{Sizes, TopSize};

/// Which entry of [`Sizes`] a rule fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeSlot {
    Bottom,
    Top,
    Shoes,
}

/// What the captured value must look like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    /// A 2–3 digit number, optionally followed by `/NN` when `fraction` is set.
    Measure { fraction: bool },
    /// A standalone letter size (`xs`, `s`, `m`, `l`, `xl`, `xxl`).
    Letter,
}

/// One `(trigger, shape)` rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeRule {
    pub slot: SizeSlot,
    pub trigger: &'static str,
    pub shape: ValueShape,
}

/// Letter sizes, longest first so alternation prefers `xxl` over `xl`.
const LETTER_ALTERNATION: &str = "xxl|xl|xs|s|m|l";

/// The rules, in evaluation order.
pub const SIZE_RULES: [SizeRule; 3] = [
    SizeRule {
        slot: SizeSlot::Bottom,
        trigger: "broek",
        shape: ValueShape::Measure { fraction: true },
    },
    SizeRule {
        slot: SizeSlot::Top,
        trigger: "boven",
        shape: ValueShape::Letter,
    },
    SizeRule {
        slot: SizeSlot::Shoes,
        trigger: "schoen",
        shape: ValueShape::Measure { fraction: false },
    },
];

impl SizeRule {
    /// Regex source for this rule; group 1 is the captured value. Digits are
    /// ASCII only.
    pub fn pattern(&self) -> String {
        let trigger = regex::escape(self.trigger);
        match self.shape {
            ValueShape::Measure { fraction: true } => format!(r"{trigger}[^0-9]*([0-9]{{2,3}}(?:/[0-9]{{2}})?)"),
            ValueShape::Measure { fraction: false } => format!(r"{trigger}[^0-9]*([0-9]{{2,3}})"),
            ValueShape::Letter => format!(r"{trigger}[^0-9]*?\b({LETTER_ALTERNATION})\b"),
        }
    }
}

struct CompiledRule {
    rule: SizeRule,
    regex: Regex,
}

impl CompiledRule {
    fn capture<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.regex
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

static COMPILED_RULES: LazyLock<Vec<CompiledRule>> = LazyLock::new(|| {
    SIZE_RULES
        .iter()
        .map(|rule| CompiledRule {
            rule: *rule,
            regex: Regex::new(&rule.pattern()).expect("size rule pattern is valid"),
        })
        .collect()
});

static LONE_LETTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\b({LETTER_ALTERNATION})\b")).expect("letter size pattern is valid")
});

/// Run one rule against lower-cased text.
pub fn match_rule(rule: &SizeRule, text: &str) -> Option<String> {
    COMPILED_RULES
        .iter()
        .find(|c| c.rule == *rule)
        .and_then(|c| c.capture(text))
        .map(str::to_string)
}

/// First standalone letter size anywhere in the text.
fn lone_letter(text: &str) -> Option<TopSize> {
    LONE_LETTER
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Extract every size the text mentions.
///
/// `text` must already be lower-cased. An explicit top-size phrase wins;
/// otherwise any lone letter size is taken as the top size.
pub fn extract_sizes(text: &str) -> Sizes {
    let mut sizes = Sizes::default();

    for compiled in COMPILED_RULES.iter() {
        let Some(value) = compiled.capture(text) else {
            continue;
        };
        match compiled.rule.slot {
            SizeSlot::Bottom => sizes.bottom = Some(value.to_string()),
            SizeSlot::Top => sizes.top = value.parse().ok(),
            SizeSlot::Shoes => sizes.shoes = Some(value.to_string()),
        }
    }

    if sizes.top.is_none() {
        sizes.top = lone_letter(text);
    }

    debug!(?sizes, "Extracted sizes");
    sizes
}
