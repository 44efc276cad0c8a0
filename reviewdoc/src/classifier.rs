//! Section classification
//!
//! The heuristic classifier maps heading text onto a semantic category with
//! an ordered table of keyword rules. The assisted classifier in
//! [`assisted`] delegates the whole document to a text-generation service.

pub mod assisted;

use serde::Serialize;
use std::fmt;

/// Semantic category of a heading-bounded content block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionCategory {
    Faq,
    ProsAndCons,
    Pros,
    Cons,
    Features,
    Comparison,
    Bonus,
    Games,
    Payment,
    Support,
    Security,
    General,
}

impl SectionCategory {
    /// Whether the category is one of the pros/cons variants
    pub fn is_pros_cons(self) -> bool {
        matches!(
            self,
            SectionCategory::Pros | SectionCategory::Cons | SectionCategory::ProsAndCons
        )
    }
}

impl fmt::Display for SectionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SectionCategory::Faq => "faq",
            SectionCategory::ProsAndCons => "proscons",
            SectionCategory::Pros => "pros",
            SectionCategory::Cons => "cons",
            SectionCategory::Features => "features",
            SectionCategory::Comparison => "comparison",
            SectionCategory::Bonus => "bonus",
            SectionCategory::Games => "games",
            SectionCategory::Payment => "payment",
            SectionCategory::Support => "support",
            SectionCategory::Security => "security",
            SectionCategory::General => "general",
        };
        write!(f, "{}", name)
    }
}

/// How a rule combines its keywords
#[derive(Debug, Clone, Copy)]
enum Match {
    Any(&'static [&'static str]),
    All(&'static [&'static str]),
}

impl Match {
    fn matches(self, text: &str) -> bool {
        match self {
            Match::Any(keywords) => keywords.iter().any(|k| text.contains(k)),
            Match::All(keywords) => keywords.iter().all(|k| text.contains(k)),
        }
    }
}

/// Evaluated top to bottom, first match wins.
///
/// The combined pros/cons rule has to precede the single ones, otherwise
/// "Pros and Cons" would land in `Pros`.
const RULES: &[(Match, SectionCategory)] = &[
    (Match::Any(&["faq", "question"]), SectionCategory::Faq),
    (Match::All(&["pro", "con"]), SectionCategory::ProsAndCons),
    (Match::Any(&["pros", "advantages"]), SectionCategory::Pros),
    (Match::Any(&["cons", "disadvantages"]), SectionCategory::Cons),
    (Match::Any(&["feature"]), SectionCategory::Features),
    (Match::Any(&["comparison", "compare"]), SectionCategory::Comparison),
    (Match::Any(&["bonus"]), SectionCategory::Bonus),
    (Match::Any(&["game"]), SectionCategory::Games),
    (Match::Any(&["payment", "banking"]), SectionCategory::Payment),
    (Match::Any(&["support"]), SectionCategory::Support),
    (Match::Any(&["security", "license"]), SectionCategory::Security),
];

/// Classify a heading by case-insensitive keyword matching
///
/// # Parameters
/// * `text` - Heading text
///
/// # Returns
/// * `SectionCategory` - First matching category, `General` when nothing matches
pub fn classify_heading(text: &str) -> SectionCategory {
    let lower = text.to_lowercase();
    RULES
        .iter()
        .find(|(rule, _)| rule.matches(&lower))
        .map_or(SectionCategory::General, |(_, category)| *category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pros_and_cons_is_combined() {
        assert_eq!(classify_heading("Pros and Cons"), SectionCategory::ProsAndCons);
        assert_eq!(classify_heading("PROS & CONS"), SectionCategory::ProsAndCons);
    }

    #[test]
    fn test_single_sided() {
        assert_eq!(classify_heading("The Pros"), SectionCategory::Pros);
        assert_eq!(classify_heading("Main drawbacks: cons"), SectionCategory::Cons);
        // "disadvantages" contains "advantages", so the pros rule fires first
        assert_eq!(classify_heading("Disadvantages"), SectionCategory::Pros);
    }

    #[test]
    fn test_rule_order() {
        assert_eq!(
            classify_heading("Frequently Asked Questions about Bonuses"),
            SectionCategory::Faq
        );
        assert_eq!(classify_heading("Welcome Bonus"), SectionCategory::Bonus);
        assert_eq!(classify_heading("Bonus Games"), SectionCategory::Bonus);
        assert_eq!(classify_heading("Live Games"), SectionCategory::Games);
        assert_eq!(classify_heading("Key Features"), SectionCategory::Features);
        assert_eq!(classify_heading("How We Compare"), SectionCategory::Comparison);
        assert_eq!(classify_heading("Banking Options"), SectionCategory::Payment);
        assert_eq!(classify_heading("Customer Support"), SectionCategory::Support);
        assert_eq!(classify_heading("License and Safety"), SectionCategory::Security);
    }

    #[test]
    fn test_substring_matching_without_tokenization() {
        // "promotions" + "conclusion" contain "pro" and "con"
        assert_eq!(
            classify_heading("Promotions: Conclusion"),
            SectionCategory::ProsAndCons
        );
    }

    #[test]
    fn test_fallback() {
        assert_eq!(classify_heading("Overview"), SectionCategory::General);
        assert_eq!(classify_heading(""), SectionCategory::General);
    }

    #[test]
    fn test_is_pros_cons() {
        assert!(SectionCategory::Pros.is_pros_cons());
        assert!(SectionCategory::ProsAndCons.is_pros_cons());
        assert!(!SectionCategory::Bonus.is_pros_cons());
    }
}
