//! Scheme component rules and the keyword registry
//!
//! Every scheme keyword resolves to one of three rules:
//!
//! | Keyword                            | Rule                                   |
//! |------------------------------------|----------------------------------------|
//! | `0Y`                               | two-digit year                         |
//! | `0M`                               | two-digit month                        |
//! | `MAJOR`, `MINOR`, `MICRO`, `PATCH` | numeric, predecessor must already exist |
//!
//! Date components are checked against an injected "today" rather than tag
//! history, since they reset independently of ancestry.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TagSchemeError};

/// Validation rule attached to a scheme keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentRule {
    /// Zero-padded two-digit year
    #[serde(alias = "yearpart")]
    Year,
    /// Zero-padded two-digit month
    #[serde(alias = "monthpart")]
    Month,
    /// Monotonic ancestry: `0`, or a sibling holding `value - 1` exists
    Numeric,
}

impl ComponentRule {
    /// Whether this rule looks at sibling values at all
    pub fn uses_siblings(&self) -> bool {
        matches!(self, ComponentRule::Numeric)
    }

    /// The predecessor value a numeric component relies on, if any
    pub fn expected_predecessor(&self, value: &str) -> Option<String> {
        match self {
            ComponentRule::Numeric => LeadingInteger::parse(value).predecessor(),
            _ => None,
        }
    }
}

/// How date components are judged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatePolicy {
    /// Year and month must equal today's
    #[default]
    Today,
    /// Any zero-padded year `00`-`99` and month `00`-`12` is accepted
    Calendar,
}

/// Immutable keyword -> rule map, built once and handed to the validator
#[derive(Debug, Clone)]
pub struct ValidatorRegistry {
    rules: BTreeMap<String, ComponentRule>,
    today: NaiveDate,
    date_policy: DatePolicy,
}

impl ValidatorRegistry {
    /// Registry with the built-in keywords, judging dates against `today`
    pub fn new(today: NaiveDate) -> Self {
        let rules = [
            ("0M", ComponentRule::Month),
            ("0Y", ComponentRule::Year),
            ("MAJOR", ComponentRule::Numeric),
            ("MICRO", ComponentRule::Numeric),
            ("MINOR", ComponentRule::Numeric),
            ("PATCH", ComponentRule::Numeric),
        ]
        .into_iter()
        .map(|(keyword, rule)| (keyword.to_string(), rule))
        .collect();

        Self {
            rules,
            today,
            date_policy: DatePolicy::Today,
        }
    }

    pub fn with_date_policy(mut self, date_policy: DatePolicy) -> Self {
        self.date_policy = date_policy;
        self
    }

    /// Add a custom keyword. Existing keywords cannot be redefined.
    pub fn register(&mut self, keyword: impl Into<String>, rule: ComponentRule) -> Result<()> {
        let keyword = keyword.into();
        if self.rules.contains_key(&keyword) {
            return Err(TagSchemeError::DuplicateComponent(keyword));
        }
        self.rules.insert(keyword, rule);
        Ok(())
    }

    pub fn get(&self, keyword: &str) -> Option<ComponentRule> {
        self.rules.get(keyword).copied()
    }

    /// Registered keywords in sorted order
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn date_policy(&self) -> DatePolicy {
        self.date_policy
    }

    /// Apply `rule` to one tag component given its sibling values
    pub fn check(&self, rule: ComponentRule, siblings: &[&str], value: &str) -> bool {
        match (rule, self.date_policy) {
            (ComponentRule::Year, DatePolicy::Today) => {
                value == format!("{:02}", self.today.year().rem_euclid(100))
            }
            (ComponentRule::Month, DatePolicy::Today) => {
                value == format!("{:02}", self.today.month())
            }
            (ComponentRule::Year, DatePolicy::Calendar) => zero_padded_in(0..=99, value),
            (ComponentRule::Month, DatePolicy::Calendar) => zero_padded_in(0..=12, value),
            (ComponentRule::Numeric, _) => numeric_ancestry(siblings, value),
        }
    }
}

/// `"0"` always passes; otherwise the parsed value must be positive and its
/// predecessor must appear verbatim among the siblings.
fn numeric_ancestry(siblings: &[&str], value: &str) -> bool {
    if value == "0" {
        return true;
    }
    match LeadingInteger::parse(value).predecessor() {
        Some(expected) => siblings.iter().any(|s| *s == expected),
        None => false,
    }
}

fn zero_padded_in(range: std::ops::RangeInclusive<u32>, value: &str) -> bool {
    range.into_iter().any(|n| format!("{:02}", n) == value)
}

/// Leading-integer parse: optional whitespace and sign, then the longest run
/// of ASCII digits. No digits reads as 0. Digits are kept as text so values of
/// any length stay exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LeadingInteger<'a> {
    negative: bool,
    /// Significant digits, no leading zeros; empty for zero
    digits: &'a str,
}

impl<'a> LeadingInteger<'a> {
    pub(crate) fn parse(value: &'a str) -> Self {
        let trimmed = value.trim_start();
        let (negative, rest) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };

        let end = rest
            .bytes()
            .position(|b| !b.is_ascii_digit())
            .unwrap_or(rest.len());
        let digits = rest[..end].trim_start_matches('0');

        Self { negative, digits }
    }

    pub(crate) fn is_positive(&self) -> bool {
        !self.negative && !self.digits.is_empty()
    }

    /// Decimal text of `self - 1` for positive values
    pub(crate) fn predecessor(&self) -> Option<String> {
        if !self.is_positive() {
            return None;
        }

        let mut bytes = self.digits.as_bytes().to_vec();
        // borrow through trailing zeros; a positive value always has a
        // non-zero digit to take from
        for b in bytes.iter_mut().rev() {
            if *b == b'0' {
                *b = b'9';
            } else {
                *b -= 1;
                break;
            }
        }

        let text = String::from_utf8(bytes).ok()?;
        let trimmed = text.trim_start_matches('0');
        Some(if trimmed.is_empty() { "0".to_string() } else { trimmed.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ValidatorRegistry {
        ValidatorRegistry::new(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
    }

    #[test]
    fn test_builtin_keywords() {
        let reg = registry();
        let keywords: Vec<_> = reg.keywords().collect();
        assert_eq!(keywords, vec!["0M", "0Y", "MAJOR", "MICRO", "MINOR", "PATCH"]);
        assert_eq!(registry().get("PATCH"), Some(ComponentRule::Numeric));
        assert_eq!(registry().get("patch"), None);
    }

    #[test]
    fn test_zero_always_passes() {
        let reg = registry();
        assert!(reg.check(ComponentRule::Numeric, &[], "0"));
        assert!(reg.check(ComponentRule::Numeric, &["5", "7"], "0"));
    }

    #[test]
    fn test_numeric_requires_predecessor() {
        let reg = registry();
        assert!(reg.check(ComponentRule::Numeric, &["0", "1"], "2"));
        assert!(!reg.check(ComponentRule::Numeric, &["0"], "2"));
        assert!(!reg.check(ComponentRule::Numeric, &["2"], "2"));
    }

    #[test]
    fn test_non_numeric_values_fail() {
        let reg = registry();
        assert!(!reg.check(ComponentRule::Numeric, &["0"], "abc"));
        assert!(!reg.check(ComponentRule::Numeric, &["0"], ""));
        assert!(!reg.check(ComponentRule::Numeric, &["-2"], "-1"));
    }

    #[test]
    fn test_leading_integer_semantics() {
        assert_eq!(LeadingInteger::parse("15").predecessor().as_deref(), Some("14"));
        assert_eq!(LeadingInteger::parse("01").predecessor().as_deref(), Some("0"));
        assert_eq!(LeadingInteger::parse("3rc1").predecessor().as_deref(), Some("2"));
        assert_eq!(LeadingInteger::parse("100").predecessor().as_deref(), Some("99"));
        assert!(!LeadingInteger::parse("abc").is_positive());
        assert!(!LeadingInteger::parse(" -4").is_positive());
        assert!(!LeadingInteger::parse("-0").is_positive());
        assert!(!LeadingInteger::parse("000").is_positive());

        // "01" parses as 1, so it still needs a literal "0" sibling
        let reg = registry();
        assert!(reg.check(ComponentRule::Numeric, &["0"], "01"));
        assert!(!reg.check(ComponentRule::Numeric, &["00"], "01"));
    }

    #[test]
    fn test_date_parts_against_today() {
        let reg = registry();
        assert!(reg.check(ComponentRule::Year, &[], "24"));
        assert!(!reg.check(ComponentRule::Year, &[], "23"));
        assert!(!reg.check(ComponentRule::Year, &[], "2024"));
        assert!(reg.check(ComponentRule::Month, &[], "03"));
        assert!(!reg.check(ComponentRule::Month, &[], "3"));
        assert!(!reg.check(ComponentRule::Month, &[], "04"));
    }

    #[test]
    fn test_year_zero_padding() {
        let reg = ValidatorRegistry::new(NaiveDate::from_ymd_opt(2007, 11, 1).unwrap());
        assert!(reg.check(ComponentRule::Year, &[], "07"));
        assert!(reg.check(ComponentRule::Month, &[], "11"));
    }

    #[test]
    fn test_calendar_policy() {
        let reg = registry().with_date_policy(DatePolicy::Calendar);
        assert!(reg.check(ComponentRule::Year, &[], "20"));
        assert!(reg.check(ComponentRule::Year, &[], "00"));
        assert!(!reg.check(ComponentRule::Year, &[], "100"));
        assert!(reg.check(ComponentRule::Month, &[], "10"));
        assert!(!reg.check(ComponentRule::Month, &[], "13"));
        assert!(!reg.check(ComponentRule::Month, &[], "7"));
    }

    #[test]
    fn test_register_custom_keyword() {
        let mut reg = registry();
        reg.register("BUILD", ComponentRule::Numeric).unwrap();
        assert_eq!(reg.get("BUILD"), Some(ComponentRule::Numeric));

        let err = reg.register("MAJOR", ComponentRule::Year).unwrap_err();
        assert!(matches!(err, TagSchemeError::DuplicateComponent(k) if k == "MAJOR"));
    }

    #[test]
    fn test_predecessor_beyond_machine_integers() {
        let value = "100000000000000000000000000000";
        let predecessor = "99999999999999999999999999999";
        assert_eq!(
            ComponentRule::Numeric.expected_predecessor(value).as_deref(),
            Some(predecessor)
        );

        let reg = registry();
        assert!(reg.check(ComponentRule::Numeric, &[predecessor], value));
        assert!(!reg.check(ComponentRule::Numeric, &["9223372036854775807"], value));
    }

    #[test]
    fn test_expected_predecessor() {
        assert_eq!(ComponentRule::Numeric.expected_predecessor("15").as_deref(), Some("14"));
        assert_eq!(ComponentRule::Numeric.expected_predecessor("0"), None);
        assert_eq!(ComponentRule::Numeric.expected_predecessor("abc"), None);
        assert_eq!(ComponentRule::Month.expected_predecessor("02"), None);
    }
}
