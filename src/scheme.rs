//! Scheme parsing
//!
//! A scheme such as `0Y.0M.MICRO` is split on `.` and each keyword is resolved
//! against the registry once, up front. Unknown keywords fail here, before any
//! tag is looked at. Trailing empty segments are dropped, so `MAJOR.MINOR.`
//! reads as `MAJOR.MINOR`; empty segments in the middle are kept.

use std::fmt;

use serde::Serialize;

use crate::component::{ComponentRule, ValidatorRegistry};
use crate::error::{Result, TagSchemeError};

/// Separator between components in both schemes and tags
pub const SEPARATOR: char = '.';

/// One keyword of a scheme with its resolved rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemeComponent {
    pub keyword: String,
    pub rule: ComponentRule,
}

/// A parsed scheme: keywords aligned with tag positions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scheme {
    raw: String,
    components: Vec<SchemeComponent>,
}

impl Scheme {
    /// Resolve every keyword; the first unknown one in scheme order is reported
    pub fn parse(raw: &str, registry: &ValidatorRegistry) -> Result<Self> {
        let components = split_components(raw)
            .into_iter()
            .map(|keyword| {
                registry
                    .get(keyword)
                    .map(|rule| SchemeComponent {
                        keyword: keyword.to_string(),
                        rule,
                    })
                    .ok_or_else(|| TagSchemeError::UnsupportedSchemeComponent {
                        keyword: keyword.to_string(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            raw: raw.to_string(),
            components,
        })
    }

    pub fn components(&self) -> &[SchemeComponent] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Split a tag into its components
pub fn split_tag(tag: &str) -> Vec<&str> {
    split_components(tag)
}

fn split_components(text: &str) -> Vec<&str> {
    let mut parts: Vec<&str> = text.split(SEPARATOR).collect();
    while parts.last().is_some_and(|p| p.is_empty()) {
        parts.pop();
    }
    parts
}
