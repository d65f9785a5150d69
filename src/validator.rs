//! Tag scheme validator
//!
//! Checks every tag against a scheme, in list order, and stops at the first
//! problem. Numeric components are checked against their siblings: the values
//! at the same position among tags that share the immediately preceding
//! component.

use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

use crate::component::ValidatorRegistry;
use crate::error::{Result, TagSchemeError};
use crate::scheme::{split_tag, Scheme};
use crate::source::TagSource;

/// Outcome of a successful validation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub scheme: String,
    pub tags_checked: usize,
    pub components: Vec<String>,
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "All local tags match a scheme of {}", self.scheme)
    }
}

/// Validates a fixed tag list against a scheme
pub struct TagSchemeValidator {
    scheme: String,
    tags: Vec<String>,
    registry: ValidatorRegistry,
}

impl TagSchemeValidator {
    /// Store the scheme and tags as given; nothing is parsed until `execute`
    pub fn new(scheme: impl Into<String>, tags: Vec<String>, registry: ValidatorRegistry) -> Self {
        Self {
            scheme: scheme.into(),
            tags,
            registry,
        }
    }

    /// Build a validator from whatever tags `source` lists
    pub fn from_source(
        scheme: impl Into<String>,
        source: &dyn TagSource,
        registry: ValidatorRegistry,
    ) -> Result<Self> {
        let tags = source.list_tags()?;
        Ok(Self::new(scheme, tags, registry))
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Validate every tag; the first failure in tag order, then component
    /// order, is returned.
    pub fn execute(&self) -> Result<ValidationReport> {
        let scheme = Scheme::parse(&self.scheme, &self.registry)?;
        let split: Vec<Vec<&str>> = self.tags.iter().map(|t| split_tag(t)).collect();

        for (tag, parts) in self.tags.iter().zip(&split) {
            self.validate_tag(&scheme, tag, parts, &split)?;
        }

        info!(
            scheme = %scheme,
            tags = self.tags.len(),
            "all tags match scheme"
        );

        Ok(ValidationReport {
            scheme: scheme.to_string(),
            tags_checked: self.tags.len(),
            components: scheme
                .components()
                .iter()
                .map(|c| c.keyword.clone())
                .collect(),
        })
    }

    fn validate_tag(
        &self,
        scheme: &Scheme,
        tag: &str,
        parts: &[&str],
        all: &[Vec<&str>],
    ) -> Result<()> {
        if parts.len() != scheme.len() {
            return Err(TagSchemeError::SchemeMismatch {
                tag: tag.to_string(),
                scheme: scheme.to_string(),
            });
        }

        for (position, component) in scheme.components().iter().enumerate() {
            let value = parts[position];
            let siblings = if component.rule.uses_siblings() {
                sibling_values(all, parts, position)
            } else {
                Vec::new()
            };

            debug!(
                tag,
                position,
                keyword = %component.keyword,
                value,
                siblings = siblings.len(),
                "checking component"
            );

            if !self.registry.check(component.rule, &siblings, value) {
                return Err(TagSchemeError::InvalidComponent {
                    tag: tag.to_string(),
                    scheme: scheme.to_string(),
                    position,
                    value: value.to_string(),
                    keyword: component.keyword.clone(),
                    expected: component.rule.expected_predecessor(value),
                });
            }
        }

        Ok(())
    }
}

/// Values at `position` across all tags whose component at `position - 1`
/// equals the current tag's. Position 0 takes every tag.
pub fn sibling_values<'a>(all: &[Vec<&'a str>], current: &[&str], position: usize) -> Vec<&'a str> {
    let prefix = position.checked_sub(1).map(|prev| current.get(prev).copied());

    all.iter()
        .filter(|other| match prefix {
            None => true,
            Some(expected) => other.get(position - 1).copied() == expected,
        })
        .filter_map(|other| other.get(position).copied())
        .collect()
}
