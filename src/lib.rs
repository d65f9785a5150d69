//! Git Tag Scheme Validator
//!
//! Checks that every tag in a repository follows a declared naming scheme,
//! such as SemVer `MAJOR.MINOR.PATCH` or CalVer `0Y.0M.MICRO`, and that
//! numeric components never skip a release.
//!
//! ## Rules
//!
//! - `0Y` / `0M`: two-digit year and month, checked against today
//! - `MAJOR`, `MINOR`, `MICRO`, `PATCH`: `0`, or the previous number must
//!   already be tagged under the same preceding component
//!
//! ```text
//! 0.0.0  0.0.1  0.1.0  0.1.1   ok
//! 0.0.0  0.0.1  0.1.1          0.1.1 fails: no 0.1.0
//! ```

pub mod component;
pub mod config;
pub mod error;
pub mod scheme;
pub mod source;
pub mod validator;

pub use component::{ComponentRule, DatePolicy, ValidatorRegistry};
pub use config::TagSchemeConfig;
pub use error::{Result, TagSchemeError};
pub use scheme::{Scheme, SchemeComponent};
pub use source::{GitTagSource, StaticTagSource, TagSource};
pub use validator::{TagSchemeValidator, ValidationReport};
