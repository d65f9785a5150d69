//! Error types for tag scheme validation

use thiserror::Error;

/// Result type for tag scheme operations
pub type Result<T> = std::result::Result<T, TagSchemeError>;

/// Tag scheme validation errors
#[derive(Error, Debug)]
pub enum TagSchemeError {
    #[error("{keyword} is not a supported scheme component")]
    UnsupportedSchemeComponent { keyword: String },

    #[error("{tag} does not match a scheme of {scheme}")]
    SchemeMismatch { tag: String, scheme: String },

    #[error(
        "{tag} does not match a scheme of {scheme}: {value} is not a valid value for {keyword} \
         (component {position}) or the tag that should precede {tag} does not exist."
    )]
    InvalidComponent {
        tag: String,
        scheme: String,
        position: usize,
        value: String,
        keyword: String,
        /// Predecessor value that would have to exist for a numeric component
        expected: Option<String>,
    },

    #[error("Scheme component {0} is already registered")]
    DuplicateComponent(String),

    #[error("No scheme given: pass one on the command line or set [validator] scheme")]
    MissingScheme,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Config error: {0}")]
    Config(#[from] config_crate::ConfigError),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),
}

impl TagSchemeError {
    /// Human-readable hint naming the missing predecessor, if one is known
    pub fn hint(&self) -> Option<String> {
        match self {
            TagSchemeError::InvalidComponent {
                keyword,
                expected: Some(expected),
                ..
            } => Some(format!(
                "no existing tag has {} = {} under the same preceding component",
                keyword, expected
            )),
            _ => None,
        }
    }
}
