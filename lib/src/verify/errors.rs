use std::fmt;

/// Problems with the verification setup itself
///
/// Unlike a compatibility problem, which is a finding about the inspected
/// artifact, a configuration error means the run was asked for something
/// nonsensical and should stop before verification starts.
#[derive(Debug)]
pub enum ConfigError {
    /// An external class prefix that is empty once normalized
    EmptyExternalPrefix,

    /// An external class prefix that does not spell a package path
    BadExternalPrefix { entry: String, reason: String },

    /// An ignore condition whose pattern is not a valid regular expression
    BadIgnorePattern {
        pattern: String,
        error: regex::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyExternalPrefix => {
                write!(f, "external class prefixes must not be empty")
            }
            ConfigError::BadExternalPrefix { entry, reason } => {
                write!(f, "bad external class prefix '{}': {}", entry, reason)
            }
            ConfigError::BadIgnorePattern { pattern, error } => {
                write!(f, "bad ignore pattern '{}': {}", pattern, error)
            }
        }
    }
}
