//! Error types for registry resolution and trial execution.
//!
//! A falsified property is not an error: it is reported through
//! [`TrialOutcome`](crate::execution::TrialOutcome). The types here cover the cases where no
//! trial can be run at all, and output failures while reporting.

use std::fmt;

use crate::config::ConfigError;
use crate::descriptor::TypeDescriptor;

/// Fatal resolution problems, surfaced before any trial is executed
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// No binding exists for the requested type
    NotRegistered { descriptor: TypeDescriptor },

    /// A container binding exists, but its element type cannot be resolved
    ElementNotRegistered {
        container: TypeDescriptor,
        element: TypeDescriptor,
    },

    /// The stored binding does not produce the requested type
    SignatureMismatch {
        descriptor: TypeDescriptor,
        expected: &'static str,
    },

    /// The test configuration failed validation
    InvalidConfig(ConfigError),
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::NotRegistered { descriptor } => {
                write!(
                    f,
                    "The provided type `{}' has no Arbitrary binding registered for it",
                    descriptor
                )
            }
            ConfigurationError::ElementNotRegistered { container, element } => {
                write!(
                    f,
                    "The element type `{}' of `{}' has no Arbitrary binding registered for it",
                    element, container
                )
            }
            ConfigurationError::SignatureMismatch {
                descriptor,
                expected,
            } => {
                write!(
                    f,
                    "The binding registered for `{}' does not produce values of `{}'",
                    descriptor, expected
                )
            }
            ConfigurationError::InvalidConfig(err) => write!(f, "Invalid configuration: {}", err),
        }
    }
}

impl std::error::Error for ConfigurationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigurationError::InvalidConfig(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for ConfigurationError {
    fn from(err: ConfigError) -> Self {
        ConfigurationError::InvalidConfig(err)
    }
}

impl ConfigurationError {
    /// Create a not-registered error for `T`
    pub fn not_registered<T: 'static>() -> Self {
        Self::NotRegistered {
            descriptor: TypeDescriptor::of::<T>(),
        }
    }

    /// The descriptor of the type that failed to resolve, if the error is about one
    pub fn descriptor(&self) -> Option<&TypeDescriptor> {
        match self {
            ConfigurationError::NotRegistered { descriptor }
            | ConfigurationError::SignatureMismatch { descriptor, .. } => Some(descriptor),
            ConfigurationError::ElementNotRegistered { container, .. } => Some(container),
            ConfigurationError::InvalidConfig(_) => None,
        }
    }
}

/// Errors returned by the trial runner
#[derive(Debug, Clone, PartialEq)]
pub enum CheckError {
    /// The property could not be set up; zero trials were executed
    Configuration(ConfigurationError),

    /// Writing a verbose trial line or the summary failed
    Output { message: String },
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckError::Configuration(err) => write!(f, "Configuration error: {}", err),
            CheckError::Output { message } => write!(f, "Output failed: {}", message),
        }
    }
}

impl std::error::Error for CheckError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CheckError::Configuration(err) => Some(err),
            CheckError::Output { .. } => None,
        }
    }
}

impl From<ConfigurationError> for CheckError {
    fn from(err: ConfigurationError) -> Self {
        CheckError::Configuration(err)
    }
}

impl From<ConfigError> for CheckError {
    fn from(err: ConfigError) -> Self {
        CheckError::Configuration(ConfigurationError::InvalidConfig(err))
    }
}

impl From<std::io::Error> for CheckError {
    fn from(err: std::io::Error) -> Self {
        CheckError::Output {
            message: err.to_string(),
        }
    }
}

impl CheckError {
    /// Whether this error was raised before any trial ran
    pub fn is_configuration(&self) -> bool {
        matches!(self, CheckError::Configuration(_))
    }
}
