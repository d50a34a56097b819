//! Error types for the mcdm-rs library.
//!
//! Every fallible operation in the decision engine returns [`McdmError`]. Input
//! problems are detected before any computation starts and carry enough context
//! (criterion or alternative name) for the caller to fix the request.

use std::io;

use thiserror::Error;

/// Main result type for mcdm operations.
pub type Result<T> = std::result::Result<T, McdmError>;

/// Error type for all decision engine operations.
#[derive(Error, Debug)]
pub enum McdmError {
    /// Weights are missing, reference unknown criteria, are negative or do not sum to 1.0
    #[error("Invalid weights: {message}")]
    InvalidWeights {
        /// Error description
        message: String,
        /// Criterion that caused the failure, when a single one is to blame
        criterion: Option<String>,
    },

    /// Not enough alternatives (or sample groups) for the requested operation
    #[error("Insufficient alternatives for {context}: need at least {required}, got {actual}")]
    InsufficientAlternatives {
        /// Minimum number required
        required: usize,
        /// Number supplied
        actual: usize,
        /// Operation that was requested
        context: String,
    },

    /// An alternative does not provide a value for a required criterion
    #[error("Alternative '{alternative}' is missing criterion '{criterion}'")]
    MissingCriterion {
        /// Alternative name
        alternative: String,
        /// Criterion name
        criterion: String,
    },

    /// Input with no safe finite fallback (NaN or infinite measurements)
    #[error("Degenerate input: {message}")]
    DegenerateInput {
        /// Error description
        message: String,
        /// Offending alternative
        alternative: Option<String>,
        /// Offending criterion
        criterion: Option<String>,
    },

    /// Mathematical computation errors (invalid distribution parameters)
    #[error("Mathematical error: {message}")]
    Math {
        /// Error description
        message: String,
        /// Context of the mathematical operation
        context: Option<String>,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        /// Error description
        message: String,
        /// Configuration field that caused the error
        field: Option<String>,
    },

    /// Validation errors for auxiliary input data
    #[error("Validation error: {message}")]
    Validation {
        /// Error description
        message: String,
        /// Field or input that failed validation
        field: Option<String>,
    },

    /// I/O related errors (configuration files)
    #[error("I/O error: {message}")]
    Io {
        /// Human-readable error message
        message: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error description
        message: String,
        /// Data format being processed
        data_type: Option<String>,
        /// Underlying serialization error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl McdmError {
    /// Create a new invalid weights error
    pub fn invalid_weights(message: impl Into<String>) -> Self {
        Self::InvalidWeights {
            message: message.into(),
            criterion: None,
        }
    }

    /// Create a new invalid weights error blaming one criterion
    pub fn invalid_weight_for(criterion: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidWeights {
            message: message.into(),
            criterion: Some(criterion.into()),
        }
    }

    /// Create a new insufficient alternatives error
    pub fn insufficient_alternatives(
        required: usize,
        actual: usize,
        context: impl Into<String>,
    ) -> Self {
        Self::InsufficientAlternatives {
            required,
            actual,
            context: context.into(),
        }
    }

    /// Create a new missing criterion error
    pub fn missing_criterion(alternative: impl Into<String>, criterion: impl Into<String>) -> Self {
        Self::MissingCriterion {
            alternative: alternative.into(),
            criterion: criterion.into(),
        }
    }

    /// Create a new degenerate input error for a specific matrix cell
    pub fn degenerate_value(
        alternative: impl Into<String>,
        criterion: impl Into<String>,
        value: f64,
    ) -> Self {
        let alternative = alternative.into();
        let criterion = criterion.into();
        Self::DegenerateInput {
            message: format!("'{alternative}.{criterion}' is not a finite number ({value})"),
            alternative: Some(alternative),
            criterion: Some(criterion),
        }
    }

    /// Create a new mathematical error with context
    pub fn math_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Math {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create a new configuration error with field context
    pub fn config_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a new validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Create a new validation error with field context
    pub fn validation_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a new I/O error with context
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Prefix the error message with additional context
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        let context = context.into();
        match &mut self {
            Self::InvalidWeights { message, .. }
            | Self::DegenerateInput { message, .. }
            | Self::Math { message, .. }
            | Self::Config { message, .. }
            | Self::Validation { message, .. }
            | Self::Io { message, .. }
            | Self::Serialization { message, .. } => {
                *message = format!("{context}: {message}");
            }
            Self::InsufficientAlternatives { context: ctx, .. } => {
                *ctx = format!("{context}: {ctx}");
            }
            Self::MissingCriterion { .. } => {}
        }
        self
    }
}

impl From<io::Error> for McdmError {
    fn from(err: io::Error) -> Self {
        Self::io("I/O operation failed", err)
    }
}

impl From<statrs::StatsError> for McdmError {
    fn from(err: statrs::StatsError) -> Self {
        Self::Math {
            message: format!("Invalid distribution parameters: {err}"),
            context: None,
        }
    }
}

impl From<serde_json::Error> for McdmError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: format!("JSON serialization failed: {err}"),
            data_type: Some("JSON".to_string()),
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_yaml::Error> for McdmError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization {
            message: format!("YAML serialization failed: {err}"),
            data_type: Some("YAML".to_string()),
            source: Some(Box::new(err)),
        }
    }
}

/// Result extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;

    /// Add static context to an error result
    fn context(self, msg: &'static str) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<McdmError>,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.into().with_context(f()))
    }

    fn context(self, msg: &'static str) -> Result<T> {
        self.map_err(|e| e.into().with_context(msg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_weight_for_keeps_criterion() {
        let err = McdmError::invalid_weight_for("latency", "unknown criterion");

        if let McdmError::InvalidWeights { message, criterion } = err {
            assert_eq!(message, "unknown criterion");
            assert_eq!(criterion, Some("latency".to_string()));
        } else {
            panic!("Expected InvalidWeights error");
        }
    }

    #[test]
    fn test_insufficient_alternatives_display() {
        let err = McdmError::insufficient_alternatives(2, 1, "one-way ANOVA");
        let display = format!("{err}");
        assert!(display.contains("one-way ANOVA"));
        assert!(display.contains("need at least 2, got 1"));
    }

    #[test]
    fn test_missing_criterion_display() {
        let err = McdmError::missing_criterion("t3.micro", "cost");
        assert_eq!(
            format!("{err}"),
            "Alternative 't3.micro' is missing criterion 'cost'"
        );
    }

    #[test]
    fn test_degenerate_value_context() {
        let err = McdmError::degenerate_value("t3.small", "cpu_usage", f64::NAN);

        if let McdmError::DegenerateInput {
            alternative,
            criterion,
            message,
        } = err
        {
            assert_eq!(alternative.as_deref(), Some("t3.small"));
            assert_eq!(criterion.as_deref(), Some("cpu_usage"));
            assert!(message.contains("NaN"));
        } else {
            panic!("Expected DegenerateInput error");
        }
    }

    #[test]
    fn test_with_context_prefixes_message() {
        let err = McdmError::validation("empty metrics").with_context("profile t3.micro");

        if let McdmError::Validation { message, .. } = err {
            assert_eq!(message, "profile t3.micro: empty metrics");
        } else {
            panic!("Expected Validation error");
        }
    }

    #[test]
    fn test_with_context_leaves_missing_criterion_unchanged() {
        let err = McdmError::missing_criterion("a", "b").with_context("ignored");
        assert!(matches!(err, McdmError::MissingCriterion { .. }));
    }

    #[test]
    fn test_config_field_error() {
        let err = McdmError::config_field("Invalid value", "monte_carlo.num_simulations");

        if let McdmError::Config { message, field } = err {
            assert_eq!(message, "Invalid value");
            assert_eq!(field, Some("monte_carlo.num_simulations".to_string()));
        } else {
            panic!("Expected Config error");
        }
    }

    #[test]
    fn test_math_with_context() {
        let err = McdmError::math_with_context("Degrees of freedom must be positive", "t-test");

        if let McdmError::Math { message, context } = err {
            assert_eq!(message, "Degrees of freedom must be positive");
            assert_eq!(context, Some("t-test".to_string()));
        } else {
            panic!("Expected Math error");
        }
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<i32>("invalid json").unwrap_err();
        let err: McdmError = json_err.into();

        if let McdmError::Serialization { data_type, .. } = err {
            assert_eq!(data_type, Some("JSON".to_string()));
        } else {
            panic!("Expected Serialization error");
        }
    }

    #[test]
    fn test_from_yaml_error() {
        let yaml_err = serde_yaml::from_str::<i32>("invalid: yaml: content").unwrap_err();
        let err: McdmError = yaml_err.into();
        assert!(matches!(err, McdmError::Serialization { .. }));
    }

    #[test]
    fn test_result_ext_context() {
        let result: std::result::Result<i32, std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "File not found",
        ));

        let err = result.context("Failed to read engine config").unwrap_err();
        if let McdmError::Io { message, source } = err {
            assert_eq!(message, "Failed to read engine config: I/O operation failed");
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        } else {
            panic!("Expected Io error");
        }
    }
}
