//! Error types for the Employer Cost Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the calculator, the batch pipeline and the
//! configuration loader can report.

use thiserror::Error;

/// The main error type for the Employer Cost Engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use employer_cost_engine::error::EngineError;
///
/// let error = EngineError::MissingColumn {
///     column: "salario".to_string(),
/// };
/// assert_eq!(error.to_string(), "Column not found in input rows: salario");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A compensation profile field was negative, out of bounds or unparseable.
    #[error("Invalid input field '{field}': {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// The selected salary or group column does not exist in the row schema.
    #[error("Column not found in input rows: {column}")]
    MissingColumn {
        /// The column that was requested.
        column: String,
    },

    /// The aggregation column is missing or non-numeric in the detail table.
    #[error("Cannot aggregate column '{column}': {message}")]
    Aggregation {
        /// The column that was being aggregated.
        column: String,
        /// A description of the aggregation failure.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Reading or writing a row file failed.
    #[error("I/O error on '{path}': {message}")]
    Io {
        /// The file being read or written.
        path: String,
        /// A description of the failure.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for building an [`EngineError::InvalidInput`].
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_displays_field_and_message() {
        let error = EngineError::invalid_input("base_salary", "must not be negative");
        assert_eq!(
            error.to_string(),
            "Invalid input field 'base_salary': must not be negative"
        );
    }

    #[test]
    fn test_missing_column_displays_column() {
        let error = EngineError::MissingColumn {
            column: "nonexistent".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Column not found in input rows: nonexistent"
        );
    }

    #[test]
    fn test_aggregation_displays_column_and_message() {
        let error = EngineError::Aggregation {
            column: "nome".to_string(),
            message: "value 'Ana' in row 0 is not numeric".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Cannot aggregate column 'nome': value 'Ana' in row 0 is not numeric"
        );
    }

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/statutory.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/statutory.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_missing_column() -> EngineResult<()> {
            Err(EngineError::MissingColumn {
                column: "salario".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_missing_column()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
