use thiserror::Error;

use crate::types::Style;

/// Top-level error type for the bainian system.
///
/// Only configuration and catalog failures are fatal: they terminate the
/// process at startup or propagate out of a style switch. Observer and
/// actuator failures are caught at the poll-loop boundary, logged, and the
/// loop continues.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BainianError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load {style} reply templates: {source}")]
    CatalogLoad {
        style: Style,
        #[source]
        source: std::io::Error,
    },

    #[error("Reply catalog for style {style} is empty")]
    EmptyCatalog { style: Style },

    #[error("Observer error: {0}")]
    Observer(String),

    #[error("Send failed: {0}")]
    ActuatorSend(String),

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for BainianError {
    fn from(err: toml::de::Error) -> Self {
        BainianError::Config(err.to_string())
    }
}

/// A specialized `Result` type for bainian operations.
pub type Result<T> = std::result::Result<T, BainianError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BainianError::Config("missing field".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing field");
    }

    #[test]
    fn test_error_display_all_variants() {
        let cases: Vec<(BainianError, &str)> = vec![
            (
                BainianError::Config("bad key".to_string()),
                "Configuration error: bad key",
            ),
            (
                BainianError::EmptyCatalog {
                    style: Style::Humor,
                },
                "Reply catalog for style humor is empty",
            ),
            (
                BainianError::Observer("window query failed".to_string()),
                "Observer error: window query failed",
            ),
            (
                BainianError::ActuatorSend("keystroke rejected".to_string()),
                "Send failed: keystroke rejected",
            ),
            (
                BainianError::InvalidTransition {
                    from: "Idle".to_string(),
                    to: "Dispatching".to_string(),
                },
                "Invalid state transition: Idle -> Dispatching",
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.to_string(), expected);
        }
    }

    #[test]
    fn test_catalog_load_display_includes_style_and_cause() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = BainianError::CatalogLoad {
            style: Style::Formal,
            source: io_err,
        };
        let display = err.to_string();
        assert!(display.contains("formal"));
        assert!(display.contains("no such file"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BainianError = io_err.into();
        assert!(matches!(err, BainianError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_error_from_toml_de() {
        let bad_toml = "invalid = [[[";
        let parsed: std::result::Result<toml::Value, _> = toml::from_str(bad_toml);
        assert!(parsed.is_err());
        let err: BainianError = parsed.unwrap_err().into();
        assert!(matches!(err, BainianError::Config(_)));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }

        fn returns_err() -> Result<i32> {
            Err(BainianError::Config("fail".to_string()))
        }

        assert_eq!(returns_ok().unwrap(), 42);
        assert!(returns_err().is_err());
    }

    #[test]
    fn test_result_type_with_question_mark() {
        fn inner() -> Result<String> {
            let io_result: std::result::Result<i32, std::io::Error> = Ok(42);
            let _value = io_result?;
            Ok("success".to_string())
        }

        assert_eq!(inner().unwrap(), "success");
    }

    #[test]
    fn test_error_debug_impl() {
        let err = BainianError::Observer("test debug".to_string());
        let debug_str = format!("{:?}", err);
        assert!(debug_str.contains("Observer"));
        assert!(debug_str.contains("test debug"));
    }
}
