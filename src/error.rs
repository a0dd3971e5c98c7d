//! Error taxonomy for signal extraction, alignment and baseline handling
//!
//! Every variant is terminal for the (model, variant) run that raised it.
//! Callers match on the variant to decide whether to skip the case, fail the
//! suite, or report a configuration problem.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the loader, adapters, comparison engine and baselines
#[derive(Error, Debug)]
pub enum RegressError {
    #[error("Unsupported file format: {path} ({reason})")]
    UnsupportedFormat { path: PathBuf, reason: String },

    #[error("Missing locator: {0}")]
    MissingLocator(String),

    #[error("Malformed data in {context}: {reason}")]
    MalformedData { context: String, reason: String },

    #[error("Time vector not found (tried {})", tried.join(", "))]
    TimeVectorNotFound { tried: Vec<String> },

    #[error("Signal not found for {body} ({variant})")]
    SignalNotFound { body: String, variant: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Reference has no valid numeric rows: {}", path.display())]
    EmptyReference { path: PathBuf },

    #[error("Variant '{variant}' is not supported by model {model}")]
    UnsupportedVariant { model: String, variant: String },

    #[error("No reference found for {case}")]
    ReferenceNotFound { case: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Container error in {}: {reason}", path.display())]
    Container { path: PathBuf, reason: String },
}

/// Result type for simregress operations
pub type Result<T> = std::result::Result<T, RegressError>;

impl RegressError {
    /// Shorthand for [`RegressError::MalformedData`]
    pub fn malformed(context: impl Into<String>, reason: impl Into<String>) -> Self {
        RegressError::MalformedData {
            context: context.into(),
            reason: reason.into(),
        }
    }

    /// Wrap an I/O error together with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RegressError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for errors that are fixed by changing configuration or CLI hints
    /// rather than by changing the data.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            RegressError::UnsupportedFormat { .. }
                | RegressError::MissingLocator(_)
                | RegressError::UnsupportedVariant { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_classification() {
        assert!(RegressError::MissingLocator("time_path".into()).is_configuration());
        assert!(RegressError::UnsupportedVariant {
            model: "rm3".into(),
            variant: "regular_waves".into()
        }
        .is_configuration());
        assert!(!RegressError::InsufficientData("empty".into()).is_configuration());
        assert!(!RegressError::EmptyReference {
            path: PathBuf::from("ref.txt")
        }
        .is_configuration());
    }

    #[test]
    fn test_time_vector_message_lists_candidates() {
        let err = RegressError::TimeVectorNotFound {
            tried: vec!["/results/time/time".into(), "/time".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("/results/time/time, /time"));
    }

    #[test]
    fn test_io_error_keeps_path() {
        let err = RegressError::io(
            "missing.txt",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.to_string().contains("missing.txt"));
    }
}
