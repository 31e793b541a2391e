//! Unified error types for carebook.
//!
//! Store failures met while a screen is running never travel through these
//! types: they land in the shared [`ErrorSlot`](crate::tui::ErrorSlot) and are
//! surfaced as a dialog. `CarebookError` covers everything that happens
//! outside the frame loop (startup, persistence, configuration, terminal).

use crate::store::StoreError;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for carebook operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CarebookError {
    /// Record store failures with context
    #[error("Record store failure: {context}")]
    Store {
        context: String,
        #[source]
        source: StoreError,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Terminal setup or drawing failed
    #[error("Terminal error: {0}")]
    Terminal(#[source] std::io::Error),

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Convenient Result type for carebook operations
pub type Result<T> = std::result::Result<T, CarebookError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl CarebookError {
    /// Create a store error with context
    pub fn store(context: impl Into<String>, source: StoreError) -> Self {
        Self::Store {
            context: context.into(),
            source,
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let message = format!("{source}");
        Self::Io {
            path: Some(path.into()),
            message,
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

impl From<serde_json::Error> for CarebookError {
    fn from(err: serde_json::Error) -> Self {
        Self::store(
            "invalid JSON",
            StoreError::Failed {
                entity: "store",
                message: err.to_string(),
            },
        )
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// Context is chained, outermost first:
///
/// ```ignore
/// use carebook::error::ErrorContext;
///
/// let store = FileStore::open(&path).context("opening record store")?;
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, evaluated only on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<CarebookError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

fn add_context_to_error(err: CarebookError, new_ctx: &str) -> CarebookError {
    match err {
        CarebookError::Store {
            context: existing,
            source,
        } => CarebookError::Store {
            context: chain_context(new_ctx, &existing),
            source,
        },
        CarebookError::Io {
            path,
            message,
            source,
        } => CarebookError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        CarebookError::Terminal(source) => CarebookError::Terminal(source),
        CarebookError::Config(msg) => CarebookError::Config(chain_context(new_ctx, &msg)),
        CarebookError::Validation(msg) => {
            CarebookError::Validation(chain_context(new_ctx, &msg))
        }
    }
}

/// Chain two context strings: "`new`: `existing`", or just `new`.
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = CarebookError::store(
            "loading residents",
            StoreError::NotFound {
                entity: "resident",
                key: "R-1".to_string(),
            },
        );
        let display = err.to_string();
        assert!(display.contains("loading residents"), "{display}");
    }

    #[test]
    fn test_io_error_keeps_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = CarebookError::io("/tmp/records.json", io_err);
        assert!(err.to_string().contains("/tmp/records.json"));
    }

    #[test]
    fn test_context_chaining() {
        fn inner() -> Result<()> {
            Err(CarebookError::config("base"))
        }

        let result = inner().context("middle").context("outer");
        match result {
            Err(CarebookError::Config(msg)) => assert_eq!(msg, "outer: middle: base"),
            other => panic!("Expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn test_with_context_lazy_evaluation() {
        let mut called = false;
        let ok: Result<i32> = Ok(1);
        let _ = ok.with_context(|| {
            called = true;
            "unused"
        });
        assert!(!called);

        let err: Result<i32> = Err(CarebookError::validation("bad"));
        let _ = err.with_context(|| {
            called = true;
            "used"
        });
        assert!(called);
    }

    #[test]
    fn test_json_error_gets_context() {
        let parsed: Result<Vec<u32>> =
            serde_json::from_str::<Vec<u32>>("[1,").context("decoding records.json");
        match parsed {
            Err(CarebookError::Store { context, .. }) => {
                assert_eq!(context, "decoding records.json: invalid JSON");
            }
            other => panic!("Expected Store error, got {other:?}"),
        }
    }

    #[test]
    fn test_chain_context_helper() {
        assert_eq!(chain_context("new", ""), "new");
        assert_eq!(chain_context("new", "existing"), "new: existing");
    }
}
