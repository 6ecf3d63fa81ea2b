//! Error types for the todo widget.
//!
//! Most failure modes of the widget are not errors at all: a missing element
//! disables a feature, empty input and unknown ids are ignored. What remains
//! is surfaced through [`WidgetError`].

use crate::dom::ElementId;
use thiserror::Error;
use todo_widget_runtime::StoreError;

/// Errors that can occur while running the widget
#[derive(Error, Debug)]
pub enum WidgetError {
    /// An element needed for an operation is not on the page
    #[error("{} element not found", .0.label())]
    MissingElement(ElementId),

    /// The store rejected an action
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Reading a dialog answer or writing output failed
    #[error("Dialog I/O error: {0}")]
    Dialog(#[from] std::io::Error),

    /// A configuration value could not be used
    #[error("Invalid configuration value for {key}: {value}")]
    Config {
        /// Environment variable name
        key: String,
        /// Offending value
        value: String,
    },

    /// A terminal command could not be parsed
    #[error("Invalid command: {0}")]
    Command(String),
}

/// Result type for widget operations
pub type Result<T> = std::result::Result<T, WidgetError>;
