//! Configuration management for the todo widget.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::dom::{Document, ElementId};
use crate::error::{Result, WidgetError};
use crate::render::{DEFAULT_COMPLETED_COLOR, RenderOptions};
use serde::{Deserialize, Serialize};
use std::env;

/// Background applied by the dark mode toggle unless configured otherwise
pub const DEFAULT_DARK_BACKGROUND: &str = "rgb(0, 0, 0)";

/// Page title unless configured otherwise
pub const DEFAULT_PAGE_TITLE: &str = "Todo List";

/// Widget configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetConfig {
    /// Background of the toggle-complete button of completed todos (`TODO_COMPLETED_COLOR`)
    pub completed_color: String,
    /// Body background set by the dark mode toggle (`TODO_DARK_BACKGROUND`)
    pub dark_background: String,
    /// Title of the page (`TODO_PAGE_TITLE`)
    pub page_title: String,
    /// Elements left off the page (`TODO_MISSING_ELEMENTS`, comma separated ids)
    pub missing_elements: Vec<ElementId>,
    /// Capacity of the store's action broadcast (`TODO_ACTION_BROADCAST_CAPACITY`)
    pub action_broadcast_capacity: usize,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            completed_color: DEFAULT_COMPLETED_COLOR.to_string(),
            dark_background: DEFAULT_DARK_BACKGROUND.to_string(),
            page_title: DEFAULT_PAGE_TITLE.to_string(),
            missing_elements: Vec::new(),
            action_broadcast_capacity: todo_widget_runtime::DEFAULT_BROADCAST_CAPACITY,
        }
    }
}

impl WidgetConfig {
    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::Config`] if a variable is set to a value that
    /// cannot be used.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::Config`] for an unknown element id in
    /// `TODO_MISSING_ELEMENTS` or a non-numeric broadcast capacity.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let missing_elements = match lookup("TODO_MISSING_ELEMENTS") {
            Some(raw) => parse_element_list(&raw)?,
            None => defaults.missing_elements,
        };

        let action_broadcast_capacity = match lookup("TODO_ACTION_BROADCAST_CAPACITY") {
            Some(raw) => raw.trim().parse().map_err(|_| WidgetError::Config {
                key: "TODO_ACTION_BROADCAST_CAPACITY".to_string(),
                value: raw.clone(),
            })?,
            None => defaults.action_broadcast_capacity,
        };

        Ok(Self {
            completed_color: lookup("TODO_COMPLETED_COLOR").unwrap_or(defaults.completed_color),
            dark_background: lookup("TODO_DARK_BACKGROUND").unwrap_or(defaults.dark_background),
            page_title: lookup("TODO_PAGE_TITLE").unwrap_or(defaults.page_title),
            missing_elements,
            action_broadcast_capacity,
        })
    }

    /// Render options derived from this configuration
    #[must_use]
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            completed_color: self.completed_color.clone(),
        }
    }

    /// The page described by this configuration
    #[must_use]
    pub fn document(&self) -> Document {
        Document::standard(self.page_title.clone()).without(&self.missing_elements)
    }
}

fn parse_element_list(raw: &str) -> Result<Vec<ElementId>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse().map_err(|_| WidgetError::Config {
                key: "TODO_MISSING_ELEMENTS".to_string(),
                value: part.to_string(),
            })
        })
        .collect()
}
