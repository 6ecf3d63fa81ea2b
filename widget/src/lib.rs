//! A todo list widget built on the todo-widget reducer runtime.
//!
//! The widget keeps an ordered, in-memory list of todos and renders it onto a
//! page model. It is split the same way as any reducer-based application:
//!
//! - [`types`] and [`reducer`]: the todo store's state, actions and reducer
//! - [`render`]: turns todos into list rows, always as a full replacement
//! - [`filter`]: read-only search projection over the list
//! - [`visibility`]: shows the remove-all control only when there is
//!   something to remove
//! - [`dom`]: the page the widget is mounted on
//! - [`app`]: the interaction layer tying user events to store actions
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use todo_widget::{TodoApp, UiEvent, WidgetConfig};
//! use todo_widget_core::environment::SystemClock;
//! use todo_widget::terminal::TerminalDialogs;
//!
//! # async fn example() -> todo_widget::Result<()> {
//! let config = WidgetConfig::default();
//! let mut app = TodoApp::mount(
//!     config.document(),
//!     Arc::new(TerminalDialogs::stdio()),
//!     Arc::new(SystemClock),
//!     config,
//! )
//! .await;
//!
//! app.handle(UiEvent::TypeText { text: "Buy milk".to_string() }).await?;
//! app.handle(UiEvent::Submit).await?;
//!
//! println!("{}", app.document().list_text());
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod config;
pub mod dom;
pub mod error;
pub mod filter;
pub mod reducer;
pub mod render;
pub mod terminal;
pub mod types;
pub mod visibility;

// Re-export commonly used types
pub use app::{Features, TodoApp, TodoStore, UiEvent};
pub use config::WidgetConfig;
pub use dom::{Display, Document, ElementId};
pub use error::{Result, WidgetError};
pub use reducer::{TodoEnvironment, TodoReducer};
pub use render::{RenderOptions, RowControl, TodoRow};
pub use types::{Todo, TodoAction, TodoId, TodoState};
