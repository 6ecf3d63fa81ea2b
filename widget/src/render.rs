//! Render engine.
//!
//! Turns a sequence of todos into list rows. Rendering is a pure function of
//! its input and always produces a complete replacement for the list
//! container; there is no diffing against what was shown before.

use crate::types::{Todo, TodoId};
use std::fmt::Write as _;

/// Background color of the toggle-complete button of a completed todo
pub const DEFAULT_COMPLETED_COLOR: &str = "green";

/// Options that affect how rows look
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// Background color applied to the toggle-complete button of completed todos
    pub completed_color: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            completed_color: DEFAULT_COMPLETED_COLOR.to_string(),
        }
    }
}

/// The three per-row controls
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RowControl {
    /// Removes the row's todo
    Remove,
    /// Prompts for a new title
    Edit,
    /// Toggles the completed flag
    Complete,
}

impl RowControl {
    /// All controls in the order they appear in a row
    pub const ALL: [Self; 3] = [Self::Remove, Self::Edit, Self::Complete];

    /// CSS class of the control's button
    #[must_use]
    pub const fn class(self) -> &'static str {
        match self {
            Self::Remove => "removeBtn",
            Self::Edit => "editBtn",
            Self::Complete => "completedBtn",
        }
    }

    /// Button label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Remove => "Remove",
            Self::Edit => "Edit",
            Self::Complete => "Completed",
        }
    }
}

/// One rendered list row
///
/// The row remembers the id of the todo it was rendered from; that binding is
/// what its controls act on when clicked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TodoRow {
    todo_id: TodoId,
    title: String,
    completed_color: Option<String>,
}

impl TodoRow {
    /// Id of the todo this row was rendered from
    #[must_use]
    pub const fn todo_id(&self) -> TodoId {
        self.todo_id
    }

    /// Title shown in the row
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Background color of the toggle-complete button, set only for completed todos
    #[must_use]
    pub fn completed_color(&self) -> Option<&str> {
        self.completed_color.as_deref()
    }

    /// Visible text of the row, as a browser's `innerText` would report it
    #[must_use]
    pub fn text(&self) -> String {
        let mut text = self.title.clone();
        for control in RowControl::ALL {
            text.push(' ');
            text.push_str(control.label());
        }
        text
    }

    /// Markup of the row
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut html = format!(
            r#"<li class="todo-item" data-id="{}"><span>{}</span>"#,
            self.todo_id,
            escape_html(&self.title)
        );
        for control in RowControl::ALL {
            let style = match (control, &self.completed_color) {
                (RowControl::Complete, Some(color)) => {
                    format!(r#" style="background-color: {}""#, escape_html(color))
                }
                _ => String::new(),
            };
            let _ = write!(
                html,
                r#"<button class="{}"{style}> {} </button>"#,
                control.class(),
                control.label()
            );
        }
        html.push_str("</li>");
        html
    }
}

/// Render one row per todo, in order
///
/// The completed styling is decided from each todo's current flag on every
/// call.
pub fn render_rows<'a, I>(todos: I, options: &RenderOptions) -> Vec<TodoRow>
where
    I: IntoIterator<Item = &'a Todo>,
{
    todos
        .into_iter()
        .map(|todo| TodoRow {
            todo_id: todo.id,
            title: todo.title.clone(),
            completed_color: todo.completed.then(|| options.completed_color.clone()),
        })
        .collect()
}

/// Escape text for use in element content and quoted attribute values
pub(crate) fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
