//! In-memory model of the page the widget is mounted on.
//!
//! Only the parts of the page the widget reads or writes are modelled: the
//! input fields, the buttons, the list container and the body background.
//! Elements are addressed by the ids used in the page markup, and any of them
//! may be missing.

use crate::error::WidgetError;
use crate::render::{TodoRow, escape_html};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::str::FromStr;

/// Elements of the page the widget interacts with
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ElementId {
    /// Form wrapping the new-todo input
    #[serde(rename = "todo-form")]
    TodoForm,
    /// Text input for new todos
    #[serde(rename = "todo-input")]
    TodoInput,
    /// Submit button of the form
    #[serde(rename = "add-todo")]
    AddTodo,
    /// List container
    #[serde(rename = "todo-list")]
    TodoList,
    /// Global remove-all button
    #[serde(rename = "remove-all-todos")]
    RemoveAll,
    /// Background color picker
    #[serde(rename = "colorPicker")]
    ColorPicker,
    /// Search input
    #[serde(rename = "search")]
    Search,
    /// Dark mode toggle button
    #[serde(rename = "dark-mode")]
    DarkMode,
}

impl ElementId {
    /// Every element, in page order
    pub const ALL: [Self; 8] = [
        Self::DarkMode,
        Self::ColorPicker,
        Self::TodoForm,
        Self::TodoInput,
        Self::AddTodo,
        Self::Search,
        Self::TodoList,
        Self::RemoveAll,
    ];

    /// The element's `id` attribute
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TodoForm => "todo-form",
            Self::TodoInput => "todo-input",
            Self::AddTodo => "add-todo",
            Self::TodoList => "todo-list",
            Self::RemoveAll => "remove-all-todos",
            Self::ColorPicker => "colorPicker",
            Self::Search => "search",
            Self::DarkMode => "dark-mode",
        }
    }

    /// Human readable name, used in diagnostics
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::TodoForm => "Todo form",
            Self::TodoInput => "Todo input",
            Self::AddTodo => "Add button",
            Self::TodoList => "Todo list",
            Self::RemoveAll => "Remove all button",
            Self::ColorPicker => "Color picker",
            Self::Search => "Search input",
            Self::DarkMode => "Dark mode button",
        }
    }

    const fn is_input(self) -> bool {
        matches!(self, Self::TodoInput | Self::ColorPicker | Self::Search)
    }

    const fn button_label(self) -> Option<&'static str> {
        match self {
            Self::AddTodo => Some("Add"),
            Self::RemoveAll => Some("Remove all"),
            Self::DarkMode => Some("Dark mode"),
            _ => None,
        }
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown element id
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown element id: {0}")]
pub struct UnknownElementId(pub String);

impl FromStr for ElementId {
    type Err = UnknownElementId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().trim_start_matches('#');
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownElementId(s.to_string()))
    }
}

/// CSS `display` values the widget sets
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Display {
    /// `display: none`
    None,
    /// `display: block`
    Block,
}

impl Display {
    /// CSS keyword
    #[must_use]
    pub const fn as_css(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Block => "block",
        }
    }
}

/// A text, color or search input
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputElement {
    /// Current value
    pub value: String,
}

/// A button
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ButtonElement {
    /// Inline `display` style, if one was set
    pub display: Option<Display>,
}

/// The list container
///
/// Its children are always replaced as a whole. Each replacement bumps the
/// generation, so rows handed out by an earlier render can be told apart.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListElement {
    rows: Vec<TodoRow>,
    generation: u64,
}

impl ListElement {
    /// Discards every row and installs `rows`
    pub fn replace_children(&mut self, rows: Vec<TodoRow>) {
        self.rows = rows;
        self.generation += 1;
    }

    /// Current rows
    #[must_use]
    pub fn rows(&self) -> &[TodoRow] {
        &self.rows
    }

    /// Row at `index` in the current render
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&TodoRow> {
        self.rows.get(index)
    }

    /// Number of child elements
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of renders so far
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Visible text, one row per line
    #[must_use]
    pub fn text(&self) -> String {
        self.rows
            .iter()
            .map(TodoRow::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Markup of the list container
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut html = format!(r#"<ul id="{}">"#, ElementId::TodoList);
        for row in &self.rows {
            html.push_str(&row.to_html());
        }
        html.push_str("</ul>");
        html
    }
}

/// The page body
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Body {
    /// Inline `background-color`, passed through unvalidated
    pub background_color: Option<String>,
}

/// The page
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    title: String,
    body: Body,
    has_form: bool,
    inputs: BTreeMap<ElementId, InputElement>,
    buttons: BTreeMap<ElementId, ButtonElement>,
    list: Option<ListElement>,
}

impl Document {
    /// A page with every element present
    #[must_use]
    pub fn standard(title: impl Into<String>) -> Self {
        let mut inputs = BTreeMap::new();
        let mut buttons = BTreeMap::new();
        for id in ElementId::ALL {
            if id.is_input() {
                inputs.insert(id, InputElement::default());
            } else if id.button_label().is_some() {
                buttons.insert(id, ButtonElement::default());
            }
        }

        Self {
            title: title.into(),
            body: Body::default(),
            has_form: true,
            inputs,
            buttons,
            list: Some(ListElement::default()),
        }
    }

    /// The same page with `missing` elements removed
    #[must_use]
    pub fn without(mut self, missing: &[ElementId]) -> Self {
        for id in missing {
            match id {
                ElementId::TodoForm => self.has_form = false,
                ElementId::TodoList => self.list = None,
                _ => {
                    self.inputs.remove(id);
                    self.buttons.remove(id);
                }
            }
        }
        self
    }

    /// Page title
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns true if the element is on the page
    #[must_use]
    pub fn has(&self, id: ElementId) -> bool {
        match id {
            ElementId::TodoForm => self.has_form,
            ElementId::TodoList => self.list.is_some(),
            _ => self.inputs.contains_key(&id) || self.buttons.contains_key(&id),
        }
    }

    /// Checks that the element is on the page
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::MissingElement`] if it is not.
    pub fn require(&self, id: ElementId) -> crate::error::Result<()> {
        if self.has(id) {
            Ok(())
        } else {
            Err(WidgetError::MissingElement(id))
        }
    }

    /// The input with `id`, if present
    #[must_use]
    pub fn input(&self, id: ElementId) -> Option<&InputElement> {
        self.inputs.get(&id)
    }

    /// The input with `id` for mutation, if present
    pub fn input_mut(&mut self, id: ElementId) -> Option<&mut InputElement> {
        self.inputs.get_mut(&id)
    }

    /// The button with `id`, if present
    #[must_use]
    pub fn button(&self, id: ElementId) -> Option<&ButtonElement> {
        self.buttons.get(&id)
    }

    /// The button with `id` for mutation, if present
    pub fn button_mut(&mut self, id: ElementId) -> Option<&mut ButtonElement> {
        self.buttons.get_mut(&id)
    }

    /// The list container, if present
    #[must_use]
    pub const fn list(&self) -> Option<&ListElement> {
        self.list.as_ref()
    }

    /// The list container for mutation, if present
    pub fn list_mut(&mut self) -> Option<&mut ListElement> {
        self.list.as_mut()
    }

    /// The page body
    #[must_use]
    pub const fn body(&self) -> &Body {
        &self.body
    }

    /// The page body for mutation
    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    /// Markup of the list container, if present
    #[must_use]
    pub fn list_html(&self) -> Option<String> {
        self.list.as_ref().map(ListElement::to_html)
    }

    /// Visible text of the list container (empty if it is missing)
    #[must_use]
    pub fn list_text(&self) -> String {
        self.list.as_ref().map(ListElement::text).unwrap_or_default()
    }

    /// Visible text of the whole body
    ///
    /// Inputs contribute nothing and hidden buttons are skipped, as with a
    /// browser's `innerText`.
    #[must_use]
    pub fn body_text(&self) -> String {
        let mut lines = Vec::new();
        for id in ElementId::ALL {
            if id == ElementId::TodoList {
                if let Some(list) = &self.list {
                    lines.extend(list.rows().iter().map(TodoRow::text));
                }
                continue;
            }

            let (Some(label), Some(button)) = (id.button_label(), self.buttons.get(&id)) else {
                continue;
            };
            if button.display != Some(Display::None) {
                lines.push(label.to_string());
            }
        }
        lines.join("\n")
    }

    /// Markup of the whole page
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut html = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("<meta charset=\"utf-8\">\n");
        let _ = writeln!(html, "<title>{}</title>", escape_html(&self.title));
        html.push_str("</head>\n");

        match &self.body.background_color {
            Some(color) => {
                let _ = writeln!(html, r#"<body style="background-color: {}">"#, escape_html(color));
            }
            None => html.push_str("<body>\n"),
        }

        for id in ElementId::ALL {
            match id {
                ElementId::TodoForm => {
                    if self.has_form {
                        let _ = write!(html, r#"<form class="todo-form" id="{id}">"#);
                    }
                }
                ElementId::TodoList => {
                    if let Some(list) = &self.list {
                        html.push_str(&list.to_html());
                        html.push('\n');
                    }
                }
                _ => self.write_control(&mut html, id),
            }
            if id == ElementId::AddTodo && self.has_form {
                html.push_str("</form>\n");
            }
        }

        html.push_str("</body>\n</html>\n");
        html
    }

    fn write_control(&self, html: &mut String, id: ElementId) {
        if let Some(input) = self.inputs.get(&id) {
            let kind = match id {
                ElementId::ColorPicker => "color",
                ElementId::Search => "search",
                _ => "text",
            };
            let _ = write!(
                html,
                r#"<input type="{kind}" id="{id}" value="{}">"#,
                escape_html(&input.value)
            );
        } else if let (Some(button), Some(label)) = (self.buttons.get(&id), id.button_label()) {
            let kind = if id == ElementId::AddTodo { "submit" } else { "button" };
            let style = button
                .display
                .map(|display| format!(r#" style="display: {}""#, display.as_css()))
                .unwrap_or_default();
            let _ = write!(html, r#"<button type="{kind}" id="{id}"{style}>{label}</button>"#);
        } else {
            return;
        }

        // The input and its submit button share a line inside the form
        if id != ElementId::TodoInput {
            html.push('\n');
        }
    }
}
