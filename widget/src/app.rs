//! Interaction layer.
//!
//! [`TodoApp`] binds the page to the store. Each [`UiEvent`] is handled to
//! completion: at most one action is sent, the list is re-rendered from the
//! store, and after actions that can change the number of todos the
//! remove-all control's visibility is re-evaluated.

use crate::config::WidgetConfig;
use crate::dom::{Document, ElementId};
use crate::error::Result;
use crate::filter::filter_todos;
use crate::reducer::{TodoEnvironment, TodoReducer};
use crate::render::{RenderOptions, RowControl, render_rows};
use crate::types::{TodoAction, TodoState};
use crate::visibility;
use std::sync::Arc;
use todo_widget_core::environment::{Clock, Dialogs};
use todo_widget_runtime::Store;

/// Store type used by the widget
pub type TodoStore = Store<TodoState, TodoAction, TodoEnvironment, TodoReducer>;

/// Message of the edit prompt
pub const EDIT_PROMPT: &str = "edit todo";

/// Message of the remove-all confirmation
pub const REMOVE_ALL_CONFIRM: &str = "Are you sure you want to remove all todos?";

/// A user interaction with the page
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UiEvent {
    /// Text typed into the new-todo input (appended to its value)
    TypeText {
        /// Typed text
        text: String,
    },
    /// The new-todo form was submitted
    Submit,
    /// A page-level element was clicked
    Click(ElementId),
    /// A control in a list row was clicked
    RowClicked {
        /// Position of the row in the list as currently rendered
        row: usize,
        /// Which of the row's controls
        control: RowControl,
    },
    /// The remove-all control was clicked
    RemoveAllClicked,
    /// The color picker reported a new value
    ColorInput {
        /// Color as reported by the picker
        value: String,
    },
    /// The search field changed
    SearchInput {
        /// Full content of the search field
        value: String,
    },
    /// The dark mode control was clicked
    DarkModeClicked,
}

/// Features that were initialized when the widget was mounted
///
/// A feature whose element is missing stays off for the whole session and
/// its events are ignored.
#[allow(clippy::struct_excessive_bools)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Features {
    /// New-todo form (needs the form and its input)
    pub form: bool,
    /// List rendering (needs the list container)
    pub list: bool,
    /// Remove-all control
    pub remove_all: bool,
    /// Background color picker
    pub color_picker: bool,
    /// Search
    pub search: bool,
    /// Dark mode toggle
    pub dark_mode: bool,
}

impl Features {
    /// Checks which features `document` supports, logging every missing element
    #[must_use]
    pub fn detect(document: &Document) -> Self {
        for id in ElementId::ALL {
            if let Err(e) = document.require(id) {
                tracing::error!(element = %id, "{e}");
            }
        }

        Self {
            form: document.has(ElementId::TodoForm) && document.has(ElementId::TodoInput),
            list: document.has(ElementId::TodoList),
            remove_all: document.has(ElementId::RemoveAll),
            color_picker: document.has(ElementId::ColorPicker),
            search: document.has(ElementId::Search),
            dark_mode: document.has(ElementId::DarkMode),
        }
    }
}

/// The todo widget mounted on a page
pub struct TodoApp {
    store: TodoStore,
    document: Document,
    dialogs: Arc<dyn Dialogs>,
    render_options: RenderOptions,
    dark_background: String,
    features: Features,
    /// Background to restore when dark mode is switched off; `Some` while it is on
    background_before_dark: Option<Option<String>>,
}

impl TodoApp {
    /// Mounts the widget on `document`
    ///
    /// Renders the (empty) list and hides the remove-all control. Features
    /// whose elements are missing are logged and left off.
    pub async fn mount(
        document: Document,
        dialogs: Arc<dyn Dialogs>,
        clock: Arc<dyn Clock>,
        config: WidgetConfig,
    ) -> Self {
        let features = Features::detect(&document);
        let store = Store::with_broadcast_capacity(
            TodoState::new(),
            TodoReducer::new(),
            TodoEnvironment::new(clock),
            config.action_broadcast_capacity,
        );

        let mut app = Self {
            store,
            document,
            dialogs,
            render_options: config.render_options(),
            dark_background: config.dark_background,
            features,
            background_before_dark: None,
        };

        app.render_all().await;
        app.apply_visibility().await;
        tracing::info!(?features, "Todo widget mounted");
        app
    }

    /// The page as it currently looks
    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    /// The store holding the todos
    #[must_use]
    pub const fn store(&self) -> &TodoStore {
        &self.store
    }

    /// Features that were initialized at mount
    #[must_use]
    pub const fn features(&self) -> Features {
        self.features
    }

    /// Snapshot of the todo list
    pub async fn todos(&self) -> TodoState {
        self.store.state(Clone::clone).await
    }

    /// Handles one user interaction to completion
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::Store`](crate::error::WidgetError::Store) if the
    /// store has been shut down.
    #[tracing::instrument(skip(self), name = "todo_app_handle")]
    pub async fn handle(&mut self, event: UiEvent) -> Result<()> {
        match event {
            UiEvent::TypeText { text } => {
                self.type_text(&text);
                Ok(())
            }
            UiEvent::Submit | UiEvent::Click(ElementId::AddTodo) => self.submit().await,
            UiEvent::RowClicked { row, control } => self.row_clicked(row, control).await,
            UiEvent::RemoveAllClicked | UiEvent::Click(ElementId::RemoveAll) => {
                self.remove_all_clicked().await
            }
            UiEvent::ColorInput { value } => {
                self.color_input(value);
                Ok(())
            }
            UiEvent::SearchInput { value } => {
                self.search_input(value).await;
                Ok(())
            }
            UiEvent::DarkModeClicked | UiEvent::Click(ElementId::DarkMode) => {
                self.toggle_dark_mode();
                Ok(())
            }
            UiEvent::Click(id) => {
                tracing::debug!(element = %id, "Ignored click");
                Ok(())
            }
        }
    }

    fn type_text(&mut self, text: &str) {
        match self.document.input_mut(ElementId::TodoInput) {
            Some(input) => input.value.push_str(text),
            None => tracing::debug!("Ignored typing: no todo input"),
        }
    }

    async fn submit(&mut self) -> Result<()> {
        if !self.features.form {
            tracing::debug!("Ignored submit: form not initialized");
            return Ok(());
        }

        let title = match self.document.input(ElementId::TodoInput) {
            Some(input) => input.value.trim().to_string(),
            None => return Ok(()),
        };
        if title.is_empty() {
            return Ok(());
        }

        self.dispatch(TodoAction::AddTodo { title }).await?;
        if let Some(input) = self.document.input_mut(ElementId::TodoInput) {
            input.value.clear();
        }
        Ok(())
    }

    async fn row_clicked(&mut self, row: usize, control: RowControl) -> Result<()> {
        let Some(id) = self
            .document
            .list()
            .and_then(|list| list.row(row))
            .map(|row| row.todo_id())
        else {
            tracing::debug!(row, "Ignored click on unknown row");
            return Ok(());
        };

        match control {
            RowControl::Remove => self.dispatch(TodoAction::RemoveTodo { id }).await,
            RowControl::Complete => self.dispatch(TodoAction::ToggleCompleted { id }).await,
            RowControl::Edit => {
                let current = self
                    .store
                    .state(|state| state.find_by_id(id).map(|todo| todo.title.clone()))
                    .await;
                let Some(current) = current else {
                    tracing::debug!(%id, "Ignored edit of unknown todo");
                    return Ok(());
                };

                match self.dialogs.prompt(EDIT_PROMPT, &current) {
                    Some(title) if !title.trim().is_empty() => {
                        self.dispatch(TodoAction::EditTitle { id, title }).await
                    }
                    _ => {
                        tracing::debug!(%id, "Edit cancelled");
                        Ok(())
                    }
                }
            }
        }
    }

    async fn remove_all_clicked(&mut self) -> Result<()> {
        if !self.features.remove_all {
            tracing::debug!("Ignored remove-all: control not initialized");
            return Ok(());
        }

        if self.dialogs.confirm(REMOVE_ALL_CONFIRM) {
            self.dispatch(TodoAction::RemoveAll).await
        } else {
            tracing::debug!("Remove-all cancelled");
            Ok(())
        }
    }

    fn color_input(&mut self, value: String) {
        if !self.features.color_picker {
            tracing::debug!("Ignored color input: picker not initialized");
            return;
        }

        if let Some(picker) = self.document.input_mut(ElementId::ColorPicker) {
            picker.value.clone_from(&value);
        }
        self.document.body_mut().background_color = Some(value);
        self.background_before_dark = None;
    }

    async fn search_input(&mut self, value: String) {
        if !self.features.search {
            tracing::debug!("Ignored search: input not initialized");
            return;
        }

        if let Some(search) = self.document.input_mut(ElementId::Search) {
            search.value.clone_from(&value);
        }
        self.render_filtered(&value).await;
    }

    fn toggle_dark_mode(&mut self) {
        if !self.features.dark_mode {
            tracing::debug!("Ignored dark mode: control not initialized");
            return;
        }

        let body = self.document.body_mut();
        match self.background_before_dark.take() {
            Some(previous) => {
                body.background_color = previous;
                tracing::debug!("Dark mode off");
            }
            None => {
                let previous = body.background_color.replace(self.dark_background.clone());
                self.background_before_dark = Some(previous);
                tracing::debug!("Dark mode on");
            }
        }
    }

    /// Sends `action`, then re-renders and, if needed, re-evaluates visibility
    async fn dispatch(&mut self, action: TodoAction) -> Result<()> {
        let resizes = action.resizes_store();
        tracing::debug!(action = action.action_name(), "Dispatching");

        self.store.send(action).await?;
        self.render_all().await;
        if resizes {
            self.apply_visibility().await;
        }
        Ok(())
    }

    async fn render_all(&mut self) {
        let Some(list) = self.document.list_mut() else {
            return;
        };
        let rows = self
            .store
            .state(|state| render_rows(state, &self.render_options))
            .await;
        list.replace_children(rows);
    }

    async fn render_filtered(&mut self, query: &str) {
        let Some(list) = self.document.list_mut() else {
            return;
        };
        let rows = self
            .store
            .state(|state| render_rows(filter_todos(state, query), &self.render_options))
            .await;
        list.replace_children(rows);
    }

    async fn apply_visibility(&mut self) {
        let len = self.store.state(TodoState::len).await;
        if let Some(shown) = visibility::apply(&mut self.document, len) {
            tracing::debug!(len, display = shown.as_css(), "Remove-all visibility updated");
        }
    }
}

impl std::fmt::Debug for TodoApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoApp")
            .field("document", &self.document)
            .field("features", &self.features)
            .finish_non_exhaustive()
    }
}
