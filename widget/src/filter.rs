//! Filter view: case-insensitive search over the todo list.
//!
//! A read-only projection. It never touches the store and its output keeps
//! the store's order.

use crate::types::Todo;

/// Todos whose title contains `query`, ignoring case
///
/// An empty query matches every todo.
pub fn filter_todos<'a, I>(todos: I, query: &str) -> Vec<&'a Todo>
where
    I: IntoIterator<Item = &'a Todo>,
{
    let query = query.to_lowercase();
    todos
        .into_iter()
        .filter(|todo| todo.title.to_lowercase().contains(&query))
        .collect()
}
