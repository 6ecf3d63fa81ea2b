//! Visibility of the remove-all control.
//!
//! The control is only shown while there is something to remove.

use crate::dom::{Display, Document, ElementId};

/// Display value of the remove-all control for a list of `len` todos
#[must_use]
pub const fn remove_all_display(len: usize) -> Display {
    if len == 0 {
        Display::None
    } else {
        Display::Block
    }
}

/// Applies the rule to the page
///
/// Returns the display that was set, or `None` when the page has no
/// remove-all control.
pub fn apply(document: &mut Document, len: usize) -> Option<Display> {
    let button = document.button_mut(ElementId::RemoveAll)?;
    let display = remove_all_display(len);
    button.display = Some(display);
    Some(display)
}
