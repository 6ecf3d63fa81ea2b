//! End-to-end scenarios.
//!
//! Each test drives the mounted widget the way a browser automation script
//! would (typing, clicking, answering native dialogs) and then asserts on the
//! serialized page, parsed back with `scraper`.

#![allow(clippy::expect_used, clippy::unwrap_used)] // Test code can use unwrap/expect

use scraper::{ElementRef, Html, Selector};
use std::sync::Arc;
use todo_widget::{ElementId, TodoApp, UiEvent, WidgetConfig};
use todo_widget_testing::{DialogCall, ScriptedDialogs, SteppingClock};

async fn mount(dialogs: Arc<ScriptedDialogs>) -> TodoApp {
    let config = WidgetConfig::default();
    TodoApp::mount(
        config.document(),
        dialogs,
        Arc::new(SteppingClock::starting_at_millis(1_700_000_000_000)),
        config,
    )
    .await
}

async fn type_and_add(app: &mut TodoApp, text: &str) {
    app.handle(UiEvent::TypeText {
        text: text.to_string(),
    })
    .await
    .unwrap();
    app.handle(UiEvent::Click(ElementId::AddTodo)).await.unwrap();
}

fn select<'a>(page: &'a Html, css: &str) -> ElementRef<'a> {
    let selector = Selector::parse(css).unwrap();
    page.select(&selector).next().unwrap()
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}

fn child_element_count(element: ElementRef<'_>) -> usize {
    element
        .children()
        .filter(|child| child.value().is_element())
        .count()
}

#[tokio::test]
async fn submitted_todo_appears_in_list() {
    let mut app = mount(Arc::new(ScriptedDialogs::new())).await;

    type_and_add(&mut app, "hellooo").await;

    let page = Html::parse_document(&app.document().to_html());
    assert!(text_of(select(&page, "#todo-list")).contains("hellooo"));
    assert!(text_of(select(&page, "body")).contains("hellooo"));
    assert!(app.document().body_text().contains("hellooo"));

    // Input is cleared after a successful submit
    assert_eq!(
        select(&page, "#todo-input").value().attr("value"),
        Some("")
    );
}

#[tokio::test]
async fn remove_all_after_confirmation_empties_list() {
    let dialogs = Arc::new(ScriptedDialogs::new().confirm_with(true));
    let mut app = mount(dialogs.clone()).await;

    type_and_add(&mut app, "test").await;
    type_and_add(&mut app, "test2").await;

    let page = Html::parse_document(&app.document().to_html());
    assert_eq!(child_element_count(select(&page, "#todo-list")), 2);

    app.handle(UiEvent::Click(ElementId::RemoveAll)).await.unwrap();

    let page = Html::parse_document(&app.document().to_html());
    assert_eq!(
        child_element_count(select(&page, "#todo-list")),
        0,
        "All todos should be removed after confirmation"
    );
    assert_eq!(
        dialogs.calls(),
        vec![DialogCall::Confirm {
            message: todo_widget::app::REMOVE_ALL_CONFIRM.to_string()
        }]
    );
}

#[tokio::test]
async fn dark_mode_sets_black_background() {
    let mut app = mount(Arc::new(ScriptedDialogs::new())).await;

    app.handle(UiEvent::Click(ElementId::DarkMode)).await.unwrap();

    let page = Html::parse_document(&app.document().to_html());
    assert_eq!(
        select(&page, "body").value().attr("style"),
        Some("background-color: rgb(0, 0, 0)")
    );
}
