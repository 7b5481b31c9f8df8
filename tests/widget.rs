//! In-browser DOM tests, run with `wasm-pack test --headless --chrome`.

#![cfg(target_arch = "wasm32")]

use std::rc::Rc;

use wasm_bindgen_test::*;

use chat_widget::channel;
use chat_widget::protocol::{Role, WidgetConfig, DEFAULT_GREETING};
use chat_widget::session::SessionStore;
use chat_widget::ui::WidgetApp;
use chat_widget::utils::EmbedParams;

wasm_bindgen_test_configure!(run_in_browser);

fn mount_test_app(config_json: &str) -> Rc<WidgetApp> {
    let document = web_sys::window().unwrap().document().unwrap();
    let config: WidgetConfig = serde_json::from_str(config_json).unwrap();
    let params = EmbedParams {
        client_id: "test-client".to_string(),
        // Nothing answers on this port, so any round trip attempted by a
        // test is a guaranteed transport failure.
        backend: "http://localhost:1".to_string(),
    };
    WidgetApp::mount(document, params, config).unwrap()
}

#[wasm_bindgen_test]
fn mount_attaches_one_shadow_isolated_host() {
    let document = web_sys::window().unwrap().document().unwrap();
    let before = document.body().unwrap().child_element_count();

    let app = mount_test_app("{}");

    let after = document.body().unwrap().child_element_count();
    assert_eq!(after, before + 1);
    assert!(app.ui.host.shadow_root().is_some());

    app.ui.host.remove();
}

#[wasm_bindgen_test]
fn first_open_inserts_exactly_one_greeting() {
    let app = mount_test_app(r#"{"greeting": "Welcome aboard!"}"#);

    assert_eq!(app.ui.messages.child_element_count(), 0);
    app.open().unwrap();
    assert_eq!(app.ui.messages.child_element_count(), 1);
    let text = app.ui.messages.text_content().unwrap();
    assert_eq!(text, "Welcome aboard!");

    app.ui.host.remove();
}

#[wasm_bindgen_test]
fn default_greeting_applies_when_unset() {
    let app = mount_test_app("{}");

    app.open().unwrap();
    assert_eq!(app.ui.messages.text_content().unwrap(), DEFAULT_GREETING);

    app.ui.host.remove();
}

#[wasm_bindgen_test]
fn reopen_does_not_duplicate_greeting_and_history_survives_close() {
    let app = mount_test_app("{}");

    app.open().unwrap();
    app.append_message(Role::User, "Hello").unwrap();
    assert_eq!(app.ui.messages.child_element_count(), 2);

    app.close();
    assert_eq!(app.ui.messages.child_element_count(), 2);

    app.open().unwrap();
    assert_eq!(app.ui.messages.child_element_count(), 2);

    app.ui.host.remove();
}

#[wasm_bindgen_test]
fn typing_placeholder_is_unique_and_removed() {
    let app = mount_test_app("{}");

    app.set_typing(true).unwrap();
    app.set_typing(true).unwrap();
    assert_eq!(app.ui.messages.child_element_count(), 1);
    assert!(app.state.borrow().is_typing);

    app.set_typing(false).unwrap();
    assert_eq!(app.ui.messages.child_element_count(), 0);
    assert!(!app.state.borrow().is_typing);

    app.ui.host.remove();
}

#[wasm_bindgen_test]
async fn send_is_refused_while_typing() {
    let app = mount_test_app("{}");

    app.set_typing(true).unwrap();
    app.ui.input.set_value("Hello");

    channel::send_message(app.clone()).await.unwrap();

    // Only the typing placeholder is in the list; the input was not
    // consumed and no request left the widget.
    assert_eq!(app.ui.messages.child_element_count(), 1);
    assert_eq!(app.ui.input.value(), "Hello");

    app.ui.host.remove();
}

#[wasm_bindgen_test]
async fn empty_input_send_is_a_no_op() {
    let app = mount_test_app("{}");

    app.ui.input.set_value("   ");
    channel::send_message(app.clone()).await.unwrap();
    assert_eq!(app.ui.messages.child_element_count(), 0);

    app.ui.host.remove();
}

#[wasm_bindgen_test]
async fn transport_failure_renders_one_connectivity_apology() {
    let app = mount_test_app("{}");

    app.ui.input.set_value("Hello");
    channel::send_message(app.clone()).await.unwrap();

    // Exactly the user message and the apology remain; the typing
    // placeholder was cleared before the outcome was rendered.
    assert_eq!(app.ui.messages.child_element_count(), 2);
    assert!(!app.state.borrow().is_typing);
    let text = app.ui.messages.text_content().unwrap();
    assert!(text.contains("Hello"));
    assert!(text.contains(channel::OFFLINE_REPLY));
    assert_eq!(app.ui.input.value(), "");

    app.ui.host.remove();
}

#[wasm_bindgen_test]
fn stored_session_id_is_loaded_at_startup() {
    let store = SessionStore::new("test-client");
    store.save("sess-42");

    let app = mount_test_app("{}");
    assert_eq!(app.state.borrow().session_id.as_deref(), Some("sess-42"));

    app.ui.host.remove();
}

#[wasm_bindgen_test]
fn script_payloads_render_as_inert_text() {
    let app = mount_test_app("{}");

    app.append_message(Role::Bot, "<script>window.pwned = true;</script>")
        .unwrap();

    assert!(app.ui.messages.query_selector("script").unwrap().is_none());
    let text = app.ui.messages.text_content().unwrap();
    assert!(text.contains("<script>"));

    app.ui.host.remove();
}
